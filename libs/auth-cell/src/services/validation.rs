use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use shared_models::user::{
    BloodType, Gender, NewUser, ProfileChanges, Role, HEALTH_NOTE_MAX_LENGTH, HEIGHT_RANGE_CM,
    PASSWORD_MIN_LENGTH, WEIGHT_RANGE_KG,
};
use shared_models::validation::{non_blank, one_of, parse_date, parse_enum, text_length, FieldErrors, NumberInput};

use crate::models::{RegisterRequest, RegistrationStep, UpdateProfileRequest};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?-u:\w)+([.-]?(?-u:\w)+)*@(?-u:\w)+([.-]?(?-u:\w)+)*(\.(?-u:\w){2,3})+$")
        .expect("email pattern is valid")
});

/// Trims and lowercases, the form the address is stored and looked up in.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Checks the whole registration form, reporting every failing field at once.
pub fn validate_registration(form: &RegisterRequest) -> Result<NewUser, FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = errors.check("firstName", person_name(form.first_name.as_deref(), "First name"));
    let last_name = errors.check("lastName", person_name(form.last_name.as_deref(), "Last name"));
    let email = errors.check("email", email(form.email.as_deref()));
    let password = errors.check("password", password(form.password.as_deref()));
    let gender = errors.check("gender", gender(form.gender.as_deref()));
    let date_of_birth = errors.check("dateOfBirth", date_of_birth(form.date_of_birth.as_deref()));
    let height = errors.check("height", measurement(form.height.as_ref(), "Height", "cm", HEIGHT_RANGE_CM));
    let weight = errors.check("weight", measurement(form.weight.as_ref(), "Weight", "kg", WEIGHT_RANGE_KG));
    let blood_type = errors.check("bloodType", blood_type(form.blood_type.as_deref()));
    let past_medical_issues = errors.check(
        "pastMedicalIssues",
        health_note(form.past_medical_issues.as_deref(), "Past medical issues"),
    );
    let allergies = errors.check("allergies", health_note(form.allergies.as_deref(), "Allergies"));
    let current_health_issues = errors.check(
        "currentHealthIssues",
        health_note(form.current_health_issues.as_deref(), "Current health issues"),
    );

    if let (Some(password), Some(confirm)) = (&form.password, &form.confirm_password) {
        if password != confirm {
            errors.add("confirmPassword", "Passwords do not match");
        }
    }

    let (
        Some(first_name),
        Some(last_name),
        Some(email),
        Some(password),
        Some(gender),
        Some(date_of_birth),
        Some(height),
        Some(weight),
        Some(blood_type),
        Some(past_medical_issues),
        Some(allergies),
        Some(current_health_issues),
    ) = (
        first_name,
        last_name,
        email,
        password,
        gender,
        date_of_birth,
        height,
        weight,
        blood_type,
        past_medical_issues,
        allergies,
        current_health_issues,
    )
    else {
        return Err(errors);
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewUser {
        first_name,
        last_name,
        email,
        password,
        role: Role::Patient,
        gender,
        date_of_birth,
        height,
        weight,
        blood_type,
        past_medical_issues,
        allergies,
        current_health_issues,
    })
}

/// Errors for the fields a registration step covers. The review step covers the whole form.
pub fn step_errors(step: RegistrationStep, form: &RegisterRequest) -> FieldErrors {
    let errors = validate_registration(form).err().unwrap_or_default();
    match step.fields() {
        Some(fields) => errors.only(fields),
        None => errors,
    }
}

/// Validates only the fields present in the update, with the registration rules.
pub fn validate_profile_changes(update: &UpdateProfileRequest) -> Result<ProfileChanges, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut changes = ProfileChanges::default();

    if let Some(raw) = update.first_name.as_deref() {
        changes.first_name = errors.check("firstName", person_name(Some(raw), "First name"));
    }
    if let Some(raw) = update.last_name.as_deref() {
        changes.last_name = errors.check("lastName", person_name(Some(raw), "Last name"));
    }
    if let Some(raw) = update.gender.as_deref() {
        changes.gender = errors.check("gender", gender(Some(raw)));
    }
    if let Some(raw) = update.date_of_birth.as_deref() {
        changes.date_of_birth = errors.check("dateOfBirth", date_of_birth(Some(raw)));
    }
    if let Some(raw) = update.height.as_ref() {
        changes.height = errors.check("height", measurement(Some(raw), "Height", "cm", HEIGHT_RANGE_CM));
    }
    if let Some(raw) = update.weight.as_ref() {
        changes.weight = errors.check("weight", measurement(Some(raw), "Weight", "kg", WEIGHT_RANGE_KG));
    }
    if let Some(raw) = update.blood_type.as_deref() {
        changes.blood_type = errors.check("bloodType", blood_type(Some(raw)));
    }
    // A blank note clears the stored one
    if let Some(raw) = update.past_medical_issues.as_deref() {
        changes.past_medical_issues = errors.check(
            "pastMedicalIssues",
            health_note(Some(raw), "Past medical issues"),
        );
    }
    if let Some(raw) = update.allergies.as_deref() {
        changes.allergies = errors.check("allergies", health_note(Some(raw), "Allergies"));
    }
    if let Some(raw) = update.current_health_issues.as_deref() {
        changes.current_health_issues = errors.check(
            "currentHealthIssues",
            health_note(Some(raw), "Current health issues"),
        );
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

fn person_name(raw: Option<&str>, label: &str) -> Result<String, String> {
    non_blank(raw).ok_or_else(|| format!("{} is required", label))
}

fn email(raw: Option<&str>) -> Result<String, String> {
    let email = non_blank(raw)
        .map(|v| normalize_email(&v))
        .ok_or_else(|| "Email is required".to_string())?;
    if !EMAIL_PATTERN.is_match(&email) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(email)
}

// Not trimmed: surrounding spaces are part of the password
fn password(raw: Option<&str>) -> Result<String, String> {
    let password = raw
        .filter(|p| !p.is_empty())
        .ok_or_else(|| "Password is required".to_string())?;
    if text_length(password) < PASSWORD_MIN_LENGTH {
        return Err(format!("Password must be at least {} characters long", PASSWORD_MIN_LENGTH));
    }
    Ok(password.to_string())
}

fn gender(raw: Option<&str>) -> Result<Gender, String> {
    let raw = non_blank(raw).ok_or_else(|| "Gender is required".to_string())?;
    parse_enum(&raw).ok_or_else(|| format!("Gender must be one of: {}", one_of(&Gender::ALL)))
}

fn date_of_birth(raw: Option<&str>) -> Result<NaiveDate, String> {
    let raw = non_blank(raw).ok_or_else(|| "Date of birth is required".to_string())?;
    parse_date(&raw).ok_or_else(|| "Date of birth must be a valid date".to_string())
}

fn measurement(raw: Option<&NumberInput>, label: &str, unit: &str, (min, max): (f64, f64)) -> Result<f64, String> {
    let value = raw
        .and_then(NumberInput::value)
        .ok_or_else(|| format!("{} is required", label))?
        .map_err(|_| format!("{} must be a number", label))?;

    if value < min {
        return Err(format!("{} must be at least {}{}", label, min, unit));
    }
    if value > max {
        return Err(format!("{} must not exceed {}{}", label, max, unit));
    }
    Ok(value)
}

fn blood_type(raw: Option<&str>) -> Result<BloodType, String> {
    let raw = non_blank(raw).ok_or_else(|| "Blood type is required".to_string())?;
    parse_enum(&raw).ok_or_else(|| format!("Blood type must be one of: {}", one_of(&BloodType::ALL)))
}

fn health_note(raw: Option<&str>, label: &str) -> Result<Option<String>, String> {
    let note = non_blank(raw);
    if let Some(ref text) = note {
        if text_length(text) > HEALTH_NOTE_MAX_LENGTH {
            return Err(format!("{} cannot exceed {} characters", label, HEALTH_NOTE_MAX_LENGTH));
        }
    }
    Ok(note)
}
