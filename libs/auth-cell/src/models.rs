use serde::{Deserialize, Serialize};

use shared_models::validation::{FieldErrors, NumberInput};

/// The registration form as posted. Every field is optional here so that
/// missing values surface as field errors rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub height: Option<NumberInput>,
    pub weight: Option<NumberInput>,
    pub blood_type: Option<String>,
    pub past_medical_issues: Option<String>,
    pub allergies: Option<String>,
    pub current_health_issues: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial profile update. Unknown keys, including email and password, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub height: Option<NumberInput>,
    pub weight: Option<NumberInput>,
    pub blood_type: Option<String>,
    pub past_medical_issues: Option<String>,
    pub allergies: Option<String>,
    pub current_health_issues: Option<String>,
}

const ACCOUNT_FIELDS: &[&str] = &["firstName", "lastName", "email", "password", "confirmPassword"];
const HEALTH_FIELDS: &[&str] = &["gender", "dateOfBirth", "height", "weight", "bloodType"];
const MEDICAL_HISTORY_FIELDS: &[&str] = &["pastMedicalIssues", "allergies", "currentHealthIssues"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    Account,
    Health,
    MedicalHistory,
    Review,
}

impl RegistrationStep {
    pub const LAST: u8 = 4;

    pub fn from_number(step: u8) -> Option<Self> {
        match step {
            1 => Some(RegistrationStep::Account),
            2 => Some(RegistrationStep::Health),
            3 => Some(RegistrationStep::MedicalHistory),
            4 => Some(RegistrationStep::Review),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            RegistrationStep::Account => 1,
            RegistrationStep::Health => 2,
            RegistrationStep::MedicalHistory => 3,
            RegistrationStep::Review => 4,
        }
    }

    pub fn next_number(&self) -> u8 {
        (self.number() + 1).min(Self::LAST)
    }

    /// Fields checked at this step; `None` means the whole form.
    pub fn fields(&self) -> Option<&'static [&'static str]> {
        match self {
            RegistrationStep::Account => Some(ACCOUNT_FIELDS),
            RegistrationStep::Health => Some(HEALTH_FIELDS),
            RegistrationStep::MedicalHistory => Some(MEDICAL_HISTORY_FIELDS),
            RegistrationStep::Review => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResponse {
    pub step: u8,
    pub next_step: u8,
    pub valid: bool,
    pub errors: FieldErrors,
}
