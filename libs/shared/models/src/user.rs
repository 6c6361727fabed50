use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const HEIGHT_RANGE_CM: (f64, f64) = (50.0, 250.0);
pub const WEIGHT_RANGE_KG: (f64, f64) = (20.0, 300.0);
pub const HEALTH_NOTE_MAX_LENGTH: usize = 1000;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Patient,
    Doctor,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Doctor => write!(f, "doctor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        };
        f.write_str(label)
    }
}

/// A user record as it may leave the server. There is no credential field to strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub height: f64,
    pub weight: f64,
    pub blood_type: BloodType,
    #[serde(default)]
    pub past_medical_issues: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub current_health_issues: Option<String>,
    pub is_active: bool,
    pub is_email_verified: bool,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// A user together with the stored password hash. Only the login path reads this.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// A registration that passed validation. The password is still plaintext.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub height: f64,
    pub weight: f64,
    pub blood_type: BloodType,
    pub past_medical_issues: Option<String>,
    pub allergies: Option<String>,
    pub current_health_issues: Option<String>,
}

impl NewUser {
    /// Splits off the plaintext password and builds the record with default status flags.
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> (User, String) {
        let user = User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
            gender: self.gender,
            date_of_birth: self.date_of_birth,
            height: self.height,
            weight: self.weight,
            blood_type: self.blood_type,
            past_medical_issues: self.past_medical_issues,
            allergies: self.allergies,
            current_health_issues: self.current_health_issues,
            is_active: true,
            is_email_verified: false,
            created_at: now,
            updated_at: now,
        };
        (user, self.password)
    }
}

/// Validated partial profile update. Identity, credentials, role and status are not editable here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<BloodType>,
    /// `Some(None)` clears the note; it is written as `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_medical_issues: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_health_issues: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == ProfileChanges::default()
    }

    pub fn apply(&self, user: &mut User, now: DateTime<Utc>) {
        if let Some(ref v) = self.first_name { user.first_name = v.clone(); }
        if let Some(ref v) = self.last_name { user.last_name = v.clone(); }
        if let Some(v) = self.gender { user.gender = v; }
        if let Some(v) = self.date_of_birth { user.date_of_birth = v; }
        if let Some(v) = self.height { user.height = v; }
        if let Some(v) = self.weight { user.weight = v; }
        if let Some(v) = self.blood_type { user.blood_type = v; }
        if let Some(ref v) = self.past_medical_issues { user.past_medical_issues = v.clone(); }
        if let Some(ref v) = self.allergies { user.allergies = v.clone(); }
        if let Some(ref v) = self.current_health_issues { user.current_health_issues = v.clone(); }
        user.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn sample_new_user() -> NewUser {
        NewUser {
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            email: "ada@example.com".to_string(),
            password: "password1".to_string(),
            role: Role::Patient,
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            height: 165.0,
            weight: 58.0,
            blood_type: BloodType::ONegative,
            past_medical_issues: None,
            allergies: Some("Peanuts".to_string()),
            current_health_issues: None,
        }
    }

    #[test]
    fn test_blood_type_serde_labels() {
        let labels: Vec<String> = BloodType::ALL.iter().map(|b| b.to_string()).collect();
        assert_eq!(labels, ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"]);

        for blood_type in BloodType::ALL {
            let json = serde_json::to_value(blood_type).unwrap();
            assert_eq!(json, json!(blood_type.to_string()));
        }
    }

    #[test]
    fn test_into_record_sets_status_defaults() {
        let now = Utc::now();
        let (user, password) = sample_new_user().into_record("user-1".to_string(), now);

        assert_eq!(password, "password1");
        assert!(user.is_active);
        assert!(!user.is_email_verified);
        assert_eq!(user.created_at, now);
        assert_eq!(user.updated_at, now);
    }

    #[test]
    fn test_user_serialization_has_no_password() {
        let (user, _) = sample_new_user().into_record("user-1".to_string(), Utc::now());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["_id"], "user-1");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["bloodType"], "O-");
        assert_eq!(json["dateOfBirth"], "1990-12-10");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_user_ignores_stored_password_on_read() {
        let (user, _) = sample_new_user().into_record("user-1".to_string(), Utc::now());
        let mut stored = serde_json::to_value(&user).unwrap();
        stored["password"] = json!("$argon2id$v=19$...");

        let read: User = serde_json::from_value(stored).unwrap();
        assert_eq!(read, user);
    }

    #[test]
    fn test_profile_changes() {
        let (mut user, _) = sample_new_user().into_record("user-1".to_string(), Utc::now());
        assert!(ProfileChanges::default().is_empty());

        let changes = ProfileChanges {
            weight: Some(61.5),
            blood_type: Some(BloodType::APositive),
            ..Default::default()
        };
        assert!(!changes.is_empty());

        let later = user.updated_at + chrono::Duration::minutes(5);
        changes.apply(&mut user, later);

        assert_eq!(user.weight, 61.5);
        assert_matches!(user.blood_type, BloodType::APositive);
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.updated_at, later);

        let set = serde_json::to_value(&changes).unwrap();
        assert_eq!(set, json!({ "weight": 61.5, "bloodType": "A+" }));
    }

    #[test]
    fn test_profile_changes_clear_health_notes() {
        let (mut user, _) = sample_new_user().into_record("user-1".to_string(), Utc::now());
        assert_eq!(user.allergies.as_deref(), Some("Peanuts"));

        let changes = ProfileChanges {
            allergies: Some(None),
            past_medical_issues: Some(Some("Asthma".to_string())),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply(&mut user, Utc::now());

        assert_eq!(user.allergies, None);
        assert_eq!(user.past_medical_issues.as_deref(), Some("Asthma"));

        let set = serde_json::to_value(&changes).unwrap();
        assert_eq!(set, json!({ "allergies": null, "pastMedicalIssues": "Asthma" }));
    }
}
