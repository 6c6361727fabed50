use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Field name → message, as returned under `details` in a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Records the error of a failed check and passes a successful value through.
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    /// Keeps only the errors for the given fields.
    pub fn only(&self, fields: &[&str]) -> FieldErrors {
        FieldErrors(
            self.0
                .iter()
                .filter(|(field, _)| fields.contains(&field.as_str()))
                .map(|(field, message)| (field.clone(), message.clone()))
                .collect(),
        )
    }
}

/// A numeric form field. HTML forms post numbers as strings, API clients as numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// `None` for an empty string, `Some(Err(()))` for text that is not a finite number.
    pub fn value(&self) -> Option<Result<f64, ()>> {
        match self {
            NumberInput::Number(n) if n.is_finite() => Some(Ok(*n)),
            NumberInput::Number(_) => Some(Err(())),
            NumberInput::Text(s) if s.trim().is_empty() => None,
            NumberInput::Text(s) => Some(s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).ok_or(())),
        }
    }
}

/// Trims a free-text field and treats blank input as absent.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Length as the web client counts it: UTF-16 code units, so an emoji counts as two.
pub fn text_length(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Comma-separated list of the accepted values, for "must be one of" messages.
pub fn one_of<T: Display>(values: &[T]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Parses a closed string enum through its serde representation.
pub fn parse_enum<T: DeserializeOwned>(raw: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string())).ok()
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Accepts an RFC 3339 timestamp or a bare date (taken as midnight UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}
