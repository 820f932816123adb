use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::models::{DbForm, DbSubmission};

/// Integer coercion for loosely typed payloads: integers pass through,
/// floats truncate, numeric strings parse by their leading digits, booleans
/// map to 0/1 and everything else (including a missing field) is 0.
pub fn coerce_int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => leading_int(s.trim()),
        Some(Value::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

fn leading_int(s: &str) -> i64 {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

fn string_field(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "1".to_string(),
        _ => String::new(),
    }
}

/// Raw (unsanitized) submit input.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitFormInput {
    pub form_id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
}

impl SubmitFormInput {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            form_id: coerce_int(payload.get("form_id")),
            name: string_field(payload, "name"),
            email: string_field(payload, "email"),
            message: string_field(payload, "message"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetSubmissionInput {
    pub submission_id: i64,
}

impl GetSubmissionInput {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            submission_id: coerce_int(payload.get("submission_id")),
        }
    }
}

/// `form_id` is `None` unless the payload carries a positive id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSubmissionsInput {
    pub form_id: Option<i64>,
}

impl CountSubmissionsInput {
    pub fn from_payload(payload: &Value) -> Self {
        let form_id = coerce_int(payload.get("form_id"));
        Self {
            form_id: (form_id > 0).then_some(form_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitFormOutput {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<i64>,
    pub message: String,
}

impl SubmitFormOutput {
    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            submission_id: None,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionRecord {
    pub id: i64,
    pub form_id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: String,
}

impl From<DbSubmission> for SubmissionRecord {
    fn from(d: DbSubmission) -> Self {
        Self {
            id: d.id,
            form_id: d.form_id,
            name: d.name,
            email: d.email,
            message: d.message,
            submitted_at: d.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetSubmissionOutput {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionRecord>,
    pub message: String,
}

impl GetSubmissionOutput {
    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            submission: None,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormRecord {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DbForm> for FormRecord {
    fn from(d: DbForm) -> Self {
        Self {
            id: d.id,
            title: d.title,
            description: d.description,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountFormsOutput {
    pub count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forms: Option<Vec<FormRecord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountSubmissionsOutput {
    pub count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<i64>,
}
