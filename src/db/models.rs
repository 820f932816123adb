use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbForm {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbSubmission {
    pub id: i64,
    pub form_id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: String,
}

/// Column values for a submission about to be inserted.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub form_id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
}
