//! Persistence for forms and their submissions.
//!
//! - `schema.rs`: DDL, the `updated_at` trigger and the seed form
//! - `models.rs`: row structs read back through `FromRow`
//! - `sqlite.rs`: [`FormsStorage`], the only code that issues SQL

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbForm, DbSubmission, NewSubmission};
pub use schema::{SEED_FORM_DESCRIPTION, SEED_FORM_TITLE, SQLITE_INIT};
pub use sqlite::{FormsStorage, SqlitePool};
