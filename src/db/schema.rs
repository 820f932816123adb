//! SQL DDL for initializing the forms storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `forms` and `submissions`, both keyed by `INTEGER PRIMARY KEY AUTOINCREMENT`
/// - `submissions.form_id` indexed but not constrained (checked at submit time only)
/// - length checks on submission fields, so sanitized-away values fail the insert
/// - a trigger keeping `forms.updated_at` current on every row update
/// - `options` holding the schema version marker
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS forms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TRIGGER IF NOT EXISTS forms_touch_updated_at
AFTER UPDATE ON forms
FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
BEGIN
    UPDATE forms SET updated_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
END;

CREATE TABLE IF NOT EXISTS submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    form_id INTEGER NOT NULL,
    name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 255),
    email TEXT NOT NULL CHECK (length(email) BETWEEN 1 AND 255),
    message TEXT NOT NULL CHECK (length(message) >= 1),
    submitted_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_submissions_form_id ON submissions(form_id);

CREATE TABLE IF NOT EXISTS options (
    name TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Form inserted when the store is initialized with an empty forms table.
pub const SEED_FORM_TITLE: &str = "Contact Form";
pub const SEED_FORM_DESCRIPTION: &str = "A simple contact form for demonstration purposes.";
