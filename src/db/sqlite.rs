use crate::config::DB_VERSION;
use crate::db::models::{DbForm, DbSubmission, NewSubmission};
use crate::db::schema::{SEED_FORM_DESCRIPTION, SEED_FORM_TITLE, SQLITE_INIT};
use crate::error::FormsError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

const DB_VERSION_OPTION: &str = "db_version";

/// `YYYY-MM-DD HH:MM:SS` in UTC, the format SQLite's `CURRENT_TIMESTAMP` uses.
fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[derive(Clone)]
pub struct FormsStorage {
    pool: SqlitePool,
}

impl FormsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, FormsError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        Ok(Self::new(pool))
    }

    /// Private in-memory database. Pinned to one connection that is never
    /// recycled, since every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, FormsError> {
        let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_opts)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bring the schema up to date and seed the demo form.
    ///
    /// The DDL only runs when the stored version marker differs from
    /// [`DB_VERSION`]; seeding happens whenever the forms table is empty.
    pub async fn initialize(&self) -> Result<(), FormsError> {
        let stored = self.db_version().await?;
        if stored.as_deref() != Some(DB_VERSION) {
            info!(
                from = stored.as_deref().unwrap_or("<none>"),
                to = DB_VERSION,
                "applying forms schema"
            );
            self.init_schema().await?;
        }

        if self.count_forms().await? == 0 {
            let id = self
                .create_form(SEED_FORM_TITLE, Some(SEED_FORM_DESCRIPTION))
                .await?;
            info!(form_id = id, "seeded demo form");
        }

        if stored.as_deref() != Some(DB_VERSION) {
            self.set_db_version(DB_VERSION).await?;
        }
        Ok(())
    }

    /// Execute the bundled DDL. Trigger bodies contain `;`, so the script
    /// goes through `raw_sql` instead of being split per statement.
    pub async fn init_schema(&self) -> Result<(), FormsError> {
        sqlx::raw_sql(SQLITE_INIT).execute(&self.pool).await?;
        Ok(())
    }

    /// Stored schema version, `None` before the first initialization.
    pub async fn db_version(&self) -> Result<Option<String>, FormsError> {
        let (tables,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'options'",
        )
        .fetch_one(&self.pool)
        .await?;
        if tables == 0 {
            return Ok(None);
        }

        let rec: Option<(String,)> = sqlx::query_as("SELECT value FROM options WHERE name = ?")
            .bind(DB_VERSION_OPTION)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rec.map(|r| r.0))
    }

    async fn set_db_version(&self, version: &str) -> Result<(), FormsError> {
        sqlx::query(
            r#"INSERT INTO options (name, value) VALUES (?, ?)
               ON CONFLICT(name) DO UPDATE SET value = excluded.value"#,
        )
        .bind(DB_VERSION_OPTION)
        .bind(version)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a form and return its id. Administrative path, not an operation.
    pub async fn create_form(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<i64, FormsError> {
        let now = now_timestamp();
        let result = sqlx::query(
            "INSERT INTO forms (title, description, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(title)
        .bind(description)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn form_exists(&self, form_id: i64) -> Result<bool, FormsError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forms WHERE id = ?")
            .bind(form_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn count_forms(&self) -> Result<i64, FormsError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forms")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn list_forms(&self) -> Result<Vec<DbForm>, FormsError> {
        let rows = sqlx::query_as::<_, DbForm>(
            r#"SELECT id, title, description, created_at, updated_at
               FROM forms ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert_submission(&self, new: NewSubmission) -> Result<i64, FormsError> {
        let result = sqlx::query(
            r#"INSERT INTO submissions (form_id, name, email, message, submitted_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(new.form_id)
        .bind(new.name)
        .bind(new.email)
        .bind(new.message)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn get_submission(&self, id: i64) -> Result<Option<DbSubmission>, FormsError> {
        let row = sqlx::query_as::<_, DbSubmission>(
            r#"SELECT id, form_id, name, email, message, submitted_at
               FROM submissions WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn count_submissions(&self) -> Result<i64, FormsError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM submissions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_submissions_for_form(&self, form_id: i64) -> Result<i64, FormsError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM submissions WHERE form_id = ?")
            .bind(form_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
