use crate::domain::error::DomainError;
use crate::infrastructure::config::DatabaseSettings;
use anyhow::Context;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{info, instrument, warn};

#[instrument(skip(settings), fields(url = %settings.url))]
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("Invalid database url: {}", settings.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .context("Could not connect to database")?;
    info!("Database pool created");
    Ok(pool)
}

/// Single-connection in-memory database; the connection never recycles so the
/// schema lives as long as the pool.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("Could not open in-memory database")?;
    migrate(&pool).await?;
    Ok(pool)
}

#[instrument(skip(pool))]
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");
    Ok(())
}

/// Case-insensitive substring match with full Unicode folding. SQLite's
/// `LOWER()` and `LIKE` only fold ASCII, so text filters run here.
pub(crate) fn contains_ignore_case(text: &str, term: &str) -> bool {
    text.to_lowercase().contains(&term.trim().to_lowercase())
}

pub(crate) fn eq_ignore_case(text: &str, other: &str) -> bool {
    text.trim().to_lowercase() == other.trim().to_lowercase()
}

/// Insert failure for a row whose owning user no longer exists.
pub(crate) fn missing_owner(user_id: uuid::Uuid) -> impl FnOnce(sqlx::Error) -> anyhow::Error {
    move |err: sqlx::Error| -> anyhow::Error {
        if let sqlx::Error::Database(db) = &err {
            if db.is_foreign_key_violation() {
                warn!(user_id = %user_id, "Owner row is gone");
                return DomainError::not_found("User", user_id).into();
            }
        }
        err.into()
    }
}

/// Write failure on the unique email index, as seen by the loser of a race.
pub(crate) fn duplicate_email(email: String) -> impl FnOnce(sqlx::Error) -> anyhow::Error {
    move |err: sqlx::Error| -> anyhow::Error {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                warn!(email = %email, "Email already registered");
                return DomainError::EmailAlreadyExists(email).into();
            }
        }
        err.into()
    }
}

pub(crate) fn parse_uuid(value: &str) -> anyhow::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(value).with_context(|| format!("Corrupt uuid column: {}", value))
}

pub(crate) fn parse_decimal(value: &str) -> anyhow::Result<rust_decimal::Decimal> {
    rust_decimal::Decimal::from_str(value)
        .with_context(|| format!("Corrupt decimal column: {}", value))
}

pub(crate) fn parse_code<T>(value: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = crate::domain::enums::UnknownCode>,
{
    Ok(T::from_str(value)?)
}
