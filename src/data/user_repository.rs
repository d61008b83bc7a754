use crate::data::db::{duplicate_email, parse_uuid};
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: NaiveDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: NewUser) -> Result<User> {
        let id = Uuid::new_v4();
        trace!(user_id = %id, "Inserting user row");
        let row: UserRow = sqlx::query_as(
            r#"
                INSERT INTO users (id, name, email, password_hash)
                VALUES (?, ?, ?, ?)
                RETURNING *
            "#,
        )
        .bind(id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(duplicate_email(user.email.clone()))?;
        debug!(user_id = %id, "User saved");
        row.try_into()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        if row.is_none() {
            trace!(user_id = %id, "User not found");
        }
        row.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        if row.is_none() {
            trace!(email = email, "User not found");
        }
        row.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY created_at, email")
            .fetch_all(&self.pool)
            .await?;
        debug!(count = rows.len(), "Users loaded");
        rows.into_iter().map(User::try_from).collect()
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn update(&self, id: Uuid, user: NewUser) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
                UPDATE users SET name = ?, email = ?, password_hash = ?
                WHERE id = ?
                RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(duplicate_email(user.email.clone()))?;
        row.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        debug!(user_id = %id, deleted = result.rows_affected(), "User delete executed");
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
