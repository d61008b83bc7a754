use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, RegisterUser, UpdateUser, User, normalize_email};
use crate::infrastructure::security::hash_password;
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

fn hash(password: &str) -> Result<String> {
    hash_password(password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        DomainError::Internal(format!("Failed to hash password: {}", e)).into()
    })
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn create(&self, req: RegisterUser) -> Result<User> {
        req.validate().into_result()?;
        let email = normalize_email(&req.email);
        if self.repository.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "Email already registered");
            return Err(DomainError::EmailAlreadyExists(email).into());
        }

        let user = self
            .repository
            .create(NewUser {
                name: req.name.trim().to_string(),
                email,
                password_hash: hash(&req.password)?,
            })
            .await?;
        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id).into())
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<User> {
        let email = normalize_email(email);
        self.repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::not_found("User", &email).into())
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<User>> {
        self.repository.find_all().await
    }

    /// Email uniqueness is re-checked only when the email changes; a blank password
    /// keeps the stored hash.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn update(&self, id: Uuid, req: UpdateUser) -> Result<User> {
        req.validate().into_result()?;
        let current = self.find_by_id(id).await?;

        let email = normalize_email(&req.email);
        if email != current.email && self.repository.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "Email already registered");
            return Err(DomainError::EmailAlreadyExists(email).into());
        }

        let password_hash = match req.new_password() {
            Some(password) => hash(password)?,
            None => current.password_hash,
        };

        let user = self
            .repository
            .update(
                id,
                NewUser {
                    name: req.name.trim().to_string(),
                    email,
                    password_hash,
                },
            )
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;
        info!(user_id = %id, "User updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.repository.delete(id).await? {
            warn!(user_id = %id, "Delete requested for missing user");
            return Err(DomainError::not_found("User", id).into());
        }
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.repository.find_by_id(id).await?.is_some())
    }

    pub async fn count(&self) -> Result<i64> {
        self.repository.count().await
    }
}
