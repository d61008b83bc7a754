use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{AuthResponse, LoginRequest, NewUser, RegisterUser, User, normalize_email};
use crate::infrastructure::config::JwtSettings;
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt: JwtSettings,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt: JwtSettings) -> Self {
        Self {
            user_repository,
            jwt,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterUser) -> Result<AuthResponse> {
        trace!("Starting user registration");
        req.validate().into_result()?;

        let email = normalize_email(&req.email);
        if self.user_repository.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "Email already registered");
            return Err(DomainError::EmailAlreadyExists(email).into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        debug!(email = %email, "Saving user to repository");
        let user = self
            .user_repository
            .create(NewUser {
                name: req.name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "User registered successfully");
        self.issue(user)
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        trace!("Starting login");
        req.validate().into_result()?;

        let email = normalize_email(&req.email);
        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, "User not found during login");
                DomainError::InvalidCredentials
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::InvalidCredentials.into());
        }

        info!(user_id = %user.id, "Login successful");
        self.issue(user)
    }

    fn issue(&self, user: User) -> Result<AuthResponse> {
        let token = generate_token(user.id, &user.email, &self.jwt.secret, self.jwt.expiration)
            .map_err(|e| {
                error!(error = %e, "Failed to generate token");
                DomainError::Internal(format!("Failed to generate token: {}", e))
            })?;

        Ok(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expiration,
            user_id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        })
    }
}
