//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::{AuthConfig, LibraryConfig},
    error::{AppError, AppResult},
    models::user::{CreateUser, LoginRequest, Role, UpdateUser, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    list_limit: i64,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, library: &LibraryConfig) -> Self {
        Self {
            repository,
            config,
            list_limit: library.list_limit,
        }
    }

    /// Authenticate by email and password, returning a signed JWT and the user
    pub async fn authenticate(&self, request: LoginRequest) -> AppResult<(String, User)> {
        let request = request.prepare()?;

        let user = self
            .repository
            .users
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !verify_password(&user.password, &request.password)? {
            tracing::warn!("Rejected login for user {}", user.id);
            return Err(AppError::Authentication("Invalid email or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in", user.id);
        Ok((token, user))
    }

    /// Create JWT token for a user
    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Validate a bearer token
    pub fn verify_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Unauthorized".to_string()))
    }

    /// Register a new account.
    /// The admin role needs either open admin signup or an admin caller.
    pub async fn signup(&self, request: CreateUser, caller: Option<&UserClaims>) -> AppResult<User> {
        let (request, role) = request.prepare()?;

        if role == Role::Admin
            && !self.config.allow_admin_signup
            && !caller.map(UserClaims::is_admin).unwrap_or(false)
        {
            return Err(AppError::Authorization(
                "Only administrators can create admin accounts".to_string(),
            ));
        }

        if self.repository.users.email_exists(&request.email, None).await? {
            return Err(AppError::Conflict("Email Already Taken".to_string()));
        }

        let password = hash_password(&request.password)?;
        let user = self.repository.users.create(&request.email, &password, role).await?;
        tracing::info!("Created {} account {}", user.role, user.id);
        Ok(user)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list(self.list_limit).await
    }

    /// Change a user's email and password
    pub async fn update_user(&self, id: i32, request: UpdateUser) -> AppResult<User> {
        let request = request.prepare()?;

        self.repository.users.get_by_id(id).await?;

        if self.repository.users.email_exists(&request.email, Some(id)).await? {
            return Err(AppError::Conflict("Email Already Taken".to_string()));
        }

        let password = hash_password(&request.password)?;
        let user = self
            .repository
            .users
            .update_credentials(id, &request.email, &password)
            .await?;
        tracing::info!("Updated credentials of user {}", id);
        Ok(user)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
