/// User accounts and sessions
///
/// # Operations
///
/// - `register`: create an account (id chosen by the client)
/// - `login`: verify credentials, issue a token pair
/// - `logout`: clear the token pair
/// - `current`: profile of the authenticated user
/// - `update`: change name and/or password
/// - `refresh_token`: exchange a refresh token for a new pair

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use super::{UseCaseError, UseCaseResult};
use crate::auth::authenticator::{AuthContext, TokenAuthenticator};
use crate::auth::password::{self, PasswordParams};
use crate::auth::token::TokenPair;
use crate::models::user::{NewUser, UpdateUser, User};
use crate::repository::UserRepository;

const BAD_CREDENTIALS: &str = "Username or password is wrong";

/// Register request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub id: String,

    #[validate(length(min = 1, max = 100))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub id: String,

    #[validate(length(min = 1, max = 100))]
    pub password: String,
}

/// Profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub password: Option<String>,
}

/// Refresh request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Public user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Plaintext token pair returned by login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            token: pair.token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// User operations
#[derive(Clone)]
pub struct UserUseCase {
    users: Arc<dyn UserRepository>,
    authenticator: TokenAuthenticator,
    password_params: PasswordParams,
}

impl UserUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        authenticator: TokenAuthenticator,
        password_params: PasswordParams,
    ) -> Self {
        Self {
            users,
            authenticator,
            password_params,
        }
    }

    /// Creates an account
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is missing or too long
    /// - `Conflict` if the id is taken (checked up front and enforced by the
    ///   primary key for concurrent registrations)
    pub async fn register(&self, request: RegisterUserRequest) -> UseCaseResult<UserResponse> {
        request.validate()?;

        if self.users.find_by_id(&request.id).await?.is_some() {
            warn!(user_id = %request.id, "Registration for existing user id");
            return Err(UseCaseError::Conflict("User already exists".to_string()));
        }

        let password_hash = password::hash_password(&request.password, &self.password_params)?;

        let user = self
            .users
            .create(NewUser {
                id: request.id,
                name: request.name,
                password: password_hash,
            })
            .await
            .map_err(|e| match UseCaseError::from(e) {
                UseCaseError::Conflict(_) => {
                    UseCaseError::Conflict("User already exists".to_string())
                }
                other => other,
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user.into())
    }

    /// Verifies credentials and issues a new token pair
    ///
    /// Unknown id and wrong password produce the same error.
    pub async fn login(&self, request: LoginUserRequest) -> UseCaseResult<TokenResponse> {
        request.validate()?;

        let user = self
            .users
            .find_by_id(&request.id)
            .await?
            .ok_or_else(|| UseCaseError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

        if !password::verify_password(&request.password, &user.password)? {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(UseCaseError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        let pair = self.authenticator.issue(&user.id).await?;

        info!(user_id = %user.id, "User logged in");
        Ok(pair.into())
    }

    /// Clears the caller's token pair
    pub async fn logout(&self, auth: &AuthContext) -> UseCaseResult<bool> {
        self.authenticator.revoke(&auth.user_id).await?;

        info!(user_id = %auth.user_id, "User logged out");
        Ok(true)
    }

    /// Profile of the authenticated user
    pub async fn current(&self, auth: &AuthContext) -> UseCaseResult<UserResponse> {
        let user = self
            .users
            .find_by_id(&auth.user_id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("User is not found".to_string()))?;

        Ok(user.into())
    }

    /// Updates name and/or password; the password is re-hashed
    pub async fn update(
        &self,
        auth: &AuthContext,
        request: UpdateUserRequest,
    ) -> UseCaseResult<UserResponse> {
        request.validate()?;

        let password = request
            .password
            .as_deref()
            .map(|p| password::hash_password(p, &self.password_params))
            .transpose()?;

        let user = self
            .users
            .update(
                &auth.user_id,
                UpdateUser {
                    name: request.name,
                    password,
                },
            )
            .await?
            .ok_or_else(|| UseCaseError::NotFound("User is not found".to_string()))?;

        info!(user_id = %user.id, "User updated");
        Ok(user.into())
    }

    /// Rotates the token pair owning `refresh_token`
    pub async fn refresh_token(&self, request: RefreshTokenRequest) -> UseCaseResult<TokenResponse> {
        request.validate()?;

        let (user, pair) = self.authenticator.refresh(&request.refresh_token).await?;

        info!(user_id = %user.id, "Token pair refreshed");
        Ok(pair.into())
    }
}
