/// Token authenticator
///
/// Owns the whole session-token lifecycle:
///
/// ```text
/// login    ──> issue()        token pair stored (digests), plaintext returned
/// request  ──> authenticate() digest(token) == users.token ?  AuthContext : 401
/// refresh  ──> refresh()      pair rotated atomically, old pair dead
/// logout   ──> revoke()       both digests cleared
/// ```
///
/// Tokens never expire on their own; only refresh and logout invalidate them.
///
/// # Example
///
/// ```
/// use contactbook_shared::auth::authenticator::TokenAuthenticator;
/// use contactbook_shared::models::user::NewUser;
/// use contactbook_shared::repository::{Repositories, UserRepository};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repos = Repositories::memory();
/// repos.users.create(NewUser {
///     id: "jane".to_string(),
///     name: "Jane".to_string(),
///     password: "$argon2id$...".to_string(),
/// }).await?;
///
/// let authenticator = TokenAuthenticator::new(repos.users.clone());
/// let pair = authenticator.issue("jane").await?;
///
/// let auth = authenticator.authenticate(&pair.token).await?;
/// assert_eq!(auth.user_id, "jane");
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::token::{self, TokenPair};
use crate::models::user::User;
use crate::repository::{RepositoryError, UserRepository};

/// Authenticated caller, attached to the request after the auth gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Id of the user the token belongs to
    pub user_id: String,
}

impl AuthContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No token was presented
    #[error("Missing credentials")]
    MissingCredentials,

    /// The token is malformed or matches no session
    #[error("Invalid token")]
    InvalidToken,

    /// The refresh token matches no session
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// The user vanished between lookup and token write
    #[error("User not found")]
    UserNotFound,

    /// Store failure
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Verifies, issues, rotates and revokes session tokens
#[derive(Clone)]
pub struct TokenAuthenticator {
    users: Arc<dyn UserRepository>,
}

impl TokenAuthenticator {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Resolves a presented session token to its user
    ///
    /// Blank or malformed tokens are rejected without a store lookup.
    pub async fn authenticate(&self, presented: &str) -> Result<AuthContext, AuthError> {
        let presented = presented.trim();
        if presented.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if !token::is_well_formed(presented) {
            debug!("Rejected malformed token");
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .users
            .find_by_token(&token::digest_token(presented))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(AuthContext::new(user.id))
    }

    /// Issues a fresh token pair for `user_id`, replacing any previous one
    pub async fn issue(&self, user_id: &str) -> Result<TokenPair, AuthError> {
        let pair = TokenPair::generate();
        let (token_digest, refresh_digest) = pair.digests();

        let stored = self
            .users
            .set_tokens(user_id, Some(token_digest), Some(refresh_digest))
            .await?;
        if !stored {
            return Err(AuthError::UserNotFound);
        }

        debug!(user_id = %user_id, "Issued token pair");
        Ok(pair)
    }

    /// Exchanges a refresh token for a new pair, invalidating the old one
    pub async fn refresh(&self, refresh_token: &str) -> Result<(User, TokenPair), AuthError> {
        let refresh_token = refresh_token.trim();
        if !token::is_well_formed(refresh_token) {
            return Err(AuthError::InvalidRefreshToken);
        }

        let pair = TokenPair::generate();
        let (token_digest, refresh_digest) = pair.digests();

        let user = self
            .users
            .rotate_tokens(
                &token::digest_token(refresh_token),
                token_digest,
                refresh_digest,
            )
            .await?
            .ok_or_else(|| {
                warn!("Refresh attempted with unknown refresh token");
                AuthError::InvalidRefreshToken
            })?;

        debug!(user_id = %user.id, "Rotated token pair");
        Ok((user, pair))
    }

    /// Clears the stored token pair of `user_id`
    pub async fn revoke(&self, user_id: &str) -> Result<(), AuthError> {
        if !self.users.set_tokens(user_id, None, None).await? {
            return Err(AuthError::UserNotFound);
        }

        debug!(user_id = %user_id, "Revoked token pair");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::NewUser;
    use crate::repository::MemoryStore;

    async fn setup() -> TokenAuthenticator {
        let store = Arc::new(MemoryStore::new());
        store
            .create(NewUser {
                id: "jane".to_string(),
                name: "Jane".to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap();
        TokenAuthenticator::new(store)
    }

    #[tokio::test]
    async fn test_issue_then_authenticate() {
        let auth = setup().await;
        let pair = auth.issue("jane").await.unwrap();

        let context = auth.authenticate(&pair.token).await.unwrap();
        assert_eq!(context, AuthContext::new("jane"));
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_a_session_token() {
        let auth = setup().await;
        let pair = auth.issue("jane").await.unwrap();

        assert!(matches!(
            auth.authenticate(&pair.refresh_token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_blank_and_malformed_tokens() {
        let auth = setup().await;

        assert!(matches!(
            auth.authenticate("").await,
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            auth.authenticate("   ").await,
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            auth.authenticate("not-a-token").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_unknown_well_formed_token() {
        let auth = setup().await;
        let stranger = token::generate_token();

        assert!(matches!(
            auth.authenticate(&stranger).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_refresh_invalidates_previous_pair() {
        let auth = setup().await;
        let first = auth.issue("jane").await.unwrap();

        let (user, second) = auth.refresh(&first.refresh_token).await.unwrap();
        assert_eq!(user.id, "jane");

        assert!(auth.authenticate(&first.token).await.is_err());
        assert!(auth.authenticate(&second.token).await.is_ok());
        assert!(matches!(
            auth.refresh(&first.refresh_token).await,
            Err(AuthError::InvalidRefreshToken)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_refresh_succeeds_once() {
        let auth = setup().await;
        let pair = auth.issue("jane").await.unwrap();

        let (a, b) = (auth.clone(), auth.clone());
        let (ra, rb) = (pair.refresh_token.clone(), pair.refresh_token.clone());
        let (first, second) = tokio::join!(
            tokio::spawn(async move { a.refresh(&ra).await }),
            tokio::spawn(async move { b.refresh(&rb).await }),
        );
        let results = [first.unwrap(), second.unwrap()];

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AuthError::InvalidRefreshToken))));

        let (_, fresh) = winners[0];
        assert!(auth.authenticate(&fresh.token).await.is_ok());
        assert!(auth.authenticate(&pair.token).await.is_err());
    }

    #[tokio::test]
    async fn test_revoke_clears_session() {
        let auth = setup().await;
        let pair = auth.issue("jane").await.unwrap();

        auth.revoke("jane").await.unwrap();

        assert!(auth.authenticate(&pair.token).await.is_err());
        assert!(auth.refresh(&pair.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_issue_for_unknown_user() {
        let auth = setup().await;
        assert!(matches!(auth.issue("ghost").await, Err(AuthError::UserNotFound)));
        assert!(matches!(auth.revoke("ghost").await, Err(AuthError::UserNotFound)));
    }
}
