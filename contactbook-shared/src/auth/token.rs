/// Opaque session and refresh tokens
///
/// # Format
///
/// 48 random base62 characters (`[A-Za-z0-9]`), roughly 285 bits of entropy.
/// The client receives the plaintext token; the database stores only its
/// SHA-256 hex digest, so lookup is "hash what was presented, match exactly".
///
/// # Example
///
/// ```
/// use contactbook_shared::auth::token::{digest_token, generate_token, is_well_formed, TOKEN_LENGTH};
///
/// let token = generate_token();
/// assert_eq!(token.len(), TOKEN_LENGTH);
/// assert!(is_well_formed(&token));
///
/// // Deterministic digest
/// assert_eq!(digest_token(&token), digest_token(&token));
/// assert_eq!(digest_token(&token).len(), 64);
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a generated token (characters)
pub const TOKEN_LENGTH: usize = 48;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Session token plus refresh token, in plaintext, as handed to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

impl TokenPair {
    /// Generates a fresh random pair
    pub fn generate() -> Self {
        Self {
            token: generate_token(),
            refresh_token: generate_token(),
        }
    }

    /// Digests of both tokens, in `(token, refresh_token)` order
    pub fn digests(&self) -> (String, String) {
        (digest_token(&self.token), digest_token(&self.refresh_token))
    }
}

/// Generates a random base62 token of [`TOKEN_LENGTH`] characters
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();

    (0..TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hex-encoded SHA-256 digest used as the stored form of a token
pub fn digest_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Checks length and alphabet without touching the database
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.chars().all(|c| c.is_ascii_alphanumeric())
}
