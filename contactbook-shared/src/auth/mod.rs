/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Opaque token generation and SHA-256 digests
/// - [`authenticator`]: Token lifecycle (authenticate, issue, refresh, revoke)
///   and the per-request [`authenticator::AuthContext`]
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id, tunable cost, parameters stored in the hash
/// - **Tokens**: 48-char random base62, stored only as SHA-256 digests
/// - **Refresh**: single conditional update, so a refresh token works once

pub mod authenticator;
pub mod password;
pub mod token;
