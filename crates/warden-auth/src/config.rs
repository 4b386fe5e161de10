//! Authentication configuration.

use serde::Deserialize;

/// Longest accepted access token lifetime: one year.
pub const MAX_TOKEN_LIFETIME_HOURS: i64 = 24 * 365;

/// Configuration for the credential service.
///
/// Loaded once at startup and treated as immutable afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret for HS512 token signing and verification.
    pub jwt_secret: String,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Access token lifetime in hours (default: 24).
    pub token_lifetime_hours: i64,
    /// Clock-skew tolerance for `exp`/`nbf` checks in seconds (default: 5).
    pub leeway_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: "warden".into(),
            token_lifetime_hours: 24,
            leeway_secs: 5,
        }
    }
}
