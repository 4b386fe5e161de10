//! Authentication error types.
//!
//! [`AuthError`] is the closed taxonomy returned to callers of the
//! credential service. Transport layers match on [`AuthError::kind`]
//! to pick a wire status; the `Display` text is safe to send to
//! clients and never contains storage details.

use thiserror::Error;

/// Outward error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Conflict,
    Unauthorized,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConflictReason {
    #[error("email already exists")]
    EmailAlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnauthorizedReason {
    /// Unknown email and wrong password both land here.
    #[error("invalid login info")]
    InvalidLoginInfo,

    #[error("invalid token")]
    InvalidToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Conflict(ConflictReason),

    #[error(transparent)]
    Unauthorized(UnauthorizedReason),

    #[error("internal server error")]
    Internal,
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthError::Internal => ErrorKind::Internal,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Errors from token issuance and validation.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),

    /// Any validation failure: malformed, bad signature, expired,
    /// not yet valid, empty subject or issuer mismatch.
    #[error("invalid token")]
    Unauthorized,
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => AuthError::Internal,
            TokenError::Unauthorized => AuthError::Unauthorized(UnauthorizedReason::InvalidToken),
        }
    }
}
