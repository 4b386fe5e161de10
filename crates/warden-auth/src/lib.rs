//! Warden Auth — credential hashing, HS512 access token
//! issuance/validation, and the register/login service.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult, ErrorKind};
pub use service::{CredentialService, LoginInput, LoginOutput, RegisterInput};
pub use token::AccessTokenClaims;
