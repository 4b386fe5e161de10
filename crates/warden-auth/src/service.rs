//! Credential service — registration and login orchestration.

use chrono::{DateTime, Utc};
use tracing::error;
use uuid::Uuid;
use warden_core::error::CoreError;
use warden_core::models::account::NewAccount;
use warden_core::repository::AccountRepository;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult, ConflictReason, UnauthorizedReason};
use crate::password;
use crate::token;

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Signed HS512 access token.
    pub token: String,
    /// Instant the access token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Credential service.
///
/// Generic over the account repository so that the auth layer has no
/// dependency on the database crate. Holds no per-request state; a
/// single instance can serve concurrent calls.
pub struct CredentialService<R: AccountRepository> {
    account_repo: R,
    config: AuthConfig,
}

impl<R: AccountRepository> CredentialService<R> {
    pub fn new(account_repo: R, config: AuthConfig) -> Self {
        Self {
            account_repo,
            config,
        }
    }

    /// Register a new account.
    ///
    /// The existence check is only a pre-check; the repository's
    /// unique constraint decides races between concurrent registrations.
    pub async fn register(&self, input: RegisterInput) -> AuthResult<()> {
        // 1. Reject known emails early.
        let exists = self
            .account_repo
            .exists_by_email(&input.email)
            .await
            .map_err(|e| {
                error!(error = %e, "account existence check failed");
                AuthError::Internal
            })?;

        if exists {
            return Err(AuthError::Conflict(ConflictReason::EmailAlreadyExists));
        }

        // 2. Assign an identifier and hash the password.
        let account = NewAccount {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password_hash: password::hash_password(&input.password),
        };

        // 3. Persist. A duplicate that slipped past the pre-check is
        //    still a conflict.
        match self.account_repo.create(account).await {
            Ok(_) => Ok(()),
            Err(CoreError::AlreadyExists { .. }) => {
                Err(AuthError::Conflict(ConflictReason::EmailAlreadyExists))
            }
            Err(e) => {
                error!(error = %e, "account insert failed");
                Err(AuthError::Internal)
            }
        }
    }

    /// Authenticate with email + password and issue an access token.
    ///
    /// Unknown email and wrong password produce the same
    /// [`UnauthorizedReason::InvalidLoginInfo`] error.
    pub async fn login(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // 1. Hash the submitted password for comparison.
        let password_hash = password::hash_password(&input.password);

        // 2. Look up the account matching both email and secret.
        let account = self
            .account_repo
            .find_by_email_and_secret(&input.email, &password_hash)
            .await
            .map_err(|e| match e {
                CoreError::NotFound { .. } => {
                    AuthError::Unauthorized(UnauthorizedReason::InvalidLoginInfo)
                }
                other => {
                    error!(error = %other, "account lookup failed");
                    AuthError::Internal
                }
            })?;

        // 3. Issue the access token.
        let signed = token::issue_access_token(
            &account.id.to_string(),
            &self.config.jwt_secret,
            &self.config.jwt_issuer,
            self.config.token_lifetime_hours,
        )
        .and_then(|token| {
            let expires_at = token::expiry(Utc::now(), self.config.token_lifetime_hours)?;
            Ok((token, expires_at))
        });
        let (token, expires_at) = signed.map_err(|e| {
            error!(error = %e, "access token signing failed");
            AuthError::from(e)
        })?;

        Ok(LoginOutput {
            id: account.id,
            name: account.name,
            email: account.email,
            token,
            expires_at,
        })
    }

    /// Validate a presented access token and return the account ID it
    /// asserts.
    pub fn authenticate(&self, access_token: &str) -> AuthResult<Uuid> {
        let claims = token::decode_access_token(
            access_token,
            &self.config.jwt_secret,
            &self.config.jwt_issuer,
            self.config.leeway_secs,
        )?;

        Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::Unauthorized(UnauthorizedReason::InvalidToken))
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}
