//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live outside
//! this crate; the auth layer only depends on these contracts.

use uuid::Uuid;

use crate::error::CoreResult;
use crate::models::account::{Account, NewAccount, UpdateAccount};

pub trait AccountRepository: Send + Sync {
    /// Persist a new account.
    ///
    /// Implementations must reject a duplicate email with
    /// [`CoreError::AlreadyExists`](crate::error::CoreError::AlreadyExists),
    /// even when two creates for the same email race. An
    /// application-level check is not sufficient; the guarantee has to
    /// come from the storage layer.
    fn create(&self, input: NewAccount) -> impl Future<Output = CoreResult<Account>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CoreResult<Account>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = CoreResult<Account>> + Send;
    fn exists_by_email(&self, email: &str) -> impl Future<Output = CoreResult<bool>> + Send;
    /// Look up the account whose email and stored secret both match.
    ///
    /// Returns [`CoreError::NotFound`](crate::error::CoreError::NotFound)
    /// when no row matches.
    fn find_by_email_and_secret(
        &self,
        email: &str,
        password_hash: &str,
    ) -> impl Future<Output = CoreResult<Account>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAccount,
    ) -> impl Future<Output = CoreResult<Account>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CoreResult<()>> + Send;
}
