//! SurrealDB implementation of [`AccountRepository`].
//!
//! The repository stores whatever secret the caller hands it and
//! compares secrets by equality; hashing happens in the auth layer.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;
use warden_core::error::CoreResult;
use warden_core::models::account::{Account, NewAccount, UpdateAccount};
use warden_core::repository::AccountRepository;

use crate::error::DbError;

const ENTITY: &str = "account";

/// Upper bound on CREATE attempts when concurrent writers collide.
const MAX_CREATE_ATTEMPTS: u32 = 5;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AccountRow {
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AccountRowWithId {
    record_id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

impl AccountRow {
    fn into_account(self, id: Uuid) -> Account {
        Account {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl AccountRowWithId {
    fn try_into_account(self) -> Result<Account, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid account UUID: {e}")))?;
        Ok(Account {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the account repository.
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
}

// Manual impl: a derive would also require `C: Clone`.
impl<C: Connection> Clone for SurrealAccountRepository<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Run a single CREATE statement for `input`.
    async fn insert(&self, input: &NewAccount) -> Result<Account, DbError> {
        let id_str = input.id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('account', $id) SET \
                 name = $name, \
                 email = $email, \
                 password_hash = $password_hash",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name.clone()))
            .bind(("email", input.email.clone()))
            .bind(("password_hash", input.password_hash.clone()))
            .await?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_write(e, ENTITY))?;

        let rows: Vec<AccountRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: ENTITY.into(),
            id: id_str,
        })?;

        Ok(row.into_account(input.id))
    }

    /// Fetch the first account matching `filter`, binding `email`
    /// and, when given, `password_hash`.
    async fn find_one(
        &self,
        filter: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<Account, DbError> {
        let query = format!("SELECT meta::id(id) AS record_id, * FROM account WHERE {filter}");

        let mut builder = self.db.query(&query).bind(("email", email.to_string()));
        if let Some(hash) = password_hash {
            builder = builder.bind(("password_hash", hash.to_string()));
        }

        let mut result = builder.await?;
        let rows: Vec<AccountRowWithId> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: ENTITY.into(),
            id: format!("email={email}"),
        })?;

        row.try_into_account()
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn create(&self, input: NewAccount) -> CoreResult<Account> {
        let mut attempt = 1;
        loop {
            match self.insert(&input).await {
                Err(DbError::WriteConflict { source, .. }) => {
                    // The losing side of a race on the email index sees a
                    // conflict rather than the index error.
                    if self.exists_by_email(&input.email).await? {
                        return Err(DbError::Duplicate {
                            entity: ENTITY.into(),
                        }
                        .into());
                    }
                    if attempt >= MAX_CREATE_ATTEMPTS {
                        return Err(DbError::from(source).into());
                    }
                    debug!(attempt, error = %source, "account create conflicted, retrying");
                    attempt += 1;
                }
                other => return Ok(other?),
            }
        }
    }

    async fn get_by_id(&self, id: Uuid) -> CoreResult<Account> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: ENTITY.into(),
            id: id_str,
        })?;

        Ok(row.into_account(id))
    }

    async fn get_by_email(&self, email: &str) -> CoreResult<Account> {
        Ok(self.find_one("email = $email", email, None).await?)
    }

    async fn exists_by_email(&self, email: &str) -> CoreResult<bool> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM account WHERE email = $email GROUP ALL")
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn find_by_email_and_secret(
        &self,
        email: &str,
        password_hash: &str,
    ) -> CoreResult<Account> {
        Ok(self
            .find_one(
                "email = $email AND password_hash = $password_hash",
                email,
                Some(password_hash),
            )
            .await?)
    }

    async fn update(&self, id: Uuid, input: UpdateAccount) -> CoreResult<Account> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        sets.push("updated_at = time::now()");

        // UPDATE never creates records; a missing id yields no rows.
        let query = format!(
            "UPDATE type::record('account', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(password_hash) = input.password_hash {
            builder = builder.bind(("password_hash", password_hash));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_write(e, ENTITY))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: ENTITY.into(),
            id: id_str,
        })?;

        Ok(row.into_account(id))
    }

    async fn delete(&self, id: Uuid) -> CoreResult<()> {
        self.db
            .query("DELETE type::record('account', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }
}
