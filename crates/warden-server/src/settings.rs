//! Process configuration.
//!
//! Values come from an optional YAML file (`config.yaml` in the working
//! directory, or the path in `WARDEN_CONFIG`) and are overridden by
//! `WARDEN__`-prefixed environment variables, e.g.
//! `WARDEN__AUTH__JWT_SECRET` or `WARDEN__DATABASE__URL`.

use anyhow::{Context, bail};
use config::{Config, Environment, File};
use serde::Deserialize;
use warden_auth::AuthConfig;
use warden_auth::config::MAX_TOKEN_LIFETIME_HOURS;
use warden_db::DbConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database: DbConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("WARDEN_CONFIG").unwrap_or_else(|_| "config".into());

        let config = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix("WARDEN").separator("__"))
            .build()
            .context("failed to read configuration")?;

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let settings: Settings = config
            .try_deserialize()
            .context("invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.auth.jwt_secret.is_empty() {
            bail!("auth.jwt_secret must be set");
        }
        if self.auth.jwt_issuer.is_empty() {
            bail!("auth.jwt_issuer must not be empty");
        }
        if !(1..=MAX_TOKEN_LIFETIME_HOURS).contains(&self.auth.token_lifetime_hours) {
            bail!(
                "auth.token_lifetime_hours must be between 1 and {MAX_TOKEN_LIFETIME_HOURS}, got {}",
                self.auth.token_lifetime_hours
            );
        }
        Ok(())
    }
}
