//! Warden Server — application entry point.

mod settings;

use tracing::info;
use tracing_subscriber::EnvFilter;
use warden_auth::CredentialService;
use warden_db::DbManager;

use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warden=info".parse()?))
        .json()
        .init();

    info!("Starting Warden server...");

    let settings = Settings::load()?;
    info!("Configuration loaded");

    let db = DbManager::connect(&settings.database).await?;
    db.migrate().await?;

    let service = CredentialService::new(db.accounts(), settings.auth);
    info!(
        issuer = %service.config().jwt_issuer,
        token_lifetime_hours = service.config().token_lifetime_hours,
        "Credential service ready"
    );

    // TODO: register the UserService gRPC handlers over `service`.

    tokio::signal::ctrl_c().await?;

    info!("Warden server stopped.");
    Ok(())
}
