// storefront/demos/storefront_app/src/main.rs

// Declare modules for the application
mod config;
mod errors;
mod scenario;
mod services;

use crate::config::AppConfig;
use crate::services::wallet_sim::{SimulatedConnector, SimulatedWallet};

use std::sync::Arc;
use storefront::{to_lovelace, Catalog, Storefront};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Before the subscriber, so RUST_LOG from .env applies.
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront demo...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load configuration.");
      return Err(e.into());
    }
  };

  let balance = to_lovelace(app_config.sim_balance_ada)?;
  let wallet = Arc::new(SimulatedWallet::new(
    &app_config.sim_wallet_name,
    balance,
    app_config.sim_latency,
  ));
  let connector = Arc::new(SimulatedConnector::new(wallet.clone()));

  let catalog = Catalog::boutique_collection(&app_config.storefront.seller_name);
  let store = Storefront::new(app_config.storefront.clone(), catalog, connector.clone());

  if let Err(e) = scenario::run(&store, wallet, connector).await {
    tracing::error!(error = %e, "Scripted session failed.");
    return Err(e.into());
  }

  tracing::info!("Storefront demo finished.");
  Ok(())
}
