// storefront/demos/storefront_app/src/config.rs

use crate::errors::{AppError, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use storefront::StorefrontConfig;

/// Storefront settings plus knobs for the simulated wallet.
#[derive(Debug, Clone)]
pub struct AppConfig {
  pub storefront: StorefrontConfig,
  pub sim_balance_ada: Decimal,
  pub sim_latency: Duration,
  pub sim_wallet_name: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    // Loads .env itself; required keys fail here with no embedded fallback.
    let storefront = StorefrontConfig::from_env()?;

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let sim_balance_ada = Decimal::from_str(&get_env("DEMO_WALLET_BALANCE_ADA").unwrap_or_else(|| "500".to_string()))
      .map_err(|e| AppError::Config(format!("Invalid DEMO_WALLET_BALANCE_ADA: {}", e)))?;
    let sim_latency_ms = get_env("DEMO_WALLET_LATENCY_MS")
      .unwrap_or_else(|| "150".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid DEMO_WALLET_LATENCY_MS: {}", e)))?;
    let sim_wallet_name = get_env("DEMO_WALLET_NAME").unwrap_or_else(|| "Yoroi".to_string());

    tracing::info!(
      balance_ada = %sim_balance_ada,
      latency_ms = sim_latency_ms,
      wallet = %sim_wallet_name,
      "Demo configuration loaded."
    );

    Ok(Self {
      storefront,
      sim_balance_ada,
      sim_latency: Duration::from_millis(sim_latency_ms),
      sim_wallet_name,
    })
  }
}
