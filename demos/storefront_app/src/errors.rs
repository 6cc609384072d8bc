// storefront/demos/storefront_app/src/errors.rs

use storefront::{CatalogError, ConfigError, ConnectError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Catalog Error: {0}")]
  Catalog(#[from] CatalogError),

  #[error("Wallet Connection Error: {0}")]
  Connect(#[from] ConnectError),
}

impl From<ConfigError> for AppError {
  fn from(err: ConfigError) -> Self {
    AppError::Config(err.to_string())
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
