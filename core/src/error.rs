// storefront/src/error.rs

use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::wallet::ConnectError;

/// Errors raised by the flow runner itself, as opposed to by stage handlers.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Handler missing for required stage: {stage_name}")]
  HandlerMissing { stage_name: String },

  #[error("Error in stage handler. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },
}

impl From<AnyhowError> for FlowError {
  fn from(err: AnyhowError) -> Self {
    // Don't nest FlowError(HandlerError(FlowError(..))).
    match err.downcast::<FlowError>() {
      Ok(flow_err) => flow_err,
      Err(source) => FlowError::HandlerError { source },
    }
  }
}

/// Umbrella error for everything the storefront can report.
#[derive(Debug, Error)]
pub enum StorefrontError {
  #[error("Catalog error: {0}")]
  Catalog(#[from] CatalogError),

  #[error("Wallet connection error: {0}")]
  Connect(#[from] ConnectError),

  #[error("Checkout error: {0}")]
  Checkout(#[from] CheckoutError),

  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("Flow error: {0}")]
  Flow(#[from] FlowError),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for StorefrontError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<StorefrontError>() {
      Ok(inner) => inner,
      Err(other) => StorefrontError::Internal(format!("{:#}", other)),
    }
  }
}

pub type StorefrontResult<T, E = StorefrontError> = std::result::Result<T, E>;
