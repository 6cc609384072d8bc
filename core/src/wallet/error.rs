// storefront/src/wallet/error.rs

use thiserror::Error;

/// Failures reported by a wallet or by the network behind it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
  #[error("Insufficient funds: {0}")]
  InsufficientFunds(String),

  #[error("Rejected by wallet: {0}")]
  Rejected(String),

  #[error("Network error: {0}")]
  Network(String),

  #[error("Metadata exceeds the length limit: {0}")]
  MetadataTooLong(String),

  #[error("Transaction validation failed: {0}")]
  Validation(String),

  #[error("Wallet error: {0}")]
  Other(String),
}

impl WalletError {
  /// Maps a bare error message onto a typed variant.
  ///
  /// For adapters over wallet SDKs that only surface strings. Matching is
  /// case-insensitive and checked in a fixed order, so a message mentioning both
  /// "insufficient" and "network" is classified as insufficient funds.
  pub fn classify(message: impl Into<String>) -> Self {
    let message = message.into();
    let lower = message.to_lowercase();
    if lower.contains("insufficient") {
      WalletError::InsufficientFunds(message)
    } else if lower.contains("rejected") || lower.contains("declined") {
      WalletError::Rejected(message)
    } else if lower.contains("network") {
      WalletError::Network(message)
    } else if lower.contains("max_length_limit") {
      WalletError::MetadataTooLong(message)
    } else if lower.contains("evaluate") || lower.contains("validation") {
      WalletError::Validation(message)
    } else {
      WalletError::Other(message)
    }
  }

  pub fn message(&self) -> &str {
    match self {
      WalletError::InsufficientFunds(m)
      | WalletError::Rejected(m)
      | WalletError::Network(m)
      | WalletError::MetadataTooLong(m)
      | WalletError::Validation(m)
      | WalletError::Other(m) => m,
    }
  }
}

/// Failures of the connect flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
  #[error("No wallet extension detected")]
  NoWalletDetected,

  #[error("Connecting to wallet '{wallet}' failed: {reason}")]
  ConnectionFailed { wallet: String, reason: String },

  #[error("A wallet connection is already in progress")]
  AlreadyConnecting,

  #[error("The wallet session cannot change while a checkout is in progress")]
  CheckoutInProgress,
}
