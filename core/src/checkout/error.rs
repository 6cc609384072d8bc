// storefront/src/checkout/error.rs

use crate::error::FlowError;
use crate::metadata::MetadataError;
use crate::money::AmountError;
use crate::wallet::WalletError;
use thiserror::Error;

/// Why a checkout attempt failed.
///
/// `NoWallet`, `EmptyCart` and `InProgress` are decided locally, before any
/// wallet call. Everything else comes out of the wallet or the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
  #[error("No wallet connected")]
  NoWallet,

  #[error("Cart is empty")]
  EmptyCart,

  #[error("A checkout is already in progress")]
  InProgress,

  #[error("No addresses found in wallet")]
  NoPayerAddress,

  #[error("Total cannot be paid exactly: {0}")]
  AmountNotRepresentable(String),

  #[error("Transaction metadata too long: {0}")]
  MetadataTooLong(String),

  #[error("Insufficient funds: {0}")]
  InsufficientFunds(String),

  #[error("Transaction rejected: {0}")]
  TransactionRejected(String),

  #[error("Network error: {0}")]
  NetworkError(String),

  #[error("Transaction validation failed: {0}")]
  ValidationFailed(String),

  #[error("Transaction failed: {0}")]
  UnknownTransactionError(String),

  #[error("Checkout flow error: {0}")]
  Flow(String),
}

impl CheckoutError {
  /// Explanation suitable for a blocking notification.
  pub fn user_message(&self) -> String {
    match self {
      CheckoutError::NoWallet => "Please connect your wallet first!".to_string(),
      CheckoutError::EmptyCart => "Your cart is empty!".to_string(),
      CheckoutError::InProgress => "A purchase is already being processed. Please wait.".to_string(),
      CheckoutError::NoPayerAddress => {
        "Your wallet did not return any address. Make sure it has been used at least once.".to_string()
      }
      CheckoutError::AmountNotRepresentable(_) => {
        "The order total cannot be paid exactly in lovelace. Please adjust your cart.".to_string()
      }
      CheckoutError::MetadataTooLong(_) => {
        "Transaction metadata is too long. Please try again with fewer items.".to_string()
      }
      CheckoutError::InsufficientFunds(_) => {
        "Insufficient funds in your wallet. Please add more ADA and try again.".to_string()
      }
      CheckoutError::TransactionRejected(_) => "Transaction was rejected. Please try again.".to_string(),
      CheckoutError::NetworkError(_) => {
        "Network error. Please check your connection and try again.".to_string()
      }
      CheckoutError::ValidationFailed(_) => {
        "Transaction validation failed. Please check your wallet and try again.".to_string()
      }
      CheckoutError::UnknownTransactionError(raw) | CheckoutError::Flow(raw) => {
        format!("Transaction failed: {}", raw)
      }
    }
  }

  /// Precondition failures the user can fix without retrying blindly.
  pub fn is_precondition(&self) -> bool {
    matches!(
      self,
      CheckoutError::NoWallet | CheckoutError::EmptyCart | CheckoutError::InProgress
    )
  }
}

impl From<WalletError> for CheckoutError {
  fn from(err: WalletError) -> Self {
    match err {
      WalletError::InsufficientFunds(m) => CheckoutError::InsufficientFunds(m),
      WalletError::Rejected(m) => CheckoutError::TransactionRejected(m),
      WalletError::Network(m) => CheckoutError::NetworkError(m),
      WalletError::MetadataTooLong(m) => CheckoutError::MetadataTooLong(m),
      WalletError::Validation(m) => CheckoutError::ValidationFailed(m),
      WalletError::Other(m) => CheckoutError::UnknownTransactionError(m),
    }
  }
}

impl From<AmountError> for CheckoutError {
  fn from(err: AmountError) -> Self {
    CheckoutError::AmountNotRepresentable(err.to_string())
  }
}

impl From<MetadataError> for CheckoutError {
  fn from(err: MetadataError) -> Self {
    CheckoutError::MetadataTooLong(err.to_string())
  }
}

impl From<FlowError> for CheckoutError {
  fn from(err: FlowError) -> Self {
    CheckoutError::Flow(err.to_string())
  }
}
