// storefront/src/checkout/state.rs

use super::CheckoutError;
use crate::wallet::TxHash;
use rust_decimal::Decimal;

/// The in-flight phases of a checkout, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutPhase {
  Validating,
  Building,
  Signing,
  Submitting,
}

/// `Idle`, or which phase the one checkout in flight is in.
///
/// The terminal outcomes are not states: a finished attempt records a
/// `PurchaseResult` and goes straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
  #[default]
  Idle,
  InFlight(CheckoutPhase),
}

impl CheckoutState {
  pub fn is_idle(&self) -> bool {
    matches!(self, CheckoutState::Idle)
  }

  pub fn phase(&self) -> Option<CheckoutPhase> {
    match self {
      CheckoutState::Idle => None,
      CheckoutState::InFlight(phase) => Some(*phase),
    }
  }
}

/// Outcome of one `process_purchase` attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseResult {
  Succeeded {
    tx_hash: TxHash,
    total: Decimal,
    seller_name: String,
  },
  Failed(CheckoutError),
}

impl PurchaseResult {
  pub fn is_success(&self) -> bool {
    matches!(self, PurchaseResult::Succeeded { .. })
  }

  pub fn tx_hash(&self) -> Option<&TxHash> {
    match self {
      PurchaseResult::Succeeded { tx_hash, .. } => Some(tx_hash),
      PurchaseResult::Failed(_) => None,
    }
  }

  pub fn error(&self) -> Option<&CheckoutError> {
    match self {
      PurchaseResult::Succeeded { .. } => None,
      PurchaseResult::Failed(e) => Some(e),
    }
  }

  /// The line a UI shows once the attempt is over.
  pub fn user_message(&self) -> String {
    match self {
      PurchaseResult::Succeeded {
        tx_hash,
        total,
        seller_name,
      } => format!(
        "Payment of {} ADA sent to {}. Transaction: {}",
        crate::money::format_ada(*total),
        seller_name,
        tx_hash
      ),
      PurchaseResult::Failed(e) => e.user_message(),
    }
  }
}
