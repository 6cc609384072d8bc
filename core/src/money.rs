// storefront/src/money.rs

//! Display-unit amounts and their exact conversion to the chain's minor unit.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minor units per display unit (lovelace per ADA).
pub const LOVELACE_PER_ADA: u64 = 1_000_000;

/// An amount in the chain's smallest indivisible denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lovelace(pub u64);

impl fmt::Display for Lovelace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
  #[error("{0} ADA is not a whole number of lovelace")]
  NotWholeMinorUnits(Decimal),

  #[error("Amount {0} is negative")]
  Negative(Decimal),

  #[error("Amount {0} does not fit in the minor-unit range")]
  Overflow(Decimal),
}

/// Converts a display amount to lovelace. Amounts with more than six decimal
/// places are rejected rather than rounded.
pub fn to_lovelace(ada: Decimal) -> Result<Lovelace, AmountError> {
  if ada.is_sign_negative() && !ada.is_zero() {
    return Err(AmountError::Negative(ada));
  }
  let minor = ada
    .checked_mul(Decimal::from(LOVELACE_PER_ADA))
    .ok_or(AmountError::Overflow(ada))?;
  if !minor.fract().is_zero() {
    return Err(AmountError::NotWholeMinorUnits(ada));
  }
  minor.trunc().to_u64().map(Lovelace).ok_or(AmountError::Overflow(ada))
}

/// Renders a display amount without trailing zeros: `110`, `12.5`.
pub fn format_ada(ada: Decimal) -> String {
  ada.normalize().to_string()
}
