// storefront/src/wallet/tx.rs

//! The instructions a purchase hands to the wallet for building, and the opaque
//! artifacts it gets back.

use crate::money::Lovelace;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Move `amount` to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
  pub recipient: String,
  pub amount: Lovelace,
}

/// Minting policy for receipt tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MintPolicy {
  /// Native script requiring one signature from the key behind `address`.
  OneSignature { address: String },
}

/// Create `quantity` units of a uniquely named asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintInstruction {
  pub policy: MintPolicy,
  pub asset_name: String,
  pub quantity: u64,
}

/// Everything the wallet needs to build one purchase transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxDraft {
  pub payments: Vec<Payment>,
  pub mints: Vec<MintInstruction>,
  /// Metadata records keyed by label.
  pub metadata: BTreeMap<u64, Value>,
}

impl TxDraft {
  pub fn total_paid(&self) -> Lovelace {
    Lovelace(self.payments.iter().map(|p| p.amount.0).sum())
  }
}

macro_rules! opaque_string {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(pub String);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }
  };
}

opaque_string!(
  /// Serialized, unsigned transaction as returned by the wallet's builder.
  UnsignedTx
);
opaque_string!(
  /// Transaction carrying the wallet's witnesses.
  SignedTx
);
opaque_string!(
  /// Identifier of a submitted transaction.
  TxHash
);
