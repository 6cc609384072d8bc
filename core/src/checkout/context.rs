// storefront/src/checkout/context.rs

//! The data one checkout run works on.

use crate::cart::CartItem;
use crate::wallet::{SignedTx, TxDraft, TxHash, UnsignedTx, WalletApi};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

/// The parts of the storefront configuration a checkout needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSettings {
  pub seller_address: String,
  pub seller_name: String,
  pub attach_memo: bool,
  pub mint_receipts: bool,
  pub nft_prefix: String,
}

/// Checkout state shared by all stages of one run.
///
/// Seeded from a snapshot of the cart and the wallet handle when the run starts;
/// later stages fill in the payer, the draft and the wallet's artifacts.
pub struct CheckoutCtx {
  pub lines: Vec<CartItem>,
  pub total: Decimal,
  pub wallet: Option<Arc<dyn WalletApi>>,
  pub settings: CheckoutSettings,
  /// Fixed once per run so the memo timestamp and asset names agree.
  pub started_at: DateTime<Utc>,

  pub payer: Option<String>,
  pub draft: TxDraft,
  pub unsigned: Option<UnsignedTx>,
  pub signed: Option<SignedTx>,
  pub tx_hash: Option<TxHash>,
}

impl CheckoutCtx {
  pub fn new(
    lines: Vec<CartItem>,
    total: Decimal,
    wallet: Option<Arc<dyn WalletApi>>,
    settings: CheckoutSettings,
    started_at: DateTime<Utc>,
  ) -> Self {
    Self {
      lines,
      total,
      wallet,
      settings,
      started_at,
      payer: None,
      draft: TxDraft::default(),
      unsigned: None,
      signed: None,
      tx_hash: None,
    }
  }
}

impl fmt::Debug for CheckoutCtx {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CheckoutCtx")
      .field("lines", &self.lines.len())
      .field("total", &self.total)
      .field("wallet_present", &self.wallet.is_some())
      .field("payer", &self.payer)
      .field("payments", &self.draft.payments.len())
      .field("mints", &self.draft.mints.len())
      .field("tx_hash", &self.tx_hash)
      .finish()
  }
}
