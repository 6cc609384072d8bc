// storefront/src/wallet/mod.rs

//! The wallet seam.
//!
//! Key custody, transaction encoding, signing and submission all belong to an
//! external wallet. This module only describes what the storefront asks of it:
//!  - `WalletConnector` discovers installed wallets and enables one.
//!  - `WalletApi` is the enabled handle: address queries plus build, sign and
//!    submit.
//!
//! Every call is async and independently fallible.

pub mod error;
pub mod session;
pub mod tx;

use async_trait::async_trait;
use std::sync::Arc;

pub use error::{ConnectError, WalletError};
pub use session::{
  resolve_display_address, select_provider, AddressProbe, ConnectionState, DisplayAddress, WalletSession,
};
pub use tx::{MintInstruction, MintPolicy, Payment, SignedTx, TxDraft, TxHash, UnsignedTx};

/// A wallet advertised by the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletInfo {
  pub name: String,
  pub icon: Option<String>,
  pub version: Option<String>,
}

impl WalletInfo {
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      icon: None,
      version: None,
    }
  }
}

/// Discovery and authorization of installed wallets.
#[async_trait]
pub trait WalletConnector: Send + Sync {
  /// Wallets currently installed, in the environment's order.
  fn installed_wallets(&self) -> Vec<WalletInfo>;

  /// Asks the wallet to authorize a session. User rejection is an error.
  async fn enable(&self, wallet: &WalletInfo) -> Result<Arc<dyn WalletApi>, WalletError>;
}

/// An enabled wallet session.
#[async_trait]
pub trait WalletApi: Send + Sync {
  async fn used_addresses(&self) -> Result<Vec<String>, WalletError>;

  async fn unused_addresses(&self) -> Result<Vec<String>, WalletError>;

  async fn change_address(&self) -> Result<Option<String>, WalletError>;

  /// Balances and serializes `draft`, with this wallet as the payer.
  async fn build_tx(&self, draft: &TxDraft) -> Result<UnsignedTx, WalletError>;

  async fn sign_tx(&self, tx: &UnsignedTx) -> Result<SignedTx, WalletError>;

  async fn submit_tx(&self, tx: &SignedTx) -> Result<TxHash, WalletError>;
}
