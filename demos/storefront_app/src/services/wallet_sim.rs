// storefront/demos/storefront_app/src/services/wallet_sim.rs

//! An in-process stand-in for a browser wallet extension.
//!
//! Reports failures as plain strings the way wallet SDKs do, and maps them with
//! `WalletError::classify`.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use storefront::metadata::{ASSET_NAME_MAX_BYTES, FIELD_MAX_BYTES};
use storefront::{Lovelace, SignedTx, TxDraft, TxHash, UnsignedTx, WalletApi, WalletConnector, WalletError, WalletInfo};
use tracing::{info, instrument, warn};
use uuid::Uuid;

const SIMULATED_FEE: u64 = 180_000;

pub struct SimulatedWallet {
  name: String,
  address: String,
  balance: Mutex<Lovelace>,
  latency: Duration,
  pending: Mutex<HashMap<String, TxDraft>>,
}

impl SimulatedWallet {
  pub fn new(name: &str, balance: Lovelace, latency: Duration) -> Self {
    Self {
      name: name.to_string(),
      address: format!("addr_test1q{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple()),
      balance: Mutex::new(balance),
      latency,
      pending: Mutex::new(HashMap::new()),
    }
  }

  pub fn balance(&self) -> Lovelace {
    *self.balance.lock()
  }

  pub fn set_balance(&self, balance: Lovelace) {
    *self.balance.lock() = balance;
  }
}

/// First string in `value` longer than the per-field ceiling.
fn oversized_string(value: &Value) -> Option<&str> {
  match value {
    Value::String(s) if s.len() > FIELD_MAX_BYTES => Some(s.as_str()),
    Value::Array(items) => items.iter().find_map(oversized_string),
    Value::Object(map) => map
      .iter()
      .find_map(|(k, v)| if k.len() > FIELD_MAX_BYTES { Some(k.as_str()) } else { oversized_string(v) }),
    _ => None,
  }
}

#[async_trait]
impl WalletApi for SimulatedWallet {
  async fn used_addresses(&self) -> Result<Vec<String>, WalletError> {
    tokio::time::sleep(self.latency / 4).await;
    Ok(vec![self.address.clone()])
  }

  async fn unused_addresses(&self) -> Result<Vec<String>, WalletError> {
    Ok(vec![])
  }

  async fn change_address(&self) -> Result<Option<String>, WalletError> {
    Ok(Some(self.address.clone()))
  }

  #[instrument(name = "SimulatedWallet::build_tx", skip_all, fields(wallet = %self.name))]
  async fn build_tx(&self, draft: &TxDraft) -> Result<UnsignedTx, WalletError> {
    tokio::time::sleep(self.latency).await;

    for (label, record) in &draft.metadata {
      if let Some(field) = oversized_string(record) {
        return Err(WalletError::classify(format!(
          "Metadatum under label {} exceeds MAX_LENGTH_LIMIT: {} bytes",
          label,
          field.len()
        )));
      }
    }
    if let Some(mint) = draft.mints.iter().find(|m| m.asset_name.len() > ASSET_NAME_MAX_BYTES) {
      return Err(WalletError::classify(format!(
        "Failed to evaluate mint: asset name '{}' is too long",
        mint.asset_name
      )));
    }

    let needed = draft.total_paid().0 + SIMULATED_FEE;
    let available = self.balance().0;
    if needed > available {
      return Err(WalletError::classify(format!(
        "UTxO Balance Insufficient: need {} lovelace, have {}",
        needed, available
      )));
    }

    let id = format!("unsigned_{}", Uuid::new_v4().simple());
    self.pending.lock().insert(id.clone(), draft.clone());
    info!(tx = %id, lovelace = needed, mints = draft.mints.len(), "Simulated transaction built.");
    Ok(UnsignedTx(id))
  }

  async fn sign_tx(&self, tx: &UnsignedTx) -> Result<SignedTx, WalletError> {
    tokio::time::sleep(self.latency).await;
    if !self.pending.lock().contains_key(&tx.0) {
      return Err(WalletError::classify(format!("Transaction validation failed: unknown tx {}", tx)));
    }
    Ok(SignedTx(tx.0.replacen("unsigned_", "signed_", 1)))
  }

  async fn submit_tx(&self, tx: &SignedTx) -> Result<TxHash, WalletError> {
    tokio::time::sleep(self.latency).await;
    let unsigned_id = tx.0.replacen("signed_", "unsigned_", 1);
    let draft = self
      .pending
      .lock()
      .remove(&unsigned_id)
      .ok_or_else(|| WalletError::classify(format!("Network rejected unknown transaction {}", tx)))?;

    let spent = draft.total_paid().0 + SIMULATED_FEE;
    {
      let mut balance = self.balance.lock();
      balance.0 = balance.0.saturating_sub(spent);
    }
    let hash = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    info!(tx_hash = %hash, spent, "Simulated transaction submitted.");
    Ok(TxHash(hash))
  }
}

/// Advertises a fixed set of wallets; every one of them enables the same
/// simulated session.
pub struct SimulatedConnector {
  wallets: Vec<WalletInfo>,
  wallet: Arc<SimulatedWallet>,
  refuse: Mutex<bool>,
}

impl SimulatedConnector {
  pub fn new(wallet: Arc<SimulatedWallet>) -> Self {
    Self {
      wallets: vec![WalletInfo::named("Nami"), WalletInfo::named(wallet.name.clone())],
      wallet,
      refuse: Mutex::new(false),
    }
  }

  /// Makes the next `enable` calls fail as if the user dismissed the prompt.
  pub fn set_refuse(&self, refuse: bool) {
    *self.refuse.lock() = refuse;
  }
}

#[async_trait]
impl WalletConnector for SimulatedConnector {
  fn installed_wallets(&self) -> Vec<WalletInfo> {
    self.wallets.clone()
  }

  async fn enable(&self, wallet: &WalletInfo) -> Result<Arc<dyn WalletApi>, WalletError> {
    tokio::time::sleep(self.wallet.latency).await;
    if *self.refuse.lock() {
      warn!(wallet = %wallet.name, "Simulated user refused wallet access.");
      return Err(WalletError::classify("User rejected the connection request"));
    }
    Ok(self.wallet.clone() as Arc<dyn WalletApi>)
  }
}
