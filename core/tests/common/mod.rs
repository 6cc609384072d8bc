// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use storefront::{
  Catalog, FlowContext, FlowControl, FlowError, SignedTx, Storefront, StorefrontConfig, TxDraft, TxHash, UnsignedTx, WalletApi,
  WalletConnector, WalletError, WalletInfo,
};
use tracing::Level;

pub const SELLER: &str =
  "addr_test1qzf3x83p9v60kj2ml55eufcr24lfhe74u9pq2wudq34a4ktvdty7ly5lthcnwhhaz7sl3vn7v2dc6peyxwltnzskvghsznwxg0";
pub const BUYER: &str = "addr_test1qpbuyer00000000000000000000000000000000000000000000000000000000000xyz";
pub const TX_HASH: &str = "8f3c1a0b2d4e6f7a9b8c7d6e5f4a3b2c1d0e9f8a7b6c5d4e3f2a1b0c9d8e7f6a";

// --- Scripted wallet: every call is recorded, every answer is configurable ---
pub struct ScriptedWallet {
  pub used: Result<Vec<String>, WalletError>,
  pub unused: Result<Vec<String>, WalletError>,
  pub change: Result<Option<String>, WalletError>,
  pub build: Result<UnsignedTx, WalletError>,
  pub sign: Result<SignedTx, WalletError>,
  pub submit: Result<TxHash, WalletError>,
  /// Slows `sign_tx` down so a test can observe an in-flight checkout.
  pub sign_delay: Option<Duration>,
  pub calls: Mutex<Vec<&'static str>>,
  pub drafts: Mutex<Vec<TxDraft>>,
}

impl ScriptedWallet {
  /// A wallet where every call succeeds.
  pub fn happy() -> Self {
    Self {
      used: Ok(vec![BUYER.to_string()]),
      unused: Ok(vec![]),
      change: Ok(None),
      build: Ok(UnsignedTx("84a400unsigned".to_string())),
      sign: Ok(SignedTx("84a400signed".to_string())),
      submit: Ok(TxHash(TX_HASH.to_string())),
      sign_delay: None,
      calls: Mutex::new(Vec::new()),
      drafts: Mutex::new(Vec::new()),
    }
  }

  pub fn calls(&self) -> Vec<&'static str> {
    self.calls.lock().clone()
  }

  pub fn last_draft(&self) -> Option<TxDraft> {
    self.drafts.lock().last().cloned()
  }

  fn record(&self, call: &'static str) {
    self.calls.lock().push(call);
  }
}

#[async_trait]
impl WalletApi for ScriptedWallet {
  async fn used_addresses(&self) -> Result<Vec<String>, WalletError> {
    self.record("used_addresses");
    self.used.clone()
  }

  async fn unused_addresses(&self) -> Result<Vec<String>, WalletError> {
    self.record("unused_addresses");
    self.unused.clone()
  }

  async fn change_address(&self) -> Result<Option<String>, WalletError> {
    self.record("change_address");
    self.change.clone()
  }

  async fn build_tx(&self, draft: &TxDraft) -> Result<UnsignedTx, WalletError> {
    self.record("build_tx");
    self.drafts.lock().push(draft.clone());
    self.build.clone()
  }

  async fn sign_tx(&self, _tx: &UnsignedTx) -> Result<SignedTx, WalletError> {
    self.record("sign_tx");
    if let Some(delay) = self.sign_delay {
      tokio::time::sleep(delay).await;
    }
    self.sign.clone()
  }

  async fn submit_tx(&self, _tx: &SignedTx) -> Result<TxHash, WalletError> {
    self.record("submit_tx");
    self.submit.clone()
  }
}

// --- Scripted connector ---
pub struct ScriptedConnector {
  pub wallets: Vec<WalletInfo>,
  pub wallet: Arc<ScriptedWallet>,
  pub enable_error: Option<WalletError>,
  pub enable_delay: Option<Duration>,
  pub enabled: Mutex<Vec<String>>,
}

impl ScriptedConnector {
  pub fn new(wallet: Arc<ScriptedWallet>) -> Self {
    Self {
      wallets: vec![WalletInfo::named("Nami"), WalletInfo::named("Yoroi")],
      wallet,
      enable_error: None,
      enable_delay: None,
      enabled: Mutex::new(Vec::new()),
    }
  }

  pub fn enabled(&self) -> Vec<String> {
    self.enabled.lock().clone()
  }
}

#[async_trait]
impl WalletConnector for ScriptedConnector {
  fn installed_wallets(&self) -> Vec<WalletInfo> {
    self.wallets.clone()
  }

  async fn enable(&self, wallet: &WalletInfo) -> Result<Arc<dyn WalletApi>, WalletError> {
    self.enabled.lock().push(wallet.name.clone());
    if let Some(delay) = self.enable_delay {
      tokio::time::sleep(delay).await;
    }
    match &self.enable_error {
      Some(e) => Err(e.clone()),
      None => Ok(self.wallet.clone() as Arc<dyn WalletApi>),
    }
  }
}

// --- Configuration & storefront builders ---
pub fn test_config(overrides: &[(&str, &str)]) -> StorefrontConfig {
  let mut vars: HashMap<String, String> = HashMap::new();
  vars.insert("STOREFRONT_SELLER_ADDRESS".into(), SELLER.into());
  vars.insert("BLOCKFROST_API_KEY".into(), "preprodTestKey".into());
  for (k, v) in overrides {
    vars.insert(k.to_string(), v.to_string());
  }
  StorefrontConfig::from_lookup(|key: &str| vars.get(key).cloned()).expect("test config must load")
}

pub fn boutique_store(connector: Arc<ScriptedConnector>, overrides: &[(&str, &str)]) -> Storefront {
  let config = test_config(overrides);
  let catalog = Catalog::boutique_collection(&config.seller_name);
  Storefront::new(config, catalog, connector)
}

// --- Flow test context and error ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub steps_executed: Vec<String>,
  pub counter: i32,
  pub skip_optional: bool,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Flow framework error: {0}")]
  Flow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(fe.to_string())
  }
}

// --- Common Handler Creators ---
pub fn create_step_handler(step_name: &'static str) -> storefront::flow::Handler<TestContext, TestError> {
  Box::new(move |ctx: FlowContext<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, counter = guard.counter, "executed");
      Ok(FlowControl::Continue)
    })
  })
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
