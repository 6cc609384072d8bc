// storefront/src/wallet/session.rs

//! Wallet session state and the ordered address fallback used for display.

use super::{ConnectError, WalletApi, WalletConnector, WalletError, WalletInfo};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// One way of asking a wallet for an address. Tried in `ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressProbe {
  Used,
  Unused,
  Change,
}

impl AddressProbe {
  /// Historical usage first: that address is the one a user most likely recognizes.
  pub const ORDER: [AddressProbe; 3] = [AddressProbe::Used, AddressProbe::Unused, AddressProbe::Change];

  pub async fn probe(self, api: &dyn WalletApi) -> Result<Option<String>, WalletError> {
    match self {
      AddressProbe::Used => Ok(api.used_addresses().await?.into_iter().next()),
      AddressProbe::Unused => Ok(api.unused_addresses().await?.into_iter().next()),
      AddressProbe::Change => Ok(api.change_address().await?.filter(|a| !a.is_empty())),
    }
  }
}

/// The address shown for a connected wallet. Only ever advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayAddress {
  Resolved { address: String, via: AddressProbe },
  /// Every probe answered, none had an address.
  Unavailable,
  /// A probe failed; the chain stopped there.
  RetrievalFailed { reason: String },
}

impl DisplayAddress {
  pub fn address(&self) -> Option<&str> {
    match self {
      DisplayAddress::Resolved { address, .. } => Some(address),
      _ => None,
    }
  }
}

impl fmt::Display for DisplayAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DisplayAddress::Resolved { address, .. } => f.write_str(address),
      DisplayAddress::Unavailable => f.write_str("Address not available"),
      DisplayAddress::RetrievalFailed { .. } => f.write_str("Address retrieval failed"),
    }
  }
}

/// Walks `AddressProbe::ORDER`, stopping at the first address. Never fails:
/// problems degrade to a sentinel.
#[instrument(name = "wallet::resolve_display_address", skip_all)]
pub async fn resolve_display_address(api: &dyn WalletApi) -> DisplayAddress {
  for probe in AddressProbe::ORDER {
    match probe.probe(api).await {
      Ok(Some(address)) => {
        debug!(?probe, "Display address resolved.");
        return DisplayAddress::Resolved { address, via: probe };
      }
      Ok(None) => debug!(?probe, "Probe returned no address, trying next."),
      Err(e) => {
        warn!(?probe, error = %e, "Address probe failed.");
        return DisplayAddress::RetrievalFailed {
          reason: e.to_string(),
        };
      }
    }
  }
  warn!("No address found by any probe.");
  DisplayAddress::Unavailable
}

/// Prefers a wallet whose name contains `preferred` (case-insensitive),
/// otherwise the first one.
pub fn select_provider<'a>(wallets: &'a [WalletInfo], preferred: &str) -> Option<&'a WalletInfo> {
  let needle = preferred.to_lowercase();
  wallets
    .iter()
    .find(|w| !needle.is_empty() && w.name.to_lowercase().contains(&needle))
    .or_else(|| wallets.first())
}

/// A connected wallet.
#[derive(Clone)]
pub struct WalletSession {
  pub wallet: WalletInfo,
  pub api: Arc<dyn WalletApi>,
  pub display_address: DisplayAddress,
}

impl fmt::Debug for WalletSession {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WalletSession")
      .field("wallet", &self.wallet.name)
      .field("display_address", &self.display_address)
      .finish()
  }
}

impl WalletSession {
  /// Discovers, selects, enables and resolves a display address.
  #[instrument(name = "WalletSession::establish", skip(connector))]
  pub async fn establish(connector: &dyn WalletConnector, preferred: &str) -> Result<Self, ConnectError> {
    let wallets = connector.installed_wallets();
    debug!(available = ?wallets.iter().map(|w| w.name.as_str()).collect::<Vec<_>>(), "Installed wallets.");
    let wallet = select_provider(&wallets, preferred)
      .cloned()
      .ok_or(ConnectError::NoWalletDetected)?;

    let api = connector.enable(&wallet).await.map_err(|e| {
      warn!(wallet = %wallet.name, error = %e, "Wallet enable failed.");
      ConnectError::ConnectionFailed {
        wallet: wallet.name.clone(),
        reason: e.message().to_string(),
      }
    })?;

    let display_address = resolve_display_address(api.as_ref()).await;
    info!(wallet = %wallet.name, address = %display_address, "Wallet connected.");
    Ok(Self {
      wallet,
      api,
      display_address,
    })
  }
}

/// `Disconnected -> Connecting -> Connected`, or back to `Disconnected` on failure.
#[derive(Debug, Clone, Default)]
pub enum ConnectionState {
  #[default]
  Disconnected,
  Connecting {
    wallet_hint: String,
  },
  Connected(WalletSession),
}

impl ConnectionState {
  pub fn session(&self) -> Option<&WalletSession> {
    match self {
      ConnectionState::Connected(session) => Some(session),
      _ => None,
    }
  }

  pub fn is_connected(&self) -> bool {
    matches!(self, ConnectionState::Connected(_))
  }
}
