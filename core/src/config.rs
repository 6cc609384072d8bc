// storefront/src/config.rs

use crate::checkout::CheckoutSettings;
use crate::metadata::RECEIPT_PREFIX_MAX_BYTES;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const ENV_SELLER_ADDRESS: &str = "STOREFRONT_SELLER_ADDRESS";
pub const ENV_SELLER_NAME: &str = "STOREFRONT_SELLER_NAME";
pub const ENV_API_KEY: &str = "BLOCKFROST_API_KEY";
pub const ENV_PREFERRED_WALLET: &str = "STOREFRONT_PREFERRED_WALLET";
pub const ENV_ATTACH_MEMO: &str = "STOREFRONT_ATTACH_MEMO";
pub const ENV_MINT_RECEIPTS: &str = "STOREFRONT_MINT_RECEIPTS";
pub const ENV_CELEBRATION_SECS: &str = "STOREFRONT_CELEBRATION_SECS";
pub const ENV_NFT_PREFIX: &str = "STOREFRONT_NFT_PREFIX";

const DEFAULT_SELLER_NAME: &str = "Premium Marketplace";
const DEFAULT_PREFERRED_WALLET: &str = "yoroi";
const DEFAULT_CELEBRATION_SECS: u64 = 5;
const DEFAULT_NFT_PREFIX: &str = "Receipt";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("Missing required environment variable '{0}'")]
  Missing(&'static str),

  #[error("Invalid value for '{key}': {reason}")]
  Invalid { key: &'static str, reason: String },
}

/// Blockchain data provider key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
  pub fn new(key: impl Into<String>) -> Self {
    ApiKey(key.into())
  }

  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for ApiKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ApiKey([REDACTED])")
  }
}

#[derive(Debug, Clone)]
pub struct StorefrontConfig {
  /// Payment recipient.
  pub seller_address: String,
  pub seller_name: String,
  pub api_key: ApiKey,
  /// Case-insensitive substring matched against installed wallet names.
  pub preferred_wallet: String,
  pub attach_memo: bool,
  pub mint_receipts: bool,
  pub celebration: Duration,
  pub nft_prefix: String,
}

impl StorefrontConfig {
  /// Loads `.env` if present, then reads the process environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Reads every setting through `lookup`. Empty values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

    let seller_address = required(ENV_SELLER_ADDRESS)?;
    let api_key = ApiKey::new(required(ENV_API_KEY)?);
    let seller_name = get(ENV_SELLER_NAME).unwrap_or_else(|| DEFAULT_SELLER_NAME.to_string());
    let preferred_wallet = get(ENV_PREFERRED_WALLET).unwrap_or_else(|| DEFAULT_PREFERRED_WALLET.to_string());
    let attach_memo = parse_bool(ENV_ATTACH_MEMO, get(ENV_ATTACH_MEMO), true)?;
    let mint_receipts = parse_bool(ENV_MINT_RECEIPTS, get(ENV_MINT_RECEIPTS), false)?;
    let celebration_secs = match get(ENV_CELEBRATION_SECS) {
      Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
        key: ENV_CELEBRATION_SECS,
        reason: e.to_string(),
      })?,
      None => DEFAULT_CELEBRATION_SECS,
    };
    let nft_prefix = get(ENV_NFT_PREFIX).unwrap_or_else(|| DEFAULT_NFT_PREFIX.to_string());
    if nft_prefix.len() > RECEIPT_PREFIX_MAX_BYTES {
      return Err(ConfigError::Invalid {
        key: ENV_NFT_PREFIX,
        reason: format!(
          "receipt prefix is {} bytes, at most {} fit in an asset name",
          nft_prefix.len(),
          RECEIPT_PREFIX_MAX_BYTES
        ),
      });
    }

    tracing::info!(
      seller_name = %seller_name,
      preferred_wallet = %preferred_wallet,
      attach_memo,
      mint_receipts,
      "Storefront configuration loaded."
    );

    Ok(Self {
      seller_address,
      seller_name,
      api_key,
      preferred_wallet,
      attach_memo,
      mint_receipts,
      celebration: Duration::from_secs(celebration_secs),
      nft_prefix,
    })
  }

  pub fn checkout_settings(&self) -> CheckoutSettings {
    CheckoutSettings {
      seller_address: self.seller_address.clone(),
      seller_name: self.seller_name.clone(),
      attach_memo: self.attach_memo,
      mint_receipts: self.mint_receipts,
      nft_prefix: self.nft_prefix.clone(),
    }
  }
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
  match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
    None => Ok(default),
    Some("1" | "true" | "yes" | "on") => Ok(true),
    Some("0" | "false" | "no" | "off") => Ok(false),
    Some(other) => Err(ConfigError::Invalid {
      key,
      reason: format!("expected a boolean, got '{}'", other),
    }),
  }
}
