// storefront/src/metadata.rs

//! On-chain metadata records attached to a purchase.
//!
//! The network rejects any metadata string longer than 64 bytes, so every
//! source string is shortened *before* it is placed into a field, and each
//! finished field is checked locally before the record is handed to the wallet.
//!
//! Two records are produced:
//!  - a purchase memo under label 674 (`{"msg": [line, ...]}`),
//!  - NFT receipt entries under label 721, one per minted unit.

use crate::cart::CartItem;
use crate::catalog::{Product, ProductId};
use crate::money::format_ada;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Label for free-form transaction messages.
pub const LABEL_PURCHASE_MEMO: u64 = 674;
/// Label for NFT token metadata.
pub const LABEL_NFT: u64 = 721;

/// Ceiling for any single metadata string, enforced by the network.
pub const FIELD_MAX_BYTES: usize = 64;
/// Ceiling for a native asset name.
pub const ASSET_NAME_MAX_BYTES: usize = 32;
/// Longest receipt asset-name prefix. The rest of the name holds a 13-digit
/// millisecond timestamp and `_<id>_<unit>` with up to two digits each.
pub const RECEIPT_PREFIX_MAX_BYTES: usize = ASSET_NAME_MAX_BYTES - 19;

const ITEM_NAME_CHARS: usize = 10;
const ITEM_LIST_BYTES: usize = 50;
const ADDRESS_HEAD: usize = 15;
const ADDRESS_TAIL: usize = 8;

const NFT_NAME_CHARS: usize = 30;
const NFT_DESC_CHARS: usize = 40;
const NFT_ARTIST_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
  #[error("Metadata field '{field}' is {len} bytes, limit is {max}")]
  FieldTooLong { field: String, len: usize, max: usize },
}

/// First `max_chars` characters of `s`.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
  match s.char_indices().nth(max_chars) {
    Some((idx, _)) => &s[..idx],
    None => s,
  }
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a character.
pub fn clamp_bytes(s: &str, max_bytes: usize) -> &str {
  if s.len() <= max_bytes {
    return s;
  }
  let mut end = max_bytes;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  &s[..end]
}

/// `head` leading chars, `...`, `tail` trailing chars. Strings that would not
/// get shorter are returned whole.
pub fn shorten(s: &str, head: usize, tail: usize) -> String {
  let count = s.chars().count();
  if count <= head + tail + 3 {
    return s.to_string();
  }
  let tail_start = s.char_indices().nth(count - tail).map_or(s.len(), |(idx, _)| idx);
  format!("{}...{}", truncate_chars(s, head), &s[tail_start..])
}

/// Fails if `value` would be rejected by the network.
pub fn check_field(field: &str, value: &str, max: usize) -> Result<(), MetadataError> {
  if value.len() > max {
    return Err(MetadataError::FieldTooLong {
      field: field.to_string(),
      len: value.len(),
      max,
    });
  }
  Ok(())
}

/// Minute-precision ISO-8601 timestamp, e.g. `2025-01-31T14:05`.
pub fn minute_timestamp(at: DateTime<Utc>) -> String {
  at.format("%Y-%m-%dT%H:%M").to_string()
}

/// `"Luxury Gol x2, Pearl Earr x1"` cut to the item-list budget.
pub fn summarize_items(items: &[CartItem]) -> String {
  let joined = items
    .iter()
    .map(|i| format!("{} x{}", truncate_chars(&i.product.name, ITEM_NAME_CHARS), i.quantity))
    .collect::<Vec<_>>()
    .join(", ");
  clamp_bytes(&joined, ITEM_LIST_BYTES).to_string()
}

/// The human-readable purchase record attached under label 674.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseMemo {
  pub msg: Vec<String>,
}

impl PurchaseMemo {
  pub fn build(
    items: &[CartItem],
    total: Decimal,
    buyer: &str,
    seller: &str,
    at: DateTime<Utc>,
  ) -> Result<Self, MetadataError> {
    let msg = vec![
      "Marketplace Purchase".to_string(),
      format!("Items: {}", summarize_items(items)),
      format!("Total: {} ADA", format_ada(total)),
      format!("From: {}", shorten(buyer, ADDRESS_HEAD, ADDRESS_TAIL)),
      format!("To: {}", shorten(seller, ADDRESS_HEAD, ADDRESS_TAIL)),
      format!("Time: {}", minute_timestamp(at)),
    ];
    for (idx, line) in msg.iter().enumerate() {
      check_field(&format!("msg[{}]", idx), line, FIELD_MAX_BYTES)?;
    }
    Ok(Self { msg })
  }

  pub fn to_json(&self) -> Value {
    json!({ "msg": self.msg })
  }
}

/// Metadata for one minted receipt token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NftReceipt {
  pub name: String,
  pub image: String,
  pub desc: String,
  pub artist: String,
  #[serde(rename = "type")]
  pub kind: String,
}

impl NftReceipt {
  pub fn for_product(product: &Product, artist: &str) -> Result<Self, MetadataError> {
    let receipt = Self {
      name: truncate_chars(&product.name, NFT_NAME_CHARS).to_string(),
      image: format!("ipfs://receipt-{}", product.id),
      desc: truncate_chars(&product.description, NFT_DESC_CHARS).to_string(),
      artist: truncate_chars(artist, NFT_ARTIST_CHARS).to_string(),
      kind: "Receipt".to_string(),
    };
    for (field, value) in [
      ("name", &receipt.name),
      ("image", &receipt.image),
      ("desc", &receipt.desc),
      ("artist", &receipt.artist),
    ] {
      check_field(field, value, FIELD_MAX_BYTES)?;
    }
    Ok(receipt)
  }
}

/// `<prefix><unix millis>_<product id>_<unit index>`, unique per unit within a
/// purchase and across purchases made at different milliseconds.
pub fn receipt_asset_name(
  prefix: &str,
  at: DateTime<Utc>,
  product_id: ProductId,
  unit: u32,
) -> Result<String, MetadataError> {
  let name = format!("{}{}_{}_{}", prefix, at.timestamp_millis(), product_id, unit);
  check_field("asset_name", &name, ASSET_NAME_MAX_BYTES)?;
  Ok(name)
}

/// Collects receipt entries into the `{ asset_name: {...} }` map stored under label 721.
pub fn nft_collection_json(entries: &[(String, NftReceipt)]) -> Value {
  let mut map = Map::new();
  for (asset_name, receipt) in entries {
    // NftReceipt only holds strings; serialization cannot fail.
    if let Ok(value) = serde_json::to_value(receipt) {
      map.insert(asset_name.clone(), value);
    }
  }
  Value::Object(map)
}
