// tests/checkout_tests.rs
mod common;

use common::*;
use rust_decimal::Decimal;
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;
use storefront::metadata::{FIELD_MAX_BYTES, LABEL_NFT, LABEL_PURCHASE_MEMO};
use storefront::wallet::MintPolicy;
use storefront::{CheckoutError, CheckoutPhase, CheckoutState, ProductId, PurchaseResult, WalletError};

/// Boutique cart: watch (50) x1 + dress (30) x2 = 110 ADA.
fn fill_cart(store: &storefront::Storefront) {
  store.add_to_cart(ProductId(1)).unwrap();
  store.add_to_cart(ProductId(2)).unwrap();
  store.add_to_cart(ProductId(2)).unwrap();
}

async fn connected_store(
  wallet: Arc<ScriptedWallet>,
  overrides: &[(&str, &str)],
) -> storefront::Storefront {
  let store = boutique_store(Arc::new(ScriptedConnector::new(wallet)), overrides);
  store.connect_wallet().await.unwrap();
  store
}

#[tokio::test]
#[serial]
async fn test_checkout_without_wallet_fails_without_external_calls() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet::happy());
  let connector = Arc::new(ScriptedConnector::new(wallet.clone()));
  let store = boutique_store(connector.clone(), &[]);
  fill_cart(&store);

  let result = store.process_purchase().await;

  assert_eq!(result, PurchaseResult::Failed(CheckoutError::NoWallet));
  assert!(wallet.calls().is_empty());
  assert!(connector.enabled().is_empty());
  assert_eq!(store.checkout_state(), CheckoutState::Idle);
  assert_eq!(store.cart().len(), 2);
}

#[tokio::test]
#[serial]
async fn test_checkout_with_empty_cart_fails_without_external_calls() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet::happy());
  let store = connected_store(wallet.clone(), &[]).await;
  let calls_after_connect = wallet.calls().len();

  let result = store.process_purchase().await;

  assert_eq!(result, PurchaseResult::Failed(CheckoutError::EmptyCart));
  assert_eq!(wallet.calls().len(), calls_after_connect);
  assert_eq!(result.user_message(), "Your cart is empty!");
}

#[tokio::test]
#[serial]
async fn test_successful_checkout_pays_exact_lovelace_and_clears_cart() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet::happy());
  let store = connected_store(wallet.clone(), &[]).await;
  fill_cart(&store);
  store.set_cart_open(true);
  assert_eq!(store.total_price(), Decimal::from(110));

  let result = store.process_purchase().await;

  match &result {
    PurchaseResult::Succeeded {
      tx_hash,
      total,
      seller_name,
    } => {
      assert_eq!(tx_hash.0, TX_HASH);
      assert_eq!(*total, Decimal::from(110));
      assert_eq!(seller_name, "Premium Marketplace");
    }
    other => panic!("Expected success, got {:?}", other),
  }

  let draft = wallet.last_draft().expect("draft must reach the wallet");
  assert_eq!(draft.payments.len(), 1);
  assert_eq!(draft.payments[0].recipient, SELLER);
  assert_eq!(draft.payments[0].amount.to_string(), "110000000");
  assert!(draft.mints.is_empty());

  assert!(store.cart().is_empty());
  assert!(!store.view().cart_open);
  assert_eq!(store.checkout_state(), CheckoutState::Idle);
  assert_eq!(store.last_result(), Some(result));
  assert!(store.is_celebrating());
  assert!(store.celebration_remaining() <= Duration::from_secs(5));
}

#[tokio::test]
#[serial]
async fn test_wallet_calls_happen_in_order() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet::happy());
  let store = connected_store(wallet.clone(), &[]).await;
  fill_cart(&store);
  let before = wallet.calls().len();

  store.process_purchase().await;

  assert_eq!(
    wallet.calls()[before..].to_vec(),
    vec!["used_addresses", "build_tx", "sign_tx", "submit_tx"]
  );
}

#[tokio::test]
#[serial]
async fn test_purchase_memo_is_attached_within_field_limits() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet::happy());
  let store = connected_store(wallet.clone(), &[]).await;
  fill_cart(&store);

  store.process_purchase().await;

  let draft = wallet.last_draft().unwrap();
  let msg = draft.metadata[&LABEL_PURCHASE_MEMO]["msg"].as_array().unwrap().clone();
  assert_eq!(msg.len(), 6);
  assert_eq!(msg[0], "Marketplace Purchase");
  assert_eq!(msg[1], "Items: Luxury Gol x1, Elegant Ev x2");
  assert_eq!(msg[2], "Total: 110 ADA");
  assert!(msg.iter().all(|line| line.as_str().unwrap().len() <= FIELD_MAX_BYTES));
}

#[tokio::test]
#[serial]
async fn test_memo_can_be_disabled() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet::happy());
  let store = connected_store(wallet.clone(), &[("STOREFRONT_ATTACH_MEMO", "false")]).await;
  fill_cart(&store);

  assert!(store.process_purchase().await.is_success());
  assert!(wallet.last_draft().unwrap().metadata.is_empty());
}

#[tokio::test]
#[serial]
async fn test_receipts_are_minted_per_unit_alongside_payment() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet::happy());
  let store = connected_store(wallet.clone(), &[("STOREFRONT_MINT_RECEIPTS", "true")]).await;
  fill_cart(&store);

  assert!(store.process_purchase().await.is_success());

  let draft = wallet.last_draft().unwrap();
  assert_eq!(draft.payments.len(), 1);
  assert_eq!(draft.mints.len(), 3);
  assert!(draft.mints.iter().all(|m| m.quantity == 1));
  assert!(draft
    .mints
    .iter()
    .all(|m| m.policy == MintPolicy::OneSignature { address: BUYER.to_string() }));

  let mut names: Vec<&str> = draft.mints.iter().map(|m| m.asset_name.as_str()).collect();
  names.sort();
  names.dedup();
  assert_eq!(names.len(), 3, "asset names must be unique per unit");

  let nft = draft.metadata[&LABEL_NFT].as_object().unwrap();
  assert_eq!(nft.len(), 3);
  for name in names {
    assert_eq!(nft[name]["type"], "Receipt");
    assert!(nft[name]["name"].as_str().unwrap().len() <= 30);
  }
}

#[tokio::test]
#[serial]
async fn test_failure_keeps_cart_and_classifies_error() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet {
    build: Err(WalletError::classify("Insufficient input in transaction")),
    ..ScriptedWallet::happy()
  });
  let store = connected_store(wallet.clone(), &[]).await;
  fill_cart(&store);
  store.set_cart_open(true);

  let result = store.process_purchase().await;

  assert!(matches!(result, PurchaseResult::Failed(CheckoutError::InsufficientFunds(_))));
  assert_eq!(
    result.user_message(),
    "Insufficient funds in your wallet. Please add more ADA and try again."
  );
  assert_eq!(store.cart().item_count(), 3);
  assert!(store.view().cart_open);
  assert_eq!(store.checkout_state(), CheckoutState::Idle);
  assert!(!store.is_celebrating());
  assert!(!wallet.calls().contains(&"sign_tx"));
}

#[tokio::test]
#[serial]
async fn test_submit_rejection_and_unknown_errors() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet {
    submit: Err(WalletError::Rejected("user declined to sign".into())),
    ..ScriptedWallet::happy()
  });
  let store = connected_store(wallet, &[]).await;
  fill_cart(&store);
  assert_eq!(
    store.process_purchase().await.error(),
    Some(&CheckoutError::TransactionRejected("user declined to sign".into()))
  );

  let wallet = Arc::new(ScriptedWallet {
    sign: Err(WalletError::Other("socket hang up".into())),
    ..ScriptedWallet::happy()
  });
  let store = connected_store(wallet, &[]).await;
  fill_cart(&store);
  let result = store.process_purchase().await;
  assert_eq!(result.user_message(), "Transaction failed: socket hang up");
}

#[tokio::test]
#[serial]
async fn test_missing_payer_address_fails_checkout() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet {
    used: Ok(vec![]),
    change: Ok(Some(BUYER.to_string())),
    ..ScriptedWallet::happy()
  });
  let store = connected_store(wallet.clone(), &[]).await;
  // The display address still resolves through the change address.
  assert_eq!(store.display_address().unwrap().address(), Some(BUYER));
  fill_cart(&store);

  let result = store.process_purchase().await;

  assert_eq!(result, PurchaseResult::Failed(CheckoutError::NoPayerAddress));
  assert!(!wallet.calls().contains(&"build_tx"));
}

#[tokio::test]
#[serial]
async fn test_second_checkout_while_in_flight_is_rejected() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet {
    sign_delay: Some(Duration::from_millis(50)),
    ..ScriptedWallet::happy()
  });
  let store = connected_store(wallet.clone(), &[]).await;
  fill_cart(&store);

  let observe = async {
    tokio::time::sleep(Duration::from_millis(10)).await;
    let state = store.checkout_state();
    let disconnect = store.disconnect_wallet();
    (state, disconnect)
  };
  let (first, second, (mid_state, disconnect)) =
    tokio::join!(store.process_purchase(), store.process_purchase(), observe);

  assert!(first.is_success());
  assert_eq!(second, PurchaseResult::Failed(CheckoutError::InProgress));
  assert_eq!(mid_state, CheckoutState::InFlight(CheckoutPhase::Signing));
  assert!(disconnect.is_err());
  assert_eq!(wallet.calls().iter().filter(|c| **c == "submit_tx").count(), 1);
  assert_eq!(store.checkout_state(), CheckoutState::Idle);
}

#[tokio::test]
#[serial]
async fn test_items_added_during_checkout_stay_in_cart() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet {
    sign_delay: Some(Duration::from_millis(50)),
    ..ScriptedWallet::happy()
  });
  let store = connected_store(wallet.clone(), &[]).await;
  fill_cart(&store);

  let keep_shopping = async {
    tokio::time::sleep(Duration::from_millis(10)).await;
    let new_line = store.add_to_cart(ProductId(3));
    let extra_dress = store.add_to_cart(ProductId(2));
    (new_line, extra_dress)
  };
  let (result, (new_line, extra_dress)) = tokio::join!(store.process_purchase(), keep_shopping);

  assert!(result.is_success());
  assert_eq!(new_line, Ok(1));
  assert_eq!(extra_dress, Ok(3));
  let draft = wallet.last_draft().unwrap();
  assert_eq!(draft.payments[0].amount.to_string(), "110000000");

  let cart = store.cart();
  let left: Vec<(u32, u32)> = cart.items().iter().map(|i| (i.product.id.0, i.quantity)).collect();
  assert_eq!(left, vec![(2, 1), (3, 1)]);
  assert_eq!(store.total_price(), Decimal::from(105));
}

#[tokio::test]
#[serial]
async fn test_fractional_total_is_rejected_before_building() {
  setup_tracing();
  let wallet = Arc::new(ScriptedWallet::happy());
  let connector = Arc::new(ScriptedConnector::new(wallet.clone()));
  let config = test_config(&[]);
  let mut product = storefront::Catalog::boutique_collection(&config.seller_name).products()[0].clone();
  product.price = Decimal::new(10_000_001, 7); // 1.0000001 ADA
  let catalog = storefront::Catalog::new(vec![product]).unwrap();
  let store = storefront::Storefront::new(config, catalog, connector);
  store.connect_wallet().await.unwrap();
  store.add_to_cart(ProductId(1)).unwrap();

  let result = store.process_purchase().await;

  assert!(matches!(result, PurchaseResult::Failed(CheckoutError::AmountNotRepresentable(_))));
  assert!(!wallet.calls().contains(&"build_tx"));
  assert_eq!(store.cart().len(), 1);
}
