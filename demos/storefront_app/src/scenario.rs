// storefront/demos/storefront_app/src/scenario.rs

//! A scripted shopping session: the clicks a user would make on the page.

use crate::errors::Result;
use crate::services::wallet_sim::{SimulatedConnector, SimulatedWallet};
use std::sync::Arc;
use storefront::{Category, ConnectError, Lovelace, ProductId, PurchaseResult, Storefront};
use tracing::{info, instrument, warn};

#[instrument(name = "scenario::run", skip_all)]
pub async fn run(store: &Storefront, wallet: Arc<SimulatedWallet>, connector: Arc<SimulatedConnector>) -> Result<()> {
  info!(seller = %store.seller_display(), products = store.products().len(), "Storefront open.");

  // Browse
  store.set_category_filter(Some(Category::Watch));
  for product in store.visible_products() {
    info!(product_id = %product.id, name = %product.name, price = %product.price, "Watch listed.");
  }
  store.set_category_filter(None);

  // Wishlist, then move one saved item to the cart
  store.add_to_wishlist(ProductId(2))?;
  store.toggle_wishlist(ProductId(4))?;
  info!(saved = store.wishlist().len(), "Wishlist updated.");
  store.move_to_cart(ProductId(2))?;

  // Cart
  store.add_to_cart(ProductId(1))?;
  store.add_to_cart(ProductId(2))?;
  store.add_to_cart(ProductId(5))?;
  store.remove_from_cart(ProductId(5));
  store.toggle_cart_view();
  let cart = store.cart();
  info!(lines = cart.len(), units = cart.item_count(), total = %store.total_price(), "Cart ready.");

  // Checkout before connecting is refused locally
  report(&store.process_purchase().await);

  // A dismissed wallet prompt, then a successful connect
  connector.set_refuse(true);
  if let Err(e) = store.connect_wallet().await {
    warn!(error = %e, "Connect attempt failed.");
  }
  connector.set_refuse(false);
  match store.connect_wallet().await {
    Ok(address) => info!(address = %address, "Wallet ready."),
    Err(ConnectError::NoWalletDetected) => {
      warn!("No wallet available, stopping the session.");
      return Ok(());
    }
    Err(e) => return Err(e.into()),
  }

  // Purchase
  let result = store.process_purchase().await;
  report(&result);
  if result.is_success() {
    info!(
      celebrating = store.is_celebrating(),
      remaining_ms = store.celebration_remaining().as_millis() as u64,
      balance = %wallet.balance(),
      "Purchase confirmed."
    );
  }

  // An empty cart is refused, then a drained wallet fails and keeps the cart
  report(&store.process_purchase().await);
  store.add_to_cart(ProductId(3))?;
  wallet.set_balance(Lovelace(1_000_000));
  report(&store.process_purchase().await);
  info!(units_left = store.cart().item_count(), "Cart after failed purchase.");

  store.disconnect_wallet()?;
  Ok(())
}

fn report(result: &PurchaseResult) {
  match result {
    PurchaseResult::Succeeded { tx_hash, .. } => info!(tx_hash = %tx_hash, "{}", result.user_message()),
    PurchaseResult::Failed(e) => warn!(error = %e, "{}", result.user_message()),
  }
}
