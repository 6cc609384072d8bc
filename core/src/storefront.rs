// storefront/src/storefront.rs

//! `Storefront`: the one object that owns all page state.
//!
//! UI bindings read snapshots from it and call its operations. Only the connect
//! flow and the checkout orchestrator write the wallet session.

use crate::cart::{Cart, CartItem};
use crate::catalog::{Catalog, CatalogError, Category, Product, ProductId};
use crate::checkout::{
  checkout_flow, run_checkout, CheckoutCtx, CheckoutError, CheckoutPhase, CheckoutState, PurchaseResult,
};
use crate::config::StorefrontConfig;
use crate::flow::{Flow, FlowContext};
use crate::metadata::shorten;
use crate::wallet::{ConnectError, ConnectionState, DisplayAddress, WalletConnector, WalletSession};
use crate::wishlist::Wishlist;
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

const SELLER_DISPLAY_HEAD: usize = 20;
const SELLER_DISPLAY_TAIL: usize = 8;

/// Which panels are open and which category is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
  pub cart_open: bool,
  pub wishlist_open: bool,
  /// `None` shows every category.
  pub category: Option<Category>,
}

struct StorefrontState {
  catalog: Catalog,
  cart: Cart,
  wishlist: Wishlist,
  connection: ConnectionState,
  view: ViewState,
  checkout: CheckoutState,
  last_result: Option<PurchaseResult>,
  celebrating_until: Option<Instant>,
}

pub struct Storefront {
  config: StorefrontConfig,
  connector: Arc<dyn WalletConnector>,
  checkout_flow: Flow<CheckoutCtx, CheckoutError, CheckoutPhase>,
  // Guards on this lock are never held across an await.
  state: Arc<RwLock<StorefrontState>>,
}

impl Storefront {
  pub fn new(config: StorefrontConfig, catalog: Catalog, connector: Arc<dyn WalletConnector>) -> Self {
    Self {
      config,
      connector,
      checkout_flow: checkout_flow(),
      state: Arc::new(RwLock::new(StorefrontState {
        catalog,
        cart: Cart::new(),
        wishlist: Wishlist::new(),
        connection: ConnectionState::Disconnected,
        view: ViewState::default(),
        checkout: CheckoutState::Idle,
        last_result: None,
        celebrating_until: None,
      })),
    }
  }

  pub fn config(&self) -> &StorefrontConfig {
    &self.config
  }

  // --- Catalog & view ---

  pub fn products(&self) -> Vec<Product> {
    self.state.read().catalog.products().to_vec()
  }

  /// Products in the selected category, or all of them.
  pub fn visible_products(&self) -> Vec<Product> {
    let state = self.state.read();
    state.catalog.filter(state.view.category).cloned().collect()
  }

  pub fn set_category_filter(&self, category: Option<Category>) {
    self.state.write().view.category = category;
  }

  pub fn view(&self) -> ViewState {
    self.state.read().view
  }

  pub fn set_cart_open(&self, open: bool) {
    self.state.write().view.cart_open = open;
  }

  pub fn toggle_cart_view(&self) -> bool {
    let mut state = self.state.write();
    state.view.cart_open = !state.view.cart_open;
    state.view.cart_open
  }

  pub fn toggle_wishlist_view(&self) -> bool {
    let mut state = self.state.write();
    state.view.wishlist_open = !state.view.wishlist_open;
    state.view.wishlist_open
  }

  /// Recipient address as displayed: head, `...`, tail.
  pub fn seller_display(&self) -> String {
    shorten(&self.config.seller_address, SELLER_DISPLAY_HEAD, SELLER_DISPLAY_TAIL)
  }

  // --- Cart ---

  /// Adds one unit of `id`; returns the line's new quantity.
  pub fn add_to_cart(&self, id: ProductId) -> Result<u32, CatalogError> {
    let mut state = self.state.write();
    let product = state.catalog.require(id)?.clone();
    Ok(state.cart.add(&product))
  }

  /// Removes the whole line. Absent ids are a no-op.
  pub fn remove_from_cart(&self, id: ProductId) -> Option<CartItem> {
    self.state.write().cart.remove(id)
  }

  pub fn total_price(&self) -> Decimal {
    self.state.read().cart.total_price()
  }

  pub fn cart(&self) -> Cart {
    self.state.read().cart.clone()
  }

  // --- Wishlist ---

  pub fn add_to_wishlist(&self, id: ProductId) -> Result<bool, CatalogError> {
    let mut state = self.state.write();
    let product = state.catalog.require(id)?.clone();
    Ok(state.wishlist.add(&product))
  }

  pub fn remove_from_wishlist(&self, id: ProductId) -> bool {
    self.state.write().wishlist.remove(id)
  }

  pub fn is_in_wishlist(&self, id: ProductId) -> bool {
    self.state.read().wishlist.contains(id)
  }

  /// Returns whether the product is in the wishlist afterwards.
  pub fn toggle_wishlist(&self, id: ProductId) -> Result<bool, CatalogError> {
    let mut state = self.state.write();
    let product = state.catalog.require(id)?.clone();
    Ok(state.wishlist.toggle(&product))
  }

  /// Adds a wishlisted product to the cart. The wishlist entry stays.
  pub fn move_to_cart(&self, id: ProductId) -> Result<u32, CatalogError> {
    let mut state = self.state.write();
    let StorefrontState { wishlist, cart, .. } = &mut *state;
    wishlist.move_to_cart(id, cart)
  }

  pub fn wishlist(&self) -> Vec<Product> {
    self.state.read().wishlist.entries().to_vec()
  }

  // --- Wallet ---

  pub fn connection(&self) -> ConnectionState {
    self.state.read().connection.clone()
  }

  pub fn display_address(&self) -> Option<DisplayAddress> {
    self
      .state
      .read()
      .connection
      .session()
      .map(|s| s.display_address.clone())
  }

  /// `Disconnected -> Connecting -> Connected`. On failure the state returns to
  /// `Disconnected`. A new session replaces any existing one.
  #[instrument(name = "Storefront::connect_wallet", skip(self))]
  pub async fn connect_wallet(&self) -> Result<DisplayAddress, ConnectError> {
    {
      let mut state = self.state.write();
      if matches!(state.connection, ConnectionState::Connecting { .. }) {
        return Err(ConnectError::AlreadyConnecting);
      }
      if !state.checkout.is_idle() {
        return Err(ConnectError::CheckoutInProgress);
      }
      state.connection = ConnectionState::Connecting {
        wallet_hint: self.config.preferred_wallet.clone(),
      };
    }

    let outcome = WalletSession::establish(self.connector.as_ref(), &self.config.preferred_wallet).await;

    let mut state = self.state.write();
    match outcome {
      Ok(session) => {
        let address = session.display_address.clone();
        state.connection = ConnectionState::Connected(session);
        Ok(address)
      }
      Err(e) => {
        warn!(error = %e, "Wallet connection failed.");
        state.connection = ConnectionState::Disconnected;
        Err(e)
      }
    }
  }

  pub fn disconnect_wallet(&self) -> Result<(), ConnectError> {
    let mut state = self.state.write();
    if !state.checkout.is_idle() {
      return Err(ConnectError::CheckoutInProgress);
    }
    state.connection = ConnectionState::Disconnected;
    info!("Wallet disconnected.");
    Ok(())
  }

  // --- Checkout ---

  pub fn checkout_state(&self) -> CheckoutState {
    self.state.read().checkout
  }

  pub fn last_result(&self) -> Option<PurchaseResult> {
    self.state.read().last_result.clone()
  }

  pub fn is_celebrating(&self) -> bool {
    self
      .state
      .read()
      .celebrating_until
      .is_some_and(|until| Instant::now() < until)
  }

  pub fn celebration_remaining(&self) -> Duration {
    self
      .state
      .read()
      .celebrating_until
      .map(|until| until.saturating_duration_since(Instant::now()))
      .unwrap_or_default()
  }

  /// Runs one checkout attempt to completion.
  ///
  /// Only one attempt may be in flight: the state gate is taken before the
  /// first await, and a concurrent call fails with `CheckoutError::InProgress`
  /// without contacting the wallet. Either way the state ends at `Idle`.
  ///
  /// The cart stays editable during the run. Success removes exactly the units
  /// that were paid for.
  #[instrument(name = "Storefront::process_purchase", skip(self))]
  pub async fn process_purchase(&self) -> PurchaseResult {
    let (ctx, total, paid_lines) = {
      let mut state = self.state.write();
      if !state.checkout.is_idle() {
        warn!("Checkout requested while another is in flight.");
        return PurchaseResult::Failed(CheckoutError::InProgress);
      }
      state.checkout = CheckoutState::InFlight(CheckoutPhase::Validating);
      let total = state.cart.total_price();
      let paid_lines = state.cart.items().to_vec();
      let ctx = CheckoutCtx::new(
        paid_lines.clone(),
        total,
        state.connection.session().map(|s| Arc::clone(&s.api)),
        self.config.checkout_settings(),
        Utc::now(),
      );
      (ctx, total, paid_lines)
    };

    let state_for_phases = Arc::clone(&self.state);
    let on_phase = move |phase: CheckoutPhase| {
      state_for_phases.write().checkout = CheckoutState::InFlight(phase);
    };
    let outcome = run_checkout(&self.checkout_flow, FlowContext::new(ctx), &on_phase).await;

    let mut state = self.state.write();
    state.checkout = CheckoutState::Idle;
    let result = match outcome {
      Ok(tx_hash) => {
        info!(tx_hash = %tx_hash, total = %total, "Purchase succeeded.");
        // The lock was released while awaiting the wallet; only the paid snapshot leaves.
        state.cart.remove_purchased(&paid_lines);
        state.view.cart_open = false;
        state.celebrating_until = Some(Instant::now() + self.config.celebration);
        PurchaseResult::Succeeded {
          tx_hash,
          total,
          seller_name: self.config.seller_name.clone(),
        }
      }
      Err(e) => {
        warn!(error = %e, "Purchase failed.");
        PurchaseResult::Failed(e)
      }
    };
    state.last_result = Some(result.clone());
    result
  }
}
