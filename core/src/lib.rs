// storefront/src/lib.rs

//! Storefront: cart, wishlist and wallet-driven checkout for a Cardano shop.
//!
//! The crate holds everything a storefront page does with state, independent
//! of any UI framework:
//!  - A static product catalog with category filtering.
//!  - A cart keyed by product id and a wishlist with set semantics.
//!  - Wallet discovery and connection, with an ordered fallback for the address
//!    shown to the user.
//!  - A checkout state machine that builds one payment (plus an optional
//!    purchase memo and optional NFT receipts) and hands it to the wallet to
//!    build, sign and submit.
//!
//! Key custody, transaction encoding and submission belong to the wallet, reached
//! through the `WalletConnector` / `WalletApi` traits.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod flow;
pub mod metadata;
pub mod money;
pub mod storefront;
pub mod wallet;
pub mod wishlist;

// --- Re-exports for the Public API ---

pub use crate::cart::{Cart, CartItem};
pub use crate::catalog::{Catalog, CatalogError, Category, Product, ProductId};
pub use crate::checkout::{CheckoutError, CheckoutPhase, CheckoutSettings, CheckoutState, PurchaseResult};
pub use crate::config::{ApiKey, ConfigError, StorefrontConfig};
pub use crate::error::{FlowError, StorefrontError, StorefrontResult};
pub use crate::flow::{Flow, FlowContext, FlowControl, FlowOutcome, StageDef, StagePhase};
pub use crate::money::{to_lovelace, AmountError, Lovelace, LOVELACE_PER_ADA};
pub use crate::storefront::{Storefront, ViewState};
pub use crate::wallet::{
  ConnectError, ConnectionState, DisplayAddress, SignedTx, TxDraft, TxHash, UnsignedTx, WalletApi, WalletConnector,
  WalletError, WalletInfo, WalletSession,
};
pub use crate::wishlist::Wishlist;

/*
    Checkout at a glance:
    1. `Storefront::process_purchase` takes the checkout gate and snapshots the
       cart and the wallet handle into a `CheckoutCtx`.
    2. The checkout `Flow` runs its stages in order:
       validate_preconditions -> resolve_payer -> build_payment
       -> attach_purchase_memo? -> mint_receipts? -> build_transaction
       -> sign_transaction -> submit_transaction
    3. Each stage's phase is reported back so `checkout_state()` reads
       Validating / Building / Signing / Submitting while the run awaits the wallet.
    4. Success removes the paid units from the cart, closes the cart view and
       starts the celebration window. Failure leaves the cart alone. Both end
       at `Idle`.
*/
