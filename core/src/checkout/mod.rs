// storefront/src/checkout/mod.rs

//! Checkout: turning the cart and a connected wallet into one submitted payment.
//!
//! The steps live in a `Flow` (see [`flow::checkout_flow`]). Each stage belongs
//! to a `CheckoutPhase`; the storefront watches phase changes to keep its
//! `CheckoutState` current while the run is awaiting the wallet.

pub mod context;
pub mod error;
pub mod flow;
pub mod state;

pub use context::{CheckoutCtx, CheckoutSettings};
pub use error::CheckoutError;
pub use flow::{checkout_flow, run_checkout};
pub use state::{CheckoutPhase, CheckoutState, PurchaseResult};
