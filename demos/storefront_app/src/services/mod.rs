// storefront/demos/storefront_app/src/services/mod.rs

pub mod wallet_sim;
