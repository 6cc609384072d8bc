// storefront/src/wishlist.rs

//! Set of saved products, independent of the cart.

use crate::cart::Cart;
use crate::catalog::{CatalogError, Product, ProductId};
use std::collections::HashSet;
use tracing::debug;

/// Products in the order they were saved, with an id index for O(1) membership.
#[derive(Debug, Clone, Default)]
pub struct Wishlist {
  entries: Vec<Product>,
  ids: HashSet<ProductId>,
}

impl Wishlist {
  pub fn new() -> Self {
    Self::default()
  }

  /// Idempotent insert. Returns `true` if the product was not already saved.
  pub fn add(&mut self, product: &Product) -> bool {
    if !self.ids.insert(product.id) {
      return false;
    }
    self.entries.push(product.clone());
    debug!(product_id = %product.id, "Wishlist entry added.");
    true
  }

  /// Idempotent delete. Returns `true` if something was removed.
  pub fn remove(&mut self, id: ProductId) -> bool {
    if !self.ids.remove(&id) {
      return false;
    }
    self.entries.retain(|p| p.id != id);
    debug!(product_id = %id, "Wishlist entry removed.");
    true
  }

  pub fn contains(&self, id: ProductId) -> bool {
    self.ids.contains(&id)
  }

  /// Adds if absent, removes if present. Returns membership after the toggle.
  pub fn toggle(&mut self, product: &Product) -> bool {
    if self.remove(product.id) {
      false
    } else {
      self.add(product)
    }
  }

  /// Adds one unit of a saved product to `cart`. The wishlist entry stays.
  pub fn move_to_cart(&self, id: ProductId, cart: &mut Cart) -> Result<u32, CatalogError> {
    let product = self
      .entries
      .iter()
      .find(|p| p.id == id)
      .ok_or(CatalogError::ProductNotFound(id))?;
    Ok(cart.add(product))
  }

  pub fn entries(&self) -> &[Product] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
