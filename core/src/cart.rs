// storefront/src/cart.rs

//! In-memory shopping cart keyed by product id.

use crate::catalog::{Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A product plus how many units of it are in the cart. `quantity >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
  pub product: Product,
  pub quantity: u32,
}

impl CartItem {
  /// Saturates at `Decimal::MAX`; checkout then rejects the amount as unpayable.
  pub fn line_total(&self) -> Decimal {
    self.product.price.saturating_mul(Decimal::from(self.quantity))
  }
}

/// At most one line per product id, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
  items: Vec<CartItem>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds one unit. An existing line is incremented in place; a new product is
  /// appended. Returns the line's quantity after the add.
  pub fn add(&mut self, product: &Product) -> u32 {
    if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
      item.quantity = item.quantity.saturating_add(1);
      debug!(product_id = %product.id, quantity = item.quantity, "Cart line incremented.");
      return item.quantity;
    }
    self.items.push(CartItem {
      product: product.clone(),
      quantity: 1,
    });
    debug!(product_id = %product.id, "Cart line added.");
    1
  }

  /// Removes the whole line for `id`. Absent ids are a no-op.
  pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
    let idx = self.items.iter().position(|i| i.product.id == id)?;
    debug!(product_id = %id, "Cart line removed.");
    Some(self.items.remove(idx))
  }

  /// Sum of `price * quantity` over all lines; zero for an empty cart.
  pub fn total_price(&self) -> Decimal {
    self
      .items
      .iter()
      .map(CartItem::line_total)
      .fold(Decimal::ZERO, Decimal::saturating_add)
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  /// Takes the `paid` quantities out of the cart and drops lines that reach
  /// zero. Units added after `paid` was snapshotted stay.
  pub fn remove_purchased(&mut self, paid: &[CartItem]) {
    for line in paid {
      if let Some(idx) = self.items.iter().position(|i| i.product.id == line.product.id) {
        let item = &mut self.items[idx];
        item.quantity = item.quantity.saturating_sub(line.quantity);
        if item.quantity == 0 {
          self.items.remove(idx);
        }
      }
    }
    debug!(remaining_lines = self.items.len(), "Purchased units removed from cart.");
  }

  pub fn items(&self) -> &[CartItem] {
    &self.items
  }

  pub fn get(&self, id: ProductId) -> Option<&CartItem> {
    self.items.iter().find(|i| i.product.id == id)
  }

  /// Number of distinct lines.
  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Total number of units across all lines.
  pub fn item_count(&self) -> u64 {
    self.items.iter().map(|i| u64::from(i.quantity)).sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Category;

  fn product(id: u32, price: i64) -> Product {
    Product {
      id: ProductId(id),
      name: format!("Item {}", id),
      price: Decimal::from(price),
      image: String::new(),
      category: Category::Watch,
      description: String::new(),
      seller: "Shop".into(),
    }
  }

  #[test]
  fn repeated_adds_aggregate_into_one_line() {
    let mut cart = Cart::new();
    let p = product(1, 50);
    for n in 1..=4 {
      assert_eq!(cart.add(&p), n);
    }
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get(ProductId(1)).unwrap().quantity, 4);
  }

  #[test]
  fn increment_keeps_position_and_new_lines_append() {
    let mut cart = Cart::new();
    cart.add(&product(1, 1));
    cart.add(&product(2, 1));
    cart.add(&product(1, 1));
    cart.add(&product(3, 1));
    let ids: Vec<u32> = cart.items().iter().map(|i| i.product.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
  }

  #[test]
  fn removing_absent_id_leaves_cart_unchanged() {
    let mut cart = Cart::new();
    cart.add(&product(1, 10));
    let before = cart.clone();
    assert!(cart.remove(ProductId(99)).is_none());
    assert_eq!(cart, before);
  }

  #[test]
  fn total_is_sum_of_line_totals() {
    let mut cart = Cart::new();
    assert_eq!(cart.total_price(), Decimal::ZERO);
    cart.add(&product(1, 50));
    cart.add(&product(2, 30));
    cart.add(&product(2, 30));
    assert_eq!(cart.total_price(), Decimal::from(110));
    assert_eq!(cart.item_count(), 3);
  }

  #[test]
  fn fractional_prices_do_not_drift() {
    let mut cart = Cart::new();
    let mut p = product(1, 0);
    p.price = Decimal::new(1, 1); // 0.1
    for _ in 0..3 {
      cart.add(&p);
    }
    assert_eq!(cart.total_price(), Decimal::new(3, 1));
  }

  #[test]
  fn oversized_totals_saturate_instead_of_panicking() {
    let mut cart = Cart::new();
    let mut p = product(1, 0);
    p.price = Decimal::MAX;
    cart.add(&p);
    cart.add(&p);
    cart.add(&product(2, 1));
    assert_eq!(cart.total_price(), Decimal::MAX);
    assert!(crate::money::to_lovelace(cart.total_price()).is_err());
  }

  #[test]
  fn remove_purchased_keeps_units_added_later() {
    let mut cart = Cart::new();
    cart.add(&product(1, 50));
    cart.add(&product(2, 30));
    let paid = cart.items().to_vec();

    cart.add(&product(2, 30));
    cart.add(&product(3, 75));
    cart.remove_purchased(&paid);

    let left: Vec<(u32, u32)> = cart.items().iter().map(|i| (i.product.id.0, i.quantity)).collect();
    assert_eq!(left, vec![(2, 1), (3, 1)]);

    let rest = cart.items().to_vec();
    cart.remove_purchased(&rest);
    assert!(cart.is_empty());
  }

  #[test]
  fn clear_empties_everything() {
    let mut cart = Cart::new();
    cart.add(&product(1, 5));
    cart.clear();
    assert!(cart.is_empty());
    assert_eq!(cart.item_count(), 0);
  }
}
