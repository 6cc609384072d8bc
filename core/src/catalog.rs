// storefront/src/catalog.rs

//! Static, read-only product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Highest unit price a catalog accepts: the total ADA supply.
pub const MAX_UNIT_PRICE_ADA: i64 = 45_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Watch,
  Jewelry,
  Dress,
}

impl Category {
  pub fn label(self) -> &'static str {
    match self {
      Category::Watch => "Watch",
      Category::Jewelry => "Jewelry",
      Category::Dress => "Dress",
    }
  }
}

/// A product as listed in the store. Never mutated after the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  /// Unit price in display units (ADA).
  pub price: Decimal,
  pub image: String,
  pub category: Category,
  pub description: String,
  pub seller: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
  #[error("Product not found: {0}")]
  ProductNotFound(ProductId),

  #[error("Duplicate product id in catalog: {0}")]
  DuplicateId(ProductId),

  #[error("Product {0} has a negative price")]
  NegativePrice(ProductId),

  #[error("Product {0} is priced above {max} ADA", max = MAX_UNIT_PRICE_ADA)]
  PriceTooHigh(ProductId),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
  products: Vec<Product>,
}

impl Catalog {
  /// Builds a catalog, rejecting duplicate identifiers and prices outside
  /// `0..=MAX_UNIT_PRICE_ADA`.
  pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
    let mut seen = HashSet::with_capacity(products.len());
    let max_price = Decimal::from(MAX_UNIT_PRICE_ADA);
    for product in &products {
      if !seen.insert(product.id) {
        return Err(CatalogError::DuplicateId(product.id));
      }
      if product.price.is_sign_negative() {
        return Err(CatalogError::NegativePrice(product.id));
      }
      if product.price > max_price {
        return Err(CatalogError::PriceTooHigh(product.id));
      }
    }
    Ok(Self { products })
  }

  pub fn products(&self) -> &[Product] {
    &self.products
  }

  pub fn get(&self, id: ProductId) -> Option<&Product> {
    self.products.iter().find(|p| p.id == id)
  }

  pub fn require(&self, id: ProductId) -> Result<&Product, CatalogError> {
    self.get(id).ok_or(CatalogError::ProductNotFound(id))
  }

  /// Products in listing order; `None` means every category.
  pub fn filter(&self, category: Option<Category>) -> impl Iterator<Item = &Product> + '_ {
    self
      .products
      .iter()
      .filter(move |p| category.map_or(true, |c| p.category == c))
  }

  /// Distinct categories in first-seen order.
  pub fn categories(&self) -> Vec<Category> {
    let mut out = Vec::new();
    for p in &self.products {
      if !out.contains(&p.category) {
        out.push(p.category);
      }
    }
    out
  }

  pub fn len(&self) -> usize {
    self.products.len()
  }

  pub fn is_empty(&self) -> bool {
    self.products.is_empty()
  }

  /// Watches and jewelry, the collection that pairs with the wishlist.
  pub fn premium_collection(seller: &str) -> Self {
    let items = [
      (1, "Luxury Gold Watch", 50, Category::Watch, "18k solid gold automatic with sapphire crystal and exhibition caseback."),
      (2, "Diamond Tennis Bracelet", 75, Category::Jewelry, "Five carat VVS1 diamonds in a platinum setting with invisible clasp."),
      (3, "Emerald Ring Set", 60, Category::Jewelry, "Colombian emeralds set in 22k yellow gold with micro-pave accents."),
      (4, "Vintage Leather Watch", 25, Category::Watch, "Restored 1960s mechanical movement on a hand-stitched calfskin strap."),
      (5, "Pearl Earrings", 45, Category::Jewelry, "12mm South Sea pearls on platinum posts with diamond studs."),
      (6, "Swiss Automatic Watch", 85, Category::Watch, "In-house Swiss movement with 72-hour reserve and skeleton caseback."),
    ];
    Self::from_fixture(&items, seller, "images/premium")
  }

  /// Watches and dresses.
  pub fn boutique_collection(seller: &str) -> Self {
    let items = [
      (1, "Luxury Gold Watch", 50, Category::Watch, "Gold plated automatic watch with sapphire crystal display."),
      (2, "Elegant Evening Dress", 30, Category::Dress, "Purple evening dress for formal events."),
      (3, "Diamond Sports Watch", 75, Category::Watch, "Titanium sports watch with diamond markers."),
      (4, "Designer Cocktail Dress", 45, Category::Dress, "Black cocktail dress with gold accents."),
      (5, "Vintage Chronograph", 65, Category::Watch, "Mechanical chronograph on a brown leather strap."),
    ];
    Self::from_fixture(&items, seller, "images/boutique")
  }

  fn from_fixture(items: &[(u32, &str, i64, Category, &str)], seller: &str, image_dir: &str) -> Self {
    let products = items
      .iter()
      .map(|&(id, name, price, category, description)| Product {
        id: ProductId(id),
        name: name.to_string(),
        price: Decimal::from(price),
        image: format!("{}/{}.svg", image_dir, name.to_lowercase().replace(' ', "-")),
        category,
        description: description.to_string(),
        seller: seller.to_string(),
      })
      .collect();
    // Fixture ids are unique and prices positive, so this cannot fail validation.
    Self { products }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn product(id: u32, price: i64, category: Category) -> Product {
    Product {
      id: ProductId(id),
      name: format!("Item {}", id),
      price: Decimal::from(price),
      image: String::new(),
      category,
      description: String::new(),
      seller: "Shop".into(),
    }
  }

  #[test]
  fn rejects_duplicate_ids() {
    let err = Catalog::new(vec![product(1, 5, Category::Watch), product(1, 6, Category::Dress)]).unwrap_err();
    assert_eq!(err, CatalogError::DuplicateId(ProductId(1)));
  }

  #[test]
  fn rejects_negative_price() {
    let err = Catalog::new(vec![product(7, -1, Category::Watch)]).unwrap_err();
    assert_eq!(err, CatalogError::NegativePrice(ProductId(7)));
  }

  #[test]
  fn rejects_price_above_supply() {
    assert!(Catalog::new(vec![product(8, MAX_UNIT_PRICE_ADA, Category::Watch)]).is_ok());
    let err = Catalog::new(vec![product(8, MAX_UNIT_PRICE_ADA + 1, Category::Watch)]).unwrap_err();
    assert_eq!(err, CatalogError::PriceTooHigh(ProductId(8)));
  }

  #[test]
  fn filter_by_category_keeps_listing_order() {
    let catalog = Catalog::premium_collection("Premium Marketplace");
    let watches: Vec<u32> = catalog.filter(Some(Category::Watch)).map(|p| p.id.0).collect();
    assert_eq!(watches, vec![1, 4, 6]);
    assert_eq!(catalog.filter(None).count(), 6);
    assert_eq!(catalog.categories(), vec![Category::Watch, Category::Jewelry]);
  }

  #[test]
  fn builtin_collections_share_one_seller() {
    let catalog = Catalog::boutique_collection("Premium Marketplace");
    assert_eq!(catalog.len(), 5);
    assert!(catalog.products().iter().all(|p| p.seller == "Premium Marketplace"));
    assert_eq!(catalog.require(ProductId(2)).unwrap().category, Category::Dress);
    assert_eq!(catalog.require(ProductId(42)), Err(CatalogError::ProductNotFound(ProductId(42))));
  }

  #[test]
  fn builtin_collections_pass_validation() {
    for catalog in [Catalog::premium_collection("s"), Catalog::boutique_collection("s")] {
      assert!(Catalog::new(catalog.products().to_vec()).is_ok());
    }
  }
}
