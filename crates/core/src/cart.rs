//! The session cart.
//!
//! Lines are keyed by item code: a product appears at most once, and a
//! second add is refused so the customer edits the quantity instead. Lines
//! keep the order they were added in, which becomes the order's item order.

use serde::{Deserialize, Serialize};

use crate::types::{CartLine, InvalidQuantity, ItemCode, Product, Quantity, UnitOfMeasure};

/// Key identifying a cart line.
pub type LineKey = ItemCode;

/// Errors from cart operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product already has a line in the cart.
    #[error("{0} is already in your cart; edit the quantity in the cart")]
    Duplicate(ItemCode),
    /// Quantity below one.
    #[error(transparent)]
    InvalidQuantity(#[from] InvalidQuantity),
    /// The product cannot be bought in the requested unit.
    #[error("{item_code} cannot be ordered by {unit}")]
    UnitNotAllowed {
        item_code: ItemCode,
        unit: UnitOfMeasure,
    },
    /// The product allows neither unit.
    #[error("{0} is not available for purchase")]
    NotPurchasable(ItemCode),
    /// No line with this key.
    #[error("{0} is not in your cart")]
    LineNotFound(LineKey),
}

/// A customer's in-progress order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a new line for `product`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotPurchasable`] or [`CartError::UnitNotAllowed`]
    /// if the product cannot be bought that way, [`CartError::InvalidQuantity`]
    /// if `quantity < 1`, and [`CartError::Duplicate`] if the product is
    /// already in the cart. The cart is unchanged on error.
    pub fn add(
        &mut self,
        product: &Product,
        unit: UnitOfMeasure,
        quantity: i64,
    ) -> Result<CartLine, CartError> {
        if !product.is_purchasable() {
            return Err(CartError::NotPurchasable(product.item_code.clone()));
        }
        if !product.allows(unit) {
            return Err(CartError::UnitNotAllowed {
                item_code: product.item_code.clone(),
                unit,
            });
        }
        let quantity = Quantity::new(quantity)?;
        if self.contains(&product.item_code) {
            return Err(CartError::Duplicate(product.item_code.clone()));
        }

        let line = CartLine {
            item_code: product.item_code.clone(),
            description: product.description.clone(),
            brand: product.brand().unwrap_or_default().to_string(),
            unit_of_measure: unit,
            quantity,
        };
        self.lines.push(line.clone());
        Ok(line)
    }

    /// Change the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity < 1` and
    /// [`CartError::LineNotFound`] if there is no such line. The cart is
    /// unchanged on error.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: i64) -> Result<(), CartError> {
        let quantity = Quantity::new(quantity)?;
        let line = self
            .lines
            .iter_mut()
            .find(|line| &line.item_code == key)
            .ok_or_else(|| CartError::LineNotFound(key.clone()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line; returns it if it existed.
    pub fn remove(&mut self, key: &LineKey) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| &line.item_code == key)?;
        Some(self.lines.remove(index))
    }

    /// Whether a line exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &LineKey) -> bool {
        self.lines.iter().any(|line| &line.item_code == key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Lines in the order they were added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Copy of the current lines, for an order snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn code(s: &str) -> ItemCode {
        ItemCode::parse(s).unwrap()
    }

    fn rice() -> Product {
        let mut p = Product::new(code("SKU1"), "Rice 5kg");
        p.brand = Some("Tany".to_string());
        p
    }

    #[test]
    fn test_add_line() {
        let mut cart = Cart::new();
        let line = cart.add(&rice(), UnitOfMeasure::Case, 3).unwrap();
        assert_eq!(line.item_code, code("SKU1"));
        assert_eq!(line.brand, "Tany");
        assert_eq!(line.quantity.get(), 3);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_duplicate_is_rejected_without_overwrite() {
        let mut cart = Cart::new();
        cart.add(&rice(), UnitOfMeasure::Case, 3).unwrap();
        let err = cart.add(&rice(), UnitOfMeasure::Each, 7).unwrap_err();
        assert_eq!(err, CartError::Duplicate(code("SKU1")));
        assert_eq!(cart.lines()[0].quantity.get(), 3);
        assert_eq!(cart.lines()[0].unit_of_measure, UnitOfMeasure::Case);
    }

    #[test]
    fn test_add_rejects_bad_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&rice(), UnitOfMeasure::Case, 0),
            Err(CartError::InvalidQuantity(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_respects_units() {
        let mut cart = Cart::new();
        let mut each_only = rice();
        each_only.allow_case = false;
        assert!(matches!(
            cart.add(&each_only, UnitOfMeasure::Case, 1),
            Err(CartError::UnitNotAllowed { .. })
        ));

        let mut neither = rice();
        neither.allow_case = false;
        neither.allow_each = false;
        assert_eq!(
            cart.add(&neither, UnitOfMeasure::Each, 1).unwrap_err(),
            CartError::NotPurchasable(code("SKU1"))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_rejects_below_one_without_mutation() {
        let mut cart = Cart::new();
        cart.add(&rice(), UnitOfMeasure::Case, 3).unwrap();
        let before = cart.clone();

        for bad in [0, -1, i64::MIN] {
            assert!(matches!(
                cart.set_quantity(&code("SKU1"), bad),
                Err(CartError::InvalidQuantity(_))
            ));
            assert_eq!(cart, before);
        }

        cart.set_quantity(&code("SKU1"), 5).unwrap();
        assert_eq!(cart.lines()[0].quantity.get(), 5);
    }

    #[test]
    fn test_set_quantity_unknown_line() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.set_quantity(&code("NOPE"), 2),
            Err(CartError::LineNotFound(code("NOPE")))
        );
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut cart = Cart::new();
        assert!(cart.remove(&code("SKU1")).is_none());
        cart.add(&rice(), UnitOfMeasure::Each, 1).unwrap();
        assert!(cart.remove(&code("SKU1")).is_some());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        for c in ["B", "A", "C"] {
            cart.add(&Product::new(code(c), c), UnitOfMeasure::Each, 1)
                .unwrap();
        }
        let order: Vec<_> = cart.lines().iter().map(|l| l.item_code.to_string()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }
}
