//! Shopping cart value type.
//!
//! The cart is a pure in-memory structure owned by the browsing session;
//! checkout (turning a cart into an order) belongs to an external system.
//! Shipping is calculated at checkout, so the cart only ever knows its
//! subtotal.

use serde::{Deserialize, Serialize};

use crate::types::{DomainError, Money, ProductId, ProductName, Quantity};

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalogue product
    pub product_id: ProductId,
    /// Display name at time of adding
    pub product_name: ProductName,
    /// Current list price
    pub unit_price: Money,
    /// Units in the cart
    pub quantity: Quantity,
}

/// A customer's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines currently in the cart, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Add units of a product; an existing line for the same product is
    /// merged by adding quantities.
    pub fn add(&mut self, item: CartItem) -> Result<(), DomainError> {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            existing.quantity = existing.quantity.checked_add(item.quantity)?;
        } else {
            self.items.push(item);
        }
        Ok(())
    }

    /// Set the quantity of a line; zero removes the line. Unknown products
    /// are ignored.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), DomainError> {
        if quantity == 0 {
            self.remove(product_id);
            return Ok(());
        }
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| &line.product_id == product_id)
        {
            line.quantity = Quantity::new(quantity)?;
        }
        Ok(())
    }

    /// Remove a line entirely. Unknown products are ignored.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|line| &line.product_id != product_id);
    }

    /// Sum of price × quantity across all lines.
    pub fn subtotal(&self) -> Result<Money, DomainError> {
        self.items.iter().try_fold(Money::default(), |acc, line| {
            acc.checked_add(line.unit_price.multiply_by_quantity(line.quantity)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, paise: u64, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::try_new(id.to_string()).unwrap(),
            product_name: ProductName::try_new(format!("Product {id}")).unwrap(),
            unit_price: Money::from_paise(paise).unwrap(),
            quantity: Quantity::new(quantity).unwrap(),
        }
    }

    #[test]
    fn test_empty_cart_subtotal_is_zero() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal().unwrap(), Money::default());
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let mut cart = Cart::new();
        cart.add(line("truenav-pro", 1_999_900, 1)).unwrap();
        cart.add(line("micronav-fpv", 499_900, 2)).unwrap();
        // 19999.00 + 2 × 4999.00
        assert_eq!(cart.subtotal().unwrap().to_paise(), 2_999_700);
    }

    #[test]
    fn test_adding_same_product_merges_quantities() {
        let mut cart = Cart::new();
        cart.add(line("truenav-pro", 1_999_900, 1)).unwrap();
        cart.add(line("truenav-pro", 1_999_900, 2)).unwrap();
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].quantity.value(), 3);
    }

    #[test]
    fn test_set_quantity_updates_line() {
        let mut cart = Cart::new();
        cart.add(line("truenav-pro", 1_999_900, 1)).unwrap();
        let id = cart.items()[0].product_id.clone();
        cart.set_quantity(&id, 5).unwrap();
        assert_eq!(cart.items()[0].quantity.value(), 5);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(line("truenav-pro", 1_999_900, 1)).unwrap();
        let id = cart.items()[0].product_id.clone();
        cart.set_quantity(&id, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_unknown_product_is_ignored() {
        let mut cart = Cart::new();
        cart.add(line("truenav-pro", 1_999_900, 1)).unwrap();
        cart.remove(&ProductId::try_new("not-in-cart".to_string()).unwrap());
        assert_eq!(cart.line_count(), 1);
    }
}
