//! Core domain primitives for the storefront.
//!
//! All types use smart constructors to ensure validity at construction time,
//! following the "parse, don't validate" principle. Once a value exists it is
//! known to be well-formed; downstream code never re-checks it.

use nutype::nutype;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors produced when constructing domain primitives from raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Order number validation error
    #[error("Invalid order number: {0}")]
    InvalidOrderNumber(String),
    /// Product identifier validation error
    #[error("Invalid product ID: {0}")]
    InvalidProductId(String),
    /// Product name validation error
    #[error("Invalid product name: {0}")]
    InvalidProductName(String),
    /// Invalid quantity value
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    /// Invalid money amount
    #[error("Invalid money amount: {0}")]
    InvalidMoney(String),
}

impl From<OrderNumberError> for DomainError {
    fn from(err: OrderNumberError) -> Self {
        Self::InvalidOrderNumber(err.to_string())
    }
}

impl From<ProductIdError> for DomainError {
    fn from(err: ProductIdError) -> Self {
        Self::InvalidProductId(err.to_string())
    }
}

impl From<ProductNameError> for DomainError {
    fn from(err: ProductNameError) -> Self {
        Self::InvalidProductName(err.to_string())
    }
}

/// Unique identifier of an order row.
///
/// UUIDv7 gives creation-time ordering for free, which keeps the order
/// history listing stable when timestamps collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new `OrderId` with the current timestamp.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an existing UUID, e.g. one read back from storage.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier of the principal an order belongs to.
///
/// Supplied by the external authentication collaborator; the core never
/// mints these itself outside of tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new `UserId` with the current timestamp.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an existing UUID resolved from a session token.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-readable order number, e.g. `SA-1001`.
///
/// The format is decided by the external checkout system; we only require
/// it to be non-empty and reasonably short. The value is untrusted text and
/// must be escaped before interpolation into markup.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 32),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct OrderNumber(String);

/// Catalogue product identifier, e.g. `precisionpoint-pro`.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct ProductId(String);

/// Product name as shown to customers.
///
/// Untrusted text: typed, but still escaped before markup interpolation.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 120),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct ProductName(String);

/// Purchased quantity of a single line item.
///
/// Must be positive, maximum 10 000 per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    /// Maximum quantity per order line
    pub const MAX_QUANTITY: u32 = 10_000;

    /// Create a new quantity
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidQuantity(
                "Quantity must be greater than 0".to_string(),
            ));
        }
        if value > Self::MAX_QUANTITY {
            return Err(DomainError::InvalidQuantity(format!(
                "Quantity {} exceeds maximum {}",
                value,
                Self::MAX_QUANTITY
            )));
        }
        Ok(Self(value))
    }

    /// Get the underlying value
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Add quantities, checking for overflow and the per-line maximum
    pub fn checked_add(self, other: Self) -> Result<Self, DomainError> {
        let new_value = self
            .0
            .checked_add(other.0)
            .ok_or_else(|| DomainError::InvalidQuantity("Quantity overflow".to_string()))?;
        Self::new(new_value)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monetary amount in Indian rupees.
///
/// Uses `Decimal` for precise arithmetic. Must be non-negative with at most
/// 2 decimal places. `Default` is zero, which is what malformed or missing
/// amounts at the storage boundary collapse to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Maximum representable amount (100 million rupees)
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

    /// Create money from paise (avoids floating point issues)
    pub fn from_paise(paise: u64) -> Result<Self, DomainError> {
        let decimal = Decimal::new(paise as i64, 2);
        Self::new(decimal)
    }

    /// Create money from a decimal rupee amount
    pub fn new(amount: Decimal) -> Result<Self, DomainError> {
        if amount.is_sign_negative() {
            return Err(DomainError::InvalidMoney(format!(
                "Money amount cannot be negative: {}",
                amount
            )));
        }
        if amount.scale() > 2 {
            return Err(DomainError::InvalidMoney(format!(
                "Money amount cannot have more than 2 decimal places: {}",
                amount
            )));
        }
        if amount > Self::MAX_AMOUNT {
            return Err(DomainError::InvalidMoney(format!(
                "Money amount {} exceeds maximum {}",
                amount,
                Self::MAX_AMOUNT
            )));
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal value
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Convert to paise for storage
    pub fn to_paise(&self) -> u64 {
        use rust_decimal::prelude::ToPrimitive;
        (self.0 * Decimal::from(100)).to_u64().unwrap_or(0)
    }

    /// Add money amounts
    pub fn checked_add(self, other: Self) -> Result<Self, DomainError> {
        Self::new(self.0 + other.0)
    }

    /// Multiply by a line quantity
    pub fn multiply_by_quantity(self, quantity: Quantity) -> Result<Self, DomainError> {
        Self::new(self.0 * Decimal::from(quantity.value()))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{:.2}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self(Decimal::new(0, 0))
    }
}

impl std::str::FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let amount_str = trimmed
            .strip_prefix('₹')
            .map_or(trimmed, |stripped| stripped);

        let decimal = amount_str.parse::<Decimal>().map_err(|e| {
            DomainError::InvalidMoney(format!("Failed to parse money amount '{}': {}", s, e))
        })?;

        Self::new(decimal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_order_number_validation() {
        assert!(OrderNumber::try_new("SA-1001".to_string()).is_ok());
        assert!(OrderNumber::try_new("  SA-1001  ".to_string()).is_ok());
        assert!(OrderNumber::try_new(String::new()).is_err());
        assert!(OrderNumber::try_new("   ".to_string()).is_err());
        assert!(OrderNumber::try_new("X".repeat(33)).is_err());
    }

    #[test]
    fn test_order_number_is_trimmed() {
        let number = OrderNumber::try_new("  SA-1001 ".to_string()).unwrap();
        assert_eq!(number.as_ref(), "SA-1001");
    }

    #[test]
    fn test_order_id_roundtrip() {
        let id = OrderId::new();
        let parsed: OrderId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_product_name_validation() {
        assert!(ProductName::try_new("PrecisionPoint-Pro".to_string()).is_ok());
        assert!(ProductName::try_new(String::new()).is_err());
        assert!(ProductName::try_new("x".repeat(121)).is_err());
    }

    #[test]
    fn test_quantity_validation() {
        assert!(Quantity::new(1).is_ok());
        assert!(Quantity::new(10_000).is_ok());
        assert!(Quantity::new(0).is_err());
        assert!(Quantity::new(10_001).is_err());
    }

    #[test]
    fn test_money_validation() {
        assert!(Money::from_paise(100).is_ok()); // ₹1.00
        assert!(Money::new(Decimal::new(1050, 2)).is_ok()); // ₹10.50

        // Negative amount should fail
        assert!(Money::new(Decimal::new(-100, 2)).is_err());

        // Too many decimal places should fail
        assert!(Money::new(Decimal::new(1001, 3)).is_err());
    }

    #[test]
    fn test_money_display_uses_two_decimals() {
        let m = Money::from_paise(3000).unwrap();
        assert_eq!(m.to_string(), "₹30.00");
        let m = Money::from_paise(3750).unwrap();
        assert_eq!(m.to_string(), "₹37.50");
    }

    #[test]
    fn test_money_operations() {
        let m1 = Money::from_paise(100).unwrap(); // ₹1.00
        let m2 = Money::from_paise(250).unwrap(); // ₹2.50

        let sum = m1.checked_add(m2).unwrap();
        assert_eq!(sum.to_paise(), 350); // ₹3.50

        let qty = Quantity::new(3).unwrap();
        let total = m1.multiply_by_quantity(qty).unwrap();
        assert_eq!(total.to_paise(), 300); // ₹3.00
    }

    #[test]
    fn test_money_parsing() {
        assert_eq!("₹10.50".parse::<Money>().unwrap().to_paise(), 1050);
        assert_eq!("25.99".parse::<Money>().unwrap().to_paise(), 2599);
        assert!("invalid".parse::<Money>().is_err());
        assert!("-5.00".parse::<Money>().is_err());
    }

    #[test]
    fn test_money_default_is_zero() {
        assert_eq!(Money::default().to_paise(), 0);
        assert_eq!(Money::default().to_string(), "₹0.00");
    }

    // Property-based tests
    proptest! {
        #[test]
        fn prop_money_from_paise_roundtrip(paise in 0u64..1_000_000) {
            let money = Money::from_paise(paise).unwrap();
            assert_eq!(money.to_paise(), paise);
        }

        #[test]
        fn prop_quantity_value_roundtrip(value in 1u32..=10_000) {
            let quantity = Quantity::new(value).unwrap();
            assert_eq!(quantity.value(), value);
        }

        #[test]
        fn prop_money_addition_commutative(a in 0u64..100_000, b in 0u64..100_000) {
            let ma = Money::from_paise(a).unwrap();
            let mb = Money::from_paise(b).unwrap();

            if let (Ok(ab), Ok(ba)) = (ma.checked_add(mb), mb.checked_add(ma)) {
                assert_eq!(ab, ba);
            }
        }
    }
}
