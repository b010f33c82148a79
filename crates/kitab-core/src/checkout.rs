//! # Checkout Module
//!
//! Pure checkout math: turning a list of requested lines into priced lines
//! and an exact order total. No I/O — the database layer fetches books and
//! persists the result; everything decision-shaped lives here.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Placement Flow                               │
//! │                                                                         │
//! │  Client: [{bookId, quantity, price?}, ...]                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_checkout() ── empty list / bad quantity → ValidationError    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  (db layer looks up each Book inside the transaction)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_line(book, line) ── stock short → InsufficientStock             │
//! │       │                 └─ price drift → PriceMismatch                 │
//! │       ▼                                                                 │
//! │  order_total(priced) = Σ unit_price × quantity  (exact cents)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Order + OrderItems inserted, stock decremented, commit                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog price is authoritative. A client MAY echo the price it
//! displayed; if it does and the catalog disagrees, the order is rejected
//! instead of silently repriced.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Book;
use crate::validation::validate_quantity;
use crate::MAX_CART_ITEMS;

// =============================================================================
// Line Types
// =============================================================================

/// One requested line of a checkout, as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    /// Book being purchased.
    pub book_id: String,

    /// Units requested. Must be >= 1.
    pub quantity: i64,

    /// Unit price in cents the client displayed, if it chooses to echo it.
    /// Verified against the catalog, never trusted.
    #[serde(default)]
    pub price_cents: Option<i64>,
}

/// A line whose unit price has been resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub book_id: String,
    pub quantity: i64,
    /// Authoritative unit price in cents, frozen into the OrderItem.
    pub unit_price_cents: i64,
}

impl PricedLine {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Checkout Functions
// =============================================================================

/// Validates the shape of a checkout request before any database work.
///
/// ## Rules
/// - At least one line
/// - At most MAX_CART_ITEMS lines
/// - Every quantity within [1, MAX_ITEM_QUANTITY]
/// - Every book id non-empty
pub fn validate_checkout(lines: &[CheckoutLine]) -> CoreResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "cartItems".to_string(),
        }
        .into());
    }

    if lines.len() > MAX_CART_ITEMS {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        });
    }

    for line in lines {
        if line.book_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "bookId".to_string(),
            }
            .into());
        }
        validate_quantity(line.quantity)?;
    }

    Ok(())
}

/// Resolves one requested line against its catalog book.
///
/// ## Checks
/// 1. Stock covers the requested quantity
/// 2. If the client echoed a price, it matches the catalog
///
/// The returned line carries the catalog price regardless of what the
/// client sent.
pub fn price_line(book: &Book, line: &CheckoutLine) -> CoreResult<PricedLine> {
    if !book.can_sell(line.quantity) {
        return Err(CoreError::InsufficientStock {
            book_id: book.id.clone(),
            available: book.stock,
            requested: line.quantity,
        });
    }

    if let Some(submitted) = line.price_cents {
        if submitted != book.price_cents {
            return Err(CoreError::PriceMismatch {
                book_id: book.id.clone(),
                expected_cents: book.price_cents,
                submitted_cents: submitted,
            });
        }
    }

    Ok(PricedLine {
        book_id: book.id.clone(),
        quantity: line.quantity,
        unit_price_cents: book.price_cents,
    })
}

/// Computes the order total over priced lines, in exact cents.
pub fn order_total(lines: &[PricedLine]) -> Money {
    lines
        .iter()
        .fold(Money::zero(), |acc, line| acc + line.line_total())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn book(id: &str, price_cents: i64, stock: i64) -> Book {
        Book {
            id: id.to_string(),
            title: "Test Book".to_string(),
            author: "Test Author".to_string(),
            description: None,
            category: None,
            price_cents,
            stock,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(book_id: &str, quantity: i64) -> CheckoutLine {
        CheckoutLine {
            book_id: book_id.to_string(),
            quantity,
            price_cents: None,
        }
    }

    #[test]
    fn test_validate_checkout_rejects_empty() {
        let err = validate_checkout(&[]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_validate_checkout_rejects_bad_quantity() {
        assert!(validate_checkout(&[line("b1", 0)]).is_err());
        assert!(validate_checkout(&[line("b1", -3)]).is_err());
        assert!(validate_checkout(&[line("b1", 1)]).is_ok());
    }

    #[test]
    fn test_validate_checkout_rejects_blank_book_id() {
        assert!(validate_checkout(&[line("  ", 1)]).is_err());
    }

    #[test]
    fn test_price_line_uses_catalog_price() {
        let b = book("b1", 1250, 10);
        let priced = price_line(&b, &line("b1", 2)).unwrap();
        assert_eq!(priced.unit_price_cents, 1250);
        assert_eq!(priced.line_total().cents(), 2500);
    }

    #[test]
    fn test_price_line_rejects_insufficient_stock() {
        let b = book("b1", 1250, 1);
        let err = price_line(&b, &line("b1", 2)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
    }

    #[test]
    fn test_price_line_rejects_price_drift() {
        let b = book("b1", 1250, 10);
        let mut l = line("b1", 1);
        l.price_cents = Some(999);
        let err = price_line(&b, &l).unwrap_err();
        assert!(matches!(err, CoreError::PriceMismatch { .. }));
    }

    #[test]
    fn test_price_line_accepts_matching_echo() {
        let b = book("b1", 1250, 10);
        let mut l = line("b1", 1);
        l.price_cents = Some(1250);
        assert!(price_line(&b, &l).is_ok());
    }

    #[test]
    fn test_order_total_exact() {
        // [{price: $10.00, qty: 2}, {price: $5.50, qty: 1}] => $25.50
        let lines = vec![
            PricedLine {
                book_id: "b1".to_string(),
                quantity: 2,
                unit_price_cents: 1000,
            },
            PricedLine {
                book_id: "b2".to_string(),
                quantity: 1,
                unit_price_cents: 550,
            },
        ];
        assert_eq!(order_total(&lines).cents(), 2550);
    }

    #[test]
    fn test_order_total_empty_is_zero() {
        assert!(order_total(&[]).is_zero());
    }
}
