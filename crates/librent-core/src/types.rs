//! # Domain Types
//!
//! Core domain types used throughout Librent.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │    CartItem     │   │     Rental      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (catalog)   │──►│  book snapshot  │──►│  rental_id      │       │
//! │  │  price          │   │  added_at       │   │  rented_at      │       │
//! │  │  original_price │   └─────────────────┘   │  status         │       │
//! │  │  category       │                         └────────┬────────┘       │
//! │  │  rating/reviews │                                  │                │
//! │  └─────────────────┘                                  ▼                │
//! │                                            ┌─────────────────┐         │
//! │                                            │  ReturnRecord   │         │
//! │                                            │  ─────────────  │         │
//! │                                            │  return_id      │         │
//! │                                            │  cashback       │         │
//! │                                            └─────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `CartItem`, `Rental` and `ReturnRecord` freeze the book's display fields
//! at the moment the item enters that stage. The catalog is immutable today,
//! but the snapshot keeps every persisted record self-contained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ParseEnumError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// Book category.
///
/// Kebab-case on the wire (`"non-fiction"`), matching the stored JSON.
/// New categories are additive; nothing in the query engine enumerates over
/// the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Technology,
    NonFiction,
    Fiction,
    Science,
}

impl Category {
    /// The wire/display name of the category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::NonFiction => "non-fiction",
            Category::Fiction => "fiction",
            Category::Science => "science",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technology" => Ok(Category::Technology),
            "non-fiction" => Ok(Category::NonFiction),
            "fiction" => Ok(Category::Fiction),
            "science" => Ok(Category::Science),
            other => Err(ParseEnumError::new("category", other)),
        }
    }
}

// =============================================================================
// Book
// =============================================================================

/// A book available for rental. Catalog-defined and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique positive catalog identifier.
    pub id: u32,

    /// Display title.
    pub title: String,

    /// Display author.
    pub author: String,

    /// Rental price in cents.
    pub price: Money,

    /// Reference (pre-discount) price in cents. Always greater than `price`.
    pub original_price: Money,

    /// Category used for filtering.
    pub category: Category,

    /// Cover image reference.
    pub image: String,

    /// Average rating in [0, 5].
    pub rating: f32,

    /// Review count; popularity proxy for the default sort.
    pub reviews: u32,
}

impl Book {
    /// Discount relative to the original price, rounded to a whole percent.
    ///
    /// Worked example: `{price: $13.99, original: $20.99}` → 33%.
    #[inline]
    pub fn discount_percent(&self) -> u8 {
        self.price.discount_percent_from(self.original_price)
    }

    /// Amount saved versus the original price.
    #[inline]
    pub fn savings(&self) -> Money {
        self.original_price - self.price
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the rental cart.
///
/// ## Invariant
/// At most one `CartItem` per book id lives in the cart; adding an already
/// present book is a silent no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalog book id.
    pub book_id: u32,

    /// Title at time of adding (frozen).
    pub title: String,

    /// Author at time of adding (frozen).
    pub author: String,

    /// Price in cents at time of adding (frozen).
    pub price: Money,

    /// Cover image reference (frozen).
    pub image: String,

    /// When this item was added to the cart.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a cart item snapshot from a catalog book.
    pub fn from_book(book: &Book, added_at: DateTime<Utc>) -> Self {
        CartItem {
            book_id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price,
            image: book.image.clone(),
            added_at,
        }
    }
}

// =============================================================================
// Rental
// =============================================================================

/// The lifecycle state of a rental.
///
/// Transitions only move forward: `Rented → Returned`. There is no path back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// Book is currently rented out.
    Rented,
    /// Book has been returned; kept for history, never deleted.
    Returned,
}

/// A confirmed rental, created from a cart item at confirmation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    /// Unique rental identifier, generated at confirmation. Immutable.
    pub rental_id: Uuid,

    /// Catalog book id.
    pub book_id: u32,

    /// Title at time of rental (frozen).
    pub title: String,

    /// Author at time of rental (frozen).
    pub author: String,

    /// Price paid for the rental (frozen).
    pub price: Money,

    /// Cover image reference (frozen).
    pub image: String,

    /// When the rental was confirmed.
    pub rented_at: DateTime<Utc>,

    /// Current lifecycle state.
    pub status: RentalStatus,
}

impl Rental {
    /// Creates a rental from a cart item at confirmation time.
    pub fn from_cart_item(item: &CartItem, rented_at: DateTime<Utc>) -> Self {
        Rental {
            rental_id: Uuid::new_v4(),
            book_id: item.book_id,
            title: item.title.clone(),
            author: item.author.clone(),
            price: item.price,
            image: item.image.clone(),
            rented_at,
            status: RentalStatus::Rented,
        }
    }

    /// Whether the rental is still out.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == RentalStatus::Rented
    }
}

// =============================================================================
// Return Record
// =============================================================================

/// A record of a returned rental.
///
/// ## Invariant
/// Exactly one `ReturnRecord` exists per returned rental; a rental can be
/// returned at most once.
///
/// ## Field naming
/// The original data model stored the price paid under the misleading name
/// `originalPrice`. The behavior (cashback = 50% of the price paid) is
/// preserved; the field is named `rental_price` here. See DESIGN.md.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRecord {
    /// Unique return identifier.
    pub return_id: Uuid,

    /// The rental this return closes out.
    pub rental_id: Uuid,

    /// Catalog book id.
    pub book_id: u32,

    /// Title at time of rental (frozen).
    pub title: String,

    /// Author at time of rental (frozen).
    pub author: String,

    /// Cover image reference (frozen).
    pub image: String,

    /// Price that was paid for the rental.
    pub rental_price: Money,

    /// Cashback granted: 50% of `rental_price`, rounded to whole cents.
    pub cashback: Money,

    /// When the book was returned.
    pub returned_at: DateTime<Utc>,
}

impl ReturnRecord {
    /// Creates a return record for a rental being returned.
    pub fn from_rental(rental: &Rental, returned_at: DateTime<Utc>) -> Self {
        ReturnRecord {
            return_id: Uuid::new_v4(),
            rental_id: rental.rental_id,
            book_id: rental.book_id,
            title: rental.title.clone(),
            author: rental.author.clone(),
            image: rental.image.clone(),
            rental_price: rental.price,
            cashback: rental.price.half_rounded(),
            returned_at,
        }
    }
}

// =============================================================================
// Rental Stats
// =============================================================================

/// Aggregate rental statistics for the progress view.
///
/// `total_rented` counts lifetime rentals, including returned ones. This is
/// the historical semantic, not a "currently active" count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalStats {
    /// All-time number of rentals (returned ones included).
    pub total_rented: usize,

    /// Number of completed returns.
    pub total_returned: usize,

    /// Sum of all cashback granted.
    pub total_cashback: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        Book {
            id: 4,
            title: "Atomic Habits".to_string(),
            author: "James Clear".to_string(),
            price: Money::from_cents(1399),
            original_price: Money::from_cents(2099),
            category: Category::NonFiction,
            image: "images/book-4.jpeg".to_string(),
            rating: 4.8,
            reviews: 672,
        }
    }

    #[test]
    fn test_category_round_trip() {
        let json = serde_json::to_string(&Category::NonFiction).unwrap();
        assert_eq!(json, "\"non-fiction\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::NonFiction);
    }

    #[test]
    fn test_category_from_str_rejects_unknown() {
        assert!("poetry".parse::<Category>().is_err());
        assert_eq!("science".parse::<Category>().unwrap(), Category::Science);
    }

    #[test]
    fn test_book_discount_and_savings() {
        let book = sample_book();
        // Worked example from the pricing rules
        assert_eq!(book.discount_percent(), 33);
        assert_eq!(book.savings(), Money::from_cents(700));
    }

    #[test]
    fn test_cart_item_snapshots_book_fields() {
        let book = sample_book();
        let now = Utc::now();
        let item = CartItem::from_book(&book, now);
        assert_eq!(item.book_id, 4);
        assert_eq!(item.title, book.title);
        assert_eq!(item.price, book.price);
        assert_eq!(item.added_at, now);
    }

    #[test]
    fn test_rental_starts_rented_with_fresh_id() {
        let book = sample_book();
        let now = Utc::now();
        let item = CartItem::from_book(&book, now);
        let a = Rental::from_cart_item(&item, now);
        let b = Rental::from_cart_item(&item, now);
        assert!(a.is_active());
        assert_eq!(a.status, RentalStatus::Rented);
        assert_ne!(a.rental_id, b.rental_id);
    }

    #[test]
    fn test_return_record_cashback_is_half_price() {
        let book = sample_book();
        let now = Utc::now();
        let rental = Rental::from_cart_item(&CartItem::from_book(&book, now), now);
        let record = ReturnRecord::from_rental(&rental, now);
        assert_eq!(record.rental_id, rental.rental_id);
        assert_eq!(record.rental_price, Money::from_cents(1399));
        // 1399 / 2 = 699.5 → 700
        assert_eq!(record.cashback, Money::from_cents(700));
    }

    #[test]
    fn test_persisted_json_shape_is_camel_case() {
        let book = sample_book();
        let now = Utc::now();
        let item = CartItem::from_book(&book, now);
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("bookId").is_some());
        assert!(json.get("addedAt").is_some());
        assert!(json.get("book_id").is_none());
    }
}
