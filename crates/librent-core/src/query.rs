//! # Query Engine
//!
//! Pure filtering and sorting over the catalog.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Query Pipeline                                     │
//! │                                                                         │
//! │  Catalog ──► search filter ──► category filter ──► price filter        │
//! │                  (AND)              (AND)              (AND)            │
//! │                                                          │              │
//! │                                                          ▼              │
//! │                                                   stable sort           │
//! │                                                   by SortBy key         │
//! │                                                          │              │
//! │                                                          ▼              │
//! │                                              ordered Vec<&Book>         │
//! │                                                                         │
//! │  PURE: no mutation, no state, identical inputs → identical output       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ties keep catalog relative order: `sort_by` on `Vec` is stable.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::catalog::Catalog;
use crate::error::ParseEnumError;
use crate::money::Money;
use crate::types::{Book, Category};

// =============================================================================
// Price Range
// =============================================================================

/// Discrete price bucket used for filtering.
///
/// Bucket boundaries are inclusive on both ends. A book priced exactly
/// $15.00 matches both `From10To15` and `From15To20`; the overlap is
/// intentional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceRange {
    /// No price filtering.
    #[default]
    All,
    /// price < $10
    Under10,
    /// $10 <= price <= $15
    From10To15,
    /// $15 <= price <= $20
    From15To20,
    /// price > $20
    Over20,
}

impl PriceRange {
    /// Whether a price falls inside this bucket.
    pub fn matches(&self, price: Money) -> bool {
        const TEN: i64 = 1000;
        const FIFTEEN: i64 = 1500;
        const TWENTY: i64 = 2000;

        let cents = price.cents();
        match self {
            PriceRange::All => true,
            PriceRange::Under10 => cents < TEN,
            PriceRange::From10To15 => (TEN..=FIFTEEN).contains(&cents),
            PriceRange::From15To20 => (FIFTEEN..=TWENTY).contains(&cents),
            PriceRange::Over20 => cents > TWENTY,
        }
    }
}

impl FromStr for PriceRange {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PriceRange::All),
            "under-10" => Ok(PriceRange::Under10),
            "10-15" => Ok(PriceRange::From10To15),
            "15-20" => Ok(PriceRange::From15To20),
            "over-20" => Ok(PriceRange::Over20),
            other => Err(ParseEnumError::new("price range", other)),
        }
    }
}

// =============================================================================
// Sort Key
// =============================================================================

/// Sort key for the filtered book list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Ascending price.
    PriceLow,
    /// Descending price.
    PriceHigh,
    /// Descending rating.
    Rating,
    /// Ascending title, case-insensitive.
    Title,
    /// Descending review count. Default.
    #[default]
    Popularity,
}

impl SortBy {
    /// Compares two books under this sort key.
    ///
    /// `Ordering::Equal` for tied keys; the caller's stable sort then keeps
    /// catalog relative order.
    fn compare(&self, a: &Book, b: &Book) -> Ordering {
        match self {
            SortBy::PriceLow => a.price.cmp(&b.price),
            SortBy::PriceHigh => b.price.cmp(&a.price),
            SortBy::Rating => b.rating.total_cmp(&a.rating),
            SortBy::Title => a
                .title
                .to_lowercase()
                .cmp(&b.title.to_lowercase()),
            SortBy::Popularity => b.reviews.cmp(&a.reviews),
        }
    }
}

impl FromStr for SortBy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-low" => Ok(SortBy::PriceLow),
            "price-high" => Ok(SortBy::PriceHigh),
            "rating" => Ok(SortBy::Rating),
            "title" => Ok(SortBy::Title),
            "popularity" => Ok(SortBy::Popularity),
            other => Err(ParseEnumError::new("sort key", other)),
        }
    }
}

// =============================================================================
// Category Filter
// =============================================================================

/// Category clause: everything, or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    fn matches(&self, book: &Book) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(cat) => book.category == *cat,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(CategoryFilter::All)
        } else {
            s.parse::<Category>().map(CategoryFilter::Only)
        }
    }
}

// =============================================================================
// Filter Config
// =============================================================================

/// The current filter and sort configuration.
///
/// Session-scoped: never persisted, reset to defaults on explicit clear.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Case-insensitive substring matched against title and author.
    /// Empty matches everything.
    pub search: String,

    /// Category clause.
    pub category: CategoryFilter,

    /// Price bucket clause.
    pub price_range: PriceRange,

    /// Ordering of the filtered result.
    pub sort_by: SortBy,
}

impl Default for FilterConfig {
    /// `{search: "", category: all, priceRange: all, sortBy: popularity}`
    fn default() -> Self {
        FilterConfig {
            search: String::new(),
            category: CategoryFilter::All,
            price_range: PriceRange::All,
            sort_by: SortBy::Popularity,
        }
    }
}

impl FilterConfig {
    /// Whether any narrowing clause is active (sort order alone does not
    /// count as a filter).
    pub fn is_filtering(&self) -> bool {
        !self.search.is_empty()
            || self.category != CategoryFilter::All
            || self.price_range != PriceRange::All
    }

    /// The AND of the three filter clauses for one book.
    fn matches(&self, book: &Book) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || book.title.to_lowercase().contains(&needle)
            || book.author.to_lowercase().contains(&needle);

        matches_search && self.category.matches(book) && self.price_range.matches(book.price)
    }
}

// =============================================================================
// Query
// =============================================================================

/// Derives the displayed book list: filter, then stable-sort.
///
/// Pure and deterministic; the catalog is never mutated and identical inputs
/// produce identical ordered output.
pub fn query<'a>(catalog: &'a Catalog, filters: &FilterConfig) -> Vec<&'a Book> {
    let mut matched: Vec<&Book> = catalog
        .books()
        .iter()
        .filter(|book| filters.matches(book))
        .collect();

    matched.sort_by(|a, b| filters.sort_by.compare(a, b));
    matched
}

// =============================================================================
// Unit Tests
// =============================================================================
