//! # librent-core: Pure Business Logic for Librent
//!
//! This crate is the **heart** of Librent, the book-rental storefront. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Librent Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front end (CLI / any UI)                        │   │
//! │  │    Browse ──► Cart ──► Confirm Rental ──► Return / Stats        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    librent-store                                │   │
//! │  │    Owns cart/rentals/returns, persists after each transition    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ librent-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   query   │  │ lifecycle │  │   money   │  │   │
//! │  │   │  8 books  │  │ filter +  │  │ cart/rent │  │  integer  │  │   │
//! │  │   │ read-only │  │ sort      │  │ /return   │  │  cents    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO PERSISTENCE • NO RENDERING • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, CartItem, Rental, ReturnRecord)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - The immutable storefront catalog
//! - [`query`] - Filter/sort pipeline deriving the displayed book list
//! - [`lifecycle`] - Cart → rental → return transitions and derived stats
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Persistence, rendering and clock access live in the layers above
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Silent no-ops**: Unknown/duplicate ids are expected; transitions report
//!    "changed or not" instead of erroring

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod query;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use librent_core::Money` instead of
// `use librent_core::money::Money`

pub use catalog::Catalog;
pub use error::{CatalogError, ParseEnumError};
pub use money::Money;
pub use query::{query, CategoryFilter, FilterConfig, PriceRange, SortBy};
pub use types::*;
