//! # Error Types
//!
//! Domain-specific error types for librent-core.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (book id, field, value)
//! 3. Errors are enum variants, never String
//!
//! ## Note on no-ops
//! Lifecycle transitions treat unknown or already-consumed ids as silent
//! no-ops, not errors (they are expected and recoverable). The errors below
//! cover catalog integrity and input parsing, where a caller must be told.

use thiserror::Error;

// =============================================================================
// Catalog Error
// =============================================================================

/// Catalog integrity violations.
///
/// The shipped catalog is validated once at store construction; these errors
/// guard any future catalog source against malformed data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two books share the same id.
    #[error("duplicate book id in catalog: {0}")]
    DuplicateId(u32),

    /// Book ids must be positive.
    #[error("book id must be positive, got {0}")]
    NonPositiveId(u32),

    /// The rental price must be strictly below the original price.
    #[error("book {id}: price {price} is not below original price {original_price}")]
    PriceNotDiscounted {
        id: u32,
        price: String,
        original_price: String,
    },

    /// Rating must lie in [0, 5].
    #[error("book {id}: rating {rating} outside [0, 5]")]
    RatingOutOfRange { id: u32, rating: f32 },
}

// =============================================================================
// Parse Error
// =============================================================================

/// Failure to parse a filter/category token from user input.
#[derive(Debug, Error)]
#[error("unrecognized {kind}: '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        ParseEnumError {
            kind,
            value: value.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CatalogError::PriceNotDiscounted {
            id: 3,
            price: "$16.49".to_string(),
            original_price: "$10.99".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "book 3: price $16.49 is not below original price $10.99"
        );
    }

    #[test]
    fn test_parse_error_message() {
        let err = ParseEnumError::new("category", "poetry");
        assert_eq!(err.to_string(), "unrecognized category: 'poetry'");
    }
}
