//! # Catalog
//!
//! The fixed set of rentable books.
//!
//! The catalog is the source of truth for every derived view: the query
//! engine filters and sorts over it, and cart items snapshot from it. It is
//! read-only; nothing in the system ever mutates a `Book` after construction.

use crate::error::CatalogError;
use crate::money::Money;
use crate::types::{Book, Category};

// =============================================================================
// Catalog
// =============================================================================

/// Immutable collection of rentable books.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Builds a catalog from a list of books, validating integrity rules:
    /// unique positive ids, `price < original_price`, rating in [0, 5].
    pub fn new(books: Vec<Book>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for book in &books {
            if book.id == 0 {
                return Err(CatalogError::NonPositiveId(book.id));
            }
            if !seen.insert(book.id) {
                return Err(CatalogError::DuplicateId(book.id));
            }
            if book.price >= book.original_price {
                return Err(CatalogError::PriceNotDiscounted {
                    id: book.id,
                    price: book.price.to_string(),
                    original_price: book.original_price.to_string(),
                });
            }
            if !(0.0..=5.0).contains(&book.rating) {
                return Err(CatalogError::RatingOutOfRange {
                    id: book.id,
                    rating: book.rating,
                });
            }
        }
        Ok(Catalog { books })
    }

    /// The standard storefront catalog.
    ///
    /// Panics are impossible here: the data is static and covered by
    /// `test_standard_catalog_is_valid`.
    pub fn standard() -> Self {
        Catalog {
            books: standard_books(),
        }
    }

    /// All books, in catalog order.
    #[inline]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Looks up a book by id.
    pub fn get(&self, book_id: u32) -> Option<&Book> {
        self.books.iter().find(|b| b.id == book_id)
    }

    /// Number of books in the catalog.
    #[inline]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the catalog is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// The eight storefront titles, prices in cents.
fn standard_books() -> Vec<Book> {
    fn book(
        id: u32,
        title: &str,
        author: &str,
        price: i64,
        original_price: i64,
        category: Category,
        image: &str,
        rating: f32,
        reviews: u32,
    ) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            price: Money::from_cents(price),
            original_price: Money::from_cents(original_price),
            category,
            image: image.to_string(),
            rating,
            reviews,
        }
    }

    vec![
        book(
            1,
            "The Psychology of Programming",
            "Gerald Weinberg",
            1299,
            1949,
            Category::Technology,
            "images/book-1.jpeg",
            4.5,
            234,
        ),
        book(
            2,
            "Good Energy",
            "Casey Means",
            1599,
            2399,
            Category::NonFiction,
            "images/book-2.jpeg",
            4.7,
            456,
        ),
        book(
            3,
            "The Mountain is You",
            "Brianna Wiest",
            1099,
            1649,
            Category::Fiction,
            "images/book-3.png",
            4.3,
            189,
        ),
        book(
            4,
            "Atomic Habits",
            "James Clear",
            1399,
            2099,
            Category::NonFiction,
            "images/book-4.jpeg",
            4.8,
            672,
        ),
        book(
            5,
            "The Quantum Universe",
            "Brian Cox",
            1699,
            2549,
            Category::Science,
            "images/book-5.jpeg",
            4.4,
            298,
        ),
        book(
            6,
            "Clean Code",
            "Robert Martin",
            1899,
            2849,
            Category::Technology,
            "images/book-6.jpeg",
            4.6,
            387,
        ),
        book(
            7,
            "Dune",
            "Frank Herbert",
            1499,
            2249,
            Category::Fiction,
            "images/book-7.jpeg",
            4.5,
            512,
        ),
        book(
            8,
            "A Brief History of Time",
            "Stephen Hawking",
            1199,
            1799,
            Category::Science,
            "images/book-8.jpeg",
            4.2,
            345,
        ),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
