//! # Rental Store
//!
//! The owning state store for the storefront session.
//!
//! ## Transition Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    RentalStore Transition Flow                          │
//! │                                                                         │
//! │  UI event ──► store method ──► pure core transition ──► persist changed │
//! │                                   (librent-core)         collection(s)  │
//! │                                                               │         │
//! │               ┌───────────────────────────────────────────────┘         │
//! │               ▼                                                         │
//! │     save ok  ──► Ok(outcome), caller re-renders from a fresh snapshot   │
//! │     save err ──► Err(Persistence), memory is AHEAD of disk;             │
//! │                  session keeps working, caller may retry or warn        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The store exclusively owns `cart`, `rentals`, `returns` and the filter
//! config. Consumers only ever receive clones or borrowed read-only views;
//! all mutation goes through the transition methods.
//!
//! ## Thread Safety
//! The session is single-threaded and every transition takes `&mut self`.
//! The store is `Send`, so a multi-threaded embedder can serialize access
//! behind a single `Mutex` - the transitions are not designed for concurrent
//! invocation.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use librent_core::lifecycle;
use librent_core::query::{self, CategoryFilter, FilterConfig, PriceRange, SortBy};
use librent_core::{Book, CartItem, Catalog, Money, Rental, RentalStats, ReturnRecord};

use crate::error::{StoreError, StoreResult};
use crate::storage::StorageAdapter;

// =============================================================================
// Collection Keys
// =============================================================================

/// Storage key for the cart collection.
pub const CART_KEY: &str = "cart-collection";
/// Storage key for the rentals collection.
pub const RENTALS_KEY: &str = "rentals-collection";
/// Storage key for the returns collection.
pub const RETURNS_KEY: &str = "returns-collection";

// =============================================================================
// View Types
// =============================================================================

/// Whether a transition changed anything.
///
/// No-op conditions (unknown id, duplicate add, double return) are expected
/// and silent; this lets callers tell them apart from applied transitions
/// without an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

impl Outcome {
    #[inline]
    pub fn changed(&self) -> bool {
        matches!(self, Outcome::Changed)
    }
}

/// Result of a catalog query, ready for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Filtered, ordered books (copies; the catalog stays untouched).
    pub books: Vec<Book>,
    /// Number of books matching the active filters.
    pub filtered_count: usize,
    /// Total catalog size, for "Showing X of Y" displays.
    pub total_count: usize,
}

/// An active rental with its derived presentation fields attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRental {
    #[serde(flatten)]
    pub rental: Rental,
    /// Whole days held so far.
    pub days_held: i64,
    /// Reading progress percent (10% per day, capped at 100).
    pub progress: u8,
    /// Cashback the user would receive on return.
    pub cashback_on_return: Money,
}

// =============================================================================
// Rental Store
// =============================================================================

/// Owns the session state and persists it through a [`StorageAdapter`].
pub struct RentalStore {
    catalog: Catalog,
    storage: Box<dyn StorageAdapter>,
    cart: Vec<CartItem>,
    rentals: Vec<Rental>,
    returns: Vec<ReturnRecord>,
    filters: FilterConfig,
}

impl RentalStore {
    /// Opens a store over the standard catalog, loading any previously
    /// persisted collections. Absent or unreadable collections start empty.
    pub fn open(storage: Box<dyn StorageAdapter>) -> Self {
        Self::open_with_catalog(Catalog::standard(), storage)
    }

    /// Opens a store over a caller-supplied catalog.
    pub fn open_with_catalog(catalog: Catalog, storage: Box<dyn StorageAdapter>) -> Self {
        let cart = load_collection(storage.as_ref(), CART_KEY);
        let rentals = load_collection(storage.as_ref(), RENTALS_KEY);
        let returns = load_collection(storage.as_ref(), RETURNS_KEY);
        debug!(
            cart = cart.len(),
            rentals = rentals.len(),
            returns = returns.len(),
            "rental store opened"
        );
        RentalStore {
            catalog,
            storage,
            cart,
            rentals,
            returns,
            // The filter config is session-scoped and resets every time
            filters: FilterConfig::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Catalog & Query
    // -------------------------------------------------------------------------

    /// The read-only catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs the filter/sort pipeline under the current config.
    pub fn query(&self) -> QueryResult {
        let matched = query::query(&self.catalog, &self.filters);
        QueryResult {
            filtered_count: matched.len(),
            total_count: self.catalog.len(),
            books: matched.into_iter().cloned().collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Filter Config
    // -------------------------------------------------------------------------

    /// The active filter configuration.
    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.filters.category = category;
    }

    pub fn set_price_range(&mut self, price_range: PriceRange) {
        self.filters.price_range = price_range;
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.filters.sort_by = sort_by;
    }

    /// Resets search, category, price range and sort to their defaults.
    pub fn clear_filters(&mut self) {
        self.filters = FilterConfig::default();
    }

    // -------------------------------------------------------------------------
    // Cart Transitions
    // -------------------------------------------------------------------------

    /// Read-only view of the cart.
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    /// Sum of the prices in the cart.
    pub fn cart_total(&self) -> Money {
        lifecycle::cart_total(&self.cart)
    }

    /// Whether a book is already in the cart (drives "Added" button states).
    pub fn is_in_cart(&self, book_id: u32) -> bool {
        self.cart.iter().any(|item| item.book_id == book_id)
    }

    /// Adds a book to the cart.
    ///
    /// Unknown ids and books already in the cart are silent no-ops
    /// (`Outcome::Unchanged`); nothing is persisted for a no-op.
    pub fn add_to_cart(&mut self, book_id: u32) -> StoreResult<Outcome> {
        debug!(book_id, "add_to_cart");
        if !lifecycle::add_to_cart(&self.catalog, &mut self.cart, book_id, Utc::now()) {
            return Ok(Outcome::Unchanged);
        }
        self.persist(CART_KEY, &self.cart)?;
        Ok(Outcome::Changed)
    }

    /// Removes a book from the cart. No-op if absent.
    pub fn remove_from_cart(&mut self, book_id: u32) -> StoreResult<Outcome> {
        debug!(book_id, "remove_from_cart");
        if !lifecycle::remove_from_cart(&mut self.cart, book_id) {
            return Ok(Outcome::Unchanged);
        }
        self.persist(CART_KEY, &self.cart)?;
        Ok(Outcome::Changed)
    }

    // -------------------------------------------------------------------------
    // Rental Transitions
    // -------------------------------------------------------------------------

    /// Confirms the rental of the whole cart.
    ///
    /// Every cart item becomes a `Rented` rental and the cart empties.
    /// Returns how many rentals were created; an empty cart is a no-op
    /// touching neither memory nor storage.
    pub fn confirm_rental(&mut self) -> StoreResult<usize> {
        let confirmed = lifecycle::confirm_rental(&mut self.cart, &mut self.rentals, Utc::now());
        if confirmed == 0 {
            return Ok(0);
        }
        debug!(confirmed, "rental confirmed");
        self.persist(CART_KEY, &self.cart)?;
        self.persist(RENTALS_KEY, &self.rentals)?;
        Ok(confirmed)
    }

    /// Returns a rented book, granting half the price paid as cashback.
    ///
    /// Unknown or already-returned rental ids are silent no-ops yielding
    /// `Ok(None)`. On success the cashback amount is returned and both the
    /// rentals and returns collections are persisted.
    pub fn return_book(&mut self, rental_id: Uuid) -> StoreResult<Option<Money>> {
        let Some(cashback) =
            lifecycle::return_book(&mut self.rentals, &mut self.returns, rental_id, Utc::now())
        else {
            debug!(%rental_id, "return_book: no active rental, no-op");
            return Ok(None);
        };
        debug!(%rental_id, %cashback, "book returned");
        self.persist(RENTALS_KEY, &self.rentals)?;
        self.persist(RETURNS_KEY, &self.returns)?;
        Ok(Some(cashback))
    }

    // -------------------------------------------------------------------------
    // Read-Only Views
    // -------------------------------------------------------------------------

    /// Full rental history, returned rentals included.
    pub fn rentals(&self) -> &[Rental] {
        &self.rentals
    }

    /// All return records.
    pub fn returns(&self) -> &[ReturnRecord] {
        &self.returns
    }

    /// Rentals still out, with progress/cashback derivations attached.
    pub fn current_rentals(&self, now: DateTime<Utc>) -> Vec<CurrentRental> {
        self.rentals
            .iter()
            .filter(|r| r.is_active())
            .map(|r| CurrentRental {
                days_held: lifecycle::days_held(r, now),
                progress: lifecycle::reading_progress(r, now),
                cashback_on_return: r.price.half_rounded(),
                rental: r.clone(),
            })
            .collect()
    }

    /// Aggregate stats: lifetime rentals, returns, total cashback.
    pub fn stats(&self) -> RentalStats {
        lifecycle::stats(&self.rentals, &self.returns)
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Saves one collection synchronously.
    ///
    /// On failure the in-memory state is already ahead of disk; the error is
    /// surfaced so the caller can retry or warn, and the session continues.
    fn persist<T: Serialize>(&self, key: &'static str, collection: &T) -> StoreResult<()> {
        let value = serde_json::to_value(collection).map_err(|e| StoreError::Persistence {
            key,
            source: e.into(),
        })?;
        self.storage.save(key, &value).map_err(|source| {
            warn!(key, %source, "collection save failed; memory is ahead of storage");
            StoreError::Persistence { key, source }
        })
    }
}

/// Loads one collection, treating absent or unreadable data as empty.
fn load_collection<T: DeserializeOwned>(storage: &dyn StorageAdapter, key: &str) -> Vec<T> {
    match storage.load(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(collection) => collection,
            Err(e) => {
                warn!(key, error = %e, "stored collection malformed; starting empty");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "stored collection unreadable; starting empty");
            Vec::new()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use librent_core::types::RentalStatus;
    use librent_core::Category;
    use std::sync::Arc;

    /// MemoryStorage shared between a store and the test body, so the test
    /// can flip the failure toggle and reopen the store over the same data.
    struct SharedStorage(Arc<MemoryStorage>);

    impl StorageAdapter for SharedStorage {
        fn load(&self, key: &str) -> Result<Option<serde_json::Value>, crate::storage::StorageError> {
            self.0.load(key)
        }
        fn save(
            &self,
            key: &str,
            value: &serde_json::Value,
        ) -> Result<(), crate::storage::StorageError> {
            self.0.save(key, value)
        }
    }

    fn store() -> RentalStore {
        RentalStore::open(Box::new(MemoryStorage::new()))
    }

    fn shared_store() -> (RentalStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = RentalStore::open(Box::new(SharedStorage(storage.clone())));
        (store, storage)
    }

    #[test]
    fn test_open_empty_storage_starts_empty() {
        let s = store();
        assert!(s.cart().is_empty());
        assert!(s.rentals().is_empty());
        assert!(s.returns().is_empty());
        assert_eq!(s.filters(), &FilterConfig::default());
    }

    #[test]
    fn test_query_reports_counts() {
        let mut s = store();
        let all = s.query();
        assert_eq!(all.filtered_count, 8);
        assert_eq!(all.total_count, 8);

        s.set_category(CategoryFilter::Only(Category::Technology));
        let tech = s.query();
        assert_eq!(tech.filtered_count, 2);
        assert_eq!(tech.total_count, 8);
    }

    #[test]
    fn test_clear_filters_resets_defaults() {
        let mut s = store();
        s.set_search("dune");
        s.set_price_range(PriceRange::Over20);
        s.set_sort_by(SortBy::Title);
        s.clear_filters();
        assert_eq!(s.filters(), &FilterConfig::default());
        assert_eq!(s.query().filtered_count, 8);
    }

    #[test]
    fn test_add_and_remove_from_cart() {
        let mut s = store();
        assert!(s.add_to_cart(7).unwrap().changed());
        assert!(s.is_in_cart(7));
        // duplicate add is a signalled no-op
        assert!(!s.add_to_cart(7).unwrap().changed());
        // unknown id is a signalled no-op
        assert!(!s.add_to_cart(999).unwrap().changed());
        assert_eq!(s.cart().len(), 1);

        assert!(s.remove_from_cart(7).unwrap().changed());
        assert!(!s.remove_from_cart(7).unwrap().changed());
        assert!(s.cart().is_empty());
    }

    #[test]
    fn test_cart_total() {
        let mut s = store();
        s.add_to_cart(1).unwrap(); // $12.99
        s.add_to_cart(4).unwrap(); // $13.99
        assert_eq!(s.cart_total(), Money::from_cents(2698));
    }

    #[test]
    fn test_confirm_rental_empties_cart_and_grows_rentals() {
        let mut s = store();
        s.add_to_cart(1).unwrap();
        s.add_to_cart(2).unwrap();
        let prior = s.cart().len();

        assert_eq!(s.confirm_rental().unwrap(), prior);
        assert!(s.cart().is_empty());
        assert_eq!(s.rentals().len(), prior);

        // confirming again with an empty cart is a no-op
        assert_eq!(s.confirm_rental().unwrap(), 0);
        assert_eq!(s.rentals().len(), prior);
    }

    #[test]
    fn test_full_lifecycle_with_stats() {
        let mut s = store();
        s.add_to_cart(7).unwrap(); // Dune $14.99
        s.confirm_rental().unwrap();
        let rental_id = s.rentals()[0].rental_id;

        let cashback = s.return_book(rental_id).unwrap();
        assert_eq!(cashback, Some(Money::from_cents(750)));

        let stats = s.stats();
        assert_eq!(stats.total_rented, 1);
        assert_eq!(stats.total_returned, 1);
        assert_eq!(stats.total_cashback, Money::from_cents(750));

        // double return: signalled no-op, returns collection unchanged
        assert_eq!(s.return_book(rental_id).unwrap(), None);
        assert_eq!(s.returns().len(), 1);
        assert_eq!(s.rentals()[0].status, RentalStatus::Returned);
    }

    #[test]
    fn test_current_rentals_excludes_returned_and_derives_progress() {
        let mut s = store();
        s.add_to_cart(5).unwrap();
        s.add_to_cart(6).unwrap();
        s.confirm_rental().unwrap();
        let first = s.rentals()[0].rental_id;
        s.return_book(first).unwrap();

        let now = Utc::now() + chrono::Duration::days(4);
        let current = s.current_rentals(now);
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].days_held, 4);
        assert_eq!(current[0].progress, 40);
        assert_eq!(
            current[0].cashback_on_return,
            current[0].rental.price.half_rounded()
        );
    }

    #[test]
    fn test_state_survives_reopen() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut s = RentalStore::open(Box::new(SharedStorage(storage.clone())));
            s.add_to_cart(3).unwrap();
            s.add_to_cart(8).unwrap();
            s.confirm_rental().unwrap();
            s.add_to_cart(1).unwrap();
        }

        let reopened = RentalStore::open(Box::new(SharedStorage(storage)));
        assert_eq!(reopened.cart().len(), 1);
        assert_eq!(reopened.cart()[0].book_id, 1);
        assert_eq!(reopened.rentals().len(), 2);
        assert!(reopened.returns().is_empty());
    }

    #[test]
    fn test_save_failure_is_surfaced_but_memory_stays_ahead() {
        let (mut s, storage) = shared_store();
        storage.set_fail_saves(true);

        let err = s.add_to_cart(7).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Persistence {
                key: CART_KEY,
                ..
            }
        ));
        // optimistic mutation: the item is in memory regardless
        assert!(s.is_in_cart(7));

        // storage recovers; the next transition persists the current state
        storage.set_fail_saves(false);
        s.add_to_cart(8).unwrap();
        assert_eq!(s.cart().len(), 2);

        let reopened = RentalStore::open(Box::new(SharedStorage(storage)));
        assert_eq!(reopened.cart().len(), 2);
    }

    #[test]
    fn test_malformed_stored_collection_starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .save(CART_KEY, &serde_json::json!({"not": "an array"}))
            .unwrap();
        let s = RentalStore::open(Box::new(SharedStorage(storage)));
        assert!(s.cart().is_empty());
    }
}
