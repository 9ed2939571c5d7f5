//! # Lifecycle Manager
//!
//! Pure transition functions for the rental state machine.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Rental Lifecycle                                     │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │ Catalog  │────►│ In Cart  │────►│  Rented  │────►│ Returned │       │
//! │  │          │     │          │     │          │     │ (final)  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                                │
//! │                   add_to_cart      confirm_rental    return_book       │
//! │                   remove_from_cart                                      │
//! │                                                                         │
//! │  No transition skips a state; no transition reverses.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No-op policy
//! Unknown ids, duplicate adds and double returns are expected conditions.
//! Every function reports whether it changed anything; it never errors on
//! them and never partially applies.
//!
//! Functions take `now` as a parameter so derivations stay deterministic
//! under test; only the caller touches the clock.

use chrono::{DateTime, Utc};

use crate::catalog::Catalog;
use crate::money::Money;
use crate::types::{CartItem, Rental, RentalStats, RentalStatus, ReturnRecord};

/// Reading progress gained per day held, in percent.
pub const PROGRESS_PER_DAY: u8 = 10;

// =============================================================================
// Cart Transitions
// =============================================================================

/// Adds a book to the cart as a snapshot.
///
/// ## Behavior
/// - Unknown `book_id`: no-op, returns `false`
/// - Book already in cart: no-op, returns `false` (uniqueness invariant)
/// - Otherwise appends a `CartItem` with `added_at = now`, returns `true`
pub fn add_to_cart(
    catalog: &Catalog,
    cart: &mut Vec<CartItem>,
    book_id: u32,
    now: DateTime<Utc>,
) -> bool {
    let Some(book) = catalog.get(book_id) else {
        return false;
    };
    if cart.iter().any(|item| item.book_id == book_id) {
        return false;
    }
    cart.push(CartItem::from_book(book, now));
    true
}

/// Removes a book from the cart. No-op if absent.
pub fn remove_from_cart(cart: &mut Vec<CartItem>, book_id: u32) -> bool {
    let before = cart.len();
    cart.retain(|item| item.book_id != book_id);
    cart.len() != before
}

/// Sum of the prices of everything in the cart.
pub fn cart_total(cart: &[CartItem]) -> Money {
    cart.iter().map(|item| item.price).sum()
}

// =============================================================================
// Rental Transitions
// =============================================================================

/// Confirms the rental of everything in the cart.
///
/// Every cart item becomes a `Rental` with a fresh id, `rented_at = now` and
/// status `Rented`; the cart is cleared. Returns the number of rentals
/// created.
///
/// The empty-cart check runs before any id generation; an empty cart is a
/// no-op.
pub fn confirm_rental(
    cart: &mut Vec<CartItem>,
    rentals: &mut Vec<Rental>,
    now: DateTime<Utc>,
) -> usize {
    if cart.is_empty() {
        return 0;
    }
    let confirmed = cart.len();
    rentals.extend(cart.iter().map(|item| Rental::from_cart_item(item, now)));
    cart.clear();
    confirmed
}

/// Returns a rented book.
///
/// Finds the rental with `rental_id` and status `Rented`. If absent or
/// already returned, this is a no-op and yields `None`. Otherwise a
/// `ReturnRecord` is appended (cashback = half the price paid, rounded to
/// whole cents) and the rental is marked `Returned` in place. Rentals are
/// never deleted, so return history stays queryable.
pub fn return_book(
    rentals: &mut [Rental],
    returns: &mut Vec<ReturnRecord>,
    rental_id: uuid::Uuid,
    now: DateTime<Utc>,
) -> Option<Money> {
    let rental = rentals
        .iter_mut()
        .find(|r| r.rental_id == rental_id && r.status == RentalStatus::Rented)?;

    let record = ReturnRecord::from_rental(rental, now);
    let cashback = record.cashback;
    returns.push(record);
    rental.status = RentalStatus::Returned;
    Some(cashback)
}

// =============================================================================
// Derivations
// =============================================================================

/// Whole days the rental has been held as of `now`. Never negative.
pub fn days_held(rental: &Rental, now: DateTime<Utc>) -> i64 {
    (now - rental.rented_at).num_days().max(0)
}

/// Reading progress in percent: 10% per day held, capped at 100.
///
/// Purely presentational; recomputed on demand, never stored.
pub fn reading_progress(rental: &Rental, now: DateTime<Utc>) -> u8 {
    let days = days_held(rental, now);
    (days.saturating_mul(PROGRESS_PER_DAY as i64)).min(100) as u8
}

/// Aggregate statistics over the rental history.
///
/// `total_rented` is the all-time rental count, returned ones included.
pub fn stats(rentals: &[Rental], returns: &[ReturnRecord]) -> RentalStats {
    RentalStats {
        total_rented: rentals.len(),
        total_returned: returns.len(),
        total_cashback: returns.iter().map(|r| r.cashback).sum(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_add_to_cart_snapshots_book() {
        let catalog = Catalog::standard();
        let mut cart = Vec::new();

        assert!(add_to_cart(&catalog, &mut cart, 7, now()));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].title, "Dune");
        assert_eq!(cart[0].price, Money::from_cents(1499));
    }

    #[test]
    fn test_add_to_cart_unknown_id_is_noop() {
        let catalog = Catalog::standard();
        let mut cart = Vec::new();

        assert!(!add_to_cart(&catalog, &mut cart, 999, now()));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_to_cart_never_duplicates() {
        let catalog = Catalog::standard();
        let mut cart = Vec::new();

        for _ in 0..5 {
            add_to_cart(&catalog, &mut cart, 4, now());
        }
        assert_eq!(cart.iter().filter(|i| i.book_id == 4).count(), 1);
    }

    #[test]
    fn test_remove_from_cart() {
        let catalog = Catalog::standard();
        let mut cart = Vec::new();
        add_to_cart(&catalog, &mut cart, 1, now());
        add_to_cart(&catalog, &mut cart, 2, now());

        assert!(remove_from_cart(&mut cart, 1));
        assert_eq!(cart.len(), 1);
        // absent id is a no-op
        assert!(!remove_from_cart(&mut cart, 1));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_cart_total() {
        let catalog = Catalog::standard();
        let mut cart = Vec::new();
        add_to_cart(&catalog, &mut cart, 1, now()); // $12.99
        add_to_cart(&catalog, &mut cart, 3, now()); // $10.99
        assert_eq!(cart_total(&cart), Money::from_cents(2398));
    }

    #[test]
    fn test_confirm_rental_moves_everything() {
        let catalog = Catalog::standard();
        let mut cart = Vec::new();
        let mut rentals = Vec::new();
        add_to_cart(&catalog, &mut cart, 1, now());
        add_to_cart(&catalog, &mut cart, 2, now());
        add_to_cart(&catalog, &mut cart, 3, now());

        let confirmed = confirm_rental(&mut cart, &mut rentals, now());

        assert_eq!(confirmed, 3);
        assert!(cart.is_empty());
        assert_eq!(rentals.len(), 3);
        assert!(rentals.iter().all(|r| r.status == RentalStatus::Rented));

        // rental ids are unique across the batch
        let mut ids: Vec<_> = rentals.iter().map(|r| r.rental_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_confirm_rental_empty_cart_is_noop() {
        let mut cart = Vec::new();
        let mut rentals = Vec::new();
        assert_eq!(confirm_rental(&mut cart, &mut rentals, now()), 0);
        assert!(rentals.is_empty());
    }

    #[test]
    fn test_return_book_grants_half_price_cashback() {
        let catalog = Catalog::standard();
        let mut cart = Vec::new();
        let mut rentals = Vec::new();
        let mut returns = Vec::new();

        // Worked example: book 7 ($14.99) → cashback $7.50
        add_to_cart(&catalog, &mut cart, 7, now());
        confirm_rental(&mut cart, &mut rentals, now());
        let rental_id = rentals[0].rental_id;

        let cashback = return_book(&mut rentals, &mut returns, rental_id, now());

        assert_eq!(cashback, Some(Money::from_cents(750)));
        assert_eq!(rentals[0].status, RentalStatus::Returned);
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].rental_id, rental_id);
        assert_eq!(returns[0].book_id, 7);
        assert_eq!(returns[0].rental_price, Money::from_cents(1499));
    }

    #[test]
    fn test_return_book_double_return_is_noop() {
        let catalog = Catalog::standard();
        let mut cart = Vec::new();
        let mut rentals = Vec::new();
        let mut returns = Vec::new();
        add_to_cart(&catalog, &mut cart, 5, now());
        confirm_rental(&mut cart, &mut rentals, now());
        let rental_id = rentals[0].rental_id;

        assert!(return_book(&mut rentals, &mut returns, rental_id, now()).is_some());
        assert!(return_book(&mut rentals, &mut returns, rental_id, now()).is_none());
        assert_eq!(returns.len(), 1);
    }

    #[test]
    fn test_return_book_unknown_id_is_noop() {
        let mut rentals = Vec::new();
        let mut returns = Vec::new();
        let outcome = return_book(&mut rentals, &mut returns, uuid::Uuid::new_v4(), now());
        assert!(outcome.is_none());
        assert!(returns.is_empty());
    }

    #[test]
    fn test_reading_progress_accrues_and_caps() {
        let catalog = Catalog::standard();
        let mut cart = Vec::new();
        let mut rentals = Vec::new();
        let start = now();
        add_to_cart(&catalog, &mut cart, 6, start);
        confirm_rental(&mut cart, &mut rentals, start);
        let rental = &rentals[0];

        assert_eq!(reading_progress(rental, start), 0);
        assert_eq!(reading_progress(rental, start + Duration::days(3)), 30);
        // partial days floor: 3 days 23 hours is still 3 days
        assert_eq!(
            reading_progress(rental, start + Duration::days(3) + Duration::hours(23)),
            30
        );
        assert_eq!(reading_progress(rental, start + Duration::days(10)), 100);
        assert_eq!(reading_progress(rental, start + Duration::days(400)), 100);
        // clock skew never goes negative
        assert_eq!(reading_progress(rental, start - Duration::days(2)), 0);
    }

    #[test]
    fn test_stats_count_lifetime_rentals() {
        let catalog = Catalog::standard();
        let mut cart = Vec::new();
        let mut rentals = Vec::new();
        let mut returns = Vec::new();

        add_to_cart(&catalog, &mut cart, 7, now()); // $14.99
        add_to_cart(&catalog, &mut cart, 3, now()); // $10.99
        confirm_rental(&mut cart, &mut rentals, now());
        let first = rentals[0].rental_id;
        return_book(&mut rentals, &mut returns, first, now());

        let s = stats(&rentals, &returns);
        // total_rented stays at 2 even after a return: lifetime count
        assert_eq!(s.total_rented, 2);
        assert_eq!(s.total_returned, 1);
        assert_eq!(s.total_cashback, Money::from_cents(750));
    }
}
