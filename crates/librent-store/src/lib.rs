//! # librent-store: State Store and Persistence for Librent
//!
//! Owns the mutable session state (cart, rentals, returns, filter config)
//! and persists the three collections through an opaque key-value
//! [`StorageAdapter`]. All business rules live in `librent-core`; this crate
//! only applies them and writes the results down.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     librent-store                                       │
//! │                                                                         │
//! │  ┌──────────────────┐        ┌───────────────────────────────────────┐  │
//! │  │   RentalStore    │ ─────► │        StorageAdapter (trait)         │  │
//! │  │                  │  save  │                                       │  │
//! │  │ cart / rentals / │  load  │  JsonFileStorage   one JSON file/key  │  │
//! │  │ returns/filters  │        │  MemoryStorage     tests + ephemeral  │  │
//! │  └────────┬─────────┘        └───────────────────────────────────────┘  │
//! │           │ pure transitions                                            │
//! │           ▼                                                             │
//! │      librent-core                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod storage;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use storage::{JsonFileStorage, MemoryStorage, StorageAdapter, StorageError};
pub use store::{CurrentRental, Outcome, QueryResult, RentalStore};
pub use store::{CART_KEY, RENTALS_KEY, RETURNS_KEY};
