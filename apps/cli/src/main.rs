//! # Librent CLI
//!
//! Command-line front end for the book-rental storefront.
//!
//! ## Command Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     librent Commands                                    │
//! │                                                                         │
//! │  browse [--search --category --price --sort]  filtered catalog view     │
//! │  cart add <id> | remove <id> | show           cart management           │
//! │  rent                                         confirm the whole cart    │
//! │  rentals                                      active rentals + progress │
//! │  return <rental-id>                           return for 50% cashback   │
//! │  returns                                      return history            │
//! │  stats                                        lifetime statistics       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This layer only renders store snapshots; every rule lives below it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use librent_core::query::{CategoryFilter, PriceRange, SortBy};
use librent_store::{JsonFileStorage, Outcome, RentalStore};

// =============================================================================
// Command-Line Interface
// =============================================================================

/// Browser-free book rental storefront.
#[derive(Parser)]
#[command(name = "librent", version, about)]
struct Cli {
    /// Data directory for the persisted collections
    /// (defaults to the platform data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the catalog with optional filters and sorting.
    Browse {
        /// Case-insensitive substring matched against title and author.
        #[arg(long, default_value = "")]
        search: String,

        /// Category: all, technology, non-fiction, fiction, science.
        #[arg(long, default_value = "all")]
        category: CategoryFilter,

        /// Price bucket: all, under-10, 10-15, 15-20, over-20.
        #[arg(long, default_value = "all")]
        price: PriceRange,

        /// Sort key: popularity, price-low, price-high, rating, title.
        #[arg(long, default_value = "popularity")]
        sort: SortBy,
    },

    /// Manage the rental cart.
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Confirm the rental of everything in the cart.
    Rent,

    /// Show current rentals with reading progress.
    Rentals,

    /// Return a rented book for 50% cashback.
    Return {
        /// The rental id shown by `librent rentals`.
        rental_id: Uuid,
    },

    /// Show the return history.
    Returns,

    /// Show lifetime rental statistics.
    Stats,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a book by catalog id.
    Add { book_id: u32 },
    /// Remove a book by catalog id.
    Remove { book_id: u32 },
    /// Show the cart contents and total.
    Show,
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() -> Result<()> {
    // Default: WARN, override with RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_dir(),
    };
    info!(data_dir = %data_dir.display(), "opening rental store");

    let storage = JsonFileStorage::open(&data_dir)
        .with_context(|| format!("cannot open data directory {}", data_dir.display()))?;
    let mut store = RentalStore::open(Box::new(storage));

    match cli.command {
        Command::Browse {
            search,
            category,
            price,
            sort,
        } => {
            store.set_search(search);
            store.set_category(category);
            store.set_price_range(price);
            store.set_sort_by(sort);
            render_browse(&store);
        }
        Command::Cart { action } => match action {
            CartAction::Add { book_id } => {
                let title = store.catalog().get(book_id).map(|b| b.title.clone());
                let outcome = store
                    .add_to_cart(book_id)
                    .context("change applied but not saved; persistence is degraded")?;
                match (outcome, title) {
                    (Outcome::Changed, Some(title)) => {
                        println!("Added \"{title}\" to your cart.");
                    }
                    (Outcome::Unchanged, Some(_)) => {
                        println!("Book {book_id} is already in your cart.");
                    }
                    (_, None) => {
                        println!("No book with id {book_id} in the catalog.");
                    }
                }
                render_cart(&store);
            }
            CartAction::Remove { book_id } => {
                let outcome = store
                    .remove_from_cart(book_id)
                    .context("change applied but not saved; persistence is degraded")?;
                if outcome.changed() {
                    println!("Removed book {book_id} from your cart.");
                } else {
                    println!("Book {book_id} was not in your cart.");
                }
                render_cart(&store);
            }
            CartAction::Show => render_cart(&store),
        },
        Command::Rent => {
            let confirmed = store
                .confirm_rental()
                .context("rental applied but not saved; persistence is degraded")?;
            if confirmed == 0 {
                println!("Your cart is empty. Add some books to get started!");
            } else {
                println!("Rental confirmed: {confirmed} book(s) rented. Happy reading!");
                render_rentals(&store);
            }
        }
        Command::Rentals => render_rentals(&store),
        Command::Return { rental_id } => {
            let cashback = store
                .return_book(rental_id)
                .context("return applied but not saved; persistence is degraded")?;
            match cashback {
                Some(amount) => {
                    println!("Book returned. You received {amount} cashback.");
                    render_stats(&store);
                }
                None => println!("No active rental with id {rental_id} - nothing returned."),
            }
        }
        Command::Returns => render_returns(&store),
        Command::Stats => render_stats(&store),
    }

    Ok(())
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "librent", "librent")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".librent"))
}

// =============================================================================
// Rendering
// =============================================================================

fn render_browse(store: &RentalStore) {
    let result = store.query();
    println!(
        "Showing {} of {} books",
        result.filtered_count, result.total_count
    );
    if result.books.is_empty() {
        println!("No books found matching your criteria.");
        return;
    }
    println!();
    for book in &result.books {
        let marker = if store.is_in_cart(book.id) {
            "  [in cart]"
        } else {
            ""
        };
        println!(
            "  #{:<2} {:<32} by {:<18} {:>7}  (was {}, {}% off, save {})",
            book.id,
            book.title,
            book.author,
            book.price.to_string(),
            book.original_price,
            book.discount_percent(),
            book.savings(),
        );
        println!(
            "       {:<12} rating {:.1} ({} reviews){marker}",
            book.category.to_string(),
            book.rating,
            book.reviews,
        );
    }
}

fn render_cart(store: &RentalStore) {
    let cart = store.cart();
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    println!("Cart ({} item(s)):", cart.len());
    for item in cart {
        println!(
            "  #{:<2} {:<32} by {:<18} {:>7}",
            item.book_id,
            item.title,
            item.author,
            item.price.to_string()
        );
    }
    println!("Total: {}", store.cart_total());
}

fn render_rentals(store: &RentalStore) {
    let current = store.current_rentals(Utc::now());
    if current.is_empty() {
        println!("No current rentals.");
        return;
    }
    println!("Current rentals:");
    for entry in &current {
        println!(
            "  {}  {:<32} rented {} day(s) ago",
            entry.rental.rental_id, entry.rental.title, entry.days_held
        );
        println!(
            "      reading progress {:>3}%  |  return now for {} cashback",
            entry.progress, entry.cashback_on_return
        );
    }
}

fn render_returns(store: &RentalStore) {
    let returns = store.returns();
    if returns.is_empty() {
        println!("No returns yet.");
        return;
    }
    println!("Returns:");
    for record in returns {
        println!(
            "  {}  {:<32} paid {:>7}, cashback {:>7}, returned {}",
            record.return_id,
            record.title,
            record.rental_price.to_string(),
            record.cashback.to_string(),
            record.returned_at.format("%Y-%m-%d")
        );
    }
}

fn render_stats(store: &RentalStore) {
    let stats = store.stats();
    println!("Books rented (all time): {}", stats.total_rented);
    println!("Books returned:          {}", stats.total_returned);
    println!("Total cashback:          {}", stats.total_cashback);
}
