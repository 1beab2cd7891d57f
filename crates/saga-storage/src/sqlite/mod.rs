//! SQLite-backed storage implementation.

mod books;
mod collections;
mod dependencies;
mod entries;
pub mod schema;
mod store;

pub use store::SqliteStore;
