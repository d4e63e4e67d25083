//! # Database Crate
//!
//! The read-side data access layer of the invoicing dashboard. It owns every
//! SQL statement the application issues against PostgreSQL and shapes the
//! rows into the view records defined in `core-types`.
//!
//! ## Architectural Principles
//!
//! - **Injected Pool:** The connection pool is created by the process entry point
//!   (`connect`) and passed into `DbRepository::new`. Nothing here is global.
//! - **Bound Parameters Only:** Search text, ids and page offsets are always bound
//!   with `$n` placeholders.
//! - **Stable Errors:** A failed query is logged and surfaced as `DbError::Query`,
//!   whose message names the operation rather than echoing the driver.
//!
//! ## Public API
//!
//! - `connect`: Builds the `PgPool` from `DatabaseSettings`.
//! - `run_migrations`: Applies the bundled schema.
//! - `DbRepository`: All read operations.
//! - `DbError` / `Operation`: The error type and the operation it names.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod pagination;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::{DbError, Operation};
pub use pagination::{ITEMS_PER_PAGE, total_pages};
pub use repository::DbRepository;
