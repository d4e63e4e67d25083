pub mod enums;
pub mod error;
pub mod format;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::InvoiceStatus;
pub use error::CoreError;
pub use format::{cents_to_dollars, coerce_numeric, format_currency};
pub use structs::{
    CardData, CustomerField, CustomersTable, InvoiceForm, InvoicesTable, LatestInvoice, Revenue,
    User,
};
