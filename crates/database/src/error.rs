use core_types::CoreError;
use std::fmt;
use thiserror::Error;

/// Names each read the repository performs, so failures carry a stable,
/// caller-facing message instead of the driver's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Revenue,
    LatestInvoices,
    CardData,
    FilteredInvoices,
    InvoicePages,
    InvoiceById,
    Customers,
    FilteredCustomers,
    UserByEmail,
}

impl Operation {
    pub fn message(&self) -> &'static str {
        match self {
            Operation::Revenue => "Failed to fetch revenue data.",
            Operation::LatestInvoices => "Failed to fetch the latest invoices.",
            Operation::CardData => "Failed to fetch card data.",
            Operation::FilteredInvoices => "Failed to fetch invoices.",
            Operation::InvoicePages => "Failed to fetch total number of invoices.",
            Operation::InvoiceById => "Failed to fetch invoice.",
            Operation::Customers => "Failed to fetch all customers.",
            Operation::FilteredCustomers => "Failed to fetch customer table.",
            Operation::UserByEmail => "Failed to fetch user.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load configuration for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database.")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A query failed to execute or its rows did not match the expected columns.
    #[error("{operation}")]
    Query {
        operation: Operation,
        #[source]
        source: sqlx::Error,
    },

    /// A row decoded, but one of its values is outside the domain (e.g. an unknown status).
    #[error("{operation}")]
    Decode {
        operation: Operation,
        #[source]
        source: CoreError,
    },
}

impl DbError {
    /// Builds a `map_err` adapter that logs the driver error and tags it with `operation`.
    pub(crate) fn query(operation: Operation) -> impl FnOnce(sqlx::Error) -> DbError {
        move |source| {
            tracing::error!(error = %source, operation = ?operation, "Database error.");
            DbError::Query { operation, source }
        }
    }

    pub(crate) fn decode(operation: Operation) -> impl FnOnce(CoreError) -> DbError {
        move |source| {
            tracing::error!(error = %source, operation = ?operation, "Unexpected value in database row.");
            DbError::Decode { operation, source }
        }
    }

    /// The operation that failed, if this error came from a query.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            DbError::Query { operation, .. } | DbError::Decode { operation, .. } => {
                Some(*operation)
            }
            _ => None,
        }
    }
}
