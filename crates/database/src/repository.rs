use crate::error::{DbError, Operation};
use crate::pagination::{ITEMS_PER_PAGE, page_offset, search_pattern, total_pages};
use chrono::NaiveDate;
use core_types::{
    CardData, CustomerField, CustomersTable, InvoiceForm, InvoiceStatus, InvoicesTable,
    LatestInvoice, Revenue, User, cents_to_dollars, coerce_numeric, format_currency,
};
use rust_decimal::Decimal;
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
///
/// Every method is read-only. User-supplied text only ever reaches Postgres
/// as a bound parameter.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

// --- Row types ---
// These mirror the selected columns exactly. `query_as` fails with a column
// error if a column is missing or has an unexpected type.

#[derive(FromRow, Debug)]
struct RevenueRow {
    month: String,
    revenue: Decimal,
}

#[derive(FromRow, Debug)]
struct LatestInvoiceRow {
    id: Uuid,
    name: String,
    image_url: String,
    email: String,
    amount: i64,
}

#[derive(FromRow, Debug)]
struct StatusTotalsRow {
    paid: i64,
    pending: i64,
}

#[derive(FromRow, Debug)]
struct InvoicesTableRow {
    id: Uuid,
    customer_id: Uuid,
    name: String,
    email: String,
    image_url: String,
    date: NaiveDate,
    amount: i64,
    status: String,
}

#[derive(FromRow, Debug)]
struct InvoiceFormRow {
    id: Uuid,
    customer_id: Uuid,
    amount: i64,
    status: String,
}

#[derive(FromRow, Debug)]
struct CustomerFieldRow {
    id: Uuid,
    name: String,
}

#[derive(FromRow, Debug)]
struct CustomersTableRow {
    id: Uuid,
    name: String,
    email: String,
    image_url: String,
    total_invoices: i64,
    total_pending: i64,
    total_paid: i64,
}

#[derive(FromRow, Debug)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    #[sqlx(rename = "password")]
    password_hash: String,
}

// --- Row -> view record mapping ---

impl From<RevenueRow> for Revenue {
    fn from(row: RevenueRow) -> Self {
        Self {
            month: row.month,
            revenue: coerce_numeric(row.revenue),
        }
    }
}

impl From<LatestInvoiceRow> for LatestInvoice {
    fn from(row: LatestInvoiceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            email: row.email,
            amount: format_currency(row.amount),
        }
    }
}

impl From<CustomerFieldRow> for CustomerField {
    fn from(row: CustomerFieldRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<CustomersTableRow> for CustomersTable {
    fn from(row: CustomersTableRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
            total_invoices: row.total_invoices,
            total_pending: format_currency(row.total_pending),
            total_paid: format_currency(row.total_paid),
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

impl InvoicesTableRow {
    fn into_record(self) -> Result<InvoicesTable, DbError> {
        let status = self
            .status
            .parse::<InvoiceStatus>()
            .map_err(DbError::decode(Operation::FilteredInvoices))?;
        Ok(InvoicesTable {
            id: self.id,
            customer_id: self.customer_id,
            name: self.name,
            email: self.email,
            image_url: self.image_url,
            date: self.date,
            amount: self.amount,
            status,
        })
    }
}

impl InvoiceFormRow {
    fn into_record(self) -> Result<InvoiceForm, DbError> {
        let status = self
            .status
            .parse::<InvoiceStatus>()
            .map_err(DbError::decode(Operation::InvoiceById))?;
        Ok(InvoiceForm {
            id: self.id,
            customer_id: self.customer_id,
            amount: cents_to_dollars(self.amount),
            status,
        })
    }
}

/// Builds a `CardData` from the three aggregate results.
fn card_data(invoice_count: i64, customer_count: i64, totals: StatusTotalsRow) -> CardData {
    CardData {
        number_of_invoices: invoice_count,
        number_of_customers: customer_count,
        total_paid_invoices: format_currency(totals.paid),
        total_pending_invoices: format_currency(totals.pending),
    }
}

// The invoice search predicate, shared by the list and the page count. `$1` is the pattern.
const INVOICE_SEARCH_PREDICATE: &str = r#"
    customers.name ILIKE $1 OR
    customers.email ILIKE $1 OR
    invoices.amount::text ILIKE $1 OR
    invoices.date::text ILIKE $1 OR
    invoices.status ILIKE $1
"#;

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetches the monthly revenue series.
    pub async fn fetch_revenue(&self) -> Result<Vec<Revenue>, DbError> {
        let rows = sqlx::query_as::<_, RevenueRow>(
            "SELECT month, revenue::numeric AS revenue FROM revenue",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::query(Operation::Revenue))?;

        tracing::debug!(months = rows.len(), "Fetched revenue.");
        Ok(rows.into_iter().map(Revenue::from).collect())
    }

    /// Fetches the five most recent invoices with their customer, amounts formatted.
    pub async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoice>, DbError> {
        let rows = sqlx::query_as::<_, LatestInvoiceRow>(
            r#"
            SELECT invoices.amount::bigint AS amount, customers.name, customers.image_url, customers.email, invoices.id
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            ORDER BY invoices.date DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::query(Operation::LatestInvoices))?;

        Ok(rows.into_iter().map(LatestInvoice::from).collect())
    }

    /// Fetches the dashboard card totals.
    ///
    /// The three aggregates run concurrently; if any one fails the whole
    /// call fails and no partial `CardData` is produced.
    pub async fn fetch_card_data(&self) -> Result<CardData, DbError> {
        let invoice_count_future =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices").fetch_one(&self.pool);
        let customer_count_future =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers").fetch_one(&self.pool);
        let status_totals_future = sqlx::query_as::<_, StatusTotalsRow>(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN status = $1 THEN amount ELSE 0 END), 0)::bigint AS paid,
                COALESCE(SUM(CASE WHEN status = $2 THEN amount ELSE 0 END), 0)::bigint AS pending
            FROM invoices
            "#,
        )
        .bind(InvoiceStatus::Paid.as_str())
        .bind(InvoiceStatus::Pending.as_str())
        .fetch_one(&self.pool);

        let (invoice_count, customer_count, totals) = tokio::try_join!(
            invoice_count_future,
            customer_count_future,
            status_totals_future
        )
        .map_err(DbError::query(Operation::CardData))?;

        Ok(card_data(invoice_count, customer_count, totals))
    }

    /// Fetches one page of invoices matching `query`, newest first.
    ///
    /// `page` is 1-based and must be at least 1.
    pub async fn fetch_filtered_invoices(
        &self,
        query: &str,
        page: i64,
    ) -> Result<Vec<InvoicesTable>, DbError> {
        let sql = format!(
            r#"
            SELECT
                invoices.id,
                invoices.customer_id,
                invoices.amount::bigint AS amount,
                invoices.date,
                invoices.status,
                customers.name,
                customers.email,
                customers.image_url
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE {INVOICE_SEARCH_PREDICATE}
            ORDER BY invoices.date DESC, invoices.id
            LIMIT $2 OFFSET $3
            "#
        );

        let rows = sqlx::query_as::<_, InvoicesTableRow>(&sql)
            .bind(search_pattern(query))
            .bind(ITEMS_PER_PAGE)
            .bind(page_offset(page))
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::query(Operation::FilteredInvoices))?;

        rows.into_iter().map(InvoicesTableRow::into_record).collect()
    }

    /// Returns how many pages `fetch_filtered_invoices` has for `query`.
    pub async fn fetch_invoices_pages(&self, query: &str) -> Result<i64, DbError> {
        let sql = format!(
            r#"
            SELECT COUNT(*)
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE {INVOICE_SEARCH_PREDICATE}
            "#
        );

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(search_pattern(query))
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::query(Operation::InvoicePages))?;

        Ok(total_pages(count))
    }

    /// Fetches a single invoice for editing. Returns `None` when no invoice has this id.
    pub async fn fetch_invoice_by_id(&self, id: &str) -> Result<Option<InvoiceForm>, DbError> {
        // A malformed id cannot match any row.
        let Ok(id) = Uuid::parse_str(id) else {
            tracing::debug!(id, "Invoice id is not a UUID; treating as not found.");
            return Ok(None);
        };

        let row = sqlx::query_as::<_, InvoiceFormRow>(
            r#"
            SELECT
                invoices.id,
                invoices.customer_id,
                invoices.amount::bigint AS amount,
                invoices.status
            FROM invoices
            WHERE invoices.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::query(Operation::InvoiceById))?;

        row.map(InvoiceFormRow::into_record).transpose()
    }

    /// Fetches every customer's id and name, alphabetically.
    pub async fn fetch_customers(&self) -> Result<Vec<CustomerField>, DbError> {
        let rows = sqlx::query_as::<_, CustomerFieldRow>(
            "SELECT id, name FROM customers ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::query(Operation::Customers))?;

        Ok(rows.into_iter().map(CustomerField::from).collect())
    }

    /// Fetches customers matching `query` with their invoice count and
    /// pending/paid totals, alphabetically.
    pub async fn fetch_filtered_customers(
        &self,
        query: &str,
    ) -> Result<Vec<CustomersTable>, DbError> {
        let rows = sqlx::query_as::<_, CustomersTableRow>(
            r#"
            SELECT
                customers.id,
                customers.name,
                customers.email,
                customers.image_url,
                COUNT(invoices.id) AS total_invoices,
                COALESCE(SUM(CASE WHEN invoices.status = $2 THEN invoices.amount ELSE 0 END), 0)::bigint AS total_pending,
                COALESCE(SUM(CASE WHEN invoices.status = $3 THEN invoices.amount ELSE 0 END), 0)::bigint AS total_paid
            FROM customers
            LEFT JOIN invoices ON customers.id = invoices.customer_id
            WHERE
                customers.name ILIKE $1 OR
                customers.email ILIKE $1
            GROUP BY customers.id, customers.name, customers.email, customers.image_url
            ORDER BY customers.name ASC
            "#,
        )
        .bind(search_pattern(query))
        .bind(InvoiceStatus::Pending.as_str())
        .bind(InvoiceStatus::Paid.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::query(Operation::FilteredCustomers))?;

        Ok(rows.into_iter().map(CustomersTable::from).collect())
    }

    /// Looks up a user by exact email. If several rows share the email, the first wins.
    pub async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password FROM users WHERE email = $1 LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::query(Operation::UserByEmail))?;

        Ok(row.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_data_formats_totals() {
        let cards = card_data(
            13,
            6,
            StatusTotalsRow {
                paid: 1_234_567,
                pending: 0,
            },
        );

        assert_eq!(cards.number_of_invoices, 13);
        assert_eq!(cards.number_of_customers, 6);
        assert_eq!(cards.total_paid_invoices, "$12,345.67");
        assert_eq!(cards.total_pending_invoices, "$0.00");
    }

    #[test]
    fn invoice_form_converts_cents_to_dollars() {
        let row = InvoiceFormRow {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            amount: 15795,
            status: "pending".to_string(),
        };

        let form = row.into_record().unwrap();
        assert_eq!(form.amount, 157.95);
        assert_eq!(form.status, InvoiceStatus::Pending);
    }

    #[test]
    fn unknown_status_is_a_decode_error() {
        let row = InvoicesTableRow {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            name: "Delba de Oliveira".to_string(),
            email: "delba@oliveira.com".to_string(),
            image_url: "/customers/delba-de-oliveira.png".to_string(),
            date: NaiveDate::from_ymd_opt(2022, 12, 6).unwrap(),
            amount: 15795,
            status: "void".to_string(),
        };

        let err = row.into_record().unwrap_err();
        assert!(matches!(
            err,
            DbError::Decode {
                operation: Operation::FilteredInvoices,
                ..
            }
        ));
    }

    #[test]
    fn customer_totals_are_formatted() {
        let record = CustomersTable::from(CustomersTableRow {
            id: Uuid::new_v4(),
            name: "Lee Robinson".to_string(),
            email: "lee@robinson.com".to_string(),
            image_url: "/customers/lee-robinson.png".to_string(),
            total_invoices: 2,
            total_pending: 44_800,
            total_paid: 0,
        });

        assert_eq!(record.total_pending, "$448.00");
        assert_eq!(record.total_paid, "$0.00");
        assert_eq!(record.total_invoices, 2);
    }

    #[test]
    fn revenue_is_coerced_to_a_number() {
        let revenue = Revenue::from(RevenueRow {
            month: "Jan".to_string(),
            revenue: Decimal::from(2000),
        });
        assert_eq!(revenue.revenue, 2000.0);
    }
}
