use crate::enums::InvoiceStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A registered user of the dashboard.
///
/// `password_hash` is never serialized, so a `User` can be handed to a
/// session layer or rendered as JSON without leaking the hash.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// One point of the monthly revenue chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revenue {
    pub month: String,
    pub revenue: f64,
}

/// A row of the "latest invoices" widget. `amount` is already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestInvoice {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub email: String,
    pub amount: String,
}

/// Totals shown on the dashboard summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub number_of_invoices: i64,
    pub number_of_customers: i64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}

/// A row of the searchable invoices table, joined with its customer.
/// `amount` stays in integer cents; the table formats it on render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicesTable {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: NaiveDate,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// The editable view of a single invoice. `amount` is in dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceForm {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub amount: f64,
    pub status: InvoiceStatus,
}

/// Minimal customer reference for select inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerField {
    pub id: Uuid,
    pub name: String,
}

/// A customer with aggregated invoice totals, already formatted as currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomersTable {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: String,
    pub total_paid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_json_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "User".to_string(),
            email: "user@nextmail.com".to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "user@nextmail.com");
        assert!(!format!("{user:?}").contains("$2b$"));
    }

    #[test]
    fn status_serializes_lowercase() {
        let form = InvoiceForm {
            id: Uuid::nil(),
            customer_id: Uuid::nil(),
            amount: 157.95,
            status: InvoiceStatus::Pending,
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["amount"], 157.95);
    }
}
