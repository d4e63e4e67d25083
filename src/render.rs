//! Terminal output for the view records: `comfy-table` tables or pretty JSON.

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use core_types::{
    CardData, CustomerField, CustomersTable, InvoiceForm, InvoicesTable, LatestInvoice, Revenue,
    User, format_currency,
};
use serde::Serialize;

/// Prints `value` as JSON, or as the table built by `to_table`.
pub fn print<T: Serialize + ?Sized>(
    value: &T,
    json: bool,
    to_table: impl FnOnce(&T) -> Table,
) -> anyhow::Result<()> {
    if json {
        print_json(value)
    } else {
        println!("{}", to_table(value));
        Ok(())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn money(text: impl Into<String>) -> Cell {
    Cell::new(text.into()).set_alignment(CellAlignment::Right)
}

pub fn revenue_table(revenue: &[Revenue]) -> Table {
    let mut table = new_table(&["Month", "Revenue"]);
    for point in revenue {
        table.add_row(vec![Cell::new(&point.month), money(point.revenue.to_string())]);
    }
    table
}

pub fn latest_invoices_table(invoices: &[LatestInvoice]) -> Table {
    let mut table = new_table(&["Name", "Email", "Amount"]);
    for invoice in invoices {
        table.add_row(vec![
            Cell::new(&invoice.name),
            Cell::new(&invoice.email),
            money(invoice.amount.as_str()),
        ]);
    }
    table
}

pub fn card_data_table(cards: &CardData) -> Table {
    let mut table = new_table(&["Card", "Value"]);
    table
        .add_row(vec![Cell::new("Collected"), money(cards.total_paid_invoices.as_str())])
        .add_row(vec![Cell::new("Pending"), money(cards.total_pending_invoices.as_str())])
        .add_row(vec![Cell::new("Total Invoices"), money(cards.number_of_invoices.to_string())])
        .add_row(vec![Cell::new("Total Customers"), money(cards.number_of_customers.to_string())]);
    table
}

pub fn invoices_table(invoices: &[InvoicesTable]) -> Table {
    let mut table = new_table(&["Customer", "Email", "Amount", "Date", "Status", "Id"]);
    for invoice in invoices {
        table.add_row(vec![
            Cell::new(&invoice.name),
            Cell::new(&invoice.email),
            money(format_currency(invoice.amount)),
            Cell::new(invoice.date.format("%b %-d, %Y")),
            Cell::new(invoice.status),
            Cell::new(invoice.id),
        ]);
    }
    table
}

pub fn invoice_form_table(invoice: &InvoiceForm) -> Table {
    let mut table = new_table(&["Field", "Value"]);
    table
        .add_row(vec![Cell::new("Id"), Cell::new(invoice.id)])
        .add_row(vec![Cell::new("Customer"), Cell::new(invoice.customer_id)])
        .add_row(vec![Cell::new("Amount"), money(format!("{:.2}", invoice.amount))])
        .add_row(vec![Cell::new("Status"), Cell::new(invoice.status)]);
    table
}

pub fn customers_table(customers: &[CustomerField]) -> Table {
    let mut table = new_table(&["Name", "Id"]);
    for customer in customers {
        table.add_row(vec![Cell::new(&customer.name), Cell::new(customer.id)]);
    }
    table
}

pub fn filtered_customers_table(customers: &[CustomersTable]) -> Table {
    let mut table = new_table(&["Name", "Email", "Invoices", "Pending", "Paid"]);
    for customer in customers {
        table.add_row(vec![
            Cell::new(&customer.name),
            Cell::new(&customer.email),
            money(customer.total_invoices.to_string()),
            money(customer.total_pending.as_str()),
            money(customer.total_paid.as_str()),
        ]);
    }
    table
}

pub fn user_table(user: &User) -> Table {
    let mut table = new_table(&["Id", "Name", "Email"]);
    table.add_row(vec![Cell::new(user.id), Cell::new(&user.name), Cell::new(&user.email)]);
    table
}
