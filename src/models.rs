use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    identifier,
    number::{NumberParseError, NumberParser},
};

/// How the business issuing the invoice expects to be paid.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PaymentDetails {
    pub bank_name: String,
    pub iban: String,
    pub bic: String,
    pub payment_terms: String,
}

/// The issuer of an invoice.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    pub company_name: String,
    #[serde(rename = "address_line_1")]
    pub address_line1: String,
    #[serde(rename = "address_line_2")]
    pub address_line2: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub email: String,
    pub phone: String,
    pub tax_id: String,
    pub payment_details: PaymentDetails,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            id: String::new(),
            display_name: String::new(),
            company_name: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: String::new(),
            email: String::new(),
            phone: String::new(),
            tax_id: String::new(),
            payment_details: PaymentDetails::default(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

/// The recipient of an invoice.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Customer {
    pub id: String,
    pub display_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "address_line_1")]
    pub address_line1: String,
    #[serde(rename = "address_line_2")]
    pub address_line2: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub notes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Default for Customer {
    fn default() -> Self {
        Customer {
            id: String::new(),
            display_name: String::new(),
            contact_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: String::new(),
            notes: String::new(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

/// A single row of the item table of an invoice.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

impl InvoiceItem {
    /// Creates an item whose line total is the quantity times the unit price.
    pub fn new<S: Into<String>>(description: S, quantity: f64, unit_price: f64) -> Self {
        InvoiceItem {
            description: description.into(),
            quantity,
            unit_price,
            line_total: quantity * unit_price,
        }
    }

    /// Creates an item from the quantity and unit price as they were typed by the user,
    /// interpreting both with the given number parser.
    ///
    /// # Arguments
    ///
    /// * `description` - The description of the item, stored as it is.
    /// * `quantity_text` - The quantity, e.g. `2` or `1,5`.
    /// * `unit_price_text` - The unit price, e.g. `1.234,56`.
    /// * `number_parser` - The convention used for both numbers.
    pub fn from_input<S: Into<String>>(
        description: S,
        quantity_text: &str,
        unit_price_text: &str,
        number_parser: &dyn NumberParser,
    ) -> Result<Self, NumberParseError> {
        let quantity = number_parser.parse_float(quantity_text)?;
        let unit_price = number_parser.parse_float(unit_price_text)?;

        Ok(InvoiceItem::new(description, quantity, unit_price))
    }

    /// Sets the line total back to the quantity times the unit price.
    pub fn recalculate(&mut self) {
        self.line_total = self.quantity * self.unit_price;
    }
}

/// An invoice issued by a profile to a customer. The totals are carried as they were
/// computed by whoever created the invoice, see `recalculate_totals`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Invoice {
    pub id: String,
    pub number: String,
    pub profile_id: String,
    pub customer_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub issue_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
    pub items: Vec<InvoiceItem>,
    pub notes: String,
    pub tax_rate_percent: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub pdf_path: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Default for Invoice {
    fn default() -> Self {
        Invoice {
            id: String::new(),
            number: String::new(),
            profile_id: String::new(),
            customer_id: String::new(),
            issue_date: OffsetDateTime::UNIX_EPOCH,
            due_date: OffsetDateTime::UNIX_EPOCH,
            items: Vec::new(),
            notes: String::new(),
            tax_rate_percent: 0.0,
            subtotal: 0.0,
            tax_amount: 0.0,
            total: 0.0,
            pdf_path: String::new(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

impl Invoice {
    /// Recomputes the subtotal from the line totals of the items, then the tax amount
    /// from the tax rate and finally the total.
    pub fn recalculate_totals(&mut self) {
        self.subtotal = self.items.iter().map(|item| item.line_total).sum();
        self.tax_amount = self.subtotal * (self.tax_rate_percent / 100.0);
        self.total = self.subtotal + self.tax_amount;
    }

    /// Recomputes the line total of every item before recomputing the totals of the invoice.
    pub fn recalculate_items_and_totals(&mut self) {
        self.items.iter_mut().for_each(InvoiceItem::recalculate);
        self.recalculate_totals();
    }

    /// Generates an invoice number of the form `INV-20240131-3F2A9C01B7DE`, made of the issue
    /// date and a random suffix.
    pub fn default_number(issue_date: &OffsetDateTime) -> String {
        format!(
            "INV-{:04}{:02}{:02}-{}",
            issue_date.year(),
            u8::from(issue_date.month()),
            issue_date.day(),
            identifier::short_identifier()
        )
    }

    /// The path where the PDF of the invoice with the given number is written when none was chosen,
    /// which is the `pdf` folder inside the data directory.
    pub fn default_pdf_path(base_directory: &Path, invoice_number: &str) -> PathBuf {
        base_directory
            .join("pdf")
            .join(format!("{}.pdf", invoice_number.to_lowercase()))
    }
}

/// The current local time, or the current UTC time where the local offset cannot be determined.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
