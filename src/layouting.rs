#![deny(clippy::unwrap_used, clippy::expect_used)]

use time::OffsetDateTime;
use unicode_normalization::UnicodeNormalization as _;

use crate::models::{Customer, Invoice, Profile};

/// Width of the description column, and of the label column of the totals.
pub const DESCRIPTION_COLUMN_WIDTH: usize = 40;
/// Length of the rule separating the item table from the rest of the invoice.
pub const SEPARATOR_RULE_LENGTH: usize = 70;

const SECTION_BILL_TO: &str = "Bill to";
const SECTION_ITEMS: &str = "Items";
const SECTION_NOTES: &str = "Notes";
const SECTION_PAYMENT_DETAILS: &str = "Payment details";

const COLUMN_DESCRIPTION: &str = "Description";
const COLUMN_QUANTITY: &str = "Qty";
const COLUMN_UNIT_PRICE: &str = "Unit";
const COLUMN_LINE_TOTAL: &str = "Line total";

const LABEL_SUBTOTAL: &str = "Subtotal";
const LABEL_TAX: &str = "Tax";
const LABEL_TOTAL: &str = "Total";

/// Turns the invoice, together with its issuer and recipient, into the rows of text which
/// make up the printed document, in reading order. Every row is trimmed and blank rows carry
/// a single space, but nothing is escaped: the rows are plain text.
///
/// # Arguments
///
/// * `profile` - The issuer, printed at the top and in the payment details.
/// * `customer` - The recipient, printed in the "bill to" block.
/// * `invoice` - The invoice, whose totals are printed as they are without being recomputed.
/// * `generated_at` - The moment the document is generated, printed among the invoice metadata.
pub fn invoice_lines(
    profile: &Profile,
    customer: &Customer,
    invoice: &Invoice,
    generated_at: &OffsetDateTime,
) -> Vec<String> {
    // Issuer block
    let mut lines = vec![
        profile.display_name.trim().to_string(),
        profile.company_name.trim().to_string(),
        profile.address_line1.trim().to_string(),
        profile.address_line2.trim().to_string(),
        format!("{} {}", profile.postal_code.trim(), profile.city.trim()),
        profile.country.trim().to_string(),
        format!("Email: {}", profile.email.trim()),
        format!("Phone: {}", profile.phone.trim()),
        format!("Tax ID: {}", profile.tax_id.trim()),
        String::new(),
    ];

    // Invoice metadata
    lines.extend([
        format!("Invoice number: {}", invoice.number),
        format!("Issued on: {}", format_date(&invoice.issue_date)),
        format!("Due date: {}", format_date(&invoice.due_date)),
        format!("Generated on: {}", format_date_time(generated_at)),
        String::new(),
    ]);

    // Recipient block
    lines.extend([
        SECTION_BILL_TO.to_string(),
        customer.display_name.trim().to_string(),
        customer.contact_name.trim().to_string(),
        customer.address_line1.trim().to_string(),
        customer.address_line2.trim().to_string(),
        format!("{} {}", customer.postal_code.trim(), customer.city.trim()),
        customer.country.trim().to_string(),
        format!("Email: {}", customer.email.trim()),
        format!("Phone: {}", customer.phone.trim()),
        String::new(),
    ]);

    // Item table
    lines.push(SECTION_ITEMS.to_string());
    lines.push(format!(
        "{:<width$} {:>6} {:>10} {:>12}",
        COLUMN_DESCRIPTION,
        COLUMN_QUANTITY,
        COLUMN_UNIT_PRICE,
        COLUMN_LINE_TOTAL,
        width = DESCRIPTION_COLUMN_WIDTH
    ));
    lines.push(separator_rule());
    for item in invoice.items.iter() {
        lines.push(format!(
            "{:<width$} {:>6.2} {:>10.2} {:>12.2}",
            item.description,
            item.quantity,
            item.unit_price,
            item.line_total,
            width = DESCRIPTION_COLUMN_WIDTH
        ));
    }
    lines.push(separator_rule());

    // Totals, right-aligned in fixed-width fields
    lines.push(format!(
        "{:<width$} {:>28.2}",
        LABEL_SUBTOTAL,
        invoice.subtotal,
        width = DESCRIPTION_COLUMN_WIDTH
    ));
    lines.push(format!(
        "{:<width$} {:>27.2} ({:.2}%)",
        LABEL_TAX,
        invoice.tax_amount,
        invoice.tax_rate_percent,
        width = DESCRIPTION_COLUMN_WIDTH
    ));
    lines.push(format!(
        "{:<width$} {:>28.2}",
        LABEL_TOTAL,
        invoice.total,
        width = DESCRIPTION_COLUMN_WIDTH
    ));

    if !invoice.notes.trim().is_empty() {
        lines.push(String::new());
        lines.push(SECTION_NOTES.to_string());
        lines.extend(invoice.notes.split('\n').map(str::to_string));
    }

    // Only the payment details which have been filled in are printed
    let payment_details = &profile.payment_details;
    lines.push(String::new());
    lines.push(SECTION_PAYMENT_DETAILS.to_string());
    for (label, value) in [
        ("Bank", &payment_details.bank_name),
        ("IBAN", &payment_details.iban),
        ("BIC", &payment_details.bic),
        ("Terms", &payment_details.payment_terms),
    ] {
        if !value.is_empty() {
            lines.push(format!("{label}: {value}"));
        }
    }

    sanitize_lines(lines)
}

/// Trims every line and normalizes it in the NFC form, replacing the lines left empty with a
/// single space so that no text-showing operation ends up with an empty string.
pub fn sanitize_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| {
            let line = line.trim();
            if line.is_empty() {
                " ".to_string()
            } else {
                line.nfc().collect()
            }
        })
        .collect()
}

fn separator_rule() -> String {
    "-".repeat(SEPARATOR_RULE_LENGTH)
}

/// Formats a date as `2024-01-31`.
fn format_date(date: &OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Formats a moment as `2024-01-31 09:05`.
fn format_date_time(date: &OffsetDateTime) -> String {
    format!(
        "{} {:02}:{:02}",
        format_date(date),
        date.hour(),
        date.minute()
    )
}
