use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

use crate::{
    error::{ContextError, ErrorKind},
    layouting, models,
    models::{Customer, Invoice, Profile},
    pdf,
    storage::Storage,
};

/// An invoice together with its issuer and recipient, as a single self-contained JSON document
/// which can be rendered without opening the stores.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvoiceDocument {
    pub profile: Profile,
    pub customer: Customer,
    pub invoice: Invoice,
}

impl InvoiceDocument {
    pub fn from_path(document_path: &Path) -> Result<InvoiceDocument, ContextError> {
        let document_content = std::fs::read_to_string(document_path).map_err(|error| {
            ContextError::with_error(
                ErrorKind::Io,
                format!("Unable to read the document {:?}", document_path),
                &error,
            )
        })?;
        let document: InvoiceDocument =
            serde_json::from_str(&document_content).map_err(|error| {
                ContextError::with_error(
                    ErrorKind::Serialization,
                    format!("Unable to parse the document {:?}", document_path),
                    &error,
                )
            })?;

        Ok(document)
    }

    /// Renders the document into a PDF file at the given path, see `render_invoice_pdf`.
    pub fn save_to_pdf_file(&self, output_path: &Path) -> Result<(), ContextError> {
        render_invoice_pdf(output_path, &self.profile, &self.customer, &self.invoice)
    }
}

/// Produces the bytes of the PDF file of the invoice, without touching the disk.
///
/// The invoice is laid out into lines of text, the lines are drawn by a content stream
/// and the content stream is wrapped into a single-page document.
pub fn invoice_pdf_bytes(
    profile: &Profile,
    customer: &Customer,
    invoice: &Invoice,
    generated_at: &OffsetDateTime,
) -> Vec<u8> {
    let lines = layouting::invoice_lines(profile, customer, invoice, generated_at);
    if lines.len() > pdf::visible_lines_per_page() {
        log::warn!(
            "The invoice {:?} has {} lines but only {} fit on the page, the rest is drawn outside of it",
            invoice.number,
            lines.len(),
            pdf::visible_lines_per_page()
        );
    }
    let content_stream = pdf::content_stream(&lines);

    pdf::assemble_single_page_pdf(&content_stream)
}

/// Renders the invoice into a PDF file at the given path, stamping it with the current time.
/// The directory of the file is created if it does not exist yet.
///
/// # Arguments
///
/// * `output_path` - The path of the PDF file, which is overwritten if it already exists.
/// * `profile` - The issuer of the invoice.
/// * `customer` - The recipient of the invoice.
/// * `invoice` - The invoice, with its totals already computed.
pub fn render_invoice_pdf(
    output_path: &Path,
    profile: &Profile,
    customer: &Customer,
    invoice: &Invoice,
) -> Result<(), ContextError> {
    render_invoice_pdf_at(output_path, profile, customer, invoice, &models::now())
}

/// Same as `render_invoice_pdf`, but with an explicit generation time so that the output
/// only depends on the inputs.
pub fn render_invoice_pdf_at(
    output_path: &Path,
    profile: &Profile,
    customer: &Customer,
    invoice: &Invoice,
    generated_at: &OffsetDateTime,
) -> Result<(), ContextError> {
    if let Some(output_directory) = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(output_directory).map_err(|error| {
            ContextError::with_error(
                ErrorKind::Io,
                format!("Unable to create the directory {:?}", output_directory),
                &error,
            )
        })?;
    }

    let pdf_document_bytes = invoice_pdf_bytes(profile, customer, invoice, generated_at);
    std::fs::write(output_path, &pdf_document_bytes).map_err(|error| {
        ContextError::with_error(
            ErrorKind::Io,
            format!("Unable to write the PDF file {:?}", output_path),
            &error,
        )
    })?;
    log::debug!(
        "Wrote {} bytes of the invoice {:?} to {:?}",
        pdf_document_bytes.len(),
        invoice.number,
        output_path
    );

    Ok(())
}

/// Renders a stored invoice together with its stored profile and customer, and returns the path
/// of the PDF file. The path is chosen by `Storage::resolve_pdf_path`.
pub fn render_stored_invoice(
    storage: &mut Storage,
    invoice_id: &str,
    output_path: Option<PathBuf>,
) -> Result<PathBuf, ContextError> {
    let mut invoice = storage.get_invoice(invoice_id)?;
    let profile = storage.get_profile(&invoice.profile_id)?;
    let customer = storage.get_customer(&invoice.customer_id)?;

    let output_path = storage.resolve_pdf_path(&mut invoice, output_path)?;
    render_invoice_pdf(&output_path, &profile, &customer, &invoice)?;

    Ok(output_path)
}
