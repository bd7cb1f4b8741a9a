//! InvoiceIO keeps issuer profiles, customers and invoices as JSON documents on disk and
//! renders each invoice into a single-page PDF file.
//!
//! The PDF files are written from scratch by this crate: the invoice is laid out into rows of
//! monospaced text, the rows are drawn by a content stream and the content stream is wrapped into
//! the smallest object graph a PDF reader accepts. The entry point for all of this is
//! `document::render_invoice_pdf`.

/// The module where human-entered numbers are parsed.
///
/// # Introduction
///
/// Numbers typed by people come in different regional conventions, such as `1.234,56` or `1,234.56`.
/// The `NumberParser` trait abstracts the convention, while `EuropeanNumberParser` and `EnglishNumberParser`
/// implement the two supported ones. The strategy is always passed explicitly to whoever parses,
/// usually through the `NumberLocale` stored in the `Configuration`.
pub mod number;

/// The profiles, customers and invoices, as they are stored in the JSON documents.
pub mod models;

/// The module where an invoice is turned into the rows of text of the printed document.
///
/// Every row is a plain string of a fixed-width layout: the item table relies on the font being monospaced
/// for its columns to line up. Escaping the rows for the PDF format is not done here but in the `pdf` module.
pub mod layouting;

/// The module where the PDF documents are written.
///
/// # Introduction
///
/// The documents are always made of one A4 page whose text is drawn with the standard Courier font,
/// which PDF readers are required to provide, so that no font needs to be embedded. The function `content_stream`
/// converts the rows of text into the drawing operations of the page, and `assemble_single_page_pdf` wraps them into
/// the five objects of the document (see `PdfObject`), followed by the cross-reference table and the trailer.
///
/// There is no pagination: rows which do not fit on the page are drawn below its lower edge.
pub mod pdf;

/// The module where the invoices are rendered into PDF files on disk.
///
/// The function `render_invoice_pdf` is the one most callers need, while `InvoiceDocument` allows to render an invoice
/// stored as a single JSON document together with its issuer and recipient.
pub mod document;

/// The JSON stores of the profiles, the customers and the invoices.
pub mod storage;

/// Random identifiers for the records and the invoice numbers.
pub mod identifier;

/// The configuration file of the application.
pub mod configuration;

/// This module contains the `ContextError` type which is the error type used throughout this library.
///
/// The `ContextError` type carries an explanation of what was being done, the propagated error which made it fail (if any)
/// and an `ErrorKind`, so that for example a record missing from the store can be told apart from a failed write.
/// Numbers which cannot be parsed are reported through the more specific `NumberParseError` of the `number` module,
/// which converts into a `ContextError` when it needs to cross into the rest of the library.
pub mod error;

#[cfg(test)]
mod test;
