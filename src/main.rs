use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use invoiceio::{
    configuration::Configuration,
    document::{self, InvoiceDocument},
    error::ContextError,
    number::{NumberLocale, NumberParser as _},
    storage::Storage,
};

/// Keeps profiles, customers and invoices as JSON documents and renders the invoices into PDF files.
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct CliArguments {
    /// The JSON configuration file, the defaults are used when it is not given.
    #[arg(short = 'c', long = "configuration", value_name = "json_file")]
    configuration_path: Option<PathBuf>,
    /// The directory of the JSON stores, overriding the one of the configuration.
    #[arg(short = 'd', long = "data", value_name = "directory")]
    data_directory: Option<PathBuf>,
    /// Log everything down to the trace level.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a stored invoice into a PDF file.
    Render {
        #[arg(short = 'i', long = "invoice", value_name = "invoice_id")]
        invoice_id: String,
        #[arg(short = 'o', long = "output", value_name = "file_path")]
        output_file_path: Option<PathBuf>,
    },
    /// Render a JSON document holding a profile, a customer and an invoice into a PDF file.
    RenderDocument {
        #[arg(short = 'D', long = "document", value_name = "json_file")]
        document_path: PathBuf,
        #[arg(short = 'o', long = "output", value_name = "file_path")]
        output_file_path: PathBuf,
    },
    /// Store the profile, the customer and the invoice of a JSON document.
    Import {
        #[arg(short = 'D', long = "document", value_name = "json_file")]
        document_path: PathBuf,
        /// Recompute the line totals and the totals of the invoice before storing it.
        #[arg(long = "recalculate")]
        recalculate: bool,
    },
    /// List the stored records of one kind.
    List {
        #[arg(value_enum)]
        record_kind: RecordKind,
    },
    /// Parse a number as it would be typed in a form and print its canonical value.
    ParseNumber {
        /// The number as it would be typed, negative numbers such as `-12,5` included.
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(short = 'l', long = "locale", value_enum)]
        locale: Option<NumberLocale>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RecordKind {
    Profiles,
    Customers,
    Invoices,
}

fn main() {
    if let Err(error) = fallible_main() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn fallible_main() -> Result<(), ContextError> {
    let arguments = CliArguments::parse();
    env_logger::builder()
        .filter_level(if arguments.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();
    log::debug!("{:?}", arguments);

    let mut configuration = match &arguments.configuration_path {
        Some(configuration_path) => Configuration::from_path(configuration_path)?,
        None => Configuration::default(),
    };
    if let Some(data_directory) = arguments.data_directory {
        configuration.data_directory = data_directory;
    }
    log::debug!("{:?}", configuration);

    match arguments.command {
        Command::Render {
            invoice_id,
            output_file_path,
        } => {
            let mut storage = Storage::new(&configuration.data_directory)?;
            let output_file_path =
                document::render_stored_invoice(&mut storage, &invoice_id, output_file_path)?;
            log::info!(
                "Saved the invoice {} to the path: {:?}",
                invoice_id,
                output_file_path
            );
            Ok(())
        }
        Command::RenderDocument {
            document_path,
            output_file_path,
        } => {
            let document = InvoiceDocument::from_path(&document_path)?;
            document.save_to_pdf_file(&output_file_path)?;
            log::info!("Saved the invoice to the path: {:?}", output_file_path);
            Ok(())
        }
        Command::Import {
            document_path,
            recalculate,
        } => {
            let document = InvoiceDocument::from_path(&document_path)?;
            let mut storage = Storage::new(&configuration.data_directory)?;
            let invoice = storage.import_document(document, recalculate)?;
            log::info!("Imported the invoice {} as {}", invoice.number, invoice.id);
            Ok(())
        }
        Command::List { record_kind } => list_records(&configuration, record_kind),
        Command::ParseNumber { value, locale } => {
            let number_locale = locale.unwrap_or(configuration.number_locale);
            let number = number_locale.parse_float(&value)?;
            println!("{number}");
            Ok(())
        }
    }
}

fn list_records(configuration: &Configuration, record_kind: RecordKind) -> Result<(), ContextError> {
    let storage = Storage::new(&configuration.data_directory)?;
    match record_kind {
        RecordKind::Profiles => {
            for profile in storage.list_profiles() {
                println!("{} | {} | {}", profile.id, profile.display_name, profile.company_name);
            }
        }
        RecordKind::Customers => {
            for customer in storage.list_customers() {
                println!("{} | {} | {}", customer.id, customer.display_name, customer.contact_name);
            }
        }
        RecordKind::Invoices => {
            for invoice in storage.list_invoices() {
                // A customer deleted after the invoice was issued is shown by its identifier
                let customer_label = match storage.get_customer(&invoice.customer_id) {
                    Ok(customer) => customer.display_name,
                    Err(error) if error.is_not_found() => invoice.customer_id.clone(),
                    Err(error) => return Err(error),
                };
                println!(
                    "{} | {} | {} | Total {:.2}",
                    invoice.id, invoice.number, customer_label, invoice.total
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_negative_values() {
        let arguments =
            CliArguments::try_parse_from(["invoiceio", "parse-number", "-12,5"]).unwrap();
        match arguments.command {
            Command::ParseNumber { value, locale } => {
                assert_eq!(value, "-12,5");
                assert_eq!(locale, None);
                assert_eq!(NumberLocale::European.parse_float(&value).unwrap(), -12.5);
            }
            command => panic!("Unexpected command {:?}", command),
        }
    }

    #[test]
    fn parse_number_keeps_the_locale_option() {
        let arguments = CliArguments::try_parse_from([
            "invoiceio",
            "parse-number",
            "--locale",
            "english",
            "-1,234.5",
        ])
        .unwrap();
        assert!(matches!(
            arguments.command,
            Command::ParseNumber {
                locale: Some(NumberLocale::English),
                ..
            }
        ));
    }
}
