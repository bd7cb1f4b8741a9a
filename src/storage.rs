use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use time::format_description::well_known::Rfc3339;

use crate::{
    document::InvoiceDocument,
    error::{ContextError, ErrorKind},
    identifier,
    models::{now, Customer, Invoice, Profile},
};

/// A JSON file holding an object which maps the identifier of each record to the record.
/// The whole file is kept in memory and written again after every change.
#[derive(Debug)]
pub struct JsonStore<T> {
    file_path: PathBuf,
    records: BTreeMap<String, T>,
}

impl<T: Serialize + DeserializeOwned + Clone> JsonStore<T> {
    /// Opens the store at the given path, starting from an empty store if the file does not exist yet.
    pub fn open(file_path: PathBuf) -> Result<Self, ContextError> {
        if !file_path.exists() {
            log::debug!("Starting an empty store at {:?}", file_path);
            return Ok(JsonStore {
                file_path,
                records: BTreeMap::new(),
            });
        }

        let store_contents = std::fs::read_to_string(&file_path).map_err(|error| {
            ContextError::with_error(
                ErrorKind::Io,
                format!("Unable to read the store {:?}", file_path),
                &error,
            )
        })?;
        // A file left empty is treated as an empty store
        let records = if store_contents.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&store_contents).map_err(|error| {
                ContextError::with_error(
                    ErrorKind::Serialization,
                    format!("Unable to parse the store {:?}", file_path),
                    &error,
                )
            })?
        };
        log::debug!("Loaded {} records from {:?}", records.len(), file_path);

        Ok(JsonStore { file_path, records })
    }

    pub fn get(&self, key: &str) -> Result<T, ContextError> {
        self.records.get(key).cloned().ok_or_else(|| {
            ContextError::with_context(
                ErrorKind::NotFound,
                format!("Unable to find the record {:?} in {:?}", key, self.file_path),
            )
        })
    }

    /// Inserts or replaces the record under the given key and persists the store.
    pub fn set(&mut self, key: &str, value: T) -> Result<(), ContextError> {
        self.records.insert(key.to_string(), value);
        self.persist()
    }

    /// Removes the record under the given key and persists the store.
    pub fn delete(&mut self, key: &str) -> Result<(), ContextError> {
        if self.records.remove(key).is_none() {
            return Err(ContextError::with_context(
                ErrorKind::NotFound,
                format!("Unable to find the record {:?} in {:?}", key, self.file_path),
            ));
        }
        self.persist()
    }

    /// The identifiers of all the records, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }

    /// All the records in the order of their identifiers.
    pub fn values(&self) -> Vec<T> {
        self.records.values().cloned().collect()
    }

    /// Writes the store to a temporary file next to it, then moves it in place so that
    /// an interrupted write never leaves a truncated store behind.
    fn persist(&self) -> Result<(), ContextError> {
        let store_contents = serde_json::to_vec_pretty(&self.records).map_err(|error| {
            ContextError::with_error(
                ErrorKind::Serialization,
                format!("Unable to serialize the store {:?}", self.file_path),
                &error,
            )
        })?;
        let temporary_file_path = self.file_path.with_extension("json.swp");
        std::fs::write(&temporary_file_path, store_contents).map_err(|error| {
            ContextError::with_error(
                ErrorKind::Io,
                format!("Unable to write the store {:?}", temporary_file_path),
                &error,
            )
        })?;
        std::fs::rename(&temporary_file_path, &self.file_path).map_err(|error| {
            ContextError::with_error(
                ErrorKind::Io,
                format!("Unable to replace the store {:?}", self.file_path),
                &error,
            )
        })?;
        log::debug!(
            "Saved {} records to {:?}",
            self.records.len(),
            self.file_path
        );

        Ok(())
    }
}

/// The three stores of the application, kept together inside one directory.
#[derive(Debug)]
pub struct Storage {
    base_directory: PathBuf,
    profiles: JsonStore<Profile>,
    customers: JsonStore<Customer>,
    invoices: JsonStore<Invoice>,
}

impl Storage {
    /// Opens the stores inside the given directory, creating the directory if needed.
    pub fn new(base_directory: &Path) -> Result<Self, ContextError> {
        if base_directory.as_os_str().is_empty() {
            return Err(ContextError::with_context(
                ErrorKind::Validation,
                "The base directory of the storage is required",
            ));
        }
        std::fs::create_dir_all(base_directory).map_err(|error| {
            ContextError::with_error(
                ErrorKind::Io,
                format!("Unable to create the base directory {:?}", base_directory),
                &error,
            )
        })?;

        Ok(Storage {
            base_directory: base_directory.to_path_buf(),
            profiles: JsonStore::open(base_directory.join("profiles.json"))?,
            customers: JsonStore::open(base_directory.join("customers.json"))?,
            invoices: JsonStore::open(base_directory.join("invoices.json"))?,
        })
    }

    /// The directory which contains the JSON files.
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Stores the profile, which must have a display name.
    pub fn save_profile(&mut self, mut profile: Profile) -> Result<(), ContextError> {
        require_display_name("profile", &profile.display_name)?;
        profile.updated_at = now();
        let key = profile.id.clone();
        self.profiles.set(&key, profile)
    }

    pub fn get_profile(&self, id: &str) -> Result<Profile, ContextError> {
        self.profiles.get(id)
    }

    pub fn delete_profile(&mut self, id: &str) -> Result<(), ContextError> {
        self.profiles.delete(id)
    }

    /// All the profiles, sorted by their display name.
    pub fn list_profiles(&self) -> Vec<Profile> {
        sorted_by_key(self.profiles.values(), |profile| {
            profile.display_name.clone()
        })
    }

    /// Stores the customer, which must have a display name.
    pub fn save_customer(&mut self, mut customer: Customer) -> Result<(), ContextError> {
        require_display_name("customer", &customer.display_name)?;
        customer.updated_at = now();
        let key = customer.id.clone();
        self.customers.set(&key, customer)
    }

    pub fn get_customer(&self, id: &str) -> Result<Customer, ContextError> {
        self.customers.get(id)
    }

    pub fn delete_customer(&mut self, id: &str) -> Result<(), ContextError> {
        self.customers.delete(id)
    }

    /// All the customers, sorted by their display name.
    pub fn list_customers(&self) -> Vec<Customer> {
        sorted_by_key(self.customers.values(), |customer| {
            customer.display_name.clone()
        })
    }

    pub fn save_invoice(&mut self, mut invoice: Invoice) -> Result<(), ContextError> {
        invoice.updated_at = now();
        let key = invoice.id.clone();
        self.invoices.set(&key, invoice)
    }

    pub fn get_invoice(&self, id: &str) -> Result<Invoice, ContextError> {
        self.invoices.get(id)
    }

    pub fn delete_invoice(&mut self, id: &str) -> Result<(), ContextError> {
        self.invoices.delete(id)
    }

    /// All the invoices, sorted by issue date and then by number.
    pub fn list_invoices(&self) -> Vec<Invoice> {
        sorted_by_key(self.invoices.values(), invoice_sort_key)
    }

    /// Stores the three records of the document and returns the stored invoice.
    ///
    /// The records without an identifier get a new one, the invoice gets a number and a PDF path
    /// when they are missing, and it is linked to the profile and the customer of the document.
    /// Nothing is stored unless both the profile and the customer have a display name.
    ///
    /// # Arguments
    ///
    /// * `document` - The profile, the customer and the invoice to store.
    /// * `recalculate` - Whether the line totals and the totals of the invoice are recomputed
    ///   instead of being stored as they are.
    pub fn import_document(
        &mut self,
        document: InvoiceDocument,
        recalculate: bool,
    ) -> Result<Invoice, ContextError> {
        let InvoiceDocument {
            mut profile,
            mut customer,
            mut invoice,
        } = document;
        require_display_name("profile", &profile.display_name)?;
        require_display_name("customer", &customer.display_name)?;

        let now = now();
        if profile.id.is_empty() {
            profile.id = identifier::new_identifier();
            profile.created_at = now;
        }
        if customer.id.is_empty() {
            customer.id = identifier::new_identifier();
            customer.created_at = now;
        }
        if invoice.id.is_empty() {
            invoice.id = identifier::new_identifier();
            invoice.created_at = now;
        }
        if invoice.number.is_empty() {
            invoice.number = Invoice::default_number(&invoice.issue_date);
        }
        if invoice.pdf_path.is_empty() {
            invoice.pdf_path = Invoice::default_pdf_path(&self.base_directory, &invoice.number)
                .to_string_lossy()
                .into_owned();
        }
        invoice.profile_id = profile.id.clone();
        invoice.customer_id = customer.id.clone();
        if recalculate {
            invoice.recalculate_items_and_totals();
        }

        self.save_profile(profile)?;
        self.save_customer(customer)?;
        self.save_invoice(invoice.clone())?;
        log::debug!("Imported the invoice {:?} as {}", invoice.number, invoice.id);

        Ok(invoice)
    }

    /// The path where the stored invoice is rendered: the chosen path if any, else the path stored
    /// with the invoice, else the default path, which is then stored with the invoice.
    pub fn resolve_pdf_path(
        &mut self,
        invoice: &mut Invoice,
        output_path: Option<PathBuf>,
    ) -> Result<PathBuf, ContextError> {
        if let Some(output_path) = output_path {
            return Ok(output_path);
        }
        if !invoice.pdf_path.is_empty() {
            return Ok(PathBuf::from(&invoice.pdf_path));
        }

        let default_pdf_path = Invoice::default_pdf_path(&self.base_directory, &invoice.number);
        invoice.pdf_path = default_pdf_path.to_string_lossy().into_owned();
        self.save_invoice(invoice.clone())?;

        Ok(default_pdf_path)
    }
}

fn require_display_name(record_kind: &str, display_name: &str) -> Result<(), ContextError> {
    if display_name.trim().is_empty() {
        return Err(ContextError::with_context(
            ErrorKind::Validation,
            format!("The display name of the {} is required", record_kind),
        ));
    }

    Ok(())
}

/// The issue date in whole seconds followed by the number, so that the fractional seconds
/// of a date never change the order.
fn invoice_sort_key(invoice: &Invoice) -> String {
    let issue_date = invoice
        .issue_date
        .replace_nanosecond(0)
        .ok()
        .and_then(|issue_date| issue_date.format(&Rfc3339).ok());
    match issue_date {
        Some(issue_date) => format!("{}-{}", issue_date, invoice.number),
        None => {
            log::warn!(
                "The issue date of the invoice {:?} cannot be formatted, it is listed first",
                invoice.number
            );
            format!("-{}", invoice.number)
        }
    }
}

/// Stable sort, so that records with the same key keep the order of their identifiers.
fn sorted_by_key<T, F: Fn(&T) -> String>(mut records: Vec<T>, sort_key: F) -> Vec<T> {
    records.sort_by_cached_key(|record| sort_key(record));
    records
}
