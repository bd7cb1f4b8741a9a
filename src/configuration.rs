use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ContextError, ErrorKind},
    number::NumberLocale,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// The directory holding the JSON stores and, by default, the generated PDF files.
    pub data_directory: PathBuf,
    /// The convention used whenever a number typed by the user is parsed.
    pub number_locale: NumberLocale,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            data_directory: PathBuf::from("data"),
            number_locale: NumberLocale::default(),
        }
    }
}

impl Configuration {
    pub fn from_path(configuration_file_path: &Path) -> Result<Self, ContextError> {
        let configuration_file_contents = std::fs::read_to_string(configuration_file_path)
            .map_err(|error| {
                ContextError::with_error(
                    ErrorKind::Io,
                    format!(
                        "Failed to read the configuration file {:?}",
                        configuration_file_path
                    ),
                    &error,
                )
            })?;
        let configuration: Configuration = serde_json::from_str(&configuration_file_contents)
            .map_err(|error| {
                ContextError::with_error(
                    ErrorKind::Serialization,
                    format!(
                        "Failed to parse the configuration file {:?}",
                        configuration_file_path
                    ),
                    &error,
                )
            })?;

        Ok(configuration)
    }
}
