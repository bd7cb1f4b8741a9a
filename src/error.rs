#![deny(clippy::unwrap_used, clippy::expect_used)]

use serde::{Deserialize, Serialize};

use crate::number::NumberParseError;

/// The broad category of a `ContextError`, used by callers that need to react differently
/// to a missing record than to a failed disk write.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Reading, writing or creating files and directories.
    Io,
    /// User-entered numeric input that could not be understood.
    Parse,
    /// Encoding or decoding of JSON documents.
    Serialization,
    /// A record that was asked for is not in the store.
    NotFound,
    /// Input that is well-formed but not acceptable.
    Validation,
}

/// A struct that represents an error with a context and possibly the propagated source error.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContextError {
    pub kind: ErrorKind,
    pub context: String,
    pub source_error: Option<String>,
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source_error {
            Some(source_error) => write!(
                formatter,
                "{}: {}",
                self.context,
                minimize_first_letter(source_error.to_string()),
            ),
            None => write!(formatter, "{}", self.context),
        }
    }
}

impl std::error::Error for ContextError {}

impl ContextError {
    /// Create a new `ContextError` of the given kind with the given context.
    pub fn with_context<S: Into<String>>(kind: ErrorKind, context: S) -> ContextError {
        ContextError {
            kind,
            context: context.into(),
            source_error: None,
        }
    }

    /// Create a new `ContextError` of the given kind with the given context and source error.
    pub fn with_error<S: Into<String>>(
        kind: ErrorKind,
        context: S,
        error: &dyn std::error::Error,
    ) -> ContextError {
        ContextError {
            kind,
            context: context.into(),
            source_error: Some(error.to_string()),
        }
    }

    /// Whether the error reports a record missing from the store.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl From<NumberParseError> for ContextError {
    fn from(error: NumberParseError) -> Self {
        ContextError::with_error(ErrorKind::Parse, "Unable to parse the number", &error)
    }
}

/// Minimizes the first letter of a string, it is used for standardizing the error message.
pub(crate) fn minimize_first_letter(string: String) -> String {
    let mut characters = string.chars();
    match characters.next() {
        None => String::new(),
        Some(character) => character.to_lowercase().chain(characters).collect(),
    }
}
