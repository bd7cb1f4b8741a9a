#![deny(clippy::unwrap_used, clippy::expect_used)]

use serde::{Deserialize, Serialize};

/// The characters which are used to group thousands and are removed before any other processing,
/// which are the plain space, the no-break space and the apostrophe.
const GROUPING_CHARACTERS: [char; 3] = [' ', '\u{00A0}', '\''];

/// The ways in which a human-entered number can fail to be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumberParseError {
    #[error("Multiple decimal separators")]
    MultipleDecimalSeparators,
    #[error("Invalid numeric character {0:?}")]
    InvalidCharacter(char),
    #[error("Malformed number {normalized:?}: {reason}")]
    Malformed { normalized: String, reason: String },
}

/// A strategy for turning a human-entered decimal number into a floating point value.
/// Implementations are passed explicitly wherever numbers are parsed, so that switching
/// the strategy never affects numbers parsed elsewhere.
pub trait NumberParser {
    fn parse_float(&self, input: &str) -> Result<f64, NumberParseError>;
}

/// Accepts the common continental European formats and falls back to the dot for
/// input which contains no comma at all:
///
/// * `1.234,56` becomes `1234.56`
/// * `1 234,56` becomes `1234.56`
/// * `1234,56` becomes `1234.56`
/// * `1234.56` becomes `1234.56`
#[derive(Debug, Clone, Copy, Default)]
pub struct EuropeanNumberParser;

impl NumberParser for EuropeanNumberParser {
    fn parse_float(&self, input: &str) -> Result<f64, NumberParseError> {
        // A comma anywhere means the comma is the decimal separator and the dots are thousands separators
        let decimal_separator = if input.contains(',') { ',' } else { '.' };
        parse_with_decimal_separator(input, decimal_separator)
    }
}

/// Treats the dot as the decimal separator and the comma as a thousands separator,
/// regardless of which characters are present, e.g. `1,234.56` becomes `1234.56`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishNumberParser;

impl NumberParser for EnglishNumberParser {
    fn parse_float(&self, input: &str) -> Result<f64, NumberParseError> {
        parse_with_decimal_separator(input, '.')
    }
}

/// The selectable number conventions, usable directly as a `NumberParser`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum NumberLocale {
    #[default]
    European,
    English,
}

impl NumberParser for NumberLocale {
    fn parse_float(&self, input: &str) -> Result<f64, NumberParseError> {
        match self {
            NumberLocale::European => EuropeanNumberParser.parse_float(input),
            NumberLocale::English => EnglishNumberParser.parse_float(input),
        }
    }
}

/// Parses the input with the European convention, this is the default strategy.
pub fn parse_float(input: &str) -> Result<f64, NumberParseError> {
    EuropeanNumberParser.parse_float(input)
}

fn parse_with_decimal_separator(
    input: &str,
    decimal_separator: char,
) -> Result<f64, NumberParseError> {
    let normalized_number = normalize_number(input, decimal_separator)?;
    normalized_number
        .parse::<f64>()
        .map_err(|error| NumberParseError::Malformed {
            normalized: normalized_number.clone(),
            reason: error.to_string(),
        })
}

/// Rewrites the input into a plain ASCII floating point literal, where the only separator left
/// is a single dot standing for the decimal separator.
///
/// # Arguments
///
/// * `input` - The number as it was typed, possibly surrounded by whitespace.
/// * `decimal_separator` - Either `,` or `.`, the other one of the two is dropped as a grouping mark.
fn normalize_number(input: &str, decimal_separator: char) -> Result<String, NumberParseError> {
    let value = input.trim();
    if value.is_empty() {
        return Ok("0".into());
    }

    let (sign, value) = if let Some(unsigned_value) = value.strip_prefix('+') {
        ("", unsigned_value)
    } else if let Some(unsigned_value) = value.strip_prefix('-') {
        ("-", unsigned_value)
    } else {
        ("", value)
    };

    let value: String = value
        .chars()
        .filter(|character| !GROUPING_CHARACTERS.contains(character))
        .collect();

    let mut normalized_number = String::with_capacity(value.len() + 1);
    normalized_number.push_str(sign);
    let mut has_digits_or_separator = false;
    let mut decimal_separator_seen = false;
    for character in value.chars() {
        match character {
            '0'..='9' => normalized_number.push(character),
            ',' | '.' if character == decimal_separator => {
                if decimal_separator_seen {
                    return Err(NumberParseError::MultipleDecimalSeparators);
                }
                normalized_number.push('.');
                decimal_separator_seen = true;
            }
            // The other separator groups thousands
            ',' | '.' => continue,
            _ => return Err(NumberParseError::InvalidCharacter(character)),
        }
        has_digits_or_separator = true;
    }

    if !has_digits_or_separator {
        return Ok("0".into());
    }

    Ok(normalized_number)
}
