//! Amount and number text handling.

use thiserror::Error;

/// Errors turning scraped text into numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty value")]
    Empty,

    #[error("Not an integer: {0}")]
    NotInteger(String),
}

/// Normalize an accounting-style amount.
///
/// The toll site renders negative amounts in parentheses, e.g. `($4.50)`.
/// Those become `-$4.50`; anything else is returned trimmed.
pub fn normalize_amount(text: &str) -> String {
    let text = text.trim();
    match text.strip_prefix('(') {
        Some(rest) => format!("-{}", rest.trim_end_matches(')')),
        None => text.to_string(),
    }
}

/// Strip accounting parentheses without adding a sign.
pub fn strip_parens(text: &str) -> String {
    text.trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .to_string()
}

/// Parse an integer that may carry thousands separators or whitespace.
pub fn parse_integer(text: &str) -> Result<i64, ParseError> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(ParseError::Empty);
    }

    cleaned
        .parse::<i64>()
        .map_err(|_| ParseError::NotInteger(text.trim().to_string()))
}
