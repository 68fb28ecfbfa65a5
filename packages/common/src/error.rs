use thiserror::Error;

/// Errors produced by the domain core.
///
/// All of these are validation failures: the operation aborts as a whole and
/// nothing is partially applied. The service layer maps them to its
/// `VALIDATION_ERROR` response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A date string that is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// A quantity field that is not a non-negative integer.
    #[error("invalid quantity '{value}': expected a non-negative integer")]
    InvalidQuantity { value: String },

    /// A status field that is not one of the four bucket labels.
    #[error("invalid status '{value}': expected EXPIRED, URGENT, WARNING or SAFE")]
    InvalidStatus { value: String },

    /// CSV input without a header row.
    #[error("CSV input is missing a header row")]
    CsvMissingHeader,

    /// A CSV data row whose field count does not match the header.
    #[error("CSV row {row} has {found} fields, expected {expected}")]
    CsvRowShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A CSV field with a quote character outside a quoted section.
    #[error("CSV row {row} has a malformed quoted field")]
    CsvMalformedQuote { row: usize },
}
