use thiserror::Error;

/// Rejected edits. None of these end the session; they are shown to the user.
#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("Invalid {field}: '{input}' is not a number")]
    InvalidNumber { field: &'static str, input: String },

    #[error("No line item at row {} (invoice has {len})", .index + 1)]
    NoSuchItem { index: usize, len: usize },

    #[error("Invoice number must not be empty")]
    EmptyNumber,

    #[error("Amount too large: the invoice totals would exceed the supported range")]
    AmountTooLarge,
}
