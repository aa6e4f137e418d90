use thiserror::Error;

/// Malformed user input to a slash command.
///
/// The `Display` text is shown to the invoking user as-is, so it is phrased as an
/// instruction rather than a diagnostic.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The `amount` option was absent or empty.
    #[error("Please provide how many messages to delete, or \"all\".")]
    MissingAmount,

    /// The `amount` option was neither `all` nor a positive integer.
    #[error("Please provide a valid number greater than 0, or type \"all\".")]
    InvalidAmount(String),
}
