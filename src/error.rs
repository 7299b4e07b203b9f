/// Custom Result type for strata operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the strata library, encompassing all possible error cases
/// that can occur while building or analysing strata histograms.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Caller contract violations on a histogram
    CounterError(#[from] CounterError),
    /// Errors from parsing the textual counters form
    ParseError(#[from] ParseError),
    /// Generic errors that can occur in any part of the system
    AnyhowError(#[from] anyhow::Error),
}

/// Precondition violations when analysing a strata histogram.
///
/// These always indicate a bug in the caller and are distinct from a read that
/// simply has no matching strata.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CounterError {
    /// The histogram has no strata at all
    ///
    /// An unmapped read is represented by all-zero counts, never by an empty histogram.
    #[error("Strata histogram is empty")]
    EmptyHistogram,

    /// The starting strata of a scan lies outside the histogram
    ///
    /// # Fields
    /// * `begin` - The requested starting strata
    /// * `len` - The number of strata in the histogram
    #[error("Begin strata ({begin}) is out of strata range ({len})")]
    StrataOutOfRange { begin: usize, len: usize },
}

/// Errors that can occur while parsing colon-separated counters
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// No counters were provided
    #[error("Empty counters string")]
    EmptyInput,

    /// A field is not a decimal count
    ///
    /// # Arguments
    /// * `String` - The offending field
    #[error("Invalid strata count: {0:?}")]
    InvalidCount(String),
}
