use thiserror::Error;

/// Convenience result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Error type returned when reading from or writing into an [`crate::event::Event`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The requested key does not exist in the event.
    #[error("key not found: '{path}'")]
    KeyNotFound { path: String },

    /// A dotted path ran through a value that is not an object.
    ///
    /// Reported for both lookups and writes: the `segment` names the path
    /// component whose value blocked traversal.
    #[error("path '{path}' is blocked at segment '{segment}': value is not an object")]
    NotAnObject { path: String, segment: String },
}

/// Error type returned by decoder construction and [`crate::decode_csv::DecodeCsvFields::run`].
///
/// This is a single error enum shared across configuration validation, CSV
/// parsing, and event reads/writes.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Invalid, missing, or unknown configuration at construction time.
    ///
    /// Never returned per-event: a constructed decoder is always valid.
    #[error("invalid decode_csv_fields configuration: {message}")]
    Config { message: String },

    /// The source text is malformed per CSV quoting rules (e.g. an
    /// unterminated quoted field).
    #[error("malformed csv: {message}")]
    Parse { message: String },

    /// The parsed column count differs from the configured header length.
    #[error("expected {expected} csv fields, got {actual}")]
    FieldCountMismatch { expected: usize, actual: usize },

    /// An event read or write failed (e.g. a dotted path blocked by a scalar).
    #[error(transparent)]
    Event(#[from] EventError),
}
