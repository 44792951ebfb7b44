use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Builder errors
    #[error("{segment} length is {actual} and should be {expected}")]
    LengthMismatch {
        segment: String,
        expected: usize,
        actual: usize,
    },

    #[error("{0} missing")]
    MissingField(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    // Response errors
    #[error("Un-matched response: {raw:?}")]
    UnparseableResponse { raw: String },

    #[error("Checksum mismatch: expected {expected:02X}, got {actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    // Stream errors
    #[error("Frame too large: {size} bytes (max {max_size})")]
    FrameTooLarge { size: usize, max_size: usize },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn length_mismatch(segment: impl Into<String>, expected: usize, actual: usize) -> Self {
        Error::LengthMismatch {
            segment: segment.into(),
            expected,
            actual,
        }
    }

    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
