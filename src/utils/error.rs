use thiserror::Error;

#[derive(Debug, Error)]
pub enum PassportError {
    #[error("Insufficient OCR results: expected 2 MRZ lines, found {found}")]
    InsufficientData { found: usize },
    #[error("Image processing error: {0}")]
    ImageProcessingError(String),
    #[error("OCR error: {0}")]
    OcrError(String),
    #[error("Country table error: {0}")]
    CountryTableError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Reasons a date fragment could not be turned into a calendar date.
/// These never leave the crate's date handling; callers see `Not Found`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("empty date string")]
    Empty,
    #[error("unrecognized date shape: {0}")]
    UnrecognizedShape(String),
    #[error("not a calendar date: year={year}, month={month}, day={day}")]
    InvalidCalendarDate { year: i32, month: u32, day: u32 },
}
