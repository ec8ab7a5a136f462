pub mod error;

pub use error::{DateParseError, PassportError};
