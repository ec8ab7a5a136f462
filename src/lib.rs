pub mod config;
pub mod models;
pub mod passport_extractor;
pub mod processing;
pub mod utils;
pub mod validation;

pub use config::ExtractorConfig;
pub use models::{ExtractedIdentity, FieldValue, MrzRecord};
pub use passport_extractor::PassportExtractor;
pub use utils::PassportError;
