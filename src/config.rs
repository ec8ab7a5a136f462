use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::PassportError;

/// Runtime settings for the extractor and its OCR adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// JSON array of `{"code", "name"}` objects.
    pub country_codes: PathBuf,
    pub ocr_language: String,
    pub tessdata_prefix: Option<PathBuf>,
    /// MRZ crops are resized to this before OCR.
    pub mrz_width: u32,
    pub mrz_height: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            country_codes: PathBuf::from("country_codes.json"),
            ocr_language: "eng".to_string(),
            tessdata_prefix: None,
            mrz_width: 1110,
            mrz_height: 140,
        }
    }
}

impl ExtractorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PassportError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: ExtractorConfig = serde_json::from_str(&json)?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PassportError> {
        if self.mrz_width == 0 || self.mrz_height == 0 {
            return Err(PassportError::ConfigError(format!(
                "MRZ resize target must be non-zero, got {}x{}",
                self.mrz_width, self.mrz_height
            )));
        }
        if self.ocr_language.trim().is_empty() {
            return Err(PassportError::ConfigError("OCR language must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"country_codes": "/etc/passport/countries.json"}}"#).unwrap();

        let config = ExtractorConfig::load(file.path()).unwrap();
        assert_eq!(config.country_codes, PathBuf::from("/etc/passport/countries.json"));
        assert_eq!(config.ocr_language, "eng");
        assert_eq!((config.mrz_width, config.mrz_height), (1110, 140));
    }

    #[test]
    fn test_zero_resize_target_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"mrz_width": 0}}"#).unwrap();
        assert!(matches!(
            ExtractorConfig::load(file.path()),
            Err(PassportError::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ExtractorConfig::load(file.path()),
            Err(PassportError::JsonError(_))
        ));
    }
}
