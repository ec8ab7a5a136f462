use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::utils::PassportError;

/// One row of the country table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCode {
    pub code: String,
    pub name: String,
}

/// Ordered `(code, name)` pairs, loaded once and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCodeTable {
    entries: Vec<CountryCode>,
}

impl CountryCodeTable {
    pub fn new(entries: Vec<CountryCode>) -> Self {
        CountryCodeTable { entries }
    }

    pub fn from_pairs<I, C, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(code, name)| CountryCode {
                    code: code.into(),
                    name: name.into(),
                })
                .collect(),
        )
    }

    /// Parse a JSON array of `{"code": ..., "name": ...}` objects.
    pub fn from_json_str(json: &str) -> Result<Self, PassportError> {
        let entries: Vec<CountryCode> = serde_json::from_str(json)
            .map_err(|e| PassportError::CountryTableError(format!("Invalid country table: {}", e)))?;
        Ok(Self::new(entries))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PassportError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            PassportError::CountryTableError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let table = Self::from_json_str(&json)?;
        info!("Loaded {} country codes from {}", table.len(), path.display());
        Ok(table)
    }

    /// Linear scan, first exact match wins.
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps MRZ nationality / issuer codes to display names.
#[derive(Debug, Clone)]
pub struct CountryCodeResolver {
    table: Arc<CountryCodeTable>,
}

impl CountryCodeResolver {
    pub fn new(table: Arc<CountryCodeTable>) -> Self {
        CountryCodeResolver { table }
    }

    /// Unknown codes are returned unchanged.
    pub fn resolve(&self, code: &str) -> String {
        match self.table.lookup(code) {
            Some(name) => name.to_string(),
            None => {
                debug!("No country name for code {:?}", code);
                code.to_string()
            }
        }
    }

    pub fn table(&self) -> &Arc<CountryCodeTable> {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn resolver() -> CountryCodeResolver {
        CountryCodeResolver::new(Arc::new(CountryCodeTable::from_pairs([
            ("IDN", "Indonesia"),
            ("MEX", "Mexico"),
            ("IDN", "Duplicate Indonesia"),
        ])))
    }

    #[test]
    fn test_resolve_known_code() {
        assert_eq!(resolver().resolve("MEX"), "Mexico");
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(resolver().resolve("IDN"), "Indonesia");
    }

    #[test]
    fn test_unknown_code_passes_through() {
        assert_eq!(resolver().resolve("ZZZ"), "ZZZ");
        assert_eq!(resolver().resolve(""), "");
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"code": "UTO", "name": "Utopia"}}, {{"code": "GBR", "name": "United Kingdom"}}]"#
        )
        .unwrap();

        let table = CountryCodeTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("UTO"), Some("Utopia"));
        assert_eq!(table.lookup("USA"), None);
    }

    #[test]
    fn test_malformed_table_is_an_error() {
        let result = CountryCodeTable::from_json_str(r#"{"IDN": "Indonesia"}"#);
        assert!(matches!(result, Err(PassportError::CountryTableError(_))));

        let missing = CountryCodeTable::load("/nonexistent/country_codes.json");
        assert!(matches!(missing, Err(PassportError::CountryTableError(_))));
    }
}
