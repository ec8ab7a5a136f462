use serde::{Serialize, Serializer};
use std::fmt;

/// Characters per MRZ line in the TD3 (passport) format.
pub const TD3_LINE_LENGTH: usize = 44;
/// MRZ lines per TD3 document.
pub const TD3_LINE_COUNT: usize = 2;
/// Padding and separator character inside MRZ lines.
pub const MRZ_FILLER: char = '<';
/// Sentinel shown for any field that could not be found or parsed.
pub const NOT_FOUND: &str = "Not Found";

/// A single extracted value, or the explicit absence of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Found(String),
    NotFound,
}

impl FieldValue {
    /// `Found` for non-empty strings, `NotFound` otherwise.
    pub fn non_empty(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            FieldValue::NotFound
        } else {
            FieldValue::Found(value)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldValue::Found(value) => value,
            FieldValue::NotFound => NOT_FOUND,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FieldValue::Found(_))
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::NotFound, FieldValue::Found)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Positional fields sliced out of a TD3 MRZ line pair.
///
/// Everything here is raw: offsets are applied, names are de-filled, but
/// nothing is cleaned or date-parsed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MrzRecord {
    pub document_type_code: String,
    pub issuing_country_raw: String,
    pub surname_raw: String,
    pub given_names_raw: String,
    pub document_number_raw: String,
    pub nationality_code_raw: String,
    pub birth_date_raw: String,
    pub sex_raw: String,
    pub expiry_date_raw: String,
    /// The two lines after upper-casing and padding, in order.
    pub lines: [String; TD3_LINE_COUNT],
}

/// The final eight-field result for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedIdentity {
    #[serde(rename = "Name")]
    pub name: FieldValue,
    #[serde(rename = "Date of Birth")]
    pub date_of_birth: FieldValue,
    #[serde(rename = "Date of Issue")]
    pub date_of_issue: FieldValue,
    #[serde(rename = "Date of Expiry")]
    pub date_of_expiry: FieldValue,
    #[serde(rename = "Authority")]
    pub authority: FieldValue,
    #[serde(rename = "Nationality")]
    pub nationality: FieldValue,
    #[serde(rename = "Passport Type")]
    pub passport_type: FieldValue,
    #[serde(rename = "Passport Number")]
    pub passport_number: FieldValue,
}

impl ExtractedIdentity {
    /// Display names paired with values, in report order.
    pub fn fields(&self) -> [(&'static str, &FieldValue); 8] {
        [
            ("Name", &self.name),
            ("Date of Birth", &self.date_of_birth),
            ("Date of Issue", &self.date_of_issue),
            ("Date of Expiry", &self.date_of_expiry),
            ("Authority", &self.authority),
            ("Nationality", &self.nationality),
            ("Passport Type", &self.passport_type),
            ("Passport Number", &self.passport_number),
        ]
    }
}

/// Outcome of the ICAO check digits carried by line two of a TD3 MRZ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckDigitReport {
    pub document_number_valid: bool,
    pub date_of_birth_valid: bool,
    pub date_of_expiry_valid: bool,
    pub personal_number_valid: bool,
    pub composite_valid: bool,
}

impl CheckDigitReport {
    pub fn all_valid(&self) -> bool {
        self.document_number_valid
            && self.date_of_birth_valid
            && self.date_of_expiry_valid
            && self.personal_number_valid
            && self.composite_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ExtractedIdentity {
        ExtractedIdentity {
            name: FieldValue::Found("JOHN SMITH".to_string()),
            date_of_birth: FieldValue::Found("01/01/1999".to_string()),
            date_of_issue: FieldValue::NotFound,
            date_of_expiry: FieldValue::Found("01/01/2030".to_string()),
            authority: FieldValue::NotFound,
            nationality: FieldValue::Found("Indonesia".to_string()),
            passport_type: FieldValue::Found("P".to_string()),
            passport_number: FieldValue::Found("C1234567".to_string()),
        }
    }

    #[test]
    fn test_not_found_display() {
        assert_eq!(FieldValue::NotFound.to_string(), "Not Found");
        assert_eq!(FieldValue::non_empty(""), FieldValue::NotFound);
        assert_eq!(FieldValue::from(Some("X".to_string())).as_str(), "X");
    }

    #[test]
    fn test_identity_serializes_with_display_keys() {
        let json = serde_json::to_string(&identity()).unwrap();
        assert!(json.starts_with(r#"{"Name":"JOHN SMITH","Date of Birth":"01/01/1999""#));
        assert!(json.contains(r#""Date of Issue":"Not Found""#));
        assert!(json.ends_with(r#""Passport Number":"C1234567"}"#));
    }

    #[test]
    fn test_fields_order() {
        let identity = identity();
        let keys: Vec<&str> = identity.fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys[0], "Name");
        assert_eq!(keys[7], "Passport Number");
    }
}
