/// Normalizes raw OCR substrings into canonical alphanumeric tokens.
pub struct FieldCleaner;

impl FieldCleaner {
    /// Drop every non-alphanumeric character and upper-case the rest.
    pub fn clean(raw: &str) -> String {
        raw.chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_fillers_and_punctuation() {
        assert_eq!(FieldCleaner::clean("P<"), "P");
        assert_eq!(FieldCleaner::clean("C1234567<"), "C1234567");
        assert_eq!(FieldCleaner::clean(" id-n. "), "IDN");
    }

    #[test]
    fn test_clean_is_identity_on_clean_input() {
        for input in ["C1234567", "IDN", "P", "L898902C3"] {
            assert_eq!(FieldCleaner::clean(input), input);
        }
    }

    #[test]
    fn test_clean_empty() {
        assert_eq!(FieldCleaner::clean(""), "");
        assert_eq!(FieldCleaner::clean("<<<"), "");
    }
}
