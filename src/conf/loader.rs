use serde::{Deserialize, Serialize};

use crate::core::CsvqlError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    #[serde(default = "LoaderConfig::default_delimiter")]
    pub delimiter: String,
    /// Rows scanned for type inference, 0 scans the whole upload.
    #[serde(default)]
    pub infer_rows: usize,
}

impl LoaderConfig {
    fn default_delimiter() -> String {
        String::from(",")
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }

    pub fn validate(&self) -> Result<(), CsvqlError> {
        if self.delimiter.len() != 1 || !self.delimiter.is_ascii() {
            return Err(CsvqlError::ConfigParsingError(format!(
                "loader.delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: Self::default_delimiter(),
            infer_rows: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_default() {
        let conf = LoaderConfig::default();
        assert_eq!(conf.delimiter_byte(), b',');
        assert_eq!(conf.infer_rows, 0);
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn test_multichar_delimiter_rejected() {
        let conf = LoaderConfig {
            delimiter: String::from("||"),
            infer_rows: 0,
        };
        assert!(conf.validate().is_err());
    }
}
