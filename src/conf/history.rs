use serde::{Deserialize, Serialize};

use crate::core::CsvqlError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_capacity")]
    pub capacity: usize,
}

impl HistoryConfig {
    pub const DEFAULT_CAPACITY: usize = 50;

    fn default_capacity() -> usize {
        Self::DEFAULT_CAPACITY
    }

    pub fn validate(&self) -> Result<(), CsvqlError> {
        if self.capacity == 0 {
            return Err(CsvqlError::ConfigParsingError(
                "history.capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
        }
    }
}
