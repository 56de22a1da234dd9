use serde::{Deserialize, Serialize};

use crate::core::CsvqlError;

/// How the name of an uploaded table is chosen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TableNaming {
    /// Base name of the uploaded file, extension stripped.
    Derived,
    /// Always `fixed_table_name`.
    Fixed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    #[serde(default = "QueryConfig::default_table_naming")]
    pub table_naming: TableNaming,
    #[serde(default = "QueryConfig::default_fixed_table_name")]
    pub fixed_table_name: String,
    /// Rewrites every literal `table` in the query text to the bound name.
    #[serde(default)]
    pub substitute_placeholder: bool,
}

impl QueryConfig {
    fn default_table_naming() -> TableNaming {
        TableNaming::Derived
    }

    fn default_fixed_table_name() -> String {
        String::from("data")
    }

    pub fn validate(&self) -> Result<(), CsvqlError> {
        if self.fixed_table_name.trim().is_empty() {
            return Err(CsvqlError::ConfigParsingError(
                "query.fixed_table_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            table_naming: Self::default_table_naming(),
            fixed_table_name: Self::default_fixed_table_name(),
            substitute_placeholder: false,
        }
    }
}
