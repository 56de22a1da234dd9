use std::path::Path;

use config::{Config as CConfig, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::conf::{HistoryConfig, LoaderConfig, QueryConfig, ServerConfig};
use crate::core::CsvqlError::{self, ConfigParsingError};

const ENV_PREFIX: &str = "CSVQL";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, CsvqlError> {
        let builder =
            CConfig::builder().add_source(File::from_str(toml_str, FileFormat::Toml));
        Self::build(builder)
    }

    /// Reads a TOML file, then applies `CSVQL_<SECTION>__<KEY>` overrides.
    pub fn from_file(path: &Path) -> Result<Config, CsvqlError> {
        let builder = CConfig::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(Self::env());
        Self::build(builder)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Config, CsvqlError> {
        Self::build(CConfig::builder().add_source(Self::env()))
    }

    fn env() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Config, CsvqlError> {
        let config = builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CsvqlError> {
        self.loader.validate()?;
        self.query.validate()?;
        self.history.validate()?;
        Ok(())
    }
}
