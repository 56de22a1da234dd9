//! Parses uploaded delimited text into a [`Table`].
//!
//! The first row is the header. Column types are inferred by the arrow CSV
//! reader, repeated header names are suffixed (see [`dedup_column_names`]) and
//! the table name is the upload's file name without its extension.

mod dedup;

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{Field, Schema};
use log::debug;

use crate::conf::LoaderConfig;
use crate::core::CsvqlError;
use crate::table::Table;

pub use dedup::dedup_column_names;

const FALLBACK_TABLE_NAME: &str = "data";
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// A parsed upload and the name it was loaded under.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    pub name: String,
    pub source: String,
    pub table: Table,
}

#[derive(Debug, Clone)]
pub struct Loader {
    delimiter: u8,
    infer_rows: Option<usize>,
}

impl Loader {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
            infer_rows: (config.infer_rows > 0).then_some(config.infer_rows),
        }
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn load(&self, raw: &[u8], source_name: &str) -> Result<LoadedTable, CsvqlError> {
        let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
        let text = std::str::from_utf8(raw).map_err(|e| {
            CsvqlError::ParseError(format!("{source_name}: content is not valid UTF-8: {e}"))
        })?;
        if text.trim().is_empty() {
            return Err(CsvqlError::ParseError(format!(
                "{source_name}: no header row"
            )));
        }

        let format = Format::default()
            .with_header(true)
            .with_delimiter(self.delimiter);

        let (inferred, _) = format
            .infer_schema(Cursor::new(raw), self.infer_rows)
            .map_err(|e| parse_error(source_name, e))?;
        if inferred.fields().is_empty() {
            return Err(CsvqlError::ParseError(format!(
                "{source_name}: no header row"
            )));
        }

        let header: Vec<String> = inferred
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| match f.name().trim() {
                "" => format!("column_{}", i + 1),
                _ => f.name().clone(),
            })
            .collect();
        let names = dedup_column_names(&header);

        let fields: Vec<Field> = inferred
            .fields()
            .iter()
            .zip(names)
            .map(|(f, name)| Field::clone(f).with_name(name))
            .collect();
        let schema = Arc::new(Schema::new(fields));

        let reader = ReaderBuilder::new(schema.clone())
            .with_format(format)
            .build(Cursor::new(raw))
            .map_err(|e| parse_error(source_name, e))?;
        let batches = reader
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| parse_error(source_name, e))?;

        let table = Table::from_batches(schema, &batches)?;
        debug!(
            "parsed '{}': {} rows x {} columns",
            source_name,
            table.num_rows(),
            table.num_columns()
        );

        Ok(LoadedTable {
            name: table_name_from_source(source_name),
            source: source_name.to_string(),
            table,
        })
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(&LoaderConfig::default())
    }
}

fn parse_error(source_name: &str, err: arrow::error::ArrowError) -> CsvqlError {
    CsvqlError::ParseError(format!("{source_name}: {err}"))
}

/// File name with directory and final extension stripped: `dir/people.csv` is `people`.
pub fn table_name_from_source(source_name: &str) -> String {
    Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_TABLE_NAME)
        .to_string()
}
