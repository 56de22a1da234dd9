use std::sync::Arc;

use datafusion::datasource::MemTable;
use datafusion::execution::context::{SQLOptions, SessionContext};
use datafusion::prelude::SessionConfig;
use datafusion::sql::TableReference;
use log::debug;

use crate::core::CsvqlError;
use crate::table::Table;

use super::text::{substitute_table_placeholder, validate_query};

/// Output of a query; same shape as an uploaded table.
pub type ResultTable = Table;

/// One DataFusion context holding at most one bound table.
///
/// Queries always run on the context the table was registered into; the
/// store never creates a second one.
pub struct QueryStore {
    ctx: SessionContext,
    bound: Option<String>,
    substitute_placeholder: bool,
}

impl QueryStore {
    pub fn new(substitute_placeholder: bool) -> Self {
        // Keep identifier case so CSV headers like `Name` resolve unquoted.
        let config = SessionConfig::new()
            .set_bool("datafusion.sql_parser.enable_ident_normalization", false);
        Self {
            ctx: SessionContext::new_with_config(config),
            bound: None,
            substitute_placeholder,
        }
    }

    pub fn bound_table(&self) -> Option<&str> {
        self.bound.as_deref()
    }

    /// Binds `table` under `table_name`, replacing whatever was bound before.
    pub fn register(&mut self, table_name: &str, table: &Table) -> Result<(), CsvqlError> {
        let provider = MemTable::try_new(table.schema(), vec![vec![table.batch().clone()]])?;

        // The memory catalog rejects an existing name.
        let same_name = self.bound.as_deref() == Some(table_name);
        if same_name {
            self.ctx.deregister_table(TableReference::bare(table_name))?;
            self.bound = None;
        }
        self.ctx
            .register_table(TableReference::bare(table_name), Arc::new(provider))?;
        if let Some(previous) = self.bound.take() {
            self.ctx.deregister_table(TableReference::bare(previous))?;
        }
        self.bound = Some(table_name.to_string());

        debug!("bound table '{}' with {} rows", table_name, table.num_rows());
        Ok(())
    }

    /// Drops the current binding, if any.
    pub fn unregister(&mut self) -> Result<(), CsvqlError> {
        if let Some(previous) = self.bound.take() {
            self.ctx.deregister_table(TableReference::bare(previous))?;
        }
        Ok(())
    }

    /// Query text as it will be handed to the engine.
    pub fn prepare(&self, query_text: &str) -> Result<String, CsvqlError> {
        let query = validate_query(query_text)?;
        match (&self.bound, self.substitute_placeholder) {
            (Some(name), true) => Ok(substitute_table_placeholder(query, name)),
            _ => Ok(query.to_string()),
        }
    }

    /// Runs a read-only query against the bound table.
    pub async fn execute(&self, query_text: &str) -> Result<ResultTable, CsvqlError> {
        let sql = self.prepare(query_text)?;

        let options = SQLOptions::new()
            .with_allow_ddl(false)
            .with_allow_dml(false)
            .with_allow_statements(false);
        let df = self.ctx.sql_with_options(&sql, options).await?;
        let schema = Arc::clone(df.schema().inner());
        let batches = df.collect().await?;

        Table::from_batches(schema, &batches)
    }
}

impl Default for QueryStore {
    fn default() -> Self {
        Self::new(false)
    }
}
