use arrow::compute::concat_batches;
use arrow::csv::WriterBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::core::CsvqlError;

/// Row and column count of a table.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl Shape {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }
}

/// Ordered columns and ordered rows, held as a single arrow batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    pub fn empty(schema: SchemaRef) -> Self {
        Self::new(RecordBatch::new_empty(schema))
    }

    /// Concatenates batches into one table. The schema of the first batch wins
    /// over `schema`, which is only used when there are no batches.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self, CsvqlError> {
        let schema = batches.first().map(|b| b.schema()).unwrap_or(schema);
        match batches {
            [] => Ok(Self::empty(schema)),
            [single] => Ok(Self::new(single.clone())),
            _ => Ok(Self::new(concat_batches(&schema, batches)?)),
        }
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.num_rows(), self.num_columns())
    }

    /// Encodes the table as delimited text with a header row and no index column.
    pub fn to_csv(&self, delimiter: u8) -> Result<Vec<u8>, CsvqlError> {
        let mut buf = Vec::new();
        {
            let mut writer = WriterBuilder::new()
                .with_header(true)
                .with_delimiter(delimiter)
                .build(&mut buf);
            writer.write(&self.batch)?;
        }
        Ok(buf)
    }
}

impl From<RecordBatch> for Table {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}

impl AsRef<RecordBatch> for Table {
    fn as_ref(&self) -> &RecordBatch {
        &self.batch
    }
}
