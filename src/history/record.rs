use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::table::Shape;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Load,
    Query,
}

/// One completed load or query.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryRecord {
    pub issued_at: DateTime<Utc>,
    pub kind: RecordKind,
    /// Query text, or the file name for loads.
    pub text: String,
    pub duration_ms: u64,
    pub shape: Shape,
}

impl QueryRecord {
    pub fn new(kind: RecordKind, text: impl Into<String>, elapsed: Duration, shape: Shape) -> Self {
        Self {
            issued_at: Utc::now(),
            kind,
            text: text.into(),
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            shape,
        }
    }

    pub fn load(source_name: &str, elapsed: Duration, shape: Shape) -> Self {
        Self::new(RecordKind::Load, source_name, elapsed, shape)
    }

    pub fn query(query_text: &str, elapsed: Duration, shape: Shape) -> Self {
        Self::new(RecordKind::Query, query_text, elapsed, shape)
    }
}
