use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/session/{id}/query`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub sql: String,
}

/// Query string of `PUT /api/v1/session/{id}/upload`.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct DefaultQueryResponse {
    pub sql: String,
}

/// Table rendered row by row.
#[derive(Debug, Serialize)]
pub struct TableJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub num_rows: usize,
    pub rows: Vec<Vec<serde_json::Value>>,
}

/// Error response format.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
