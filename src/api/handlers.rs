use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::history::QueryRecord;
use crate::service::{CsvqlService, UploadSummary};
use crate::table::Table;

use super::convert::table_to_ipc;
use super::error::ApiError;
use super::types::{
    DefaultQueryResponse, QueryRequest, SessionResponse, TableJson, UploadParams,
};

const ARROW_IPC_MIME: &str = "application/vnd.apache.arrow.stream";
const CSV_MIME: &str = "text/csv; charset=utf-8";

pub async fn health() -> &'static str {
    "OK"
}

pub async fn create_session(
    State(service): State<Arc<CsvqlService>>,
) -> (StatusCode, Json<SessionResponse>) {
    let session_id = service.create_session().await;
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

pub async fn close_session(
    State(service): State<Arc<CsvqlService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.close_session(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upload(
    State(service): State<Arc<CsvqlService>>,
    Path(id): Path<String>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<UploadSummary>, ApiError> {
    let summary = service.upload(&id, &body, &params.filename).await?;
    Ok(Json(summary))
}

pub async fn get_table(
    State(service): State<Arc<CsvqlService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (name, table) = service.table(&id).await?;
    render_table(&headers, &table, Some(name))
}

pub async fn default_query(
    State(service): State<Arc<CsvqlService>>,
    Path(id): Path<String>,
) -> Result<Json<DefaultQueryResponse>, ApiError> {
    let sql = service.default_query(&id).await?;
    Ok(Json(DefaultQueryResponse { sql }))
}

pub async fn run_query(
    State(service): State<Arc<CsvqlService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<QueryRequest>,
) -> Result<Response, ApiError> {
    let result = service.query(&id, &req.sql).await?;
    render_table(&headers, &result, None)
}

pub async fn download(
    State(service): State<Arc<CsvqlService>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let download = service.download(&id).await?;
    let disposition = format!("attachment; filename=\"{}\"", download.filename);
    Ok((
        [
            (header::CONTENT_TYPE, CSV_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.content,
    )
        .into_response())
}

pub async fn history(State(service): State<Arc<CsvqlService>>) -> Json<Vec<QueryRecord>> {
    Json(service.list_history().await)
}

fn render_table(
    headers: &HeaderMap,
    table: &Table,
    name: Option<String>,
) -> Result<Response, ApiError> {
    let wants_arrow = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(ARROW_IPC_MIME));

    if wants_arrow {
        let buf = table_to_ipc(table)?;
        Ok(([(header::CONTENT_TYPE, ARROW_IPC_MIME)], buf).into_response())
    } else {
        let mut json = TableJson::try_from(table)?;
        json.name = name;
        Ok(Json(json).into_response())
    }
}
