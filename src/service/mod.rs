mod state;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::conf::{Config, TableNaming};
use crate::core::CsvqlError;
use crate::history::{History, QueryRecord};
use crate::loader::{LoadedTable, Loader, table_name_from_source};
use crate::query::{ResultTable, default_query};
use crate::table::{Shape, Table};

use state::SessionState;

const DOWNLOAD_PREFIX: &str = "streamlit_";
const UPLOAD_EXTENSION: &str = "csv";

/// What the caller needs to render after an upload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UploadSummary {
    pub table_name: String,
    pub columns: Vec<String>,
    pub shape: Shape,
    pub default_query: String,
}

/// The bound table re-encoded as CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Sessions, each with its own query engine, plus the shared history.
pub struct CsvqlService {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionState>>>>,
    history: Arc<History>,
    loader: Loader,
    config: Config,
}

impl CsvqlService {
    pub fn new(config: Config) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history: Arc::new(History::new(config.history.capacity)),
            loader: Loader::new(&config.loader),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn history(&self) -> &Arc<History> {
        &self.history
    }

    pub async fn create_session(&self) -> String {
        let mut sessions = self.sessions.write().await;
        let id = loop {
            let candidate = format!("{:016x}", rand::random::<u64>());
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(
            id.clone(),
            Arc::new(Mutex::new(SessionState::new(
                self.config.query.substitute_placeholder,
            ))),
        );
        info!("created session {}", id);
        id
    }

    /// Ends a session and drops its engine together with the bound table.
    pub async fn close_session(&self, session_id: &str) -> Result<(), CsvqlError> {
        let removed = self.sessions.write().await.remove(session_id);
        match removed {
            Some(_) => {
                info!("closed session {}", session_id);
                Ok(())
            }
            None => Err(CsvqlError::SessionNotFound(session_id.to_string())),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session and empties the history.
    pub async fn shutdown(&self) {
        let closed = {
            let mut sessions = self.sessions.write().await;
            let closed = sessions.len();
            sessions.clear();
            closed
        };
        self.history.clear().await;
        info!("shut down, closed {} sessions", closed);
    }

    async fn session(&self, session_id: &str) -> Result<Arc<Mutex<SessionState>>, CsvqlError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| CsvqlError::SessionNotFound(session_id.to_string()))
    }

    /// Parses an upload and binds it in the session, replacing the previous
    /// table. On failure the previous table stays bound.
    pub async fn upload(
        &self,
        session_id: &str,
        raw: &[u8],
        filename: &str,
    ) -> Result<UploadSummary, CsvqlError> {
        let session = self.session(session_id).await?;
        check_extension(filename)?;

        let started = Instant::now();
        let mut loaded = self.loader.load(raw, filename).inspect_err(|e| {
            warn!("session {}: upload of '{}' failed: {}", session_id, filename, e);
        })?;
        if self.config.query.table_naming == TableNaming::Fixed {
            loaded.name = self.config.query.fixed_table_name.clone();
        }

        let mut state = session.lock().await;
        state.store.register(&loaded.name, &loaded.table)?;
        let elapsed = started.elapsed();
        let shape = loaded.table.shape();
        let summary = UploadSummary {
            table_name: loaded.name.clone(),
            columns: loaded.table.column_names(),
            shape,
            default_query: default_query(Some(&loaded.name)),
        };
        state.loaded = Some(loaded);
        drop(state);

        self.history
            .record(QueryRecord::load(filename, elapsed, shape))
            .await;
        info!(
            "session {}: loaded '{}' as '{}' ({} rows x {} columns) in {}ms",
            session_id,
            filename,
            summary.table_name,
            shape.rows,
            shape.columns,
            elapsed.as_millis()
        );
        Ok(summary)
    }

    /// Runs a query against the session's bound table.
    pub async fn query(&self, session_id: &str, query_text: &str) -> Result<ResultTable, CsvqlError> {
        let session = self.session(session_id).await?;
        let state = session.lock().await;

        let started = Instant::now();
        let result = state.store.execute(query_text).await.inspect_err(|e| {
            warn!("session {}: query failed: {}", session_id, e);
        })?;
        let elapsed = started.elapsed();
        drop(state);

        let text = query_text.trim();
        self.history
            .record(QueryRecord::query(text, elapsed, result.shape()))
            .await;
        info!(
            "session {}: query returned {} rows x {} columns in {}ms",
            session_id,
            result.num_rows(),
            result.num_columns(),
            elapsed.as_millis()
        );
        Ok(result)
    }

    /// The bound table under its name.
    pub async fn table(&self, session_id: &str) -> Result<(String, Table), CsvqlError> {
        let session = self.session(session_id).await?;
        let state = session.lock().await;
        state
            .loaded
            .as_ref()
            .map(|l| (l.name.clone(), l.table.clone()))
            .ok_or_else(|| CsvqlError::NoTableLoaded(session_id.to_string()))
    }

    pub async fn default_query(&self, session_id: &str) -> Result<String, CsvqlError> {
        let session = self.session(session_id).await?;
        let state = session.lock().await;
        Ok(default_query(state.loaded.as_ref().map(|l| l.name.as_str())))
    }

    pub async fn download(&self, session_id: &str) -> Result<Download, CsvqlError> {
        let session = self.session(session_id).await?;
        let state = session.lock().await;
        let loaded: &LoadedTable = state
            .loaded
            .as_ref()
            .ok_or_else(|| CsvqlError::NoTableLoaded(session_id.to_string()))?;

        Ok(Download {
            filename: download_filename(&loaded.source),
            content: loaded.table.to_csv(self.loader.delimiter())?,
        })
    }

    pub async fn list_history(&self) -> Vec<QueryRecord> {
        self.history.list().await
    }
}

fn check_extension(filename: &str) -> Result<(), CsvqlError> {
    let is_csv = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(UPLOAD_EXTENSION));
    if !is_csv {
        return Err(CsvqlError::ValidationError(format!(
            "'{filename}' is not a .{UPLOAD_EXTENSION} file"
        )));
    }
    Ok(())
}

/// `people.csv` is offered back as `streamlit_people.csv`.
pub fn download_filename(source_name: &str) -> String {
    format!(
        "{DOWNLOAD_PREFIX}{}.{UPLOAD_EXTENSION}",
        table_name_from_source(source_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::QueryConfig;
    use crate::history::RecordKind;

    const PEOPLE: &[u8] = b"id,name\n1,Alice\n2,Bob\n";

    #[tokio::test]
    async fn test_upload_then_query() {
        let service = CsvqlService::new(Config::default());
        let id = service.create_session().await;

        let summary = service.upload(&id, PEOPLE, "people.csv").await.unwrap();
        assert_eq!(summary.table_name, "people");
        assert_eq!(summary.columns, vec!["id", "name"]);
        assert_eq!(summary.shape, Shape::new(2, 2));
        assert_eq!(summary.default_query, "SELECT * FROM people");
        assert_eq!(service.default_query(&id).await.unwrap(), summary.default_query);

        let result = service.query(&id, &summary.default_query).await.unwrap();
        assert_eq!(result.shape(), Shape::new(2, 2));

        let history = service.list_history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, RecordKind::Query);
        assert_eq!(history[0].text, "SELECT * FROM people");
        assert_eq!(history[1].kind, RecordKind::Load);
        assert_eq!(history[1].text, "people.csv");
    }

    #[tokio::test]
    async fn test_fixed_table_name() {
        let config = Config {
            query: QueryConfig {
                table_naming: TableNaming::Fixed,
                ..QueryConfig::default()
            },
            ..Config::default()
        };
        let service = CsvqlService::new(config);
        let id = service.create_session().await;

        let summary = service.upload(&id, PEOPLE, "people.csv").await.unwrap();
        assert_eq!(summary.table_name, "data");
        assert_eq!(summary.default_query, "SELECT * FROM data");
        let result = service.query(&id, &summary.default_query).await.unwrap();
        assert_eq!(result.shape(), Shape::new(2, 2));
        let result = service.query(&id, "SELECT name FROM \"data\"").await.unwrap();
        assert_eq!(result.shape(), Shape::new(2, 1));

        let download = service.download(&id).await.unwrap();
        assert_eq!(download.filename, "streamlit_people.csv");

        let summary = service
            .upload(&id, b"x,y\n1,2\n3,4\n5,6\n", "other.csv")
            .await
            .unwrap();
        assert_eq!(summary.table_name, "data");
        let result = service.query(&id, "SELECT x FROM \"data\"").await.unwrap();
        assert_eq!(result.shape(), Shape::new(3, 1));
        assert_eq!(
            service.download(&id).await.unwrap().filename,
            "streamlit_other.csv"
        );
    }

    #[tokio::test]
    async fn test_reupload_same_file_replaces_table() {
        let service = CsvqlService::new(Config::default());
        let id = service.create_session().await;
        service.upload(&id, PEOPLE, "people.csv").await.unwrap();

        let summary = service
            .upload(&id, b"id,name\n1,Alice\n2,Bob\n3,Carol\n", "people.csv")
            .await
            .unwrap();
        assert_eq!(summary.shape, Shape::new(3, 2));

        let result = service.query(&id, "SELECT * FROM people").await.unwrap();
        assert_eq!(result.shape(), Shape::new(3, 2));
        let (_, table) = service.table(&id).await.unwrap();
        assert_eq!(table.shape(), Shape::new(3, 2));
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_previous_table() {
        let service = CsvqlService::new(Config::default());
        let id = service.create_session().await;
        service.upload(&id, PEOPLE, "people.csv").await.unwrap();

        let err = service
            .upload(&id, b"a,b\n1,2,3\n", "broken.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, CsvqlError::ParseError(_)));

        let (name, table) = service.table(&id).await.unwrap();
        assert_eq!(name, "people");
        assert_eq!(table.shape(), Shape::new(2, 2));
        assert!(service.query(&id, "SELECT * FROM people").await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_query_not_recorded() {
        let service = CsvqlService::new(Config::default());
        let id = service.create_session().await;
        service.upload(&id, PEOPLE, "people.csv").await.unwrap();

        assert!(service.query(&id, "SELECT nope FROM people").await.is_err());
        assert!(matches!(
            service.query(&id, "  ").await,
            Err(CsvqlError::ValidationError(_))
        ));
        assert_eq!(service.history().count().await, 1);
    }

    #[tokio::test]
    async fn test_non_csv_upload_rejected() {
        let service = CsvqlService::new(Config::default());
        let id = service.create_session().await;
        let err = service.upload(&id, PEOPLE, "people.txt").await.unwrap_err();
        assert!(matches!(err, CsvqlError::ValidationError(_)));
        assert!(service.upload(&id, PEOPLE, "PEOPLE.CSV").await.is_ok());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let service = CsvqlService::new(Config::default());
        let first = service.create_session().await;
        let second = service.create_session().await;
        service.upload(&first, PEOPLE, "people.csv").await.unwrap();

        assert!(service.query(&second, "SELECT * FROM people").await.is_err());
        assert_eq!(
            service.default_query(&second).await.unwrap(),
            "SELECT * FROM table"
        );
        assert!(matches!(
            service.table(&second).await,
            Err(CsvqlError::NoTableLoaded(_))
        ));
    }

    #[tokio::test]
    async fn test_history_shared_across_sessions() {
        let service = CsvqlService::new(Config::default());
        let first = service.create_session().await;
        let second = service.create_session().await;
        service.upload(&first, PEOPLE, "people.csv").await.unwrap();
        service.upload(&second, b"x\n1\n", "other.csv").await.unwrap();
        assert_eq!(service.list_history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_close_session() {
        let service = CsvqlService::new(Config::default());
        let id = service.create_session().await;
        service.close_session(&id).await.unwrap();
        assert_eq!(service.session_count().await, 0);
        assert_eq!(
            service.close_session(&id).await,
            Err(CsvqlError::SessionNotFound(id.clone()))
        );
        assert!(matches!(
            service.upload(&id, PEOPLE, "people.csv").await,
            Err(CsvqlError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_shutdown_clears_everything() {
        let service = CsvqlService::new(Config::default());
        let id = service.create_session().await;
        service.upload(&id, PEOPLE, "people.csv").await.unwrap();
        service.shutdown().await;
        assert_eq!(service.session_count().await, 0);
        assert_eq!(service.history().count().await, 0);
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(download_filename("people.csv"), "streamlit_people.csv");
        assert_eq!(download_filename("dir/sales.2024.csv"), "streamlit_sales.2024.csv");
    }
}
