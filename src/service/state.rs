use crate::loader::LoadedTable;
use crate::query::QueryStore;

/// Per-session engine and the table currently bound in it.
pub(crate) struct SessionState {
    pub store: QueryStore,
    pub loaded: Option<LoadedTable>,
}

impl SessionState {
    pub fn new(substitute_placeholder: bool) -> Self {
        Self {
            store: QueryStore::new(substitute_placeholder),
            loaded: None,
        }
    }
}
