//! Process-wide record of completed loads and queries.

mod record;
mod ring;

use tokio::sync::RwLock;

pub use record::{QueryRecord, RecordKind};
pub use ring::HistoryRing;

/// Shared handle around [`HistoryRing`]; writers take the write lock, readers
/// get a snapshot under the read lock.
pub struct History {
    ring: RwLock<HistoryRing>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: RwLock::new(HistoryRing::new(capacity)),
        }
    }

    pub async fn record(&self, entry: QueryRecord) -> bool {
        self.ring.write().await.record(entry)
    }

    pub async fn list(&self) -> Vec<QueryRecord> {
        self.ring.read().await.list()
    }

    pub async fn count(&self) -> usize {
        self.ring.read().await.count()
    }

    pub async fn clear(&self) {
        self.ring.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::table::Shape;

    #[tokio::test]
    async fn test_concurrent_records() {
        let history = Arc::new(History::new(50));
        let mut handles = Vec::new();
        for task in 0..4 {
            let history = history.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..10 {
                    let text = format!("SELECT {task}, {i}");
                    history
                        .record(QueryRecord::query(&text, Duration::ZERO, Shape::new(1, 2)))
                        .await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(history.count().await, 40);
        assert_eq!(history.list().await.len(), 40);
    }
}
