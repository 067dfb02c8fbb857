//! # In-Memory Store
//!
//! A `TabularStore` backed by a process-local map. Used by the test
//! suites of every crate above this one, and as a throwaway backend for
//! local development without store credentials.
//!
//! Semantics match the remote store where it matters: `update_row`
//! addresses rows by 1-based sheet position, and reading an absent tab
//! yields no rows rather than an error.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::tabular::TabularStore;

/// Process-local tabular store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tabs: RwLock<HashMap<String, Vec<Vec<String>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a tab from string slices. Builder-style, for test setup.
    pub async fn with_tab(self, tab: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        self.tabs.write().await.insert(tab.to_string(), rows);
        self
    }

    /// Returns a snapshot of a tab's rows, for assertions.
    pub async fn snapshot(&self, tab: &str) -> Vec<Vec<String>> {
        self.tabs.read().await.get(tab).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TabularStore for MemoryStore {
    async fn read_tab(&self, tab: &str) -> StoreResult<Vec<Vec<String>>> {
        Ok(self.tabs.read().await.get(tab).cloned().unwrap_or_default())
    }

    async fn append_row(&self, tab: &str, row: Vec<String>) -> StoreResult<()> {
        self.tabs
            .write()
            .await
            .entry(tab.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    async fn update_row(&self, tab: &str, row_idx: usize, row: Vec<String>) -> StoreResult<()> {
        let mut tabs = self.tabs.write().await;
        let rows = tabs.get_mut(tab).ok_or_else(|| StoreError::Api {
            status: 400,
            message: format!("unknown tab: {tab}"),
        })?;
        if row_idx == 0 || row_idx > rows.len() {
            return Err(StoreError::Api {
                status: 400,
                message: format!("row {row_idx} out of range for tab {tab}"),
            });
        }
        rows[row_idx - 1] = row;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_tab_is_empty() {
        let store = MemoryStore::new();
        assert!(store.read_tab("Nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_and_read() {
        let store = MemoryStore::new()
            .with_tab("Sales", &[&["ts", "total"]])
            .await;
        store
            .append_row("Sales", vec!["t1".into(), "30".into()])
            .await
            .unwrap();

        let rows = store.read_tab("Sales").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["t1".to_string(), "30".to_string()]);
    }

    #[tokio::test]
    async fn test_update_row_is_one_based() {
        let store = MemoryStore::new()
            .with_tab("Stock", &[&["qty"], &["10"]])
            .await;
        store.update_row("Stock", 2, vec!["6".into()]).await.unwrap();
        assert_eq!(store.snapshot("Stock").await[1], vec!["6".to_string()]);
    }

    #[tokio::test]
    async fn test_update_row_out_of_range() {
        let store = MemoryStore::new().with_tab("Stock", &[&["qty"]]).await;
        let err = store.update_row("Stock", 5, vec!["6".into()]).await;
        assert!(matches!(err, Err(StoreError::Api { status: 400, .. })));

        let err = store.update_row("Stock", 0, vec!["6".into()]).await;
        assert!(matches!(err, Err(StoreError::Api { status: 400, .. })));
    }
}
