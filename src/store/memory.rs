//! Implements the `Store` trait with an in-memory key-value map.
//!
//! This is the store used in tests, and by embedders that keep the serialized ledger somewhere of
//! their own choosing. Clones share the same map, so a caller can keep a handle and inspect what
//! the ledger persisted after handing the store over.

use crate::model::Transaction;
use crate::store::{Store, TRANSACTIONS};
use crate::Result;
use anyhow::Context;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A string key-value store held in memory. The ledger lives under the `transactions` key as JSON.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value stored under `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.data.lock().await.get(key).cloned()
    }

    /// Stores a raw value under `key`, replacing any previous value.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.lock().await.insert(key.into(), value.into());
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn read(&mut self) -> Result<Option<Vec<Transaction>>> {
        match self.get(TRANSACTIONS).await {
            None => Ok(None),
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .with_context(|| format!("Failed to parse the stored '{TRANSACTIONS}' value")),
        }
    }

    async fn write(&mut self, transactions: &[Transaction]) -> Result<()> {
        let json = serde_json::to_string(transactions)
            .context("Failed to serialize transactions to JSON")?;
        self.set(TRANSACTIONS, json).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category};
    use std::str::FromStr;

    #[tokio::test]
    async fn test_read_empty() {
        let mut store = MemoryStore::new();
        assert!(store.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_shares_map() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();
        let ts = vec![Transaction::new(
            "a",
            "Coffee",
            Amount::from_str("-4.5").unwrap(),
            Category::Food,
        )];
        store.write(&ts).await.unwrap();

        let raw = handle.get(TRANSACTIONS).await.unwrap();
        assert!(raw.contains(r#""text":"Coffee""#));
        assert_eq!(handle.clone().read().await.unwrap().unwrap(), ts);
    }

    #[tokio::test]
    async fn test_read_malformed() {
        let mut store = MemoryStore::new();
        store.set(TRANSACTIONS, "{not json").await;
        assert!(store.read().await.is_err());
    }
}
