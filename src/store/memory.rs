//! In-process settings store, for tests and ephemeral runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DatabaseError;
use crate::store::traits::SettingsStore;

#[derive(Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<(String, String), serde_json::Value>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        let values = self.values.read().await;
        Ok(values.get(&(user_id.to_string(), key.to_string())).cloned())
    }

    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        self.values
            .write()
            .await
            .insert((user_id.to_string(), key.to_string()), value.clone());
        Ok(())
    }

    async fn delete_setting(&self, user_id: &str, key: &str) -> Result<bool, DatabaseError> {
        let removed = self
            .values
            .write()
            .await
            .remove(&(user_id.to_string(), key.to_string()));
        Ok(removed.is_some())
    }
}
