use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Result, WingStatsError};
use crate::registry::{AliasStore, AliasTable, Registration};

/// JSON-file alias store.
///
/// File layout matches the signup sheet the bot has always used:
/// ```json
/// {
///   "lucy.b": { "wingspan name": ["Lucy", "lucyb"] }
/// }
/// ```
/// The whole file is rewritten after every successful registration.
pub struct JsonAliasStore {
    path: PathBuf,
    table: Arc<Mutex<AliasTable>>,
}

impl JsonAliasStore {
    /// Open the store, starting empty when the file is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let table = match Self::load(&path) {
            Ok(Some(table)) => {
                tracing::info!("✅ Loaded {} player mappings from {}", table.len(), path.display());
                table
            }
            Ok(None) => {
                tracing::warn!("⚠️ No players file found at {}", path.display());
                AliasTable::new()
            }
            Err(e) => {
                tracing::error!("❌ Failed to load player mappings: {}", e);
                AliasTable::new()
            }
        };

        Self {
            path,
            table: Arc::new(Mutex::new(table)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Option<AliasTable>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)?;
        let table = serde_json::from_str(&text)?;
        Ok(Some(table))
    }

    fn save(&self, table: &AliasTable) -> Result<()> {
        let json = serde_json::to_string_pretty(table)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, AliasTable>> {
        self.table
            .lock()
            .map_err(|_| WingStatsError::Store("alias table lock poisoned".to_string()))
    }
}

#[async_trait]
impl AliasStore for JsonAliasStore {
    async fn snapshot(&self) -> Result<AliasTable> {
        Ok(self.lock()?.clone())
    }

    async fn names_for(&self, identity: &str) -> Result<Vec<String>> {
        Ok(self.lock()?.names_for(identity).to_vec())
    }

    async fn register(&self, identity: &str, name: &str) -> Result<Registration> {
        let mut table = self.lock()?;

        let outcome = table.register(identity, name);
        if let Registration::Added { .. } = outcome {
            // Keep the in-memory registration even if the file write fails
            if let Err(e) = self.save(&table) {
                tracing::error!("❌ Failed to save player mappings to {}: {}", self.path.display(), e);
            } else {
                tracing::info!("📝 Registered '{}' for {}", name, identity);
            }
        }

        Ok(outcome)
    }
}
