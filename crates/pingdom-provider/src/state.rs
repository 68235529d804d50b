//! Local state store
//!
//! Manages the `.pingdom/state.json` file which tracks the last known state
//! of every managed resource, keyed `<type>.<name>`.

use crate::error::{ProviderError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".pingdom";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";
const LOCK_FILE: &str = "lock.json";

/// Every resource tracked for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    /// Resources indexed by `<type>.<name>`
    pub resources: BTreeMap<String, ResourceEntry>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            resources: BTreeMap::new(),
        }
    }
}

impl StateFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(resource_type: &str, name: &str) -> String {
        format!("{resource_type}.{name}")
    }

    pub fn get(&self, resource_type: &str, name: &str) -> Option<&ResourceEntry> {
        self.resources.get(&Self::key(resource_type, name))
    }

    /// Decode the stored attributes of a resource into its typed state
    pub fn get_typed<T: DeserializeOwned>(
        &self,
        resource_type: &str,
        name: &str,
    ) -> Result<Option<T>> {
        self.get(resource_type, name)
            .map(ResourceEntry::decode)
            .transpose()
    }

    /// Insert or replace a resource, keeping the original creation time
    pub fn set_typed<T: Serialize>(
        &mut self,
        resource_type: &str,
        name: &str,
        state: &T,
    ) -> Result<()> {
        let key = Self::key(resource_type, name);
        let attributes = serde_json::to_value(state)?;
        let now = Utc::now();

        match self.resources.get_mut(&key) {
            Some(entry) => {
                entry.attributes = attributes;
                entry.updated_at = now;
            }
            None => {
                self.resources.insert(
                    key,
                    ResourceEntry {
                        resource_type: resource_type.to_string(),
                        attributes,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn remove(&mut self, resource_type: &str, name: &str) -> Option<ResourceEntry> {
        let removed = self.resources.remove(&Self::key(resource_type, name));
        if removed.is_some() {
            self.updated_at = Utc::now();
        }
        removed
    }
}

/// Stored state of a single resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub resource_type: String,
    pub attributes: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceEntry {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.attributes.clone()).map_err(|e| {
            ProviderError::State(format!(
                "attributes of {} do not match its schema: {}",
                self.resource_type, e
            ))
        })
    }
}

/// Reads and writes the state file of one project
pub struct StateManager {
    project_root: PathBuf,
}

impl StateManager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    fn state_dir(&self) -> PathBuf {
        self.project_root.join(STATE_DIR)
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir().join(STATE_BACKUP)
    }

    fn lock_path(&self) -> PathBuf {
        self.state_dir().join(LOCK_FILE)
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        let dir = self.state_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created state directory: {}", dir.display());
        }
        Ok(())
    }

    /// Load the state file, or an empty state when none exists yet
    pub async fn load(&self) -> Result<StateFile> {
        let path = self.state_path();
        if !path.exists() {
            tracing::debug!("State file not found, returning empty state");
            return Ok(StateFile::new());
        }

        let content = fs::read_to_string(&path).await?;
        let state: StateFile = serde_json::from_str(&content)?;

        if state.version > STATE_VERSION {
            return Err(ProviderError::State(format!(
                "state file version {} is newer than supported version {}",
                state.version, STATE_VERSION
            )));
        }

        tracing::debug!("Loaded state with {} resources", state.resources.len());
        Ok(state)
    }

    /// Write the state file, moving the previous one to `state.json.backup`
    pub async fn save(&self, state: &StateFile) -> Result<()> {
        self.ensure_state_dir().await?;

        let path = self.state_path();
        if path.exists() {
            fs::rename(&path, self.backup_path()).await?;
            tracing::debug!("Created state backup");
        }

        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content).await?;

        tracing::debug!("Saved state with {} resources", state.resources.len());
        Ok(())
    }

    /// Take the advisory lock; a lock older than one hour is considered stale
    pub async fn acquire_lock(&self) -> Result<StateLock> {
        self.ensure_state_dir().await?;

        let lock_path = self.lock_path();
        if lock_path.exists() {
            let content = fs::read_to_string(&lock_path).await?;
            let holder: LockInfo = serde_json::from_str(&content)?;

            let age = Utc::now().signed_duration_since(holder.acquired_at);
            if age.num_hours() < 1 {
                return Err(ProviderError::Lock(format!(
                    "state is locked by {} (pid {}) since {}",
                    holder.holder, holder.pid, holder.acquired_at
                )));
            }

            tracing::warn!("Removing stale lock held by {}", holder.holder);
        }

        let info = LockInfo {
            holder: std::env::var("HOSTNAME")
                .or_else(|_| std::env::var("HOST"))
                .unwrap_or_else(|_| "unknown".to_string()),
            pid: std::process::id(),
            acquired_at: Utc::now(),
        };
        fs::write(&lock_path, serde_json::to_string_pretty(&info)?).await?;

        tracing::debug!("Acquired state lock");
        Ok(StateLock {
            lock_path,
            released: false,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    pid: u32,
    acquired_at: DateTime<Utc>,
}

/// Held state lock; removed on `release` or drop
pub struct StateLock {
    lock_path: PathBuf,
    released: bool,
}

impl StateLock {
    pub async fn release(mut self) -> Result<()> {
        if self.lock_path.exists() {
            fs::remove_file(&self.lock_path).await?;
            tracing::debug!("Released state lock");
        }
        self.released = true;
        Ok(())
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if !self.released && self.lock_path.exists() {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occurrence::{OccurrenceState, RESOURCE_TYPE};
    use tempfile::tempdir;

    fn sample_state() -> OccurrenceState {
        OccurrenceState {
            id: "a".repeat(32),
            maintenance_id: 42,
            effective_from: "2066-01-02T22:00:00+08:00".to_string(),
            effective_to: "2066-01-09T22:00:00+08:00".to_string(),
            from: "2066-01-02T14:00:00Z".to_string(),
            to: "2066-01-02T15:00:00Z".to_string(),
            size: 7,
        }
    }

    #[tokio::test]
    async fn test_state_save_load() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut state = StateFile::new();
        state
            .set_typed(RESOURCE_TYPE, "weekly", &sample_state())
            .unwrap();
        manager.save(&state).await.unwrap();

        let loaded = manager.load().await.unwrap();
        assert!(loaded.resources.contains_key("pingdom_occurrence.weekly"));
        let typed: OccurrenceState = loaded.get_typed(RESOURCE_TYPE, "weekly").unwrap().unwrap();
        assert_eq!(typed, sample_state());
    }

    #[tokio::test]
    async fn test_empty_state() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let state = manager.load().await.unwrap();
        assert!(state.resources.is_empty());
        assert!(state.get(RESOURCE_TYPE, "weekly").is_none());
    }

    #[tokio::test]
    async fn test_save_keeps_backup() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut state = StateFile::new();
        manager.save(&state).await.unwrap();
        state
            .set_typed(RESOURCE_TYPE, "weekly", &sample_state())
            .unwrap();
        manager.save(&state).await.unwrap();

        let backup = temp_dir.path().join(".pingdom/state.json.backup");
        let previous: StateFile =
            serde_json::from_str(&std::fs::read_to_string(backup).unwrap()).unwrap();
        assert!(previous.resources.is_empty());
    }

    #[tokio::test]
    async fn test_newer_version_rejected() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut state = StateFile::new();
        state.version = STATE_VERSION + 1;
        manager.save(&state).await.unwrap();

        assert!(matches!(manager.load().await, Err(ProviderError::State(_))));
    }

    #[test]
    fn test_set_typed_keeps_created_at() {
        let mut state = StateFile::new();
        state
            .set_typed(RESOURCE_TYPE, "weekly", &sample_state())
            .unwrap();
        let created = state.get(RESOURCE_TYPE, "weekly").unwrap().created_at;

        let mut changed = sample_state();
        changed.size = 3;
        state.set_typed(RESOURCE_TYPE, "weekly", &changed).unwrap();

        let entry = state.get(RESOURCE_TYPE, "weekly").unwrap();
        assert_eq!(entry.created_at, created);
        assert_eq!(entry.decode::<OccurrenceState>().unwrap().size, 3);
        assert!(state.remove(RESOURCE_TYPE, "weekly").is_some());
        assert!(state.remove(RESOURCE_TYPE, "weekly").is_none());
    }

    #[test]
    fn test_decode_schema_mismatch() {
        let mut state = StateFile::new();
        let malformed = serde_json::json!({"size": "many"});
        state
            .set_typed(RESOURCE_TYPE, "weekly", &malformed)
            .unwrap();
        let err = state
            .get_typed::<OccurrenceState>(RESOURCE_TYPE, "weekly")
            .unwrap_err();
        assert!(matches!(err, ProviderError::State(_)));
    }

    #[tokio::test]
    async fn test_lock_is_exclusive() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let lock = manager.acquire_lock().await.unwrap();
        assert!(matches!(
            manager.acquire_lock().await,
            Err(ProviderError::Lock(_))
        ));

        lock.release().await.unwrap();
        let again = manager.acquire_lock().await.unwrap();
        drop(again);
        assert!(!temp_dir.path().join(".pingdom/lock.json").exists());
    }

    #[tokio::test]
    async fn test_stale_lock_is_replaced() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());
        std::fs::create_dir_all(temp_dir.path().join(".pingdom")).unwrap();

        let stale = LockInfo {
            holder: "old-host".to_string(),
            pid: 1,
            acquired_at: Utc::now() - chrono::Duration::hours(2),
        };
        std::fs::write(
            temp_dir.path().join(".pingdom/lock.json"),
            serde_json::to_string(&stale).unwrap(),
        )
        .unwrap();

        assert!(manager.acquire_lock().await.is_ok());
    }
}
