use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use super::reminder::Reminder;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reminder not found: {0}")]
    NotFound(String),

    #[error("reminder already exists: {0}")]
    Duplicate(String),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Storage backing the reminder list. Implementations return reminders in
/// storage order; ordering for display is the caller's concern.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn get_reminders(&self) -> Result<Vec<Reminder>, StoreError>;

    async fn delete_reminder(&self, id: &str) -> Result<(), StoreError>;

    async fn save_reminder(&self, reminder: Reminder) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    reminders: Vec<Reminder>,
}

/// TOML-file store. A missing file reads as an empty store.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreFile, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    async fn persist(&self, file: &StoreFile) -> Result<(), StoreError> {
        let content = toml::to_string_pretty(file)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("toml.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ReminderStore for FileStore {
    async fn get_reminders(&self) -> Result<Vec<Reminder>, StoreError> {
        Ok(self.load().await?.reminders)
    }

    async fn delete_reminder(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.load().await?;

        let before = file.reminders.len();
        file.reminders.retain(|r| r.id != id);
        if file.reminders.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }

        self.persist(&file).await?;
        tracing::info!(id, path = %self.path.display(), "deleted reminder");
        Ok(())
    }

    async fn save_reminder(&self, reminder: Reminder) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.load().await?;

        if file.reminders.iter().any(|r| r.id == reminder.id) {
            return Err(StoreError::Duplicate(reminder.id));
        }

        tracing::info!(id = %reminder.id, title = %reminder.title, "saved reminder");
        file.reminders.push(reminder);
        self.persist(&file).await
    }
}
