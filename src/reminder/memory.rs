use std::io;
use std::sync::Mutex;

use async_trait::async_trait;

use super::reminder::Reminder;
use super::store::{ReminderStore, StoreError};

/// In-memory store for tests. Records every call as `get`, `delete:<id>` or
/// `save:<id>` and can be switched into failing mode per operation.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    reminders: Vec<Reminder>,
    calls: Vec<String>,
    fail_gets: bool,
    fail_deletes: bool,
}

impl MemoryStore {
    pub fn with(reminders: Vec<Reminder>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                reminders,
                ..Inner::default()
            }),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn fail_gets(&self, fail: bool) {
        self.inner.lock().unwrap().fail_gets = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_deletes = fail;
    }
}

fn unavailable() -> StoreError {
    StoreError::Io(io::Error::other("storage unavailable"))
}

#[async_trait]
impl ReminderStore for MemoryStore {
    async fn get_reminders(&self) -> Result<Vec<Reminder>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("get".to_string());
        if inner.fail_gets {
            return Err(unavailable());
        }
        Ok(inner.reminders.clone())
    }

    async fn delete_reminder(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("delete:{}", id));
        if inner.fail_deletes {
            return Err(unavailable());
        }
        let before = inner.reminders.len();
        inner.reminders.retain(|r| r.id != id);
        if inner.reminders.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn save_reminder(&self, reminder: Reminder) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("save:{}", reminder.id));
        if inner.reminders.iter().any(|r| r.id == reminder.id) {
            return Err(StoreError::Duplicate(reminder.id));
        }
        inner.reminders.push(reminder);
        Ok(())
    }
}
