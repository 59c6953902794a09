use thiserror::Error;

use super::reminder::Reminder;
use super::store::{ReminderStore, StoreError};

#[derive(Debug, Error)]
pub enum ListError {
    #[error("failed to load reminders: {0}")]
    Fetch(#[source] StoreError),

    #[error("failed to delete reminder {id}: {source}")]
    Delete {
        id: String,
        #[source]
        source: StoreError,
    },
}

/// Tag carried by a fetch so its result can be matched against the newest
/// request when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Unloaded,
    Loaded(Vec<Reminder>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

/// Sorted, non-persisted projection of whatever the store last returned.
///
/// Only the most recently issued request may replace the view state; results
/// of older requests, or of requests retired by [`ReminderList::invalidate`],
/// are discarded.
#[derive(Debug, Default)]
pub struct ReminderList {
    state: ViewState,
    issued: u64,
}

impl ReminderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reminders(&self) -> &[Reminder] {
        match &self.state {
            ViewState::Loaded(reminders) => reminders,
            ViewState::Unloaded => &[],
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ViewState::Loaded(_))
    }

    /// Empty-state condition: loaded, and nothing to show.
    pub fn is_empty(&self) -> bool {
        self.is_loaded() && self.reminders().is_empty()
    }

    pub fn len(&self) -> usize {
        self.reminders().len()
    }

    pub fn get(&self, id: &str) -> Option<&Reminder> {
        self.reminders().iter().find(|r| r.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.reminders().iter().position(|r| r.id == id)
    }

    pub fn begin_refresh(&mut self) -> RequestId {
        self.issued += 1;
        tracing::debug!(request = self.issued, "refresh issued");
        RequestId(self.issued)
    }

    /// Retire every outstanding request.
    pub fn invalidate(&mut self) {
        self.issued += 1;
        tracing::debug!(request = self.issued, "outstanding refreshes invalidated");
    }

    pub fn is_current(&self, request: RequestId) -> bool {
        request.0 == self.issued
    }

    /// Apply a fetch result. Failures of the current request leave the
    /// previous view state untouched.
    pub fn apply_fetch(
        &mut self,
        request: RequestId,
        result: Result<Vec<Reminder>, StoreError>,
    ) -> Result<Applied, ListError> {
        if !self.is_current(request) {
            tracing::debug!(request = request.0, latest = self.issued, "discarding stale fetch");
            return Ok(Applied::Stale);
        }

        let reminders = result.map_err(ListError::Fetch)?;
        self.state = ViewState::Loaded(sort_by_due(reminders));
        Ok(Applied::Current)
    }

    pub async fn refresh(&mut self, store: &dyn ReminderStore) -> Result<&[Reminder], ListError> {
        let request = self.begin_refresh();
        let result = store.get_reminders().await;
        self.apply_fetch(request, result)?;
        Ok(self.reminders())
    }

    /// Delete, wait for the store to confirm, then refresh. On a failed delete
    /// nothing is refreshed and the row stays.
    pub async fn request_delete(
        &mut self,
        store: &dyn ReminderStore,
        id: &str,
    ) -> Result<&[Reminder], ListError> {
        store
            .delete_reminder(id)
            .await
            .map_err(|source| ListError::Delete {
                id: id.to_string(),
                source,
            })?;
        self.refresh(store).await
    }
}

/// Ascending by due date; equal timestamps keep storage order.
pub fn sort_by_due(mut reminders: Vec<Reminder>) -> Vec<Reminder> {
    reminders.sort_by_key(|r| r.due_date);
    reminders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::memory::MemoryStore;
    use crate::reminder::reminder::parse_due_date;

    fn reminder(id: &str, due: &str) -> Reminder {
        Reminder {
            id: id.to_string(),
            title: id.to_uppercase(),
            due_date: parse_due_date(due).unwrap(),
            recurrence: None,
        }
    }

    fn ids(reminders: &[Reminder]) -> Vec<&str> {
        reminders.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn refresh_sorts_ascending_by_due_date() {
        let store = MemoryStore::with(vec![
            reminder("a", "2024-01-02"),
            reminder("b", "2024-01-01"),
        ]);
        let mut list = ReminderList::new();

        let loaded = list.refresh(&store).await.unwrap();
        assert_eq!(ids(loaded), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn refresh_keeps_storage_order_for_ties() {
        let store = MemoryStore::with(vec![
            reminder("late", "2024-05-01"),
            reminder("x", "2024-01-01T08:00:00Z"),
            reminder("y", "2024-01-01T08:00:00Z"),
            reminder("early", "2023-12-31"),
            reminder("z", "2024-01-01T08:00:00Z"),
        ]);
        let mut list = ReminderList::new();

        let loaded = list.refresh(&store).await.unwrap();
        assert_eq!(ids(loaded), vec!["early", "x", "y", "z", "late"]);
    }

    #[tokio::test]
    async fn empty_storage_gives_empty_state() {
        let store = MemoryStore::default();
        let mut list = ReminderList::new();
        assert!(!list.is_empty(), "unloaded is not the empty state");

        assert!(list.refresh(&store).await.unwrap().is_empty());
        assert!(list.is_loaded());
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[tokio::test]
    async fn refresh_twice_is_idempotent() {
        let store = MemoryStore::with(vec![
            reminder("c", "2024-03-01"),
            reminder("a", "2024-01-01"),
            reminder("b", "2024-02-01"),
        ]);
        let mut list = ReminderList::new();

        let first = list.refresh(&store).await.unwrap().to_vec();
        let second = list.refresh(&store).await.unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn request_delete_deletes_then_refreshes() {
        let store = MemoryStore::with(vec![
            reminder("a", "2024-01-02"),
            reminder("b", "2024-01-01"),
        ]);
        let mut list = ReminderList::new();
        list.refresh(&store).await.unwrap();

        let after = list.request_delete(&store, "b").await.unwrap();
        assert_eq!(ids(after), vec!["a"]);
        assert_eq!(
            store.calls(),
            vec!["get".to_string(), "delete:b".to_string(), "get".to_string()]
        );
    }

    #[tokio::test]
    async fn deleted_reminder_is_gone_from_next_fetch() {
        let store = MemoryStore::with(vec![
            reminder("a", "2024-01-02"),
            reminder("b", "2024-01-01"),
            reminder("c", "2024-01-03"),
        ]);
        let mut list = ReminderList::new();
        let loaded: Vec<String> = list
            .refresh(&store)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect();

        for id in loaded {
            list.request_delete(&store, &id).await.unwrap();
            assert!(list.get(&id).is_none());
            let mut fresh = ReminderList::new();
            assert!(fresh.refresh(&store).await.unwrap().iter().all(|r| r.id != id));
        }
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn failed_delete_keeps_row_and_skips_refresh() {
        let store = MemoryStore::with(vec![reminder("a", "2024-01-02")]);
        let mut list = ReminderList::new();
        list.refresh(&store).await.unwrap();
        store.fail_deletes(true);

        let err = list.request_delete(&store, "a").await.unwrap_err();
        assert!(matches!(err, ListError::Delete { ref id, .. } if id == "a"));
        assert_eq!(ids(list.reminders()), vec!["a"]);
        assert_eq!(store.calls(), vec!["get".to_string(), "delete:a".to_string()]);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_propagates_not_found() {
        let store = MemoryStore::with(vec![reminder("a", "2024-01-02")]);
        let mut list = ReminderList::new();

        let err = list.request_delete(&store, "nope").await.unwrap_err();
        assert!(matches!(
            err,
            ListError::Delete { source: StoreError::NotFound(_), .. }
        ));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_state() {
        let store = MemoryStore::with(vec![reminder("a", "2024-01-02")]);
        let mut list = ReminderList::new();
        list.refresh(&store).await.unwrap();
        store.fail_gets(true);

        let err = list.refresh(&store).await.unwrap_err();
        assert!(matches!(err, ListError::Fetch(_)));
        assert_eq!(ids(list.reminders()), vec!["a"]);
    }

    #[test]
    fn older_request_is_discarded() {
        let mut list = ReminderList::new();
        let first = list.begin_refresh();
        let second = list.begin_refresh();

        let applied = list
            .apply_fetch(second, Ok(vec![reminder("new", "2024-01-01")]))
            .unwrap();
        assert_eq!(applied, Applied::Current);

        let applied = list
            .apply_fetch(first, Ok(vec![reminder("old", "2024-01-01")]))
            .unwrap();
        assert_eq!(applied, Applied::Stale);
        assert_eq!(ids(list.reminders()), vec!["new"]);
    }

    #[test]
    fn stale_failure_is_not_reported() {
        let mut list = ReminderList::new();
        let first = list.begin_refresh();
        list.begin_refresh();

        let applied = list
            .apply_fetch(first, Err(StoreError::NotFound("x".to_string())))
            .unwrap();
        assert_eq!(applied, Applied::Stale);
        assert!(!list.is_loaded());
    }

    #[test]
    fn invalidate_retires_outstanding_requests() {
        let mut list = ReminderList::new();
        let pending = list.begin_refresh();
        list.invalidate();

        let applied = list
            .apply_fetch(pending, Ok(vec![reminder("a", "2024-01-01")]))
            .unwrap();
        assert_eq!(applied, Applied::Stale);
        assert!(!list.is_loaded());
    }

    #[test]
    fn position_tracks_sorted_order() {
        let mut list = ReminderList::new();
        let request = list.begin_refresh();
        list.apply_fetch(
            request,
            Ok(vec![reminder("a", "2024-01-02"), reminder("b", "2024-01-01")]),
        )
        .unwrap();

        assert_eq!(list.position("b"), Some(0));
        assert_eq!(list.position("a"), Some(1));
        assert_eq!(list.position("c"), None);
    }
}
