use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::config::DEFAULT_DATE_FORMAT;
use crate::reminder::{Applied, Reminder, ReminderList, ReminderStore, RequestId, StoreError};

/// Completion of a storage call started by the screen.
#[derive(Debug)]
pub enum Message {
    Fetched {
        request: RequestId,
        result: Result<Vec<Reminder>, StoreError>,
    },
    Deleted {
        id: String,
        result: Result<(), StoreError>,
    },
}

pub struct App {
    pub running: bool,
    pub focused: bool,
    pub loading: bool,
    pub list: ReminderList,
    pub selected: usize,
    /// Row whose delete action is showing
    pub revealed: Option<String>,
    pub show_help: bool,
    pub show_detail: bool,
    pub status_message: Option<String>,
    /// Last failed fetch, kept until a fetch succeeds
    pub load_error: Option<String>,
    /// Deletes sent to the store and not yet answered
    pub pending_deletes: HashSet<String>,
    pub date_format: String,
    store: Arc<dyn ReminderStore>,
    tx: UnboundedSender<Message>,
}

impl App {
    pub fn new(store: Arc<dyn ReminderStore>, tx: UnboundedSender<Message>) -> Self {
        Self {
            running: true,
            focused: false,
            loading: false,
            list: ReminderList::new(),
            selected: 0,
            revealed: None,
            show_help: false,
            show_detail: false,
            status_message: None,
            load_error: None,
            pending_deletes: HashSet::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            store,
            tx,
        }
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn selected_reminder(&self) -> Option<&Reminder> {
        self.list.reminders().get(self.selected)
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.as_deref() == Some(id)
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.pending_deletes.contains(id)
    }

    // ── focus ──

    pub fn on_focus(&mut self) {
        self.focused = true;
        self.refresh();
    }

    pub fn on_blur(&mut self) {
        self.focused = false;
        self.loading = false;
        self.revealed = None;
        self.list.invalidate();
    }

    // ── storage calls ──

    pub fn refresh(&mut self) {
        let request = self.list.begin_refresh();
        self.loading = true;

        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = store.get_reminders().await;
            let _ = tx.send(Message::Fetched { request, result });
        });
    }

    fn start_delete(&mut self, id: String) {
        tracing::info!(%id, "delete requested");
        self.pending_deletes.insert(id.clone());
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = store.delete_reminder(&id).await;
            let _ = tx.send(Message::Deleted { id, result });
        });
    }

    pub fn handle_message(&mut self, message: Message) {
        match message {
            Message::Fetched { request, result } => {
                let keep = self.selected_reminder().map(|r| r.id.clone());
                match self.list.apply_fetch(request, result) {
                    Ok(Applied::Current) => {
                        self.loading = false;
                        self.load_error = None;
                        self.reselect(keep.as_deref());
                    }
                    Ok(Applied::Stale) => {}
                    Err(e) => {
                        self.loading = false;
                        tracing::warn!("{}", e);
                        self.load_error = Some(e.to_string());
                        self.status_message = Some(e.to_string());
                    }
                }
            }
            Message::Deleted { id, result } => {
                self.pending_deletes.remove(&id);
                match result {
                    Ok(()) => {
                        self.status_message = Some("Reminder deleted".to_string());
                        self.refresh();
                    }
                    Err(e) => {
                        tracing::warn!(%id, "delete failed: {}", e);
                        self.status_message = Some(format!("Delete failed: {}", e));
                    }
                }
            }
        }
    }

    fn reselect(&mut self, id: Option<&str>) {
        if let Some(pos) = id.and_then(|id| self.list.position(id)) {
            self.selected = pos;
        } else {
            self.selected = self.selected.min(self.list.len().saturating_sub(1));
        }
        if let Some(id) = self.revealed.clone() {
            if self.list.get(&id).is_none() {
                self.revealed = None;
            }
        }
    }

    // ── row interaction ──

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.list.len() {
            self.selected += 1;
            self.revealed = None;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.revealed = None;
        }
    }

    /// Swipe the selected row open. A row already being deleted stays shut.
    pub fn reveal_delete(&mut self) {
        self.revealed = self
            .selected_reminder()
            .map(|r| r.id.clone())
            .filter(|id| !self.is_deleting(id));
    }

    pub fn close_reveal(&mut self) {
        self.revealed = None;
    }

    /// Tap the revealed delete action. Does nothing unless the selected row
    /// is open and no delete for it is in flight.
    pub fn confirm_delete(&mut self) {
        let Some(id) = self.selected_reminder().map(|r| r.id.clone()) else {
            return;
        };
        if !self.is_revealed(&id) || self.is_deleting(&id) {
            return;
        }
        self.revealed = None;
        self.start_delete(id);
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail && self.selected_reminder().is_some();
    }
}
