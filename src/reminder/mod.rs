pub mod list;
#[cfg(test)]
pub mod memory;
pub mod reminder;
pub mod store;

pub use list::{Applied, ReminderList, RequestId};
pub use reminder::{parse_due_date, Recurrence, Reminder};
pub use store::{FileStore, ReminderStore, StoreError};
