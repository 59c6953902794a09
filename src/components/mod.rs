pub mod detail;
pub mod reminder_list;
pub mod status_bar;

pub use detail::render_detail_popup;
pub use reminder_list::ReminderListView;
pub use status_bar::StatusBar;
