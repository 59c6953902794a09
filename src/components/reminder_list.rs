use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::reminder::Reminder;
use crate::theme;

pub const EMPTY_TEXT: &str = "No reminders yet. Run `reminders add` to create one!";
pub const LOADING_TEXT: &str = "Loading reminders...";
const DELETE_ACTION: &str = " Delete ";
const DELETING: &str = " Deleting... ";

pub struct ReminderListView;

impl ReminderListView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = theme::current();
        let reminders = app.list.reminders();
        let loaded = app.list.is_loaded();

        let title = if area.width >= 30 && loaded {
            format!(" Manage Reminders ({}) ", reminders.len())
        } else {
            " Manage Reminders ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(if app.focused { theme.border } else { theme.dim });

        if reminders.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let text = placeholder(loaded, app.loading, app.load_error.as_deref());
            let msg = Paragraph::new(text)
                .style(theme.dim)
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = reminders
            .iter()
            .enumerate()
            .map(|(i, reminder)| {
                let action = if app.is_deleting(&reminder.id) {
                    Some(DELETING)
                } else if app.is_revealed(&reminder.id) {
                    Some(DELETE_ACTION)
                } else {
                    None
                };
                row(reminder, i == app.selected, action, inner_w, &app.date_format)
            })
            .collect();

        let list = List::new(items).block(block);
        let mut state = ListState::default().with_selected(Some(app.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

/// Text shown in place of an empty list. Only a pending first load reads as
/// loading; a failed one keeps its error on screen.
pub fn placeholder(loaded: bool, loading: bool, load_error: Option<&str>) -> String {
    if loaded {
        EMPTY_TEXT.to_string()
    } else if loading {
        LOADING_TEXT.to_string()
    } else if let Some(err) = load_error {
        format!("Could not load reminders: {}. Press r to retry.", err)
    } else {
        "Reminders not loaded. Press r to refresh.".to_string()
    }
}

fn row(
    reminder: &Reminder,
    is_selected: bool,
    action: Option<&'static str>,
    width: usize,
    date_format: &str,
) -> ListItem<'static> {
    let theme = theme::current();

    let marker = if is_selected { "> " } else { "  " };
    let title_style = if is_selected {
        theme.selected
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    // An open row gives up the right edge to its delete action.
    let action_w = action.map_or(0, str::len);
    let title_w = width.saturating_sub(marker.len() + action_w);
    let title = truncate(&reminder.title, title_w);

    let mut first = vec![
        Span::raw(marker),
        Span::styled(title.clone(), title_style),
    ];
    if let Some(label) = action {
        let style = if label == DELETING { theme.dim } else { theme.danger };
        let pad = title_w.saturating_sub(title.chars().count());
        first.push(Span::raw(" ".repeat(pad)));
        first.push(Span::styled(label, style));
    }

    let mut lines = vec![
        Line::from(first),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("Due: {}", reminder.due_display(date_format)),
                theme.dim,
            ),
        ]),
    ];

    if let Some(recurrence) = &reminder.recurrence {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(recurrence.label(), theme.tag),
        ]));
    }
    lines.push(Line::from(""));

    ListItem::new(lines)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}
