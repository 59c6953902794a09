use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let w = area.width as usize;
        let style = theme::current().status;

        let left = if app.loading {
            " Refreshing... ".to_string()
        } else {
            format!(" {} reminder{} ", app.list.len(), if app.list.len() == 1 { "" } else { "s" })
        };

        // Status message wins over hints
        let right = if let Some(ref msg) = app.status_message {
            format!(" {} ", msg)
        } else if app.revealed.is_some() {
            " Enter:Delete  Esc/\u{2192}:Cancel ".to_string()
        } else if w >= 70 {
            " jk:Move  \u{2190}/x:Swipe  Enter:Detail  r:Refresh  ?:Help  q:Quit ".to_string()
        } else if w >= 40 {
            " jk:Move x:Swipe r:Refresh q:Quit ".to_string()
        } else {
            " ?:Help q:Quit ".to_string()
        };

        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right, style),
        ]);

        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}
