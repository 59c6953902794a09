use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::reminder::Reminder;
use crate::theme;

pub fn render_detail_popup(frame: &mut Frame, area: Rect, reminder: &Reminder, date_format: &str) {
    let theme = theme::current();

    let popup_w = area.width.clamp(30, 60).min(area.width);
    let popup_h = area.height.clamp(8, 12).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", reminder.title))
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(theme.border);

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let repeat = reminder
        .recurrence
        .map(|r| r.label())
        .unwrap_or_else(|| "does not repeat".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled("Due:    ", theme.dim),
            Span::styled(reminder.due_display(date_format), Style::default()),
        ]),
        Line::from(vec![
            Span::styled("Repeat: ", theme.dim),
            Span::styled(repeat, theme.tag),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Id:     ", theme.dim),
            Span::styled(reminder.id.clone(), theme.dim),
        ]),
        Line::from(""),
        Line::from(Span::styled("Esc to close", theme.dim)),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
