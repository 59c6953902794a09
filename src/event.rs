use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Key(KeyEvent),
    FocusGained,
    FocusLost,
}

pub fn poll_event(timeout: Duration) -> color_eyre::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Next key press or focus change. Other events (resize, mouse, key
/// releases) are skipped; a redraw follows anyway.
pub fn next_input(timeout: Duration) -> color_eyre::Result<Option<Input>> {
    loop {
        match poll_event(timeout)? {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                return Ok(Some(Input::Key(key)))
            }
            Some(Event::FocusGained) => return Ok(Some(Input::FocusGained)),
            Some(Event::FocusLost) => return Ok(Some(Input::FocusLost)),
            Some(_) => continue,
            None => return Ok(None),
        }
    }
}
