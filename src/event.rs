use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use crate::app::{App, AppEvent};

/// How often background results and notice expiry are checked.
pub const TICK_RATE: Duration = Duration::from_millis(250);

/// Waits up to `timeout` for a key press; anything else becomes a tick.
pub fn next_event(timeout: Duration) -> Result<AppEvent> {
    if !event::poll(timeout)? {
        return Ok(AppEvent::Tick);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(AppEvent::KeyPress(key.code)),
        _ => Ok(AppEvent::Tick),
    }
}

/// Runs the main event loop until the app stops.
pub fn run(app: &mut App, terminal: &mut crate::tui::Terminal) -> Result<()> {
    while app.running {
        terminal.draw(|frame| crate::ui::draw(frame, app))?;

        let event = next_event(TICK_RATE)?;
        let was_key = matches!(event, AppEvent::KeyPress(_));
        app.update(event);
        // Key presses arriving faster than the tick rate must not starve the loader.
        if was_key {
            app.update(AppEvent::Tick);
        }
    }
    Ok(())
}
