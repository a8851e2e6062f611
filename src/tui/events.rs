//! Custom event types for TUI application.

use crossterm::event::KeyEvent;

use crate::orchestrator::{PaneKind, Settled, Ticket};

/// Events that can occur in the TUI application
#[derive(Debug)]
pub enum TuiEvent {
    /// User keyboard input
    Key(KeyEvent),
    /// Bracketed paste content
    Paste(String),
    /// Terminal was resized; redraw
    Resize,
    /// Terminal input failed; the loop should exit
    InputLost,
    /// A request finished and its pane can settle
    Settled {
        kind: PaneKind,
        ticket: Ticket,
        result: Settled,
    },
}
