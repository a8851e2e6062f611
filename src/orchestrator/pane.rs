//! Per-pane request lifecycle: Idle -> Pending -> Settled.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneKind {
    Explanation,
    Execution,
}

impl PaneKind {
    pub fn title(self) -> &'static str {
        match self {
            PaneKind::Explanation => "AI Analysis",
            PaneKind::Execution => "Execution Output",
        }
    }

    /// Shown while a request for this pane is in flight.
    pub fn placeholder(self) -> &'static str {
        match self {
            PaneKind::Explanation => "Analyzing...",
            PaneKind::Execution => "Running...",
        }
    }
}

/// Identifies one issued request so only its own response can settle the pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Success(String),
    Failure(String),
}

impl Settled {
    pub fn text(&self) -> &str {
        match self {
            Settled::Success(s) | Settled::Failure(s) => s,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Settled::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneState {
    Idle,
    Pending { ticket: Ticket },
    Settled(Settled),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneEvent {
    Trigger,
    Resolve { ticket: Ticket, result: Settled },
}

#[derive(Debug, Clone)]
pub struct Pane {
    kind: PaneKind,
    state: PaneState,
    issued: u64,
}

impl Pane {
    pub fn new(kind: PaneKind) -> Self {
        Self { kind, state: PaneState::Idle, issued: 0 }
    }

    pub fn state(&self) -> &PaneState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, PaneState::Pending { .. })
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        match self.state {
            PaneState::Pending { ticket } => Some(ticket),
            _ => None,
        }
    }

    /// Apply `event`; returns whether it caused a transition.
    ///
    /// A trigger while Pending is ignored. A resolve is ignored unless its
    /// ticket matches the request currently in flight, so a superseded
    /// response can never overwrite a newer one.
    pub fn apply(&mut self, event: PaneEvent) -> bool {
        match (&self.state, event) {
            (PaneState::Pending { .. }, PaneEvent::Trigger) => false,
            (_, PaneEvent::Trigger) => {
                self.issued += 1;
                self.state = PaneState::Pending { ticket: Ticket(self.issued) };
                true
            }
            (PaneState::Pending { ticket: current }, PaneEvent::Resolve { ticket, result })
                if *current == ticket =>
            {
                self.state = PaneState::Settled(result);
                true
            }
            (_, PaneEvent::Resolve { .. }) => false,
        }
    }

    /// Start a request; `None` if one is already in flight.
    pub fn trigger(&mut self) -> Option<Ticket> {
        if self.apply(PaneEvent::Trigger) {
            self.pending_ticket()
        } else {
            None
        }
    }

    /// Text to render, or `None` when the pane has nothing to show.
    pub fn display_text(&self) -> Option<&str> {
        match &self.state {
            PaneState::Idle => None,
            PaneState::Pending { .. } => Some(self.kind.placeholder()),
            PaneState::Settled(result) => Some(result.text()),
        }
    }
}
