//! Client-side orchestration: the snippet, the selected language and two independent result panes.

pub mod pane;
pub mod requests;

pub use pane::{Pane, PaneEvent, PaneKind, PaneState, Settled, Ticket};
pub use requests::{Dispatcher, ExplainClient};

use crate::language::Language;

/// Snapshot of the inputs taken when a request is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub kind: PaneKind,
    pub ticket: Ticket,
    pub code: String,
    pub language: Language,
}

#[derive(Debug, Clone)]
pub struct Orchestrator {
    snippet: String,
    language: Language,
    explanation: Pane,
    execution: Pane,
}

impl Orchestrator {
    pub fn new(language: Language) -> Self {
        Self {
            snippet: String::new(),
            language,
            explanation: Pane::new(PaneKind::Explanation),
            execution: Pane::new(PaneKind::Execution),
        }
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn set_snippet(&mut self, snippet: impl Into<String>) {
        self.snippet = snippet.into();
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn pane(&self, kind: PaneKind) -> &Pane {
        match kind {
            PaneKind::Explanation => &self.explanation,
            PaneKind::Execution => &self.execution,
        }
    }

    fn pane_mut(&mut self, kind: PaneKind) -> &mut Pane {
        match kind {
            PaneKind::Explanation => &mut self.explanation,
            PaneKind::Execution => &mut self.execution,
        }
    }

    /// Whether the trigger for `kind` is enabled.
    pub fn can_trigger(&self, kind: PaneKind) -> bool {
        !self.snippet.trim().is_empty() && !self.pane(kind).is_pending()
    }

    /// Move the pane to Pending and hand back what must be sent, or `None` if the trigger is disabled.
    pub fn begin(&mut self, kind: PaneKind) -> Option<PendingRequest> {
        if !self.can_trigger(kind) {
            return None;
        }
        let ticket = self.pane_mut(kind).trigger()?;
        Some(PendingRequest {
            kind,
            ticket,
            code: self.snippet.clone(),
            language: self.language,
        })
    }

    /// Deliver a response; returns false if it belonged to a superseded request.
    pub fn settle(&mut self, kind: PaneKind, ticket: Ticket, result: Settled) -> bool {
        self.pane_mut(kind).apply(PaneEvent::Resolve { ticket, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_code(code: &str) -> Orchestrator {
        let mut orch = Orchestrator::new(Language::Python);
        orch.set_snippet(code);
        orch
    }

    #[test]
    fn blank_snippet_disables_both_triggers() {
        let mut orch = with_code("  \n\t");
        assert!(!orch.can_trigger(PaneKind::Explanation));
        assert!(!orch.can_trigger(PaneKind::Execution));
        assert!(orch.begin(PaneKind::Explanation).is_none());
        assert!(orch.begin(PaneKind::Execution).is_none());
        assert_eq!(orch.pane(PaneKind::Explanation).state(), &PaneState::Idle);
    }

    #[test]
    fn begin_snapshots_code_and_language() {
        let mut orch = with_code("print('hi')");
        let req = orch.begin(PaneKind::Execution).unwrap();
        assert_eq!(req.code, "print('hi')");
        assert_eq!(req.language, Language::Python);

        orch.set_snippet("changed");
        orch.set_language(Language::C);
        assert_eq!(req.code, "print('hi')");
    }

    #[test]
    fn panes_are_independent() {
        let mut orch = with_code("print('hi')");
        let explain = orch.begin(PaneKind::Explanation).unwrap();
        assert!(!orch.can_trigger(PaneKind::Explanation));
        assert!(orch.can_trigger(PaneKind::Execution));

        let run = orch.begin(PaneKind::Execution).unwrap();
        assert!(orch.settle(PaneKind::Execution, run.ticket, Settled::Success("hi\n".into())));
        assert!(orch.pane(PaneKind::Explanation).is_pending());

        assert!(orch.settle(
            PaneKind::Explanation,
            explain.ticket,
            Settled::Failure("Network error occurred".into())
        ));
        assert_eq!(orch.pane(PaneKind::Execution).display_text(), Some("hi\n"));
    }
}
