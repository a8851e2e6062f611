//! TUI application state management.

use unicode_width::UnicodeWidthChar;

use crate::{
    language::Language,
    orchestrator::{Orchestrator, PaneKind, PendingRequest, Settled, Ticket},
};

/// Multi-line text buffer with a (row, char column) cursor.
#[derive(Debug, Clone)]
pub struct Editor {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self { lines: vec![String::new()], row: 0, col: 0 }
    }
}

impl Editor {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Terminal column of the cursor within its line.
    pub fn cursor_display_col(&self) -> usize {
        self.lines[self.row]
            .chars()
            .take(self.col)
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    fn byte_index(&self) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(self.col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn line_chars(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }
        let idx = self.byte_index();
        self.lines[self.row].insert(idx, c);
        self.col += 1;
    }

    /// Insert pasted text, normalizing CRLF and expanding tabs to four spaces.
    pub fn insert_str(&mut self, text: &str) {
        let normalized = text
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\t', "    ");
        for (i, segment) in normalized.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            let idx = self.byte_index();
            self.lines[self.row].insert_str(idx, segment);
            self.col += segment.chars().count();
        }
    }

    pub fn newline(&mut self) {
        let idx = self.byte_index();
        let rest = self.lines[self.row].split_off(idx);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let idx = self.byte_index();
            self.lines[self.row].remove(idx);
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_chars(self.row);
            self.lines[self.row].push_str(&current);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_chars(self.row) {
            let idx = self.byte_index();
            self.lines[self.row].remove(idx);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_chars(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_chars(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_chars(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_chars(self.row));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_chars(self.row);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Application state for the TUI
#[derive(Debug)]
pub struct App {
    /// Request lifecycle for both panes
    pub orchestrator: Orchestrator,
    /// Code being edited
    pub editor: Editor,
    /// Pane that receives scroll keys
    pub focus: PaneKind,
    pub explanation_scroll: u16,
    pub execution_scroll: u16,
    /// Where explanation requests are sent
    pub endpoint: String,
    pub show_help: bool,
}

impl App {
    pub fn new(language: Language, endpoint: String) -> Self {
        Self {
            orchestrator: Orchestrator::new(language),
            editor: Editor::default(),
            focus: PaneKind::Explanation,
            explanation_scroll: 0,
            execution_scroll: 0,
            endpoint,
            show_help: false,
        }
    }

    /// Apply an editing action and keep the orchestrator's snippet in sync.
    pub fn edit(&mut self, f: impl FnOnce(&mut Editor)) {
        f(&mut self.editor);
        self.orchestrator.set_snippet(self.editor.text());
    }

    pub fn cycle_language(&mut self) {
        let next = self.orchestrator.language().next();
        self.orchestrator.set_language(next);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            PaneKind::Explanation => PaneKind::Execution,
            PaneKind::Execution => PaneKind::Explanation,
        };
    }

    pub fn scroll(&self, kind: PaneKind) -> u16 {
        match kind {
            PaneKind::Explanation => self.explanation_scroll,
            PaneKind::Execution => self.execution_scroll,
        }
    }

    fn scroll_mut(&mut self, kind: PaneKind) -> &mut u16 {
        match kind {
            PaneKind::Explanation => &mut self.explanation_scroll,
            PaneKind::Execution => &mut self.execution_scroll,
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        let s = self.scroll_mut(self.focus);
        *s = s.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let s = self.scroll_mut(self.focus);
        *s = s.saturating_add(lines);
    }

    /// Start a request for `kind` if its trigger is enabled.
    pub fn begin(&mut self, kind: PaneKind) -> Option<PendingRequest> {
        let req = self.orchestrator.begin(kind)?;
        *self.scroll_mut(kind) = 0;
        self.focus = kind;
        Some(req)
    }

    pub fn settle(&mut self, kind: PaneKind, ticket: Ticket, result: Settled) -> bool {
        self.orchestrator.settle(kind, ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_newlines_build_text() {
        let mut ed = Editor::default();
        for c in "print(1)".chars() {
            ed.insert_char(c);
        }
        ed.newline();
        ed.insert_str("x = 2");
        assert_eq!(ed.text(), "print(1)\nx = 2");
        assert_eq!(ed.cursor(), (1, 5));
    }

    #[test]
    fn backspace_at_line_start_joins_lines() {
        let mut ed = Editor::default();
        ed.insert_str("ab\ncd");
        ed.move_home();
        ed.backspace();
        assert_eq!(ed.text(), "abcd");
        assert_eq!(ed.cursor(), (0, 2));
    }

    #[test]
    fn paste_normalizes_crlf_and_tabs() {
        let mut ed = Editor::default();
        ed.insert_str("if x:\r\n\treturn 1");
        assert_eq!(ed.text(), "if x:\n    return 1");
    }

    #[test]
    fn large_paste_splices_into_current_line() {
        let mut ed = Editor::default();
        ed.insert_str("()");
        ed.move_left();
        let body = "x".repeat(200_000);
        let started = std::time::Instant::now();
        ed.insert_str(&body);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(ed.lines()[0].len(), 200_002);
        assert_eq!(ed.cursor(), (0, 200_001));

        ed.insert_str("a\nb\n");
        assert_eq!(ed.lines().len(), 3);
        assert_eq!(ed.lines()[2], ")");
        assert_eq!(ed.cursor(), (2, 0));
    }

    #[test]
    fn multibyte_chars_edit_cleanly() {
        let mut ed = Editor::default();
        ed.insert_str("héllo");
        ed.move_left();
        ed.move_left();
        ed.move_left();
        ed.backspace();
        assert_eq!(ed.text(), "hllo");
        ed.insert_str("日");
        assert_eq!(ed.text(), "h日llo");
        assert_eq!(ed.cursor_display_col(), 3);
    }

    #[test]
    fn delete_at_line_end_pulls_next_line() {
        let mut ed = Editor::default();
        ed.insert_str("a\nb");
        ed.move_up();
        ed.move_end();
        ed.delete();
        assert_eq!(ed.text(), "ab");
    }

    #[test]
    fn edits_sync_snippet_and_gate_triggers() {
        let mut app = App::new(Language::Python, "http://127.0.0.1:1/api".into());
        assert!(app.begin(PaneKind::Explanation).is_none());

        app.edit(|e| e.insert_str("print('hi')"));
        assert_eq!(app.orchestrator.snippet(), "print('hi')");

        let req = app.begin(PaneKind::Execution).unwrap();
        assert_eq!(app.focus, PaneKind::Execution);
        assert!(app.begin(PaneKind::Execution).is_none());
        assert!(app.settle(PaneKind::Execution, req.ticket, Settled::Success("hi\n".into())));
    }

    #[test]
    fn language_cycles() {
        let mut app = App::new(Language::Cpp, String::new());
        app.cycle_language();
        assert_eq!(app.orchestrator.language(), Language::JavaScript);
    }
}
