//! Printers for one-shot output: plain colored text and markdown (termimad).

use owo_colors::OwoColorize;
use termimad::MadSkin;

use crate::orchestrator::Settled;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Output,
    Failure,
    Plain,
}

pub struct TextPrinter {
    pub tone: Tone,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        match self.tone {
            Tone::Output => print!("{}", text.green()),
            Tone::Failure => eprint!("{}", text.red()),
            Tone::Plain => print!("{}", text),
        }
        if !text.ends_with('\n') {
            match self.tone {
                Tone::Failure => eprintln!(),
                _ => println!(),
            }
        }
    }
}

pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default() }
    }
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) {
        self.skin.print_text(text);
        println!();
    }
}

/// Print a settled pane result; success text rendered as markdown when requested.
pub fn print_settled(result: &Settled, markdown: bool, success_tone: Tone) {
    match result {
        Settled::Success(text) if markdown => MarkdownPrinter::default().print(text),
        Settled::Success(text) => TextPrinter { tone: success_tone }.print(text),
        Settled::Failure(text) => TextPrinter { tone: Tone::Failure }.print(text),
    }
}
