//! Async event loop for the terminal UI.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    explain::Explainer,
    language::Language,
    orchestrator::{Dispatcher, PaneKind},
    server::{self, EXPLAIN_ROUTE},
};
use super::{app::App, events::TuiEvent, ui::render_ui};

/// What a key press asks the loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    Trigger(PaneKind),
}

/// Run the TUI. Without `endpoint`, an embedded explanation server is started on localhost.
pub async fn run_tui(cfg: &Config, endpoint: Option<String>, language: Language) -> Result<()> {
    // Check if we're in a proper terminal environment
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!("TUI mode requires a proper terminal environment"));
    }

    let endpoint = match endpoint {
        Some(url) => url,
        None => spawn_embedded_server(cfg).await?,
    };
    info!(%endpoint, "explanation endpoint");
    let dispatcher = Dispatcher::from_config(cfg, endpoint.clone())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(language, endpoint);
    let (event_tx, event_rx) = mpsc::unbounded_channel::<TuiEvent>();

    let result = run_app(&mut terminal, &mut app, dispatcher, event_tx, event_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableBracketedPaste)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn spawn_embedded_server(cfg: &Config) -> Result<String> {
    let explainer = Explainer::from_config(cfg)?;
    let app = server::create_app(explainer);
    let (listener, addr) = server::bind("127.0.0.1:0").await?;
    tokio::spawn(async move {
        if let Err(e) = server::run_server(app, listener).await {
            tracing::error!(error = %e, "embedded explanation server stopped");
        }
    });
    Ok(format!("http://{addr}{EXPLAIN_ROUTE}"))
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: Dispatcher,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
    mut event_rx: mpsc::UnboundedReceiver<TuiEvent>,
) -> Result<()> {
    // Spawn input handler
    let input_tx = event_tx.clone();
    tokio::task::spawn_blocking(move || loop {
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => {}
            Ok(false) => {
                if input_tx.is_closed() {
                    break;
                }
                continue;
            }
            Err(e) => {
                warn!(error = %e, "terminal poll failed");
                let _ = input_tx.send(TuiEvent::InputLost);
                break;
            }
        }
        if !forward_input(event::read(), &input_tx) {
            break;
        }
    });

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        let Some(tui_event) = event_rx.recv().await else {
            break;
        };
        match tui_event {
            TuiEvent::Key(key) => match handle_key_event(app, key) {
                KeyAction::Quit => break,
                KeyAction::Trigger(kind) => start_request(app, kind, &dispatcher, &event_tx),
                KeyAction::None => {}
            },
            TuiEvent::Paste(text) => app.edit(|e| e.insert_str(&text)),
            TuiEvent::Resize => {}
            TuiEvent::InputLost => break,
            TuiEvent::Settled { kind, ticket, result } => {
                if !app.settle(kind, ticket, result) {
                    debug!(?kind, %ticket, "dropped response for superseded request");
                }
            }
        }
    }

    Ok(())
}

/// Forward one terminal read to the loop. Returns false once input should stop.
fn forward_input(read: io::Result<Event>, tx: &mpsc::UnboundedSender<TuiEvent>) -> bool {
    let sent = match read {
        Ok(Event::Key(key)) => tx.send(TuiEvent::Key(key)),
        Ok(Event::Paste(text)) => tx.send(TuiEvent::Paste(text)),
        Ok(Event::Resize(_, _)) => tx.send(TuiEvent::Resize),
        Ok(_) => Ok(()),
        Err(e) => {
            warn!(error = %e, "terminal read failed");
            let _ = tx.send(TuiEvent::InputLost);
            return false;
        }
    };
    sent.is_ok()
}

/// Move the pane to Pending and run its request on a separate task so the other pane is never blocked.
fn start_request(
    app: &mut App,
    kind: PaneKind,
    dispatcher: &Dispatcher,
    event_tx: &mpsc::UnboundedSender<TuiEvent>,
) {
    let Some(req) = app.begin(kind) else {
        return;
    };
    debug!(?kind, ticket = %req.ticket, language = %req.language, "request started");
    let dispatcher = dispatcher.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = dispatcher.perform(&req).await;
        let _ = tx.send(TuiEvent::Settled {
            kind: req.kind,
            ticket: req.ticket,
            result,
        });
    });
}

/// Handle keyboard events
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
            app.toggle_help();
        }
        return KeyAction::None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return KeyAction::Quit,
        KeyCode::Char('l') if ctrl => app.edit(|e| e.clear()),
        KeyCode::F(1) => app.toggle_help(),
        KeyCode::F(2) => return KeyAction::Trigger(PaneKind::Explanation),
        KeyCode::F(5) => return KeyAction::Trigger(PaneKind::Execution),
        KeyCode::F(3) => app.cycle_language(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::PageUp => app.scroll_up(5),
        KeyCode::PageDown => app.scroll_down(5),
        KeyCode::Enter => app.edit(|e| e.newline()),
        KeyCode::Backspace => app.edit(|e| e.backspace()),
        KeyCode::Delete => app.edit(|e| e.delete()),
        KeyCode::Left => app.editor.move_left(),
        KeyCode::Right => app.editor.move_right(),
        KeyCode::Up => app.editor.move_up(),
        KeyCode::Down => app.editor.move_down(),
        KeyCode::Home => app.editor.move_home(),
        KeyCode::End => app.editor.move_end(),
        KeyCode::Char(c) if !ctrl => app.edit(|e| e.insert_char(c)),
        _ => {}
    }

    KeyAction::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Language::Python, "http://127.0.0.1:9/api/code-explainer".into())
    }

    #[test]
    fn typing_updates_snippet() {
        let mut app = app();
        for c in "x=1".chars() {
            handle_key_event(&mut app, press(KeyCode::Char(c)));
        }
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.orchestrator.snippet(), "x=1\n");
    }

    #[test]
    fn function_keys_map_to_triggers() {
        let mut app = app();
        assert_eq!(
            handle_key_event(&mut app, press(KeyCode::F(2))),
            KeyAction::Trigger(PaneKind::Explanation)
        );
        assert_eq!(
            handle_key_event(&mut app, press(KeyCode::F(5))),
            KeyAction::Trigger(PaneKind::Execution)
        );
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(&mut app, key), KeyAction::Quit);
        assert_eq!(app.orchestrator.snippet(), "");
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app();
        let key = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key_event(&mut app, key);
        assert_eq!(app.orchestrator.snippet(), "");
    }

    #[test]
    fn read_error_stops_input_and_signals_loop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let err = io::Error::new(io::ErrorKind::BrokenPipe, "tty gone");
        assert!(!forward_input(Err(err), &tx));
        assert!(matches!(rx.try_recv(), Ok(TuiEvent::InputLost)));
    }

    #[test]
    fn input_is_forwarded_until_channel_closes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(forward_input(Ok(Event::Paste("x = 1".into())), &tx));
        assert!(matches!(rx.try_recv(), Ok(TuiEvent::Paste(text)) if text == "x = 1"));
        assert!(forward_input(Ok(Event::FocusGained), &tx));

        drop(rx);
        assert!(!forward_input(Ok(Event::Resize(80, 24)), &tx));
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = app();
        handle_key_event(&mut app, press(KeyCode::F(1)));
        assert_eq!(handle_key_event(&mut app, press(KeyCode::F(2))), KeyAction::None);
        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(!app.show_help);
    }
}
