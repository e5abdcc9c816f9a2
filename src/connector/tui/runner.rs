use std::io::{self, Stdout};

use anyhow::{bail, Result};
use crossterm::event::{Event, EventStream};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use crate::application::AcquireCredentialUseCase;
use crate::connector::api::Container;

use super::app::{Action, App, Mode};
use super::render;
use super::worker::{SessionEvent, SessionHandle};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Runs the chat window until the user quits.
///
/// Without a usable key the window opens in key-entry mode; declining to
/// enter one ends the program with an error.
pub async fn run(container: &Container) -> Result<()> {
    let credentials = container.credential_use_case();
    let credential = match credentials.load().await {
        Ok(credential) => credential,
        Err(e) if e.is_storage_error() => {
            warn!("Ignoring unreadable credential file: {}", e);
            None
        }
        Err(e) => return Err(e.into()),
    };

    let mode = if credential.is_some() {
        Mode::Chat
    } else {
        Mode::KeyEntry
    };
    let mut app = App::new(container.model(), mode);
    let mut session = credential.map(|c| SessionHandle::spawn(container.model_client(c)));

    info!("Starting chat window (model {})", container.model());

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, &mut session, container, &credentials).await;
    restore_terminal(&mut terminal)?;

    if let Some(session) = session {
        session.abort();
    }
    result?;

    if let Some(message) = app.exit_message() {
        bail!("{message}");
    }
    Ok(())
}

async fn event_loop(
    terminal: &mut CrosstermTerminal,
    app: &mut App,
    session: &mut Option<SessionHandle>,
    container: &Container,
    credentials: &AcquireCredentialUseCase,
) -> Result<()> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| render::draw(frame, app))?;
        if app.should_quit() {
            return Ok(());
        }

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(action) = app.handle_key(key) {
                        perform(action, app, session, container, credentials).await;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(event) = next_session_event(session) => app.apply(event),
        }
    }
}

async fn next_session_event(session: &mut Option<SessionHandle>) -> Option<SessionEvent> {
    match session {
        Some(handle) => handle.next_event().await,
        None => std::future::pending().await,
    }
}

async fn perform(
    action: Action,
    app: &mut App,
    session: &mut Option<SessionHandle>,
    container: &Container,
    credentials: &AcquireCredentialUseCase,
) {
    match action {
        Action::Submit(text) => {
            if !session.as_ref().is_some_and(|handle| handle.send(text)) {
                app.report_error("chat session is not running");
            }
        }
        Action::Reset => {
            if !session.as_ref().is_some_and(|handle| handle.reset()) {
                app.report_error("chat session is not running");
            }
        }
        Action::SaveKey(token) => match credentials.save(&token).await {
            Ok(credential) => {
                *session = Some(SessionHandle::spawn(container.model_client(credential)));
                app.key_accepted();
            }
            Err(e) => {
                warn!("Could not save API key: {}", e);
                app.key_rejected(e.to_string());
            }
        },
        Action::Quit => {}
    }
}

fn setup_terminal() -> Result<CrosstermTerminal> {
    enable_raw_mode()?;
    undo_on_err(enter_alternate_screen(), reset_terminal)
}

fn enter_alternate_screen() -> Result<CrosstermTerminal> {
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Runs `undo` when `result` is an error, then hands the result back.
fn undo_on_err<T, E>(result: Result<T, E>, undo: impl FnOnce()) -> Result<T, E> {
    if result.is_err() {
        undo();
    }
    result
}

/// Best-effort restore for error paths and panics.
fn reset_terminal() {
    let _ = disable_raw_mode();
    let _ = io::stdout().execute(LeaveAlternateScreen);
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        reset_terminal();
        previous(info);
    }));
}

fn restore_terminal(terminal: &mut CrosstermTerminal) -> Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn undo_runs_only_on_error() {
        let undone = Cell::new(0);

        let ok: Result<u8, &str> = undo_on_err(Ok(1), || undone.set(undone.get() + 1));
        assert_eq!(ok, Ok(1));
        assert_eq!(undone.get(), 0);

        let err: Result<u8, &str> = undo_on_err(Err("no tty"), || undone.set(undone.get() + 1));
        assert_eq!(err, Err("no tty"));
        assert_eq!(undone.get(), 1);
    }
}
