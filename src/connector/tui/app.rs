use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::worker::SessionEvent;

pub const KEY_REQUIRED_MESSAGE: &str = "API key is required to use the assistant";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Waiting for the user to type an API key (input is masked).
    KeyEntry,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    User,
    Assistant,
    Error,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineItem {
    pub kind: LineKind,
    pub text: String,
}

/// What the runner should do in response to a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit(String),
    Reset,
    SaveKey(String),
    Quit,
}

/// View model of the chat window. Holds no session state of its own; the
/// timeline mirrors the events reported by the session worker.
pub struct App {
    mode: Mode,
    model: String,
    input: String,
    timeline: Vec<TimelineItem>,
    turns: usize,
    pending: bool,
    scroll: u16,
    max_scroll: u16,
    follow: bool,
    should_quit: bool,
    exit_message: Option<String>,
}

impl App {
    pub fn new(model: impl Into<String>, mode: Mode) -> Self {
        Self {
            mode,
            model: model.into(),
            input: String::new(),
            timeline: Vec::new(),
            turns: 0,
            pending: false,
            scroll: 0,
            max_scroll: 0,
            follow: true,
            should_quit: false,
            exit_message: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn timeline(&self) -> &[TimelineItem] {
        &self.timeline
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Set when the window closes because no key was provided.
    pub fn exit_message(&self) -> Option<&str> {
        self.exit_message.as_deref()
    }

    /// Scroll offset to render, given how far the content can scroll.
    pub(crate) fn scroll_offset(&mut self, max_scroll: u16) -> u16 {
        self.max_scroll = max_scroll;
        if self.follow || self.scroll >= max_scroll {
            self.follow = true;
            self.scroll = max_scroll;
        }
        self.scroll
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return Some(self.quit()),
            KeyCode::Esc => return Some(self.quit()),
            _ => {}
        }

        match self.mode {
            Mode::KeyEntry => self.handle_key_entry(key),
            Mode::Chat => self.handle_chat_key(key, ctrl),
        }
    }

    fn handle_key_entry(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                let token = std::mem::take(&mut self.input).trim().to_string();
                if token.is_empty() {
                    return Some(self.quit());
                }
                Some(Action::SaveKey(token))
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(ch);
                None
            }
            _ => None,
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent, ctrl: bool) -> Option<Action> {
        match key.code {
            KeyCode::Up => {
                self.scroll_up(1);
                return None;
            }
            KeyCode::PageUp => {
                self.scroll_up(10);
                return None;
            }
            KeyCode::Down => {
                self.scroll_down(1);
                return None;
            }
            KeyCode::PageDown => {
                self.scroll_down(10);
                return None;
            }
            KeyCode::Char('n') if ctrl => return Some(Action::Reset),
            _ => {}
        }

        // One request at a time: the input is frozen until the reply arrives.
        if self.pending {
            return None;
        }

        match key.code {
            KeyCode::Enter => {
                if self.input.trim().is_empty() {
                    return None;
                }
                let text = self.input.clone();
                self.push(LineKind::User, text.clone());
                self.pending = true;
                self.follow = true;
                Some(Action::Submit(text))
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(ch) if !ctrl => {
                self.input.push(ch);
                None
            }
            _ => None,
        }
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::TurnAppended(turn) => {
                self.pending = false;
                self.turns += 1;
                self.input.clear();
                self.push(LineKind::Assistant, turn.assistant_text().to_string());
            }
            SessionEvent::Failed(message) => {
                // Keep the input so the user can retry.
                self.pending = false;
                self.push(LineKind::Error, message);
            }
            SessionEvent::Rejected => {
                self.pending = false;
            }
            SessionEvent::Reset => {
                self.timeline.clear();
                self.turns = 0;
                self.scroll = 0;
                self.follow = true;
            }
        }
    }

    /// Switches to chat mode after a key has been stored.
    pub fn key_accepted(&mut self) {
        self.mode = Mode::Chat;
        self.input.clear();
        self.push(LineKind::System, "API key saved. Say hello!".to_string());
    }

    /// Stays in key entry and shows why the key could not be used.
    pub fn key_rejected(&mut self, message: impl Into<String>) {
        self.push(LineKind::Error, message.into());
    }

    /// Reports a failure that happened outside the session (e.g. a dead worker).
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.pending = false;
        self.push(LineKind::Error, message.into());
    }

    fn quit(&mut self) -> Action {
        if self.mode == Mode::KeyEntry {
            self.exit_message = Some(KEY_REQUIRED_MESSAGE.to_string());
        }
        self.should_quit = true;
        Action::Quit
    }

    fn push(&mut self, kind: LineKind, text: String) {
        self.timeline.push(TimelineItem { kind, text });
    }

    fn scroll_up(&mut self, lines: u16) {
        if self.follow {
            self.scroll = self.max_scroll;
            self.follow = false;
        }
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
        if self.scroll >= self.max_scroll {
            self.follow = true;
        }
    }
}
