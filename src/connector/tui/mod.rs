//! Terminal chat window: a ratatui front end over a [`ChatSession`] that runs
//! on its own task.
//!
//! [`ChatSession`]: crate::application::ChatSession

mod app;
mod render;
mod runner;
mod worker;

pub use app::{Action, App, LineKind, Mode, TimelineItem, KEY_REQUIRED_MESSAGE};
pub use runner::run;
pub use worker::{SessionCommand, SessionEvent, SessionHandle};
