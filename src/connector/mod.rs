//! # Connector Layer
//!
//! External integrations implementing the application ports:
//! - Model access (Gemini `generateContent` over HTTP)
//! - Credential storage (JSON file, in-memory)
//! - Command routing for the CLI and the terminal chat window

pub mod adapter;
pub mod api;
pub mod tui;

pub use adapter::*;
pub use api::*;
pub use tui::{SessionCommand, SessionEvent, SessionHandle};
