mod acquire_credential;
mod chat_session;

pub use acquire_credential::*;
pub use chat_session::*;
