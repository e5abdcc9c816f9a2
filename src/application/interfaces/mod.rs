mod credential_store;
mod model_client;
mod transcript_observer;

pub use credential_store::*;
pub use model_client::*;
pub use transcript_observer::*;
