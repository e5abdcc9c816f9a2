mod gemini_client;
mod in_memory_credential_store;
mod json_credential_store;

pub use gemini_client::*;
pub use in_memory_credential_store::*;
pub use json_credential_store::*;
