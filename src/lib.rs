pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    AcquireCredentialUseCase, ChatSession, CredentialStore, ModelClient, TranscriptObserver,
};

pub use cli::Commands;

pub use connector::{
    Container, ContainerConfig, GeminiClient, InMemoryCredentialStore, JsonCredentialStore,
    Router, SessionCommand, SessionEvent, SessionHandle,
};

pub use domain::{Credential, DomainError, Transcript, Turn};
