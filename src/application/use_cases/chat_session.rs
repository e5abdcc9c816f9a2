use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ModelClient, TranscriptObserver};
use crate::domain::{DomainError, Transcript, Turn};

/// A single conversation with the model.
///
/// Every `send` reaches the model with the new text only; earlier turns are
/// kept for display and are never replayed to the model. `send` takes
/// `&mut self`, so one session can only have one request in flight.
pub struct ChatSession {
    model: Arc<dyn ModelClient>,
    transcript: Transcript,
    observers: Vec<Arc<dyn TranscriptObserver>>,
}

impl ChatSession {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self {
            model,
            transcript: Transcript::new(),
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn TranscriptObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Sends `text` to the model and records the exchange.
    ///
    /// Blank input is rejected with [`DomainError::BlankInput`] before the
    /// model is contacted. On any model failure the transcript is left as it
    /// was and the session stays usable.
    pub async fn send(&mut self, text: &str) -> Result<String, DomainError> {
        if text.trim().is_empty() {
            debug!("Ignoring blank input");
            return Err(DomainError::BlankInput);
        }

        debug!("Sending prompt ({} chars)", text.chars().count());

        let reply = match self.model.generate(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Model call failed: {}", e);
                return Err(into_model_error(e));
            }
        };

        if reply.trim().is_empty() {
            warn!("Model returned an empty reply");
            return Err(DomainError::model("the model returned an empty reply"));
        }

        let turn = Turn::new(text, reply.clone());
        self.transcript.push(turn);

        if let Some(turn) = self.transcript.last() {
            for observer in &self.observers {
                observer.on_turn_appended(turn);
            }
        }

        info!("Turn {} recorded", self.transcript.len());
        Ok(reply)
    }

    /// Empties the transcript. Safe to call at any time.
    pub fn reset(&mut self) {
        self.transcript.clear();
        for observer in &self.observers {
            observer.on_reset();
        }
        info!("Transcript reset");
    }
}

// Collaborators should already speak ModelError; anything else still counts
// as a failed model call from the caller's point of view.
fn into_model_error(err: DomainError) -> DomainError {
    match err {
        DomainError::ModelError(_) => err,
        other => DomainError::model(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct EchoModel {
        prompts: Mutex<Vec<String>>,
    }

    impl EchoModel {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelClient for EchoModel {
        async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(format!("echo: {}", prompt))
        }
    }

    struct BlankModel;

    #[async_trait]
    impl ModelClient for BlankModel {
        async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
            Ok("  \n".to_string())
        }
    }

    struct StorageFailingModel;

    #[async_trait]
    impl ModelClient for StorageFailingModel {
        async fn generate(&self, _prompt: &str) -> Result<String, DomainError> {
            Err(DomainError::storage("disk on fire"))
        }
    }

    #[derive(Default)]
    struct CountingObserver {
        appended: Mutex<Vec<Turn>>,
        resets: Mutex<usize>,
    }

    impl TranscriptObserver for CountingObserver {
        fn on_turn_appended(&self, turn: &Turn) {
            self.appended.lock().unwrap().push(turn.clone());
        }

        fn on_reset(&self) {
            *self.resets.lock().unwrap() += 1;
        }
    }

    #[tokio::test]
    async fn test_each_prompt_is_sent_without_history() {
        let model = Arc::new(EchoModel::new());
        let mut session = ChatSession::new(model.clone());

        session.send("first").await.unwrap();
        session.send("second").await.unwrap();

        let prompts = model.prompts.lock().unwrap().clone();
        assert_eq!(prompts, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_reply_is_a_model_error() {
        let mut session = ChatSession::new(Arc::new(BlankModel));

        let err = session.send("hello").await.unwrap_err();
        assert!(err.is_model_error());
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_non_model_failure_is_reported_as_model_error() {
        let mut session = ChatSession::new(Arc::new(StorageFailingModel));

        let err = session.send("hello").await.unwrap_err();
        assert!(err.is_model_error());
        assert!(err.to_string().contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_observer_sees_appends_and_resets() {
        let observer = Arc::new(CountingObserver::default());
        let mut session =
            ChatSession::new(Arc::new(EchoModel::new())).with_observer(observer.clone());

        session.send("hello").await.unwrap();
        let _ = session.send("   ").await;
        session.reset();
        session.reset();

        let appended = observer.appended.lock().unwrap().clone();
        assert_eq!(appended, vec![Turn::new("hello", "echo: hello")]);
        assert_eq!(*observer.resets.lock().unwrap(), 2);
    }
}
