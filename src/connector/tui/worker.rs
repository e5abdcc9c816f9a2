use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::application::{ChatSession, ModelClient, TranscriptObserver};
use crate::domain::Turn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Send(String),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TurnAppended(Turn),
    Reset,
    /// The model call failed; the transcript is unchanged.
    Failed(String),
    /// Blank input was refused without contacting the model.
    Rejected,
}

struct ChannelObserver {
    events: UnboundedSender<SessionEvent>,
}

impl TranscriptObserver for ChannelObserver {
    fn on_turn_appended(&self, turn: &Turn) {
        let _ = self.events.send(SessionEvent::TurnAppended(turn.clone()));
    }

    fn on_reset(&self) {
        let _ = self.events.send(SessionEvent::Reset);
    }
}

/// Owns a [`ChatSession`] on a dedicated task.
///
/// Commands are processed strictly in order, so at most one model call is
/// in flight and a reset queued behind a send is applied after it.
pub struct SessionHandle {
    commands: UnboundedSender<SessionCommand>,
    events: UnboundedReceiver<SessionEvent>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub fn spawn(model: Arc<dyn ModelClient>) -> Self {
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<SessionCommand>();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<SessionEvent>();

        let mut session = ChatSession::new(model).with_observer(Arc::new(ChannelObserver {
            events: event_tx.clone(),
        }));

        let task = tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                match command {
                    SessionCommand::Send(text) => match session.send(&text).await {
                        Ok(_) => {}
                        Err(e) if e.is_blank_input() => {
                            let _ = event_tx.send(SessionEvent::Rejected);
                        }
                        Err(e) => {
                            let _ = event_tx.send(SessionEvent::Failed(e.to_string()));
                        }
                    },
                    SessionCommand::Reset => session.reset(),
                }
            }
            debug!("Session worker stopped");
        });

        Self {
            commands: command_tx,
            events: event_rx,
            task,
        }
    }

    /// Queues a send. Returns `false` if the worker is gone.
    pub fn send(&self, text: impl Into<String>) -> bool {
        self.commands.send(SessionCommand::Send(text.into())).is_ok()
    }

    /// Queues a reset. Returns `false` if the worker is gone.
    pub fn reset(&self) -> bool {
        self.commands.send(SessionCommand::Reset).is_ok()
    }

    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Closes the command channel and waits for queued commands to finish.
    pub async fn shutdown(self) {
        drop(self.commands);
        let _ = self.task.await;
    }

    /// Stops the worker immediately, dropping any request still in flight.
    pub fn abort(self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::DomainError;

    struct FlakyModel {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ModelClient for FlakyModel {
        async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
            // Every second call fails.
            if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 1 {
                return Err(DomainError::model("rate limited"));
            }
            Ok(format!("re: {}", prompt))
        }
    }

    fn flaky() -> Arc<dyn ModelClient> {
        Arc::new(FlakyModel {
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_events_follow_command_order() {
        let mut handle = SessionHandle::spawn(flaky());

        assert!(handle.send("one"));
        assert!(handle.send("two"));
        assert!(handle.send("  "));
        assert!(handle.reset());

        assert_eq!(
            handle.next_event().await,
            Some(SessionEvent::TurnAppended(Turn::new("one", "re: one")))
        );
        assert_eq!(
            handle.next_event().await,
            Some(SessionEvent::Failed("Model error: rate limited".to_string()))
        );
        assert_eq!(handle.next_event().await, Some(SessionEvent::Rejected));
        assert_eq!(handle.next_event().await, Some(SessionEvent::Reset));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_session_survives_failure() {
        let mut handle = SessionHandle::spawn(flaky());

        handle.send("a");
        handle.send("b");
        handle.send("c");

        let mut appended = Vec::new();
        for _ in 0..3 {
            if let Some(SessionEvent::TurnAppended(turn)) = handle.next_event().await {
                appended.push(turn.user_text().to_string());
            }
        }
        assert_eq!(appended, vec!["a".to_string(), "c".to_string()]);

        handle.shutdown().await;
    }
}
