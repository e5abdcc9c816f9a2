use crate::domain::Turn;

/// Receives transcript changes so a presentation layer can render them.
///
/// Callbacks run on the task that owns the session, inside `send`/`reset`,
/// and must not block.
pub trait TranscriptObserver: Send + Sync {
    fn on_turn_appended(&self, turn: &Turn);

    fn on_reset(&self);
}
