use super::Turn;

/// Ordered history of turns for the current session.
///
/// Turns are only ever appended; the single way to shrink a transcript is
/// [`Transcript::clear`], which empties it in one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::new("first", "1"));
        transcript.push(Turn::new("second", "2"));

        let users: Vec<&str> = transcript.iter().map(|t| t.user_text()).collect();
        assert_eq!(users, vec!["first", "second"]);
        assert_eq!(transcript.last().map(|t| t.assistant_text()), Some("2"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::new("a", "b"));

        transcript.clear();
        assert!(transcript.is_empty());

        transcript.clear();
        assert_eq!(transcript.len(), 0);
    }
}
