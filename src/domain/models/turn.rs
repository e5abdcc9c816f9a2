/// One user message paired with the model's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    user_text: String,
    assistant_text: String,
}

impl Turn {
    pub fn new(user_text: impl Into<String>, assistant_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
        }
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn assistant_text(&self) -> &str {
        &self.assistant_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_creation() {
        let turn = Turn::new("hello", "hi there");

        assert_eq!(turn.user_text(), "hello");
        assert_eq!(turn.assistant_text(), "hi there");
    }

    #[test]
    fn test_turn_keeps_user_text_verbatim() {
        let turn = Turn::new("  spaced out  ", "ok");
        assert_eq!(turn.user_text(), "  spaced out  ");
    }
}
