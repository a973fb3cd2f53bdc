pub mod answer;
pub mod drill;
pub mod hint;
pub mod quiz;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    Practice,
    Quiz,
}

impl SessionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Practice => "practice",
            SessionMode::Quiz => "quiz",
        }
    }
}

/// The words of one session, fixed when the session is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub pack_id: String,
    pub word_ids: Vec<String>,
    pub position: usize,
    pub mode: SessionMode,
}

impl SessionState {
    pub fn new(pack_id: &str, word_ids: Vec<String>, mode: SessionMode) -> Self {
        Self {
            pack_id: pack_id.to_string(),
            word_ids,
            position: 0,
            mode,
        }
    }

    pub fn len(&self) -> usize {
        self.word_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_ids.is_empty()
    }

    pub fn current_word_id(&self) -> Option<&str> {
        self.word_ids.get(self.position).map(String::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.position >= self.word_ids.len()
    }

    pub fn advance(&mut self) {
        if !self.is_complete() {
            self.position += 1;
        }
    }

    /// 1-based position for display, e.g. "2 / 5".
    pub fn display_position(&self) -> (usize, usize) {
        ((self.position + 1).min(self.len()), self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn walks_through_words_in_order() {
        let mut s = SessionState::new("p", ids(&["a", "b"]), SessionMode::Practice);
        assert_eq!(s.current_word_id(), Some("a"));
        assert_eq!(s.display_position(), (1, 2));
        s.advance();
        assert_eq!(s.current_word_id(), Some("b"));
        s.advance();
        assert!(s.is_complete());
        assert_eq!(s.current_word_id(), None);
        s.advance();
        assert_eq!(s.position, 2);
    }

    #[test]
    fn empty_session_is_complete_from_the_start() {
        let s = SessionState::new("p", Vec::new(), SessionMode::Quiz);
        assert!(s.is_empty());
        assert!(s.is_complete());
        assert_eq!(s.display_position(), (0, 0));
    }
}
