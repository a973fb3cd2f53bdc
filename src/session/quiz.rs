pub const START_SCORE: u32 = 100;
pub const WRONG_PENALTY: u32 = 10;
pub const PASS_THRESHOLD: u32 = 90;

/// Running score of one quiz session. Only ever goes down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizScorer {
    score: u32,
}

impl Default for QuizScorer {
    fn default() -> Self {
        Self { score: START_SCORE }
    }
}

impl QuizScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn record_wrong(&mut self) {
        self.score = self.score.saturating_sub(WRONG_PENALTY);
    }

    pub fn passed(&self) -> bool {
        self.score >= PASS_THRESHOLD
    }
}
