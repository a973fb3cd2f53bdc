pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Mastery gained for a correct practice answer.
pub const CORRECT_BONUS: i32 = 10;
/// Mastery lost for each practice hint taken.
pub const HINT_PENALTY: i32 = 5;

pub fn clamp_score(score: i32) -> i32 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

pub fn after_correct(score: i32) -> i32 {
    clamp_score(score.saturating_add(CORRECT_BONUS))
}

pub fn after_hint(score: i32) -> i32 {
    clamp_score(score.saturating_sub(HINT_PENALTY))
}
