use std::collections::{BTreeSet, HashMap};

use rand::Rng;
use rand::rngs::SmallRng;

use crate::engine::progress::ProgressStore;

/// Hints available per word per practice session.
pub const MAX_HINTS: u8 = 2;

/// Shown in place of letters that have not been revealed.
pub const PLACEHOLDER: char = '_';

/// Which letter the first hint uncovers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealStyle {
    FirstLetter,
    MiddleLetter,
}

impl RevealStyle {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            RevealStyle::FirstLetter
        } else {
            RevealStyle::MiddleLetter
        }
    }

    fn first_index(self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self {
            RevealStyle::FirstLetter => Some(0),
            RevealStyle::MiddleLetter => Some(len / 2),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HintOutcome {
    /// A hint was spent. Carries the uncovered position, or `None` when
    /// there was nothing left to uncover.
    Revealed(Option<usize>),
    /// Both hints were already used; nothing changed.
    Exhausted,
}

/// Progressive reveal state for one word within one practice session.
#[derive(Clone, Debug)]
pub struct HintPlan {
    style: RevealStyle,
    target: Vec<char>,
    mask: Vec<char>,
    revealed: BTreeSet<usize>,
    used: u8,
}

impl HintPlan {
    pub fn new(target: &str, style: RevealStyle) -> Self {
        let target: Vec<char> = target.chars().collect();
        Self {
            style,
            mask: vec![PLACEHOLDER; target.len()],
            target,
            revealed: BTreeSet::new(),
            used: 0,
        }
    }

    pub fn style(&self) -> RevealStyle {
        self.style
    }

    pub fn hints_used(&self) -> u8 {
        self.used
    }

    pub fn hints_remaining(&self) -> u8 {
        MAX_HINTS - self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= MAX_HINTS
    }

    pub fn mask(&self) -> &[char] {
        &self.mask
    }

    /// Mask with a space between characters, e.g. `c _ _`.
    pub fn mask_string(&self) -> String {
        spaced(&self.mask)
    }

    /// First hint follows the reveal style; the second uncovers the leftmost
    /// hidden character.
    pub fn request(&mut self) -> HintOutcome {
        if self.is_exhausted() {
            return HintOutcome::Exhausted;
        }
        self.used += 1;

        let position = if self.used == 1 && self.revealed.is_empty() {
            self.style.first_index(self.target.len())
        } else {
            (0..self.target.len()).find(|i| !self.revealed.contains(i))
        };

        if let Some(i) = position {
            self.revealed.insert(i);
            self.mask[i] = self.target[i];
        }
        HintOutcome::Revealed(position)
    }
}

/// Length-only mask used by the quiz, e.g. `_ _ _`.
pub fn blank_mask(target: &str) -> String {
    let blanks: Vec<char> = target.chars().map(|_| PLACEHOLDER).collect();
    spaced(&blanks)
}

fn spaced(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len() * 2);
    for (i, ch) in chars.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(*ch);
    }
    out
}

/// Hint plans for every word shown in the current practice session.
pub struct HintEngine {
    plans: HashMap<String, HintPlan>,
    rng: SmallRng,
}

impl HintEngine {
    pub fn new(rng: SmallRng) -> Self {
        Self {
            plans: HashMap::new(),
            rng,
        }
    }

    /// Plan for a word, created on first display with a random reveal style.
    pub fn plan(&mut self, word_id: &str, target: &str) -> &mut HintPlan {
        let rng = &mut self.rng;
        self.plans
            .entry(word_id.to_string())
            .or_insert_with(|| HintPlan::new(target, RevealStyle::random(rng)))
    }

    pub fn get(&self, word_id: &str) -> Option<&HintPlan> {
        self.plans.get(word_id)
    }

    /// Spend a hint and charge it to the word's progress record.
    pub fn request_hint(
        &mut self,
        word_id: &str,
        target: &str,
        progress: &mut ProgressStore,
    ) -> HintOutcome {
        let outcome = self.plan(word_id, target).request();
        if let HintOutcome::Revealed(_) = outcome {
            progress.get(word_id).record_hint();
        }
        outcome
    }

    pub fn reset(&mut self) {
        self.plans.clear();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn new_plan_is_all_placeholders() {
        let plan = HintPlan::new("cat", RevealStyle::FirstLetter);
        assert_eq!(plan.mask_string(), "_ _ _");
        assert_eq!(plan.hints_remaining(), 2);
    }

    #[test]
    fn first_letter_then_leftmost_hidden() {
        let mut plan = HintPlan::new("apple", RevealStyle::FirstLetter);
        assert_eq!(plan.request(), HintOutcome::Revealed(Some(0)));
        assert_eq!(plan.mask_string(), "a _ _ _ _");
        assert_eq!(plan.request(), HintOutcome::Revealed(Some(1)));
        assert_eq!(plan.mask_string(), "a p _ _ _");
        assert_eq!(plan.request(), HintOutcome::Exhausted);
        assert_eq!(plan.mask_string(), "a p _ _ _");
    }

    #[test]
    fn middle_letter_then_leftmost_hidden() {
        let mut plan = HintPlan::new("apple", RevealStyle::MiddleLetter);
        assert_eq!(plan.request(), HintOutcome::Revealed(Some(2)));
        assert_eq!(plan.mask_string(), "_ _ p _ _");
        assert_eq!(plan.request(), HintOutcome::Revealed(Some(0)));
        assert_eq!(plan.mask_string(), "a _ p _ _");
    }

    #[test]
    fn middle_of_even_length_rounds_down() {
        let mut plan = HintPlan::new("tree", RevealStyle::MiddleLetter);
        assert_eq!(plan.request(), HintOutcome::Revealed(Some(2)));
    }

    #[test]
    fn short_words_run_out_of_letters() {
        let mut plan = HintPlan::new("a", RevealStyle::MiddleLetter);
        assert_eq!(plan.request(), HintOutcome::Revealed(Some(0)));
        assert_eq!(plan.request(), HintOutcome::Revealed(None));
        assert_eq!(plan.mask_string(), "a");
        assert!(plan.is_exhausted());
    }

    #[test]
    fn empty_spelling_reveals_nothing() {
        let mut plan = HintPlan::new("", RevealStyle::FirstLetter);
        assert_eq!(plan.request(), HintOutcome::Revealed(None));
        assert_eq!(plan.mask_string(), "");
    }

    #[test]
    fn multibyte_letters_are_single_positions() {
        let mut plan = HintPlan::new("café", RevealStyle::MiddleLetter);
        assert_eq!(plan.mask().len(), 4);
        plan.request();
        plan.request();
        assert_eq!(plan.mask_string(), "c _ f _");
    }

    #[test]
    fn blank_mask_shows_length_only() {
        assert_eq!(blank_mask("dog"), "_ _ _");
        assert_eq!(blank_mask(""), "");
    }

    #[test]
    fn engine_charges_progress_per_hint() {
        let mut engine = HintEngine::new(SmallRng::seed_from_u64(3));
        let mut progress = ProgressStore::in_memory();
        progress.get("w1").score = 12;

        engine.request_hint("w1", "cat", &mut progress);
        assert_eq!(progress.peek("w1").unwrap().score, 7);
        assert_eq!(progress.peek("w1").unwrap().hint_count, 1);

        engine.request_hint("w1", "cat", &mut progress);
        assert_eq!(progress.peek("w1").unwrap().score, 2);
        assert_eq!(progress.peek("w1").unwrap().hint_count, 2);

        assert_eq!(
            engine.request_hint("w1", "cat", &mut progress),
            HintOutcome::Exhausted
        );
        assert_eq!(progress.peek("w1").unwrap().score, 2);
        assert_eq!(progress.peek("w1").unwrap().hint_count, 2);
    }

    #[test]
    fn plan_is_created_once_and_reset_clears_it() {
        let mut engine = HintEngine::new(SmallRng::seed_from_u64(9));
        let style = engine.plan("w1", "house").style();
        engine.plan("w1", "house").request();
        assert_eq!(engine.plan("w1", "house").style(), style);
        assert_eq!(engine.get("w1").unwrap().hints_used(), 1);

        engine.reset();
        assert!(engine.get("w1").is_none());
    }
}
