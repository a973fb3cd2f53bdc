use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::catalog::{Catalog, WordEntry};
use crate::engine::progress::ProgressStore;
use crate::engine::selector;
use crate::session::answer::{self, Verdict};
use crate::session::hint::{self, HintEngine, HintOutcome};
use crate::session::quiz::QuizScorer;
use crate::session::{SessionMode, SessionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank submission; nothing was recorded.
    Empty,
    Correct,
    Incorrect,
    /// The session is between words or already over.
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// The pack had no eligible words.
    Empty,
    PracticeComplete { stars: u32 },
    QuizFinished { score: u32, passed: bool, stars: u32 },
}

/// What the presentation layer needs to draw the current word.
#[derive(Clone, Debug)]
pub struct WordView<'c> {
    pub entry: &'c WordEntry,
    pub mask: String,
    pub hints_used: u8,
    pub hints_remaining: u8,
    pub position: (usize, usize),
}

/// One running practice or quiz session.
///
/// Hint plans and the quiz score live here and are dropped with the drill;
/// progress mutations are persisted as soon as they happen.
pub struct Drill {
    session: SessionState,
    hints: HintEngine,
    quiz: QuizScorer,
    awaiting_advance: bool,
    end: Option<SessionEnd>,
}

impl Drill {
    pub fn new(session: SessionState, rng: SmallRng) -> Self {
        Self {
            session,
            hints: HintEngine::new(rng),
            quiz: QuizScorer::new(),
            awaiting_advance: false,
            end: None,
        }
    }

    /// Build a fresh session for `pack_id` and wrap it.
    pub fn start<R: Rng + ?Sized>(
        catalog: &Catalog,
        progress: &mut ProgressStore,
        pack_id: &str,
        mode: SessionMode,
        rng: &mut R,
    ) -> Self {
        let session = selector::build_session(catalog, progress, pack_id, mode, rng);
        let hint_rng = SmallRng::seed_from_u64(rng.next_u64());
        Self::new(session, hint_rng)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn mode(&self) -> SessionMode {
        self.session.mode
    }

    pub fn quiz_score(&self) -> u32 {
        self.quiz.score()
    }

    pub fn is_awaiting_advance(&self) -> bool {
        self.awaiting_advance
    }

    pub fn end(&self) -> Option<SessionEnd> {
        self.end
    }

    fn current<'c>(&self, catalog: &'c Catalog) -> Option<(String, &'c WordEntry)> {
        let id = self.session.current_word_id()?;
        catalog.word(id).map(|entry| (id.to_string(), entry))
    }

    /// Display data for the current word. In practice mode this creates the
    /// word's hint plan on first display.
    pub fn view<'c>(&mut self, catalog: &'c Catalog) -> Option<WordView<'c>> {
        let (id, entry) = self.current(catalog)?;
        let target = answer::normalize_answer(&entry.spelling);
        let position = self.session.display_position();

        let view = match self.session.mode {
            SessionMode::Practice => {
                let plan = self.hints.plan(&id, &target);
                WordView {
                    entry,
                    mask: plan.mask_string(),
                    hints_used: plan.hints_used(),
                    hints_remaining: plan.hints_remaining(),
                    position,
                }
            }
            SessionMode::Quiz => WordView {
                entry,
                mask: hint::blank_mask(&target),
                hints_used: 0,
                hints_remaining: 0,
                position,
            },
        };
        Some(view)
    }

    pub fn submit(
        &mut self,
        text: &str,
        catalog: &Catalog,
        progress: &mut ProgressStore,
    ) -> SubmitOutcome {
        if self.awaiting_advance {
            return SubmitOutcome::Ignored;
        }
        let Some((id, entry)) = self.current(catalog) else {
            return SubmitOutcome::Ignored;
        };

        match answer::judge(text, &entry.spelling) {
            Verdict::Empty => SubmitOutcome::Empty,
            Verdict::Correct => {
                if self.session.mode == SessionMode::Practice {
                    progress.get(&id).record_correct();
                    progress.persist_or_log();
                }
                tracing::debug!(word = %id, mode = self.session.mode.as_str(), "correct answer");
                self.awaiting_advance = true;
                SubmitOutcome::Correct
            }
            Verdict::Incorrect => {
                match self.session.mode {
                    SessionMode::Practice => {
                        progress.get(&id).record_wrong();
                        progress.persist_or_log();
                    }
                    SessionMode::Quiz => self.quiz.record_wrong(),
                }
                tracing::debug!(word = %id, mode = self.session.mode.as_str(), "wrong answer");
                SubmitOutcome::Incorrect
            }
        }
    }

    /// Practice only. Returns `None` when hints do not apply right now.
    pub fn request_hint(
        &mut self,
        catalog: &Catalog,
        progress: &mut ProgressStore,
    ) -> Option<HintOutcome> {
        if self.session.mode != SessionMode::Practice || self.awaiting_advance {
            return None;
        }
        let (id, entry) = self.current(catalog)?;
        let target = answer::normalize_answer(&entry.spelling);
        let outcome = self.hints.request_hint(&id, &target, progress);
        if let HintOutcome::Revealed(_) = outcome {
            progress.persist_or_log();
            tracing::debug!(word = %id, "hint used");
        }
        Some(outcome)
    }

    /// Move past a correctly answered word. Returns the session end once the
    /// last word is done.
    pub fn advance(&mut self, progress: &mut ProgressStore) -> Option<SessionEnd> {
        if !self.awaiting_advance {
            return None;
        }
        self.awaiting_advance = false;
        self.session.advance();
        if self.session.is_complete() {
            Some(self.finish(progress))
        } else {
            None
        }
    }

    /// Settle a session that has nothing to ask, i.e. an empty pack.
    pub fn end_if_empty(&mut self) -> Option<SessionEnd> {
        if self.session.is_empty() {
            self.end = Some(SessionEnd::Empty);
        }
        self.end.filter(|e| *e == SessionEnd::Empty)
    }

    fn finish(&mut self, progress: &mut ProgressStore) -> SessionEnd {
        if let Some(end) = self.end {
            return end;
        }
        let end = match self.session.mode {
            SessionMode::Practice => {
                progress.award_star();
                progress.persist_or_log();
                SessionEnd::PracticeComplete {
                    stars: progress.stars(),
                }
            }
            SessionMode::Quiz => {
                let passed = self.quiz.passed();
                if passed {
                    progress.award_star();
                    progress.persist_or_log();
                }
                SessionEnd::QuizFinished {
                    score: self.quiz.score(),
                    passed,
                    stars: progress.stars(),
                }
            }
        };
        tracing::info!(pack = %self.session.pack_id, ?end, "session finished");
        self.end = Some(end);
        end
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::catalog::{Meta, Pack};

    fn catalog(words: &[(&str, &str)]) -> Catalog {
        let library = words
            .iter()
            .map(|(id, spelling)| (id.to_string(), WordEntry::new(spelling, "")))
            .collect::<BTreeMap<_, _>>();
        let pack = Pack {
            id: "p1".to_string(),
            title: "Pack".to_string(),
            content: words.iter().map(|(id, _)| id.to_string()).collect(),
            include: Vec::new(),
        };
        Catalog::new(Meta::default(), library, vec![pack])
    }

    fn drill(words: &[&str], mode: SessionMode) -> Drill {
        let ids = words.iter().map(|s| s.to_string()).collect();
        Drill::new(
            SessionState::new("p1", ids, mode),
            SmallRng::seed_from_u64(11),
        )
    }

    #[test]
    fn practice_all_correct_awards_one_star() {
        let c = catalog(&[("w1", "cat"), ("w2", "dog")]);
        let mut progress = ProgressStore::in_memory();
        let mut d = drill(&["w1", "w2"], SessionMode::Practice);

        assert_eq!(d.submit(" CAT ", &c, &mut progress), SubmitOutcome::Correct);
        assert_eq!(d.advance(&mut progress), None);
        assert_eq!(d.submit("dog", &c, &mut progress), SubmitOutcome::Correct);
        let end = d.advance(&mut progress);

        assert_eq!(end, Some(SessionEnd::PracticeComplete { stars: 1 }));
        assert_eq!(progress.stars(), 1);
        assert_eq!(progress.peek("w1").unwrap().score, 10);
        assert_eq!(progress.peek("w2").unwrap().score, 10);
    }

    #[test]
    fn practice_wrong_answer_stays_on_word() {
        let c = catalog(&[("w1", "cat")]);
        let mut progress = ProgressStore::in_memory();
        let mut d = drill(&["w1"], SessionMode::Practice);

        assert_eq!(d.submit("cta", &c, &mut progress), SubmitOutcome::Incorrect);
        assert_eq!(d.submit("kat", &c, &mut progress), SubmitOutcome::Incorrect);
        assert_eq!(d.advance(&mut progress), None);
        assert_eq!(d.session().current_word_id(), Some("w1"));
        assert_eq!(progress.peek("w1").unwrap().wrong_count, 2);
        assert_eq!(progress.peek("w1").unwrap().score, 0);
    }

    #[test]
    fn empty_submission_touches_nothing() {
        let c = catalog(&[("w1", "cat")]);
        let mut progress = ProgressStore::in_memory();
        let mut d = drill(&["w1"], SessionMode::Quiz);

        assert_eq!(d.submit("   ", &c, &mut progress), SubmitOutcome::Empty);
        assert_eq!(d.quiz_score(), 100);
        assert!(progress.peek("w1").is_none());
    }

    #[test]
    fn submissions_are_ignored_while_awaiting_advance() {
        let c = catalog(&[("w1", "cat"), ("w2", "dog")]);
        let mut progress = ProgressStore::in_memory();
        let mut d = drill(&["w1", "w2"], SessionMode::Practice);

        d.submit("cat", &c, &mut progress);
        assert!(d.is_awaiting_advance());
        assert_eq!(d.submit("cat", &c, &mut progress), SubmitOutcome::Ignored);
        assert_eq!(d.request_hint(&c, &mut progress), None);
        assert_eq!(progress.peek("w1").unwrap().score, 10);
    }

    #[test]
    fn hints_cost_score_and_stop_after_two() {
        let c = catalog(&[("w1", "house")]);
        let mut progress = ProgressStore::in_memory();
        progress.get("w1").score = 30;
        let mut d = drill(&["w1"], SessionMode::Practice);

        assert!(matches!(
            d.request_hint(&c, &mut progress),
            Some(HintOutcome::Revealed(Some(_)))
        ));
        assert!(matches!(
            d.request_hint(&c, &mut progress),
            Some(HintOutcome::Revealed(Some(_)))
        ));
        assert_eq!(d.request_hint(&c, &mut progress), Some(HintOutcome::Exhausted));

        let p = progress.peek("w1").unwrap();
        assert_eq!(p.score, 20);
        assert_eq!(p.hint_count, 2);

        let view = d.view(&c).unwrap();
        assert_eq!(view.hints_used, 2);
        assert_eq!(view.hints_remaining, 0);
        assert_eq!(view.mask.chars().filter(|ch| *ch == '_').count(), 3);
    }

    #[test]
    fn hint_penalty_is_not_refunded_by_correct_answer() {
        let c = catalog(&[("w1", "sun")]);
        let mut progress = ProgressStore::in_memory();
        progress.get("w1").score = 50;
        let mut d = drill(&["w1"], SessionMode::Practice);

        d.request_hint(&c, &mut progress);
        d.submit("sun", &c, &mut progress);
        assert_eq!(progress.peek("w1").unwrap().score, 55);
    }

    #[test]
    fn quiz_has_no_hints_and_length_mask() {
        let c = catalog(&[("w1", "bird")]);
        let mut progress = ProgressStore::in_memory();
        let mut d = drill(&["w1"], SessionMode::Quiz);

        assert_eq!(d.request_hint(&c, &mut progress), None);
        let view = d.view(&c).unwrap();
        assert_eq!(view.mask, "_ _ _ _");
        assert_eq!(view.hints_remaining, 0);
    }

    #[test]
    fn quiz_pass_awards_star_without_word_progress() {
        let c = catalog(&[("w1", "cat"), ("w2", "dog")]);
        let mut progress = ProgressStore::in_memory();
        let mut d = drill(&["w1", "w2"], SessionMode::Quiz);

        assert_eq!(d.submit("cot", &c, &mut progress), SubmitOutcome::Incorrect);
        d.submit("cat", &c, &mut progress);
        d.advance(&mut progress);
        d.submit("dog", &c, &mut progress);
        let end = d.advance(&mut progress);

        assert_eq!(
            end,
            Some(SessionEnd::QuizFinished {
                score: 90,
                passed: true,
                stars: 1
            })
        );
        assert!(progress.peek("w1").is_none());
        assert!(progress.peek("w2").is_none());
    }

    #[test]
    fn quiz_fail_keeps_stars() {
        let c = catalog(&[("w1", "cat")]);
        let mut progress = ProgressStore::in_memory();
        let mut d = drill(&["w1"], SessionMode::Quiz);

        d.submit("x", &c, &mut progress);
        d.submit("y", &c, &mut progress);
        d.submit("cat", &c, &mut progress);
        let end = d.advance(&mut progress);

        assert_eq!(
            end,
            Some(SessionEnd::QuizFinished {
                score: 80,
                passed: false,
                stars: 0
            })
        );
        assert_eq!(progress.stars(), 0);
    }

    #[test]
    fn empty_session_ends_without_star() {
        let mut progress = ProgressStore::in_memory();
        let mut d = drill(&[], SessionMode::Practice);
        assert_eq!(d.end_if_empty(), Some(SessionEnd::Empty));
        assert_eq!(d.advance(&mut progress), None);
        assert_eq!(progress.stars(), 0);

        let mut non_empty = drill(&["w1"], SessionMode::Practice);
        assert_eq!(non_empty.end_if_empty(), None);
    }

    #[test]
    fn start_builds_session_from_pack() {
        let c = catalog(&[("w1", "cat"), ("w2", "dog"), ("w3", "fish")]);
        let mut progress = ProgressStore::in_memory();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut d = Drill::start(&c, &mut progress, "p1", SessionMode::Practice, &mut rng);

        assert_eq!(d.session().len(), 3);
        assert_eq!(d.mode(), SessionMode::Practice);
        let view = d.view(&c).unwrap();
        assert_eq!(view.position, (1, 3));
        assert_eq!(view.hints_remaining, 2);
    }
}
