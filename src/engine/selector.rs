use std::cmp::Ordering;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{Catalog, resolver};
use crate::engine::progress::{ProgressStore, WordProgress};
use crate::session::{SessionMode, SessionState};

/// Upper bound on words per session.
pub const SESSION_SIZE: usize = 5;

/// Weakest first: lower score, then more wrong answers, then more hints.
pub fn weakness_order(a: &WordProgress, b: &WordProgress) -> Ordering {
    a.score
        .cmp(&b.score)
        .then_with(|| b.wrong_count.cmp(&a.wrong_count))
        .then_with(|| b.hint_count.cmp(&a.hint_count))
}

/// Sort eligible ids by weakness, creating progress records for new ids.
pub fn rank(ids: &[&str], progress: &mut ProgressStore) -> Vec<String> {
    let mut ranked: Vec<(String, WordProgress)> = ids
        .iter()
        .map(|&id| (id.to_string(), progress.get(id).clone()))
        .collect();
    ranked.sort_by(|a, b| weakness_order(&a.1, &b.1));
    ranked.into_iter().map(|(id, _)| id).collect()
}

/// Uniform random draw of `n` ids from the whole list (shuffle, then take a prefix).
///
/// The draw is unweighted: rank order decides nothing about which ids are picked.
pub fn sample<R: Rng + ?Sized>(mut ranked: Vec<String>, n: usize, rng: &mut R) -> Vec<String> {
    ranked.shuffle(rng);
    ranked.truncate(n);
    ranked
}

/// Resolve, rank and sample the words for a new session.
pub fn build_session<R: Rng + ?Sized>(
    catalog: &Catalog,
    progress: &mut ProgressStore,
    pack_id: &str,
    mode: SessionMode,
    rng: &mut R,
) -> SessionState {
    let eligible = resolver::expand(catalog, pack_id);
    let ranked = rank(&eligible, progress);
    let size = SESSION_SIZE.min(ranked.len());
    let word_ids = sample(ranked, size, rng);

    tracing::info!(
        pack = pack_id,
        mode = mode.as_str(),
        eligible = eligible.len(),
        drawn = word_ids.len(),
        "session built"
    );

    SessionState::new(pack_id, word_ids, mode)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::catalog::{Meta, Pack, WordEntry};

    fn catalog(n: usize) -> Catalog {
        let mut library = BTreeMap::new();
        let mut content = Vec::new();
        for i in 0..n {
            let id = format!("w{i}");
            library.insert(id.clone(), WordEntry::new(&format!("word{i}"), ""));
            content.push(id);
        }
        let pack = Pack {
            id: "p".to_string(),
            title: "P".to_string(),
            content,
            include: Vec::new(),
        };
        Catalog::new(Meta::default(), library, vec![pack])
    }

    fn wp(score: i32, wrong: u32, hint: u32) -> WordProgress {
        WordProgress {
            score,
            wrong_count: wrong,
            hint_count: hint,
        }
    }

    #[test]
    fn rank_orders_by_score_then_wrong_then_hints() {
        let mut store = ProgressStore::in_memory();
        *store.get("strong") = wp(80, 0, 0);
        *store.get("few_wrong") = wp(10, 1, 0);
        *store.get("many_wrong") = wp(10, 4, 0);
        *store.get("many_wrong_hints") = wp(10, 4, 2);
        let ranked = rank(
            &["strong", "few_wrong", "many_wrong", "many_wrong_hints", "fresh"],
            &mut store,
        );
        assert_eq!(
            ranked,
            vec!["fresh", "many_wrong_hints", "many_wrong", "few_wrong", "strong"]
        );
    }

    #[test]
    fn rank_creates_missing_records() {
        let mut store = ProgressStore::in_memory();
        rank(&["a", "b"], &mut store);
        assert!(store.peek("a").is_some());
        assert!(store.peek("b").is_some());
    }

    #[test]
    fn session_is_capped_at_five() {
        let c = catalog(12);
        let mut store = ProgressStore::in_memory();
        let mut rng = SmallRng::seed_from_u64(7);
        let session = build_session(&c, &mut store, "p", SessionMode::Practice, &mut rng);
        assert_eq!(session.len(), 5);
        let unique: HashSet<&String> = session.word_ids.iter().collect();
        assert_eq!(unique.len(), 5);
        assert_eq!(store.state().by_id.len(), 12);
    }

    #[test]
    fn small_pack_is_not_padded() {
        let c = catalog(3);
        let mut store = ProgressStore::in_memory();
        let mut rng = SmallRng::seed_from_u64(1);
        let session = build_session(&c, &mut store, "p", SessionMode::Quiz, &mut rng);
        assert_eq!(session.len(), 3);
        assert_eq!(session.mode, SessionMode::Quiz);
        assert_eq!(session.position, 0);
    }

    #[test]
    fn empty_pack_gives_empty_session() {
        let c = catalog(0);
        let mut store = ProgressStore::in_memory();
        let mut rng = SmallRng::seed_from_u64(1);
        let session = build_session(&c, &mut store, "missing", SessionMode::Practice, &mut rng);
        assert!(session.is_empty());
        assert!(session.is_complete());
    }

    #[test]
    fn draw_covers_strong_words_too() {
        // The sample is uniform over all candidates, so strong words still appear.
        let c = catalog(10);
        let mut store = ProgressStore::in_memory();
        for i in 5..10 {
            store.get(&format!("w{i}")).score = 100;
        }
        let mut rng = SmallRng::seed_from_u64(42);
        let mut seen_strong = false;
        for _ in 0..50 {
            let session = build_session(&c, &mut store, "p", SessionMode::Practice, &mut rng);
            if session
                .word_ids
                .iter()
                .any(|id| store.peek(id).is_some_and(|p| p.score == 100))
            {
                seen_strong = true;
                break;
            }
        }
        assert!(seen_strong);
    }
}
