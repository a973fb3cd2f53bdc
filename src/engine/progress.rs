use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::engine::scoring;
use crate::store::schema::ProgressState;

/// Per-word mastery record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub wrong_count: u32,
    #[serde(default)]
    pub hint_count: u32,
}

impl WordProgress {
    pub fn normalized(mut self) -> Self {
        self.score = scoring::clamp_score(self.score);
        self
    }

    pub fn record_correct(&mut self) {
        self.score = scoring::after_correct(self.score);
    }

    pub fn record_wrong(&mut self) {
        self.wrong_count = self.wrong_count.saturating_add(1);
    }

    pub fn record_hint(&mut self) {
        self.hint_count = self.hint_count.saturating_add(1);
        self.score = scoring::after_hint(self.score);
    }
}

/// Durable home of a `ProgressState` snapshot.
pub trait SnapshotStore {
    /// Never fails: absent or unreadable data yields the default state.
    fn load(&self) -> ProgressState;

    /// Replace the stored snapshot as a whole.
    fn save(&self, state: &ProgressState) -> Result<()>;
}

/// Keeps snapshots in memory. Useful when no data directory is available.
#[derive(Default)]
pub struct MemoryStore {
    snapshot: std::cell::RefCell<Option<ProgressState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<ProgressState> {
        self.snapshot.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> ProgressState {
        self.snapshot.borrow().clone().unwrap_or_default()
    }

    fn save(&self, state: &ProgressState) -> Result<()> {
        *self.snapshot.borrow_mut() = Some(state.clone());
        Ok(())
    }
}

/// Sole owner of the learner's `ProgressState`.
///
/// Other components read and mutate word records only through [`ProgressStore::get`],
/// which creates a default record on first reference.
pub struct ProgressStore {
    state: ProgressState,
    backend: Box<dyn SnapshotStore>,
}

impl ProgressStore {
    pub fn open(backend: Box<dyn SnapshotStore>) -> Self {
        let state = backend.load();
        Self { state, backend }
    }

    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStore::new()))
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Get-or-create accessor for a word's record.
    pub fn get(&mut self, word_id: &str) -> &mut WordProgress {
        self.state.by_id.entry(word_id.to_string()).or_default()
    }

    /// Read-only lookup that does not create a record.
    pub fn peek(&self, word_id: &str) -> Option<&WordProgress> {
        self.state.by_id.get(word_id)
    }

    pub fn stars(&self) -> u32 {
        self.state.stars
    }

    pub fn award_star(&mut self) {
        self.state.stars = self.state.stars.saturating_add(1);
    }

    pub fn selected_pack_id(&self) -> &str {
        &self.state.selected_pack_id
    }

    pub fn set_selected_pack(&mut self, pack_id: &str) {
        self.state.selected_pack_id = pack_id.to_string();
    }

    pub fn data_version_seen(&self) -> u64 {
        self.state.data_version_seen
    }

    pub fn set_data_version_seen(&mut self, version: u64) {
        self.state.data_version_seen = version;
    }

    /// Write the whole state as one snapshot.
    pub fn persist(&self) -> Result<()> {
        self.backend.save(&self.state)
    }

    /// Like [`persist`](Self::persist), but failures are only logged.
    pub fn persist_or_log(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "failed to persist progress");
        }
    }

    /// Make sure the selected pack exists, falling back to the first pack.
    /// Returns true when the selection changed.
    pub fn ensure_valid_pack(&mut self, catalog: &Catalog) -> bool {
        if catalog.has_pack(&self.state.selected_pack_id) {
            return false;
        }
        match catalog.first_pack() {
            Some(first) => {
                tracing::info!(
                    stale = %self.state.selected_pack_id,
                    fallback = %first.id,
                    "selected pack not in catalog, falling back"
                );
                self.state.selected_pack_id = first.id.clone();
                true
            }
            None => false,
        }
    }

    /// Discard all progress, stars and the seen data version. The selected
    /// pack survives if the catalog still has it.
    pub fn reset(&mut self, catalog: &Catalog) -> Result<()> {
        let previous_pack = std::mem::take(&mut self.state.selected_pack_id);
        self.state = ProgressState::default();
        if catalog.has_pack(&previous_pack) {
            self.state.selected_pack_id = previous_pack;
        } else {
            self.ensure_valid_pack(catalog);
        }
        tracing::info!(pack = %self.state.selected_pack_id, "progress reset");
        self.persist()
    }
}
