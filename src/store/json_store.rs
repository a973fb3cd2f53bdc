use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::engine::progress::SnapshotStore;
use crate::store::schema::{ProgressState, STORAGE_KEY};

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.base_dir.join(format!("{STORAGE_KEY}.json"))
    }
}

pub fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("una-words")
}

impl SnapshotStore for JsonStore {
    fn load(&self) -> ProgressState {
        let path = self.snapshot_path();
        if !path.exists() {
            return ProgressState::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "progress snapshot unreadable, starting fresh");
                    ProgressState::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read progress snapshot");
                ProgressState::default()
            }
        }
    }

    fn save(&self, state: &ProgressState) -> Result<()> {
        let path = self.snapshot_path();
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(state)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}
