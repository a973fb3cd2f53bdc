use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::engine::progress::WordProgress;

/// Fixed storage key; the snapshot file is named after it.
pub const STORAGE_KEY: &str = "una_words_progress_v1";

pub const DEFAULT_PACK_ID: &str = "week_1";

/// Everything the learner has earned, persisted as one snapshot.
///
/// Each field falls back to its default independently when the stored value
/// has the wrong shape, so one bad field does not cost the rest of the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    #[serde(default, deserialize_with = "lenient")]
    pub data_version_seen: u64,
    #[serde(default = "default_pack_id", deserialize_with = "lenient_pack_id")]
    pub selected_pack_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub stars: u32,
    #[serde(default, deserialize_with = "lenient_by_id")]
    pub by_id: BTreeMap<String, WordProgress>,
}

fn default_pack_id() -> String {
    DEFAULT_PACK_ID.to_string()
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            data_version_seen: 0,
            selected_pack_id: default_pack_id(),
            stars: 0,
            by_id: BTreeMap::new(),
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_pack_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id: String = lenient(deserializer)?;
    if id.trim().is_empty() {
        Ok(default_pack_id())
    } else {
        Ok(id)
    }
}

/// Word records that fail to parse are skipped individually.
fn lenient_by_id<'de, D>(deserializer: D) -> Result<BTreeMap<String, WordProgress>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(entries) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(id, raw)| {
            serde_json::from_value::<WordProgress>(raw)
                .ok()
                .map(|p| (id, p.normalized()))
        })
        .collect())
}
