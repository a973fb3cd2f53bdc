pub mod feed;
pub mod resolver;
pub mod version;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Contents of `meta.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default)]
    pub data_version: u64,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Meta {
    pub fn updated_on(&self) -> Option<NaiveDate> {
        let raw = self.updated_at.as_deref()?;
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
    }

    /// Date for display: ISO dates are reformatted, anything else is shown as-is.
    pub fn updated_label(&self) -> String {
        match (self.updated_on(), self.updated_at.as_deref()) {
            (Some(date), _) => date.format("%Y-%m-%d").to_string(),
            (None, Some(raw)) if !raw.trim().is_empty() => raw.trim().to_string(),
            _ => "-".to_string(),
        }
    }
}

/// A single library entry. Older feeds use the short keys `s`, `m` and `ipa`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    #[serde(alias = "s", default)]
    pub spelling: String,
    #[serde(alias = "m", default)]
    pub meaning: String,
    #[serde(alias = "ipa", default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl WordEntry {
    pub fn new(spelling: &str, meaning: &str) -> Self {
        Self {
            spelling: spelling.to_string(),
            meaning: meaning.to_string(),
            phonetic: None,
            archived: false,
        }
    }

    pub fn phonetic(&self) -> Option<&str> {
        self.phonetic
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub content: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_ids",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub include: Vec<String>,
}

/// Id lists tolerate `null` or a non-array (read as empty) and skip
/// non-string elements.
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(id) => Some(id),
            _ => None,
        })
        .collect())
}

impl Pack {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

/// Read-only word catalog: the three feeds after loading.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub meta: Meta,
    pub library: BTreeMap<String, WordEntry>,
    pub packs: Vec<Pack>,
}

impl Catalog {
    pub fn new(meta: Meta, library: BTreeMap<String, WordEntry>, packs: Vec<Pack>) -> Self {
        Self {
            meta,
            library,
            packs,
        }
    }

    pub fn word(&self, id: &str) -> Option<&WordEntry> {
        self.library.get(id)
    }

    pub fn pack(&self, id: &str) -> Option<&Pack> {
        self.packs.iter().find(|p| p.id == id)
    }

    pub fn has_pack(&self, id: &str) -> bool {
        self.pack(id).is_some()
    }

    pub fn first_pack(&self) -> Option<&Pack> {
        self.packs.first()
    }

    pub fn pack_index(&self, id: &str) -> Option<usize> {
        self.packs.iter().position(|p| p.id == id)
    }

    pub fn word_ids(&self) -> impl Iterator<Item = &str> {
        self.library.keys().map(String::as_str)
    }

    /// A word is selectable when it exists and is not archived.
    pub fn is_eligible(&self, id: &str) -> bool {
        self.word(id).is_some_and(|w| !w.archived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_short_keys_map_onto_word_entry() {
        let json = r#"{"s": "apple", "m": "蘋果", "ipa": "/ˈæp.əl/"}"#;
        let entry: WordEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.spelling, "apple");
        assert_eq!(entry.meaning, "蘋果");
        assert_eq!(entry.phonetic(), Some("/ˈæp.əl/"));
        assert!(!entry.archived);
    }

    #[test]
    fn long_keys_and_archived_flag() {
        let json = r#"{"spelling": "cat", "meaning": "貓", "phonetic": "", "archived": true}"#;
        let entry: WordEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.spelling, "cat");
        assert_eq!(entry.phonetic(), None);
        assert!(entry.archived);
    }

    #[test]
    fn pack_without_optional_fields() {
        let pack: Pack = serde_json::from_str(r#"{"id": "p1", "content": ["w1"]}"#).unwrap();
        assert!(pack.include.is_empty());
        assert_eq!(pack.display_title(), "p1");
    }

    #[test]
    fn pack_id_lists_tolerate_null_and_junk() {
        let pack: Pack =
            serde_json::from_str(r#"{"id": "p1", "content": null, "include": null}"#).unwrap();
        assert!(pack.content.is_empty());
        assert!(pack.include.is_empty());

        let pack: Pack =
            serde_json::from_str(r#"{"id": "p2", "content": ["w1", 7, null, "w2"], "include": "p1"}"#)
                .unwrap();
        assert_eq!(pack.content, vec!["w1", "w2"]);
        assert!(pack.include.is_empty());
    }

    #[test]
    fn meta_updated_label() {
        let meta: Meta =
            serde_json::from_str(r#"{"dataVersion": 3, "updatedAt": "2025-12-28"}"#).unwrap();
        assert_eq!(meta.data_version, 3);
        assert_eq!(meta.updated_on(), NaiveDate::from_ymd_opt(2025, 12, 28));
        assert_eq!(meta.updated_label(), "2025-12-28");

        let loose = Meta {
            data_version: 1,
            updated_at: Some("last winter".to_string()),
        };
        assert_eq!(loose.updated_label(), "last winter");
        assert_eq!(Meta::default().updated_label(), "-");
    }

    #[test]
    fn eligibility_excludes_archived_and_missing() {
        let mut library = BTreeMap::new();
        library.insert("a".to_string(), WordEntry::new("apple", "蘋果"));
        let mut archived = WordEntry::new("old", "舊");
        archived.archived = true;
        library.insert("b".to_string(), archived);
        let catalog = Catalog::new(Meta::default(), library, Vec::new());

        assert!(catalog.is_eligible("a"));
        assert!(!catalog.is_eligible("b"));
        assert!(!catalog.is_eligible("zzz"));
    }
}
