use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::catalog::{Catalog, Meta, Pack, WordEntry};

pub const META_FEED: &str = "meta.json";
pub const LIBRARY_FEED: &str = "library.json";
pub const PACKS_FEED: &str = "packs.json";

#[derive(Embed)]
#[folder = "assets/data/"]
struct BundledFeeds;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("feed {feed} not found in {source_name}")]
    Missing {
        feed: &'static str,
        source_name: String,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("feed {feed} is malformed: {source}")]
    Parse {
        feed: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the three catalog feeds come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Bundled,
    Directory(PathBuf),
}

impl CatalogSource {
    pub fn from_dir(dir: Option<&str>) -> Self {
        match dir.map(str::trim) {
            Some(d) if !d.is_empty() => CatalogSource::Directory(PathBuf::from(d)),
            _ => CatalogSource::Bundled,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Bundled => "bundled catalog".to_string(),
            CatalogSource::Directory(dir) => dir.display().to_string(),
        }
    }

    fn read(&self, feed: &'static str) -> Result<String, CatalogError> {
        match self {
            CatalogSource::Bundled => {
                let file = BundledFeeds::get(feed).ok_or_else(|| CatalogError::Missing {
                    feed,
                    source_name: self.describe(),
                })?;
                Ok(String::from_utf8_lossy(file.data.as_ref()).into_owned())
            }
            CatalogSource::Directory(dir) => read_feed_file(dir, feed, &self.describe()),
        }
    }
}

fn read_feed_file(dir: &Path, feed: &'static str, source_name: &str) -> Result<String, CatalogError> {
    let path = dir.join(feed);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(CatalogError::Missing {
            feed,
            source_name: source_name.to_string(),
        }),
        Err(source) => Err(CatalogError::Io { path, source }),
    }
}

fn parse_feed<T: DeserializeOwned>(feed: &'static str, content: &str) -> Result<T, CatalogError> {
    serde_json::from_str(content).map_err(|source| CatalogError::Parse { feed, source })
}

/// Entries that are `null` or not a word object are dropped; the rest of the
/// library still loads.
fn parse_library(content: &str) -> Result<BTreeMap<String, WordEntry>, CatalogError> {
    let raw: BTreeMap<String, serde_json::Value> = parse_feed(LIBRARY_FEED, content)?;
    let total = raw.len();
    let library: BTreeMap<String, WordEntry> = raw
        .into_iter()
        .filter_map(|(id, value)| {
            serde_json::from_value::<Option<WordEntry>>(value)
                .ok()
                .flatten()
                .map(|entry| (id, entry))
        })
        .collect();
    if library.len() < total {
        tracing::warn!(
            skipped = total - library.len(),
            "library entries without word data ignored"
        );
    }
    Ok(library)
}

/// Load meta, library and packs, in that order. Any failure aborts the load.
pub fn load_catalog(source: &CatalogSource) -> Result<Catalog, CatalogError> {
    let meta: Meta = parse_feed(META_FEED, &source.read(META_FEED)?)?;
    let library = parse_library(&source.read(LIBRARY_FEED)?)?;
    let packs: Vec<Pack> = parse_feed(PACKS_FEED, &source.read(PACKS_FEED)?)?;

    tracing::info!(
        source = %source.describe(),
        data_version = meta.data_version,
        words = library.len(),
        packs = packs.len(),
        "catalog loaded"
    );

    Ok(Catalog::new(meta, library, packs))
}
