use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;
use crate::repositories::json_file::{read_json, write_json};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Also assumed for files written before the status field existed.
    #[default]
    Complete,
    Partial,
}

/// `<term>.json`: the raw search results accumulated for one location.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ListingCacheFile {
    pub businesses: Vec<Value>,
    #[serde(default)]
    pub status: CacheStatus,
    /// Upstream `total` clamped to the fetch cap, once the search API has reported it.
    #[serde(default)]
    pub expected_total: Option<usize>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub fetched_at: Option<OffsetDateTime>,
}

impl ListingCacheFile {
    pub fn partial() -> Self {
        Self {
            businesses: Vec::new(),
            status: CacheStatus::Partial,
            expected_total: None,
            fetched_at: None,
        }
    }

    /// True once the accumulated businesses reach the reported upstream total.
    pub fn reached_expected_total(&self) -> bool {
        self.expected_total
            .map_or(false, |total| self.businesses.len() >= total)
    }

    pub fn is_complete(&self) -> bool {
        self.status == CacheStatus::Complete
    }
}

pub struct ListingCacheRepo {
    cache_dir: PathBuf,
}

impl ListingCacheRepo {
    pub fn new(
        cache_dir: &Path,
    ) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    pub fn path_for(
        &self,
        term: &str,
    ) -> PathBuf {
        self.cache_dir.join(format!("{}.json", cache_key(term)))
    }

    pub fn load(
        &self,
        term: &str,
    ) -> anyhow::Result<Option<ListingCacheFile>> {
        let path = self.path_for(term);
        debug!("Looking for listing cache at {}", path.display());
        read_json(&path)
    }

    pub fn store(
        &self,
        term: &str,
        cache: &ListingCacheFile,
    ) -> anyhow::Result<()> {
        write_json(&self.path_for(term), cache)
    }
}

/// File stem for a location term, `Ann Arbor` and `Ann_Arbor` share one file.
pub fn cache_key(term: &str) -> String {
    term.trim()
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
        .collect()
}
