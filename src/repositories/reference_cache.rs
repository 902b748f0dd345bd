use std::path::{Path, PathBuf};
use crate::models::reference::ReferenceEntry;
use crate::repositories::json_file::{read_json, write_json};

/// Cities that have a curated "top restaurants" page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceCity {
    Detroit,
    AnnArbor,
}

impl ReferenceCity {
    pub fn from_term(term: &str) -> Option<ReferenceCity> {
        match term.trim().to_lowercase().as_str() {
            "detroit" => Some(ReferenceCity::Detroit),
            "ann arbor" | "ann_arbor" => Some(ReferenceCity::AnnArbor),
            _ => None,
        }
    }

    pub fn page_url(&self) -> &'static str {
        match self {
            ReferenceCity::Detroit => "https://detroit.eater.com/maps/best-restaurants-detroit-38",
            ReferenceCity::AnnArbor => "https://detroit.eater.com/maps/best-ann-arbor-restaurants",
        }
    }

    pub fn cache_file_name(&self) -> &'static str {
        match self {
            ReferenceCity::Detroit => "Detroit_webscrape.json",
            ReferenceCity::AnnArbor => "Ann_Arbor_webscrape.json",
        }
    }
}

pub struct ReferenceCacheRepo {
    cache_dir: PathBuf,
}

impl ReferenceCacheRepo {
    pub fn new(
        cache_dir: &Path,
    ) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    pub fn path_for(
        &self,
        city: ReferenceCity,
    ) -> PathBuf {
        self.cache_dir.join(city.cache_file_name())
    }

    pub fn load(
        &self,
        city: ReferenceCity,
    ) -> anyhow::Result<Option<Vec<ReferenceEntry>>> {
        read_json(&self.path_for(city))
    }

    pub fn store(
        &self,
        city: ReferenceCity,
        entries: &[ReferenceEntry],
    ) -> anyhow::Result<()> {
        write_json(&self.path_for(city), &entries)
    }
}
