use tracing::info;
use crate::controller::eater_scrape::{parse_reference_page, PageFetcher};
use crate::models::reference::ReferenceEntry;
use crate::repositories::reference_cache::{ReferenceCacheRepo, ReferenceCity};

pub struct ReferenceController {
    cache_repo: ReferenceCacheRepo,
    fetcher: Box<dyn PageFetcher>,
}

impl ReferenceController {
    pub fn new(
        cache_repo: ReferenceCacheRepo,
        fetcher: Box<dyn PageFetcher>,
    ) -> Self {
        Self {
            cache_repo,
            fetcher,
        }
    }

    /// Top restaurants for a city. Cities without a curated page yield an empty list.
    pub fn fetch_reference(
        &self,
        term: &str,
    ) -> anyhow::Result<Vec<ReferenceEntry>> {
        let city = match ReferenceCity::from_term(term) {
            Some(city) => city,
            None => {
                info!("No top restaurant list for {}", term);
                return Ok(Vec::new());
            }
        };

        if let Some(entries) = self.cache_repo.load(city)? {
            info!("Using cached top restaurants for {:?} ({} entries)", city, entries.len());
            return Ok(entries);
        }

        let html = self.fetcher.fetch_html(city.page_url())?;
        let entries = parse_reference_page(&html)?;
        self.cache_repo.store(city, &entries)?;
        info!("Cached {} top restaurants for {:?}", entries.len(), city);
        Ok(entries)
    }
}
