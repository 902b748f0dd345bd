use anyhow::anyhow;
use time::OffsetDateTime;
use tracing::info;
use crate::controller::yelp_search_api::SearchApi;
use crate::models::restaurant::RestaurantRecord;
use crate::repositories::listing_cache::{CacheStatus, ListingCacheFile, ListingCacheRepo};

/// Resolves a location to restaurant records, from the cache when it is complete and from the
/// search API otherwise.
pub struct ListingController {
    cache_repo: ListingCacheRepo,
    search_api: Option<Box<dyn SearchApi>>,
    page_size: usize,
    max_results: usize,
}

impl ListingController {
    pub fn new(
        cache_repo: ListingCacheRepo,
        search_api: Option<Box<dyn SearchApi>>,
        page_size: usize,
        max_results: usize,
    ) -> Self {
        Self {
            cache_repo,
            search_api,
            page_size: page_size.max(1),
            max_results,
        }
    }

    pub fn fetch_listings(
        &self,
        term: &str,
    ) -> anyhow::Result<Vec<RestaurantRecord>> {
        let location = term.trim();
        let mut cache = match self.cache_repo.load(location)? {
            Some(cache) if cache.is_complete() => {
                info!("Using cached listings for {} ({} entries)", location, cache.businesses.len());
                return to_records(&cache);
            }
            Some(cache) => {
                info!("Resuming partial listing cache for {} at {} entries", location, cache.businesses.len());
                cache
            }
            None => {
                info!("No listing cache for {}, querying the search API", location);
                ListingCacheFile::partial()
            }
        };

        loop {
            let offset = cache.businesses.len();
            if offset < self.max_results {
                let search_api = self.search_api.as_deref().ok_or_else(|| {
                    anyhow!("No complete cache for {} and no search API key configured", location)
                })?;
                let limit = self.page_size.min(self.max_results - offset);
                let page = search_api.search_page(location, offset, limit)?;
                if let Some(total) = page.total {
                    cache.expected_total = Some(total.min(self.max_results));
                }
                if page.businesses.len() < limit {
                    cache.status = CacheStatus::Complete;
                }
                cache.businesses.extend(page.businesses);
            }
            if cache.businesses.len() >= self.max_results || cache.reached_expected_total() {
                cache.status = CacheStatus::Complete;
            }

            cache.fetched_at = Some(OffsetDateTime::now_utc());
            self.cache_repo.store(location, &cache)?;
            if cache.is_complete() {
                break;
            }
        }

        info!("Cached {} listings for {}", cache.businesses.len(), location);
        to_records(&cache)
    }
}

fn to_records(
    cache: &ListingCacheFile,
) -> anyhow::Result<Vec<RestaurantRecord>> {
    cache
        .businesses
        .iter()
        .map(RestaurantRecord::from_raw)
        .collect()
}
