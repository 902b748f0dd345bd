use std::io;
use tracing::warn;
use crate::config::Config;
use crate::controller::eater_scrape::WebPageClient;
use crate::controller::listing_controller::ListingController;
use crate::controller::reference_controller::ReferenceController;
use crate::controller::session_controller::{SessionController, SessionOutcome};
use crate::controller::yelp_search_api::{SearchApi, YelpSearchClient};
use crate::helpers::console::Console;
use crate::helpers::map::BrowserMapOpener;
use crate::helpers::trace_view::render_funnel;
use crate::repositories::listing_cache::ListingCacheRepo;
use crate::repositories::reference_cache::ReferenceCacheRepo;
use crate::repositories::trace_repo::TraceRepo;

pub mod eater_scrape;
pub mod filter_controller;
pub mod finalize_controller;
pub mod listing_controller;
pub mod reference_controller;
pub mod session_controller;
pub mod yelp_search_api;

/// Wires the real collaborators together and runs one interactive session on stdin/stdout.
pub fn run_session(
    config: &Config,
) -> anyhow::Result<SessionOutcome> {
    let search_api: Option<Box<dyn SearchApi>> = match YelpSearchClient::new(config) {
        Ok(client) => Some(Box::new(client)),
        Err(e) => {
            warn!("Search API unavailable, only cached cities will work: {}", e);
            None
        }
    };

    let session = SessionController {
        listings: ListingController::new(
            ListingCacheRepo::new(&config.cache_dir),
            search_api,
            config.page_size,
            config.max_results,
        ),
        references: ReferenceController::new(
            ReferenceCacheRepo::new(&config.cache_dir),
            Box::new(WebPageClient::new()?),
        ),
        trace_repo: TraceRepo::new(&config.trace_path),
        map_opener: Box::new(BrowserMapOpener),
        type_attempts: config.type_attempt_limit(),
    };

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    session.run(&mut console)
}

/// Prints the funnel recorded by the last session.
pub fn show_trace(
    config: &Config,
) -> anyhow::Result<()> {
    let trace = TraceRepo::new(&config.trace_path).load()?;
    for line in render_funnel(&trace) {
        println!("{}", line);
    }
    Ok(())
}
