use std::io::{BufRead, Write};
use tracing::info;
use crate::controller::filter_controller::{price_stage, rating_stage, type_stage, FilterStage, StageOutcome};
use crate::controller::finalize_controller::{finalize, PREVIEW_LIMIT};
use crate::controller::listing_controller::ListingController;
use crate::controller::reference_controller::ReferenceController;
use crate::helpers::console::Console;
use crate::helpers::map::MapOpener;
use crate::models::restaurant::RestaurantRecord;
use crate::models::trace::{stage_summaries, TraceDocument};
use crate::repositories::trace_repo::TraceRepo;

pub const EXIT_SENTINEL: &str = "exit";

#[derive(Debug, PartialEq)]
pub enum SessionOutcome {
    /// The user typed the exit sentinel while retrying a location.
    Exited,
    Finished(Option<RestaurantRecord>),
}

pub struct SessionController {
    pub listings: ListingController,
    pub references: ReferenceController,
    pub trace_repo: TraceRepo,
    pub map_opener: Box<dyn MapOpener>,
    pub type_attempts: Option<usize>,
}

impl SessionController {
    pub fn run<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> anyhow::Result<SessionOutcome> {
        let term = console.ask("Enter a city: ")?;
        let references = self.references.fetch_reference(&term)?;

        let mut records = self.listings.fetch_listings(&term)?;
        while records.is_empty() {
            let retry = console.ask("No results. Enter a city: ")?;
            if retry.eq_ignore_ascii_case(EXIT_SENTINEL) {
                console.say("Session Ended")?;
                return Ok(SessionOutcome::Exited);
            }
            records = self.listings.fetch_listings(&retry)?;
        }

        console.blank()?;
        console.say(format!(
            "Printing the first {} of {} results",
            records.len().min(PREVIEW_LIMIT),
            records.len()
        ))?;
        preview(console, &records)?;

        let mut trace = TraceDocument {
            initial_results: stage_summaries(Some(records.as_slice())),
            type_results: stage_summaries(None),
            rating_results: stage_summaries(None),
            price_results: stage_summaries(None),
        };

        let mut candidates = records;
        for stage in [FilterStage::Type, FilterStage::Rating, FilterStage::Price] {
            let outcome = match stage {
                FilterStage::Type => type_stage(console, candidates, self.type_attempts)?,
                FilterStage::Rating => rating_stage(console, candidates)?,
                FilterStage::Price => price_stage(console, candidates)?,
            };
            info!("{:?} stage left {} candidates", stage, outcome.records().len());

            let summaries = outcome.trace_summaries();
            match stage {
                FilterStage::Type => trace.type_results = summaries,
                FilterStage::Rating => trace.rating_results = summaries,
                FilterStage::Price => trace.price_results = summaries,
            }

            if stage != FilterStage::Price {
                if let StageOutcome::Applied(records) = &outcome {
                    console.blank()?;
                    console.say("Previewing up to 50 results")?;
                    preview(console, records)?;
                }
            }

            candidates = outcome.into_records();
            if candidates.len() == 1 {
                break;
            }
        }

        self.trace_repo.store(&trace)?;
        let chosen = finalize(console, &candidates, &references, self.map_opener.as_ref())?;
        Ok(SessionOutcome::Finished(chosen))
    }
}

fn preview<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    records: &[RestaurantRecord],
) -> anyhow::Result<()> {
    console.say("---------------------------")?;
    for record in records.iter().take(PREVIEW_LIMIT) {
        console.say(record.summary())?;
    }
    Ok(())
}
