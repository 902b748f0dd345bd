use std::io::{BufRead, Write};
use tracing::{info, warn};
use crate::helpers::console::Console;
use crate::models::restaurant::{PriceTier, RestaurantRecord};
use crate::models::trace::stage_summaries;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterStage {
    Type,
    Rating,
    Price,
}

/// What a filter stage did with its input.
#[derive(Clone, Debug, PartialEq)]
pub enum StageOutcome {
    /// The user skipped the stage, input passes through.
    Declined(Vec<RestaurantRecord>),
    Applied(Vec<RestaurantRecord>),
    /// Nothing matched within the allowed attempts, input passes through.
    NoMatch(Vec<RestaurantRecord>),
}

impl StageOutcome {
    pub fn records(&self) -> &[RestaurantRecord] {
        match self {
            StageOutcome::Declined(records)
            | StageOutcome::Applied(records)
            | StageOutcome::NoMatch(records) => records,
        }
    }

    pub fn into_records(self) -> Vec<RestaurantRecord> {
        match self {
            StageOutcome::Declined(records)
            | StageOutcome::Applied(records)
            | StageOutcome::NoMatch(records) => records,
        }
    }

    pub fn trace_summaries(&self) -> Vec<String> {
        match self {
            StageOutcome::NoMatch(_) => stage_summaries(None),
            _ => stage_summaries(Some(self.records())),
        }
    }
}

pub fn filter_by_type(
    records: &[RestaurantRecord],
    food_type: &str,
) -> Vec<RestaurantRecord> {
    let needle = food_type.to_lowercase();
    records
        .iter()
        .filter(|r| r.category.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn filter_by_rating(
    records: &[RestaurantRecord],
    min_rating: f64,
) -> Vec<RestaurantRecord> {
    records
        .iter()
        .filter(|r| r.rating >= min_rating)
        .cloned()
        .collect()
}

pub fn filter_by_price(
    records: &[RestaurantRecord],
    tier: PriceTier,
) -> Vec<RestaurantRecord> {
    records
        .iter()
        .filter(|r| r.price == Some(tier))
        .cloned()
        .collect()
}

pub fn parse_rating(answer: &str) -> Result<f64, String> {
    let rating: f64 = answer
        .parse()
        .map_err(|_| "Invalid input. Please enter a number.".to_string())?;
    if (1.0..=5.0).contains(&rating) {
        Ok(rating)
    } else {
        Err("Invalid input. Please enter a rating between 1 and 5.".to_string())
    }
}

pub fn parse_price(answer: &str) -> Result<PriceTier, String> {
    PriceTier::parse(answer).ok_or_else(|| "Invalid price. Please enter 1-4 dollar signs.".to_string())
}

/// Case-insensitive category substring filter. With `max_attempts` set to `None` it keeps
/// asking until some category matches, otherwise it gives up with `NoMatch`.
pub fn type_stage<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    records: Vec<RestaurantRecord>,
    max_attempts: Option<usize>,
) -> anyhow::Result<StageOutcome> {
    if !console.confirm("Do you want to filter the type of food?")? {
        return Ok(StageOutcome::Declined(records));
    }

    let mut attempts = 0;
    loop {
        let food_type = console.ask("Enter a food type: ")?;
        attempts += 1;
        let matched = filter_by_type(&records, &food_type);
        if !matched.is_empty() {
            info!("Type filter {:?} kept {} of {}", food_type, matched.len(), records.len());
            return Ok(StageOutcome::Applied(matched));
        }

        if max_attempts.map_or(false, |max| attempts >= max) {
            warn!("No restaurants matched any of {} food types, skipping the type filter", attempts);
            console.say("No restaurants of that type found. Keeping all results.")?;
            return Ok(StageOutcome::NoMatch(records));
        }
        console.say("No restaurants found. Try again.")?;
    }
}

pub fn rating_stage<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    records: Vec<RestaurantRecord>,
) -> anyhow::Result<StageOutcome> {
    if !console.confirm("Do you want to filter the rating?")? {
        return Ok(StageOutcome::Declined(records));
    }

    let min_rating = console.ask_until("Enter a rating: ", parse_rating)?;
    let matched = filter_by_rating(&records, min_rating);
    info!("Rating filter >= {} kept {} of {}", min_rating, matched.len(), records.len());
    Ok(StageOutcome::Applied(matched))
}

pub fn price_stage<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    records: Vec<RestaurantRecord>,
) -> anyhow::Result<StageOutcome> {
    if !console.confirm("Do you want to filter the price?")? {
        return Ok(StageOutcome::Declined(records));
    }

    let tier = console.ask_until("Enter a price: ", parse_price)?;
    let matched = filter_by_price(&records, tier);
    info!("Price filter {} kept {} of {}", tier, matched.len(), records.len());
    Ok(StageOutcome::Applied(matched))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::helpers::console::tests::{scripted, transcript};

    pub fn record(name: &str, category: &str, rating: f64, price: Option<PriceTier>) -> RestaurantRecord {
        RestaurantRecord {
            name: name.to_string(),
            geometry: None,
            address: "1 St".to_string(),
            price,
            rating,
            category: category.to_string(),
            url: "http://x".to_string(),
        }
    }

    fn sample() -> Vec<RestaurantRecord> {
        vec![
            record("Buddy's", "Pizza", 2.0, Some(PriceTier::Two)),
            record("Lafayette", "Hot Dogs", 3.0, Some(PriceTier::One)),
            record("Selden", "New American", 4.0, Some(PriceTier::Three)),
            record("Mystery", "Diner", 4.5, None),
        ]
    }

    fn names(records: &[RestaurantRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn rating_threshold_is_inclusive() {
        let records = vec![
            record("Two", "Diner", 2.0, None),
            record("Three", "Diner", 3.0, None),
            record("Four", "Diner", 4.0, None),
        ];
        let mut console = scripted(&["yes", "3"]);
        let outcome = rating_stage(&mut console, records).unwrap();
        assert_eq!(names(outcome.records()), vec!["Three", "Four"]);
    }

    #[test]
    fn rating_filter_is_monotonic() {
        let records = sample();
        let thresholds = [1.0, 2.0, 2.5, 3.0, 4.0, 4.5, 5.0];
        for pair in thresholds.windows(2) {
            let looser = filter_by_rating(&records, pair[0]);
            let stricter = filter_by_rating(&records, pair[1]);
            assert!(stricter.iter().all(|r| looser.contains(r)), "{:?}", pair);
        }
    }

    #[test]
    fn price_filter_is_exact_and_idempotent() {
        let once = filter_by_price(&sample(), PriceTier::Two);
        assert_eq!(names(&once), vec!["Buddy's"]);
        assert_eq!(filter_by_price(&once, PriceTier::Two), once);
    }

    #[test]
    fn type_match_ignores_case_and_matches_substrings() {
        assert_eq!(names(&filter_by_type(&sample(), "AMERICAN")), vec!["Selden"]);
        assert_eq!(names(&filter_by_type(&sample(), "dog")), vec!["Lafayette"]);
    }

    #[test]
    fn declined_stage_passes_records_through() {
        let mut console = scripted(&["no"]);
        let outcome = price_stage(&mut console, sample()).unwrap();
        assert_eq!(outcome, StageOutcome::Declined(sample()));
        assert_eq!(outcome.trace_summaries().len(), 4);
    }

    #[test]
    fn invalid_rating_and_price_reprompt() {
        let mut console = scripted(&["yes", "abc", "7", "0.5", "4"]);
        let outcome = rating_stage(&mut console, sample()).unwrap();
        assert_eq!(names(outcome.records()), vec!["Selden", "Mystery"]);
        let out = transcript(console);
        assert_eq!(out.matches("Enter a rating: ").count(), 4);

        let mut console = scripted(&["yes", "$$$$$", "cheap", "$"]);
        let outcome = price_stage(&mut console, sample()).unwrap();
        assert_eq!(names(outcome.records()), vec!["Lafayette"]);
        assert_eq!(transcript(console).matches("Invalid price").count(), 2);
    }

    #[test]
    fn unbounded_type_filter_keeps_asking_without_a_match() {
        let mut answers = vec!["yes"];
        answers.extend(std::iter::repeat("pizza place").take(25));
        answers.push("diner");
        let mut console = scripted(&answers);

        let outcome = type_stage(&mut console, sample(), None).unwrap();
        assert_eq!(names(outcome.records()), vec!["Mystery"]);
        assert_eq!(transcript(console).matches("No restaurants found. Try again.").count(), 25);
    }

    #[test]
    fn unbounded_type_filter_never_returns_on_its_own() {
        let mut answers = vec!["yes"];
        answers.extend(std::iter::repeat("sushi").take(100));
        let mut console = scripted(&answers);

        // Only running out of input stops it.
        assert!(type_stage(&mut console, sample(), None).is_err());
    }

    #[test]
    fn bounded_type_filter_reports_no_match() {
        let mut console = scripted(&["yes", "sushi", "ramen", "tapas"]);
        let outcome = type_stage(&mut console, sample(), Some(3)).unwrap();
        assert_eq!(outcome, StageOutcome::NoMatch(sample()));
        assert_eq!(outcome.trace_summaries(), vec!["No results".to_string()]);
    }

    #[test]
    fn empty_result_is_traced_as_placeholder() {
        let mut console = scripted(&["yes", "$$$$"]);
        let outcome = price_stage(&mut console, sample()).unwrap();
        assert!(outcome.records().is_empty());
        assert_eq!(outcome.trace_summaries(), vec!["No results".to_string()]);
    }
}
