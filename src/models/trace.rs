use serde::{Deserialize, Serialize};
use crate::models::restaurant::RestaurantRecord;

pub const NO_RESULTS: &str = "No results";

/// Funnel of a session: the summary of every record present after each stage.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct TraceDocument {
    #[serde(rename = "initial results")]
    pub initial_results: Vec<String>,
    #[serde(rename = "type results")]
    pub type_results: Vec<String>,
    #[serde(rename = "rating results")]
    pub rating_results: Vec<String>,
    #[serde(rename = "price results")]
    pub price_results: Vec<String>,
}

/// Summaries for a stage, or the placeholder when the stage produced nothing.
pub fn stage_summaries(records: Option<&[RestaurantRecord]>) -> Vec<String> {
    match records {
        Some(records) if !records.is_empty() => {
            records.iter().map(RestaurantRecord::summary).collect()
        }
        _ => vec![NO_RESULTS.to_string()],
    }
}

pub fn is_placeholder(results: &[String]) -> bool {
    results.len() == 1 && results[0] == NO_RESULTS
}
