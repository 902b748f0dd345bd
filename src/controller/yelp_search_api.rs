use std::thread;
use std::time::Duration;
use anyhow::{anyhow, bail, Context};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use crate::config::Config;

pub const RETRY_LIMIT: usize = 5;
const RETRY_PAUSE: Duration = Duration::from_secs(1);

/// Raw businesses of one search page plus the upstream `total`, when reported.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchPage {
    pub businesses: Vec<Value>,
    pub total: Option<usize>,
}

pub trait SearchApi {
    fn search_page(
        &self,
        location: &str,
        offset: usize,
        limit: usize,
    ) -> anyhow::Result<SearchPage>;
}

#[derive(Clone, Serialize, Deserialize, Debug)]
struct YelpSearchParams {
    term: String,
    location: String,
    limit: usize,
    offset: usize,
}

pub struct YelpSearchClient {
    client: Client,
    endpoint: String,
    api_key: String,
    search_term: String,
    retry_pause: Duration,
}

impl YelpSearchClient {
    pub fn new(
        config: &Config,
    ) -> anyhow::Result<Self> {
        let api_key = config
            .yelp_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("YELP_API_KEY is not set, cannot search uncached locations"))?;

        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.search_endpoint.clone(),
            api_key,
            search_term: config.search_term.clone(),
            retry_pause: RETRY_PAUSE,
        })
    }
}

impl SearchApi for YelpSearchClient {
    fn search_page(
        &self,
        location: &str,
        offset: usize,
        limit: usize,
    ) -> anyhow::Result<SearchPage> {
        let params = YelpSearchParams {
            term: self.search_term.clone(),
            location: location.to_string(),
            limit,
            offset,
        };

        for attempt in 1..=RETRY_LIMIT {
            debug!("Requesting search page with params: {:?}", params);
            let res = self
                .client
                .get(&self.endpoint)
                .query(&params)
                .header(ACCEPT, "application/json")
                .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
                .send();

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        warn!("Search API answered {} on attempt {}", status, attempt);
                    } else {
                        let body: Value = response
                            .json()
                            .with_context(|| format!("Search API returned a non JSON body ({})", status))?;
                        let page = parse_search_response(body)?;
                        info!("Fetched {} businesses for {} at offset {}", page.businesses.len(), location, offset);
                        return Ok(page);
                    }
                }
                Err(e) => {
                    warn!("Search request failed on attempt {} due to: {}", attempt, e);
                }
            }
            if attempt < RETRY_LIMIT {
                thread::sleep(self.retry_pause);
            }
        }

        Err(anyhow!("Search API did not answer after {} attempts, BAILING", RETRY_LIMIT))
    }
}

/// Pulls the `businesses` list and `total` out of a search response. An `error` object or a
/// missing list is fatal.
pub fn parse_search_response(
    body: Value,
) -> anyhow::Result<SearchPage> {
    if let Some(error) = body.get("error") {
        let description = error["description"].as_str().unwrap_or("Unknown error");
        bail!("Search API error: {}", description);
    }

    match body {
        Value::Object(mut map) => {
            let total = map
                .get("total")
                .and_then(Value::as_u64)
                .map(|total| total as usize);
            match map.remove("businesses") {
                Some(Value::Array(businesses)) => Ok(SearchPage { businesses, total }),
                _ => bail!("Malformed search response: no businesses list"),
            }
        }
        _ => bail!("Malformed search response: expected a JSON object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::helpers::test_server::{http_response, serve};

    fn client(endpoint: &str) -> YelpSearchClient {
        let mut config = Config::for_tests();
        config.yelp_api_key = Some("secret".to_string());
        config.search_endpoint = endpoint.to_string();
        let mut client = YelpSearchClient::new(&config).unwrap();
        client.retry_pause = Duration::from_millis(10);
        client
    }

    fn ok_body() -> String {
        json!({"businesses": [{"name": "A"}, {"name": "B"}], "total": 2}).to_string()
    }

    #[test]
    fn extracts_businesses_and_total() {
        let body = json!({"businesses": [{"name": "A"}, {"name": "B"}], "total": 240});
        let page = parse_search_response(body).unwrap();
        assert_eq!(page.businesses.len(), 2);
        assert_eq!(page.total, Some(240));
    }

    #[test]
    fn error_object_is_fatal() {
        let body = json!({"error": {"code": "VALIDATION_ERROR", "description": "Too many results requested"}});
        let err = parse_search_response(body).unwrap_err();
        assert!(err.to_string().contains("Too many results requested"));
    }

    #[test]
    fn missing_businesses_is_fatal() {
        assert!(parse_search_response(json!({"total": 0})).is_err());
        assert!(parse_search_response(json!([1, 2])).is_err());
    }

    #[test]
    fn client_requires_an_api_key() {
        let mut config = Config::for_tests();
        config.yelp_api_key = None;
        assert!(YelpSearchClient::new(&config).is_err());
        config.yelp_api_key = Some("  ".to_string());
        assert!(YelpSearchClient::new(&config).is_err());
        config.yelp_api_key = Some("secret".to_string());
        assert!(YelpSearchClient::new(&config).is_ok());
    }

    #[test]
    fn sends_bearer_token_and_window_params() {
        let (endpoint, server) = serve("/v3/businesses/search", vec![http_response("200 OK", &ok_body())]);

        let page = client(&endpoint).search_page("Ann Arbor", 950, 50).unwrap();
        assert_eq!(page.businesses.len(), 2);

        let requests = server.join().unwrap();
        assert_eq!(requests.len(), 1);
        let request_line = requests[0].lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /v3/businesses/search?term=food&location=Ann+Arbor&limit=50&offset=950 HTTP/1.1"
        );
        assert!(requests[0].to_lowercase().contains("authorization: bearer secret"));
    }

    #[test]
    fn unavailable_and_throttled_answers_are_retried() {
        let (endpoint, server) = serve("/v3/businesses/search", vec![
            http_response("503 Service Unavailable", "{}"),
            http_response("429 Too Many Requests", "{}"),
            http_response("200 OK", &ok_body()),
        ]);

        let page = client(&endpoint).search_page("Detroit", 0, 50).unwrap();
        assert_eq!(page.total, Some(2));
        assert_eq!(server.join().unwrap().len(), 3);
    }

    #[test]
    fn client_errors_fail_without_retrying() {
        let body = json!({"error": {"code": "LOCATION_NOT_FOUND", "description": "Could not execute search, try specifying a more exact location."}});
        let (endpoint, server) = serve("/v3/businesses/search", vec![
            http_response("400 Bad Request", &body.to_string()),
        ]);

        let err = client(&endpoint).search_page("Nowhereville", 0, 50).unwrap_err();
        assert!(err.to_string().starts_with("Search API error: Could not execute search"));
        assert_eq!(server.join().unwrap().len(), 1);
    }

    #[test]
    fn gives_up_after_the_retry_limit() {
        let responses = (0..RETRY_LIMIT)
            .map(|_| http_response("503 Service Unavailable", "{}"))
            .collect();
        let (endpoint, server) = serve("/v3/businesses/search", responses);

        let err = client(&endpoint).search_page("Detroit", 0, 50).unwrap_err();
        assert!(err.to_string().contains("did not answer after 5 attempts"));
        assert_eq!(server.join().unwrap().len(), RETRY_LIMIT);
    }
}
