use std::time::Duration;
use anyhow::{anyhow, bail, Context};
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use crate::models::reference::ReferenceEntry;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub trait PageFetcher {
    fn fetch_html(&self, url: &str) -> anyhow::Result<String>;
}

pub struct WebPageClient {
    client: Client,
}

impl WebPageClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

impl PageFetcher for WebPageClient {
    fn fetch_html(&self, url: &str) -> anyhow::Result<String> {
        info!("Fetching reference page {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {} for {}", status, url);
        }

        response.text().context("Failed to read response body")
    }
}

/// Parses a map-stack page into one entry per card. Every field of an entry is read from the
/// same card as its heading, so a card missing a phone number cannot shift the others.
pub fn parse_reference_page(html: &str) -> anyhow::Result<Vec<ReferenceEntry>> {
    let document = Html::parse_document(html);
    let heading = selector(".c-mapstack__card-hed")?;
    let title = selector("h1")?;
    let description = selector(".c-entry-content.venu-card p")?;
    let address = selector(".c-mapstack__address a")?;
    let phone = selector(".c-mapstack__phone a")?;
    let website = selector(r#".info a[data-analytics-link="link-icon"]"#)?;

    let mut entries = Vec::new();
    for heading_el in document.select(&heading) {
        let name = match heading_el.select(&title).next().and_then(text_of) {
            Some(name) => name,
            None => continue,
        };
        let card = enclosing_card(heading_el);

        entries.push(ReferenceEntry {
            name: Some(name),
            description: card.select(&description).next().and_then(text_of),
            address: card.select(&address).next().and_then(text_of),
            phone: card.select(&phone).next().and_then(text_of),
            url: card
                .select(&website)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| href.trim().to_string()),
        });
    }

    debug!("Parsed {} reference entries", entries.len());
    Ok(entries)
}

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {}: {:?}", css, e))
}

fn enclosing_card(heading: ElementRef<'_>) -> ElementRef<'_> {
    heading
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().classes().any(|c| c == "c-mapstack__card"))
        .or_else(|| heading.parent().and_then(ElementRef::wrap))
        .unwrap_or(heading)
}

/// Element text with runs of whitespace collapsed, `None` when blank.
fn text_of(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<Vec<_>>().join(" ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
