use anyhow::Context;
use tracing::info;
use crate::models::restaurant::Location;

pub trait MapOpener {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

/// Hands the link to the desktop's default browser.
pub struct BrowserMapOpener;

impl MapOpener for BrowserMapOpener {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        info!("Opening {} in the browser", url);
        open::that(url).with_context(|| format!("Failed to open {}", url))
    }
}

pub fn map_url(location: Location) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        location.lat, location.lng
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_queries_latitude_then_longitude() {
        let url = map_url(Location { lat: 42.3314, lng: -83.0458 });
        assert_eq!(url, "https://www.google.com/maps/search/?api=1&query=42.3314,-83.0458");
    }
}
