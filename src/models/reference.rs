use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// A curated "top restaurants" entry. Anything the page did not provide stays `None`.
#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct ReferenceEntry {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
}

impl ReferenceEntry {
    /// Lines printed when the user asks to learn more about a match.
    pub fn details(&self) -> Vec<String> {
        [&self.name, &self.description, &self.address, &self.phone, &self.url]
            .into_iter()
            .map(|field| field.clone().unwrap_or_else(|| "Not available".to_string()))
            .collect()
    }
}

/// Exact name match against the reference list.
pub fn find_reference<'a>(
    entries: &'a [ReferenceEntry],
    name: &str,
) -> Option<&'a ReferenceEntry> {
    entries.iter().find(|entry| entry.name.as_deref() == Some(name))
}
