use std::fmt;
use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One business entry as the search API returns it. Only the fields we read are modelled,
/// the cache keeps the untouched JSON.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RawBusiness {
    pub name: Option<String>,
    pub coordinates: Value,
    pub location: RawLocation,
    pub price: Option<String>,
    pub rating: Option<Value>,
    pub categories: Vec<RawCategory>,
    pub url: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RawLocation {
    pub display_address: Option<Vec<String>>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RawCategory {
    pub title: Option<String>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum PriceTier {
    #[serde(rename = "$")]
    One,
    #[serde(rename = "$$")]
    Two,
    #[serde(rename = "$$$")]
    Three,
    #[serde(rename = "$$$$")]
    Four,
}

impl PriceTier {
    pub fn parse(value: &str) -> Option<PriceTier> {
        match value {
            "$" => Some(PriceTier::One),
            "$$" => Some(PriceTier::Two),
            "$$$" => Some(PriceTier::Three),
            "$$$$" => Some(PriceTier::Four),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::One => "$",
            PriceTier::Two => "$$",
            PriceTier::Three => "$$$",
            PriceTier::Four => "$$$$",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RestaurantRecord {
    pub name: String,
    /// `None` when the upstream coordinates were missing or not an object.
    pub geometry: Option<Location>,
    pub address: String,
    pub price: Option<PriceTier>,
    pub rating: f64,
    pub category: String,
    pub url: String,
}

impl RestaurantRecord {
    /// Builds a record from one raw search result. Fails if the payload is malformed or
    /// carries no numeric rating.
    pub fn from_raw(raw: &Value) -> anyhow::Result<Self> {
        let business: RawBusiness = serde_json::from_value(raw.clone())
            .context("Malformed business payload")?;
        RestaurantRecord::try_from(business)
    }

    /// `name, category, rating, price` as shown in listings and the trace file.
    pub fn summary(&self) -> String {
        format!(
            "{}, {}, {:.1}, {}",
            self.name,
            self.category,
            self.rating,
            self.price.map(|p| p.as_str()).unwrap_or("No Price"),
        )
    }
}

impl TryFrom<RawBusiness> for RestaurantRecord {
    type Error = anyhow::Error;

    fn try_from(business: RawBusiness) -> Result<Self, Self::Error> {
        let name = business.name.unwrap_or_else(|| "No Name".to_string());
        let rating = parse_rating(business.rating.as_ref())
            .with_context(|| format!("Invalid rating for business: {}", name))?;

        let geometry = match &business.coordinates {
            Value::Object(coords) => {
                let lat = coords.get("latitude").and_then(Value::as_f64);
                let lng = coords.get("longitude").and_then(Value::as_f64);
                lat.zip(lng).map(|(lat, lng)| Location { lat, lng })
            }
            _ => None,
        };

        let address = match business.location.display_address {
            Some(lines) if !lines.is_empty() => lines.join(", "),
            _ => "No Address".to_string(),
        };

        let category = business
            .categories
            .first()
            .and_then(|c| c.title.clone())
            .unwrap_or_else(|| "No Type".to_string());

        Ok(RestaurantRecord {
            name,
            geometry,
            address,
            price: business.price.as_deref().and_then(PriceTier::parse),
            rating,
            category,
            url: business.url.unwrap_or_else(|| "No URL".to_string()),
        })
    }
}

fn parse_rating(rating: Option<&Value>) -> anyhow::Result<f64> {
    match rating {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| anyhow!("rating {} is not a float", n)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("rating {:?} is not numeric", s)),
        Some(other) => bail!("rating {} is not numeric", other),
        None => bail!("rating is missing"),
    }
}
