use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Identifier wrapper for catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub u64);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a listing is offered for purchase or for lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    #[serde(rename = "For Sale")]
    ForSale,
    #[serde(rename = "For Rent")]
    ForRent,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 2] = [Self::ForSale, Self::ForRent];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ForSale => "For Sale",
            Self::ForRent => "For Rent",
        }
    }

    /// Exact, case-sensitive match against the display label.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == raw)
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered amenity list.
///
/// Catalog sources disagree on the wire shape: some send a JSON array, others a single
/// comma-joined string. Both are accepted here so nothing downstream has to care.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Amenities(Vec<String>);

impl Amenities {
    pub fn new(items: Vec<String>) -> Self {
        Self(items)
    }

    /// Split a comma-joined amenity string, dropping blank segments.
    pub fn from_joined(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Amenities {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmenities {
            Joined(String),
            List(Vec<String>),
        }

        Ok(match Option::<RawAmenities>::deserialize(deserializer)? {
            Some(RawAmenities::Joined(raw)) => Self::from_joined(&raw),
            Some(RawAmenities::List(items)) => Self::new(items),
            None => Self::default(),
        })
    }
}

impl From<Vec<String>> for Amenities {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}

/// Listing agent contact details. Every field is optional upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A single catalog listing as served to browsing clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    pub location: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub status: ListingStatus,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: u64,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub area: u32,
    #[serde(default)]
    pub year_built: Option<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Amenities,
    #[serde(default)]
    pub agent: AgentContact,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Lenient timestamp parsing: RFC 3339, naive ISO date-times (assumed UTC), or bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Unparseable timestamps become `None` instead of failing the whole record.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// Whole-dollar value of a float price, if it is finite, non-negative and has no cents.
pub fn whole_price(raw: f64) -> Option<u64> {
    let whole = raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0 && raw < u64::MAX as f64;
    whole.then_some(raw as u64)
}

/// Prices arrive as integers from hand-written catalogs and as floats (`500000.0`) from the
/// listing backend's exports.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Whole(u64),
    Float(f64),
}

impl RawPrice {
    fn into_price<E: de::Error>(self) -> Result<u64, E> {
        match self {
            Self::Whole(price) => Ok(price),
            Self::Float(raw) => whole_price(raw).ok_or_else(|| {
                E::custom(format_args!(
                    "price must be a non-negative whole number, got {raw}"
                ))
            }),
        }
    }
}

pub(crate) fn deserialize_price<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    RawPrice::deserialize(deserializer)?.into_price()
}

pub(crate) fn deserialize_optional_price<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawPrice>::deserialize(deserializer)?
        .map(RawPrice::into_price)
        .transpose()
}
