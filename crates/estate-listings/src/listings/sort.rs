use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Property;

/// Fixed result orderings offered to browsing clients.
///
/// The older client names (`price-low`, `price-high`, `size-large`, `size-small`) are still
/// accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "price-asc", alias = "price-low")]
    PriceAsc,
    #[serde(rename = "price-desc", alias = "price-high")]
    PriceDesc,
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "oldest")]
    Oldest,
    #[serde(rename = "area-desc", alias = "size-large")]
    AreaDesc,
    #[serde(rename = "area-asc", alias = "size-small")]
    AreaAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Newest,
        Self::Oldest,
        Self::AreaDesc,
        Self::AreaAsc,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::AreaDesc => "area-desc",
            Self::AreaAsc => "area-asc",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::Newest => "Newest First",
            Self::Oldest => "Oldest First",
            Self::AreaDesc => "Largest First",
            Self::AreaAsc => "Smallest First",
        }
    }

    const fn legacy_name(self) -> Option<&'static str> {
        match self {
            Self::PriceAsc => Some("price-low"),
            Self::PriceDesc => Some("price-high"),
            Self::AreaDesc => Some("size-large"),
            Self::AreaAsc => Some("size-small"),
            Self::Newest | Self::Oldest => None,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == raw || key.legacy_name() == Some(raw))
    }

    pub fn compare(self, a: &Property, b: &Property) -> Ordering {
        match self {
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::Newest => compare_listed(a.created_at, b.created_at, true),
            Self::Oldest => compare_listed(a.created_at, b.created_at, false),
            Self::AreaDesc => b.area.cmp(&a.area),
            Self::AreaAsc => a.area.cmp(&b.area),
        }
    }

    /// Stable in-place sort; equal keys keep their relative order.
    pub fn sort<P: Borrow<Property>>(self, items: &mut [P]) {
        items.sort_by(|a, b| self.compare(a.borrow(), b.borrow()));
    }
}

/// Undated listings compare equal to each other and sort after dated ones in either
/// direction.
fn compare_listed(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
    newest_first: bool,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if newest_first => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}'")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}
