use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    deserialize_optional_price, deserialize_price, AgentContact, Amenities, ListingStatus,
    Property, PropertyId,
};

/// Payload for creating a listing from the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
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
    pub description: String,
    #[serde(default)]
    pub year_built: Option<u32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Amenities,
    #[serde(default)]
    pub agent: AgentContact,
}

/// Partial update; absent fields keep their stored value. `images` replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub status: Option<ListingStatus>,
    #[serde(deserialize_with = "deserialize_optional_price")]
    pub price: Option<u64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    pub area: Option<u32>,
    pub description: Option<String>,
    pub year_built: Option<u32>,
    pub images: Option<Vec<String>>,
    pub amenities: Option<Amenities>,
    pub agent: Option<AgentContact>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("bathrooms must be a non-negative number, got {0}")]
    InvalidBathrooms(f32),
}

impl PropertyDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        validate_fields(
            &self.title,
            &self.location,
            &self.property_type,
            &self.description,
            self.bathrooms,
        )
    }

    pub fn into_property(
        self,
        id: PropertyId,
        now: DateTime<Utc>,
    ) -> Result<Property, DraftError> {
        self.validate()?;
        Ok(Property {
            id,
            title: self.title.trim().to_string(),
            location: self.location.trim().to_string(),
            property_type: self.property_type.trim().to_string(),
            status: self.status,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area: self.area,
            year_built: self.year_built,
            description: self.description,
            images: self.images,
            amenities: self.amenities,
            agent: self.agent,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }
}

impl PropertyPatch {
    /// Produce the updated listing, leaving `current` untouched.
    pub fn apply_to(self, current: &Property, now: DateTime<Utc>) -> Result<Property, DraftError> {
        let mut next = current.clone();
        if let Some(title) = self.title {
            next.title = title.trim().to_string();
        }
        if let Some(location) = self.location {
            next.location = location.trim().to_string();
        }
        if let Some(property_type) = self.property_type {
            next.property_type = property_type.trim().to_string();
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(price) = self.price {
            next.price = price;
        }
        if let Some(bedrooms) = self.bedrooms {
            next.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            next.bathrooms = bathrooms;
        }
        if let Some(area) = self.area {
            next.area = area;
        }
        if let Some(description) = self.description {
            next.description = description;
        }
        if self.year_built.is_some() {
            next.year_built = self.year_built;
        }
        if let Some(images) = self.images {
            next.images = images;
        }
        if let Some(amenities) = self.amenities {
            next.amenities = amenities;
        }
        if let Some(agent) = self.agent {
            next.agent = agent;
        }

        validate_fields(
            &next.title,
            &next.location,
            &next.property_type,
            &next.description,
            next.bathrooms,
        )?;
        next.updated_at = Some(now);
        Ok(next)
    }
}

fn validate_fields(
    title: &str,
    location: &str,
    property_type: &str,
    description: &str,
    bathrooms: f32,
) -> Result<(), DraftError> {
    for (name, value) in [
        ("title", title),
        ("location", location),
        ("type", property_type),
        ("description", description),
    ] {
        if value.trim().is_empty() {
            return Err(DraftError::Blank(name));
        }
    }

    if !bathrooms.is_finite() || bathrooms < 0.0 {
        return Err(DraftError::InvalidBathrooms(bathrooms));
    }

    Ok(())
}
