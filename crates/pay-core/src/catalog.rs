//! # Catalog Types
//!
//! Artworks and exhibitions: the things a checkout pays for. The backend
//! speaks camelCase on some routes and snake_case on others, so both
//! spellings are accepted.

use crate::payment::SubjectType;
use crate::serde_ext::string_or_number;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Artwork availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkStatus {
    #[default]
    Available,
    Sold,
}

/// Exhibition lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExhibitionStatus {
    #[default]
    Upcoming,
    Ongoing,
    Past,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, alias = "image_url")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default)]
    pub status: ArtworkStatus,
}

impl Artwork {
    pub fn is_available(&self) -> bool {
        self.status == ArtworkStatus::Available
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exhibition {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, alias = "start_date")]
    pub start_date: String,
    #[serde(default, alias = "end_date")]
    pub end_date: String,
    #[serde(alias = "ticket_price", with = "rust_decimal::serde::float")]
    pub ticket_price: Decimal,
    #[serde(default, alias = "image_url")]
    pub image_url: Option<String>,
    #[serde(default, alias = "total_slots")]
    pub total_slots: u32,
    #[serde(default, alias = "available_slots")]
    pub available_slots: u32,
    #[serde(default)]
    pub status: ExhibitionStatus,
}

impl Exhibition {
    /// Bookable: not over and slots remain
    pub fn is_bookable(&self) -> bool {
        self.status != ExhibitionStatus::Past && self.available_slots > 0
    }
}

/// Anything that can be the subject of a checkout
pub trait Purchasable {
    fn subject_type(&self) -> SubjectType;
    fn subject_id(&self) -> &str;
    fn title(&self) -> &str;
    /// Amount charged for one unit
    fn unit_price(&self) -> Decimal;
}

impl Purchasable for Artwork {
    fn subject_type(&self) -> SubjectType {
        SubjectType::Artwork
    }

    fn subject_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }
}

impl Purchasable for Exhibition {
    fn subject_type(&self) -> SubjectType {
        SubjectType::Exhibition
    }

    fn subject_id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn unit_price(&self) -> Decimal {
        self.ticket_price
    }
}

/// `{ "artworks": [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtworkList {
    #[serde(default)]
    pub artworks: Vec<Artwork>,
}

/// `{ "exhibitions": [...] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExhibitionList {
    #[serde(default)]
    pub exhibitions: Vec<Exhibition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_artwork_camel_case() {
        let json = r#"{
            "id": 42, "title": "Maasai Dawn", "artist": "Kamau", "description": "Oil on canvas",
            "price": 15000, "imageUrl": "/uploads/dawn.jpg", "dimensions": "60x90cm",
            "medium": "Oil", "year": 2023, "status": "sold"
        }"#;

        let artwork: Artwork = serde_json::from_str(json).unwrap();
        assert_eq!(artwork.id, "42");
        assert_eq!(artwork.price, dec!(15000));
        assert_eq!(artwork.image_url.as_deref(), Some("/uploads/dawn.jpg"));
        assert!(!artwork.is_available());
        assert_eq!(artwork.subject_type(), SubjectType::Artwork);
    }

    #[test]
    fn test_parse_exhibition_snake_case() {
        let json = r#"{
            "id": "3", "title": "Nairobi Lights", "location": "Westlands",
            "start_date": "2025-02-01", "end_date": "2025-02-14",
            "ticket_price": 1500.5, "image_url": null,
            "total_slots": 100, "available_slots": 0, "status": "ongoing"
        }"#;

        let exhibition: Exhibition = serde_json::from_str(json).unwrap();
        assert_eq!(exhibition.unit_price(), dec!(1500.5));
        assert_eq!(exhibition.start_date, "2025-02-01");
        assert_eq!(exhibition.total_slots, 100);
        assert!(exhibition.image_url.is_none());
        assert!(!exhibition.is_bookable());
    }

    #[test]
    fn test_missing_list_key() {
        let list: ArtworkList = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(list.artworks.is_empty());
    }
}
