use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::common::{ImageUpload, Location, UserRef};

/// A provider's listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    pub provider: UserRef,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl ServiceQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    /// `"All"` is the UI's no-filter category and is never sent.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category == "All" { None } else { Some(category) };
        self
    }

    pub fn with_price_range(mut self, min: Option<String>, max: Option<String>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let fields = [
            ("search", &self.search),
            ("category", &self.category),
            ("minPrice", &self.min_price),
            ("maxPrice", &self.max_price),
        ];
        for (key, value) in fields {
            if let Some(value) = value.as_ref().map(|v| v.trim()).filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    /// Server order.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl SortBy {
    pub fn apply(&self, services: &mut [Service]) {
        match self {
            SortBy::Newest => {}
            SortBy::PriceAsc => services.sort_by(|a, b| a.price.cmp(&b.price)),
            SortBy::PriceDesc => services.sort_by(|a, b| b.price.cmp(&a.price)),
            SortBy::Rating => services.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortBy::Newest),
            "price_asc" => Ok(SortBy::PriceAsc),
            "price_desc" => Ok(SortBy::PriceDesc),
            "rating" => Ok(SortBy::Rating),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CreateServiceRequest {
    #[validate(length(min = 1, message = "Please fill in all required fields"))]
    pub title: String,

    #[validate(length(min = 1, message = "Please fill in all required fields"))]
    pub description: String,

    #[validate(length(min = 1, message = "Please fill in all required fields"))]
    pub category: String,

    #[validate(custom = "validate_price")]
    pub price: Decimal,

    pub location: Option<String>,

    #[validate(custom = "validate_photo_count")]
    pub photos: Vec<ImageUpload>,
}

pub const MAX_SERVICE_PHOTOS: usize = 5;

fn validate_photo_count(photos: &[ImageUpload]) -> Result<(), ValidationError> {
    if photos.is_empty() || photos.len() > MAX_SERVICE_PHOTOS {
        let mut err = ValidationError::new("photo_count");
        err.message = Some("Please add between 1 and 5 photos".into());
        return Err(err);
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        let mut err = ValidationError::new("price_not_positive");
        err.message = Some("Price must be greater than 0".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str, price: i64, rating: f64) -> Service {
        Service {
            id: id.to_string(),
            title: format!("Service {}", id),
            description: String::new(),
            category: "Cleaning".to_string(),
            price: Decimal::new(price, 0),
            photos: vec![],
            location: None,
            rating,
            review_count: 0,
            provider: UserRef {
                id: "p1".to_string(),
                name: "Provider".to_string(),
                email: String::new(),
                phone: None,
                profile_pic: None,
                rating: None,
            },
        }
    }

    #[test]
    fn test_query_skips_empty_and_all_category() {
        let query = ServiceQuery::search("garden")
            .with_category("All")
            .with_price_range(Some("10".to_string()), Some("  ".to_string()));
        assert_eq!(
            query.to_pairs(),
            vec![("search", "garden".to_string()), ("minPrice", "10".to_string())]
        );
    }

    #[test]
    fn test_client_side_sorting() {
        let mut list = vec![service("a", 30, 4.0), service("b", 10, 4.8), service("c", 20, 3.5)];

        SortBy::PriceAsc.apply(&mut list);
        let ids: Vec<_> = list.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);

        SortBy::Rating.apply(&mut list);
        let ids: Vec<_> = list.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);

        SortBy::PriceDesc.apply(&mut list);
        assert_eq!(list[0].id, "a");
    }

    #[test]
    fn test_create_request_requires_photo_and_price() {
        let mut request = CreateServiceRequest {
            title: "Deep clean".to_string(),
            description: "Whole apartment".to_string(),
            category: "Cleaning".to_string(),
            price: Decimal::new(50, 0),
            location: None,
            photos: vec![],
        };
        assert!(request.validate().is_err());

        request.photos.push(ImageUpload::new("a.png", vec![0]));
        assert!(request.validate().is_ok());

        request.price = Decimal::ZERO;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_photo_limit() {
        let mut request = CreateServiceRequest {
            title: "Deep clean".to_string(),
            description: "Whole apartment".to_string(),
            category: "Cleaning".to_string(),
            price: Decimal::new(50, 0),
            location: None,
            photos: (0..MAX_SERVICE_PHOTOS).map(|i| ImageUpload::new(&format!("{}.jpg", i), vec![0])).collect(),
        };
        assert!(request.validate().is_ok());

        request.photos.push(ImageUpload::new("extra.jpg", vec![0]));
        let err = crate::error::ClientError::from(request.validate().unwrap_err());
        assert_eq!(err.user_message(), "Please add between 1 and 5 photos");
    }

    #[test]
    fn test_service_deserializes_backend_payload() {
        let service: Service = serde_json::from_value(serde_json::json!({
            "_id": "s1",
            "title": "Lawn mowing",
            "description": "Weekly",
            "category": "Gardening",
            "price": 45.5,
            "photos": ["https://cdn.example.com/1.jpg"],
            "location": { "address": "12 Main St", "lat": 1.0, "lng": 2.0 },
            "rating": 4.5,
            "reviewCount": 12,
            "provider": { "_id": "p1", "name": "Sam", "email": "sam@example.com", "rating": 4.7 }
        }))
        .unwrap();
        assert_eq!(service.price, Decimal::new(455, 1));
        assert_eq!(service.review_count, 12);
        assert_eq!(service.photos.len(), 1);
    }
}
