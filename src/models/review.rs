use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::common::UserRef;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<UserRef>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateReviewRequest {
    pub service: String,

    #[validate(range(min = 1, max = 5, message = "Please select a rating"))]
    pub rating: u8,

    pub comment: String,
}

impl CreateReviewRequest {
    pub fn new(service_id: impl Into<String>, rating: u8, comment: &str) -> Self {
        Self {
            service: service_id.into(),
            rating,
            comment: comment.trim().to_string(),
        }
    }
}
