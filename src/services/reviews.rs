use serde_json::Value;
use validator::Validate;

use crate::error::ClientResult;
use crate::models::review::{CreateReviewRequest, Review};
use crate::services::api::ApiClient;

#[derive(Clone)]
pub struct ReviewsApi {
    api: ApiClient,
}

impl ReviewsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, service_id: &str) -> ClientResult<Vec<Review>> {
        let reviews: Option<Vec<Review>> = self.api.get(&format!("/reviews/{}", service_id), true).await?;
        Ok(reviews.unwrap_or_default())
    }

    pub async fn submit(&self, request: &CreateReviewRequest) -> ClientResult<Value> {
        request.validate()?;
        log::info!("Submitting {}-star review for service {}", request.rating, request.service);
        self.api.post("/reviews", request, true).await
    }
}
