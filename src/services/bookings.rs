use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::error::ClientResult;
use crate::models::booking::{Booking, BookingDraft, BookingStatus, UpdateBookingStatusRequest};
use crate::services::api::ApiClient;

#[derive(Clone)]
pub struct BookingsApi {
    api: ApiClient,
}

impl BookingsApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Bookings visible to the signed-in user, optionally filtered by status.
    pub async fn list(&self, status: Option<BookingStatus>) -> ClientResult<Vec<Booking>> {
        let query: Vec<(&str, String)> = status.into_iter().map(|s| ("status", s.to_string())).collect();
        let bookings: Option<Vec<Booking>> = self.api.get_with_query("/bookings", &query, true).await?;
        Ok(bookings.unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> ClientResult<Booking> {
        self.api.get(&format!("/bookings/{}", id), true).await
    }

    /// Validates the draft and sends the booking request. The draft is only
    /// borrowed so a failed submission leaves the form contents intact.
    pub async fn submit(&self, draft: &BookingDraft, price: Decimal) -> ClientResult<Value> {
        let request = draft.to_request(price)?;

        log::info!("Requesting booking of service {} for {}", request.service, request.date);
        let response = self.api.post("/bookings", &request, true).await;
        if let Err(e) = &response {
            log::error!("Booking request for service {} failed: {}", request.service, e);
        }
        response
    }

    pub async fn update_status(&self, id: &str, status: BookingStatus) -> ClientResult<Value> {
        log::info!("Setting booking {} to {}", id, status);
        self.api
            .put(&format!("/bookings/{}/status", id), &UpdateBookingStatusRequest { status })
            .await
    }

    pub async fn cancel(&self, id: &str) -> ClientResult<Value> {
        log::info!("Cancelling booking {}", id);
        self.api.put(&format!("/bookings/{}/cancel", id), &json!({})).await
    }
}
