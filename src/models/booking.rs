use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use validator::Validate;

use crate::error::ClientError;
use crate::models::common::UserRef;

pub const EMPTY_DATE_MESSAGE: &str = "Please select a date";
pub const INVALID_DATE_MESSAGE: &str = "Please enter a valid date in YYYY-MM-DD format (e.g., 2024-12-25). Date must be today or in the future.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Completed,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Accepted => write!(f, "accepted"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookedService {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub client: UserRef,
    pub provider: UserRef,
    pub service: BookedService,
    pub date: DateTime<Utc>,
    pub status: BookingStatus,
    pub total_price: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// What the booking form holds while it is open.
#[derive(Debug, Clone, Default, Validate)]
pub struct BookingDraft {
    pub service_id: String,
    pub provider_id: String,
    pub date_text: String,

    #[validate(length(max = 500, message = "Notes must be 500 characters or fewer"))]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub service: String,
    pub provider: String,
    pub date: String,
    pub total_price: Decimal,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

fn date_format() -> &'static Regex {
    static FORMAT: OnceLock<Regex> = OnceLock::new();
    FORMAT.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static date pattern"))
}

/// Parses `YYYY-MM-DD` into a calendar date on or after `today`.
pub fn parse_booking_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if !date_format().is_match(text) {
        return None;
    }

    let mut parts = text.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;

    // from_ymd_opt rejects anything that would not round-trip (2024-02-30, month 13, day 00)
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    if date < today {
        return None;
    }
    Some(date)
}

pub fn is_valid_booking_date(text: &str) -> bool {
    parse_booking_date(text, Local::now().date_naive()).is_some()
}

/// Noon UTC keeps the calendar day stable in every client timezone.
pub fn booking_instant(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap_or_default())
}

pub fn today_date_text() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

impl BookingDraft {
    pub fn new(service_id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            provider_id: provider_id.into(),
            ..Default::default()
        }
    }

    pub fn fill_today(&mut self) {
        self.date_text = today_date_text();
    }

    pub fn clear(&mut self) {
        self.date_text.clear();
        self.notes.clear();
    }

    /// Builds the request body against the given local date.
    pub fn to_request_on(&self, price: Decimal, today: NaiveDate) -> Result<CreateBookingRequest, ClientError> {
        if self.date_text.is_empty() {
            return Err(ClientError::Validation(EMPTY_DATE_MESSAGE.to_string()));
        }

        let date = parse_booking_date(&self.date_text, today)
            .ok_or_else(|| ClientError::Validation(INVALID_DATE_MESSAGE.to_string()))?;

        self.validate()?;

        Ok(CreateBookingRequest {
            service: self.service_id.clone(),
            provider: self.provider_id.clone(),
            date: booking_instant(date).to_rfc3339_opts(SecondsFormat::Millis, true),
            total_price: price,
            notes: self.notes.trim().to_string(),
        })
    }

    pub fn to_request(&self, price: Decimal) -> Result<CreateBookingRequest, ClientError> {
        self.to_request_on(price, Local::now().date_naive())
    }
}
