use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Booking,
    Message,
    Review,
    #[default]
    General,
}

impl NotificationKind {
    pub fn from_data(data: &Value) -> Self {
        match data.get("type").and_then(Value::as_str) {
            Some("booking") => NotificationKind::Booking,
            Some("message") => NotificationKind::Message,
            Some("review") => NotificationKind::Review,
            _ => NotificationKind::General,
        }
    }
}

/// A locally persisted notification with its read state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationRecord {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: Value,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
}

/// A notification event as delivered by the host platform.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingNotification {
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl IncomingNotification {
    pub fn into_record(self) -> NotificationRecord {
        let kind = NotificationKind::from_data(&self.data);
        NotificationRecord {
            id: self
                .identifier
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: self
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Notification".to_string()),
            body: self.body.unwrap_or_default(),
            data: self.data,
            timestamp: Utc::now(),
            read: false,
            kind,
        }
    }
}

/// Where a tapped notification leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationTarget {
    Booking(String),
    Chat(String),
    Service(String),
    None,
}

impl NotificationTarget {
    pub fn from_data(data: &Value) -> Self {
        let field = |name: &str| data.get(name).and_then(Value::as_str).map(str::to_string);
        match NotificationKind::from_data(data) {
            NotificationKind::Booking => field("bookingId").map_or(Self::None, Self::Booking),
            NotificationKind::Message => field("userId").map_or(Self::None, Self::Chat),
            NotificationKind::Review => field("serviceId").map_or(Self::None, Self::Service),
            NotificationKind::General => Self::None,
        }
    }
}
