use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::UserRef;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender: UserRef,
    pub receiver: UserRef,
    pub content: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn is_from(&self, user_id: &str) -> bool {
        self.sender.id == user_id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub receiver: String,
    pub content: String,
}

impl SendMessageRequest {
    /// Trims the text; `None` when nothing is left to send.
    pub fn new(receiver: impl Into<String>, text: &str) -> Option<Self> {
        let content = text.trim();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            receiver: receiver.into(),
            content: content.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_messages_are_not_sent() {
        assert!(SendMessageRequest::new("u2", "   \n").is_none());
        let request = SendMessageRequest::new("u2", "  on my way ").unwrap();
        assert_eq!(request.content, "on my way");
    }

    #[test]
    fn test_message_ownership() {
        let message: Message = serde_json::from_value(serde_json::json!({
            "_id": "m1",
            "sender": { "_id": "u1", "name": "Ann", "email": "ann@example.com" },
            "receiver": { "_id": "u2", "name": "Bob", "email": "bob@example.com" },
            "content": "Hi",
            "read": false,
            "createdAt": "2024-06-15T09:30:00.000Z"
        }))
        .unwrap();
        assert!(message.is_from("u1"));
        assert!(!message.is_from("u2"));
    }
}
