use serde::{Deserialize, Serialize};

/// `{ "data": ... }` wrapper the backend puts around service payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// Minimal user reference embedded in services, bookings and messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Location {
    pub fn address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            lat: None,
            lng: None,
        }
    }
}

/// In-memory image bytes for the multipart upload endpoints.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ImageUpload {
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(source_name: &str, bytes: Vec<u8>) -> Self {
        let extension = source_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty() && !ext.contains('/'))
            .unwrap_or_else(|| "jpg".to_string());
        Self { extension, bytes }
    }

    pub fn mime_type(&self) -> String {
        format!("image/{}", self.extension)
    }

    pub fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.extension)
    }
}
