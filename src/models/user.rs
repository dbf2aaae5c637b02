use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::common::Location;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Provider,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Client => write!(f, "client"),
            UserRole::Provider => write!(f, "provider"),
        }
    }
}

/// The signed-in user as persisted under the `user` storage key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl SessionUser {
    pub fn is_provider(&self) -> bool {
        self.role == UserRole::Provider
    }

    pub fn apply_profile(&mut self, profile: &Profile) {
        if !profile.name.is_empty() {
            self.name = profile.name.clone();
        }
        self.phone = profile.phone.clone();
        self.bio = profile.bio.clone();
    }
}

#[derive(Debug, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub email: String,

    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub password: String,
}

#[derive(Debug, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Please fill in all fields"),
        email(message = "Invalid email format")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub password: String,

    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: SessionUser,
}

/// Full profile as returned by `GET /users/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    pub phone: String,
    pub bio: String,
    pub location: Location,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureResponse {
    pub profile_pic: String,
}
