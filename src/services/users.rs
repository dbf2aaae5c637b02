use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{ClientError, ClientResult};
use crate::models::common::ImageUpload;
use crate::models::user::{Profile, ProfilePictureResponse, SessionUser, UpdateProfileRequest};
use crate::services::api::ApiClient;
use crate::services::storage::PUSH_TOKEN_KEY;

#[derive(Clone)]
pub struct UsersApi {
    api: ApiClient,
}

impl UsersApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn current_user(&self) -> ClientResult<SessionUser> {
        self.api.session().user().await.ok_or(ClientError::NotSignedIn)
    }

    pub async fn get(&self, user_id: &str) -> ClientResult<Profile> {
        self.api.get(&format!("/users/{}", user_id), true).await
    }

    pub async fn profile(&self) -> ClientResult<Profile> {
        let user = self.current_user().await?;
        self.get(&user.id).await
    }

    /// Saves profile edits and mirrors name, phone and bio into the session.
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> ClientResult<Profile> {
        request.validate()?;
        let user = self.current_user().await?;

        let updated: Profile = self.api.put(&format!("/users/{}", user.id), request).await?;
        self.api.session().update_user(|u| u.apply_profile(&updated)).await?;
        log::info!("Updated profile for {}", user.id);
        Ok(updated)
    }

    pub async fn upload_profile_picture(&self, image: ImageUpload) -> ClientResult<String> {
        let user = self.current_user().await?;

        let file_name = image.file_name(&format!("profile_{}", Utc::now().timestamp_millis()));
        let mime = image.mime_type();
        let part = Part::bytes(image.bytes).file_name(file_name).mime_str(&mime)?;
        let form = Form::new().part("profilePic", part);

        let response: ProfilePictureResponse = self.api.put_multipart(&format!("/users/{}", user.id), form).await?;
        let url = response.profile_pic;
        self.api
            .session()
            .update_user(|u| u.profile_pic = Some(url.clone()))
            .await?;
        log::info!("Uploaded profile picture for {}", user.id);
        Ok(url)
    }

    /// Forwards a platform-issued push token to the backend, then keeps a
    /// local copy.
    pub async fn register_push_token(&self, token: &str) -> ClientResult<()> {
        let _: Value = self.api.post("/users/push-token", &json!({ "token": token }), true).await?;
        self.api.session().store().set(PUSH_TOKEN_KEY, token)?;
        log::info!("Registered push token");
        Ok(())
    }

    pub fn stored_push_token(&self) -> Option<String> {
        match self.api.session().store().get(PUSH_TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                log::error!("Error reading push token: {:#}", e);
                None
            }
        }
    }
}
