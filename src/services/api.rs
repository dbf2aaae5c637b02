use reqwest::multipart::Form;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult, GENERIC_ERROR_MESSAGE};
use crate::models::common::ErrorBody;
use crate::session::Session;

/// JSON transport to the ServeHub backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Attaches the bearer header when `authenticated` and a token is held.
    async fn request(&self, method: Method, endpoint: &str, authenticated: bool) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        log::debug!("{} {}", method, url);

        let mut builder = self.client.request(method, url);
        if authenticated {
            if let Some(token) = self.session.token().await {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
        }
        builder
    }

    async fn json_request(&self, method: Method, endpoint: &str, authenticated: bool) -> RequestBuilder {
        self.request(method, endpoint, authenticated)
            .await
            .header(header::CONTENT_TYPE, "application/json")
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, authenticated: bool) -> ClientResult<T> {
        let response = self.json_request(Method::GET, endpoint, authenticated).await.send().await?;
        Self::handle_response(response).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        authenticated: bool,
    ) -> ClientResult<T> {
        let response = self
            .json_request(Method::GET, endpoint, authenticated)
            .await
            .query(query)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B, authenticated: bool) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .json_request(Method::POST, endpoint, authenticated)
            .await
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.json_request(Method::PUT, endpoint, true).await.json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Multipart bodies carry their own content type with the boundary.
    pub async fn post_multipart<T: DeserializeOwned>(&self, endpoint: &str, form: Form) -> ClientResult<T> {
        let response = self.request(Method::POST, endpoint, true).await.multipart(form).send().await?;
        Self::handle_response(response).await
    }

    pub async fn put_multipart<T: DeserializeOwned>(&self, endpoint: &str, form: Form) -> ClientResult<T> {
        let response = self.request(Method::PUT, endpoint, true).await.multipart(form).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
            log::warn!("Request failed with {}: {}", status, message);
            return Err(ClientError::Api { status, message });
        }

        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}
