use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use validator::Validate;

use crate::error::ClientResult;
use crate::models::common::DataEnvelope;
use crate::models::service::{CreateServiceRequest, Service, ServiceQuery, SortBy};
use crate::services::api::ApiClient;

/// Service listings: browse, search, detail and create.
#[derive(Clone)]
pub struct CatalogApi {
    api: ApiClient,
}

impl CatalogApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &ServiceQuery) -> ClientResult<Vec<Service>> {
        let envelope: DataEnvelope<Option<Vec<Service>>> =
            self.api.get_with_query("/services", &query.to_pairs(), false).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn search(&self, query: &ServiceQuery, sort: SortBy) -> ClientResult<Vec<Service>> {
        let mut results = self.list(query).await?;
        sort.apply(&mut results);
        log::debug!("Search returned {} services", results.len());
        Ok(results)
    }

    pub async fn get(&self, id: &str) -> ClientResult<Service> {
        let envelope: DataEnvelope<Service> = self.api.get(&format!("/services/{}", id), false).await?;
        Ok(envelope.data)
    }

    pub async fn create(&self, request: CreateServiceRequest) -> ClientResult<Value> {
        request.validate()?;
        let form = Self::build_form(request, Utc::now().timestamp_millis())?;

        log::info!("Creating service listing");
        self.api.post_multipart("/services", form).await
    }

    fn build_form(request: CreateServiceRequest, stamp_ms: i64) -> ClientResult<Form> {
        let mut form = Form::new()
            .text("title", request.title)
            .text("description", request.description)
            .text("category", request.category)
            .text("price", request.price.to_string());

        if let Some(address) = request.location.filter(|a| !a.trim().is_empty()) {
            form = form.text("location", json!({ "address": address }).to_string());
        }

        for (index, photo) in request.photos.into_iter().enumerate() {
            let file_name = photo.file_name(&format!("service_{}_{}", stamp_ms, index));
            let mime = photo.mime_type();
            let part = Part::bytes(photo.bytes).file_name(file_name).mime_str(&mime)?;
            form = form.part("photos", part);
        }
        Ok(form)
    }
}
