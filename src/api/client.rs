//! REST client for the layout endpoints of the notification service.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::state::layout::{Layout, LayoutPayload};

/// Shown when a failed call carries no usable message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Unexpected error occurred";

pub fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .use_rustls_tls()
        .build()
        .expect("Failed to build HTTP client")
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

/// Every successful reply wraps its payload in `{ "data": ... }`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: build_client(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn list_layouts(&self) -> Result<Vec<Layout>, AppError> {
        let url = self.endpoint(&["v1", "layouts"])?;
        let response = self.authed(self.http.get(url)).send().await?;
        decode(response).await
    }

    /// `Ok(None)` when the layout does not exist remotely.
    pub async fn get_layout(&self, id: &str) -> Result<Option<Layout>, AppError> {
        let url = self.endpoint(&["v1", "layouts", id])?;
        let response = self.authed(self.http.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(decode(response).await?))
    }

    pub async fn create_layout(&self, payload: &LayoutPayload) -> Result<Layout, AppError> {
        let url = self.endpoint(&["v1", "layouts"])?;
        let response = self
            .authed(self.http.post(url))
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update_layout(
        &self,
        id: &str,
        payload: &LayoutPayload,
    ) -> Result<Layout, AppError> {
        let url = self.endpoint(&["v1", "layouts", id])?;
        let response = self
            .authed(self.http.patch(url))
            .json(payload)
            .send()
            .await?;
        decode(response).await
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("Authorization", format!("ApiKey {}", self.api_key))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config("API base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
    let status = response.status();
    if status.is_success() {
        let envelope: Envelope<T> = response.json().await?;
        return Ok(envelope.data);
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(AppError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// The service reports errors as `{ "message": "..." }` or
/// `{ "message": ["...", ...] }`. Anything else maps to the generic text.
fn error_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<ErrorMessage>,
    }
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorMessage {
        One(String),
        Many(Vec<String>),
    }

    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(ErrorMessage::One(text)),
        }) if !text.is_empty() => text,
        Ok(ErrorBody {
            message: Some(ErrorMessage::Many(texts)),
        }) if !texts.is_empty() => texts.join(", "),
        _ => GENERIC_ERROR_MESSAGE.to_string(),
    }
}
