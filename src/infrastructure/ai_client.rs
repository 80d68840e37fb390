//! HTTP client for the upstream AI service.

use crate::config::Settings;
use crate::core::dto::{ChatRequest, ChatResponse, HealthResponse, PointsResponse, SessionMetricsRequest};
use crate::core::errors::AiServiceError;
use crate::core::traits::AiServiceClient;
use async_trait::async_trait;
use di::{Ref, inject, injectable};
use log::debug;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "X-API-Key";

const CHAT_GENERATE_PATH: &str = "api/chat/generate";
const SESSION_METRICS_PATH: &str = "api/session/metrics";
const POINTS_CALCULATIONS_PATH: &str = "api/points/calculations";
const HEALTH_PATH: &str = "health";

pub struct HttpAiServiceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[injectable(AiServiceClient)]
impl HttpAiServiceClient {
    #[inject]
    pub fn create(settings: Ref<Settings>) -> HttpAiServiceClient {
        let ai_service = &settings.ai_service;
        HttpAiServiceClient::new(
            ai_service.base_url.clone(),
            ai_service.api_key.clone(),
            ai_service.timeout,
        )
    }
}

impl HttpAiServiceClient {
    /// `timeout` bounds each request, from connecting until the body is read.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Self {
            client: Client::new(),
            base_url,
            api_key,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, AiServiceError> {
        let url = format!("{}/{}", self.base_url, path);
        Url::parse(&url).map_err(|_| AiServiceError::InvalidEndpoint(url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AiServiceError> {
        let request = match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        };

        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(AiServiceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiServiceError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                AiServiceError::Decode(e)
            } else {
                AiServiceError::Transport(e)
            }
        })
    }
}

#[async_trait]
impl AiServiceClient for HttpAiServiceClient {
    async fn generate_chat_response(&self, request: &ChatRequest) -> Result<ChatResponse, AiServiceError> {
        let url = self.endpoint(CHAT_GENERATE_PATH)?;
        debug!("POST {url} (session {})", request.session_id);
        self.send(self.client.post(url).json(request)).await
    }

    async fn calculate_session_points(
        &self,
        request: &SessionMetricsRequest,
    ) -> Result<PointsResponse, AiServiceError> {
        let url = self.endpoint(SESSION_METRICS_PATH)?;
        debug!("POST {url}");
        self.send(self.client.post(url).json(request)).await
    }

    async fn get_points_calculations(&self) -> Result<PointsResponse, AiServiceError> {
        let url = self.endpoint(POINTS_CALCULATIONS_PATH)?;
        debug!("GET {url}");
        self.send(self.client.get(url)).await
    }

    async fn get_health(&self) -> Result<HealthResponse, AiServiceError> {
        let url = self.endpoint(HEALTH_PATH)?;
        debug!("GET {url}");
        self.send(self.client.get(url)).await
    }
}
