//! reqwest implementation of [`Backend`].

use super::{Backend, LogQuery};
use crate::config::BackendConfig;
use crate::error::{ConsoleError, Result};
use crate::model::{DeviceAction, LogPage, NewUnit, SensorPayload, Unit, Weather};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the greenhouse REST API.
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    /// Create a client for the API rooted at `config.base_url`.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ConsoleError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ConsoleError::InvalidUrl(config.base_url.clone()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    /// Build the URL for `segments` below the base path. Each segment is
    /// percent-encoded, so unit codes may contain any character.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        debug!("[Api] {} {}", method, url);
        self.client.request(method, url)
    }

    /// Send and map non-2xx statuses to [`ConsoleError::Http`].
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.ok();
        Err(ConsoleError::from_response(status.as_u16(), body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_units(&self) -> Result<Vec<Unit>> {
        self.send_json(self.request(Method::GET, &["greenhouses"]))
            .await
    }

    async fn get_unit(&self, code: &str) -> Result<Unit> {
        self.send_json(self.request(Method::GET, &["greenhouses", code]))
            .await
    }

    async fn current_weather(&self, code: &str) -> Result<Weather> {
        self.send_json(self.request(
            Method::GET,
            &["greenhouses", code, "weather", "current"],
        ))
        .await
    }

    async fn create_unit(&self, unit: &NewUnit) -> Result<Unit> {
        self.send_json(self.request(Method::POST, &["greenhouses"]).json(unit))
            .await
    }

    async fn device_action(&self, code: &str, action: DeviceAction) -> Result<()> {
        let action = action.to_string();
        self.send(self.request(Method::POST, &["greenhouses", code, "devices", &action]))
            .await?;
        Ok(())
    }

    async fn simulate(&self, code: &str) -> Result<()> {
        self.send(self.request(Method::POST, &["greenhouses", code, "simulate"]))
            .await?;
        Ok(())
    }

    async fn set_active(&self, code: &str, active: bool) -> Result<Unit> {
        self.send_json(
            self.request(Method::POST, &["greenhouses", code, "active"])
                .query(&[("active", active)]),
        )
        .await
    }

    async fn add_sensor(&self, code: &str, sensor: &SensorPayload) -> Result<Unit> {
        self.send_json(
            self.request(Method::POST, &["greenhouses", code, "sensors"])
                .json(sensor),
        )
        .await
    }

    async fn delete_unit(&self, code: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &["greenhouses", code]))
            .await?;
        Ok(())
    }

    async fn delete_sensor(&self, code: &str, sensor_id: &str) -> Result<Unit> {
        self.send_json(self.request(Method::DELETE, &["greenhouses", code, sensor_id]))
            .await
    }

    async fn action_logs(&self, code: &str, query: LogQuery) -> Result<LogPage> {
        let request = self.request(Method::GET, &["greenhouses", code, "actions"]);
        let request = match query {
            LogQuery::Page { page, size } => request.query(&[("page", page), ("size", size)]),
            LogQuery::Limit(limit) => request.query(&[("limit", limit)]),
        };
        self.send_json(request).await
    }
}
