use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use serde_json::Value;

use super::AppointmentsApi;
use crate::config::AppConfig;
use crate::errors::ServerError;
use crate::models::{decode_appointments, Appointment, LoginMessage, LoginResponse};
use crate::state::Session;

pub const SIGN_IN_PATH: &str = "/signin";
pub const APPOINTMENTS_PATH: &str = "/appointments";

pub struct HttpApiClient {
    base_url: String,
    session: Arc<Session>,
    client: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Self::with_session(base_url, timeout, Arc::new(Session::new()))
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::new(config.base_url.clone(), config.request_timeout)
    }

    pub fn with_session(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<Session>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into(),
            session,
            client,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServerError> {
        let raw = format!("{}{path}", self.base_url.trim_end_matches('/'));
        Url::parse(&raw).map_err(|e| {
            tracing::error!(url = %raw, error = %e, "invalid endpoint url");
            ServerError::InvalidUrl
        })
    }
}

#[async_trait]
impl AppointmentsApi for HttpApiClient {
    async fn authenticate(&self, username: &str, password: &str) -> Result<(), ServerError> {
        let url = self.endpoint(SIGN_IN_PATH)?;

        let body = serde_json::to_vec(&LoginMessage { username, password }).map_err(|e| {
            tracing::error!(error = %e, "failed to encode sign-in request");
            ServerError::InvalidMessageData
        })?;

        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, timeout = e.is_timeout(), "sign-in request failed");
                ServerError::InvalidServerResponse
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::info!(%status, "sign-in rejected");
            return Err(ServerError::InvalidCredentials);
        }

        let bytes = resp.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to read sign-in response");
            ServerError::InvalidServerResponse
        })?;
        let decoded: LoginResponse = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(error = %e, "failed to parse sign-in response");
            ServerError::InvalidServerResponse
        })?;

        self.session.store(decoded.token);
        tracing::info!("signed in");
        Ok(())
    }

    async fn list_appointments(&self) -> Result<Vec<Appointment>, ServerError> {
        let token = self.session.token().ok_or(ServerError::NotLoggedIn)?;
        let url = self.endpoint(APPOINTMENTS_PATH)?;

        let resp = self
            .client
            .get(url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, timeout = e.is_timeout(), "appointments request failed");
                ServerError::InvalidServerResponse
            })?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to read appointments response");
            ServerError::InvalidServerResponse
        })?;

        let appointments = parse_appointments_body(&bytes).map_err(|e| {
            tracing::warn!(%status, error = %e, "unusable appointments response");
            ServerError::InvalidServerResponse
        })?;

        tracing::info!(count = appointments.len(), "fetched appointments");
        Ok(appointments)
    }

    fn sign_out(&self) {
        self.session.clear();
        tracing::info!("signed out");
    }
}

fn parse_appointments_body(body: &[u8]) -> anyhow::Result<Vec<Appointment>> {
    let data: Value = serde_json::from_slice(body).context("response body is not JSON")?;
    let items = data
        .get("appointments")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow::anyhow!("missing `appointments` array"))?;
    Ok(decode_appointments(items))
}
