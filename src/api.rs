use crate::models::{NewParameter, NewTank, NewWaterChange, Parameter, Tank, WaterChange};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach the tank service: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("tank service rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("unexpected response from the tank service: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Typed client for the upstream tank REST API.
#[derive(Clone)]
pub struct TankApi {
    base_url: String,
    http: reqwest::Client,
}

impl TankApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tank-maintainer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_tanks(&self, token: Option<&str>) -> Result<Vec<Tank>, ClientError> {
        self.send(self.http.get(self.endpoint("tanks")), token).await
    }

    pub async fn create_tank(
        &self,
        tank: &NewTank,
        token: Option<&str>,
    ) -> Result<Tank, ClientError> {
        self.send(self.http.post(self.endpoint("tanks")).json(tank), token)
            .await
    }

    pub async fn create_parameter(
        &self,
        parameter: &NewParameter,
        token: Option<&str>,
    ) -> Result<Parameter, ClientError> {
        self.send(
            self.http.post(self.endpoint("tank-params")).json(parameter),
            token,
        )
        .await
    }

    pub async fn create_water_change(
        &self,
        change: &NewWaterChange,
        token: Option<&str>,
    ) -> Result<WaterChange, ClientError> {
        self.send(
            self.http.post(self.endpoint("water-changes")).json(change),
            token,
        )
        .await
    }

    fn endpoint(&self, collection: &str) -> String {
        format!("{}/api/{collection}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<T, ClientError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) if !body.trim().is_empty() => body.trim().to_string(),
                Ok(_) => status.canonical_reason().unwrap_or("no body").to_string(),
                Err(err) => {
                    warn!("could not read rejection body: {err}");
                    "<unreadable body>".to_string()
                }
            };
            return Err(ClientError::Rejected { status, message });
        }

        response.json::<T>().await.map_err(ClientError::Decode)
    }
}
