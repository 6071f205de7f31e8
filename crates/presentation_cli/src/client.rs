//! Typed client for the Vigneron HTTP API

use std::time::Duration;

use domain::VineyardId;
use presentation_http::handlers::vineyards::{SeasonResponse, VineyardResponse};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors talking to the server
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    /// HTTP status of an API error
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }
}

/// Fields for registering a vineyard
#[derive(Debug, Clone, PartialEq)]
pub struct NewVineyardArgs {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub gdd_base_temp: Option<f64>,
}

/// HTTP client bound to one server
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Readiness report; non-ready servers answer 503 with the same body
    #[instrument(skip(self))]
    pub async fn ready(&self) -> Result<(bool, Value), ClientError> {
        let response = self.http.get(self.endpoint("/ready")).send().await?;
        let status = response.status();
        if status != StatusCode::SERVICE_UNAVAILABLE && !status.is_success() {
            return Err(api_error(response).await);
        }
        let body = response.json::<Value>().await?;
        Ok((status.is_success(), body))
    }

    #[instrument(skip(self))]
    pub async fn list_vineyards(&self) -> Result<Vec<VineyardResponse>, ClientError> {
        let response = self.http.get(self.endpoint("/api/vineyards")).send().await?;
        parse(response).await
    }

    #[instrument(skip(self, args), fields(name = %args.name))]
    pub async fn create_vineyard(
        &self,
        args: &NewVineyardArgs,
    ) -> Result<VineyardResponse, ClientError> {
        let mut body = json!({
            "name": args.name,
            "location": {
                "latitude": args.latitude,
                "longitude": args.longitude,
            },
        });
        if let Some(ref address) = args.address {
            body["location"]["address"] = json!(address);
        }
        if let Some(base) = args.gdd_base_temp {
            body["gddBaseTemp"] = json!(base);
        }

        let response = self
            .http
            .post(self.endpoint("/api/vineyards"))
            .json(&body)
            .send()
            .await?;
        parse(response).await
    }

    /// Season series; the server picks the current year when `year` is `None`
    #[instrument(skip(self))]
    pub async fn season(
        &self,
        id: &VineyardId,
        year: Option<i32>,
    ) -> Result<SeasonResponse, ClientError> {
        let mut request = self.http.get(self.endpoint(&format!("/api/vineyards/{id}/gdd")));
        if let Some(year) = year {
            request = request.query(&[("year", year)]);
        }
        parse(request.send().await?).await
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json::<T>().await?)
}

/// Build an error from the server's `{"error": ...}` body, falling back to raw text
async fn api_error(response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    debug!(%status, body = %text, "Server returned an error");

    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text);

    ClientError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(
            client.endpoint("/api/vineyards"),
            "http://localhost:5000/api/vineyards"
        );
    }

    #[test]
    fn error_status() {
        let err = ClientError::Api {
            status: StatusCode::NOT_FOUND,
            message: "Vineyard not found".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "HTTP 404 Not Found: Vineyard not found");
    }
}
