// Backend HTTP client.
// Handles API key headers and response status mapping for the hosted REST tables.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::config::Config;
use crate::error::{AppError, Result};

const REST_PREFIX: &str = "/rest/v1";

/// Client for the hosted backend's REST interface.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for `base_url`. The bearer token defaults to the API key.
    pub fn new(base_url: &str, api_key: &str, access_token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key).map_err(|e| AppError::Other(e.to_string()))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token.unwrap_or(api_key)))
                .map_err(|e| AppError::Other(e.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("clubdues-tui"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(AppError::Backend)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.backend_url,
            &config.api_key,
            config.access_token.as_deref(),
        )
    }

    /// Full URL of a table endpoint.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}{}/{}", self.base_url, REST_PREFIX, table)
    }

    /// Make a GET request against a table with query parameters.
    pub async fn get_table<T: serde::Serialize + ?Sized>(
        &self,
        table: &str,
        params: &T,
    ) -> Result<Response> {
        let url = self.table_url(table);
        tracing::debug!(%url, "backend request");
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(AppError::Backend)?;

        check_response(response).await
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        StatusCode::OK | StatusCode::PARTIAL_CONTENT => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Unauthorized),
        StatusCode::NOT_FOUND => {
            let url = response.url().to_string();
            Err(AppError::NotFound(url))
        }
        status => Err(AppError::Other(format!(
            "HTTP {}: {}",
            status,
            response.text().await.unwrap_or_default()
        ))),
    }
}
