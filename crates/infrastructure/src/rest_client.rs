//! Shared REST client for the backend API.
//!
//! Every HTTP adapter goes through one [`RestApiClient`], which owns the base
//! URL and credentials and maps response statuses onto the application error
//! taxonomy. No request is retried here; retry policy belongs to the caller.

use reqwest::{StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use clavis_core::{AppError, AppResult};

/// Credentials attached to every backend request.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    token: Option<String>,
}

impl ApiCredentials {
    /// Credentials carrying a bearer token.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// No credentials, for backends reachable without authentication.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// One `reqwest::Client` bound to a validated base URL.
#[derive(Debug, Clone)]
pub struct RestApiClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: ApiCredentials,
}

impl RestApiClient {
    /// Creates a client for `base_url`, validating the URL up front.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        credentials: ApiCredentials,
    ) -> AppResult<Self> {
        let parsed = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid API base URL '{base_url}': {error}"))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "API base URL '{base_url}' must use http or https"
            )));
        }

        Ok(Self {
            http_client,
            base_url: parsed.as_str().trim_end_matches('/').to_owned(),
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credentials.token() {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self
            .authorize(self.http_client.get(self.endpoint(path)))
            .send()
            .await
            .map_err(|error| transport_error(path, &error))?;

        decode_json(response, path).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .authorize(self.http_client.post(self.endpoint(path)))
            .json(body)
            .send()
            .await
            .map_err(|error| transport_error(path, &error))?;

        decode_json(response, path).await
    }

    pub(crate) async fn post_no_content<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<()> {
        let response = self
            .authorize(self.http_client.post(self.endpoint(path)))
            .json(body)
            .send()
            .await
            .map_err(|error| transport_error(path, &error))?;

        check_status(response, path).await.map(|_| ())
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .authorize(self.http_client.put(self.endpoint(path)))
            .json(body)
            .send()
            .await
            .map_err(|error| transport_error(path, &error))?;

        decode_json(response, path).await
    }

    pub(crate) async fn delete(&self, path: &str) -> AppResult<()> {
        let response = self
            .authorize(self.http_client.delete(self.endpoint(path)))
            .send()
            .await
            .map_err(|error| transport_error(path, &error))?;

        check_status(response, path).await.map(|_| ())
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response, path: &str) -> AppResult<T> {
    let response = check_status(response, path).await?;
    response.json::<T>().await.map_err(|error| {
        AppError::Internal(format!(
            "failed to decode response body from '{path}': {error}"
        ))
    })
}

async fn check_status(response: reqwest::Response, path: &str) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_owned());

    Err(error_for_status(status, path, body.as_str()))
}

fn transport_error(path: &str, error: &reqwest::Error) -> AppError {
    AppError::Internal(format!("request to '{path}' failed: {error}"))
}

fn error_for_status(status: StatusCode, path: &str, body: &str) -> AppError {
    match status {
        StatusCode::BAD_REQUEST => {
            AppError::Validation(format!("backend rejected request to '{path}': {body}"))
        }
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(format!(
            "backend requires authentication for '{path}'"
        )),
        StatusCode::FORBIDDEN => AppError::Forbidden(format!(
            "backend denied access to '{path}'"
        )),
        StatusCode::NOT_FOUND => {
            AppError::NotFound(format!("backend resource '{path}' does not exist"))
        }
        StatusCode::CONFLICT => {
            AppError::Conflict(format!("backend reported a conflict for '{path}': {body}"))
        }
        _ => AppError::Internal(format!(
            "backend returned status {} for '{path}': {body}",
            status.as_u16()
        )),
    }
}
