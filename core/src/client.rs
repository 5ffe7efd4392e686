//! Typed HTTP client for the job tracker API.
//!
//! # Design
//! Every call goes through the same pipeline: `build_request` produces an
//! `HttpRequest` envelope, `execute` asks the credential provider for a
//! token, attaches it, and performs the round trip under one timeout, and a
//! `parse_*` function turns the `HttpResponse` into a typed value or an
//! `ApiError`. The build and parse halves are plain functions so they can be
//! tested without a network.
//!
//! The client keeps no per-call state. The only shared resource is the
//! `reqwest` connection pool inside `http`, which is safe to use from many
//! concurrent calls.

use std::time::{Duration, Instant};

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::codec;
use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Async client for a JSON REST backend with per-call bearer auth.
#[derive(Clone)]
pub struct ResourceClient<P> {
    base_url: String,
    timeout: Duration,
    http: reqwest::Client,
    credentials: P,
}

impl<P> std::fmt::Debug for ResourceClient<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl<P: CredentialProvider> ResourceClient<P> {
    pub fn new(config: &ClientConfig, credentials: P) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            http,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn credentials(&self) -> &P {
        &self.credentials
    }

    /// Build the envelope for one call. `path` is relative to the base URL
    /// and may carry an already-encoded query string.
    pub fn build_request(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<HttpRequest> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let url = Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))?;

        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body,
            request_id: Uuid::new_v4(),
        })
    }

    pub fn build_json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest> {
        self.build_request(method, path, Some(codec::encode(body)?))
    }

    /// Attach a fresh credential and perform the round trip.
    ///
    /// Returns the response whatever its status; the `parse_*` functions
    /// decide what counts as success.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let request_id = request.request_id;
        debug!(%method, url = %request.url, %request_id, "dispatching request");

        let started = Instant::now();
        let round_trip = async {
            let token = self.credentials.access_token().await?;
            self.send(authorize(request, &token)?).await
        };
        let outcome = match tokio::time::timeout(self.timeout, round_trip).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(self.timeout)),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(response) if response.is_success() => {
                debug!(%method, %request_id, status = response.status, elapsed_ms, "request completed");
            }
            Ok(response) => {
                warn!(%method, %request_id, status = response.status, elapsed_ms, "request rejected");
            }
            Err(error) => {
                warn!(%method, %request_id, elapsed_ms, %error, "request failed");
            }
        }
        outcome
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.http.request(request.method.into(), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = builder.header("x-request-id", request.request_id.to_string());
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        Ok(HttpResponse { status, headers, body })
    }

    fn transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else if error.is_builder() {
            ApiError::InvalidUrl(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }

    // ---------- Generic operations ----------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.build_request(HttpMethod::Get, path, None)?;
        parse_json(self.execute(request).await?)
    }

    /// GET a collection. An empty body or `null` comes back as an empty `Vec`.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let request = self.build_request(HttpMethod::Get, path, None)?;
        parse_list(self.execute(request).await?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_json_request(HttpMethod::Post, path, body)?;
        parse_json(self.execute(request).await?)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_json_request(HttpMethod::Put, path, body)?;
        parse_json(self.execute(request).await?)
    }

    /// PUT whose response body is not needed.
    pub async fn put_no_content<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let request = self.build_json_request(HttpMethod::Put, path, body)?;
        parse_empty(self.execute(request).await?)
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_json_request(HttpMethod::Patch, path, body)?;
        parse_json(self.execute(request).await?)
    }

    /// Bodiless PATCH, used by state-transition endpoints such as
    /// `/clients/{id}/deactivate`.
    pub async fn patch_empty(&self, path: &str) -> Result<()> {
        let request = self.build_request(HttpMethod::Patch, path, None)?;
        parse_empty(self.execute(request).await?)
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self.build_request(HttpMethod::Delete, path, None)?;
        parse_empty(self.execute(request).await?)
    }
}

/// Return a copy of the envelope carrying `Authorization: Bearer <token>`.
pub fn authorize(mut request: HttpRequest, token: &str) -> Result<HttpRequest> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::Credential("credential provider returned an empty token".to_string()));
    }
    request
        .headers
        .retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));
    request
        .headers
        .push(("authorization".to_string(), format!("Bearer {token}")));
    Ok(request)
}

/// Map any non-2xx status to `ApiError::Request`.
pub fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Request {
        status: response.status,
        body: response.body.clone(),
    })
}

pub fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    check_status(&response)?;
    codec::decode(&response.body)
}

pub fn parse_list<T: DeserializeOwned>(response: HttpResponse) -> Result<Vec<T>> {
    check_status(&response)?;
    codec::decode_list(&response.body)
}

pub fn parse_empty(response: HttpResponse) -> Result<()> {
    check_status(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticToken;
    use crate::types::{Client, CreateClient};

    fn client() -> ResourceClient<StaticToken> {
        ResourceClient::new(&ClientConfig::new("http://localhost:8000"), StaticToken::new("t")).unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_produces_correct_envelope() {
        let req = client().build_request(HttpMethod::Get, "/clients", None).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/clients");
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
        assert!(req.header("authorization").is_none());
    }

    #[test]
    fn build_keeps_query_string() {
        let req = client()
            .build_request(HttpMethod::Get, "/clients?active_only=true", None)
            .unwrap();
        assert_eq!(req.url, "http://localhost:8000/clients?active_only=true");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = ResourceClient::new(&ClientConfig::new("http://localhost:8000/"), StaticToken::new("t")).unwrap();
        let req = c.build_request(HttpMethod::Get, "jobs", None).unwrap();
        assert_eq!(req.url, "http://localhost:8000/jobs");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ResourceClient::new(&ClientConfig::new("not a url"), StaticToken::new("t")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn build_post_serializes_camel_case_body() {
        let input = CreateClient {
            name: "Acme".to_string(),
            ..CreateClient::default()
        };
        let req = client()
            .build_json_request(HttpMethod::Post, "/clients", &input)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["type"], "Company");
        assert_eq!(body["name"], "Acme");
        assert!(body.get("addressLine1").is_none());
    }

    #[test]
    fn each_envelope_gets_its_own_request_id() {
        let c = client();
        let a = c.build_request(HttpMethod::Get, "/jobs", None).unwrap();
        let b = c.build_request(HttpMethod::Get, "/jobs", None).unwrap();
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn authorize_replaces_existing_header() {
        let req = client().build_request(HttpMethod::Delete, "/notes/1", None).unwrap();
        let req = authorize(req, "old").unwrap();
        let req = authorize(req, "new").unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer new"));
        assert_eq!(
            req.headers.iter().filter(|(k, _)| k == "authorization").count(),
            1
        );
    }

    #[test]
    fn authorize_rejects_empty_token() {
        let req = client().build_request(HttpMethod::Get, "/jobs", None).unwrap();
        assert!(matches!(authorize(req, "  "), Err(ApiError::Credential(_))));
    }

    #[test]
    fn parse_json_success() {
        let c: Client = parse_json(response(
            201,
            r#"{"id":7,"type":"Company","name":"Acme","isActive":true,"createdAt":"2024-03-01T12:00:00Z","updatedAt":"2024-03-01T12:00:00Z"}"#,
        ))
        .unwrap();
        assert_eq!(c.id, 7);
        assert_eq!(c.name, "Acme");
    }

    #[test]
    fn every_non_2xx_is_request_error() {
        for status in [400, 401, 404, 500] {
            let err = parse_list::<Client>(response(status, "[]")).unwrap_err();
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn parse_empty_accepts_204() {
        assert!(parse_empty(response(204, "")).is_ok());
        assert!(parse_empty(response(200, "{\"ok\":true}")).is_ok());
    }

    #[test]
    fn parse_list_bad_json() {
        let err = parse_list::<Client>(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
