//! reqwest-backed [`Collaborator`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::envelope::unwrap_data;
use crate::error::ClientError;
use crate::session::SessionContext;
use crate::{ClientResult, Collaborator};

/// Talks to the REST API over HTTP.
pub struct HttpCollaborator {
    client: reqwest::Client,
    base_url: String,
    session: Option<SessionContext>,
}

impl HttpCollaborator {
    /// Build a collaborator with a pre-configured HTTP client.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            session: config.session.clone(),
        })
    }

    /// Replace the session attached to outgoing requests.
    pub fn with_session(mut self, session: SessionContext) -> Self {
        self.session = Some(session);
        self
    }

    /// Absolute URL for a path relative to the API base.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.session {
            Some(session) => builder.bearer_auth(session.access_token()),
            None => builder,
        }
    }

    /// Send a request, check the status and strip the envelope.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        let mut builder = self.request(method.clone(), path);
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "API request failed");
            ClientError::Request(e)
        })?;

        let status = response.status();
        if let Err(e) = check_status(status) {
            tracing::warn!(%method, path, status = status.as_u16(), "API returned error status");
            return Err(e);
        }

        let bytes = response.bytes().await?;
        tracing::debug!(%method, path, "API request succeeded");
        decode_body(&bytes)
    }
}

/// Any non-2xx status is a failure carrying the code.
fn check_status(status: StatusCode) -> ClientResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ClientError::HttpStatus(status.as_u16()))
    }
}

/// Parse a response body and strip the envelope. An empty body is `null`.
fn decode_body(bytes: &[u8]) -> ClientResult<Value> {
    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes)?
    };
    unwrap_data(body)
}

#[async_trait]
impl Collaborator for HttpCollaborator {
    async fn get(&self, path: &str) -> ClientResult<Value> {
        self.execute(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> ClientResult<Value> {
        self.execute(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> ClientResult<Value> {
        self.execute(Method::PUT, path, Some(body)).await
    }
}
