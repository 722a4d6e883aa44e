use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::operation::Operation;

/// One fully specified outbound request. Built per call and consumed by
/// [`RequestDescriptor::send`].
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub operation: Operation,
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    pub fn new(operation: Operation, path: impl Into<String>) -> Self {
        Self {
            operation,
            method: operation.method(),
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of the `Cookie` header, if one has been attached.
    pub fn cookie_header(&self) -> Option<&str> {
        self.headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
    }

    pub(crate) fn set_cookie_header(&mut self, value: &str) -> Result<()> {
        let value = HeaderValue::from_str(value).map_err(|_| Error::MalformedResponse {
            operation: self.operation,
            reason: "session cookie is not a valid header value".to_string(),
        })?;
        self.headers.insert(header::COOKIE, value);
        Ok(())
    }

    pub(crate) async fn send(self, client: &Client, base_url: &Url) -> Result<Response> {
        let operation = self.operation;
        let url = base_url
            .join(self.path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidConfiguration(format!("Invalid request path: {}", e)))?;

        debug!(%operation, method = %self.method, path = %self.path, "Sending JIRA request");

        let mut request = client.request(self.method, url).headers(self.headers);
        if let Some(body) = &self.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        debug!(%operation, status = response.status().as_u16(), "JIRA responded");
        Ok(response)
    }
}
