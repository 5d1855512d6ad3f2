//! Declarative description of a single HTTP call.

use std::time::Duration;

use reqwest::{Method, Url};
use tracing::warn;

use crate::error::ApplicationError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// An inert description of one network call. Built per request and discarded
/// after use; translating it into an executable request is a pure function of
/// the fields below.
///
/// Query, header and body fields are optional; the exchange endpoint itself
/// uses none of them, everything it needs lives in the path.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    method: Method,
    base_url: String,
    path: String,
    timeout: Duration,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl EndpointDescriptor {
    pub fn get(base_url: &str, path: &str) -> Self {
        Self::new(Method::GET, base_url, path)
    }

    pub fn new(method: Method, base_url: &str, path: &str) -> Self {
        EndpointDescriptor {
            method,
            base_url: base_url.to_string(),
            path: path.to_string(),
            timeout: DEFAULT_TIMEOUT,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Composes the full request. Fails without issuing anything when the
    /// URL cannot be formed from `base_url` and `path`.
    pub fn build(&self, http: &reqwest::Client) -> Result<reqwest::Request, ApplicationError> {
        let raw = format!("{}{}", self.base_url.trim_end_matches('/'), self.path);
        let url = Url::parse(&raw).map_err(|e| {
            warn!(url = %raw, error = %e, "Malformed request URL");
            ApplicationError::NetworkUnreachable
        })?;

        let mut request = http.request(self.method.clone(), url).timeout(self.timeout);
        if !self.query.is_empty() {
            request = request.query(&self.query);
        }
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        if let Some(body) = &self.body {
            request = request.json(body);
        }

        request.build().map_err(|e| {
            warn!(error = %e, "Failed to build request");
            ApplicationError::NetworkUnreachable
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_composes_url_with_query() {
        let http = reqwest::Client::new();
        let descriptor = EndpointDescriptor::get("http://api.example.com/", "/rates/latest")
            .query("from", "EUR")
            .query("to", "US D");

        let request = descriptor.build(&http).unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.url().as_str(),
            "http://api.example.com/rates/latest?from=EUR&to=US+D"
        );
    }

    #[test]
    fn test_build_sets_headers_and_body() {
        let http = reqwest::Client::new();
        let descriptor =
            EndpointDescriptor::new(Method::POST, "http://api.example.com", "/convert")
                .header("X-Request-Id", "42")
                .json_body(serde_json::json!({"amount": "1.00"}));

        let request = descriptor.build(&http).unwrap();
        assert_eq!(request.headers().get("X-Request-Id").unwrap(), "42");
        assert!(request.body().is_some());
    }

    #[test]
    fn test_build_fails_on_malformed_url() {
        let http = reqwest::Client::new();
        let descriptor = EndpointDescriptor::get("not a url", "/latest");
        assert_eq!(
            descriptor.build(&http).unwrap_err(),
            ApplicationError::NetworkUnreachable
        );
    }

    #[test]
    fn test_timeout_is_applied() {
        let http = reqwest::Client::new();
        let descriptor = EndpointDescriptor::get("http://api.example.com", "/latest")
            .timeout(Duration::from_secs(5));
        let request = descriptor.build(&http).unwrap();
        assert_eq!(request.timeout(), Some(&Duration::from_secs(5)));
    }
}
