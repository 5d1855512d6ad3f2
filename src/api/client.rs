//! Typed HTTP execution with error classification.
//!
//! `ApiClient` is the single place where transport and protocol failures are
//! mapped onto the `ApplicationError` taxonomy; callers above this layer
//! never inspect status codes or reqwest errors.

use anyhow::Result;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::endpoint::EndpointDescriptor;
use crate::error::ApplicationError;

const USER_AGENT: &str = concat!("fxwatch/", env!("CARGO_PKG_VERSION"));

/// Shape of a server-reported error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    error_description: String,
}

pub struct ApiClient {
    http: reqwest::Client,
    retry_limit: u32,
}

impl ApiClient {
    /// `retry_limit` caps re-execution after a server-reported error; 0
    /// surfaces the first non-2xx response immediately.
    pub fn new(retry_limit: u32) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(ApiClient { http, retry_limit })
    }

    /// Executes the descriptor and decodes the 2xx body into `T`.
    ///
    /// Classification: transport failure (connectivity, timeout) maps to
    /// `NetworkUnreachable`; a non-2xx response with a decodable
    /// `{error, error_description}` body is retried up to `retry_limit`
    /// times and then surfaced as `External`; undecodable bodies map to
    /// `DecodingFailure`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        descriptor: &EndpointDescriptor,
    ) -> Result<T, ApplicationError> {
        let mut attempt: u32 = 0;
        loop {
            let request = descriptor.build(&self.http)?;
            debug!(method = %request.method(), url = %request.url(), "Issuing request");

            let response = match self.http.execute(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "Network error");
                    return Err(ApplicationError::NetworkUnreachable);
                }
            };

            let status = response.status();
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "Failed to read response body");
                    return Err(ApplicationError::Unknown);
                }
            };

            if status.is_success() {
                return match serde_json::from_slice::<T>(&body) {
                    Ok(decoded) => {
                        debug!(%status, "Request succeeded");
                        Ok(decoded)
                    }
                    Err(e) => {
                        warn!(error = %e, "Decoding error");
                        Err(ApplicationError::DecodingFailure)
                    }
                };
            }

            let error = classify_error_body(status.as_u16(), &body)?;
            if attempt < self.retry_limit {
                attempt += 1;
                debug!(attempt, %status, "Retrying after server error");
                continue;
            }
            return Err(error);
        }
    }
}

/// Decodes a non-2xx body into `External`. Returned as `Ok` so the caller
/// can decide whether to retry; an undecodable body is a hard
/// `DecodingFailure`.
fn classify_error_body(status: u16, body: &[u8]) -> Result<ApplicationError, ApplicationError> {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => {
            warn!(
                code = status,
                title = %parsed.error,
                message = %parsed.error_description,
                "External error"
            );
            Ok(ApplicationError::External {
                code: status,
                message: parsed.error_description,
                title: parsed.error,
            })
        }
        Err(e) => {
            warn!(code = status, error = %e, "Decoding failure while handling error body");
            Err(ApplicationError::DecodingFailure)
        }
    }
}
