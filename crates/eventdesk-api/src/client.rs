// Event API HTTP client
//
// Wraps `reqwest::Client` with URL construction under `/api/event/` and
// envelope unwrapping. Endpoint groups (events, tickets, poster) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ApiResponse;
use crate::transport::TransportConfig;

/// Raw HTTP client for the event-management API.
///
/// All methods return the unwrapped `data` payload; the envelope is
/// stripped before the caller sees it.
#[derive(Debug, Clone)]
pub struct EventClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl EventClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the service root (e.g. `https://events.example.com`);
    /// a path prefix such as `https://host/backend/` is preserved.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}/api/event/{segments...}`, percent-encoding each segment.
    pub(crate) fn event_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["api", "event"])
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, Error> {
        debug!("GET {url}");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.parse_envelope(resp).await
    }

    /// Send a POST request with a JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        debug!("POST {url}");
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.parse_envelope(resp).await
    }

    /// Send a multipart POST request and unwrap the envelope.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<Option<T>, Error> {
        debug!("POST {url} (multipart)");
        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.parse_envelope(resp).await
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(e)
        }
    }

    /// Parse the `{ success, message, data }` envelope.
    ///
    /// Non-2xx statuses become `Error::Http` (using the envelope message when
    /// the body carries one). A 2xx with `success: false` becomes
    /// `Error::Application`. `data` is decoded only after `success` is known,
    /// so a rejection never fails on an unexpected payload shape.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiResponse<Value>>(&body)
                .ok()
                .and_then(|env| env.message)
                .unwrap_or_else(|| {
                    if body.trim().is_empty() {
                        status.to_string()
                    } else {
                        body.chars().take(200).collect()
                    }
                });
            return Err(Error::Http {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse<Value> = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        if !envelope.success {
            return Err(Error::Application {
                message: envelope
                    .message
                    .unwrap_or_else(|| "request rejected by server".into()),
            });
        }

        match envelope.data {
            None | Some(Value::Null) => Ok(None),
            Some(data) => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body,
                }),
        }
    }
}
