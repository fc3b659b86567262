use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use stellarsis_protocol::response::{Ack, decode};
use stellarsis_protocol::{Endpoint, Method};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Longest body excerpt carried in a `ServerError`
const ERROR_EXCERPT_LEN: usize = 200;

/// HTTP transport with its own cookie jar.
///
/// A jar belongs to exactly one identity, so logging in or out throws the
/// whole connection away and opens a new one.
pub(crate) struct Connection {
    http: Client,
    root: String,
}

impl Connection {
    pub fn open(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            root: config.root().to_string(),
        })
    }

    /// Start a request for `endpoint`; nothing is sent until [`Self::send`]
    pub fn request(&self, endpoint: &Endpoint) -> RequestBuilder {
        let url = format!("{}{}", self.root, endpoint.path());
        match endpoint.method() {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Delete => self.http.delete(url),
        }
    }

    /// Perform one round trip. Only transport failures are errors here;
    /// status codes are left for the caller to classify.
    pub async fn send(&self, endpoint: &Endpoint, request: RequestBuilder) -> Result<Reply> {
        let path = endpoint.path();

        let response = request.send().await.map_err(|e| {
            tracing::warn!(path = %path, error = %e, timeout = e.is_timeout(), "Request failed");
            ClientError::Unreachable(self.root.clone())
        })?;

        let status = response.status().as_u16();
        let final_path = response.url().path().to_string();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("json"));

        let body = response.text().await.map_err(|e| {
            tracing::warn!(path = %path, error = %e, "Failed to read response body");
            ClientError::Unreachable(self.root.clone())
        })?;

        tracing::debug!(
            method = ?endpoint.method(),
            path = %path,
            status,
            final_path = %final_path,
            "Round trip complete"
        );

        Ok(Reply {
            status,
            final_path,
            is_json,
            body,
        })
    }
}

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub(crate) struct Reply {
    pub status: u16,
    /// Path of the URL that produced the body, after redirects
    pub final_path: String,
    pub is_json: bool,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when a redirect dropped us on the login page
    pub fn landed_on_login(&self) -> bool {
        self.final_path.trim_end_matches('/') == Endpoint::Login.path()
    }

    /// JSON either by content type or by shape; some routes omit the header
    pub fn looks_like_json(&self) -> bool {
        self.is_json || self.body.trim_start().starts_with('{')
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(decode(&self.body)?)
    }

    /// `{success, message}` body; an empty body reads as a bare ack
    pub fn ack(&self) -> Result<Ack> {
        if self.body.trim().is_empty() {
            return Ok(Ack::default());
        }
        self.json()
    }

    /// Classify a non-2xx status
    pub fn status_error(&self) -> ClientError {
        match self.status {
            401 => ClientError::NotAuthenticated,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            405 | 501 => ClientError::Unsupported(format!("route answered {}", self.status)),
            status => ClientError::ServerError {
                status,
                message: self.error_message(),
            },
        }
    }

    fn error_message(&self) -> String {
        if self.looks_like_json() {
            if let Ok(ack) = decode::<Ack>(&self.body) {
                if let Some(text) = ack.message_text() {
                    return text.to_string();
                }
            }
        }
        self.body.trim().chars().take(ERROR_EXCERPT_LEN).collect()
    }
}

/// Turn an explicit `success: false` into `Rejected`
pub(crate) fn accepted(ack: Ack, action: &str) -> Result<Ack> {
    if ack.is_refusal() {
        let reason = ack.message_text().unwrap_or(action).to_string();
        return Err(ClientError::Rejected(reason));
    }
    Ok(ack)
}
