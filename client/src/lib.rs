//! Session client for the Stellarsis chat and forum service.
//!
//! [`RemoteForumClient`] owns one HTTP session and exposes every server
//! operation as a typed `async` call returning [`Result`]. It keeps no UI
//! state and runs no background tasks: each call is exactly one round trip,
//! awaited by the caller.
//!
//! Mutating calls take `&mut self`, so one client serves one logical caller.
//! Share it across tasks only behind your own lock. Periodic work such as
//! refreshing [`RemoteForumClient::online_count`] belongs to the caller's
//! scheduler; see [`RECOMMENDED_POLL_INTERVAL`].

mod admin;
mod auth;
mod chat;
mod config;
mod connection;
mod error;
mod follows;
mod forum;
mod state;

use reqwest::RequestBuilder;
use stellarsis_protocol::Endpoint;

pub use config::{ClientConfig, DEFAULT_BASE_URL, RECOMMENDED_POLL_INTERVAL};
pub use error::{ClientError, Result};
pub use state::Session;
pub use stellarsis_protocol::{
    ChatMessage, Follow, ForumReply, ForumSection, ForumThread, OnlineCount, Room, SystemInfo,
    User,
};

use connection::{Connection, Reply};

/// Client for one user session against one server
pub struct RemoteForumClient {
    config: ClientConfig,
    connection: Connection,
    session: Option<Session>,
}

impl RemoteForumClient {
    /// Build an unauthenticated client. No request is made.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let connection = Connection::open(&config)?;

        Ok(Self {
            config,
            connection,
            session: None,
        })
    }

    /// Client for [`DEFAULT_BASE_URL`]
    pub fn connect_default() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(ClientError::NotAuthenticated)
    }

    fn request(&self, endpoint: &Endpoint) -> RequestBuilder {
        self.connection.request(endpoint)
    }

    /// Replace the cookie jar with an empty one
    fn reopen(&mut self) -> Result<()> {
        self.connection = Connection::open(&self.config)?;
        Ok(())
    }

    /// Forget the session locally. Never fails; if a fresh jar cannot be
    /// built the old one stays, but with no session every authenticated
    /// call still stops at `NotAuthenticated`.
    fn clear_session(&mut self) {
        self.session = None;
        if let Err(e) = self.reopen() {
            tracing::error!(error = %e, "Failed to reset HTTP session");
        }
    }

    /// Send a request and classify the outcome.
    ///
    /// Authenticated routes are refused locally when there is no session.
    /// A 401, or a redirect to the login page, means the server expired the
    /// session; it is cleared here.
    async fn dispatch(&mut self, endpoint: &Endpoint, request: RequestBuilder) -> Result<Reply> {
        let needs_session = endpoint.requires_session();
        if needs_session {
            self.require_session()?;
        }

        let reply = self.connection.send(endpoint, request).await?;

        if needs_session && (reply.status == 401 || reply.landed_on_login()) {
            tracing::warn!(
                path = %endpoint.path(),
                status = reply.status,
                "Session expired on server"
            );
            self.clear_session();
            return Err(ClientError::NotAuthenticated);
        }

        if !reply.is_success() {
            return Err(reply.status_error());
        }

        Ok(reply)
    }
}
