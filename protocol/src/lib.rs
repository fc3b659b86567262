//! Wire format for the Stellarsis chat and forum HTTP API.
//!
//! `stellarsis-protocol` knows the routes, the request payloads and the JSON
//! envelopes the server answers with. It performs no I/O; the transport lives
//! in `stellarsis-client`.
//!
//! ```text
//! stellarsis-protocol (routes, payloads, entities)
//!        │
//!        ▼
//! stellarsis-client (session, transport, error taxonomy)
//! ```

use thiserror::Error;

pub mod endpoint;
pub mod model;
pub mod request;
pub mod response;
pub mod timestamp;


pub use endpoint::{Endpoint, Method};
pub use model::{
    ChatMessage, Follow, ForumReply, ForumSection, ForumThread, OnlineCount, Room, SystemInfo,
    User,
};
pub use timestamp::parse_timestamp;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}
