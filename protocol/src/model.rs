//! Entities exchanged with the server.
//!
//! IDs are always the server's. Where the wire omits a parent ID (a message's
//! room, a thread's section) the client fills it from the request it made,
//! see [`crate::response`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An account on the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            nickname: None,
            color: None,
        }
    }

    /// Nickname if set, otherwise the username
    pub fn display_name(&self) -> &str {
        non_empty(self.nickname.as_deref()).unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub room_id: i64,
    pub username: String,
    pub nickname: Option<String>,
    pub color: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Name to show for the sender: nickname when present, else username
    pub fn author(&self) -> &str {
        non_empty(self.nickname.as_deref()).unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumSection {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumThread {
    pub id: i64,
    pub section_id: i64,
    pub title: String,
    pub author: String,
    pub reply_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumReply {
    pub id: i64,
    pub thread_id: i64,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The session user following another account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub follower: String,
    pub followee: String,
    pub nickname: Option<String>,
}

/// Server diagnostics, visible to administrators only.
///
/// Values are rendered as strings whether the server sends them as strings
/// or numbers. Keys beyond the known four are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub memory_usage: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub server_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub python_version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub flask_version: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Advisory count of users online.
///
/// `Unknown` is a normal outcome: the counter is telemetry and its absence
/// says nothing about the health of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnlineCount {
    Known(u64),
    Unknown,
}

impl OnlineCount {
    pub fn known(self) -> Option<u64> {
        match self {
            Self::Known(count) => Some(count),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for OnlineCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(count) => write!(f, "{}", count),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
