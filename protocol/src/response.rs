//! JSON envelopes returned by the `/api` routes.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::ParseError;
use crate::model::{ChatMessage, Follow, ForumReply, ForumSection, ForumThread, Room, User};

/// Decode a response body, mapping serde failures to [`ParseError`]
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ParseError> {
    Ok(serde_json::from_str(body)?)
}

#[derive(Debug, Deserialize)]
pub struct RoomsResponse {
    pub rooms: Vec<Room>,
}

#[derive(Debug, Deserialize)]
pub struct SectionsResponse {
    pub sections: Vec<ForumSection>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<WireMessage>,
}

impl MessagesResponse {
    pub fn into_messages(self, room_id: i64) -> Vec<ChatMessage> {
        self.messages
            .into_iter()
            .map(|m| m.into_message(room_id))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ThreadsResponse {
    pub threads: Vec<WireThread>,
}

impl ThreadsResponse {
    pub fn into_threads(self, section_id: i64) -> Vec<ForumThread> {
        self.threads
            .into_iter()
            .map(|t| t.into_thread(section_id))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct RepliesResponse {
    pub replies: Vec<WireReply>,
}

impl RepliesResponse {
    pub fn into_replies(self, thread_id: i64) -> Vec<ForumReply> {
        self.replies
            .into_iter()
            .map(|r| r.into_reply(thread_id))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct FollowsResponse {
    pub follows: Vec<FollowEntry>,
}

impl FollowsResponse {
    pub fn into_follows(self, follower: &str) -> Vec<Follow> {
        self.follows
            .into_iter()
            .map(|entry| Follow {
                follower: follower.to_string(),
                followee: entry.username,
                nickname: entry.nickname,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct FollowEntry {
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Generic `{success, message, ...}` acknowledgement.
///
/// `message` is a status string on most routes, but `/api/chat/send` puts
/// the stored message object there.
#[derive(Debug, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Ack {
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    /// True only when the server explicitly said `success: false`
    pub fn is_refusal(&self) -> bool {
        self.success == Some(false)
    }

    /// Human readable status text, if the server sent one
    pub fn message_text(&self) -> Option<&str> {
        match &self.message {
            Some(Value::String(text)) => Some(text),
            _ => self.rest.get("error").and_then(Value::as_str),
        }
    }

    /// Decode a named field (including `message`) into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent, null, or a plain string
    /// where an object was expected for `message`.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ParseError> {
        let value = if key == "message" {
            self.message.as_ref()
        } else {
            self.rest.get(key)
        };

        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(_)) if key == "message" => Ok(None),
            Some(v) => Ok(Some(serde_json::from_value(v.clone())?)),
        }
    }

    /// Server-issued integer ID under `key`, accepting numeric strings
    pub fn id(&self, key: &str) -> Option<i64> {
        match self.rest.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The `user` object some servers include after login
    pub fn user(&self) -> Option<User> {
        self.field("user").ok().flatten()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub id: i64,
    #[serde(default)]
    pub room_id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub content: String,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
}

impl WireMessage {
    pub fn into_message(self, room_id: i64) -> ChatMessage {
        ChatMessage {
            id: self.id,
            room_id: self.room_id.unwrap_or(room_id),
            username: self.username,
            nickname: self.nickname,
            color: self.color,
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireThread {
    pub id: i64,
    #[serde(default)]
    pub section_id: Option<i64>,
    pub title: String,
    pub author: String,
    #[serde(default, alias = "reply_count")]
    pub replies: u32,
}

impl WireThread {
    pub fn into_thread(self, section_id: i64) -> ForumThread {
        ForumThread {
            id: self.id,
            section_id: self.section_id.unwrap_or(section_id),
            title: self.title,
            author: self.author,
            reply_count: self.replies,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireReply {
    pub id: i64,
    #[serde(default)]
    pub thread_id: Option<i64>,
    pub author: String,
    pub content: String,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
}

impl WireReply {
    pub fn into_reply(self, thread_id: i64) -> ForumReply {
        ForumReply {
            id: self.id,
            thread_id: self.thread_id.unwrap_or(thread_id),
            author: self.author,
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}
