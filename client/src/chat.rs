use stellarsis_protocol::request::SendChatRequest;
use stellarsis_protocol::response::{MessagesResponse, RoomsResponse, WireMessage};
use stellarsis_protocol::{ChatMessage, Endpoint, Room};

use crate::connection::accepted;
use crate::error::{ClientError, Result};
use crate::RemoteForumClient;

impl RemoteForumClient {
    pub async fn list_rooms(&mut self) -> Result<Vec<Room>> {
        let endpoint = Endpoint::ChatRooms;
        let request = self.request(&endpoint);
        let reply = self.dispatch(&endpoint, request).await?;

        Ok(reply.json::<RoomsResponse>()?.rooms)
    }

    /// Up to `limit` recent messages of a room, oldest first
    pub async fn chat_history(&mut self, room_id: i64, limit: u32) -> Result<Vec<ChatMessage>> {
        if limit == 0 {
            return Err(ClientError::validation("history limit must be positive"));
        }

        let endpoint = Endpoint::ChatHistory { room_id, limit };
        let request = self.request(&endpoint);
        let reply = self.dispatch(&endpoint, request).await?;

        let mut messages = reply.json::<MessagesResponse>()?.into_messages(room_id);
        // Stable, so equal timestamps keep the server's order
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }

    /// Post a message and return it as the server stored it.
    ///
    /// Not idempotent: if this times out the message may still have been
    /// stored, and calling again can post it twice.
    pub async fn send_chat_message(&mut self, room_id: i64, content: &str) -> Result<ChatMessage> {
        if content.trim().is_empty() {
            return Err(ClientError::validation("message must not be empty"));
        }

        let endpoint = Endpoint::ChatSend;
        let request = self.request(&endpoint).json(&SendChatRequest {
            room_id,
            message: content,
        });
        let reply = self.dispatch(&endpoint, request).await?;

        let ack = accepted(reply.ack()?, "message not sent")?;
        if !ack.is_success() {
            return Err(ClientError::DecodeError(
                "send response lacks a success flag".to_string(),
            ));
        }

        ack.field::<WireMessage>("message")?
            .map(|m| m.into_message(room_id))
            .ok_or_else(|| {
                ClientError::Unsupported("server did not return the stored message".to_string())
            })
    }

    /// Delete a message. Permission is the server's call: a refusal comes
    /// back as `Forbidden` (403) or `Rejected` (`success: false`).
    pub async fn delete_chat_message(&mut self, room_id: i64, message_id: i64) -> Result<()> {
        let endpoint = Endpoint::ChatDelete {
            room_id,
            message_id,
        };
        let request = self.request(&endpoint);
        let reply = self.dispatch(&endpoint, request).await?;

        accepted(reply.ack()?, "message not deleted")?;
        tracing::debug!(room_id, message_id, "Message deleted");
        Ok(())
    }
}
