/// HTTP verbs used by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// Routes the client can call on the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// POST /login
    Login,

    /// GET /logout
    Logout,

    /// GET /api/chat/rooms
    ChatRooms,

    /// GET /api/chat/{room_id}/history?limit=N
    ChatHistory { room_id: i64, limit: u32 },

    /// POST /api/chat/send
    ChatSend,

    /// DELETE /api/chat/{room_id}/messages/{message_id}
    ChatDelete { room_id: i64, message_id: i64 },

    /// GET /api/forum/sections
    ForumSections,

    /// GET /api/forum/section/{section_id}/threads
    ForumThreads { section_id: i64 },

    /// GET /api/forum/thread/{thread_id}/replies
    ForumReplies { thread_id: i64 },

    /// POST /api/forum/reply
    ForumReply,

    /// POST /forum/thread
    ForumCreateThread,

    /// POST /api/follows
    Follow,

    /// GET /api/follows
    Follows,

    /// POST /change_password
    ChangePassword,

    /// GET /api/online_count
    OnlineCount,

    /// GET /api/admin/system-info
    SystemInfo,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Self::Login
            | Self::ChatSend
            | Self::ForumReply
            | Self::ForumCreateThread
            | Self::Follow
            | Self::ChangePassword => Method::Post,
            Self::ChatDelete { .. } => Method::Delete,
            _ => Method::Get,
        }
    }

    /// Path and query, relative to the server base URL
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Logout => "/logout".to_string(),
            Self::ChatRooms => "/api/chat/rooms".to_string(),
            Self::ChatHistory { room_id, limit } => {
                format!("/api/chat/{}/history?limit={}", room_id, limit)
            }
            Self::ChatSend => "/api/chat/send".to_string(),
            Self::ChatDelete {
                room_id,
                message_id,
            } => format!("/api/chat/{}/messages/{}", room_id, message_id),
            Self::ForumSections => "/api/forum/sections".to_string(),
            Self::ForumThreads { section_id } => {
                format!("/api/forum/section/{}/threads", section_id)
            }
            Self::ForumReplies { thread_id } => {
                format!("/api/forum/thread/{}/replies", thread_id)
            }
            Self::ForumReply => "/api/forum/reply".to_string(),
            Self::ForumCreateThread => "/forum/thread".to_string(),
            Self::Follow | Self::Follows => "/api/follows".to_string(),
            Self::ChangePassword => "/change_password".to_string(),
            Self::OnlineCount => "/api/online_count".to_string(),
            Self::SystemInfo => "/api/admin/system-info".to_string(),
        }
    }

    /// Whether the route needs an authenticated session.
    ///
    /// Public reads (room and forum listings, the online counter) are sent
    /// with whatever cookies the client holds but never require them.
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            Self::Login
                | Self::Logout
                | Self::ChatRooms
                | Self::ForumSections
                | Self::ForumThreads { .. }
                | Self::ForumReplies { .. }
                | Self::OnlineCount
        )
    }
}
