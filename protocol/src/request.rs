//! Request bodies. Field names are the server's form/JSON keys.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Sent as JSON
#[derive(Debug, Clone, Serialize)]
pub struct SendChatRequest<'a> {
    pub room_id: i64,
    pub message: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyForm<'a> {
    pub thread_id: i64,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateThreadForm<'a> {
    pub section_id: i64,
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowForm<'a> {
    pub username: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordForm<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}
