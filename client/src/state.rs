use chrono::{DateTime, Utc};
use stellarsis_protocol::User;

/// Authenticated state between a successful login and logout.
///
/// The cookie that backs it lives in the client's HTTP jar; this value is
/// the client's record that the jar belongs to `user`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(user: User) -> Self {
        Self {
            user,
            established_at: Utc::now(),
        }
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}
