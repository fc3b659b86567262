use stellarsis_protocol::request::FollowForm;
use stellarsis_protocol::response::FollowsResponse;
use stellarsis_protocol::{Endpoint, Follow};

use crate::connection::accepted;
use crate::error::{ClientError, Result};
use crate::RemoteForumClient;

impl RemoteForumClient {
    /// Follow another user. The server refuses unknown users and repeat
    /// follows with `success: false`, reported as `Rejected`.
    pub async fn follow(&mut self, username: &str) -> Result<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ClientError::validation("username must not be empty"));
        }

        let endpoint = Endpoint::Follow;
        let request = self.request(&endpoint).form(&FollowForm { username });
        let reply = self.dispatch(&endpoint, request).await?;

        accepted(reply.ack()?, "follow failed")?;
        Ok(())
    }

    pub async fn list_follows(&mut self) -> Result<Vec<Follow>> {
        let follower = self.require_session()?.username().to_string();

        let endpoint = Endpoint::Follows;
        let request = self.request(&endpoint);
        let reply = self.dispatch(&endpoint, request).await?;

        Ok(reply.json::<FollowsResponse>()?.into_follows(&follower))
    }
}
