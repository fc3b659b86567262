use stellarsis_protocol::response::{Ack, CountResponse};
use stellarsis_protocol::{Endpoint, OnlineCount, SystemInfo};

use crate::error::{ClientError, Result};
use crate::RemoteForumClient;

impl RemoteForumClient {
    /// Number of users online, or `Unknown` on any failure.
    ///
    /// This is advisory telemetry and never errors. Polling it on a timer
    /// is up to the caller.
    pub async fn online_count(&self) -> OnlineCount {
        let endpoint = Endpoint::OnlineCount;
        let request = self.request(&endpoint);

        let reply = match self.connection.send(&endpoint, request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Online count unavailable");
                return OnlineCount::Unknown;
            }
        };

        if !reply.is_success() {
            tracing::warn!(status = reply.status, "Online count unavailable");
            return OnlineCount::Unknown;
        }

        match reply.json::<CountResponse>() {
            Ok(body) => OnlineCount::Known(body.count),
            Err(e) => {
                tracing::warn!(error = %e, "Online count unreadable");
                OnlineCount::Unknown
            }
        }
    }

    /// Server diagnostics. Administrators only; anyone else gets `Forbidden`.
    pub async fn system_info(&mut self) -> Result<SystemInfo> {
        let endpoint = Endpoint::SystemInfo;
        let request = self.request(&endpoint);
        let reply = self.dispatch(&endpoint, request).await?;

        let ack: Ack = reply.json()?;
        if ack.is_refusal() {
            return Err(ClientError::Forbidden);
        }

        let mut info: SystemInfo = reply.json()?;
        info.extra.remove("success");
        info.extra.remove("message");
        Ok(info)
    }
}
