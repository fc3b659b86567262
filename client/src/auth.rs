use stellarsis_protocol::request::{ChangePasswordForm, LoginForm};
use stellarsis_protocol::response::Ack;
use stellarsis_protocol::{Endpoint, User};

use crate::error::{ClientError, Result};
use crate::state::Session;
use crate::RemoteForumClient;

impl RemoteForumClient {
    /// Log in, replacing any existing session.
    ///
    /// Success needs a 200 and an application-level yes from the server:
    /// `success: true` in a JSON body, or an HTML body carrying none of the
    /// configured rejection markers. Where the request was redirected to is
    /// never consulted.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ClientError::validation("username and password are required"));
        }

        self.session = None;
        self.reopen()?;

        let endpoint = Endpoint::Login;
        let request = self
            .request(&endpoint)
            .form(&LoginForm { username, password });
        let reply = self.connection.send(&endpoint, request).await?;

        match reply.status {
            200 => {}
            401 | 403 => return Err(ClientError::Unauthorized),
            _ => return Err(reply.status_error()),
        }

        let user = if reply.looks_like_json() {
            let ack: Ack = reply.json()?;
            if ack.is_refusal() || (ack.success.is_none() && ack.rest.contains_key("error")) {
                tracing::info!(username, "Login rejected");
                return Err(ClientError::Unauthorized);
            }
            ack.user().unwrap_or_else(|| User::new(username))
        } else {
            if self.config.is_rejection_page(&reply.body) {
                tracing::info!(username, "Login rejected");
                return Err(ClientError::Unauthorized);
            }
            User::new(username)
        };

        tracing::info!(username = %user.username, "Logged in");
        self.session = Some(Session::new(user.clone()));
        Ok(user)
    }

    /// Tell the server we are leaving, then drop the session and its cookies
    /// whatever the server said.
    pub async fn logout(&mut self) {
        if self.session.is_some() {
            let endpoint = Endpoint::Logout;
            let request = self.request(&endpoint);
            if let Err(e) = self.connection.send(&endpoint, request).await {
                tracing::debug!(error = %e, "Logout notification failed");
            }
        }

        self.clear_session();
    }

    /// Change the session user's password.
    ///
    /// Fields are checked locally first: all present, `new_password` equal
    /// to `confirm`, and at least `min_password_len` characters long.
    pub async fn change_password(
        &mut self,
        old_password: &str,
        new_password: &str,
        confirm: &str,
    ) -> Result<()> {
        if old_password.is_empty() || new_password.is_empty() || confirm.is_empty() {
            return Err(ClientError::validation("all password fields are required"));
        }
        if new_password != confirm {
            return Err(ClientError::validation(
                "new password and confirmation do not match",
            ));
        }
        let min = self.config.min_password_len;
        if new_password.chars().count() < min {
            return Err(ClientError::validation(format!(
                "new password must be at least {} characters",
                min
            )));
        }

        let endpoint = Endpoint::ChangePassword;
        let request = self.request(&endpoint).form(&ChangePasswordForm {
            old_password,
            new_password,
            confirm_password: confirm,
        });
        let reply = self.dispatch(&endpoint, request).await?;

        let refused = if reply.looks_like_json() {
            reply.ack()?.is_refusal()
        } else {
            self.config.is_rejection_page(&reply.body)
        };
        if refused {
            return Err(ClientError::Unauthorized);
        }

        Ok(())
    }
}
