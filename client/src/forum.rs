use chrono::Utc;
use stellarsis_protocol::request::{CreateThreadForm, ReplyForm};
use stellarsis_protocol::response::{
    RepliesResponse, SectionsResponse, ThreadsResponse, WireReply, WireThread,
};
use stellarsis_protocol::{Endpoint, ForumReply, ForumSection, ForumThread};

use crate::connection::accepted;
use crate::error::{ClientError, Result};
use crate::RemoteForumClient;

impl RemoteForumClient {
    pub async fn list_sections(&mut self) -> Result<Vec<ForumSection>> {
        let endpoint = Endpoint::ForumSections;
        let request = self.request(&endpoint);
        let reply = self.dispatch(&endpoint, request).await?;

        Ok(reply.json::<SectionsResponse>()?.sections)
    }

    pub async fn list_threads(&mut self, section_id: i64) -> Result<Vec<ForumThread>> {
        let endpoint = Endpoint::ForumThreads { section_id };
        let request = self.request(&endpoint);
        let reply = self.dispatch(&endpoint, request).await?;

        Ok(reply.json::<ThreadsResponse>()?.into_threads(section_id))
    }

    /// Replies of a thread. Servers without the replies route answer 404 or
    /// 405; the latter surfaces as `Unsupported`.
    pub async fn list_replies(&mut self, thread_id: i64) -> Result<Vec<ForumReply>> {
        let endpoint = Endpoint::ForumReplies { thread_id };
        let request = self.request(&endpoint);
        let reply = self.dispatch(&endpoint, request).await?;

        Ok(reply.json::<RepliesResponse>()?.into_replies(thread_id))
    }

    /// Open a new thread.
    ///
    /// The thread ID must come from the server: a `thread` object or
    /// `thread_id` in a JSON body, or the `/forum/thread/{id}` page the
    /// post redirected to. Without one this returns `Unsupported`, even
    /// though the thread was probably created.
    pub async fn create_thread(
        &mut self,
        section_id: i64,
        title: &str,
        content: &str,
    ) -> Result<ForumThread> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ClientError::validation("thread title must not be empty"));
        }
        if content.trim().is_empty() {
            return Err(ClientError::validation("thread content must not be empty"));
        }
        let author = self.require_session()?.username().to_string();

        let endpoint = Endpoint::ForumCreateThread;
        let request = self.request(&endpoint).form(&CreateThreadForm {
            section_id,
            title,
            content,
        });
        let reply = self.dispatch(&endpoint, request).await?;

        let created = |id: i64| ForumThread {
            id,
            section_id,
            title: title.to_string(),
            author: author.clone(),
            reply_count: 0,
        };

        if reply.looks_like_json() {
            let ack = accepted(reply.ack()?, "thread not created")?;
            if let Some(thread) = ack.field::<WireThread>("thread")? {
                return Ok(thread.into_thread(section_id));
            }
            if let Some(id) = ack.id("thread_id") {
                return Ok(created(id));
            }
        } else if let Some(id) = thread_id_from_path(&reply.final_path) {
            return Ok(created(id));
        }

        Err(ClientError::Unsupported(
            "server did not report the new thread's id".to_string(),
        ))
    }

    /// Reply to a thread and return the stored reply.
    ///
    /// Takes the `reply` object from the response, or builds one around a
    /// bare `reply_id`. In the latter case the timestamp is the local time
    /// the server acknowledged the post. Like every write, retrying after a
    /// timeout may post twice.
    pub async fn post_reply(&mut self, thread_id: i64, content: &str) -> Result<ForumReply> {
        if content.trim().is_empty() {
            return Err(ClientError::validation("reply must not be empty"));
        }
        let author = self.require_session()?.username().to_string();

        let endpoint = Endpoint::ForumReply;
        let request = self
            .request(&endpoint)
            .form(&ReplyForm { thread_id, content });
        let reply = self.dispatch(&endpoint, request).await?;

        let ack = accepted(reply.ack()?, "reply not posted")?;
        if let Some(stored) = ack.field::<WireReply>("reply")? {
            return Ok(stored.into_reply(thread_id));
        }
        if let Some(id) = ack.id("reply_id") {
            return Ok(ForumReply {
                id,
                thread_id,
                author,
                content: content.to_string(),
                timestamp: Utc::now(),
            });
        }

        Err(ClientError::Unsupported(
            "server did not return the stored reply".to_string(),
        ))
    }
}

/// ID from a thread page path such as `/forum/thread/42`
fn thread_id_from_path(path: &str) -> Option<i64> {
    path.strip_prefix("/forum/thread/")?
        .split('/')
        .next()?
        .parse()
        .ok()
}
