use async_trait::async_trait;

use crate::{
    api::{Author, CommentAck, CommentAction, CommentRecord, PostId, PostView, ReactionCounts,
          ReactionKind},
    Error,
};

/// The remote side of a thread: one authenticated connection to the forum
/// backend. Implemented over HTTP by banter-http and in memory by
/// banter-mock-server.
#[async_trait]
pub trait Backend {
    async fn whoami(&mut self) -> Result<Author, Error>;
    async fn fetch_post(&mut self, post: PostId) -> Result<PostView, Error>;
    async fn fetch_comments(&mut self, post: PostId) -> Result<Vec<CommentRecord>, Error>;
    async fn submit_comment(&mut self, action: CommentAction) -> Result<CommentAck, Error>;
    async fn set_reaction(
        &mut self,
        post: PostId,
        reaction: Option<ReactionKind>,
    ) -> Result<ReactionCounts, Error>;
}
