use chrono::Utc;

use crate::{
    api::{self, AuthToken, Author, CommentAck, CommentAction, CommentId, PostId, ReactionKind},
    Backend, Comment, Depth, Error, OrphanPolicy, ReactionState, Thread,
};

/// The identity the client acts as, injected explicitly rather than looked
/// up from some ambient context. `user` is `None` for an anonymous viewer;
/// every mutating operation then fails fast with `AuthRequired`.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: Option<AuthToken>,
    pub user: Option<Author>,
}

impl Session {
    pub fn anonymous() -> Session {
        Session {
            token: None,
            user: None,
        }
    }

    pub fn for_user(token: AuthToken, user: Author) -> Session {
        Session {
            token: Some(token),
            user: Some(user),
        }
    }

    pub fn current_user(&self) -> Option<&Author> {
        self.user.as_ref()
    }
}

/// Keeps the nested comment view of one post consistent with the backend
/// across mutations.
///
/// Every mutation validates locally, awaits the backend's acknowledgement,
/// and only then patches local state from it; `refresh` stays available as
/// an explicit consistency check. Operations take `&mut self`, so a single
/// client never has two mutations in flight.
pub struct ThreadClient<B> {
    backend: B,
    session: Session,
    thread: Thread,
    reactions: ReactionState,
}

impl<B: Backend> ThreadClient<B> {
    pub fn new(backend: B, session: Session, post: PostId) -> ThreadClient<B> {
        Self::with_orphan_policy(backend, session, post, OrphanPolicy::default())
    }

    pub fn with_orphan_policy(
        backend: B,
        session: Session,
        post: PostId,
        orphan_policy: OrphanPolicy,
    ) -> ThreadClient<B> {
        ThreadClient {
            backend,
            session,
            thread: Thread::new(post, orphan_policy),
            reactions: ReactionState::default(),
        }
    }

    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    pub fn reactions(&self) -> &ReactionState {
        &self.reactions
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Initial fetch: the post (for reaction state) and the full comment list
    pub async fn load(&mut self) -> Result<(), Error> {
        let view = self.backend.fetch_post(self.thread.post).await?;
        self.reactions = ReactionState::new(view.my_reaction, view.post.reactions);
        self.refresh().await
    }

    /// Silent authoritative re-fetch of the comment list
    pub async fn refresh(&mut self) -> Result<(), Error> {
        let flat = self.backend.fetch_comments(self.thread.post).await?;
        self.thread.rebuild(flat);
        Ok(())
    }

    pub async fn create_comment(&mut self, content: &str) -> Result<CommentId, Error> {
        self.create_at(content, None).await
    }

    /// Reply to `parent`. Replying to a reply is redirected to its root
    /// comment, so the thread never grows past two levels.
    pub async fn reply(&mut self, parent: CommentId, content: &str) -> Result<CommentId, Error> {
        let target = self.thread.reply_target(&parent);
        self.create_at(content, Some(target)).await
    }

    async fn create_at(
        &mut self,
        content: &str,
        parent: Option<CommentId>,
    ) -> Result<CommentId, Error> {
        let content = validated(content)?;
        let author = self.logged_in()?.clone();
        let ack = self
            .submit(CommentAction::Create {
                post_id: self.thread.post,
                content: content.clone(),
                parent_id: parent,
            })
            .await?;
        let id = ack.comment_id.ok_or_else(|| {
            Error::Api(api::Error::Unknown(String::from(
                "create acknowledged without a comment id",
            )))
        })?;
        let depth = match parent {
            None => Depth::Root,
            Some(root) => Depth::Reply { root },
        };
        let placed = self.thread.insert(Comment {
            id,
            author,
            content,
            created_at: Utc::now(),
            is_edited: false,
            depth,
            replies: Vec::new(),
        });
        if !placed {
            // reply under a root we never loaded; let the server's
            // association win
            tracing::debug!(comment=?id, "acknowledged reply has no local root, refreshing");
            self.refresh().await?;
        }
        Ok(id)
    }

    /// On success the edit is applied in place, wherever the comment sits in
    /// the tree. On failure nothing is touched, so the caller's edit buffer
    /// stays valid for a retry.
    pub async fn edit_comment(&mut self, id: CommentId, content: &str) -> Result<(), Error> {
        let content = validated(content)?;
        self.logged_in()?;
        self.submit(CommentAction::Edit {
            comment_id: id,
            content: content.clone(),
        })
        .await?;
        if !self.thread.apply_edit(&id, &content) {
            tracing::debug!(comment=?id, "edited comment is not in the loaded tree, refreshing");
            self.refresh().await?;
        }
        Ok(())
    }

    pub async fn delete_comment(&mut self, id: CommentId) -> Result<(), Error> {
        self.logged_in()?;
        self.submit(CommentAction::Delete { comment_id: id })
            .await?;
        if !self.thread.remove(&id) {
            tracing::debug!(comment=?id, "deleted comment is not in the loaded tree, refreshing");
            self.refresh().await?;
        }
        Ok(())
    }

    /// Toggle the viewer's like/dislike on the post: counts are patched
    /// optimistically, then replaced by the server's authoritative answer;
    /// on failure the previous state is restored untouched.
    pub async fn toggle_reaction(&mut self, kind: ReactionKind) -> Result<(), Error> {
        self.logged_in()?;
        let next = self.reactions.toggled(kind);
        let optimistic = ReactionState::new(next, self.reactions.project(next));
        let previous = std::mem::replace(&mut self.reactions, optimistic);
        match self.backend.set_reaction(self.thread.post, next).await {
            Ok(counts) => {
                self.reactions = ReactionState::new(next, counts);
                Ok(())
            }
            Err(err) => {
                self.reactions = previous;
                Err(err)
            }
        }
    }

    fn logged_in(&self) -> Result<&Author, Error> {
        self.session.user.as_ref().ok_or(Error::AuthRequired)
    }

    async fn submit(&mut self, action: CommentAction) -> Result<CommentAck, Error> {
        tracing::debug!(?action, "submitting comment action");
        let ack = self.backend.submit_comment(action).await?;
        if ack.success {
            return Ok(ack);
        }
        let message = ack
            .message
            .unwrap_or_else(|| String::from("rejected by the server"));
        match ack.toxicity {
            true => Err(Error::ModerationRejected(message)),
            false => Err(Error::Api(api::Error::Unknown(message))),
        }
    }
}

fn validated(content: &str) -> Result<String, Error> {
    let content = content.trim();
    if content.is_empty() {
        return Err(Error::EmptyContent);
    }
    api::validate_string(content)?;
    Ok(content.to_string())
}
