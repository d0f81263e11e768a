use std::{
    collections::{btree_map, BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use banter_client::{
    api::{
        self, Author, AuthToken, CommentAck, CommentAction, CommentId, CommentRecord, NewSession,
        NewUser, Post, PostId, PostView, ReactionCounts, ReactionKind, Uuid,
    },
    Backend,
};
use chrono::Utc;

/// In-memory stand-in for the forum backend, for tests
pub struct MockServer {
    users: BTreeMap<api::UserId, DbUser>,
    posts: HashMap<PostId, DbPost>,
    moderated_words: Vec<String>,
}

#[derive(Debug)]
struct DbUser {
    author: Author,
    pass_hash: String,
    sessions: HashMap<AuthToken, Device>,
}

#[derive(Debug)]
struct Device(String);

#[derive(Debug)]
struct DbPost {
    post: Post,
    reactions: HashMap<api::UserId, ReactionKind>,
    // flat, in creation order, exactly as the list endpoint returns them
    comments: Vec<CommentRecord>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            users: BTreeMap::new(),
            posts: HashMap::new(),
            moderated_words: Vec::new(),
        }
    }

    /// Content containing `word` (case-insensitive) will be answered with a
    /// toxicity ack instead of being stored
    pub fn moderate_word(&mut self, word: &str) {
        self.moderated_words.push(word.to_lowercase());
    }

    /// Return the current number of users
    pub fn test_num_users(&self) -> usize {
        self.users.len()
    }

    /// Flat records of a post as stored, for asserting on wire-level state
    pub fn test_comment_records(&self, post: PostId) -> Vec<CommentRecord> {
        self.posts
            .get(&post)
            .map(|p| p.comments.clone())
            .unwrap_or_default()
    }

    pub fn admin_create_user(&mut self, u: NewUser) -> Result<(), api::Error> {
        u.validate()?;

        if self.users.values().any(|db| db.author.username == u.username) {
            return Err(api::Error::NameAlreadyUsed(u.username));
        }

        match self.users.entry(u.id) {
            btree_map::Entry::Occupied(_) => Err(api::Error::UuidAlreadyUsed(u.id.0)),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(DbUser {
                    author: Author {
                        id: u.id,
                        username: u.username,
                        profile_image: u.profile_image,
                    },
                    pass_hash: u.initial_password_hash,
                    sessions: HashMap::new(),
                });
                Ok(())
            }
        }
    }

    pub fn auth(&mut self, s: NewSession) -> Result<AuthToken, api::Error> {
        s.validate()?;
        for u in self.users.values_mut() {
            if u.author.username == s.user {
                if !bcrypt::verify(&s.password, &u.pass_hash).unwrap_or(false) {
                    return Err(api::Error::PermissionDenied);
                }
                let tok = AuthToken(Uuid::new_v4());
                u.sessions.insert(tok, Device(s.device));
                return Ok(tok);
            }
        }
        Err(api::Error::PermissionDenied)
    }

    pub fn unauth(&mut self, tok: AuthToken) -> Result<(), api::Error> {
        let u = self.resolve_mut(tok)?;
        u.sessions.remove(&tok);
        Ok(())
    }

    fn resolve(&self, tok: AuthToken) -> Result<&DbUser, api::Error> {
        for u in self.users.values() {
            if u.sessions.contains_key(&tok) {
                return Ok(u);
            }
        }
        Err(api::Error::PermissionDenied)
    }

    fn resolve_mut(&mut self, tok: AuthToken) -> Result<&mut DbUser, api::Error> {
        for u in self.users.values_mut() {
            if u.sessions.contains_key(&tok) {
                return Ok(u);
            }
        }
        Err(api::Error::PermissionDenied)
    }

    pub fn whoami(&self, tok: AuthToken) -> Result<Author, api::Error> {
        Ok(self.resolve(tok)?.author.clone())
    }

    pub fn create_post(&mut self, tok: AuthToken, title: &str) -> Result<Post, api::Error> {
        api::validate_content(title)?;
        let author = self.resolve(tok)?.author.clone();
        let post = Post {
            id: PostId(Uuid::new_v4()),
            author,
            title: title.to_string(),
            created_at: Utc::now(),
            reactions: ReactionCounts::default(),
        };
        self.posts.insert(
            post.id,
            DbPost {
                post: post.clone(),
                reactions: HashMap::new(),
                comments: Vec::new(),
            },
        );
        Ok(post)
    }

    pub fn fetch_post(
        &self,
        tok: Option<AuthToken>,
        post: PostId,
    ) -> Result<PostView, api::Error> {
        let viewer = match tok {
            Some(tok) => Some(self.resolve(tok)?.author.id),
            None => None,
        };
        let p = self
            .posts
            .get(&post)
            .ok_or(api::Error::UnknownPost(post))?;
        Ok(PostView {
            post: p.post.clone(),
            my_reaction: viewer.and_then(|v| p.reactions.get(&v).copied()),
        })
    }

    pub fn fetch_comments(&self, post: PostId) -> Result<Vec<CommentRecord>, api::Error> {
        Ok(self
            .posts
            .get(&post)
            .ok_or(api::Error::UnknownPost(post))?
            .comments
            .clone())
    }

    fn flagged_word(&self, content: &str) -> Option<&str> {
        let content = content.to_lowercase();
        self.moderated_words
            .iter()
            .find(|w| content.contains(*w))
            .map(|w| w.as_str())
    }

    pub fn submit_comment(
        &mut self,
        tok: AuthToken,
        action: CommentAction,
    ) -> Result<CommentAck, api::Error> {
        action.validate()?;
        let actor = self.resolve(tok)?.author.clone();
        match action {
            CommentAction::Create {
                post_id,
                content,
                parent_id,
            } => {
                if let Some(word) = self.flagged_word(&content) {
                    return Ok(CommentAck::moderated(format!(
                        "content flagged by moderation: {word}"
                    )));
                }
                let p = self
                    .posts
                    .get_mut(&post_id)
                    .ok_or(api::Error::UnknownPost(post_id))?;
                // the thread stays two levels deep server-side too
                let parent_id = match parent_id {
                    None => None,
                    Some(parent) => {
                        let parent_rec = p
                            .comments
                            .iter()
                            .find(|c| c.id == parent)
                            .ok_or(api::Error::UnknownComment(parent))?;
                        Some(parent_rec.parent_id.unwrap_or(parent))
                    }
                };
                let record = CommentRecord {
                    id: CommentId(Uuid::new_v4()),
                    post_id,
                    author: actor,
                    content,
                    parent_id,
                    created_at: Utc::now(),
                    is_edited: false,
                };
                let id = record.id;
                p.comments.push(record);
                Ok(CommentAck::ok(id))
            }
            CommentAction::Edit {
                comment_id,
                content,
            } => {
                if let Some(word) = self.flagged_word(&content) {
                    return Ok(CommentAck::moderated(format!(
                        "content flagged by moderation: {word}"
                    )));
                }
                let record = self
                    .posts
                    .values_mut()
                    .flat_map(|p| p.comments.iter_mut())
                    .find(|c| c.id == comment_id)
                    .ok_or(api::Error::UnknownComment(comment_id))?;
                if record.author.id != actor.id {
                    return Err(api::Error::PermissionDenied);
                }
                record.content = content;
                record.is_edited = true;
                Ok(CommentAck::done())
            }
            CommentAction::Delete { comment_id } => {
                let p = self
                    .posts
                    .values_mut()
                    .find(|p| p.comments.iter().any(|c| c.id == comment_id))
                    .ok_or(api::Error::UnknownComment(comment_id))?;
                let record = p
                    .comments
                    .iter()
                    .find(|c| c.id == comment_id)
                    .expect("post was just found by this comment id");
                if record.author.id != actor.id {
                    return Err(api::Error::PermissionDenied);
                }
                // a deleted root takes its replies along
                p.comments
                    .retain(|c| c.id != comment_id && c.parent_id != Some(comment_id));
                Ok(CommentAck::done())
            }
        }
    }

    pub fn set_reaction(
        &mut self,
        tok: AuthToken,
        post: PostId,
        reaction: Option<ReactionKind>,
    ) -> Result<ReactionCounts, api::Error> {
        let viewer = self.resolve(tok)?.author.id;
        let p = self
            .posts
            .get_mut(&post)
            .ok_or(api::Error::UnknownPost(post))?;
        match reaction {
            Some(kind) => {
                p.reactions.insert(viewer, kind);
            }
            None => {
                p.reactions.remove(&viewer);
            }
        }
        let counts = ReactionCounts {
            likes: p
                .reactions
                .values()
                .filter(|r| **r == ReactionKind::Like)
                .count() as u64,
            dislikes: p
                .reactions
                .values()
                .filter(|r| **r == ReactionKind::Dislike)
                .count() as u64,
        };
        p.post.reactions = counts;
        Ok(counts)
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

/// One client's view of a shared `MockServer`, implementing the `Backend`
/// seam so a `ThreadClient` can run against it while the test keeps its own
/// handle to the server.
#[derive(Clone)]
pub struct MockConnection {
    server: Arc<Mutex<MockServer>>,
    token: Option<AuthToken>,
}

impl MockConnection {
    pub fn new(server: Arc<Mutex<MockServer>>, token: Option<AuthToken>) -> MockConnection {
        MockConnection { server, token }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockServer> {
        self.server.lock().expect("mock server lock poisoned")
    }

    fn token(&self) -> Result<AuthToken, banter_client::Error> {
        self.token.ok_or(banter_client::Error::AuthRequired)
    }
}

#[async_trait]
impl Backend for MockConnection {
    async fn whoami(&mut self) -> Result<Author, banter_client::Error> {
        let tok = self.token()?;
        Ok(self.lock().whoami(tok)?)
    }

    async fn fetch_post(&mut self, post: PostId) -> Result<PostView, banter_client::Error> {
        Ok(self.lock().fetch_post(self.token, post)?)
    }

    async fn fetch_comments(
        &mut self,
        post: PostId,
    ) -> Result<Vec<CommentRecord>, banter_client::Error> {
        Ok(self.lock().fetch_comments(post)?)
    }

    async fn submit_comment(
        &mut self,
        action: CommentAction,
    ) -> Result<CommentAck, banter_client::Error> {
        let tok = self.token()?;
        Ok(self.lock().submit_comment(tok, action)?)
    }

    async fn set_reaction(
        &mut self,
        post: PostId,
        reaction: Option<ReactionKind>,
    ) -> Result<ReactionCounts, banter_client::Error> {
        let tok = self.token()?;
        Ok(self.lock().set_reaction(tok, post, reaction)?)
    }
}
