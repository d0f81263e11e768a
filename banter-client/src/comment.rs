use crate::api::{Author, CommentId, CommentRecord, Time};

/// Where a comment sits in the two-level thread.
///
/// Only these two levels exist: replying to a `Reply` targets its `root`, so
/// a reply-to-a-reply becomes a sibling reply rather than a grandchild.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Depth {
    Root,
    Reply { root: CommentId },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub author: Author,
    pub content: String,
    pub created_at: Time,
    pub is_edited: bool,
    pub depth: Depth,

    /// Direct replies, in arrival order. Always empty on a `Depth::Reply`.
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn from_record(r: CommentRecord, depth: Depth) -> Comment {
        Comment {
            id: r.id,
            author: r.author,
            content: r.content,
            created_at: r.created_at,
            is_edited: r.is_edited,
            depth,
            replies: Vec::new(),
        }
    }

    pub fn find_in<'a>(roots: &'a [Comment], id: &CommentId) -> Option<&'a Comment> {
        for c in roots {
            if c.id == *id {
                return Some(c);
            }
            if let Some(r) = c.replies.iter().find(|r| r.id == *id) {
                return Some(r);
            }
        }
        None
    }

    pub fn find_in_mut<'a>(roots: &'a mut [Comment], id: &CommentId) -> Option<&'a mut Comment> {
        for c in roots {
            if c.id == *id {
                return Some(c);
            }
            if let Some(r) = c.replies.iter_mut().find(|r| r.id == *id) {
                return Some(r);
            }
        }
        None
    }
}
