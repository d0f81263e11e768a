use uuid::Uuid;

use crate::{Author, PostId, Time, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

/// Flat wire form of a comment, as returned by the list endpoint.
///
/// `parent_id` is `None` for a top-level comment. The backend only ever hands
/// out parents that are themselves top-level; nesting past one reply level is
/// flattened at submission time.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: CommentId,
    pub post_id: PostId,
    pub author: Author,
    pub content: String,
    pub parent_id: Option<CommentId>,
    pub created_at: Time,
    pub is_edited: bool,
}
