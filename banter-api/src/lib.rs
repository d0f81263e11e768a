use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

mod action;
pub use action::{CommentAck, CommentAction, CommentListResponse};

mod auth;
pub use auth::{AuthToken, NewSession, NewUser};

mod comment;
pub use comment::{CommentId, CommentRecord};

mod error;
pub use error::Error;

mod post;
pub use post::{Post, PostId, PostView, ReactionCounts, ReactionKind};

mod user;
pub use user::{Author, UserId};

/// Rejects strings the backend will never accept in any field
pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(s.to_string())),
        false => Ok(()),
    }
}

/// Like `validate_string`, but also rejects whitespace-only bodies
pub fn validate_content(s: &str) -> Result<(), Error> {
    validate_string(s)?;
    match s.trim().is_empty() {
        true => Err(Error::EmptyText),
        false => Ok(()),
    }
}
