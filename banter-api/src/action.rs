use crate::{CommentId, CommentRecord, Error, PostId};

/// One comment mutation, as posted to the backend.
///
/// The acting user is always the owner of the bearer token; it is never part
/// of the payload.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum CommentAction {
    #[serde(rename_all = "camelCase")]
    Create {
        post_id: PostId,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<CommentId>,
    },
    #[serde(rename_all = "camelCase")]
    Edit {
        comment_id: CommentId,
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    Delete { comment_id: CommentId },
}

impl CommentAction {
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            CommentAction::Create { content, .. } => crate::validate_content(content),
            CommentAction::Edit { content, .. } => crate::validate_content(content),
            CommentAction::Delete { .. } => Ok(()),
        }
    }
}

/// Backend answer to a `CommentAction`.
///
/// `toxicity` marks a moderation rejection; `message` then carries the
/// reason to show the user verbatim.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<CommentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub toxicity: bool,
}

impl CommentAck {
    pub fn ok(comment_id: CommentId) -> CommentAck {
        CommentAck {
            success: true,
            comment_id: Some(comment_id),
            message: None,
            toxicity: false,
        }
    }

    pub fn done() -> CommentAck {
        CommentAck {
            success: true,
            comment_id: None,
            message: None,
            toxicity: false,
        }
    }

    pub fn moderated(message: String) -> CommentAck {
        CommentAck {
            success: false,
            comment_id: None,
            message: Some(message),
            toxicity: true,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentListResponse {
    pub success: bool,
    pub comments: Vec<CommentRecord>,
}
