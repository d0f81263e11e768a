use crate::api;

/// What a mutating operation can report back to the UI.
///
/// `EmptyContent` and `AuthRequired` are raised before any network call;
/// everything else leaves local state exactly as it was, so the user can
/// retry from their still-populated input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot submit empty content")]
    EmptyContent,

    #[error("this action requires being logged in")]
    AuthRequired,

    #[error("rejected by moderation: {0}")]
    ModerationRejected(String),

    #[error("network error")]
    Network(#[source] anyhow::Error),

    #[error(transparent)]
    Api(#[from] api::Error),
}

impl Error {
    pub fn network(err: impl Into<anyhow::Error>) -> Error {
        Error::Network(err.into())
    }

    /// The message to surface on the alert/toast channel
    pub fn user_message(&self) -> String {
        match self {
            Error::ModerationRejected(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
