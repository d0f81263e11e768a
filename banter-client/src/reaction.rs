use crate::api::{ReactionCounts, ReactionKind};

/// Like/dislike state of the post being viewed: the same
/// optimistic-then-reconcile pattern as comments, on a single toggle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReactionState {
    /// The viewer's own reaction, if any
    pub mine: Option<ReactionKind>,
    pub counts: ReactionCounts,
}

impl ReactionState {
    pub fn new(mine: Option<ReactionKind>, counts: ReactionCounts) -> ReactionState {
        ReactionState { mine, counts }
    }

    /// What tapping `kind` means: tapping the active reaction clears it,
    /// tapping the other one switches to it
    pub fn toggled(&self, kind: ReactionKind) -> Option<ReactionKind> {
        match self.mine == Some(kind) {
            true => None,
            false => Some(kind),
        }
    }

    /// Counts as they will look once `next` is the viewer's reaction
    pub fn project(&self, next: Option<ReactionKind>) -> ReactionCounts {
        let mut counts = self.counts;
        match self.mine {
            Some(ReactionKind::Like) => counts.likes = counts.likes.saturating_sub(1),
            Some(ReactionKind::Dislike) => counts.dislikes = counts.dislikes.saturating_sub(1),
            None => (),
        }
        match next {
            Some(ReactionKind::Like) => counts.likes += 1,
            Some(ReactionKind::Dislike) => counts.dislikes += 1,
            None => (),
        }
        counts
    }
}
