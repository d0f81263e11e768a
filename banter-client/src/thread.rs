use std::collections::{HashMap, HashSet};

use crate::{
    api::{CommentId, CommentRecord, PostId},
    Comment, Depth,
};

/// What to do with a comment whose parent is absent from the fetched batch
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OrphanPolicy {
    /// Drop the orphan from the visible tree (with a warning)
    #[default]
    Drop,

    /// Surface the orphan as a top-level comment
    AdoptAsRoot,
}

/// The in-memory nested view of the comments of a single post.
///
/// Two levels only: top-level comments in arrival order, each carrying its
/// direct replies in arrival order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Thread {
    pub post: PostId,
    orphan_policy: OrphanPolicy,
    roots: Vec<Comment>,
}

impl Thread {
    pub fn new(post: PostId, orphan_policy: OrphanPolicy) -> Thread {
        Thread {
            post,
            orphan_policy,
            roots: Vec::new(),
        }
    }

    pub fn roots(&self) -> &[Comment] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of visible comments, replies included
    pub fn len(&self) -> usize {
        self.roots.iter().map(|c| 1 + c.replies.len()).sum()
    }

    pub fn find(&self, id: &CommentId) -> Option<&Comment> {
        Comment::find_in(&self.roots, id)
    }

    /// Replace the whole tree from a freshly fetched flat batch.
    ///
    /// First pass records which ids are present and who their parent is,
    /// second pass attaches each record either to the root list or to the
    /// replies of its top-level ancestor. Records nested deeper than one
    /// level in the input are flattened onto that ancestor. Never fails;
    /// an empty batch empties the thread.
    pub fn rebuild(&mut self, flat: Vec<CommentRecord>) {
        let parent_of: HashMap<CommentId, Option<CommentId>> =
            flat.iter().map(|r| (r.id, r.parent_id)).collect();

        let mut roots: Vec<Comment> = Vec::new();
        let mut at: HashMap<CommentId, usize> = HashMap::new();
        let mut pending: Vec<(CommentId, CommentRecord)> = Vec::new();
        for r in flat {
            match r.parent_id {
                None => {
                    at.insert(r.id, roots.len());
                    roots.push(Comment::from_record(r, Depth::Root));
                }
                Some(parent) => match resolve_root(parent, &parent_of) {
                    Some(root) => pending.push((root, r)),
                    None => match self.orphan_policy {
                        OrphanPolicy::Drop => {
                            tracing::warn!(comment=?r.id, parent=?parent, "dropping orphaned comment");
                        }
                        OrphanPolicy::AdoptAsRoot => {
                            at.insert(r.id, roots.len());
                            roots.push(Comment::from_record(r, Depth::Root));
                        }
                    },
                },
            }
        }
        for (root, r) in pending {
            // resolve_root only returns ids present in the batch as roots
            let slot = at[&root];
            roots[slot]
                .replies
                .push(Comment::from_record(r, Depth::Reply { root }));
        }
        self.roots = roots;
    }

    /// Optimistic placement of a freshly acknowledged comment: top-level
    /// comments are prepended, replies appended to their root's list.
    /// Returns false if the reply's root is not in the loaded tree.
    pub fn insert(&mut self, comment: Comment) -> bool {
        match comment.depth {
            Depth::Root => {
                self.roots.insert(0, comment);
                true
            }
            Depth::Reply { root } => match self.roots.iter_mut().find(|c| c.id == root) {
                Some(parent) => {
                    parent.replies.push(comment);
                    true
                }
                None => false,
            },
        }
    }

    /// In-place edit at whatever depth the comment is found
    pub fn apply_edit(&mut self, id: &CommentId, content: &str) -> bool {
        match Comment::find_in_mut(&mut self.roots, id) {
            Some(c) => {
                c.content = content.to_string();
                c.is_edited = true;
                true
            }
            None => false,
        }
    }

    /// Remove a root (its replies go with it) or a single reply
    pub fn remove(&mut self, id: &CommentId) -> bool {
        if let Some(pos) = self.roots.iter().position(|c| c.id == *id) {
            self.roots.remove(pos);
            return true;
        }
        for root in self.roots.iter_mut() {
            if let Some(pos) = root.replies.iter().position(|r| r.id == *id) {
                root.replies.remove(pos);
                return true;
            }
        }
        false
    }

    /// The id a reply to `id` must actually target: replying to a reply is
    /// redirected to its root, keeping the thread two levels deep
    pub fn reply_target(&self, id: &CommentId) -> CommentId {
        match self.find(id) {
            Some(Comment {
                depth: Depth::Reply { root },
                ..
            }) => *root,
            _ => *id,
        }
    }
}

/// Climb the parent chain to the top-level ancestor present in the batch.
/// Returns None if the chain leaves the batch or loops.
fn resolve_root(
    mut id: CommentId,
    parent_of: &HashMap<CommentId, Option<CommentId>>,
) -> Option<CommentId> {
    let mut seen = HashSet::new();
    loop {
        if !seen.insert(id) {
            tracing::warn!(comment=?id, "parent chain loops, treating as orphaned");
            return None;
        }
        match parent_of.get(&id) {
            None => return None,
            Some(None) => return Some(id),
            Some(Some(parent)) => id = *parent,
        }
    }
}
