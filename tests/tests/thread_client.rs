use banter_client::{
    api::{self, CommentId, ReactionCounts, ReactionKind, Uuid},
    Depth, Error,
};
use tests::forum;

#[tokio::test]
async fn create_then_other_clients_see_it() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();
    assert!(alice.thread().is_empty());

    let id = alice.create_comment("  first!  ").await.unwrap();
    assert_eq!(alice.thread().len(), 1);
    let c = alice.thread().find(&id).unwrap();
    assert_eq!(c.content, "first!"); // trimmed before submission
    assert_eq!(c.author.username, "alice");
    assert!(!c.is_edited);
    assert_eq!(c.depth, Depth::Root);

    let mut bob = forum.client_for(&forum.bob);
    bob.load().await.unwrap();
    assert_eq!(bob.thread().len(), 1);
    assert_eq!(bob.thread().find(&id).unwrap().content, "first!");
}

#[tokio::test]
async fn optimistic_prepend_then_refresh_restores_creation_order() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();

    let first = alice.create_comment("first").await.unwrap();
    let second = alice.create_comment("second").await.unwrap();

    // optimistic placement puts the newest on top
    let ids: Vec<_> = alice.thread().roots().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![second, first]);

    // the authoritative list is in creation order
    alice.refresh().await.unwrap();
    let ids: Vec<_> = alice.thread().roots().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn reply_to_a_reply_is_redirected_to_the_root() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();
    let root = alice.create_comment("root").await.unwrap();

    let mut bob = forum.client_for(&forum.bob);
    bob.load().await.unwrap();
    let reply = bob.reply(root, "a reply").await.unwrap();
    assert_eq!(
        bob.thread().find(&reply).unwrap().depth,
        Depth::Reply { root }
    );

    // replying to the reply must target the root on the wire
    let nested = bob.reply(reply, "reply to the reply").await.unwrap();
    let records = forum
        .server
        .lock()
        .unwrap()
        .test_comment_records(forum.post.id);
    let rec = records.iter().find(|r| r.id == nested).unwrap();
    assert_eq!(rec.parent_id, Some(root));

    // and locally both hang as siblings under the root
    let tree_root = bob.thread().find(&root).unwrap();
    let reply_ids: Vec<_> = tree_root.replies.iter().map(|r| r.id).collect();
    assert_eq!(reply_ids, vec![reply, nested]);
}

#[tokio::test]
async fn moderation_rejection_leaves_everything_untouched() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();

    match alice.create_comment("utterly bogus take").await {
        Err(Error::ModerationRejected(msg)) => assert!(msg.contains("bogus")),
        other => panic!("expected a moderation rejection, got {other:?}"),
    }
    assert!(alice.thread().is_empty());
    assert!(forum
        .server
        .lock()
        .unwrap()
        .test_comment_records(forum.post.id)
        .is_empty());
}

#[tokio::test]
async fn edit_updates_local_and_server_state() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();
    let root = alice.create_comment("root").await.unwrap();
    let reply = alice.reply(root, "reply").await.unwrap();

    alice.edit_comment(reply, "reply, corrected").await.unwrap();
    let c = alice.thread().find(&reply).unwrap();
    assert_eq!(c.content, "reply, corrected");
    assert!(c.is_edited);

    let records = forum
        .server
        .lock()
        .unwrap()
        .test_comment_records(forum.post.id);
    let rec = records.iter().find(|r| r.id == reply).unwrap();
    assert_eq!(rec.content, "reply, corrected");
    assert!(rec.is_edited);
}

#[tokio::test]
async fn only_the_author_may_edit_or_delete() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();
    let id = alice.create_comment("mine").await.unwrap();

    let mut bob = forum.client_for(&forum.bob);
    bob.load().await.unwrap();
    assert!(matches!(
        bob.edit_comment(id, "now mine").await,
        Err(Error::Api(api::Error::PermissionDenied))
    ));
    assert!(matches!(
        bob.delete_comment(id).await,
        Err(Error::Api(api::Error::PermissionDenied))
    ));
    // the failed attempts changed nothing
    assert_eq!(bob.thread().find(&id).unwrap().content, "mine");
    assert_eq!(alice.thread().len(), 1);
}

#[tokio::test]
async fn deleting_a_root_takes_its_replies_along() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();
    let root = alice.create_comment("root").await.unwrap();
    let _reply = alice.reply(root, "reply").await.unwrap();
    let other = alice.create_comment("other root").await.unwrap();

    alice.delete_comment(root).await.unwrap();
    assert_eq!(alice.thread().len(), 1);
    assert!(alice.thread().find(&other).is_some());

    let records = forum
        .server
        .lock()
        .unwrap()
        .test_comment_records(forum.post.id);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, other);
}

#[tokio::test]
async fn deleting_a_reply_keeps_the_root() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();
    let root = alice.create_comment("root").await.unwrap();
    let reply = alice.reply(root, "reply").await.unwrap();

    alice.delete_comment(reply).await.unwrap();
    assert_eq!(alice.thread().len(), 1);
    assert!(alice.thread().find(&root).is_some());
    assert!(alice.thread().find(&reply).is_none());
}

#[tokio::test]
async fn anonymous_viewers_read_but_cannot_write() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();
    alice.create_comment("hello").await.unwrap();

    let mut viewer = forum.anonymous_client();
    viewer.load().await.unwrap();
    assert_eq!(viewer.thread().len(), 1);
    assert!(matches!(
        viewer.create_comment("me too").await,
        Err(Error::AuthRequired)
    ));
}

#[tokio::test]
async fn mutating_against_an_unknown_comment_surfaces_the_server_error() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();

    let ghost = CommentId(Uuid::new_v4());
    assert!(matches!(
        alice.reply(ghost, "hello?").await,
        Err(Error::Api(api::Error::UnknownComment(id))) if id == ghost
    ));
    assert!(matches!(
        alice.edit_comment(ghost, "hello?").await,
        Err(Error::Api(api::Error::UnknownComment(id))) if id == ghost
    ));
    assert!(alice.thread().is_empty());
}

#[tokio::test]
async fn reaction_toggles_reconcile_with_server_counts() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    alice.load().await.unwrap();
    assert_eq!(alice.reactions().mine, None);

    alice.toggle_reaction(ReactionKind::Like).await.unwrap();
    assert_eq!(alice.reactions().mine, Some(ReactionKind::Like));
    assert_eq!(
        alice.reactions().counts,
        ReactionCounts {
            likes: 1,
            dislikes: 0
        }
    );

    let mut bob = forum.client_for(&forum.bob);
    bob.load().await.unwrap();
    bob.toggle_reaction(ReactionKind::Dislike).await.unwrap();
    assert_eq!(
        bob.reactions().counts,
        ReactionCounts {
            likes: 1,
            dislikes: 1
        }
    );

    // tapping the active reaction clears it
    alice.toggle_reaction(ReactionKind::Like).await.unwrap();
    assert_eq!(alice.reactions().mine, None);
    assert_eq!(
        alice.reactions().counts,
        ReactionCounts {
            likes: 0,
            dislikes: 1
        }
    );

    // switching from dislike to like moves both counts
    bob.toggle_reaction(ReactionKind::Like).await.unwrap();
    assert_eq!(bob.reactions().mine, Some(ReactionKind::Like));
    assert_eq!(
        bob.reactions().counts,
        ReactionCounts {
            likes: 1,
            dislikes: 0
        }
    );

    // a reload agrees with the last authoritative answer
    let mut fresh = forum.client_for(&forum.bob);
    fresh.load().await.unwrap();
    assert_eq!(fresh.reactions().mine, Some(ReactionKind::Like));
    assert_eq!(
        fresh.reactions().counts,
        ReactionCounts {
            likes: 1,
            dislikes: 0
        }
    );
}

#[tokio::test]
async fn whoami_matches_the_injected_session() {
    let forum = forum();
    let mut alice = forum.client_for(&forum.alice);
    let me = banter_client::Backend::whoami(alice.backend_mut())
        .await
        .unwrap();
    assert_eq!(Some(&me), alice.session().current_user());
}
