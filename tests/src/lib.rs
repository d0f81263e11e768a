//! Shared fixtures for the integration tests: a seeded mock server with two
//! users and one post.

use std::sync::{Arc, Mutex};

use banter_client::{
    api::{Author, AuthToken, NewSession, NewUser, Post, UserId, Uuid},
    Session, ThreadClient,
};
use banter_mock_server::{MockConnection, MockServer};

pub const TEST_PASSWORD: &str = "hunter2";

pub struct TestForum {
    pub server: Arc<Mutex<MockServer>>,
    pub post: Post,
    pub alice: (AuthToken, Author),
    pub bob: (AuthToken, Author),
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn create_user(server: &mut MockServer, name: &str) -> (AuthToken, Author) {
    server
        .admin_create_user(NewUser {
            id: UserId(Uuid::new_v4()),
            username: name.to_string(),
            initial_password_hash: bcrypt::hash(TEST_PASSWORD, 4).expect("hashing test password"),
            profile_image: None,
        })
        .expect("creating test user");
    let tok = server
        .auth(NewSession::new(
            name.to_string(),
            TEST_PASSWORD.to_string(),
            String::from("tests"),
        ))
        .expect("authenticating test user");
    let author = server.whoami(tok).expect("resolving test user");
    (tok, author)
}

/// Two users and a post by alice; "bogus" is on the moderation list
pub fn forum() -> TestForum {
    init_tracing();
    let mut server = MockServer::new();
    server.moderate_word("bogus");
    let alice = create_user(&mut server, "alice");
    let bob = create_user(&mut server, "bob");
    let post = server
        .create_post(alice.0, "has anyone really been far even as decided")
        .expect("creating test post");
    TestForum {
        server: Arc::new(Mutex::new(server)),
        post,
        alice,
        bob,
    }
}

impl TestForum {
    pub fn client_for(&self, user: &(AuthToken, Author)) -> ThreadClient<MockConnection> {
        let conn = MockConnection::new(self.server.clone(), Some(user.0));
        ThreadClient::new(
            conn,
            Session::for_user(user.0, user.1.clone()),
            self.post.id,
        )
    }

    pub fn anonymous_client(&self) -> ThreadClient<MockConnection> {
        let conn = MockConnection::new(self.server.clone(), None);
        ThreadClient::new(conn, Session::anonymous(), self.post.id)
    }
}
