mod backend;
pub use backend::Backend;

mod client;
pub use client::{Session, ThreadClient};

mod comment;
pub use comment::{Comment, Depth};

mod error;
pub use error::Error;

mod reaction;
pub use reaction::ReactionState;

mod thread;
pub use thread::{OrphanPolicy, Thread};

pub mod api {
    pub use banter_api::*;
}
