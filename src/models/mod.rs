//! Data models for the PromptOverflow forum.
//!
//! The JSON shapes are persisted verbatim in the key-value store and served to the front end.

mod post;
mod user;
mod view;

pub use post::*;
pub use user::*;
pub use view::*;
