//! Forum state: the post store, its list operations and the persistence shell.

mod filter;
mod forum;
mod post_store;
mod seed;

pub use filter::*;
pub use forum::*;
pub use post_store::*;
