//! Project-specific utilities live here.

pub mod parse;
pub mod slug;
