//! Catalog application library
//!
//! Project-specific modules and the utilities they share.

pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;
