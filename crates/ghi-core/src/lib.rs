pub mod config;
pub mod diff;
pub mod error;
pub mod frontmatter;
pub mod gh;
pub mod io;
pub mod paths;
pub mod process;
pub mod tracker;

pub use error::{ErrorKind, GhiError, Result};
