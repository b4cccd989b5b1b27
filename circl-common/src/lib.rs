//! # Circl Common Library
//!
//! Shared code for the Circl catalog generator and data-management server:
//! - Error taxonomy
//! - Bootstrap configuration loading
//! - Condition identifier parsing
//! - Directory listing abstraction and atomic JSON writes

pub mod condition;
pub mod config;
pub mod error;
pub mod fs;

pub use condition::{canonicalize_ideology, ConditionId};
pub use error::{Error, Result};
pub use fs::{DirLister, FileEntry, MemoryLister, OsLister};
