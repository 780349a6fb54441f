//! In-memory model of a file-explorer tree.
//!
//! The tree is single-threaded: entries are `Rc` handles and every callback
//! runs synchronously on the caller's thread.

pub mod core;
pub mod models;
pub mod services;

pub use crate::core::errors::{Error, Result};
pub use crate::models::entry::{Entry, EntryKind, ItemInit, ItemKind, WeakEntry};
pub use crate::models::events::{Depth, EventKind, RenameRequest, TreeEvent};
pub use crate::models::hooks::Hooks;
