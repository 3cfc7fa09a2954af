//! sharelink - selection and share-link core for a file manager.
//!
//! The crate turns user gestures over a directory listing into a selected set
//! of entries, and turns that selection into a time-limited, password-protected
//! share link rendered through a user-authored message template.

pub mod browser;
pub mod commands;
pub mod config;
pub mod listing;
pub mod logging;
pub mod selection;
pub mod share;
