//! Copies or symlinks project paths into a webroot directory after a
//! dependency install or update.
//!
//! The core is [`sync::synchronize`], a plain function over an explicit
//! [`sync::SyncContext`] and a list of [`entry::PathSpec`]s. The [`api`]
//! module wires it to a manifest on disk and to the lifecycle [`hooks`].

pub mod api;
pub mod config;
pub mod entry;
pub mod errors;
pub mod fsops;
pub mod hooks;
pub mod manifest;
pub mod root;
pub mod sync;

pub use api::{initialise_webroot, run_hook, Options, WebrootError};
pub use entry::{CopyEntry, PathSpec};
pub use sync::{LinkPolicy, SyncContext, SyncReport};
