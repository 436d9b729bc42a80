//! # midas-sync
//!
//! Entry synchronization and site builds.
//!
//! [`SiteService`] renders CMS payloads into entry files with an atomic
//! writer and keeps the entry registry in step. [`pipeline::run`] dispatches
//! an [`EntryAction`] to it; [`build::build_site`] runs the site generator.

pub mod build;
pub mod error;
pub mod pipeline;
pub mod service;
mod writer;

pub use error::SyncError;
pub use pipeline::EntryAction;
pub use service::{output_path, SiteService, OUTPUT_EXTENSION};
