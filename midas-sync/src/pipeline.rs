//! Shared entry pipeline entrypoint used by the CLI.

use std::fmt;
use std::path::PathBuf;

use midas_core::Payload;

use crate::{SiteService, SyncError};

/// A content change coming from the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    Create,
    Update,
    Remove,
}

impl fmt::Display for EntryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryAction::Create => write!(f, "create"),
            EntryAction::Update => write!(f, "update"),
            EntryAction::Remove => write!(f, "remove"),
        }
    }
}

/// Apply `action` for `payload`. Returns the path the entry was written to
/// (or, for removals, the path it occupied).
pub fn run(
    service: &mut SiteService,
    action: EntryAction,
    payload: &Payload,
) -> Result<PathBuf, SyncError> {
    match action {
        EntryAction::Create => service.create_entry(payload),
        EntryAction::Update => service.update_entry(payload),
        EntryAction::Remove => service.remove_entry(payload),
    }
}
