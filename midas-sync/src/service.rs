//! Entry synchronization: keeps rendered entry files and the registry in step.
//!
//! ## Create
//!
//! 1. Resolve model; archetype must exist.
//! 2. The entry id must not be registered yet.
//! 3. Ensure the output directory exists; `outputDir/<slug(title)>.html` must be free.
//! 4. Render the archetype, write atomically.
//! 5. Register `entryId → path`, flush.
//!
//! ## Update
//!
//! 1. Resolve model; archetype must exist.
//! 2. Old path from the registry; its directory becomes the output directory.
//! 3. New path from the current title. Taken by another file → conflict.
//! 4. Remove the old file (best effort), render the new one.
//! 5. Update the registry entry, flush.
//!
//! ## Remove
//!
//! Registered file deleted (already-gone is fine), registry entry dropped, flush.
//!
//! Partial failures are surfaced, never rolled back: a page can be on disk
//! with no registry entry (see [`SyncError::written_path`]), and an update
//! deletes the old page before the new one is written.

use std::path::{Path, PathBuf};

use midas_core::{
    slugify, EntryId, EntryRegistry, Payload, RegistryConstructors, RegistryError, ResolvedModel,
    SiteConfig,
};
use midas_renderer::ArchetypeRenderer;

use crate::build;
use crate::error::SyncError;
use crate::writer;

/// Extension of every rendered entry file.
pub const OUTPUT_EXTENSION: &str = "html";

/// Owns a site's registry and applies content changes to it.
pub struct SiteService {
    site: SiteConfig,
    registry: Box<dyn EntryRegistry>,
    renderer: ArchetypeRenderer,
}

impl std::fmt::Debug for SiteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteService")
            .field("site", &self.site)
            .finish_non_exhaustive()
    }
}

impl SiteService {
    /// Build the service for `site`, constructing its registry from `constructors`.
    ///
    /// The registry is opened if it exists and created if it does not. Storage
    /// that exists but cannot be read fails construction.
    pub fn new(site: SiteConfig, constructors: &RegistryConstructors) -> Result<Self, SyncError> {
        let construct =
            constructors
                .get(&site.registry.kind)
                .ok_or_else(|| SyncError::UnknownRegistry {
                    kind: site.registry.kind.clone(),
                })?;
        let registry = construct(&site);
        Self::with_registry(site, registry)
    }

    /// Build the service around an already-constructed registry.
    pub fn with_registry(
        site: SiteConfig,
        mut registry: Box<dyn EntryRegistry>,
    ) -> Result<Self, SyncError> {
        match registry.open_storage() {
            Ok(()) => {}
            Err(RegistryError::StorageNotFound { location }) => {
                tracing::info!("no registry at {location}; creating fresh storage");
                registry.create_storage().map_err(SyncError::Storage)?;
            }
            // Existing but unreadable storage is never replaced.
            Err(e) => return Err(SyncError::Storage(e)),
        }
        Ok(Self {
            site,
            registry,
            renderer: ArchetypeRenderer::new(),
        })
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    pub fn registry(&self) -> &dyn EntryRegistry {
        self.registry.as_ref()
    }

    /// `"<model>-<id>"` for the payload's entry.
    pub fn entry_id(&self, payload: &Payload) -> EntryId {
        payload.entry_id()
    }

    /// Run the site generator in the site root.
    pub fn build_site(&self, use_cache: bool) -> Result<(), SyncError> {
        build::build_site(&self.site, use_cache)
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Render a new entry and register it. Returns the written path.
    pub fn create_entry(&mut self, payload: &Payload) -> Result<PathBuf, SyncError> {
        let model = self.resolve_with_archetype(payload)?;

        let entry_id = payload.entry_id();
        match self.registry.read_entry(&entry_id) {
            Ok(path) => return Err(SyncError::AlreadyRegistered { entry_id, path }),
            Err(RegistryError::EntryNotFound { .. }) => {}
            Err(source) => {
                return Err(SyncError::Registry {
                    entry_id,
                    written: None,
                    source,
                })
            }
        }

        writer::ensure_dir(&model.output_dir)?;
        let output_path = output_path(&model.output_dir, payload.title())?;
        if writer::exists(&output_path)? {
            return Err(SyncError::Conflict { path: output_path });
        }

        self.render_to(&model, payload, &output_path)?;

        self.registry
            .create_entry(&entry_id, &output_path)
            .and_then(|()| self.registry.flush())
            .map_err(|source| SyncError::Registry {
                entry_id: entry_id.clone(),
                written: Some(output_path.clone()),
                source,
            })?;

        tracing::info!("created {entry_id}: {}", output_path.display());
        Ok(output_path)
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Re-render a registered entry, renaming its file if the title changed.
    /// Returns the new path.
    pub fn update_entry(&mut self, payload: &Payload) -> Result<PathBuf, SyncError> {
        let model = self.resolve_with_archetype(payload)?;

        let entry_id = payload.entry_id();
        let old_path = self.lookup(&entry_id)?;
        let output_dir = old_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| model.output_dir.clone());
        writer::ensure_dir(&output_dir)?;

        let output_path = output_path(&output_dir, payload.title())?;
        if output_path.file_name() != old_path.file_name() && writer::exists(&output_path)? {
            return Err(SyncError::Conflict { path: output_path });
        }

        match writer::remove_if_present(&old_path) {
            Ok(_) => {}
            Err(e) => tracing::warn!("could not remove previous file for {entry_id}: {e}"),
        }

        self.render_to(&model, payload, &output_path)?;

        self.registry
            .update_entry(&entry_id, &output_path)
            .and_then(|()| self.registry.flush())
            .map_err(|source| SyncError::Registry {
                entry_id: entry_id.clone(),
                written: Some(output_path.clone()),
                source,
            })?;

        if old_path != output_path {
            tracing::info!(
                "updated {entry_id}: {} -> {}",
                old_path.display(),
                output_path.display()
            );
        } else {
            tracing::info!("updated {entry_id}: {}", output_path.display());
        }
        Ok(output_path)
    }

    // -----------------------------------------------------------------------
    // Remove
    // -----------------------------------------------------------------------

    /// Delete a registered entry's file and its registry entry.
    /// Returns the path the entry occupied.
    pub fn remove_entry(&mut self, payload: &Payload) -> Result<PathBuf, SyncError> {
        self.site.resolve_model(payload.model())?;

        let entry_id = payload.entry_id();
        let path = self.lookup(&entry_id)?;

        if !writer::remove_if_present(&path)? {
            tracing::debug!("{} was already gone", path.display());
        }

        self.registry
            .delete_entry(&entry_id)
            .and_then(|()| self.registry.flush())
            .map_err(|source| SyncError::Registry {
                entry_id: entry_id.clone(),
                written: None,
                source,
            })?;

        tracing::info!("removed {entry_id}: {}", path.display());
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn resolve_with_archetype(&self, payload: &Payload) -> Result<ResolvedModel, SyncError> {
        let model = self.site.resolve_model(payload.model())?;
        if !writer::exists(&model.archetype_path)? {
            return Err(SyncError::MissingArchetype {
                model: model.name.0.clone(),
                path: model.archetype_path,
            });
        }
        Ok(model)
    }

    fn lookup(&self, entry_id: &EntryId) -> Result<PathBuf, SyncError> {
        self.registry
            .read_entry(entry_id)
            .map_err(|source| SyncError::NotRegistered {
                entry_id: entry_id.clone(),
                source,
            })
    }

    fn render_to(
        &self,
        model: &ResolvedModel,
        payload: &Payload,
        output_path: &Path,
    ) -> Result<(), SyncError> {
        let content = self.renderer.render(&model.archetype_path, payload)?;
        writer::atomic_write(output_path, &content)
    }
}

/// `dir/<slug(title)>.html`.
pub fn output_path(dir: &Path, title: &str) -> Result<PathBuf, SyncError> {
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(SyncError::InvalidTitle {
            title: title.to_string(),
        });
    }
    Ok(dir.join(format!("{slug}.{OUTPUT_EXTENSION}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
