//! Entry registry: durable map from [`EntryId`] to the rendered file path.
//!
//! # Contract
//!
//! [`EntryRegistry`] is the seam between the entry synchronizer and its
//! storage. Mutations may be buffered; only [`EntryRegistry::flush`] is a
//! durability barrier.
//!
//! # Backends
//!
//! | name     | storage                                                  |
//! |----------|----------------------------------------------------------|
//! | `yaml`   | `<root>/.midas/registry.yaml` (or `registry.location`)   |
//! | `memory` | process-local map, nothing survives the process          |
//!
//! Backends are looked up by name in a [`RegistryConstructors`] table that
//! the caller builds and hands to the service; [`builtin_constructors`]
//! returns the table with both backends above.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{registry_io, RegistryError};
use crate::types::{EntryId, SiteConfig};

/// Current on-disk document version for the YAML backend.
pub const REGISTRY_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// 1. Contract
// ---------------------------------------------------------------------------

/// Storage for entry id → output path mappings.
pub trait EntryRegistry: Send {
    /// Open existing storage. Fails when there is nothing to open.
    fn open_storage(&mut self) -> Result<(), RegistryError>;

    /// Initialize fresh, empty storage.
    fn create_storage(&mut self) -> Result<(), RegistryError>;

    /// Insert a new mapping. Fails with [`RegistryError::EntryExists`] if `id` is taken.
    fn create_entry(&mut self, id: &EntryId, path: &Path) -> Result<(), RegistryError>;

    /// Look up where `id` lives. Fails with [`RegistryError::EntryNotFound`].
    fn read_entry(&self, id: &EntryId) -> Result<PathBuf, RegistryError>;

    /// Replace the path of an existing mapping.
    fn update_entry(&mut self, id: &EntryId, path: &Path) -> Result<(), RegistryError>;

    /// Drop an existing mapping.
    fn delete_entry(&mut self, id: &EntryId) -> Result<(), RegistryError>;

    /// Every mapping, sorted by entry id.
    fn entries(&self) -> Result<Vec<(EntryId, PathBuf)>, RegistryError>;

    /// Make every preceding mutation durable.
    fn flush(&mut self) -> Result<(), RegistryError>;
}

/// Builds a registry backend for a site.
pub type RegistryConstructor = fn(&SiteConfig) -> Box<dyn EntryRegistry>;

/// Backend name → constructor.
pub type RegistryConstructors = HashMap<String, RegistryConstructor>;

/// The constructor table with the `yaml` and `memory` backends.
pub fn builtin_constructors() -> RegistryConstructors {
    let mut table = RegistryConstructors::new();
    table.insert("yaml".to_string(), yaml_backend as RegistryConstructor);
    table.insert("memory".to_string(), memory_backend as RegistryConstructor);
    table
}

fn yaml_backend(site: &SiteConfig) -> Box<dyn EntryRegistry> {
    Box::new(YamlRegistry::for_site(site))
}

fn memory_backend(_site: &SiteConfig) -> Box<dyn EntryRegistry> {
    Box::new(MemoryRegistry::new())
}

// ---------------------------------------------------------------------------
// 2. Shared in-memory table
// ---------------------------------------------------------------------------

fn insert_new(
    entries: &mut BTreeMap<EntryId, PathBuf>,
    id: &EntryId,
    path: &Path,
) -> Result<(), RegistryError> {
    if entries.contains_key(id) {
        return Err(RegistryError::EntryExists {
            entry_id: id.0.clone(),
        });
    }
    entries.insert(id.clone(), path.to_path_buf());
    Ok(())
}

fn replace_existing(
    entries: &mut BTreeMap<EntryId, PathBuf>,
    id: &EntryId,
    path: &Path,
) -> Result<(), RegistryError> {
    match entries.get_mut(id) {
        Some(slot) => {
            *slot = path.to_path_buf();
            Ok(())
        }
        None => Err(RegistryError::EntryNotFound {
            entry_id: id.0.clone(),
        }),
    }
}

fn lookup(entries: &BTreeMap<EntryId, PathBuf>, id: &EntryId) -> Result<PathBuf, RegistryError> {
    entries
        .get(id)
        .cloned()
        .ok_or_else(|| RegistryError::EntryNotFound {
            entry_id: id.0.clone(),
        })
}

fn remove(entries: &mut BTreeMap<EntryId, PathBuf>, id: &EntryId) -> Result<(), RegistryError> {
    entries
        .remove(id)
        .map(|_| ())
        .ok_or_else(|| RegistryError::EntryNotFound {
            entry_id: id.0.clone(),
        })
}

// ---------------------------------------------------------------------------
// 3. YAML backend
// ---------------------------------------------------------------------------

/// On-disk registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub entries: BTreeMap<EntryId, PathBuf>,
}

/// `<root>/.midas/registry.yaml`. Pure, no I/O.
pub fn default_registry_path(root: &Path) -> PathBuf {
    root.join(".midas").join("registry.yaml")
}

/// YAML-file backend. Holds the table in memory and rewrites the file on flush.
#[derive(Debug)]
pub struct YamlRegistry {
    path: PathBuf,
    entries: Option<BTreeMap<EntryId, PathBuf>>,
}

impl YamlRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: None,
        }
    }

    /// Backend at `registry.location` (resolved against the root) or the default path.
    pub fn for_site(site: &SiteConfig) -> Self {
        let path = match site.registry.location.as_deref() {
            Some(location) => site.resolve_path(location),
            None => default_registry_path(&site.root_dir),
        };
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn table(&self) -> Result<&BTreeMap<EntryId, PathBuf>, RegistryError> {
        self.entries.as_ref().ok_or(RegistryError::NotOpen)
    }

    fn table_mut(&mut self) -> Result<&mut BTreeMap<EntryId, PathBuf>, RegistryError> {
        self.entries.as_mut().ok_or(RegistryError::NotOpen)
    }

    /// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
    fn save(&self, entries: &BTreeMap<EntryId, PathBuf>) -> Result<(), RegistryError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| registry_io(dir, e))?;
            }
        }
        let doc = RegistryDocument {
            version: REGISTRY_VERSION,
            updated_at: Utc::now(),
            entries: entries.clone(),
        };
        let yaml = serde_yaml::to_string(&doc)?;
        let tmp = self.path.with_extension("yaml.tmp");
        std::fs::write(&tmp, yaml).map_err(|e| registry_io(&tmp, e))?;
        set_file_permissions(&tmp)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(registry_io(&self.path, e));
        }
        Ok(())
    }
}

impl EntryRegistry for YamlRegistry {
    fn open_storage(&mut self) -> Result<(), RegistryError> {
        if !self.path.exists() {
            return Err(RegistryError::StorageNotFound {
                location: self.path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| registry_io(&self.path, e))?;
        let doc: RegistryDocument =
            serde_yaml::from_str(&contents).map_err(|source| RegistryError::Parse {
                path: self.path.clone(),
                source,
            })?;
        self.entries = Some(doc.entries);
        Ok(())
    }

    fn create_storage(&mut self) -> Result<(), RegistryError> {
        let empty = BTreeMap::new();
        self.save(&empty)?;
        self.entries = Some(empty);
        Ok(())
    }

    fn create_entry(&mut self, id: &EntryId, path: &Path) -> Result<(), RegistryError> {
        insert_new(self.table_mut()?, id, path)
    }

    fn read_entry(&self, id: &EntryId) -> Result<PathBuf, RegistryError> {
        lookup(self.table()?, id)
    }

    fn update_entry(&mut self, id: &EntryId, path: &Path) -> Result<(), RegistryError> {
        replace_existing(self.table_mut()?, id, path)
    }

    fn delete_entry(&mut self, id: &EntryId) -> Result<(), RegistryError> {
        remove(self.table_mut()?, id)
    }

    fn entries(&self) -> Result<Vec<(EntryId, PathBuf)>, RegistryError> {
        Ok(self
            .table()?
            .iter()
            .map(|(id, path)| (id.clone(), path.clone()))
            .collect())
    }

    fn flush(&mut self) -> Result<(), RegistryError> {
        let entries = self.table()?;
        self.save(entries)
    }
}

// ---------------------------------------------------------------------------
// 4. Memory backend
// ---------------------------------------------------------------------------

/// Process-local backend. `open_storage` fails until `create_storage` ran.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    entries: Option<BTreeMap<EntryId, PathBuf>>,
    flushes: usize,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful flushes so far.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    fn table_mut(&mut self) -> Result<&mut BTreeMap<EntryId, PathBuf>, RegistryError> {
        self.entries.as_mut().ok_or(RegistryError::NotOpen)
    }
}

impl EntryRegistry for MemoryRegistry {
    fn open_storage(&mut self) -> Result<(), RegistryError> {
        match self.entries {
            Some(_) => Ok(()),
            None => Err(RegistryError::StorageNotFound {
                location: "memory".to_string(),
            }),
        }
    }

    fn create_storage(&mut self) -> Result<(), RegistryError> {
        self.entries = Some(BTreeMap::new());
        Ok(())
    }

    fn create_entry(&mut self, id: &EntryId, path: &Path) -> Result<(), RegistryError> {
        insert_new(self.table_mut()?, id, path)
    }

    fn read_entry(&self, id: &EntryId) -> Result<PathBuf, RegistryError> {
        lookup(self.entries.as_ref().ok_or(RegistryError::NotOpen)?, id)
    }

    fn update_entry(&mut self, id: &EntryId, path: &Path) -> Result<(), RegistryError> {
        replace_existing(self.table_mut()?, id, path)
    }

    fn delete_entry(&mut self, id: &EntryId) -> Result<(), RegistryError> {
        remove(self.table_mut()?, id)
    }

    fn entries(&self) -> Result<Vec<(EntryId, PathBuf)>, RegistryError> {
        let table = self.entries.as_ref().ok_or(RegistryError::NotOpen)?;
        Ok(table.iter().map(|(id, p)| (id.clone(), p.clone())).collect())
    }

    fn flush(&mut self) -> Result<(), RegistryError> {
        self.table_mut()?;
        self.flushes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), RegistryError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| registry_io(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), RegistryError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn id(s: &str) -> EntryId {
        EntryId::from(s)
    }

    #[test]
    fn default_path_is_under_dot_midas() {
        let path = default_registry_path(Path::new("/srv/site"));
        assert!(path.ends_with(".midas/registry.yaml"));
    }

    #[test]
    fn open_fails_without_storage() {
        let tmp = TempDir::new().unwrap();
        let mut reg = YamlRegistry::new(tmp.path().join("registry.yaml"));
        let err = reg.open_storage().unwrap_err();
        assert!(matches!(err, RegistryError::StorageNotFound { .. }));
    }

    #[test]
    fn create_storage_writes_empty_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".midas").join("registry.yaml");
        let mut reg = YamlRegistry::new(&path);
        reg.create_storage().unwrap();
        assert!(path.exists());
        assert!(reg.entries().unwrap().is_empty());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o600);
        }
    }

    #[test]
    fn mutations_survive_only_after_flush() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("registry.yaml");
        let mut reg = YamlRegistry::new(&path);
        reg.create_storage().unwrap();
        reg.create_entry(&id("post-1"), Path::new("/out/a.html")).unwrap();

        let mut reopened = YamlRegistry::new(&path);
        reopened.open_storage().unwrap();
        assert!(reopened.read_entry(&id("post-1")).is_err(), "unflushed write leaked");

        reg.flush().unwrap();
        let mut reopened = YamlRegistry::new(&path);
        reopened.open_storage().unwrap();
        assert_eq!(
            reopened.read_entry(&id("post-1")).unwrap(),
            PathBuf::from("/out/a.html")
        );
    }

    #[test]
    fn flush_cleans_up_tmp() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("registry.yaml");
        let mut reg = YamlRegistry::new(&path);
        reg.create_storage().unwrap();
        reg.flush().unwrap();
        assert!(!path.with_extension("yaml.tmp").exists());
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let mut reg = MemoryRegistry::new();
        reg.create_storage().unwrap();
        reg.create_entry(&id("post-1"), Path::new("/a")).unwrap();
        let err = reg.create_entry(&id("post-1"), Path::new("/b")).unwrap_err();
        assert!(matches!(err, RegistryError::EntryExists { .. }));
        assert_eq!(reg.read_entry(&id("post-1")).unwrap(), PathBuf::from("/a"));
    }

    #[test]
    fn update_and_delete_require_existing_entry() {
        let mut reg = MemoryRegistry::new();
        reg.create_storage().unwrap();
        assert!(matches!(
            reg.update_entry(&id("post-9"), Path::new("/x")).unwrap_err(),
            RegistryError::EntryNotFound { .. }
        ));
        assert!(matches!(
            reg.delete_entry(&id("post-9")).unwrap_err(),
            RegistryError::EntryNotFound { .. }
        ));
    }

    #[test]
    fn memory_backend_counts_flushes_and_requires_open() {
        let mut reg = MemoryRegistry::new();
        assert!(matches!(reg.flush().unwrap_err(), RegistryError::NotOpen));
        reg.create_storage().unwrap();
        reg.flush().unwrap();
        reg.flush().unwrap();
        assert_eq!(reg.flush_count(), 2);
    }

    #[test]
    fn builtin_table_has_yaml_and_memory() {
        let table = builtin_constructors();
        assert!(table.contains_key("yaml"));
        assert!(table.contains_key("memory"));
    }

    #[test]
    fn for_site_honours_location() {
        let mut site = SiteConfig::new("/srv/site");
        site.registry.location = Some(PathBuf::from("data/entries.yaml"));
        let reg = YamlRegistry::for_site(&site);
        assert_eq!(reg.path(), Path::new("/srv/site/data/entries.yaml"));
    }
}
