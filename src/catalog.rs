// src/catalog.rs

//! Catalog store
//!
//! The catalog is a single JSON file holding every registered distro as an
//! ordered array. A run loads it once, upserts one record, and writes it back
//! once. Before the write the previous file is copied to `<catalog>.bak`.
//!
//! The write goes to a temporary file in the same directory which is then
//! renamed over the catalog, so readers see either the old or the new
//! catalog and never a partial one.

use crate::distro::DistributionRecord;
use crate::error::{Error, Result};
use crate::settings::backup_path_for;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Mode for a catalog created from scratch; the web server must read it
#[cfg(unix)]
const NEW_CATALOG_MODE: u32 = 0o644;

/// What an upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Replaced,
    Appended,
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// Backup of the previous catalog, when one was made
    pub backup: Option<PathBuf>,
}

/// The distro catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
    records: Vec<DistributionRecord>,
    /// A non-empty catalog file was found at load time
    existed: bool,
}

impl Catalog {
    /// An empty catalog that will be written to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            existed: false,
        }
    }

    /// Load the catalog at `path`
    ///
    /// A missing or zero-length file is an empty catalog. Anything else that is not a
    /// JSON array of distro records is a [`Error::CatalogParse`].
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No catalog at {}, starting empty", path.display());
                return Ok(Self::empty(path));
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(Error::CatalogParse {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                return Err(Error::IoError(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        if content.is_empty() {
            debug!("Catalog {} is empty", path.display());
            return Ok(Self::empty(path));
        }

        let records: Vec<DistributionRecord> =
            serde_json::from_str(&content).map_err(|e| Error::CatalogParse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        info!("Loaded {} distros from {}", records.len(), path.display());
        Ok(Self {
            path,
            records,
            existed: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[DistributionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a non-empty catalog file was found at load time
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// Find a distro by name
    pub fn find(&self, name: &str) -> Option<&DistributionRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Find a distro other than `except_name` with the same vendor and version
    pub fn find_release(
        &self,
        vendor: &str,
        version: &str,
        except_name: &str,
    ) -> Option<&DistributionRecord> {
        self.records
            .iter()
            .find(|r| r.name != except_name && r.same_release(vendor, version))
    }

    /// Replace the record with the same name in place, or append it
    pub fn upsert(&mut self, record: DistributionRecord) -> Upsert {
        match self.records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => {
                debug!("Replacing distro {}", record.name);
                *existing = record;
                Upsert::Replaced
            }
            None => {
                debug!("Appending distro {}", record.name);
                self.records.push(record);
                Upsert::Appended
            }
        }
    }

    /// Pretty-printed JSON form of the catalog
    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.records).map_err(|e| {
            Error::CatalogWrite {
                path: self.path.display().to_string(),
                message: format!("Failed to serialize catalog: {e}"),
            }
        })?;
        text.push('\n');
        Ok(text)
    }

    /// Copy the on-disk catalog to `<catalog>.bak`
    ///
    /// Best effort: a failed copy is logged and reported as no backup.
    pub fn backup(&self) -> Option<PathBuf> {
        if !self.existed {
            return None;
        }
        let backup = backup_path_for(&self.path);
        match fs::copy(&self.path, &backup) {
            Ok(_) => {
                info!("Backed up {} to {}", self.path.display(), backup.display());
                Some(backup)
            }
            Err(e) => {
                warn!("Failed to back up {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Back up the previous catalog, then replace it with this one
    pub fn save(&self) -> Result<SaveReport> {
        let json = self.to_json()?;
        let backup = self.backup();

        self.write_atomic(json.as_bytes())
            .map_err(|e| Error::CatalogWrite {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        info!("Wrote {} distros to {}", self.records.len(), self.path.display());
        Ok(SaveReport { backup })
    }

    fn write_atomic(&self, data: &[u8]) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;
        self.apply_permissions(temp.path())?;

        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Keep the old catalog's permissions, or make a new one world-readable
    fn apply_permissions(&self, temp_path: &Path) -> io::Result<()> {
        match fs::metadata(&self.path) {
            Ok(meta) => fs::set_permissions(temp_path, meta.permissions()),
            #[cfg(unix)]
            Err(_) => {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(temp_path, fs::Permissions::from_mode(NEW_CATALOG_MODE))
            }
            #[cfg(not(unix))]
            Err(_) => Ok(()),
        }
    }
}
