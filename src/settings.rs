// src/settings.rs

//! Runtime configuration for a registration run

use std::path::{Path, PathBuf};

/// Default directory holding one sub-directory of tarballs per distro
pub const DEFAULT_DISTRO_ROOT: &str = "/opt/serengeti/www/distros";

/// Default catalog location
pub const DEFAULT_CATALOG_PATH: &str = "/opt/serengeti/www/distros/manifest";

/// Suffix appended to the catalog path for the pre-write copy
pub const BACKUP_SUFFIX: &str = ".bak";

/// Where the catalog and artifacts live, and how to treat confirmations
#[derive(Debug, Clone)]
pub struct Settings {
    pub catalog_path: PathBuf,
    pub distro_root: PathBuf,
    /// Answer yes to every confirmation
    pub assume_yes: bool,
    /// Verify TLS certificates when downloading artifacts
    pub verify_tls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            distro_root: PathBuf::from(DEFAULT_DISTRO_ROOT),
            assume_yes: false,
            verify_tls: true,
        }
    }
}

impl Settings {
    /// Settings rooted at `distro_root`, with the catalog at `<root>/manifest`
    pub fn rooted_at(distro_root: impl Into<PathBuf>) -> Self {
        let distro_root = distro_root.into();
        Self {
            catalog_path: distro_root.join("manifest"),
            distro_root,
            ..Self::default()
        }
    }

    /// Sibling path receiving the previous catalog before a write
    pub fn backup_path(&self) -> PathBuf {
        backup_path_for(&self.catalog_path)
    }

    /// Directory holding the tarballs of one distro
    pub fn distro_dir(&self, name: &str) -> PathBuf {
        self.distro_root.join(name)
    }
}

/// `<path>.bak`
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(BACKUP_SUFFIX);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.catalog_path, Path::new(DEFAULT_CATALOG_PATH));
        assert_eq!(
            settings.backup_path(),
            Path::new("/opt/serengeti/www/distros/manifest.bak")
        );
        assert!(!settings.assume_yes);
        assert!(settings.verify_tls);
    }

    #[test]
    fn test_rooted_at() {
        let settings = Settings::rooted_at("/srv/distros");
        assert_eq!(settings.catalog_path, Path::new("/srv/distros/manifest"));
        assert_eq!(settings.distro_dir("cdh5"), Path::new("/srv/distros/cdh5"));
    }

    #[test]
    fn test_backup_keeps_extension() {
        assert_eq!(
            backup_path_for(Path::new("/tmp/catalog.json")),
            Path::new("/tmp/catalog.json.bak")
        );
    }
}
