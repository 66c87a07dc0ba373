// src/distro/mod.rs

//! Distribution records
//!
//! A [`DistributionRecord`] is one entry of the catalog: a named vendor
//! stack variant together with where its packages come from and which
//! roles it can deploy.
//!
//! # Example catalog entry
//!
//! ```json
//! {
//!   "name": "cdh5",
//!   "vendor": "CDH",
//!   "version": "5.3",
//!   "packages": [
//!     {
//!       "package_repos": ["http://repo.example/cdh5.repo"],
//!       "roles": ["hadoop_namenode", "hadoop_datanode"]
//!     }
//!   ]
//! }
//! ```

pub mod vendor;
pub mod version;

pub use vendor::{
    default_hve_supported, derive_repo_package, generic_tarball_roles, should_have_repos,
    InstallMode, RoleRule, Vendor, VendorRule,
};
pub use version::DistroVersion;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One registered distro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub name: String,
    pub vendor: String,
    pub version: String,
    /// Left out unless set explicitly or supported by default
    #[serde(rename = "hveSupported", default, skip_serializing_if = "Option::is_none")]
    pub hve_supported: Option<bool>,
    #[serde(default)]
    pub packages: Vec<PackageEntry>,
    /// Keys this tool does not know about, kept as found
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DistributionRecord {
    /// Create a record with no packages yet
    pub fn new(name: &str, vendor: Vendor, version: &str, hve_supported: Option<bool>) -> Self {
        Self {
            name: name.to_string(),
            vendor: vendor.as_str().to_string(),
            version: version.to_string(),
            hve_supported,
            packages: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Whether this record is for the given vendor and version
    pub fn same_release(&self, vendor: &str, version: &str) -> bool {
        self.vendor == vendor && self.version == version
    }

    /// All roles across every package entry, in order
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.packages
            .iter()
            .flat_map(|p| p.roles().iter().map(String::as_str))
    }
}

/// Where one group of a distro's packages comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageEntry {
    /// Installed from package repositories
    Repos {
        package_repos: Vec<String>,
        #[serde(default)]
        roles: Vec<String>,
    },
    /// Installed from a tarball under the distro root
    Tarball {
        /// Path relative to the distro root, `<distro>/<file>`
        tarball: String,
        #[serde(default)]
        roles: Vec<String>,
    },
    /// Any other shape found in an existing catalog, preserved verbatim
    Other(Value),
}

impl PackageEntry {
    pub fn tarball(relative_path: impl Into<String>, roles: Vec<String>) -> Self {
        PackageEntry::Tarball {
            tarball: relative_path.into(),
            roles,
        }
    }

    pub fn roles(&self) -> &[String] {
        match self {
            PackageEntry::Repos { roles, .. } | PackageEntry::Tarball { roles, .. } => roles,
            PackageEntry::Other(_) => &[],
        }
    }
}
