// src/cli/mod.rs
//! CLI definition for config-distro
//!
//! Every operator field is optional here so that the validator can report
//! all missing options at once. `--version` is the distro's version; the
//! tool has no version flag.

use clap::Parser;
use distro_config::settings::{DEFAULT_CATALOG_PATH, DEFAULT_DISTRO_ROOT};
use distro_config::{RegistrationRequest, Settings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "config-distro")]
#[command(author = "Distro Config Contributors")]
#[command(about = "Add or update a distro in the provisioning catalog", long_about = None)]
pub struct Cli {
    /// Distro name.
    #[arg(short = 'n', long, value_name = "DISTRO_NAME")]
    pub name: Option<String>,

    /// Valid distro vendor name.
    #[arg(short = 'd', long, value_name = "DISTRO_VENDOR")]
    pub vendor: Option<String>,

    /// Release version of the hadoop distro.
    #[arg(short = 'v', long, value_name = "DISTRO_VERSION")]
    pub version: Option<String>,

    /// Hadoop tarball url.
    #[arg(short = 'a', long, value_name = "TARBALL_URL")]
    pub hadoop: Option<String>,

    /// Pig tarball url.
    #[arg(short = 'p', long, value_name = "TARBALL_URL")]
    pub pig: Option<String>,

    /// Hive tarball url.
    #[arg(short = 'i', long, value_name = "TARBALL_URL")]
    pub hive: Option<String>,

    /// Hbase tarball url.
    #[arg(short = 'b', long, value_name = "TARBALL_URL")]
    pub hbase: Option<String>,

    /// Zookeeper tarball url.
    #[arg(short = 'z', long, value_name = "TARBALL_URL")]
    pub zookeeper: Option<String>,

    /// The tarball url.
    #[arg(short = 't', long, value_name = "TARBALL_URL")]
    pub tarball: Option<String>,

    /// Is HVE supported? Apache Hadoop 1.2+ and Pivotal HD support HVE.
    #[arg(short = 'e', long = "hve", value_name = "HVE_SUPPORTED")]
    pub hve: Option<String>,

    /// Package repos url, comma separated.
    #[arg(short = 'r', long, value_name = "REPOS", value_delimiter = ',')]
    pub repos: Option<Vec<String>>,

    /// Roles supported by this distro, comma separated.
    #[arg(short = 'o', long, value_name = "ROLES", value_delimiter = ',')]
    pub roles: Option<Vec<String>>,

    /// Answer yes for all confirmation.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Path to the distro catalog.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CATALOG_PATH)]
    pub manifest: PathBuf,

    /// Directory receiving downloaded tarballs, one sub-directory per distro.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DISTRO_ROOT)]
    pub distro_root: PathBuf,

    /// Do not verify TLS certificates when downloading tarballs.
    #[arg(long)]
    pub no_check_certificate: bool,
}

impl Cli {
    /// Operator fields as a registration request
    pub fn request(&self) -> RegistrationRequest {
        RegistrationRequest {
            name: self.name.clone(),
            vendor: self.vendor.clone(),
            version: self.version.clone(),
            hadoop: self.hadoop.clone(),
            pig: self.pig.clone(),
            hive: self.hive.clone(),
            hbase: self.hbase.clone(),
            zookeeper: self.zookeeper.clone(),
            tarball: self.tarball.clone(),
            hve: self.hve.clone(),
            repos: self.repos.clone(),
            roles: self.roles.clone(),
        }
    }

    /// Run configuration
    pub fn settings(&self) -> Settings {
        Settings {
            catalog_path: self.manifest.clone(),
            distro_root: self.distro_root.clone(),
            assume_yes: self.yes,
            verify_tls: !self.no_check_certificate,
        }
    }
}
