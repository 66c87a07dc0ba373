// src/distro/vendor.rs

//! Vendor rule table
//!
//! Each recognized vendor is described by a [`VendorRule`]: how its packages
//! are installed, which roles a repository-backed distro supports, and
//! whether HVE is on by default. Adding a vendor means adding a row to
//! [`RULES`]; the derivation functions never match on vendor names.

use super::version::DistroVersion;
use super::PackageEntry;
use std::fmt;
use std::str::FromStr;

pub const HADOOP1_ROLES: &[&str] = &[
    "hadoop_namenode",
    "hadoop_datanode",
    "hadoop_jobtracker",
    "hadoop_tasktracker",
    "hadoop_client",
    "hive",
    "hive_server",
    "pig",
    "hbase_master",
    "hbase_regionserver",
    "hbase_client",
    "zookeeper",
];

pub const YARN_ROLES: &[&str] = &[
    "hadoop_namenode",
    "hadoop_datanode",
    "hadoop_resourcemanager",
    "hadoop_nodemanager",
    "hadoop_journalnode",
    "hadoop_client",
    "hive",
    "hive_server",
    "pig",
    "hbase_master",
    "hbase_regionserver",
    "hbase_client",
    "zookeeper",
];

const CDH_ROLES: &[&str] = &[
    "hadoop_namenode",
    "hadoop_datanode",
    "hadoop_jobtracker",
    "hadoop_tasktracker",
    "hadoop_resourcemanager",
    "hadoop_nodemanager",
    "hadoop_journalnode",
    "hadoop_client",
    "hive",
    "hive_server",
    "pig",
    "hbase_master",
    "hbase_regionserver",
    "hbase_client",
    "zookeeper",
];

const MAPR_ROLES: &[&str] = &[
    "mapr_zookeeper",
    "mapr_cldb",
    "mapr_jobtracker",
    "mapr_tasktracker",
    "mapr_fileserver",
    "mapr_nfs",
    "mapr_webserver",
    "mapr_metrics",
    "mapr_client",
    "mapr_pig",
    "mapr_hive",
    "mapr_hive_server",
    "mapr_mysql_server",
    "mapr_hbase_master",
    "mapr_hbase_regionserver",
    "mapr_hbase_client",
];

const MAPR_YARN_ROLES: &[&str] = &[
    "mapr_resourcemanager",
    "mapr_historyserver",
    "mapr_nodemanager",
];

const MESOS_ROLES: &[&str] = &[
    "zookeeper",
    "mesos_master",
    "mesos_slave",
    "mesos_docker",
    "mesos_chronos",
    "mesos_marathon",
];

const KUBERNETES_TARBALL_ROLES: &[&str] =
    &["kubernetes_workstation", "kubernetes_master", "kubernetes_minion"];

/// Recognized distro vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    Generic,
    Mesos,
    Mapr,
    Phd,
    Bigtop,
    Cdh,
    Apache,
    Gphd,
    Hdp,
    Kubernetes,
}

impl Vendor {
    /// All vendors, repository-style first
    pub const ALL: [Vendor; 10] = [
        Vendor::Generic,
        Vendor::Mesos,
        Vendor::Mapr,
        Vendor::Phd,
        Vendor::Bigtop,
        Vendor::Cdh,
        Vendor::Apache,
        Vendor::Gphd,
        Vendor::Hdp,
        Vendor::Kubernetes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Generic => "GENERIC",
            Vendor::Mesos => "MESOS",
            Vendor::Mapr => "MAPR",
            Vendor::Phd => "PHD",
            Vendor::Bigtop => "BIGTOP",
            Vendor::Cdh => "CDH",
            Vendor::Apache => "APACHE",
            Vendor::Gphd => "GPHD",
            Vendor::Hdp => "HDP",
            Vendor::Kubernetes => "KUBERNETES",
        }
    }

    /// Human-readable product name
    pub fn description(&self) -> &'static str {
        match self {
            Vendor::Generic => "User Customized Distro",
            Vendor::Mesos => "Apache Mesos",
            Vendor::Mapr => "MapR",
            Vendor::Phd => "Pivotal HD",
            Vendor::Bigtop => "Apache Bigtop",
            Vendor::Cdh => "Cloudera Hadoop",
            Vendor::Apache => "Apache Hadoop",
            Vendor::Gphd => "GreenPlum HD",
            Vendor::Hdp => "Hortonworks Data Platform",
            Vendor::Kubernetes => "Kubernetes",
        }
    }

    /// This vendor's row in the rule table
    pub fn rule(&self) -> &'static VendorRule {
        RULES
            .iter()
            .find(|rule| rule.vendor == *self)
            .unwrap_or(&FALLBACK_RULE)
    }

    /// Vendors whose nominal install mode is from package repositories
    pub fn repo_style() -> impl Iterator<Item = Vendor> {
        Self::ALL
            .into_iter()
            .filter(|v| matches!(v.rule().install, InstallMode::Repos))
    }

    /// Vendors whose nominal install mode is from downloaded tarballs
    pub fn tarball_style() -> impl Iterator<Item = Vendor> {
        Self::ALL
            .into_iter()
            .filter(|v| !matches!(v.rule().install, InstallMode::Repos))
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == upper)
            .ok_or_else(|| format!("Unknown vendor: {s}"))
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a vendor's packages reach the nodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstallMode {
    /// Always from package repositories
    Repos,
    /// Always from downloaded tarballs
    Tarballs,
    /// Tarballs below the threshold version, repositories at or above it
    ReposFrom(f64),
}

/// Role list for a repository-backed package entry
#[derive(Debug, Clone, Copy)]
pub enum RoleRule {
    /// No roles known; the operator is expected to pass `--roles`
    Empty,
    /// The same roles for every version
    Fixed(&'static [&'static str]),
    /// `base`, plus `extra` at or above `threshold`
    Extended {
        base: &'static [&'static str],
        threshold: f64,
        extra: &'static [&'static str],
    },
    /// `below` under `threshold`, `from` at or above it
    Split {
        threshold: f64,
        below: &'static [&'static str],
        from: &'static [&'static str],
    },
}

impl RoleRule {
    /// Resolve the role list for a concrete version
    pub fn roles_for(&self, version: &DistroVersion) -> Vec<String> {
        let lists: Vec<&[&str]> = match *self {
            RoleRule::Empty => vec![],
            RoleRule::Fixed(roles) => vec![roles],
            RoleRule::Extended {
                base,
                threshold,
                extra,
            } => {
                if version.at_least(threshold) {
                    vec![base, extra]
                } else {
                    vec![base]
                }
            }
            RoleRule::Split {
                threshold,
                below,
                from,
            } => {
                if version.at_least(threshold) {
                    vec![from]
                } else {
                    vec![below]
                }
            }
        };
        to_owned_roles(lists.into_iter().flatten().copied())
    }
}

/// Default HVE support
#[derive(Debug, Clone, Copy)]
pub enum HveRule {
    Never,
    Always,
    From(f64),
}

/// One row of the vendor table
#[derive(Debug)]
pub struct VendorRule {
    pub vendor: Vendor,
    pub install: InstallMode,
    pub roles: RoleRule,
    pub hve: HveRule,
    /// Roles for a generic `--tarball` entry when `--roles` is not given
    pub default_tarball_roles: Option<&'static [&'static str]>,
}

const fn row(vendor: Vendor, install: InstallMode, roles: RoleRule, hve: HveRule) -> VendorRule {
    VendorRule {
        vendor,
        install,
        roles,
        hve,
        default_tarball_roles: None,
    }
}

pub static RULES: [VendorRule; 10] = [
    row(Vendor::Generic, InstallMode::Repos, RoleRule::Empty, HveRule::Never),
    row(Vendor::Mesos, InstallMode::Repos, RoleRule::Fixed(MESOS_ROLES), HveRule::Never),
    row(
        Vendor::Mapr,
        InstallMode::Repos,
        RoleRule::Extended {
            base: MAPR_ROLES,
            threshold: 4.0,
            extra: MAPR_YARN_ROLES,
        },
        HveRule::Never,
    ),
    row(Vendor::Phd, InstallMode::Repos, RoleRule::Fixed(YARN_ROLES), HveRule::Always),
    row(
        Vendor::Bigtop,
        InstallMode::Repos,
        RoleRule::Split {
            threshold: 0.4,
            below: HADOOP1_ROLES,
            from: YARN_ROLES,
        },
        HveRule::Never,
    ),
    row(Vendor::Cdh, InstallMode::Repos, RoleRule::Fixed(CDH_ROLES), HveRule::Never),
    row(Vendor::Apache, InstallMode::Tarballs, RoleRule::Empty, HveRule::From(1.2)),
    row(Vendor::Gphd, InstallMode::Tarballs, RoleRule::Empty, HveRule::Never),
    row(
        Vendor::Hdp,
        InstallMode::ReposFrom(2.0),
        RoleRule::Split {
            threshold: 2.0,
            below: HADOOP1_ROLES,
            from: YARN_ROLES,
        },
        HveRule::Never,
    ),
    VendorRule {
        vendor: Vendor::Kubernetes,
        install: InstallMode::Tarballs,
        roles: RoleRule::Empty,
        hve: HveRule::Never,
        default_tarball_roles: Some(KUBERNETES_TARBALL_ROLES),
    },
];

static FALLBACK_RULE: VendorRule =
    row(Vendor::Generic, InstallMode::Repos, RoleRule::Empty, HveRule::Never);

/// Whether a distro of this vendor and version must be given `--repos`
///
/// Unrecognized vendors are treated as tarball-style so the remaining
/// checks still run.
pub fn should_have_repos(vendor: Option<Vendor>, version: &DistroVersion) -> bool {
    let Some(vendor) = vendor else {
        return false;
    };
    match vendor.rule().install {
        InstallMode::Repos => true,
        InstallMode::Tarballs => false,
        InstallMode::ReposFrom(threshold) => version.at_least(threshold),
    }
}

/// HVE support when the operator did not say
pub fn default_hve_supported(vendor: Vendor, version: &DistroVersion) -> bool {
    match vendor.rule().hve {
        HveRule::Never => false,
        HveRule::Always => true,
        HveRule::From(threshold) => version.at_least(threshold),
    }
}

/// Build the single repository-backed package entry for a distro
///
/// `explicit_roles`, when given, replaces the derived list entirely.
pub fn derive_repo_package(
    vendor: Vendor,
    version: &DistroVersion,
    repos: &[String],
    explicit_roles: Option<&[String]>,
) -> PackageEntry {
    let roles = match explicit_roles {
        Some(roles) => roles.to_vec(),
        None => vendor.rule().roles.roles_for(version),
    };
    PackageEntry::Repos {
        package_repos: repos.to_vec(),
        roles,
    }
}

/// Roles for a generic `--tarball` entry
pub fn generic_tarball_roles(
    vendor: Option<Vendor>,
    explicit_roles: Option<&[String]>,
) -> Vec<String> {
    if let Some(roles) = explicit_roles {
        return roles.to_vec();
    }
    vendor
        .and_then(|v| v.rule().default_tarball_roles)
        .map(|roles| to_owned_roles(roles.iter().copied()))
        .unwrap_or_default()
}

pub(crate) fn to_owned_roles<'a>(roles: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    roles.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(vendor: Vendor, version: &str) -> Vec<String> {
        let repos = vec!["http://repo.example/x".to_string()];
        derive_repo_package(vendor, &DistroVersion::parse(version), &repos, None)
            .roles()
            .to_vec()
    }

    #[test]
    fn test_every_vendor_has_a_rule() {
        for vendor in Vendor::ALL {
            assert_eq!(vendor.rule().vendor, vendor);
        }
    }

    #[test]
    fn test_vendor_parse() {
        assert_eq!("cdh".parse::<Vendor>().unwrap(), Vendor::Cdh);
        assert_eq!("KUBERNETES".parse::<Vendor>().unwrap(), Vendor::Kubernetes);
        assert!("FOO".parse::<Vendor>().is_err());
    }

    #[test]
    fn test_vendor_subsets() {
        let repo: Vec<_> = Vendor::repo_style().collect();
        assert_eq!(
            repo,
            vec![
                Vendor::Generic,
                Vendor::Mesos,
                Vendor::Mapr,
                Vendor::Phd,
                Vendor::Bigtop,
                Vendor::Cdh
            ]
        );
        let tars: Vec<_> = Vendor::tarball_style().collect();
        assert_eq!(
            tars,
            vec![Vendor::Apache, Vendor::Gphd, Vendor::Hdp, Vendor::Kubernetes]
        );
    }

    #[test]
    fn test_cdh_ignores_version() {
        assert_eq!(roles(Vendor::Cdh, "4.0"), roles(Vendor::Cdh, "5.3"));
        assert_eq!(roles(Vendor::Cdh, "cdh5").len(), 15);
        assert!(roles(Vendor::Cdh, "5").contains(&"hadoop_journalnode".to_string()));
    }

    #[test]
    fn test_mapr_threshold() {
        let old = roles(Vendor::Mapr, "3.9");
        let new = roles(Vendor::Mapr, "4.0");
        assert!(!old.contains(&"mapr_resourcemanager".to_string()));
        assert!(new.contains(&"mapr_resourcemanager".to_string()));
        assert!(new.contains(&"mapr_historyserver".to_string()));
        assert!(new.contains(&"mapr_nodemanager".to_string()));
        assert_eq!(new.len(), old.len() + 3);
        assert_eq!(&new[..old.len()], &old[..]);
    }

    #[test]
    fn test_bigtop_threshold() {
        assert_eq!(roles(Vendor::Bigtop, "0.39"), to_owned_roles(HADOOP1_ROLES.iter().copied()));
        assert_eq!(roles(Vendor::Bigtop, "0.4"), to_owned_roles(YARN_ROLES.iter().copied()));
    }

    #[test]
    fn test_hdp_and_phd() {
        assert_eq!(roles(Vendor::Hdp, "1.3"), to_owned_roles(HADOOP1_ROLES.iter().copied()));
        assert_eq!(roles(Vendor::Hdp, "2.1"), to_owned_roles(YARN_ROLES.iter().copied()));
        assert_eq!(roles(Vendor::Phd, "1.0"), to_owned_roles(YARN_ROLES.iter().copied()));
    }

    #[test]
    fn test_generic_is_empty() {
        assert!(roles(Vendor::Generic, "1.0").is_empty());
    }

    #[test]
    fn test_explicit_roles_override() {
        let explicit = vec!["custom_role".to_string()];
        let repos = vec!["https://repo.example/cdh".to_string()];
        for vendor in Vendor::repo_style() {
            let entry = derive_repo_package(
                vendor,
                &DistroVersion::parse("4.0"),
                &repos,
                Some(explicit.as_slice()),
            );
            assert_eq!(entry.roles(), &explicit[..]);
            assert_eq!(
                entry,
                PackageEntry::Repos {
                    package_repos: repos.clone(),
                    roles: explicit.clone(),
                }
            );
        }
    }

    #[test]
    fn test_should_have_repos() {
        let v1 = DistroVersion::parse("1.3");
        let v2 = DistroVersion::parse("2.0");
        assert!(should_have_repos(Some(Vendor::Cdh), &v1));
        assert!(!should_have_repos(Some(Vendor::Apache), &v2));
        assert!(!should_have_repos(Some(Vendor::Hdp), &v1));
        assert!(should_have_repos(Some(Vendor::Hdp), &v2));
        assert!(!should_have_repos(None, &v2));
    }

    #[test]
    fn test_default_hve() {
        assert!(default_hve_supported(Vendor::Apache, &DistroVersion::parse("1.2")));
        assert!(!default_hve_supported(Vendor::Apache, &DistroVersion::parse("1.1")));
        assert!(default_hve_supported(Vendor::Phd, &DistroVersion::parse("0.1")));
        assert!(!default_hve_supported(Vendor::Cdh, &DistroVersion::parse("5.0")));
    }

    #[test]
    fn test_generic_tarball_roles() {
        assert_eq!(
            generic_tarball_roles(Some(Vendor::Kubernetes), None),
            vec!["kubernetes_workstation", "kubernetes_master", "kubernetes_minion"]
        );
        assert!(generic_tarball_roles(Some(Vendor::Apache), None).is_empty());
        let explicit = vec!["etcd".to_string()];
        assert_eq!(
            generic_tarball_roles(Some(Vendor::Kubernetes), Some(explicit.as_slice())),
            explicit
        );
    }
}
