// src/artifact/mod.rs

//! Artifact acquisition for tarball-style distros
//!
//! Each tarball flag names one artifact kind. Artifacts are downloaded into
//! `<distro_root>/<distro name>/` and recorded as tarball package entries at
//! a fixed slot per kind, so the package list always reads
//! hadoop, pig, hive, hbase, zookeeper regardless of flag order.
//!
//! A failed artifact does not stop the others; every failure is collected
//! and reported together.

mod client;

pub use client::{Fetcher, HttpFetcher};

use crate::distro::vendor::to_owned_roles;
use crate::distro::{generic_tarball_roles, PackageEntry, Vendor};
use crate::error::Result;
use crate::prompt::Confirm;
use crate::settings::Settings;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Number of package slots a tarball distro can fill
pub const SLOT_COUNT: usize = 5;

/// The kinds of tarball a distro can reference, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// A single tarball carrying the whole distro
    Tarball,
    Hadoop,
    Pig,
    Hive,
    Hbase,
    Zookeeper,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 6] = [
        ArtifactKind::Tarball,
        ArtifactKind::Hadoop,
        ArtifactKind::Pig,
        ArtifactKind::Hive,
        ArtifactKind::Hbase,
        ArtifactKind::Zookeeper,
    ];

    /// The CLI flag naming this artifact, without dashes
    pub fn flag(&self) -> &'static str {
        match self {
            ArtifactKind::Tarball => "tarball",
            ArtifactKind::Hadoop => "hadoop",
            ArtifactKind::Pig => "pig",
            ArtifactKind::Hive => "hive",
            ArtifactKind::Hbase => "hbase",
            ArtifactKind::Zookeeper => "zookeeper",
        }
    }

    /// Index in the package list. The generic tarball and hadoop share 0.
    pub fn slot(&self) -> usize {
        match self {
            ArtifactKind::Tarball | ArtifactKind::Hadoop => 0,
            ArtifactKind::Pig => 1,
            ArtifactKind::Hive => 2,
            ArtifactKind::Hbase => 3,
            ArtifactKind::Zookeeper => 4,
        }
    }

    /// Roles deployed from this artifact; `None` for the generic tarball,
    /// whose roles come from the operator or the vendor
    pub fn fixed_roles(&self) -> Option<&'static [&'static str]> {
        match self {
            ArtifactKind::Tarball => None,
            ArtifactKind::Hadoop => Some(&[
                "hadoop_namenode",
                "hadoop_jobtracker",
                "hadoop_tasktracker",
                "hadoop_datanode",
                "hadoop_client",
            ]),
            ArtifactKind::Pig => Some(&["pig"]),
            ArtifactKind::Hive => Some(&["hive", "hive_server"]),
            ArtifactKind::Hbase => Some(&["hbase_master", "hbase_regionserver", "hbase_client"]),
            ArtifactKind::Zookeeper => Some(&["zookeeper"]),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag())
    }
}

/// A tarball the operator asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    pub kind: ArtifactKind,
    pub url: String,
}

impl ArtifactRequest {
    pub fn new(kind: ArtifactKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
        }
    }
}

/// Outcome of acquiring every requested artifact
#[derive(Debug, Default)]
pub struct Acquisition {
    /// Filled slots in slot order
    pub packages: Vec<PackageEntry>,
    /// One message per failed artifact
    pub errors: Vec<String>,
}

impl Acquisition {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Last non-empty path segment of `url`, ignoring query and fragment
pub fn file_name_from_url(url: &str) -> Option<String> {
    let from_path = |path: &str| {
        path.rsplit('/')
            .find(|segment| !segment.is_empty())
            .map(str::to_string)
    };

    match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_string)),
        Err(_) => from_path(url.split(['?', '#']).next().unwrap_or(url)),
    }
}

/// Downloads a distro's tarballs
pub struct Acquirer<'a> {
    settings: &'a Settings,
    fetcher: &'a dyn Fetcher,
}

impl<'a> Acquirer<'a> {
    pub fn new(settings: &'a Settings, fetcher: &'a dyn Fetcher) -> Self {
        Self { settings, fetcher }
    }

    /// Acquire every requested artifact for distro `name`
    ///
    /// An existing file is overwritten only after `confirm` agrees; if it
    /// declines, the existing file is kept and still recorded.
    pub fn acquire(
        &self,
        name: &str,
        vendor: Option<Vendor>,
        explicit_roles: Option<&[String]>,
        requests: &[ArtifactRequest],
        confirm: &mut dyn Confirm,
    ) -> Result<Acquisition> {
        let mut acquisition = Acquisition::default();
        let dir = self.settings.distro_dir(name);

        if !dir.exists() {
            info!("Creating distro directory {}", dir.display());
            if let Err(e) = fs::create_dir_all(&dir) {
                acquisition
                    .errors
                    .push(format!("Can not create the folder {}: {e}", dir.display()));
                return Ok(acquisition);
            }
        }

        let mut slots: [Option<PackageEntry>; SLOT_COUNT] = Default::default();

        for request in requests {
            let Some(file_name) = file_name_from_url(&request.url) else {
                acquisition.errors.push(format!(
                    "Can not determine the tarball file name of {}.",
                    request.url
                ));
                continue;
            };

            let dest = dir.join(&file_name);
            if self.obtain(&request.url, &dest, &file_name, confirm, &mut acquisition.errors)? {
                let roles = match request.kind.fixed_roles() {
                    Some(roles) => to_owned_roles(roles.iter().copied()),
                    None => generic_tarball_roles(vendor, explicit_roles),
                };
                slots[request.kind.slot()] =
                    Some(PackageEntry::tarball(format!("{name}/{file_name}"), roles));
            }
        }

        acquisition.packages = slots.into_iter().flatten().collect();
        Ok(acquisition)
    }

    /// Make `dest` hold the artifact; false when it could not be downloaded
    fn obtain(
        &self,
        url: &str,
        dest: &Path,
        file_name: &str,
        confirm: &mut dyn Confirm,
        errors: &mut Vec<String>,
    ) -> Result<bool> {
        if dest.exists() {
            confirm.notice(&format!("Warning: The file {} already exists.", dest.display()));
            if !confirm.confirm("Do you want to overwrite it ? [Y/N]:")? {
                info!("Keeping existing {}", dest.display());
                return Ok(true);
            }
        }

        match self.download(url, dest) {
            Ok(()) => Ok(true),
            Err(reason) => {
                warn!("Download of {} failed: {}", url, reason);
                let _ = fs::remove_file(dest);
                errors.push(format!("Failed to download the tarball {file_name}: {reason}"));
                Ok(false)
            }
        }
    }

    fn download(&self, url: &str, dest: &Path) -> std::result::Result<(), String> {
        let written = self.fetcher.fetch(url, dest).map_err(|e| e.to_string())?;
        let on_disk = fs::metadata(dest).map(|m| m.len()).unwrap_or(0);
        if written == 0 || on_disk == 0 {
            return Err("the downloaded file is empty".to_string());
        }
        info!("Fetched {} ({} bytes)", dest.display(), on_disk);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::prompt::{AssumeYes, ScriptedAnswers};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Serves canned bodies; unknown URLs fail
    #[derive(Default)]
    struct FakeFetcher {
        bodies: HashMap<String, Vec<u8>>,
        fetched: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn serve(mut self, url: &str, body: &[u8]) -> Self {
            self.bodies.insert(url.to_string(), body.to_vec());
            self
        }
    }

    impl Fetcher for FakeFetcher {
        fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
            self.fetched.borrow_mut().push(url.to_string());
            let body = self
                .bodies
                .get(url)
                .ok_or_else(|| Error::DownloadError(format!("HTTP 404 Not Found from {url}")))?;
            fs::write(dest, body)?;
            Ok(body.len() as u64)
        }
    }

    const HADOOP: &str = "http://mirror.example/hadoop/hadoop-1.2.1.tar.gz";
    const PIG: &str = "http://mirror.example/pig/pig-0.11.1.tar.gz";
    const HIVE: &str = "http://mirror.example/hive/hive-0.11.0.tar.gz";
    const ZK: &str = "http://mirror.example/zk/zookeeper-3.4.5.tar.gz";

    fn requests() -> Vec<ArtifactRequest> {
        vec![
            ArtifactRequest::new(ArtifactKind::Hadoop, HADOOP),
            ArtifactRequest::new(ArtifactKind::Pig, PIG),
            ArtifactRequest::new(ArtifactKind::Hive, HIVE),
        ]
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(file_name_from_url(HADOOP).unwrap(), "hadoop-1.2.1.tar.gz");
        assert_eq!(
            file_name_from_url("https://h.example/dist/k8s.tgz?sig=abc#top").unwrap(),
            "k8s.tgz"
        );
        assert_eq!(file_name_from_url("https://h.example/dist/").unwrap(), "dist");
        assert_eq!(file_name_from_url("mirror/pig.tgz").unwrap(), "pig.tgz");
        assert!(file_name_from_url("https://h.example/").is_none());
    }

    #[test]
    fn test_slots() {
        assert_eq!(ArtifactKind::Tarball.slot(), ArtifactKind::Hadoop.slot());
        let slots: Vec<_> = ArtifactKind::ALL[1..].iter().map(|k| k.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_acquire_in_slot_order() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::rooted_at(dir.path());
        let fetcher = FakeFetcher::default()
            .serve(HADOOP, b"hadoop")
            .serve(PIG, b"pig")
            .serve(HIVE, b"hive")
            .serve(ZK, b"zk");

        let mut reqs = requests();
        reqs.insert(0, ArtifactRequest::new(ArtifactKind::Zookeeper, ZK));

        let acquisition = Acquirer::new(&settings, &fetcher)
            .acquire("apache", Some(Vendor::Apache), None, &reqs, &mut AssumeYes)
            .unwrap();

        assert!(acquisition.is_ok());
        let tarballs: Vec<_> = acquisition
            .packages
            .iter()
            .map(|p| match p {
                PackageEntry::Tarball { tarball, .. } => tarball.as_str(),
                _ => panic!("expected tarball entry"),
            })
            .collect();
        assert_eq!(
            tarballs,
            vec![
                "apache/hadoop-1.2.1.tar.gz",
                "apache/pig-0.11.1.tar.gz",
                "apache/hive-0.11.0.tar.gz",
                "apache/zookeeper-3.4.5.tar.gz",
            ]
        );
        assert_eq!(acquisition.packages[2].roles(), &["hive", "hive_server"]);
        assert!(dir.path().join("apache/pig-0.11.1.tar.gz").exists());
    }

    #[test]
    fn test_failure_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::rooted_at(dir.path());
        let fetcher = FakeFetcher::default()
            .serve(HADOOP, b"hadoop")
            .serve(PIG, b"")
            .serve(HIVE, b"hive");
        let reqs = vec![
            ArtifactRequest::new(ArtifactKind::Pig, PIG),
            ArtifactRequest::new(ArtifactKind::Zookeeper, ZK),
            ArtifactRequest::new(ArtifactKind::Hadoop, HADOOP),
            ArtifactRequest::new(ArtifactKind::Hive, HIVE),
        ];

        let acquisition = Acquirer::new(&settings, &fetcher)
            .acquire("apache", Some(Vendor::Apache), None, &reqs, &mut AssumeYes)
            .unwrap();

        assert_eq!(acquisition.errors.len(), 2);
        assert!(
            acquisition.errors[0].starts_with("Failed to download the tarball pig-0.11.1.tar.gz")
        );
        assert!(
            acquisition.errors[1]
                .starts_with("Failed to download the tarball zookeeper-3.4.5.tar.gz")
        );
        assert_eq!(fetcher.fetched.borrow().len(), 4);
        assert!(!dir.path().join("apache/pig-0.11.1.tar.gz").exists());
        assert!(dir.path().join("apache/hive-0.11.0.tar.gz").exists());
    }

    #[test]
    fn test_existing_file_kept_on_no() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::rooted_at(dir.path());
        let distro_dir = dir.path().join("apache");
        fs::create_dir_all(&distro_dir).unwrap();
        fs::write(distro_dir.join("hadoop-1.2.1.tar.gz"), b"old").unwrap();

        let fetcher = FakeFetcher::default()
            .serve(HADOOP, b"new")
            .serve(PIG, b"pig")
            .serve(HIVE, b"hive");
        let mut answers = ScriptedAnswers::new([false]);

        let acquisition = Acquirer::new(&settings, &fetcher)
            .acquire("apache", Some(Vendor::Apache), None, &requests(), &mut answers)
            .unwrap();

        assert!(acquisition.is_ok());
        assert_eq!(acquisition.packages.len(), 3);
        assert_eq!(fs::read(distro_dir.join("hadoop-1.2.1.tar.gz")).unwrap(), b"old");
        assert!(!fetcher.fetched.borrow().contains(&HADOOP.to_string()));
        assert_eq!(answers.asked, vec!["Do you want to overwrite it ? [Y/N]:"]);
        assert!(answers.notices[0].contains("already exists"));
    }

    #[test]
    fn test_existing_file_replaced_on_yes() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::rooted_at(dir.path());
        let distro_dir = dir.path().join("apache");
        fs::create_dir_all(&distro_dir).unwrap();
        fs::write(distro_dir.join("hadoop-1.2.1.tar.gz"), b"old").unwrap();

        let fetcher = FakeFetcher::default()
            .serve(HADOOP, b"new")
            .serve(PIG, b"pig")
            .serve(HIVE, b"hive");
        let mut answers = ScriptedAnswers::new([true]);

        Acquirer::new(&settings, &fetcher)
            .acquire("apache", Some(Vendor::Apache), None, &requests(), &mut answers)
            .unwrap();

        assert_eq!(fs::read(distro_dir.join("hadoop-1.2.1.tar.gz")).unwrap(), b"new");
    }

    #[test]
    fn test_generic_tarball_roles() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::rooted_at(dir.path());
        let url = "https://dl.example/kubernetes/kubernetes.tar.gz";
        let fetcher = FakeFetcher::default().serve(url, b"k8s");
        let reqs = vec![ArtifactRequest::new(ArtifactKind::Tarball, url)];

        let k8s = Acquirer::new(&settings, &fetcher)
            .acquire("k8s", Some(Vendor::Kubernetes), None, &reqs, &mut AssumeYes)
            .unwrap();
        assert_eq!(
            k8s.packages,
            vec![PackageEntry::tarball(
                "k8s/kubernetes.tar.gz",
                vec![
                    "kubernetes_workstation".to_string(),
                    "kubernetes_master".to_string(),
                    "kubernetes_minion".to_string()
                ]
            )]
        );

        let custom = vec!["custom".to_string()];
        let gphd = Acquirer::new(&settings, &fetcher)
            .acquire("gphd", Some(Vendor::Gphd), Some(custom.as_slice()), &reqs, &mut AssumeYes)
            .unwrap();
        assert_eq!(gphd.packages[0].roles(), &custom[..]);
    }

    #[test]
    fn test_hadoop_replaces_generic_tarball() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::rooted_at(dir.path());
        let tar = "https://dl.example/all.tgz";
        let fetcher = FakeFetcher::default().serve(tar, b"all").serve(HADOOP, b"h");
        let reqs = vec![
            ArtifactRequest::new(ArtifactKind::Tarball, tar),
            ArtifactRequest::new(ArtifactKind::Hadoop, HADOOP),
        ];

        let acquisition = Acquirer::new(&settings, &fetcher)
            .acquire("x", Some(Vendor::Apache), None, &reqs, &mut AssumeYes)
            .unwrap();
        assert_eq!(acquisition.packages.len(), 1);
        assert_eq!(acquisition.packages[0].roles()[0], "hadoop_namenode");
    }
}
