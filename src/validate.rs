// src/validate.rs

//! Operator input validation
//!
//! [`validate`] is pure: it checks a [`RegistrationRequest`] and returns
//! either a [`ValidatedRequest`] or every problem found, never just the
//! first. [`confirm_conflicts`] runs afterwards against the loaded catalog
//! and asks before an existing distro is overwritten or a vendor/version
//! pair is registered twice.

use crate::artifact::{ArtifactKind, ArtifactRequest};
use crate::catalog::Catalog;
use crate::distro::{
    default_hve_supported, should_have_repos, DistributionRecord, DistroVersion, Vendor,
};
use crate::error::{Error, Result};
use crate::prompt::Confirm;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Raw operator input, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub name: Option<String>,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub hadoop: Option<String>,
    pub pig: Option<String>,
    pub hive: Option<String>,
    pub hbase: Option<String>,
    pub zookeeper: Option<String>,
    pub tarball: Option<String>,
    /// HVE support as typed; must be "true" or "false"
    pub hve: Option<String>,
    pub repos: Option<Vec<String>>,
    pub roles: Option<Vec<String>>,
}

impl RegistrationRequest {
    /// URL given for one tarball kind, ignoring blank values
    pub fn artifact_url(&self, kind: ArtifactKind) -> Option<&str> {
        let value = match kind {
            ArtifactKind::Tarball => &self.tarball,
            ArtifactKind::Hadoop => &self.hadoop,
            ArtifactKind::Pig => &self.pig,
            ArtifactKind::Hive => &self.hive,
            ArtifactKind::Hbase => &self.hbase,
            ArtifactKind::Zookeeper => &self.zookeeper,
        };
        present(value)
    }

    fn repo_urls(&self) -> Option<&[String]> {
        self.repos.as_deref().filter(|r| !r.is_empty())
    }
}

/// Every validation failure of one request, in the order found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, message: &str) -> bool {
        self.0.iter().any(|m| m == message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("\n"))
    }
}

/// Where the packages of a validated distro come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    Repos(Vec<String>),
    Tarballs(Vec<ArtifactRequest>),
}

/// A request that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub name: String,
    pub vendor: Vendor,
    pub version: DistroVersion,
    /// HVE support the operator asked for explicitly
    pub hve_supported: Option<bool>,
    /// Roles the operator asked for explicitly
    pub roles: Option<Vec<String>>,
    pub source: PackageSource,
}

impl ValidatedRequest {
    /// Explicit HVE support, or the vendor default
    pub fn hve_supported(&self) -> bool {
        self.hve_supported
            .unwrap_or_else(|| default_hve_supported(self.vendor, &self.version))
    }

    /// The `hveSupported` value to store: the explicit answer, or `true`
    /// when the vendor default says so. `None` leaves the key out.
    pub fn recorded_hve(&self) -> Option<bool> {
        self.hve_supported
            .or_else(|| default_hve_supported(self.vendor, &self.version).then_some(true))
    }

    /// The record for this request, without packages
    pub fn base_record(&self) -> DistributionRecord {
        DistributionRecord::new(
            &self.name,
            self.vendor,
            self.version.as_str(),
            self.recorded_hve(),
        )
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("static regex"))
}

fn vendor_list(vendors: impl Iterator<Item = Vendor>) -> String {
    vendors.map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
}

fn unknown_vendor_message() -> String {
    let described = Vendor::ALL
        .iter()
        .map(|v| format!("{} => {}", v.as_str(), v.description()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "The value of option --vendor must be one of these: {} ({}).",
        vendor_list(Vendor::ALL.into_iter()),
        described
    )
}

fn missing(errors: &mut ValidationErrors, flag: &str) {
    errors.push(format!("The option --{flag} is missing."));
}

/// Check a request, collecting every problem
pub fn validate(
    request: &RegistrationRequest,
) -> std::result::Result<ValidatedRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = present(&request.name);
    let vendor_raw = present(&request.vendor).map(|v| v.trim().to_ascii_uppercase());
    let version_raw = present(&request.version);

    for (flag, value) in [
        ("name", name.is_some()),
        ("vendor", vendor_raw.is_some()),
        ("version", version_raw.is_some()),
    ] {
        if !value {
            missing(&mut errors, flag);
        }
    }

    let vendor = vendor_raw.as_deref().and_then(|v| v.parse::<Vendor>().ok());
    let version = DistroVersion::parse(version_raw.unwrap_or_default());
    let wants_repos = should_have_repos(vendor, &version);
    let repos = request.repo_urls();

    // Option applicability
    for kind in [
        ArtifactKind::Hadoop,
        ArtifactKind::Pig,
        ArtifactKind::Hive,
        ArtifactKind::Hbase,
        ArtifactKind::Zookeeper,
        ArtifactKind::Tarball,
    ] {
        if wants_repos && request.artifact_url(kind).is_some() {
            errors.push(format!(
                "The option --{} can be used only for one of these distros: {}.",
                kind.flag(),
                vendor_list(Vendor::tarball_style())
            ));
        }
    }
    if !wants_repos && repos.is_some() {
        errors.push(format!(
            "The option --repos can be used only for one of these distros: {}.",
            vendor_list(Vendor::repo_style())
        ));
    }

    if wants_repos {
        match repos {
            None => missing(&mut errors, "repos"),
            Some(urls) => {
                for url in urls {
                    if !(url.starts_with("http:") || url.starts_with("https:")) {
                        errors.push("The value of option --repos must start with http or https.");
                    }
                }
            }
        }
    } else if request.artifact_url(ArtifactKind::Tarball).is_none() {
        for kind in [ArtifactKind::Hadoop, ArtifactKind::Pig, ArtifactKind::Hive] {
            if request.artifact_url(kind).is_none() {
                missing(&mut errors, kind.flag());
            }
        }
        for kind in [ArtifactKind::Hbase, ArtifactKind::Zookeeper] {
            if request.artifact_url(kind).is_some()
                && request.artifact_url(ArtifactKind::Hadoop).is_none()
            {
                errors.push(format!(
                    "The option --{0} depends on --hadoop. Please also specify option --hadoop.",
                    kind.flag()
                ));
            }
        }
    }

    if let Some(name) = name
        && !name_pattern().is_match(name)
    {
        errors.push("The value of option --name can contain only letter, number, and underscore.");
    }

    if vendor_raw.is_some() && vendor.is_none() {
        errors.push(unknown_vendor_message());
    }

    let hve_supported = match present(&request.hve) {
        None => None,
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(_) => {
            errors.push("The value of option --hve must be true or false.");
            None
        }
    };

    if !errors.is_empty() {
        debug!("Validation failed with {} errors", errors.len());
        return Err(errors);
    }

    // Unreachable once the presence checks above passed
    let (Some(name), Some(vendor), Some(version_raw)) = (name, vendor, version_raw) else {
        missing(&mut errors, "name");
        return Err(errors);
    };

    let source = match repos {
        Some(urls) if wants_repos => PackageSource::Repos(urls.to_vec()),
        _ => PackageSource::Tarballs(
            ArtifactKind::ALL
                .into_iter()
                .filter_map(|kind| {
                    request
                        .artifact_url(kind)
                        .map(|url| ArtifactRequest::new(kind, url))
                })
                .collect(),
        ),
    };

    Ok(ValidatedRequest {
        name: name.to_string(),
        vendor,
        version: DistroVersion::parse(version_raw),
        hve_supported,
        roles: request.roles.clone(),
        source,
    })
}

/// Ask before overwriting a distro or duplicating a vendor/version pair
///
/// Returns [`Error::UserDeclined`] as soon as a confirmation is refused.
pub fn confirm_conflicts(
    request: &ValidatedRequest,
    catalog: &Catalog,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    if catalog.find(&request.name).is_some() {
        confirm.notice(&format!(
            "Warning: The distro named {} already exists.",
            request.name
        ));
        let question = format!(
            "Do you want to overwrite the existing {} distro ? [Y/N]:",
            request.name
        );
        if !confirm.confirm(&question)? {
            return Err(Error::UserDeclined(format!(
                "distro {} was not overwritten",
                request.name
            )));
        }
    }

    let vendor = request.vendor.as_str();
    let version = request.version.as_str();
    if catalog.find_release(vendor, version, &request.name).is_some() {
        confirm.notice(&format!(
            "Warning: A distro with the same vendor {vendor} and version {version} already exists."
        ));
        if !confirm.confirm("Do you still want to add this new distro ? [Y/N]:")? {
            return Err(Error::UserDeclined(format!(
                "a second {vendor} {version} distro was not added"
            )));
        }
    }

    Ok(())
}
