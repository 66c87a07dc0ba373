// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use distro_config::{Catalog, Error, Fetcher, RegistrationRequest, Result, Settings};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Settings rooted in a fresh temporary directory.
///
/// Returns (TempDir, Settings) - keep the TempDir alive to prevent cleanup.
pub fn setup_settings() -> (TempDir, Settings) {
    let temp_dir = tempfile::tempdir().unwrap();
    let settings = Settings::rooted_at(temp_dir.path());
    (temp_dir, settings)
}

/// Write raw catalog text to the settings' catalog path.
pub fn write_catalog(settings: &Settings, text: &str) {
    fs::write(&settings.catalog_path, text).unwrap();
}

/// Current catalog text, or `None` when the file does not exist.
pub fn read_catalog(settings: &Settings) -> Option<String> {
    fs::read_to_string(&settings.catalog_path).ok()
}

/// Load the catalog the way a run would.
pub fn load_catalog(settings: &Settings) -> Catalog {
    Catalog::load(&settings.catalog_path).unwrap()
}

/// A repo-style request with the three mandatory fields set.
pub fn repo_request(
    name: &str,
    vendor: &str,
    version: &str,
    repos: &[&str],
) -> RegistrationRequest {
    RegistrationRequest {
        name: Some(name.to_string()),
        vendor: Some(vendor.to_string()),
        version: Some(version.to_string()),
        repos: Some(repos.iter().map(|r| r.to_string()).collect()),
        ..Default::default()
    }
}

/// A tarball-style request with no artifacts yet.
pub fn tarball_request(name: &str, vendor: &str, version: &str) -> RegistrationRequest {
    RegistrationRequest {
        name: Some(name.to_string()),
        vendor: Some(vendor.to_string()),
        version: Some(version.to_string()),
        ..Default::default()
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Serves canned bodies from memory and records every requested URL.
#[derive(Default)]
pub struct MemoryFetcher {
    bodies: HashMap<String, Vec<u8>>,
    pub fetched: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn serve(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.borrow().len()
    }
}

impl Fetcher for MemoryFetcher {
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
