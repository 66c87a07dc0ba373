// src/artifact/client.rs

//! HTTP fetcher for distro tarballs
//!
//! Downloads are streamed to a `.part` file next to the destination and
//! renamed into place once the body has been read completely. There is no
//! timeout and no retry: one failed attempt fails the artifact.

use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Something that can copy a URL to a local file
pub trait Fetcher {
    /// Download `url` to `dest`, returning the number of bytes written
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Fetches over HTTP(S)
pub struct HttpFetcher {
    client: Client,
    show_progress: bool,
}

impl HttpFetcher {
    /// Create a fetcher; `verify_tls = false` accepts any server certificate
    pub fn new(verify_tls: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            show_progress: std::io::stdout().is_terminal(),
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        info!("Downloading {} to {}", url, dest.display());

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::DownloadError(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let total_size = response.content_length().unwrap_or(0);
        let progress = self
            .show_progress
            .then(|| create_progress_bar(total_size, &display_name(dest)));

        let temp_path = part_path(dest);
        let result = File::create(&temp_path)
            .map_err(|e| {
                Error::IoError(format!("Failed to create file {}: {e}", temp_path.display()))
            })
            .and_then(|mut file| stream_response_to_file(response, &mut file, progress.as_ref()));

        let downloaded = match result {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                if let Some(pb) = &progress {
                    pb.abandon();
                }
                return Err(e);
            }
        };

        if let Some(pb) = &progress {
            pb.finish_and_clear();
        }

        fs::rename(&temp_path, dest).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Error::IoError(format!(
                "Failed to move {} to {}: {e}",
                temp_path.display(),
                dest.display()
            ))
        })?;

        debug!("Downloaded {} bytes to {}", downloaded, dest.display());
        Ok(downloaded)
    }
}

/// Stream an HTTP response body to `file` without buffering it whole
fn stream_response_to_file(
    mut response: reqwest::blocking::Response,
    file: &mut File,
    progress_bar: Option<&ProgressBar>,
) -> Result<u64> {
    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;

        downloaded += bytes_read as u64;

        if let Some(pb) = progress_bar {
            pb.set_position(downloaded);
        }
    }

    file.flush()
        .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;
    Ok(downloaded)
}

/// Styled progress bar for one tarball
fn create_progress_bar(size: u64, name: &str) -> ProgressBar {
    let pb = if size > 0 {
        ProgressBar::new(size)
    } else {
        ProgressBar::new_spinner()
    };
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(name.to_string());
    pb
}

fn display_name(dest: &Path) -> String {
    dest.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<dest>.part`
fn part_path(dest: &Path) -> PathBuf {
    let mut os: OsString = dest.as_os_str().to_owned();
    os.push(".part");
    PathBuf::from(os)
}
