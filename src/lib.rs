// src/lib.rs

//! Distro catalog registration
//!
//! Registers distro definitions (vendor, version, package source, and the
//! roles a distro can deploy) into the JSON catalog read by the provisioning
//! system.
//!
//! # Architecture
//!
//! - `validate`: checks operator input and batches every error
//! - `distro`: record model and the declarative vendor rule table
//! - `artifact`: downloads tarballs for tarball-style vendors
//! - `catalog`: load, back up, upsert, and atomically rewrite the catalog
//! - `register`: drives one run through those stages

pub mod artifact;
pub mod catalog;
pub mod distro;
mod error;
pub mod prompt;
pub mod register;
pub mod settings;
pub mod validate;

pub use artifact::{ArtifactKind, ArtifactRequest, Fetcher, HttpFetcher};
pub use catalog::{Catalog, SaveReport, Upsert};
pub use distro::{DistributionRecord, DistroVersion, PackageEntry, Vendor};
pub use error::{Error, Result, EXIT_FAILURE, EXIT_OK, EXIT_WRITE_FAILURE};
pub use prompt::{AssumeYes, Confirm, LinePrompt, ScriptedAnswers};
pub use register::{register, Registered, Stage};
pub use settings::Settings;
pub use validate::{RegistrationRequest, ValidatedRequest, ValidationErrors};
