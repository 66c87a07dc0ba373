// src/register.rs

//! One registration run
//!
//! A run moves through [`Stage`]s in order and never revisits one:
//!
//! ```text
//! Validating -> Deriving -> Acquiring (tarball distros) -> Persisting
//! ```
//!
//! Any failure ends the run in place. Nothing touches the filesystem until
//! validation and every confirmation have passed, and the catalog is only
//! rewritten once the record is complete.

use crate::artifact::{Acquirer, Fetcher};
use crate::catalog::{Catalog, SaveReport, Upsert};
use crate::distro::{derive_repo_package, DistributionRecord};
use crate::error::{Error, Result};
use crate::prompt::{AssumeYes, Confirm};
use crate::settings::Settings;
use crate::validate::{confirm_conflicts, validate, PackageSource, RegistrationRequest};
use std::fmt;
use tracing::info;

/// Phase of a registration run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Deriving,
    Acquiring,
    Persisting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Deriving => "deriving",
            Stage::Acquiring => "acquiring",
            Stage::Persisting => "persisting",
        };
        write!(f, "{name}")
    }
}

/// A distro that was written to the catalog
#[derive(Debug, Clone)]
pub struct Registered {
    pub record: DistributionRecord,
    pub upsert: Upsert,
    pub save: SaveReport,
}

fn enter(stage: Stage, name: &str) {
    info!(stage = %stage, distro = name, "registration stage");
}

/// Register one distro into the catalog named by `settings`
///
/// `confirm` is bypassed when `settings.assume_yes` is set.
pub fn register(
    request: &RegistrationRequest,
    settings: &Settings,
    fetcher: &dyn Fetcher,
    confirm: &mut dyn Confirm,
) -> Result<Registered> {
    let mut assume_yes = AssumeYes;
    let confirm: &mut dyn Confirm = if settings.assume_yes {
        &mut assume_yes
    } else {
        confirm
    };

    enter(Stage::Validating, request.name.as_deref().unwrap_or_default());
    let validated = validate(request).map_err(Error::Validation)?;
    let mut catalog = Catalog::load(&settings.catalog_path)?;
    confirm_conflicts(&validated, &catalog, confirm)?;

    enter(Stage::Deriving, &validated.name);
    let mut record = validated.base_record();

    match &validated.source {
        PackageSource::Repos(repos) => {
            record.packages.push(derive_repo_package(
                validated.vendor,
                &validated.version,
                repos,
                validated.roles.as_deref(),
            ));
        }
        PackageSource::Tarballs(artifacts) => {
            enter(Stage::Acquiring, &validated.name);
            let acquisition = Acquirer::new(settings, fetcher).acquire(
                &validated.name,
                Some(validated.vendor),
                validated.roles.as_deref(),
                artifacts,
                confirm,
            )?;
            if !acquisition.is_ok() {
                return Err(Error::Acquisition(acquisition.errors));
            }
            record.packages = acquisition.packages;
        }
    }

    enter(Stage::Persisting, &validated.name);
    let upsert = catalog.upsert(record.clone());
    let save = catalog.save()?;

    Ok(Registered {
        record,
        upsert,
        save,
    })
}
