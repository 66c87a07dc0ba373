// src/commands/register.rs
//! Distro registration command

use crate::cli::Cli;
use anyhow::Result;
use distro_config::{HttpFetcher, LinePrompt, Registered, Upsert};
use tracing::info;

/// Add or replace the distro described by the command line
pub fn cmd_register(cli: &Cli) -> Result<()> {
    let settings = cli.settings();
    let request = cli.request();
    info!(
        "Registering distro {} into {}",
        request.name.as_deref().unwrap_or_default(),
        settings.catalog_path.display()
    );

    let fetcher = HttpFetcher::new(settings.verify_tls)?;
    // Never asked under --yes
    let mut prompt = LinePrompt::stdio();

    let registered = distro_config::register(&request, &settings, &fetcher, &mut prompt)?;
    report(&registered, &settings.catalog_path.display().to_string());
    Ok(())
}

fn report(registered: &Registered, catalog: &str) {
    match registered.upsert {
        Upsert::Replaced => info!("Replaced existing distro {}", registered.record.name),
        Upsert::Appended => info!("Appended distro {}", registered.record.name),
    }
    println!(
        "Distro {} is added into {} successfully",
        registered.record.name, catalog
    );
    if let Some(backup) = &registered.save.backup {
        println!("The old manifest is backup to {}", backup.display());
    }
}
