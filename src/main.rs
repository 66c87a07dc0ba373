// src/main.rs

mod cli;
mod commands;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::Cli;
use distro_config::{Error, EXIT_FAILURE, EXIT_OK};
use std::process;

fn print_help() {
    let mut command = Cli::command();
    // Help is best effort once stdout is gone
    let _ = command.print_help();
    println!();
}

/// Print the operator-facing report for a failed run and return its exit status
fn report_failure(name: Option<&str>, err: &anyhow::Error) -> i32 {
    let Some(err) = err.downcast_ref::<Error>() else {
        println!("Errors:");
        println!("  {err:#}");
        print_help();
        return EXIT_FAILURE;
    };

    match err {
        Error::UserDeclined(_) => println!("{err}"),
        Error::CatalogWrite { message, .. } => {
            println!(
                "Failed to add distro {}: {}",
                name.unwrap_or_default(),
                message
            );
            print_help();
        }
        _ => {
            println!("Errors:");
            for message in err.messages() {
                println!("  {message}");
            }
            print_help();
        }
    }
    err.exit_code()
}

fn main() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            process::exit(EXIT_OK);
        }
        Err(e) => {
            println!("Errors:");
            for line in e.render().to_string().lines().filter(|l| !l.is_empty()) {
                println!("  {line}");
            }
            print_help();
            process::exit(EXIT_FAILURE);
        }
    };

    let code = match commands::cmd_register(&cli) {
        Ok(()) => EXIT_OK,
        Err(e) => report_failure(cli.name.as_deref(), &e),
    };
    process::exit(code);
}
