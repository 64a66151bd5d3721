//! Deploy command implementation
//!
//! Runs the whole workflow in order:
//! configuration → archive → upload → function update → optional log purge.
//! Every step before the purge is fatal on failure. A failed purge is
//! reported but the run still succeeds.

use std::fmt;
use std::path::Path;

use console::Style;
use tracing::{debug, error};

use crate::archive::{ArchiveSummary, build_archive};
use crate::cli::Cli;
use crate::cloud::aws::AwsClients;
use crate::cloud::{FunctionHost, LogService, ObjectStore};
use crate::config::{self, Config};
use crate::error::{LapdError, Result};
use crate::operations::{deploy_function, purge_logs, upload};
use crate::progress::SpinnerProgressReporter;

/// Workflow stages, in the only order they can be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ConfigLoaded,
    Archived,
    Uploaded,
    Deployed,
    PurgedLogs,
    Skipped,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ConfigLoaded => "config-loaded",
            Stage::Archived => "archived",
            Stage::Uploaded => "uploaded",
            Stage::Deployed => "deployed",
            Stage::PurgedLogs => "purged-logs",
            Stage::Skipped => "skipped",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "stage reached");
}

/// Result of the optional log purge
#[derive(Debug)]
pub enum PurgeOutcome {
    Skipped,
    Purged { deleted: usize },
    Failed { error: LapdError },
}

/// Summary of a completed deployment
#[derive(Debug)]
pub struct DeployReport {
    pub function: String,
    pub bucket: String,
    pub key: String,
    pub archive: ArchiveSummary,
    pub purge: PurgeOutcome,
}

/// The cloud services a deployment talks to
pub struct Services<'a> {
    pub store: &'a dyn ObjectStore,
    pub host: &'a dyn FunctionHost,
    pub logs: &'a dyn LogService,
}

/// Run deploy command
pub fn run(cli: &Cli) -> Result<()> {
    let config = config::load(&cli.config)?;
    enter(Stage::ConfigLoaded);

    let deployment = config.function(&cli.function)?;
    let mut progress = SpinnerProgressReporter::new();
    let archive = build_archive(
        &deployment.filters,
        Path::new(&config.local_package_name),
        &mut progress,
    )?;
    enter(Stage::Archived);

    if cli.package_only {
        print_archive(&archive);
        return Ok(());
    }

    let clients = AwsClients::from_env()?;
    let services = Services {
        store: &clients,
        host: &clients,
        logs: &clients,
    };
    let report = deploy(&config, &cli.function, archive, cli.purge, &services)?;
    print_report(&report);

    Ok(())
}

/// Upload `archive`, repoint the function, and purge its logs if requested
pub fn deploy(
    config: &Config,
    function: &str,
    archive: ArchiveSummary,
    purge: bool,
    services: &Services<'_>,
) -> Result<DeployReport> {
    upload(
        services.store,
        &config.s3_bucket,
        &config.package,
        &archive.path,
    )?;
    enter(Stage::Uploaded);

    deploy_function(services.host, function, &config.s3_bucket, &config.package)?;
    enter(Stage::Deployed);

    let purge = if purge {
        match purge_logs(services.logs, function) {
            Ok(deleted) => {
                enter(Stage::PurgedLogs);
                PurgeOutcome::Purged {
                    deleted: deleted.len(),
                }
            }
            Err(error) => {
                error!("log purge failed: {error}");
                PurgeOutcome::Failed { error }
            }
        }
    } else {
        enter(Stage::Skipped);
        PurgeOutcome::Skipped
    };
    enter(Stage::Done);

    Ok(DeployReport {
        function: function.to_string(),
        bucket: config.s3_bucket.clone(),
        key: config.package.clone(),
        archive,
        purge,
    })
}

fn print_archive(archive: &ArchiveSummary) {
    println!(
        "{} {} ({} files, {} packed into {})",
        Style::new().bold().green().apply_to("Packaged"),
        archive.path.display(),
        archive.entries,
        format_size(archive.bytes),
        format_size(archive.size)
    );
}

fn print_report(report: &DeployReport) {
    let label = Style::new().bold();
    println!(
        "{} {}",
        Style::new().bold().green().apply_to("Deployed"),
        Style::new().bold().yellow().apply_to(&report.function)
    );
    println!(
        "  {} {} ({} files, {} packed into {})",
        label.apply_to("Archive:"),
        report.archive.path.display(),
        report.archive.entries,
        format_size(report.archive.bytes),
        format_size(report.archive.size)
    );
    println!(
        "  {} s3://{}/{}",
        label.apply_to("Object: "),
        report.bucket,
        report.key
    );
    match &report.purge {
        PurgeOutcome::Skipped => {}
        PurgeOutcome::Purged { deleted } => {
            println!("  {} purged {deleted} streams", label.apply_to("Logs:   "));
        }
        PurgeOutcome::Failed { error } => {
            println!(
                "  {} {}",
                label.apply_to("Logs:   "),
                Style::new().red().apply_to(format!("purge failed: {error}"))
            );
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < 1024.0 {
        format!("{bytes} B")
    } else if size < 1024.0 * 1024.0 {
        format!("{:.1} KB", size / 1024.0)
    } else if size < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", size / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", size / (1024.0 * 1024.0 * 1024.0))
    }
}
