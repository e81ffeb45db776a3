//! Sequences one comparison run:
//! setup -> workspace -> [download base] -> [download pr] -> compare -> [cleanup]

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::compare::{comparison_args_for, render_command, run_comparison, ComparisonOutput};
use crate::config::Config;
use crate::download::Downloader;
use crate::env::prepare_environment;
use crate::job::{JobContext, Side};
use crate::remote::{CurlTransport, Transport};
use crate::workspace::{Workspace, DEFAULT_OUTPUT_ROOT};

/// Which optional stages run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub output_root: PathBuf,
    pub setup_env: bool,
    pub download_baseline: bool,
    pub download_candidate: bool,
    pub cleanup: bool,
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            setup_env: true,
            download_baseline: false,
            download_candidate: false,
            cleanup: false,
            dry_run: false,
        }
    }
}

/// What a finished run produced
#[derive(Debug)]
pub struct RunReport {
    pub workspace: Workspace,
    pub staged: Vec<PathBuf>,
    /// `None` for dry runs
    pub comparison: Option<ComparisonOutput>,
}

pub fn run(job: &JobContext, options: &RunOptions, config: &Config) -> Result<RunReport> {
    let transport = CurlTransport::from_config(config);
    run_with(job, options, config, &transport)
}

pub fn run_with<T: Transport>(
    job: &JobContext,
    options: &RunOptions,
    config: &Config,
    transport: &T,
) -> Result<RunReport> {
    if options.dry_run {
        return Ok(dry_run(job, options, config));
    }

    if options.setup_env {
        println!("{}", "Preparing build environment...".green().bold());
        prepare_environment(&config.setup_command, &config.setup_dir);
    }

    let workspace = Workspace::create(&options.output_root, &job.change_id, &job.job_id)
        .context("Failed to create staging directory")?;
    println!("  {} {}", "Staging:".bold(), workspace.root.display());

    let mut staged = Vec::new();
    for (enabled, side) in [
        (options.download_baseline, Side::Baseline),
        (options.download_candidate, Side::Candidate),
    ] {
        if !enabled {
            continue;
        }
        let url = job.remote_url(config, side);
        println!(
            "{}",
            format!("Downloading {} files...", side).green().bold()
        );
        tracing::info!(%side, %url, "downloading");
        let files = Downloader::new(transport, &workspace)
            .download(&url, side)
            .with_context(|| format!("Failed to download {} files", side))?;
        println!("  {} {} files", "Staged:".bold(), files.len());
        staged.extend(files);
    }

    println!("{}", "Running bin-by-bin comparison...".green().bold());
    let args = comparison_args_for(&workspace, job);
    tracing::info!(command = %render_command(&config.compare_tool, &args), "comparing");
    let output = run_comparison(&config.compare_tool, &args).context("Comparison failed")?;
    output
        .write_to(&mut std::io::stdout().lock(), &mut std::io::stderr().lock())
        .context("Failed to pass on comparison output")?;

    if options.cleanup {
        println!("{}", "Removing staging directory...".green().bold());
        Workspace::remove(&options.output_root, &job.change_id, &job.job_id);
    }

    println!("\n{}", "Done!".green().bold());

    Ok(RunReport {
        workspace,
        staged,
        comparison: Some(output),
    })
}

fn dry_run(job: &JobContext, options: &RunOptions, config: &Config) -> RunReport {
    let workspace = Workspace::at(&options.output_root, &job.change_id, &job.job_id);

    println!("{}", "Dry run, nothing will be executed".yellow().bold());
    if options.setup_env {
        println!(
            "  {} (cd {} && {})",
            "Setup:".bold(),
            config.setup_dir.display(),
            config.setup_command
        );
    }
    println!("  {} {}", "Staging:".bold(), workspace.root.display());
    for (enabled, side) in [
        (options.download_baseline, Side::Baseline),
        (options.download_candidate, Side::Candidate),
    ] {
        if enabled {
            println!(
                "  {} {} -> {}",
                "Download:".bold(),
                job.remote_url(config, side),
                workspace.side_dir(side).display()
            );
        }
    }
    let args = comparison_args_for(&workspace, job);
    println!(
        "  {} {}",
        "Compare:".bold(),
        render_command(&config.compare_tool, &args)
    );
    if options.cleanup {
        println!("  {} {}", "Remove:".bold(), workspace.root.display());
    }

    RunReport {
        workspace,
        staged: Vec::new(),
        comparison: None,
    }
}
