use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::Config;
use crate::driver::RunOptions;
use crate::job::JobContext;
use crate::workspace::DEFAULT_OUTPUT_ROOT;

#[derive(Parser, Debug)]
#[command(
    name = "dqm-compare",
    about = "Download baseline and PR files from cms-bot and run the bin-by-bin comparison",
    version
)]
pub struct Cli {
    /// Baseline architecture. Sample: slc7_amd64_gcc700
    #[arg(short = 'a', long)]
    pub architecture: String,

    /// Baseline release. Sample: CMSSW_10_6_X_2019-04-16-1100
    #[arg(short = 'r', long)]
    pub release: String,

    /// PR number under test
    #[arg(short = 'p', long = "pr-number")]
    pub pr_number: String,

    /// Unique test number to distinguish different comparisons of the same PR
    #[arg(short = 'j', long = "job-id")]
    pub job_id: String,

    /// Real architecture suffix, also accepted as -ra. Sample: -GenuineIntel
    #[arg(long = "real-arch", allow_hyphen_values = true)]
    pub real_arch: String,

    /// Comparison output directory
    #[arg(short = 'o', long = "output-dir", default_value = DEFAULT_OUTPUT_ROOT)]
    pub output_dir: PathBuf,

    /// Download the baseline DQM files before comparing
    #[arg(long)]
    pub download_baseline: bool,

    /// Download the PR DQM files before comparing
    #[arg(long = "download-pr")]
    pub download_pr: bool,

    /// Remove the staging directory when done
    #[arg(long)]
    pub cleanup: bool,

    /// Do not run the build environment setup command
    #[arg(long)]
    pub skip_setup: bool,

    /// Print what would run without downloading or comparing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Config file (default: ./.dqmcomparerc.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse the process arguments, accepting `-ra` for `--real-arch`
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn try_parse_normalized_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn job(&self) -> JobContext {
        JobContext {
            change_id: self.pr_number.clone(),
            job_id: self.job_id.clone(),
            release: self.release.clone(),
            architecture: self.architecture.clone(),
            real_arch: self.real_arch.clone(),
        }
    }

    /// Stage toggles: a flag enables a stage on top of whatever the config enables
    pub fn run_options(&self, config: &Config) -> RunOptions {
        RunOptions {
            output_root: self.output_dir.clone(),
            setup_env: config.setup_env && !self.skip_setup,
            download_baseline: config.download_baseline || self.download_baseline,
            download_candidate: config.download_candidate || self.download_pr,
            cleanup: config.cleanup || self.cleanup,
            dry_run: self.dry_run,
        }
    }

    pub fn load_config(&self) -> crate::error::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from_file(path),
            None => Config::load(),
        }
    }
}

/// Options that consume the following argument as their value
const VALUE_OPTIONS: &[&str] = &[
    "-a",
    "--architecture",
    "-r",
    "--release",
    "-p",
    "--pr-number",
    "-j",
    "--job-id",
    "--real-arch",
    "-o",
    "--output-dir",
    "--config",
];

/// clap only knows single-character shorts, so the two-letter `-ra`
/// is rewritten to `--real-arch` before parsing. Only tokens in option
/// position are touched: a value such as `--release -ra` and anything
/// after `--` pass through unchanged.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut takes_value = false;
    let mut options_done = false;

    for (index, arg) in args.into_iter().map(Into::into).enumerate() {
        // argv[0], option values and everything after `--` are left alone
        if index == 0 || takes_value || options_done {
            takes_value = false;
            normalized.push(arg);
            continue;
        }

        if arg == "--" {
            options_done = true;
            normalized.push(arg);
            continue;
        }

        if arg == "-ra" {
            takes_value = true;
            normalized.push(OsString::from("--real-arch"));
            continue;
        }

        match arg.to_str().and_then(|s| s.strip_prefix("-ra=")) {
            Some(value) => normalized.push(OsString::from(format!("--real-arch={}", value))),
            None => {
                takes_value = arg.to_str().is_some_and(|s| VALUE_OPTIONS.contains(&s));
                normalized.push(arg);
            }
        }
    }

    normalized
}
