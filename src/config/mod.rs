use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CompareError, Result};

pub const CONFIG_FILE: &str = ".dqmcomparerc.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SSO cookie acquisition tool
    #[serde(default = "default_cookie_tool")]
    pub cookie_tool: String,

    /// curl-compatible transfer tool
    #[serde(default = "default_transfer_tool")]
    pub transfer_tool: String,

    /// Bin-by-bin comparison program
    #[serde(default = "default_compare_tool")]
    pub compare_tool: String,

    /// Shell command that initializes the build environment
    #[serde(default = "default_setup_command")]
    pub setup_command: String,

    /// Working directory for the setup command
    #[serde(default = "default_setup_dir")]
    pub setup_dir: PathBuf,

    /// Baseline listing URL; `{release}`, `{architecture}` and `{real_arch}` are substituted
    #[serde(default = "default_baseline_url_template")]
    pub baseline_url_template: String,

    /// Pull request listing URL; `{pr}` and `{job_id}` are substituted
    #[serde(default = "default_candidate_url_template")]
    pub candidate_url_template: String,

    /// Run the environment setup command before anything else
    #[serde(default = "default_true")]
    pub setup_env: bool,

    #[serde(default)]
    pub download_baseline: bool,

    #[serde(default)]
    pub download_candidate: bool,

    /// Remove the staging tree after the comparison finishes
    #[serde(default)]
    pub cleanup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cookie_tool: default_cookie_tool(),
            transfer_tool: default_transfer_tool(),
            compare_tool: default_compare_tool(),
            setup_command: default_setup_command(),
            setup_dir: default_setup_dir(),
            baseline_url_template: default_baseline_url_template(),
            candidate_url_template: default_candidate_url_template(),
            setup_env: true,
            download_baseline: false,
            download_candidate: false,
            cleanup: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from_dir(Path::new("."))
    }

    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    /// Load an explicit config file. Unlike `load_from_dir`, a missing file is an error.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CompareError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| CompareError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

fn default_cookie_tool() -> String {
    "cern-get-sso-cookie".to_string()
}

fn default_transfer_tool() -> String {
    "curl".to_string()
}

fn default_compare_tool() -> String {
    "compareDQMOutput.py".to_string()
}

fn default_setup_command() -> String {
    "eval `scramv1 runtime -sh`".to_string()
}

fn default_setup_dir() -> PathBuf {
    PathBuf::from("CMSSW/CMSSW_10_6_0_pre3/src/")
}

fn default_baseline_url_template() -> String {
    "https://cmssdt.cern.ch/SDT/jenkins-artifacts/ib-baseline-tests/{release}/{architecture}/{real_arch}/matrix-results/".to_string()
}

fn default_candidate_url_template() -> String {
    "https://cmssdt.cern.ch/SDT/jenkins-artifacts/pull-request-integration/PR-{pr}/{job_id}/runTheMatrix-results/".to_string()
}

fn default_true() -> bool {
    true
}
