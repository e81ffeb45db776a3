//! Identity of one comparison run and the two sides being compared

use std::fmt;

use crate::config::Config;

/// Everything that identifies one comparison run. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobContext {
    pub change_id: String,
    pub job_id: String,
    pub release: String,
    pub architecture: String,
    pub real_arch: String,
}

/// Which build a set of result files belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Baseline,
    Candidate,
}

impl Side {
    /// Directory name under the staging path. The comparison tool reads these.
    pub fn label(self) -> &'static str {
        match self {
            Side::Baseline => "base",
            Side::Candidate => "pr",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl JobContext {
    /// Remote listing URL for one side, rendered from the configured template
    pub fn remote_url(&self, config: &Config, side: Side) -> String {
        match side {
            Side::Baseline => config
                .baseline_url_template
                .replace("{release}", &self.release)
                .replace("{architecture}", &self.architecture)
                .replace("{real_arch}", &self.real_arch),
            Side::Candidate => config
                .candidate_url_template
                .replace("{pr}", &self.change_id)
                .replace("{job_id}", &self.job_id),
        }
    }
}
