//! Bin-by-bin comparison of the staged base and pr trees

mod runner;

pub use runner::{run_comparison, ComparisonOutput};

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::Path;

use crate::job::{JobContext, Side};
use crate::workspace::{Workspace, COMPARISON_OUTPUT_DIR};

/// Parallel jobs requested from the comparison tool
pub const COMPARISON_JOBS: &str = "1";

/// Argument list for the comparison tool:
/// `-b <base>/ -p <pr>/ -j 1 -n <change> -t <job> -r <release> -o <out> -s <staging>/`
///
/// Paths stay `OsString` so the tool receives them byte for byte.
pub fn comparison_args(
    staging: &Path,
    change_id: &str,
    job_id: &str,
    release: &str,
) -> Vec<OsString> {
    // joining an empty component appends the trailing separator
    let dir = |path: &Path| path.join("").into_os_string();

    vec![
        "-b".into(),
        dir(&staging.join(Side::Baseline.label())),
        "-p".into(),
        dir(&staging.join(Side::Candidate.label())),
        "-j".into(),
        COMPARISON_JOBS.into(),
        "-n".into(),
        change_id.into(),
        "-t".into(),
        job_id.into(),
        "-r".into(),
        release.into(),
        "-o".into(),
        staging.join(COMPARISON_OUTPUT_DIR).into_os_string(),
        "-s".into(),
        dir(staging),
    ]
}

pub fn comparison_args_for(workspace: &Workspace, job: &JobContext) -> Vec<OsString> {
    comparison_args(&workspace.root, &job.change_id, &job.job_id, &job.release)
}

/// Shell-ish rendering of a command line for dry runs and logs
pub fn render_command(program: &str, args: &[OsString]) -> String {
    std::iter::once(Cow::Borrowed(program))
        .chain(args.iter().map(|arg| arg.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}
