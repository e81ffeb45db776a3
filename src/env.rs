//! Build-environment setup before a comparison.
//!
//! The setup command runs in its own shell, so whatever it exports is gone
//! once it exits and later steps never see it. It is kept as an optional
//! stage and its outcome never fails the run.

use std::path::Path;
use std::process::Command;

/// Run `command` through `sh -c` inside `dir`. Returns whether it succeeded;
/// callers are free to ignore the answer.
pub fn prepare_environment(command: &str, dir: &Path) -> bool {
    tracing::debug!(%command, dir = %dir.display(), "preparing build environment");

    match Command::new("sh").arg("-c").arg(command).current_dir(dir).output() {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                status = %output.status,
                stderr = %stderr.trim(),
                "environment setup exited with failure, continuing"
            );
            false
        }
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "environment setup could not run, continuing");
            false
        }
    }
}
