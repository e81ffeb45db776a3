//! Runs the external comparison program

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::Command;

use crate::error::{CompareError, Result};

/// Raw output of a successful comparison run
#[derive(Debug, Clone, Default)]
pub struct ComparisonOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ComparisonOutput {
    /// Pass both streams on unchanged
    pub fn write_to(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        out.write_all(&self.stdout)?;
        out.flush()?;
        err.write_all(&self.stderr)?;
        err.flush()
    }
}

/// Run `program` with `args` and capture its output.
///
/// A spawn failure or a non-zero exit is fatal to the run; there is no retry.
pub fn run_comparison(program: &str, args: &[OsString]) -> Result<ComparisonOutput> {
    tracing::debug!(%program, ?args, "running comparison");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| CompareError::Process {
            program: program.to_string(),
            message: format!("could not be started: {}", e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.trim();
        return Err(CompareError::Process {
            program: program.to_string(),
            message: if detail.is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {}", output.status, detail)
            },
        });
    }

    Ok(ComparisonOutput {
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
