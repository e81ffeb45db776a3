//! Authenticated access to the remote result area through external tools

use std::path::Path;
use std::process::{Command, Output};

use crate::config::Config;
use crate::error::{CompareError, Result};

/// The three remote operations a download needs.
///
/// `CurlTransport` shells out to the SSO cookie tool and curl; tests swap in
/// an in-memory implementation.
pub trait Transport {
    /// Write a session cookie for `url` to `cookie_path`
    fn acquire_cookie(&self, cookie_path: &Path, url: &str) -> Result<()>;

    /// Fetch `url` and return the body as text
    fn fetch(&self, cookie_path: &Path, url: &str) -> Result<String>;

    /// Fetch `url` into `dest`, creating parent directories
    fn download(&self, cookie_path: &Path, url: &str, dest: &Path) -> Result<()>;
}

pub struct CurlTransport {
    cookie_tool: String,
    transfer_tool: String,
}

impl CurlTransport {
    pub fn new(cookie_tool: &str, transfer_tool: &str) -> Self {
        Self {
            cookie_tool: cookie_tool.to_string(),
            transfer_tool: transfer_tool.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.cookie_tool, &config.transfer_tool)
    }

    /// Follow redirects, no progress output, skip TLS verification, send the cookie
    fn transfer(&self, cookie_path: &Path, url: &str) -> Command {
        let mut cmd = Command::new(&self.transfer_tool);
        cmd.args(["-L", "-s", "-k", "-b"])
            .arg(cookie_path)
            .arg("--url")
            .arg(url);
        cmd
    }

    fn run_transfer(&self, mut cmd: Command, url: &str) -> Result<Output> {
        tracing::debug!(tool = %self.transfer_tool, %url, "transfer");
        let output = cmd.output().map_err(|e| CompareError::Transfer {
            url: url.to_string(),
            message: format!("failed to run '{}': {}", self.transfer_tool, e),
        })?;

        if !output.status.success() {
            return Err(CompareError::Transfer {
                url: url.to_string(),
                message: failure_message(&output),
            });
        }

        Ok(output)
    }
}

impl Transport for CurlTransport {
    fn acquire_cookie(&self, cookie_path: &Path, url: &str) -> Result<()> {
        tracing::debug!(tool = %self.cookie_tool, %url, "acquiring SSO cookie");
        let output = Command::new(&self.cookie_tool)
            .arg("-o")
            .arg(cookie_path)
            .arg("--url")
            .arg(url)
            .output()
            .map_err(|e| CompareError::Authentication {
                url: url.to_string(),
                message: format!("failed to run '{}': {}", self.cookie_tool, e),
            })?;

        if !output.status.success() {
            return Err(CompareError::Authentication {
                url: url.to_string(),
                message: failure_message(&output),
            });
        }

        Ok(())
    }

    fn fetch(&self, cookie_path: &Path, url: &str) -> Result<String> {
        let cmd = self.transfer(cookie_path, url);
        let output = self.run_transfer(cmd, url)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn download(&self, cookie_path: &Path, url: &str, dest: &Path) -> Result<()> {
        let mut cmd = self.transfer(cookie_path, url);
        cmd.arg("--output").arg(dest).arg("--create-dirs");
        self.run_transfer(cmd, url)?;
        Ok(())
    }
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        format!("{}: {}", output.status, stderr)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn failing_cookie_tool_is_authentication_error() {
        let tmp = TempDir::new().unwrap();
        let cookie = script(tmp.path(), "cookie", "echo 'no kerberos ticket' >&2; exit 1");
        let transport = CurlTransport::new(&cookie, "curl");

        let err = transport
            .acquire_cookie(&tmp.path().join("cookie.txt"), "https://example.org/")
            .unwrap_err();
        match err {
            CompareError::Authentication { url, message } => {
                assert_eq!(url, "https://example.org/");
                assert!(message.contains("no kerberos ticket"));
            }
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[test]
    fn missing_cookie_tool_is_authentication_error() {
        let tmp = TempDir::new().unwrap();
        let transport = CurlTransport::new("/nonexistent/cookie-tool", "curl");
        let result = transport.acquire_cookie(&tmp.path().join("cookie.txt"), "https://x/");
        assert!(matches!(result, Err(CompareError::Authentication { .. })));
    }

    #[test]
    fn cookie_tool_receives_output_path_and_url() {
        let tmp = TempDir::new().unwrap();
        // writes its argv into the cookie file it was told to produce
        let cookie = script(tmp.path(), "cookie", r#"echo "$@" > "$2""#);
        let transport = CurlTransport::new(&cookie, "curl");
        let cookie_path = tmp.path().join("cookie.txt");

        transport.acquire_cookie(&cookie_path, "https://x/").unwrap();
        let args = fs::read_to_string(&cookie_path).unwrap();
        assert_eq!(
            args.trim(),
            format!("-o {} --url https://x/", cookie_path.display())
        );
    }

    #[test]
    fn fetch_returns_stdout_and_passes_curl_flags() {
        let transport = CurlTransport::new("cookie", "echo");

        let body = transport.fetch(Path::new("c.txt"), "https://x/list/").unwrap();
        assert_eq!(body.trim(), "-L -s -k -b c.txt --url https://x/list/");
    }

    #[test]
    fn failed_fetch_is_transfer_error() {
        let transport = CurlTransport::new("cookie", "false");

        let result = transport.fetch(Path::new("c.txt"), "https://x/list/");
        assert!(matches!(result, Err(CompareError::Transfer { .. })));
    }

    #[test]
    fn download_appends_output_flags() {
        let tmp = TempDir::new().unwrap();
        let log = tmp.path().join("argv");
        let curl = script(
            tmp.path(),
            "curl",
            &format!(r#"echo "$@" > "{}""#, log.display()),
        );
        let transport = CurlTransport::new("cookie", &curl);

        transport
            .download(Path::new("c.txt"), "https://x/f.root", Path::new("out/f.root"))
            .unwrap();
        let args = fs::read_to_string(&log).unwrap();
        assert_eq!(
            args.trim(),
            "-L -s -k -b c.txt --url https://x/f.root --output out/f.root --create-dirs"
        );
    }
}
