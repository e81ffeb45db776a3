//! Stage one side's DQM result files into the workspace

use std::path::PathBuf;

use crate::error::Result;
use crate::job::Side;
use crate::remote::{dqm_file, join_url, workflow_dirs, Transport};
use crate::workspace::Workspace;

/// A result file found in a workflow listing, not yet downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub workflow: String,
    pub filename: String,
}

pub struct Downloader<'a, T: Transport> {
    transport: &'a T,
    workspace: &'a Workspace,
}

impl<'a, T: Transport> Downloader<'a, T> {
    pub fn new(transport: &'a T, workspace: &'a Workspace) -> Self {
        Self {
            transport,
            workspace,
        }
    }

    /// Download the first DQM file of every workflow listed under `base_url`
    /// into `<workspace>/<side>/<workflow>/`. Returns the local paths written.
    ///
    /// Workflows are visited one at a time. Any failed fetch or download
    /// aborts the whole side.
    pub fn download(&self, base_url: &str, side: Side) -> Result<Vec<PathBuf>> {
        let cookie_path = self.workspace.cookie_path();
        self.transport.acquire_cookie(&cookie_path, base_url)?;

        let pending = self.locate(base_url)?;
        tracing::info!(%side, files = pending.len(), "result files located");

        let mut staged = Vec::with_capacity(pending.len());
        for file in &pending {
            let url = join_url(&join_url(base_url, &file.workflow), &file.filename);
            let local = self
                .workspace
                .local_file(side, &file.workflow, &file.filename);
            self.transport.download(&cookie_path, &url, &local)?;
            println!("Downloaded file: {}", local.display());
            staged.push(local);
        }

        Ok(staged)
    }

    /// Walk the top-level listing and each workflow listing. Workflows
    /// without a DQM file are skipped.
    pub fn locate(&self, base_url: &str) -> Result<Vec<PendingFile>> {
        let cookie_path = self.workspace.cookie_path();
        let listing = self.transport.fetch(&cookie_path, base_url)?;
        let workflows = workflow_dirs(&listing);
        tracing::debug!(url = %base_url, workflows = workflows.len(), "listing parsed");

        let mut pending = Vec::new();
        for workflow in workflows {
            let html = self
                .transport
                .fetch(&cookie_path, &join_url(base_url, &workflow))?;
            match dqm_file(&html) {
                Some(filename) => pending.push(PendingFile { workflow, filename }),
                None => tracing::debug!(%workflow, "no DQM file"),
            }
        }

        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;
    use tempfile::TempDir;

    const BASE: &str = "https://results.example/PR-101/5/runTheMatrix-results/";

    #[derive(Default)]
    struct StubTransport {
        pages: HashMap<String, String>,
        fetched: RefCell<Vec<String>>,
        fail_download: bool,
    }

    impl StubTransport {
        fn page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    impl Transport for StubTransport {
        fn acquire_cookie(&self, cookie_path: &Path, _url: &str) -> Result<()> {
            std::fs::write(cookie_path, "cookie").unwrap();
            Ok(())
        }

        fn fetch(&self, _cookie_path: &Path, url: &str) -> Result<String> {
            self.fetched.borrow_mut().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| CompareError::Transfer {
                    url: url.to_string(),
                    message: "404".to_string(),
                })
        }

        fn download(&self, _cookie_path: &Path, url: &str, dest: &Path) -> Result<()> {
            if self.fail_download {
                return Err(CompareError::Transfer {
                    url: url.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
            std::fs::write(dest, url).unwrap();
            Ok(())
        }
    }

    fn two_workflows() -> StubTransport {
        StubTransport::default()
            .page(
                BASE,
                r#"<a href="1.0_ProdTTbar/">1.0_ProdTTbar/</a>
<a href="25.0_TTbar+DIGI/">25.0_TTbar+DIGI/</a>"#,
            )
            .page(
                &format!("{BASE}1.0_ProdTTbar"),
                r#"<a href="DQM_V0001_R000000001__Global__CMSSW_X__RECO.root">DQM</a>"#,
            )
            .page(
                &format!("{BASE}25.0_TTbar+DIGI"),
                r#"<a href="step1.log">step1.log</a>"#,
            )
    }

    #[test]
    fn locate_skips_workflows_without_dqm_file() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::create(tmp.path(), "101", "5").unwrap();
        let transport = two_workflows();

        let pending = Downloader::new(&transport, &ws).locate(BASE).unwrap();
        assert_eq!(
            pending,
            vec![PendingFile {
                workflow: "1.0_ProdTTbar".to_string(),
                filename: "DQM_V0001_R000000001__Global__CMSSW_X__RECO.root".to_string(),
            }]
        );
        assert_eq!(transport.fetched.borrow().len(), 3);
    }

    #[test]
    fn download_stages_files_under_side_and_workflow() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::create(tmp.path(), "101", "5").unwrap();
        let transport = two_workflows();

        let staged = Downloader::new(&transport, &ws)
            .download(BASE, Side::Candidate)
            .unwrap();

        let expected = ws.root.join("pr").join("1.0_ProdTTbar").join(
            "DQM_V0001_R000000001__Global__CMSSW_X__RECO.root",
        );
        assert_eq!(staged, vec![expected.clone()]);
        assert_eq!(
            std::fs::read_to_string(&expected).unwrap(),
            format!("{BASE}1.0_ProdTTbar/DQM_V0001_R000000001__Global__CMSSW_X__RECO.root")
        );
        assert!(ws.cookie_path().exists());
        assert!(!ws.root.join("base").exists());
    }

    #[test]
    fn empty_listing_downloads_nothing() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::create(tmp.path(), "101", "5").unwrap();
        let transport = StubTransport::default().page(BASE, "<html></html>");

        let staged = Downloader::new(&transport, &ws)
            .download(BASE, Side::Baseline)
            .unwrap();
        assert!(staged.is_empty());
    }

    #[test]
    fn failed_workflow_fetch_aborts() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::create(tmp.path(), "101", "5").unwrap();
        let transport =
            StubTransport::default().page(BASE, r#"<a href="1.0_Missing/">1.0_Missing/</a>"#);

        let result = Downloader::new(&transport, &ws).download(BASE, Side::Baseline);
        assert!(matches!(result, Err(CompareError::Transfer { .. })));
    }

    #[test]
    fn failed_download_aborts() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::create(tmp.path(), "101", "5").unwrap();
        let transport = StubTransport {
            fail_download: true,
            ..two_workflows()
        };

        let result = Downloader::new(&transport, &ws).download(BASE, Side::Baseline);
        assert!(matches!(result, Err(CompareError::Transfer { .. })));
        assert!(!ws.side_dir(Side::Baseline).exists());
    }
}
