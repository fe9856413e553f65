//! Run orchestrator coordinating the check workflow
//!
//! This module provides:
//! - Workflow coordination: read pin → list tags → select → compare
//! - Optional application: archive on branch change → rewrite
//! - Per-product degradation so one failing product never aborts the run

use crate::config::Config;
use crate::domain::{CheckOutcome, CheckResult, Product, RunSummary};
use crate::error::{PinError, RegistryError};
use crate::pin::{read_pin, PinWriter};
use crate::progress::Progress;
use crate::registry::{
    DockerHubAdapter, HttpClient, HttpReleaseNotes, ReleaseNotesSource, TagSource,
    BROWSER_USER_AGENT, DEFAULT_USER_AGENT,
};
use crate::select::{clean_versions, compare, select_target, LtsDetector};
use std::path::PathBuf;
use tracing::{debug, info};

/// Orchestrator for a single run over the configured products
pub struct Orchestrator {
    /// Directory holding one subdirectory per product
    root: PathBuf,
    config: Config,
    tags: Box<dyn TagSource>,
    detector: LtsDetector,
    show_progress: bool,
}

impl Orchestrator {
    /// Create an orchestrator talking to the configured registry over HTTP
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Result<Self, RegistryError> {
        let tag_client = HttpClient::with_config(config.tag_timeout(), DEFAULT_USER_AGENT)?
            .with_max_retries(config.max_retries);
        let notes_client =
            HttpClient::with_config(config.release_notes_timeout(), BROWSER_USER_AGENT)?
                .with_max_retries(config.max_retries);

        let tags = DockerHubAdapter::new(
            tag_client,
            config.registry_url.clone(),
            config.max_pages,
            config.page_size,
        );
        let notes = HttpReleaseNotes::new(notes_client);

        Ok(Self::with_sources(
            root,
            config,
            Box::new(tags),
            Box::new(notes),
        ))
    }

    /// Create an orchestrator with custom sources (for testing)
    pub fn with_sources(
        root: impl Into<PathBuf>,
        config: Config,
        tags: Box<dyn TagSource>,
        notes: Box<dyn ReleaseNotesSource>,
    ) -> Self {
        let detector =
            LtsDetector::with_config(notes, config.lts_markers.clone(), config.lts_probe_limit);
        Self {
            root: root.into(),
            config,
            tags,
            detector,
            show_progress: false,
        }
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Check every product in order, then apply pending updates if requested
    pub async fn run(&mut self, products: &[Product], apply: bool) -> RunSummary {
        let mut progress = Progress::new(self.show_progress);
        let mut summary = RunSummary::new(apply);

        for product in products {
            progress.spinner(&format!("Checking {}...", product.name));
            let result = self.check_product(product).await;
            info!(product = %product.name, outcome = %result.outcome, "checked");
            summary.add_result(result);
        }
        progress.finish_and_clear();

        if apply && summary.pending_count() > 0 {
            let writer = PinWriter::new(&self.root, &self.config.pin_file);
            summary.applied = writer.apply_all(&summary.results);
        }

        summary
    }

    /// Check a single product
    ///
    /// Pin problems skip the network entirely. Registry failures only ever
    /// shrink the data the check works with.
    pub async fn check_product(&mut self, product: &Product) -> CheckResult {
        let pin_path = crate::pin::pin_path(&self.root, &product.name, &self.config.pin_file);

        let current = match read_pin(&pin_path) {
            Ok(Some(current)) => current,
            Ok(None) => {
                return CheckResult::unchecked(
                    &product.name,
                    &product.image,
                    pin_path,
                    CheckOutcome::PinNotDetected,
                )
            }
            Err(PinError::NotFound { .. }) => {
                return CheckResult::unchecked(
                    &product.name,
                    &product.image,
                    pin_path,
                    CheckOutcome::PinMissing,
                )
            }
            Err(e) => {
                return CheckResult::unchecked(
                    &product.name,
                    &product.image,
                    pin_path,
                    CheckOutcome::PinUnreadable(e.to_string()),
                )
            }
        };
        debug!(product = %product.name, current = %current, "read pin");

        let mut result = CheckResult::unchecked(
            &product.name,
            &product.image,
            pin_path,
            CheckOutcome::NoVersions,
        );

        let tags = self.tags.list_tags(&product.image).await;
        let versions = clean_versions(&tags);
        debug!(
            product = %product.name,
            registry = self.tags.registry_name(),
            tags = tags.len(),
            clean = versions.len(),
            "listed tags"
        );

        if !versions.is_empty() {
            let selection = select_target(&mut self.detector, product, &versions).await;
            result.probes = selection.probes;
            result.outcome = match &selection.latest {
                Some(latest) => compare(&current.version, &latest.version),
                None => CheckOutcome::NoLtsBranch,
            };
            result.latest = selection.latest;
        }

        result.current = Some(current);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Branch, LtsProbe, UpdateKind};
    use crate::registry::TagInfo;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeTags {
        images: HashMap<String, Vec<&'static str>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeTags {
        fn image(mut self, image: &str, tags: Vec<&'static str>) -> Self {
            self.images.insert(image.to_string(), tags);
            self
        }
    }

    #[async_trait]
    impl TagSource for FakeTags {
        fn registry_name(&self) -> &'static str {
            "fake"
        }

        async fn list_tags(&self, image: &str) -> Vec<TagInfo> {
            self.requests.lock().unwrap().push(image.to_string());
            self.images
                .get(image)
                .map(|tags| tags.iter().map(|t| TagInfo::new(*t)).collect())
                .unwrap_or_default()
        }
    }

    #[derive(Default)]
    struct FakeNotes {
        lts_branches: Vec<&'static str>,
    }

    #[async_trait]
    impl ReleaseNotesSource for FakeNotes {
        async fn fetch(&self, url: &str) -> Result<String, RegistryError> {
            let branch = url.rsplit('/').next().unwrap_or_default();
            if self.lts_branches.contains(&branch) {
                Ok("This is a Long Term Support release".to_string())
            } else {
                Ok("Feature release".to_string())
            }
        }
    }

    fn config(products: Vec<Product>) -> Config {
        Config {
            products,
            ..Config::default()
        }
    }

    fn jira() -> Product {
        Product::lts("jira", "atlassian/jira-software", "https://notes/{version}")
    }

    fn crowd() -> Product {
        Product::latest("crowd", "atlassian/crowd")
    }

    fn write_pin(root: &TempDir, product: &str, content: &str) {
        fs::create_dir_all(root.path().join(product)).unwrap();
        fs::write(root.path().join(product).join("Dockerfile"), content).unwrap();
    }

    fn orchestrator(root: &TempDir, tags: FakeTags, notes: FakeNotes) -> Orchestrator {
        Orchestrator::with_sources(
            root.path(),
            config(vec![jira(), crowd()]),
            Box::new(tags),
            Box::new(notes),
        )
    }

    #[test]
    fn test_new_uses_config() {
        let dir = TempDir::new().unwrap();
        assert!(Orchestrator::new(dir.path(), Config::default()).is_ok());
    }

    #[tokio::test]
    async fn test_missing_pin_skips_network() {
        let dir = TempDir::new().unwrap();
        let tags = FakeTags::default();
        let requests = tags.requests.clone();
        let mut orchestrator = orchestrator(&dir, tags, FakeNotes::default());

        let result = orchestrator.check_product(&crowd()).await;

        assert_eq!(result.outcome, CheckOutcome::PinMissing);
        assert_eq!(result.pin_path, dir.path().join("crowd/Dockerfile"));
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pin_without_version() {
        let dir = TempDir::new().unwrap();
        write_pin(&dir, "crowd", "FROM atlassian/crowd:latest\n");
        let mut orchestrator = orchestrator(&dir, FakeTags::default(), FakeNotes::default());

        let result = orchestrator.check_product(&crowd()).await;
        assert_eq!(result.outcome, CheckOutcome::PinNotDetected);
    }

    #[tokio::test]
    async fn test_unreadable_pin() {
        let dir = TempDir::new().unwrap();
        // A directory in place of the pin file
        fs::create_dir_all(dir.path().join("crowd/Dockerfile")).unwrap();
        let mut orchestrator = orchestrator(&dir, FakeTags::default(), FakeNotes::default());

        let result = orchestrator.check_product(&crowd()).await;
        assert!(matches!(result.outcome, CheckOutcome::PinUnreadable(_)));
    }

    #[tokio::test]
    async fn test_no_versions_keeps_current() {
        let dir = TempDir::new().unwrap();
        write_pin(&dir, "crowd", "FROM atlassian/crowd:6.1.0\n");
        let tags = FakeTags::default().image("atlassian/crowd", vec!["latest", "6.1.2-jdk17"]);
        let mut orchestrator = orchestrator(&dir, tags, FakeNotes::default());

        let result = orchestrator.check_product(&crowd()).await;

        assert_eq!(result.outcome, CheckOutcome::NoVersions);
        assert_eq!(result.current.unwrap().tag, "6.1.0");
        assert!(result.latest.is_none());
    }

    #[tokio::test]
    async fn test_latest_product_patch_update() {
        let dir = TempDir::new().unwrap();
        write_pin(&dir, "crowd", "FROM atlassian/crowd:6.1.0\n");
        let tags = FakeTags::default().image("atlassian/crowd", vec!["6.1.2", "6.1.1", "latest"]);
        let mut orchestrator = orchestrator(&dir, tags, FakeNotes::default());

        let result = orchestrator.check_product(&crowd()).await;

        assert_eq!(result.outcome, CheckOutcome::Update(UpdateKind::Patch));
        assert_eq!(result.latest.unwrap().tag, "6.1.2");
        assert!(result.probes.is_empty());
    }

    #[tokio::test]
    async fn test_lts_product_branch_update() {
        let dir = TempDir::new().unwrap();
        write_pin(&dir, "jira", "FROM atlassian/jira-software:9.4.10\n");
        let tags = FakeTags::default().image(
            "atlassian/jira-software",
            vec!["10.0.1", "9.12.4", "9.12.3", "9.4.10"],
        );
        let notes = FakeNotes {
            lts_branches: vec!["9.12", "9.4"],
        };
        let mut orchestrator = orchestrator(&dir, tags, notes);

        let result = orchestrator.check_product(&jira()).await;

        assert_eq!(result.outcome, CheckOutcome::Update(UpdateKind::Branch));
        assert_eq!(result.latest.as_ref().unwrap().tag, "9.12.4");
        assert_eq!(
            result.probes,
            vec![
                LtsProbe {
                    branch: Branch::new(10, 0),
                    is_lts: false,
                },
                LtsProbe {
                    branch: Branch::new(9, 12),
                    is_lts: true,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_lts_product_without_lts_branch() {
        let dir = TempDir::new().unwrap();
        write_pin(&dir, "jira", "FROM atlassian/jira-software:9.4.10\n");
        let tags = FakeTags::default().image("atlassian/jira-software", vec!["10.0.1", "9.12.4"]);
        let mut orchestrator = orchestrator(&dir, tags, FakeNotes::default());

        let result = orchestrator.check_product(&jira()).await;

        assert_eq!(result.outcome, CheckOutcome::NoLtsBranch);
        assert!(result.latest.is_none());
        assert!(!result.needs_update());
    }

    #[tokio::test]
    async fn test_run_without_apply_leaves_files() {
        let dir = TempDir::new().unwrap();
        write_pin(&dir, "crowd", "FROM atlassian/crowd:6.1.0\n");
        let tags = FakeTags::default().image("atlassian/crowd", vec!["6.1.2"]);
        let mut orchestrator = orchestrator(&dir, tags, FakeNotes::default());

        let summary = orchestrator.run(&[jira(), crowd()], false).await;

        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.results[0].outcome, CheckOutcome::PinMissing);
        assert_eq!(summary.pending_count(), 1);
        assert!(summary.applied.is_empty());
        assert!(!summary.is_success());
        assert_eq!(
            fs::read_to_string(dir.path().join("crowd/Dockerfile")).unwrap(),
            "FROM atlassian/crowd:6.1.0\n"
        );
    }

    #[tokio::test]
    async fn test_run_with_apply() {
        let dir = TempDir::new().unwrap();
        write_pin(&dir, "jira", "FROM atlassian/jira-software:9.4.10\n");
        write_pin(&dir, "crowd", "FROM atlassian/crowd:6.1.0\n");
        let tags = FakeTags::default()
            .image("atlassian/jira-software", vec!["9.12.4", "9.4.10"])
            .image("atlassian/crowd", vec!["6.1.2"]);
        let notes = FakeNotes {
            lts_branches: vec!["9.12"],
        };
        let mut orchestrator = orchestrator(&dir, tags, notes);

        let summary = orchestrator.run(&[jira(), crowd()], true).await;

        assert_eq!(summary.applied.len(), 2);
        assert!(summary.is_success());
        assert_eq!(
            fs::read_to_string(dir.path().join("jira/9.4/Dockerfile")).unwrap(),
            "FROM atlassian/jira-software:9.4.10\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("jira/Dockerfile")).unwrap(),
            "FROM atlassian/jira-software:9.12.4\n"
        );
        assert!(!dir.path().join("crowd/6.1").exists());
    }

    #[tokio::test]
    async fn test_run_nothing_pending_is_success() {
        let dir = TempDir::new().unwrap();
        write_pin(&dir, "crowd", "FROM atlassian/crowd:6.1.2\n");
        let tags = FakeTags::default().image("atlassian/crowd", vec!["6.1.2", "6.1.0"]);
        let mut orchestrator = orchestrator(&dir, tags, FakeNotes::default());

        let summary = orchestrator.run(&[crowd()], false).await;

        assert_eq!(summary.results[0].outcome, CheckOutcome::UpToDate);
        assert!(summary.is_success());
    }
}
