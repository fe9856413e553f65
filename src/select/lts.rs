//! LTS branch discovery
//!
//! A branch counts as LTS when its release notes page mentions one of the
//! marker phrases. Branches are probed newest first, up to a fixed limit,
//! and verdicts are cached per (product, branch) for the whole run.

use super::{latest_in_branch, unique_branches, Selection};
use crate::domain::{Branch, LtsProbe, Product, TaggedVersion};
use crate::registry::ReleaseNotesSource;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Phrases that mark a release notes page as an LTS release
pub const DEFAULT_LTS_MARKERS: &[&str] = &[
    "long term support",
    "long-term support",
    "lts release",
    "is a lts",
];

/// Maximum number of branches probed per product
pub const DEFAULT_PROBE_LIMIT: usize = 5;

/// Discovers LTS branches from release notes pages
pub struct LtsDetector {
    source: Box<dyn ReleaseNotesSource>,
    /// Lowercased marker phrases
    markers: Vec<String>,
    probe_limit: usize,
    cache: HashMap<(String, Branch), bool>,
}

impl LtsDetector {
    /// Create a detector with the default markers and probe limit
    pub fn new(source: Box<dyn ReleaseNotesSource>) -> Self {
        Self::with_config(
            source,
            DEFAULT_LTS_MARKERS.iter().map(|m| m.to_string()).collect(),
            DEFAULT_PROBE_LIMIT,
        )
    }

    /// Create a detector with custom markers and probe limit
    pub fn with_config(
        source: Box<dyn ReleaseNotesSource>,
        markers: Vec<String>,
        probe_limit: usize,
    ) -> Self {
        Self {
            source,
            markers: markers.into_iter().map(|m| m.to_lowercase()).collect(),
            probe_limit,
            cache: HashMap::new(),
        }
    }

    /// Returns true if the page body contains any marker (case-insensitive)
    pub fn is_lts_page(&self, body: &str) -> bool {
        let body = body.to_lowercase();
        self.markers.iter().any(|marker| body.contains(marker.as_str()))
    }

    /// Cached verdict for a branch, if it was probed during this run
    pub fn cached(&self, product: &str, branch: Branch) -> Option<bool> {
        self.cache.get(&(product.to_string(), branch)).copied()
    }

    /// Check whether a branch is LTS, fetching its release notes at most once
    ///
    /// A failed fetch counts as "not LTS".
    pub async fn is_lts(&mut self, product: &Product, branch: Branch) -> bool {
        let key = (product.name.clone(), branch);
        if let Some(&verdict) = self.cache.get(&key) {
            debug!(product = %product.name, %branch, verdict, "LTS verdict from cache");
            return verdict;
        }

        let verdict = match product.release_notes_url(branch) {
            None => false,
            Some(url) => match self.source.fetch(&url).await {
                Ok(body) => self.is_lts_page(&body),
                Err(e) => {
                    warn!(product = %product.name, %branch, error = %e, "notes unavailable");
                    false
                }
            },
        };

        debug!(product = %product.name, %branch, verdict, "probed release notes");
        self.cache.insert(key, verdict);
        verdict
    }

    /// Latest version of the newest LTS branch among the given versions
    ///
    /// Only the `probe_limit` newest branches are probed. When none of them
    /// is LTS the selection is empty; it never falls back to the newest
    /// non-LTS release.
    pub async fn find_latest_lts(
        &mut self,
        product: &Product,
        versions: &[TaggedVersion],
    ) -> Selection {
        let mut selection = Selection::default();

        for branch in unique_branches(versions).into_iter().take(self.probe_limit) {
            let is_lts = self.is_lts(product, branch).await;
            selection.probes.push(LtsProbe { branch, is_lts });

            if is_lts {
                selection.latest = latest_in_branch(versions, branch).cloned();
                info!(product = %product.name, %branch, "found LTS branch");
                return selection;
            }
        }

        info!(
            product = %product.name,
            probed = selection.probes.len(),
            "no LTS branch found"
        );
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::registry::TagInfo;
    use crate::select::clean_versions;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Release notes served from memory; unknown URLs fail
    #[derive(Clone, Default)]
    struct FakeNotes {
        pages: HashMap<String, String>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeNotes {
        fn page(mut self, branch: &str, body: &str) -> Self {
            self.pages.insert(url(branch), body.to_string());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReleaseNotesSource for FakeNotes {
        async fn fetch(&self, url: &str) -> Result<String, RegistryError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| RegistryError::not_found(url, "release notes"))
        }
    }

    fn url(branch: &str) -> String {
        format!("https://notes.example/{}", branch)
    }

    fn product() -> Product {
        Product::lts(
            "jira",
            "atlassian/jira-software",
            "https://notes.example/{version}",
        )
    }

    fn versions(names: &[&str]) -> Vec<TaggedVersion> {
        let tags: Vec<TagInfo> = names.iter().map(|n| TagInfo::new(*n)).collect();
        clean_versions(&tags)
    }

    #[test]
    fn test_is_lts_page_case_insensitive() {
        let detector = LtsDetector::new(Box::new(FakeNotes::default()));
        assert!(detector.is_lts_page("Jira 9.12 is a <b>Long Term Support</b> release"));
        assert!(detector.is_lts_page("LONG-TERM SUPPORT"));
        assert!(detector.is_lts_page("This is an LTS Release."));
        assert!(detector.is_lts_page("9.4 is a LTS"));
        assert!(!detector.is_lts_page("Feature release with new dashboards"));
    }

    #[test]
    fn test_custom_markers_are_lowercased() {
        let detector = LtsDetector::with_config(
            Box::new(FakeNotes::default()),
            vec!["Enterprise Release".into()],
            5,
        );
        assert!(detector.is_lts_page("an ENTERPRISE release"));
        assert!(!detector.is_lts_page("long term support"));
    }

    #[tokio::test]
    async fn test_selects_newest_lts_branch() {
        let notes = FakeNotes::default()
            .page("10.0", "Platform release")
            .page("9.12", "Jira 9.12 is a Long Term Support release");
        let mut detector = LtsDetector::new(Box::new(notes.clone()));

        let selection = detector
            .find_latest_lts(
                &product(),
                &versions(&["10.0.1", "9.12.4", "9.12.2", "9.4.10"]),
            )
            .await;

        assert_eq!(selection.latest.unwrap().tag, "9.12.4");
        assert_eq!(
            selection.probes,
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
        assert_eq!(notes.requests(), vec![url("10.0"), url("9.12")]);
    }

    #[tokio::test]
    async fn test_failed_probe_is_not_lts() {
        // 10.0 has no page, so the fetch fails
        let notes = FakeNotes::default().page("9.12", "long-term support");
        let mut detector = LtsDetector::new(Box::new(notes));

        let selection = detector
            .find_latest_lts(&product(), &versions(&["10.0.1", "9.12.4"]))
            .await;

        assert_eq!(selection.latest.unwrap().tag, "9.12.4");
        assert!(!selection.probes[0].is_lts);
    }

    #[tokio::test]
    async fn test_probe_limit_gives_no_selection() {
        // Only the sixth-newest branch is LTS, beyond the limit
        let notes = FakeNotes::default().page("1.0", "long term support");
        let mut detector = LtsDetector::new(Box::new(notes.clone()));

        let selection = detector
            .find_latest_lts(
                &product(),
                &versions(&["6.0.0", "5.0.0", "4.0.0", "3.0.0", "2.0.0", "1.0.0"]),
            )
            .await;

        assert!(selection.latest.is_none());
        assert_eq!(selection.probes.len(), 5);
        assert!(selection.probes.iter().all(|p| !p.is_lts));
        assert!(!notes.requests().contains(&url("1.0")));
    }

    #[tokio::test]
    async fn test_probe_limit_is_configurable() {
        let notes = FakeNotes::default();
        let mut detector = LtsDetector::with_config(
            Box::new(notes.clone()),
            vec!["long term support".into()],
            2,
        );

        let selection = detector
            .find_latest_lts(&product(), &versions(&["3.0.0", "2.0.0", "1.0.0"]))
            .await;

        assert!(selection.latest.is_none());
        assert_eq!(notes.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_verdicts_are_cached() {
        let notes = FakeNotes::default().page("9.12", "long term support");
        let mut detector = LtsDetector::new(Box::new(notes.clone()));
        let product = product();

        assert!(detector.is_lts(&product, Branch::new(9, 12)).await);
        assert!(detector.is_lts(&product, Branch::new(9, 12)).await);
        assert!(!detector.is_lts(&product, Branch::new(10, 0)).await);
        assert!(!detector.is_lts(&product, Branch::new(10, 0)).await);

        assert_eq!(notes.requests(), vec![url("9.12"), url("10.0")]);
        assert_eq!(detector.cached("jira", Branch::new(9, 12)), Some(true));
        assert_eq!(detector.cached("jira", Branch::new(10, 0)), Some(false));
        assert_eq!(detector.cached("confluence", Branch::new(9, 12)), None);
    }

    #[tokio::test]
    async fn test_cache_is_per_product() {
        let notes = FakeNotes::default().page("9.12", "long term support");
        let mut detector = LtsDetector::new(Box::new(notes.clone()));

        let jira = product();
        let mut other = product();
        other.name = "jira-mirror".to_string();

        detector.is_lts(&jira, Branch::new(9, 12)).await;
        detector.is_lts(&other, Branch::new(9, 12)).await;

        assert_eq!(notes.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_product_without_template_is_never_lts() {
        let notes = FakeNotes::default();
        let mut detector = LtsDetector::new(Box::new(notes.clone()));
        let mut product = product();
        product.release_notes = None;

        assert!(!detector.is_lts(&product, Branch::new(9, 12)).await);
        assert!(notes.requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_versions_no_probes() {
        let notes = FakeNotes::default();
        let mut detector = LtsDetector::new(Box::new(notes.clone()));

        let selection = detector.find_latest_lts(&product(), &[]).await;

        assert_eq!(selection, Selection::default());
        assert!(notes.requests().is_empty());
    }
}
