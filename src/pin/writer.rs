//! Pin file archival and rewriting
//!
//! This module provides:
//! - Archival of the current pin file into a `<branch>/` subdirectory
//! - Rewriting of the pinned tag to the selected tag
//! - Archive-then-rewrite application of a check result

use crate::domain::{ApplyResult, Branch, CheckResult};
use crate::error::PinError;
use crate::pin::pin_path;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writer that applies selected versions to pin files
pub struct PinWriter {
    /// Directory holding one subdirectory per product
    root: PathBuf,
    /// Pin file name inside each product directory
    pin_file: String,
}

impl PinWriter {
    /// Create a new PinWriter
    pub fn new(root: impl Into<PathBuf>, pin_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            pin_file: pin_file.into(),
        }
    }

    /// Path of a product's pin file
    pub fn pin_path(&self, product: &str) -> PathBuf {
        pin_path(&self.root, product, &self.pin_file)
    }

    /// Copy the product's pin file into `<product>/<branch>/`
    ///
    /// Creates the branch directory if needed and overwrites an earlier archive.
    pub fn archive(&self, product: &str, branch: Branch) -> Result<PathBuf, PinError> {
        let source = self.pin_path(product);
        if !source.is_file() {
            return Err(PinError::not_found(&source));
        }

        let archive_dir = self.root.join(product).join(branch.to_string());
        let target = archive_dir.join(&self.pin_file);

        fs::create_dir_all(&archive_dir)
            .map_err(|e| PinError::archive_error(&source, &archive_dir, e))?;
        fs::copy(&source, &target).map_err(|e| PinError::archive_error(&source, &target, e))?;

        info!(product, %branch, target = %target.display(), "archived pin file");
        Ok(target)
    }

    /// Replace every `:<old_tag>` in the pin file with `:<new_tag>`
    ///
    /// The file is left untouched when the old tag does not occur.
    pub fn rewrite(&self, path: &Path, old_tag: &str, new_tag: &str) -> Result<(), PinError> {
        let content = fs::read_to_string(path).map_err(|e| PinError::read_error(path, e))?;

        let needle = format!(":{}", old_tag);
        if !content.contains(&needle) {
            return Err(PinError::version_not_found(path, old_tag));
        }

        let updated = content.replace(&needle, &format!(":{}", new_tag));
        fs::write(path, updated).map_err(|e| PinError::write_error(path, e))?;

        debug!(path = %path.display(), old_tag, new_tag, "rewrote pin");
        Ok(())
    }

    /// Apply a pending update: archive first on a branch change, then rewrite
    ///
    /// A failed archive leaves the pin file untouched.
    pub fn apply(&self, result: &CheckResult) -> ApplyResult {
        let (current, latest) = match (&result.current, &result.latest) {
            (Some(current), Some(latest)) if result.needs_update() => (current, latest),
            _ => {
                return ApplyResult::new(&result.product, "", "")
                    .fail(format!("no pending update ({})", result.outcome));
            }
        };

        let mut applied = ApplyResult::new(&result.product, &current.tag, &latest.tag);

        if result.major_minor_change() {
            match self.archive(&result.product, current.branch()) {
                Ok(target) => applied.archived_to = Some(target),
                Err(e) => return applied.fail(e.to_string()),
            }
        }

        match self.rewrite(&result.pin_path, &current.tag, &latest.tag) {
            Ok(()) => {
                applied.rewritten = true;
                applied
            }
            Err(e) => applied.fail(e.to_string()),
        }
    }

    /// Apply every pending update in order
    pub fn apply_all<'a>(
        &self,
        results: impl IntoIterator<Item = &'a CheckResult>,
    ) -> Vec<ApplyResult> {
        results
            .into_iter()
            .filter(|r| r.needs_update())
            .map(|r| self.apply(r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CheckOutcome, TaggedVersion, UpdateKind};
    use tempfile::TempDir;

    fn setup(product: &str, content: &str) -> (TempDir, PinWriter) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(product)).unwrap();
        fs::write(dir.path().join(product).join("Dockerfile"), content).unwrap();
        let writer = PinWriter::new(dir.path(), "Dockerfile");
        (dir, writer)
    }

    fn pending(writer: &PinWriter, product: &str, current: &str, latest: &str) -> CheckResult {
        let current = TaggedVersion::parse(current).unwrap();
        let latest = TaggedVersion::parse(latest).unwrap();
        let kind = if current.branch() == latest.branch() {
            UpdateKind::Patch
        } else {
            UpdateKind::Branch
        };
        CheckResult {
            product: product.to_string(),
            image: format!("atlassian/{}", product),
            pin_path: writer.pin_path(product),
            current: Some(current),
            latest: Some(latest),
            probes: Vec::new(),
            outcome: CheckOutcome::Update(kind),
        }
    }

    #[test]
    fn test_archive_creates_branch_directory() {
        let (dir, writer) = setup("jira", "FROM atlassian/jira-software:9.4.10\n");

        let target = writer.archive("jira", Branch::new(9, 4)).unwrap();

        assert_eq!(target, dir.path().join("jira/9.4/Dockerfile"));
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "FROM atlassian/jira-software:9.4.10\n"
        );
    }

    #[test]
    fn test_archive_overwrites_existing() {
        let (dir, writer) = setup("jira", "FROM atlassian/jira-software:9.4.12\n");
        fs::create_dir_all(dir.path().join("jira/9.4")).unwrap();
        fs::write(dir.path().join("jira/9.4/Dockerfile"), "old").unwrap();

        let target = writer.archive("jira", Branch::new(9, 4)).unwrap();

        assert_eq!(
            fs::read_to_string(target).unwrap(),
            "FROM atlassian/jira-software:9.4.12\n"
        );
    }

    #[test]
    fn test_archive_missing_pin_file() {
        let dir = TempDir::new().unwrap();
        let writer = PinWriter::new(dir.path(), "Dockerfile");
        let result = writer.archive("jira", Branch::new(9, 4));
        assert!(matches!(result, Err(PinError::NotFound { .. })));
    }

    #[test]
    fn test_rewrite_replaces_tag() {
        let (_dir, writer) = setup("crowd", "FROM atlassian/crowd:6.1.0\nUSER crowd\n");
        let path = writer.pin_path("crowd");

        writer.rewrite(&path, "6.1.0", "6.1.2").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "FROM atlassian/crowd:6.1.2\nUSER crowd\n"
        );
    }

    #[test]
    fn test_rewrite_missing_tag_leaves_file() {
        let (_dir, writer) = setup("crowd", "FROM atlassian/crowd:6.1.0\n");
        let path = writer.pin_path("crowd");

        let result = writer.rewrite(&path, "5.0.0", "6.1.2");

        assert!(matches!(result, Err(PinError::VersionNotFound { .. })));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "FROM atlassian/crowd:6.1.0\n"
        );
    }

    #[test]
    fn test_apply_patch_update_does_not_archive() {
        let (dir, writer) = setup("jira", "FROM atlassian/jira-software:9.12.1\n");
        let result = pending(&writer, "jira", "9.12.1", "9.12.4");

        let applied = writer.apply(&result);

        assert!(applied.succeeded());
        assert!(applied.archived_to.is_none());
        assert!(!dir.path().join("jira/9.12").exists());
        assert_eq!(
            fs::read_to_string(writer.pin_path("jira")).unwrap(),
            "FROM atlassian/jira-software:9.12.4\n"
        );
    }

    #[test]
    fn test_apply_branch_update_archives_old_pin() {
        let (dir, writer) = setup("jira", "FROM atlassian/jira-software:9.4.10\n");
        let result = pending(&writer, "jira", "9.4.10", "9.12.4");

        let applied = writer.apply(&result);

        assert!(applied.succeeded());
        assert_eq!(applied.from, "9.4.10");
        assert_eq!(applied.to, "9.12.4");
        assert_eq!(
            applied.archived_to,
            Some(dir.path().join("jira/9.4/Dockerfile"))
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("jira/9.4/Dockerfile")).unwrap(),
            "FROM atlassian/jira-software:9.4.10\n"
        );
        assert_eq!(
            fs::read_to_string(writer.pin_path("jira")).unwrap(),
            "FROM atlassian/jira-software:9.12.4\n"
        );
    }

    #[test]
    fn test_apply_failed_archive_skips_rewrite() {
        let (dir, writer) = setup("jira", "FROM atlassian/jira-software:9.4.10\n");
        // A regular file where the archive directory should go
        fs::write(dir.path().join("jira/9.4"), "blocker").unwrap();
        let result = pending(&writer, "jira", "9.4.10", "9.12.4");

        let applied = writer.apply(&result);

        assert!(!applied.succeeded());
        assert!(!applied.rewritten);
        assert!(applied.error.unwrap().contains("failed to archive"));
        assert_eq!(
            fs::read_to_string(writer.pin_path("jira")).unwrap(),
            "FROM atlassian/jira-software:9.4.10\n"
        );
    }

    #[test]
    fn test_apply_without_pending_update() {
        let (_dir, writer) = setup("crowd", "FROM atlassian/crowd:6.1.0\n");
        let mut result = pending(&writer, "crowd", "6.1.0", "6.1.2");
        result.outcome = CheckOutcome::UpToDate;

        let applied = writer.apply(&result);

        assert!(!applied.succeeded());
        assert_eq!(
            fs::read_to_string(writer.pin_path("crowd")).unwrap(),
            "FROM atlassian/crowd:6.1.0\n"
        );
    }

    #[test]
    fn test_apply_all_only_pending() {
        let (dir, writer) = setup("crowd", "FROM atlassian/crowd:6.1.0\n");
        fs::create_dir_all(dir.path().join("jira")).unwrap();
        fs::write(
            writer.pin_path("jira"),
            "FROM atlassian/jira-software:9.12.4\n",
        )
        .unwrap();

        let mut up_to_date = pending(&writer, "jira", "9.12.4", "9.12.4");
        up_to_date.outcome = CheckOutcome::UpToDate;
        let results = vec![up_to_date, pending(&writer, "crowd", "6.1.0", "6.1.2")];

        let applied = writer.apply_all(&results);

        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].product, "crowd");
        assert!(applied[0].succeeded());
    }
}
