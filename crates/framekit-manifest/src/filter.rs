// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Manifest cleanup — drop frames whose image file is gone.

use std::path::{Path, PathBuf};

use framekit_core::Manifest;
use tracing::{debug, info, instrument};

use crate::resolver::PathResolver;

/// Result of a cleanup pass.
#[derive(Debug, Clone)]
pub struct FilterReport {
    /// The manifest with only the frames whose image exists.
    pub manifest: Manifest,
    /// Frame count before filtering.
    pub original_count: usize,
    /// Resolved disk path of every dropped frame, in manifest order.
    pub removed: Vec<PathBuf>,
}

impl FilterReport {
    pub fn kept_count(&self) -> usize {
        self.manifest.len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Drops manifest frames whose resolved image path does not exist.
///
/// Only checks for existence; the filesystem is never modified. Removing
/// every frame is a valid outcome, not an error.
#[derive(Debug, Clone, Default)]
pub struct ManifestFilter {
    resolver: PathResolver,
}

impl ManifestFilter {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    #[instrument(skip_all, fields(base = %base_folder.as_ref().display(), frames = manifest.len()))]
    pub fn filter(&self, manifest: Manifest, base_folder: impl AsRef<Path>) -> FilterReport {
        let base_folder = base_folder.as_ref();
        let original_count = manifest.len();
        let (metadata, frames) = manifest.into_parts();

        let mut kept = Vec::with_capacity(frames.len());
        let mut removed = Vec::new();
        for frame in frames {
            let resolved = self.resolver.resolve(&frame.file_path, base_folder);
            if resolved.disk_path.exists() {
                kept.push(frame);
            } else {
                debug!(path = %resolved.disk_path.display(), "frame removed, missing file");
                removed.push(resolved.disk_path);
            }
        }

        info!(
            original = original_count,
            kept = kept.len(),
            removed = removed.len(),
            "cleanup complete"
        );

        FilterReport {
            manifest: Manifest::new(metadata, kept),
            original_count,
            removed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framekit_core::Frame;
    use serde_json::json;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"png").unwrap();
    }

    #[test]
    fn keeps_only_existing_frames() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("train/0.png"));
        touch(&dir.path().join("train/2.png"));

        let manifest = Manifest::from_value(json!({
            "fl_x": 500.0,
            "frames": [
                { "file_path": "./train/0" },
                { "file_path": "./train/1" },
                { "file_path": "./train/2" }
            ]
        }))
        .unwrap();

        let report = ManifestFilter::default().filter(manifest, dir.path());
        assert_eq!(report.original_count, 3);
        assert_eq!(report.kept_count(), 2);
        assert_eq!(report.removed, vec![dir.path().join("train/1.png")]);
        let kept: Vec<_> = report
            .manifest
            .frames()
            .iter()
            .map(|f| f.file_path.as_str())
            .collect();
        assert_eq!(kept, vec!["./train/0", "./train/2"]);
        assert_eq!(report.manifest.metadata()["fl_x"], json!(500.0));
    }

    #[test]
    fn explicit_extension_must_match_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("train/0.png"));

        let manifest = Manifest::new(
            serde_json::Map::new(),
            vec![Frame::new("./train/0.jpg"), Frame::new("./train/0.png")],
        );
        let report = ManifestFilter::default().filter(manifest, dir.path());
        assert_eq!(report.kept_count(), 1);
        assert_eq!(report.manifest.frames()[0].file_path, "./train/0.png");
    }

    #[test]
    fn frame_without_file_path_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("train/0.png"));
        let manifest = Manifest::from_value(json!({
            "frames": [{ "file_path": "./train/0" }, { "transform_matrix": [] }]
        }))
        .unwrap();

        let report = ManifestFilter::default().filter(manifest, dir.path());
        assert_eq!(report.kept_count(), 1);
        assert_eq!(report.removed, vec![dir.path().join(".png")]);
    }

    #[test]
    fn removing_everything_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::new(
            serde_json::Map::new(),
            vec![Frame::new("a"), Frame::new("b")],
        );
        let report = ManifestFilter::default().filter(manifest, dir.path());
        assert!(report.manifest.is_empty());
        assert_eq!(report.removed_count(), 2);
    }

    #[test]
    fn filesystem_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("train/0.png"));
        let manifest = Manifest::new(serde_json::Map::new(), vec![Frame::new("./train/0")]);
        let _ = ManifestFilter::default().filter(manifest, dir.path());
        assert!(dir.path().join("train/0.png").exists());
    }
}
