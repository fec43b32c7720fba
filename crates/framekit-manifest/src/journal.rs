// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Move journal — a JSON record of one applied split.
//
// The journal lists every relocation and fingerprints the input manifest as
// read and the two manifests as written. When the input manifest on disk
// still hashes to the recorded `remaining_sha256`, the split it describes has
// already been applied, and running it again would move a fresh sample out
// of the shrunk manifest.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use framekit_core::SplitRole;
use framekit_core::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::integrity::{fingerprint, matches_fingerprint};
use crate::partition::{MoveEntry, MoveStatus};
use crate::store::{to_pretty_bytes, write_atomic};

/// Suffix appended to the split manifest path to name its journal.
pub const JOURNAL_SUFFIX: &str = ".moves.json";

/// Persistent record of one applied split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub role: SplitRole,
    pub created_at: DateTime<Utc>,
    pub seed: u64,
    /// SHA-256 of the input manifest before the split.
    pub source_sha256: String,
    /// SHA-256 of the remaining manifest written over the input.
    pub remaining_sha256: String,
    /// SHA-256 of the split manifest.
    pub split_sha256: String,
    pub moves: Vec<MoveEntry>,
}

impl MoveRecord {
    pub fn new(
        role: SplitRole,
        seed: u64,
        source_bytes: &[u8],
        remaining_bytes: &[u8],
        split_bytes: &[u8],
        moves: Vec<MoveEntry>,
    ) -> Self {
        Self {
            role,
            created_at: Utc::now(),
            seed,
            source_sha256: fingerprint(source_bytes),
            remaining_sha256: fingerprint(remaining_bytes),
            split_sha256: fingerprint(split_bytes),
            moves,
        }
    }

    /// Whether `input_bytes` is the remaining manifest this split wrote.
    pub fn is_applied_to(&self, input_bytes: &[u8]) -> bool {
        matches_fingerprint(input_bytes, &self.remaining_sha256)
    }

    pub fn moved_count(&self) -> usize {
        self.moves
            .iter()
            .filter(|m| m.status == MoveStatus::Moved)
            .count()
    }

    /// Read the journal at `path`, or `None` when there is none.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(path)?;
        let record: Self = serde_json::from_slice(&bytes)?;
        debug!(moves = record.moves.len(), "journal loaded");
        Ok(Some(record))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_atomic(path, &to_pretty_bytes(self)?)
    }
}

/// Journal path used when none is given: `<split manifest>.moves.json`.
pub fn default_journal_path(split_manifest: &Path) -> PathBuf {
    let mut name = split_manifest.as_os_str().to_owned();
    name.push(JOURNAL_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: MoveStatus) -> MoveEntry {
        MoveEntry {
            from: PathBuf::from("train/3.png"),
            to: PathBuf::from("test/3.png"),
            new_path: "./test/3".into(),
            status,
        }
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transforms_test.json.moves.json");
        let record = MoveRecord::new(
            SplitRole::Test,
            0,
            b"before",
            b"after",
            b"split",
            vec![entry(MoveStatus::Moved), entry(MoveStatus::SourceMissing)],
        );
        record.save(&path).unwrap();

        let loaded = MoveRecord::load(&path).unwrap().unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.moved_count(), 1);
    }

    #[test]
    fn missing_journal_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MoveRecord::load(dir.path().join("nope.json")).unwrap().is_none());
    }

    #[test]
    fn applied_detection() {
        let record = MoveRecord::new(SplitRole::Val, 1, b"before", b"after", b"split", vec![]);
        assert!(record.is_applied_to(b"after"));
        assert!(!record.is_applied_to(b"before"));
    }

    #[test]
    fn statuses_serialize_snake_case() {
        let text = serde_json::to_string(&entry(MoveStatus::SourceMissing)).unwrap();
        assert!(text.contains("\"source_missing\""));
    }

    #[test]
    fn default_path_appends_suffix() {
        assert_eq!(
            default_journal_path(Path::new("out/transforms_val.json")),
            PathBuf::from("out/transforms_val.json.moves.json")
        );
    }
}
