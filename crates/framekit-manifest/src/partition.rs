// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Manifest partitioning — carve a random subset of frames out of a manifest,
// move their images into a destination folder, and rewrite their paths.
//
// The work happens in two phases:
//
//   plan     pure: sample indices, split frames, compute every move and
//            rewritten path. Invalid requests fail here, before any I/O.
//   execute  pre-flight checks, then the moves. A failed move puts back
//            everything moved so far.
//
// Nothing in this module writes manifests. The caller gets the remaining
// manifest, the split manifest, and the list of moves, and decides how to
// persist them.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use framekit_core::error::{FramekitError, Result};
use framekit_core::{Manifest, MissingFilePolicy};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::resolver::{PathResolver, normalize};

/// Draw `count` distinct indices uniformly from `[0, total)`.
///
/// The result depends only on `total`, `count`, and the state of `rng`, so
/// a seeded generator reproduces the same selection.
pub fn select_indices<R: Rng + ?Sized>(
    total: usize,
    count: usize,
    rng: &mut R,
) -> Result<BTreeSet<usize>> {
    if total == 0 {
        return Err(FramekitError::EmptyManifest);
    }
    if count > total {
        return Err(FramekitError::SplitTooLarge {
            requested: count,
            available: total,
        });
    }
    Ok(rand::seq::index::sample(rng, total, count)
        .into_iter()
        .collect())
}

/// One file relocation computed by the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// Path the frame declared before the split.
    pub original_path: String,
    /// Path the frame declares after the split.
    pub new_path: String,
    /// Resolved image location before the move.
    pub source: PathBuf,
    /// Image location after the move.
    pub destination: PathBuf,
}

/// Everything a split will do, computed without touching the disk.
#[derive(Debug, Clone)]
pub struct PartitionPlan {
    /// Frames that stay, in their original relative order.
    pub remaining: Manifest,
    /// Selected frames with rewritten paths, in their original relative order.
    pub split: Manifest,
    /// One move per split frame, in the same order as `split`.
    pub moves: Vec<PlannedMove>,
    /// Indices (into the input frame list) that were selected.
    pub selected: BTreeSet<usize>,
    /// Folder the selected images move into.
    pub destination_folder: PathBuf,
}

/// What happened to one selected frame's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStatus {
    /// The file was moved to its destination.
    Moved,
    /// The source file did not exist; only the manifest path was rewritten.
    SourceMissing,
    /// Source and destination are the same file; nothing to move.
    InPlace,
}

/// Record of one executed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
    pub from: PathBuf,
    pub to: PathBuf,
    pub new_path: String,
    pub status: MoveStatus,
}

/// The three artifacts a split produces. Persisting them is up to the caller.
#[derive(Debug, Clone)]
pub struct PartitionOutcome {
    pub remaining: Manifest,
    pub split: Manifest,
    pub moves: Vec<MoveEntry>,
}

impl PartitionOutcome {
    pub fn moved_count(&self) -> usize {
        self.count(MoveStatus::Moved)
    }

    pub fn missing_count(&self) -> usize {
        self.count(MoveStatus::SourceMissing)
    }

    fn count(&self, status: MoveStatus) -> usize {
        self.moves.iter().filter(|m| m.status == status).count()
    }
}

/// Splits manifests into remaining and split-off halves. The same operation
/// serves both test and validation splits; only the destination differs.
#[derive(Debug, Clone, Default)]
pub struct Partitioner {
    resolver: PathResolver,
    policy: MissingFilePolicy,
}

impl Partitioner {
    pub fn new(resolver: PathResolver, policy: MissingFilePolicy) -> Self {
        Self { resolver, policy }
    }

    pub fn policy(&self) -> MissingFilePolicy {
        self.policy
    }

    /// Plan a split of `count` frames into `destination_folder`.
    ///
    /// Frame images are resolved under `base_folder`. Fails with
    /// `EmptyManifest` or `SplitTooLarge` when the request cannot be met.
    #[instrument(skip(self, manifest, rng), fields(frames = manifest.len()))]
    pub fn plan<R: Rng + ?Sized>(
        &self,
        manifest: Manifest,
        count: usize,
        base_folder: &Path,
        destination_folder: &Path,
        rng: &mut R,
    ) -> Result<PartitionPlan> {
        let selected = select_indices(manifest.len(), count, rng)?;
        let (metadata, frames) = manifest.into_parts();

        let mut split_frames = Vec::with_capacity(count);
        let mut remaining_frames = Vec::with_capacity(frames.len() - count);
        for (index, frame) in frames.into_iter().enumerate() {
            if selected.contains(&index) {
                split_frames.push(frame);
            } else {
                remaining_frames.push(frame);
            }
        }

        let mut moves = Vec::with_capacity(split_frames.len());
        for frame in &mut split_frames {
            let resolved = self.resolver.resolve(&frame.file_path, base_folder);
            let destination = normalize(&destination_folder.join(resolved.file_name()));
            let new_path =
                self.resolver
                    .relocated_path(&resolved, destination_folder, base_folder);

            moves.push(PlannedMove {
                original_path: std::mem::replace(&mut frame.file_path, new_path.clone()),
                new_path,
                source: resolved.disk_path,
                destination,
            });
        }

        debug!(
            selected = split_frames.len(),
            remaining = remaining_frames.len(),
            "split planned"
        );

        Ok(PartitionPlan {
            remaining: Manifest::new(metadata.clone(), remaining_frames),
            split: Manifest::new(metadata, split_frames),
            moves,
            selected,
            destination_folder: destination_folder.to_path_buf(),
        })
    }

    /// Carry out `plan`, moving files on disk.
    pub fn execute(&self, plan: PartitionPlan) -> Result<PartitionOutcome> {
        self.execute_with(plan, move_file)
    }

    /// Carry out `plan` using `mover` for each relocation.
    ///
    /// Pre-flight runs before anything is touched: in strict mode every
    /// source must exist, and no destination may be claimed twice or already
    /// hold a different file. If a move fails, moves already made are undone
    /// in reverse order and `MoveFailed` is returned.
    #[instrument(skip_all, fields(moves = plan.moves.len(), dest = %plan.destination_folder.display()))]
    pub fn execute_with<F>(&self, plan: PartitionPlan, mut mover: F) -> Result<PartitionOutcome>
    where
        F: FnMut(&Path, &Path) -> std::io::Result<()>,
    {
        self.preflight(&plan)?;

        fs::create_dir_all(&plan.destination_folder)?;

        let mut entries = Vec::with_capacity(plan.moves.len());
        let mut done: Vec<(&Path, &Path)> = Vec::new();
        for planned in &plan.moves {
            let status = if !planned.source.exists() {
                debug!(path = %planned.source.display(), "image file does not exist, path rewritten without a move");
                MoveStatus::SourceMissing
            } else if planned.source == planned.destination {
                MoveStatus::InPlace
            } else if let Err(source) = mover(&planned.source, &planned.destination) {
                roll_back(&done, &mut mover);
                return Err(FramekitError::MoveFailed {
                    from: planned.source.clone(),
                    to: planned.destination.clone(),
                    source,
                });
            } else {
                debug!(
                    from = %planned.source.display(),
                    to = %planned.destination.display(),
                    "moved"
                );
                done.push((planned.source.as_path(), planned.destination.as_path()));
                MoveStatus::Moved
            };

            entries.push(MoveEntry {
                from: planned.source.clone(),
                to: planned.destination.clone(),
                new_path: planned.new_path.clone(),
                status,
            });
        }

        info!(
            moved = done.len(),
            missing = entries
                .iter()
                .filter(|e| e.status == MoveStatus::SourceMissing)
                .count(),
            remaining = plan.remaining.len(),
            split = plan.split.len(),
            "split executed"
        );

        Ok(PartitionOutcome {
            remaining: plan.remaining,
            split: plan.split,
            moves: entries,
        })
    }

    fn preflight(&self, plan: &PartitionPlan) -> Result<()> {
        if self.policy == MissingFilePolicy::Strict {
            let missing: Vec<PathBuf> = plan
                .moves
                .iter()
                .filter(|m| !m.source.exists())
                .map(|m| m.source.clone())
                .collect();
            if !missing.is_empty() {
                return Err(FramekitError::MissingFiles(missing));
            }
        }

        let mut claimed = HashSet::new();
        for planned in plan.moves.iter().filter(|m| m.source.exists()) {
            if !claimed.insert(&planned.destination) {
                return Err(FramekitError::DestinationOccupied(
                    planned.destination.clone(),
                ));
            }
            if planned.destination != planned.source && planned.destination.exists() {
                return Err(FramekitError::DestinationOccupied(
                    planned.destination.clone(),
                ));
            }
        }
        Ok(())
    }
}

/// Move a file, falling back to copy-then-delete when a plain rename is not
/// possible (e.g. across filesystems).
pub fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            debug!(error = %rename_err, "rename failed, trying copy");
            copy_then_remove(from, to, |path| fs::remove_file(path))
        }
    }
}

/// Copy `from` to `to`, then delete `from` with `remove_source`.
///
/// On any failure the copy at `to` is deleted again, so the file ends up in
/// exactly one place.
pub fn copy_then_remove<F>(from: &Path, to: &Path, remove_source: F) -> std::io::Result<()>
where
    F: FnOnce(&Path) -> std::io::Result<()>,
{
    if let Err(err) = fs::copy(from, to) {
        let _ = fs::remove_file(to);
        return Err(err);
    }
    if let Err(err) = remove_source(from) {
        if let Err(cleanup) = fs::remove_file(to) {
            warn!(path = %to.display(), error = %cleanup, "could not remove copied file");
        }
        return Err(err);
    }
    Ok(())
}

fn roll_back<F>(done: &[(&Path, &Path)], mover: &mut F)
where
    F: FnMut(&Path, &Path) -> std::io::Result<()>,
{
    for (from, to) in done.iter().rev() {
        match mover(to, from) {
            Ok(()) => debug!(path = %from.display(), "move rolled back"),
            Err(err) => warn!(
                from = %to.display(),
                to = %from.display(),
                error = %err,
                "rollback failed, file left at destination"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framekit_core::Frame;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn manifest_of(n: usize) -> Manifest {
        let frames = (0..n)
            .map(|i| Frame::new(format!("./train/{i}")).with("id", i))
            .collect();
        let mut metadata = serde_json::Map::new();
        metadata.insert("camera_angle_x".into(), json!(0.6911));
        Manifest::new(metadata, frames)
    }

    fn ids(manifest: &Manifest) -> Vec<u64> {
        manifest
            .frames()
            .iter()
            .map(|f| f.extra["id"].as_u64().unwrap())
            .collect()
    }

    fn touch_all(base: &Path, n: usize) {
        fs::create_dir_all(base.join("train")).unwrap();
        for i in 0..n {
            fs::write(base.join(format!("train/{i}.png")), format!("img{i}")).unwrap();
        }
    }

    #[test]
    fn selection_is_reproducible() {
        let a = select_indices(10, 3, &mut StdRng::seed_from_u64(0)).unwrap();
        let b = select_indices(10, 3, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.iter().all(|&i| i < 10));
    }

    #[test]
    fn selection_can_take_everything_or_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(select_indices(5, 5, &mut rng).unwrap().len(), 5);
        assert!(select_indices(5, 0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            select_indices(0, 0, &mut rng),
            Err(FramekitError::EmptyManifest)
        ));
        assert!(matches!(
            select_indices(10, 11, &mut rng),
            Err(FramekitError::SplitTooLarge {
                requested: 11,
                available: 10
            })
        ));
    }

    #[test]
    fn plan_partitions_every_frame_once() {
        let partitioner = Partitioner::default();
        let mut rng = StdRng::seed_from_u64(42);
        let plan = partitioner
            .plan(manifest_of(10), 3, Path::new("."), Path::new("./test"), &mut rng)
            .unwrap();

        assert_eq!(plan.split.len(), 3);
        assert_eq!(plan.remaining.len(), 7);

        let mut all = ids(&plan.remaining);
        all.extend(ids(&plan.split));
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<u64>>());

        // Relative order is preserved on both sides.
        let split_ids = ids(&plan.split);
        assert!(split_ids.windows(2).all(|w| w[0] < w[1]));
        let remaining_ids = ids(&plan.remaining);
        assert!(remaining_ids.windows(2).all(|w| w[0] < w[1]));

        let selected: Vec<u64> = plan.selected.iter().map(|&i| i as u64).collect();
        assert_eq!(selected, split_ids);
    }

    #[test]
    fn plan_rewrites_split_paths_only() {
        let partitioner = Partitioner::default();
        let mut rng = StdRng::seed_from_u64(1);
        let plan = partitioner
            .plan(manifest_of(4), 2, Path::new("."), Path::new("./val"), &mut rng)
            .unwrap();

        for (frame, planned) in plan.split.frames().iter().zip(&plan.moves) {
            let id = frame.extra["id"].as_u64().unwrap();
            assert_eq!(frame.file_path, format!("./val/{id}"));
            assert_eq!(planned.original_path, format!("./train/{id}"));
            assert_eq!(planned.source, PathBuf::from(format!("train/{id}.png")));
            assert_eq!(planned.destination, PathBuf::from(format!("val/{id}.png")));
        }
        for frame in plan.remaining.frames() {
            assert!(frame.file_path.starts_with("./train/"));
        }
    }

    #[test]
    fn plan_keeps_metadata_on_both_sides() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = Partitioner::default()
            .plan(manifest_of(5), 2, Path::new("."), Path::new("test"), &mut rng)
            .unwrap();
        assert_eq!(plan.remaining.metadata()["camera_angle_x"], json!(0.6911));
        assert_eq!(plan.split.metadata()["camera_angle_x"], json!(0.6911));
    }

    #[test]
    fn execute_moves_files_exclusively() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch_all(base, 6);
        let dest = base.join("test");

        let partitioner = Partitioner::default();
        let plan = partitioner
            .plan(manifest_of(6), 2, base, &dest, &mut StdRng::seed_from_u64(9))
            .unwrap();
        let outcome = partitioner.execute(plan).unwrap();

        assert_eq!(outcome.moved_count(), 2);
        for entry in &outcome.moves {
            assert!(!entry.from.exists());
            assert!(entry.to.exists());
        }
        for frame in outcome.split.frames() {
            let resolved = PathResolver::default().resolve(&frame.file_path, base);
            assert!(resolved.disk_path.exists(), "{frame:?} must resolve after the move");
        }
        for frame in outcome.remaining.frames() {
            let resolved = PathResolver::default().resolve(&frame.file_path, base);
            assert!(resolved.disk_path.exists());
        }
    }

    #[test]
    fn tolerant_mode_rewrites_missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        let dest = base.join("test");

        let partitioner = Partitioner::new(PathResolver::default(), MissingFilePolicy::Tolerant);
        let plan = partitioner
            .plan(manifest_of(3), 3, base, &dest, &mut StdRng::seed_from_u64(0))
            .unwrap();
        let outcome = partitioner.execute(plan).unwrap();

        assert_eq!(outcome.missing_count(), 3);
        assert!(dest.is_dir());
        assert!(outcome
            .split
            .frames()
            .iter()
            .all(|f| f.file_path.starts_with("./test/")));
    }

    #[test]
    fn strict_mode_refuses_before_moving() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch_all(base, 4);
        fs::remove_file(base.join("train/2.png")).unwrap();
        let dest = base.join("test");

        let partitioner = Partitioner::new(PathResolver::default(), MissingFilePolicy::Strict);
        let plan = partitioner
            .plan(manifest_of(4), 4, base, &dest, &mut StdRng::seed_from_u64(0))
            .unwrap();
        let err = partitioner.execute(plan).unwrap_err();

        match err {
            FramekitError::MissingFiles(paths) => {
                assert_eq!(paths, vec![base.join("train/2.png")]);
            }
            other => panic!("unexpected error variant: {other}"),
        }
        assert!(!dest.exists());
        for i in [0, 1, 3] {
            assert!(base.join(format!("train/{i}.png")).exists());
        }
    }

    #[test]
    fn occupied_destination_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch_all(base, 2);
        let dest = base.join("test");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("0.png"), b"stale").unwrap();
        fs::write(dest.join("1.png"), b"stale").unwrap();

        let partitioner = Partitioner::default();
        let plan = partitioner
            .plan(manifest_of(2), 2, base, &dest, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(matches!(
            partitioner.execute(plan),
            Err(FramekitError::DestinationOccupied(_))
        ));
        assert!(base.join("train/0.png").exists());
        assert!(base.join("train/1.png").exists());
    }

    #[test]
    fn duplicate_destinations_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("a")).unwrap();
        fs::create_dir_all(base.join("b")).unwrap();
        fs::write(base.join("a/0.png"), b"a").unwrap();
        fs::write(base.join("b/0.png"), b"b").unwrap();

        let manifest = Manifest::new(
            serde_json::Map::new(),
            vec![Frame::new("./a/0"), Frame::new("./b/0")],
        );
        let partitioner = Partitioner::default();
        let plan = partitioner
            .plan(manifest, 2, base, &base.join("test"), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(matches!(
            partitioner.execute(plan),
            Err(FramekitError::DestinationOccupied(_))
        ));
    }

    #[test]
    fn absolute_base_with_relative_destination_stays_resolvable() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch_all(base, 4);
        // Same folder as `base/holdout`, spelled relative to the working
        // directory the way a command-line argument would be.
        let cwd = std::env::current_dir().unwrap();
        let dest = crate::resolver::relative_to(&base.join("holdout"), &cwd).unwrap();
        assert!(dest.is_relative());

        let partitioner = Partitioner::default();
        let plan = partitioner
            .plan(manifest_of(4), 2, base, &dest, &mut StdRng::seed_from_u64(5))
            .unwrap();
        let outcome = partitioner.execute(plan).unwrap();

        assert_eq!(outcome.moved_count(), 2);
        for frame in outcome.split.frames() {
            assert!(frame.file_path.starts_with("./holdout/"), "{}", frame.file_path);
            let resolved = PathResolver::default().resolve(&frame.file_path, base);
            assert!(resolved.disk_path.exists(), "{frame:?} must resolve after the move");
        }
    }

    #[test]
    fn copy_fallback_never_leaves_two_copies() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("0.png");
        let to = dir.path().join("moved.png");
        fs::write(&from, b"img").unwrap();

        let err = copy_then_remove(&from, &to, |_| {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
        })
        .unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::PermissionDenied);
        assert!(from.exists());
        assert!(!to.exists());
    }

    #[test]
    fn failed_source_removal_rolls_back_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch_all(base, 3);
        let dest = base.join("test");

        let partitioner = Partitioner::default();
        let plan = partitioner
            .plan(manifest_of(3), 3, base, &dest, &mut StdRng::seed_from_u64(0))
            .unwrap();

        let mut calls = 0;
        let err = partitioner
            .execute_with(plan, |from, to| {
                calls += 1;
                if calls == 2 {
                    copy_then_remove(from, to, |_| {
                        Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
                    })
                } else {
                    move_file(from, to)
                }
            })
            .unwrap_err();

        assert!(matches!(err, FramekitError::MoveFailed { .. }));
        for i in 0..3 {
            assert!(base.join(format!("train/{i}.png")).exists());
            assert!(!dest.join(format!("{i}.png")).exists());
        }
    }

    #[test]
    fn failed_move_rolls_back_earlier_moves() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        touch_all(base, 3);
        let dest = base.join("test");

        let partitioner = Partitioner::default();
        let plan = partitioner
            .plan(manifest_of(3), 3, base, &dest, &mut StdRng::seed_from_u64(0))
            .unwrap();

        let mut calls = 0;
        let err = partitioner
            .execute_with(plan, |from, to| {
                calls += 1;
                if calls == 3 {
                    Err(std::io::Error::other("disk full"))
                } else {
                    move_file(from, to)
                }
            })
            .unwrap_err();

        assert!(matches!(err, FramekitError::MoveFailed { .. }));
        for i in 0..3 {
            assert!(base.join(format!("train/{i}.png")).exists());
            assert!(!dest.join(format!("{i}.png")).exists());
        }
    }

    #[test]
    fn move_file_renames() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.png");
        let to = dir.path().join("b.png");
        fs::write(&from, b"x").unwrap();
        move_file(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"x");
    }
}
