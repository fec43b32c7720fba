// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// framekit-manifest — Keeps a frame manifest and the image files it names in
// agreement.
//
// Provides path resolution with extension inference, cleanup of frames whose
// image is gone, seeded train/val/test splitting that moves files and
// rewrites paths, atomic manifest persistence, and a fingerprinted move
// journal that lets a split recognise it has already been applied.

pub mod filter;
pub mod integrity;
pub mod journal;
pub mod partition;
pub mod resolver;
pub mod store;
pub mod strip;

// PUBLIC API: Re-export the primary entry points.
pub use filter::{FilterReport, ManifestFilter};
pub use integrity::{fingerprint, matches_fingerprint};
pub use journal::{MoveRecord, default_journal_path};
pub use partition::{
    MoveEntry, MoveStatus, PartitionOutcome, PartitionPlan, Partitioner, PlannedMove,
    select_indices,
};
pub use resolver::{PathResolver, normalize};
pub use store::{load_manifest, parse_manifest, save_manifest};
pub use strip::strip_extension;
