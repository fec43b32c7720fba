// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Framekit.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Framekit operations.
#[derive(Debug, Error)]
pub enum FramekitError {
    // -- Manifest errors --
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    // -- Request errors (abort before anything is mutated) --
    #[error("no frames found in the manifest")]
    EmptyManifest,

    #[error("requested {requested} frames, but only {available} exist")]
    SplitTooLarge { requested: usize, available: usize },

    // -- Filesystem consistency --
    #[error("image file '{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error("{} image file(s) referenced by the split do not exist", .0.len())]
    MissingFiles(Vec<PathBuf>),

    #[error("destination '{}' is already occupied", .0.display())]
    DestinationOccupied(PathBuf),

    #[error("failed to move '{}' -> '{}': {source}", from.display(), to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Image errors --
    #[error("cannot decode '{}' as an image: {reason}", path.display())]
    DecodeFailure { path: PathBuf, reason: String },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FramekitError {
    /// Whether this error rejects the request itself (zero frames, or more
    /// frames requested than exist). Such errors are raised before any file
    /// or manifest is touched.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::EmptyManifest | Self::SplitTooLarge { .. })
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FramekitError>;
