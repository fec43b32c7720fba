// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Manifest persistence — JSON load, pretty rendering, and atomic writes.
//
// Writes go to a temporary file in the target's directory and are renamed
// over the target, so a reader never sees a half-written manifest even when
// the input manifest is overwritten in place.

use std::fs;
use std::io::Write;
use std::path::Path;

use framekit_core::error::Result;
use framekit_core::Manifest;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Parse manifest bytes.
pub fn parse_manifest(bytes: &[u8]) -> Result<Manifest> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    Manifest::from_value(value)
}

/// Read and parse the manifest at `path`.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest> {
    let bytes = std::fs::read(path.as_ref())?;
    let manifest = parse_manifest(&bytes)?;
    debug!(frames = manifest.len(), "manifest loaded");
    Ok(manifest)
}

/// Render any serialisable value as two-space indented JSON.
pub fn to_pretty_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(value)?)
}

/// Atomically replace `path` with `bytes`.
///
/// An existing target keeps its permissions. A symlinked target is followed
/// and the file it points to is replaced, leaving the link in place.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let is_link = fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink());
    let target = if is_link {
        fs::canonicalize(path)?
    } else {
        path.to_path_buf()
    };
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    if let Ok(meta) = fs::metadata(&target) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|err| err.error)?;
    debug!(path = %target.display(), len = bytes.len(), "file written");
    Ok(())
}

/// Write `manifest` to `path` and return the exact bytes written.
#[instrument(skip_all, fields(path = %path.as_ref().display(), frames = manifest.len()))]
pub fn save_manifest(path: impl AsRef<Path>, manifest: &Manifest) -> Result<Vec<u8>> {
    let bytes = to_pretty_bytes(manifest)?;
    write_atomic(path, &bytes)?;
    Ok(bytes)
}
