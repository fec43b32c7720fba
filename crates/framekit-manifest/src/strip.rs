// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extension stripping — bring explicit `.png` paths in line with the
// extension-less manifest convention.

use framekit_core::Manifest;
use tracing::{debug, instrument};

use crate::resolver::{split_declared, split_extension};

/// Remove `extension` (compared case-insensitively, leading dot optional)
/// from every frame path that ends with it. Returns the manifest and the
/// number of paths changed.
#[instrument(skip(manifest), fields(frames = manifest.len()))]
pub fn strip_extension(mut manifest: Manifest, extension: &str) -> (Manifest, usize) {
    let wanted = extension.trim_start_matches('.');
    let mut changed = 0;
    for frame in manifest.frames_mut() {
        let (_, file_name) = split_declared(&frame.file_path);
        let (_, ext) = split_extension(file_name);
        if ext.len() > 1 && ext[1..].eq_ignore_ascii_case(wanted) {
            let keep = frame.file_path.len() - ext.len();
            frame.file_path.truncate(keep);
            changed += 1;
        }
    }
    debug!(changed, "extensions stripped");
    (manifest, changed)
}
