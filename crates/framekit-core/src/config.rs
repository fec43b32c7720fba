// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool configuration. There is no config file; these are the built-in
// defaults that command-line flags override.

use serde::{Deserialize, Serialize};

use crate::types::MissingFilePolicy;

/// Defaults shared by every Framekit command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Extension assumed when a manifest path has none (with leading dot).
    pub default_extension: String,
    /// Frames moved by a split when no count is given.
    pub split_count: usize,
    /// Seed for split sampling when none is given.
    pub split_seed: u64,
    /// Behaviour when a selected frame has no image on disk.
    pub missing_file_policy: MissingFilePolicy,
    /// Rescale target width in pixels.
    pub target_width: u32,
    /// Rescale target height in pixels.
    pub target_height: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            default_extension: ".png".into(),
            split_count: 10,
            split_seed: 0,
            missing_file_policy: MissingFilePolicy::Tolerant,
            target_width: 960,
            target_height: 540,
        }
    }
}
