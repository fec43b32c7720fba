// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface. Flag names keep the snake_case spelling dataset
// scripts already use (`--input_json`, `--num_frames`, ...).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use framekit_core::SplitRole;

/// Curate NeRF-style image datasets described by a frame manifest.
#[derive(Parser, Debug)]
#[command(name = "framekit")]
#[command(about = "Clean up, split, and rescale image datasets described by a frame manifest")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remove frames whose image file no longer exists
    Cleanup(CleanupArgs),
    /// Move a random subset of frames into a test set
    SplitTest(SplitArgs),
    /// Move a random subset of frames into a validation set
    SplitVal(SplitArgs),
    /// Move a random subset of frames into a test or validation set
    Split(RoleSplitArgs),
    /// Resize every image in a folder to one resolution
    Rescale(RescaleArgs),
    /// Drop an explicit extension from manifest frame paths
    StripExt(StripArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CleanupArgs {
    /// Path to the original manifest
    #[arg(long = "input_json")]
    pub input_json: PathBuf,

    /// Where to write the cleaned manifest
    #[arg(long = "output_json")]
    pub output_json: PathBuf,

    /// Folder frame paths are resolved against
    #[arg(long)]
    pub folder: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SplitArgs {
    /// Path to the original manifest (overwritten with the remaining frames)
    #[arg(long = "input_json")]
    pub input_json: PathBuf,

    /// Where to write the manifest of the frames split off
    #[arg(long = "output_json")]
    pub output_json: PathBuf,

    /// Folder the selected images are moved into [default: ./test or ./val]
    #[arg(long = "dest_folder", aliases = ["test_folder", "val_folder"])]
    pub dest_folder: Option<PathBuf>,

    /// How many frames to move [default: 10]
    #[arg(long = "num_frames", aliases = ["num_test_frames", "num_val_frames"])]
    pub num_frames: Option<usize>,

    /// Random seed for a reproducible selection [default: 0]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Folder frame paths are resolved against
    #[arg(long, default_value = ".")]
    pub folder: PathBuf,

    /// Refuse the split if any selected image is missing
    #[arg(long)]
    pub strict: bool,

    /// Move journal path [default: <output_json>.moves.json]
    #[arg(long)]
    pub journal: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RoleSplitArgs {
    /// Which subset to produce: test or val
    #[arg(long)]
    pub role: SplitRole,

    #[command(flatten)]
    pub split: SplitArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RescaleArgs {
    /// Folder of images to resize
    pub input_dir: PathBuf,

    /// Folder to write resized images into (created if absent)
    pub output_dir: PathBuf,

    /// Target width in pixels [default: 960]
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels [default: 540]
    #[arg(long)]
    pub height: Option<u32>,

    /// Only resize files with this extension, e.g. png
    #[arg(long = "only_ext")]
    pub only_ext: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StripArgs {
    /// Manifest to read
    pub input_json: PathBuf,

    /// Where to write the rewritten manifest
    pub output_json: PathBuf,

    /// Extension to remove
    #[arg(long, default_value = ".png")]
    pub extension: String,
}
