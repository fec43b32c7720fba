// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command implementations. Each command writes its report to `out` (stdout
// in the binary) and leaves diagnostics to `tracing`.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use framekit_core::human_errors::humanize_error;
use framekit_core::{FramekitError, MissingFilePolicy, SplitRole, ToolConfig};
use framekit_image::ImageRescaler;
use framekit_manifest::{
    ManifestFilter, MoveRecord, MoveStatus, PathResolver, Partitioner, default_journal_path,
    load_manifest, parse_manifest, save_manifest, strip_extension,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::cli::{CleanupArgs, RescaleArgs, SplitArgs, StripArgs};

/// How a split invocation ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStatus {
    /// Files were moved and both manifests written.
    Applied,
    /// The journal shows this split was already applied; nothing was done.
    AlreadyApplied,
    /// The request was refused (no frames, or too many requested); nothing
    /// was touched.
    Refused,
}

pub fn cleanup(args: &CleanupArgs, config: &ToolConfig, out: &mut impl Write) -> Result<()> {
    let manifest = load_manifest(&args.input_json)
        .with_context(|| format!("reading {}", args.input_json.display()))?;
    writeln!(out, "Original frames count: {}", manifest.len())?;

    let filter = ManifestFilter::new(PathResolver::from_config(config));
    let report = filter.filter(manifest, &args.folder);
    for path in &report.removed {
        writeln!(out, "Frame removed - missing file: '{}'", path.display())?;
    }
    writeln!(out, "Cleaned frames count: {}", report.kept_count())?;

    save_manifest(&args.output_json, &report.manifest)
        .with_context(|| format!("writing {}", args.output_json.display()))?;
    writeln!(out, "Saved cleaned JSON to '{}'.", args.output_json.display())?;
    Ok(())
}

pub fn split(
    role: SplitRole,
    args: &SplitArgs,
    config: &ToolConfig,
    out: &mut impl Write,
) -> Result<SplitStatus> {
    let journal_path = args
        .journal
        .clone()
        .unwrap_or_else(|| default_journal_path(&args.output_json));
    let input_bytes = std::fs::read(&args.input_json)
        .with_context(|| format!("reading {}", args.input_json.display()))?;

    if let Some(record) = MoveRecord::load(&journal_path)? {
        if record.is_applied_to(&input_bytes) {
            writeln!(
                out,
                "Split already applied to '{}' ({} files moved on {}, see '{}'). Nothing to do.",
                args.input_json.display(),
                record.moved_count(),
                record.created_at.to_rfc3339(),
                journal_path.display()
            )?;
            return Ok(SplitStatus::AlreadyApplied);
        }
    }

    let manifest = parse_manifest(&input_bytes)
        .with_context(|| format!("parsing {}", args.input_json.display()))?;

    let policy = if args.strict {
        MissingFilePolicy::Strict
    } else {
        config.missing_file_policy
    };
    let count = args.num_frames.unwrap_or(config.split_count);
    let seed = args.seed.unwrap_or(config.split_seed);
    let dest_folder = args
        .dest_folder
        .clone()
        .unwrap_or_else(|| role.default_folder().into());

    let partitioner = Partitioner::new(PathResolver::from_config(config), policy);
    let mut rng = StdRng::seed_from_u64(seed);
    let plan = match partitioner.plan(manifest, count, &args.folder, &dest_folder, &mut rng) {
        Ok(plan) => plan,
        Err(err) if err.is_invalid_request() => {
            let human = humanize_error(&err);
            writeln!(out, "{} {}", human.message, human.suggestion)?;
            return Ok(SplitStatus::Refused);
        }
        Err(err) => return Err(err.into()),
    };

    let outcome = match partitioner.execute(plan) {
        Ok(outcome) => outcome,
        Err(FramekitError::MissingFiles(paths)) => {
            for path in &paths {
                writeln!(out, "Missing: '{}'", path.display())?;
            }
            return Err(FramekitError::MissingFiles(paths).into());
        }
        Err(err) => return Err(err.into()),
    };

    for entry in &outcome.moves {
        match entry.status {
            MoveStatus::Moved => writeln!(
                out,
                "Moved '{}' -> '{}'",
                entry.from.display(),
                entry.to.display()
            )?,
            MoveStatus::SourceMissing => writeln!(
                out,
                "Warning: image file '{}' does not exist!",
                entry.from.display()
            )?,
            MoveStatus::InPlace => {
                writeln!(out, "Already in place: '{}'", entry.to.display())?
            }
        }
    }

    let split_bytes = save_manifest(&args.output_json, &outcome.split)
        .with_context(|| format!("writing {}", args.output_json.display()))?;
    let remaining_bytes = save_manifest(&args.input_json, &outcome.remaining)
        .with_context(|| format!("overwriting {}", args.input_json.display()))?;
    writeln!(
        out,
        "Overwrote '{}' to keep {} frames.",
        args.input_json.display(),
        outcome.remaining.len()
    )?;
    writeln!(
        out,
        "Wrote '{}' with {} {} frames.",
        args.output_json.display(),
        outcome.split.len(),
        role
    )?;

    let record = MoveRecord::new(
        role,
        seed,
        &input_bytes,
        &remaining_bytes,
        &split_bytes,
        outcome.moves,
    );
    record
        .save(&journal_path)
        .with_context(|| format!("writing {}", journal_path.display()))?;
    info!(journal = %journal_path.display(), %role, "split recorded");

    Ok(SplitStatus::Applied)
}

pub fn rescale(args: &RescaleArgs, config: &ToolConfig, out: &mut impl Write) -> Result<usize> {
    let width = args.width.unwrap_or(config.target_width);
    let height = args.height.unwrap_or(config.target_height);

    let mut rescaler = ImageRescaler::new(width, height);
    if let Some(ext) = &args.only_ext {
        rescaler = rescaler.only_extension(ext.as_str());
    }

    let report = rescaler
        .rescale_directory(&args.input_dir, &args.output_dir)
        .with_context(|| format!("rescaling {}", args.input_dir.display()))?;

    for output in &report.processed {
        writeln!(
            out,
            "Scaled '{}' -> [{height}x{width}], saved to '{}'",
            display_name(output),
            output.display()
        )?;
    }
    for skipped in &report.skipped {
        writeln!(
            out,
            "Skipping file '{}', not a valid image or error reading file ({}).",
            display_name(&skipped.path),
            skipped.reason
        )?;
    }
    Ok(report.processed_count())
}

pub fn strip_ext(args: &StripArgs, out: &mut impl Write) -> Result<()> {
    let manifest = load_manifest(&args.input_json)
        .with_context(|| format!("reading {}", args.input_json.display()))?;
    let total = manifest.len();
    let (manifest, changed) = strip_extension(manifest, &args.extension);
    save_manifest(&args.output_json, &manifest)
        .with_context(|| format!("writing {}", args.output_json.display()))?;
    writeln!(
        out,
        "Stripped '{}' from {changed} of {total} frame paths, saved to '{}'.",
        args.extension,
        args.output_json.display()
    )?;
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
