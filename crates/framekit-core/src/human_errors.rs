// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command-line tools.
//
// Every error is mapped to a one-line summary plus a concrete next step. The
// severity tells the CLI whether the run should still count as a success.

use crate::error::FramekitError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The request was refused before anything changed; nothing to clean up.
    Refused,
    /// The operator must fix the dataset or the arguments and run again.
    ActionRequired,
    /// The run failed part-way or hit an environment problem.
    Fatal,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `FramekitError` into a `HumanError`.
pub fn humanize_error(err: &FramekitError) -> HumanError {
    match err {
        FramekitError::InvalidManifest(detail) => HumanError {
            message: "The manifest could not be read.".into(),
            suggestion: format!(
                "Check that it is a JSON object whose `frames` entries have string `file_path` values. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        FramekitError::EmptyManifest => HumanError {
            message: "No frames found in the input JSON.".into(),
            suggestion: "Nothing was moved. Point --input_json at a manifest with frames.".into(),
            severity: Severity::Refused,
        },

        FramekitError::SplitTooLarge {
            requested,
            available,
        } => HumanError {
            message: format!("Requested {requested} frames, but only {available} exist."),
            suggestion: "Nothing was moved. Lower --num_frames and run again.".into(),
            severity: Severity::Refused,
        },

        FramekitError::MissingFile(path) => HumanError {
            message: format!("Image file '{}' does not exist.", path.display()),
            suggestion: "Run `framekit cleanup` first to drop frames without images.".into(),
            severity: Severity::ActionRequired,
        },

        FramekitError::MissingFiles(paths) => HumanError {
            message: format!("{} selected image file(s) do not exist.", paths.len()),
            suggestion: "Nothing was moved. Run `framekit cleanup`, or drop --strict to tolerate missing files.".into(),
            severity: Severity::ActionRequired,
        },

        FramekitError::DestinationOccupied(path) => HumanError {
            message: format!("'{}' already exists in the destination folder.", path.display()),
            suggestion: "Nothing was moved. The split may have been applied already; check the destination folder and its manifest.".into(),
            severity: Severity::ActionRequired,
        },

        FramekitError::MoveFailed { from, to, .. } => HumanError {
            message: format!("Moving '{}' to '{}' failed.", from.display(), to.display()),
            suggestion: "Files already moved were put back and no manifest was written. Check permissions and free space, then run again.".into(),
            severity: Severity::Fatal,
        },

        FramekitError::DecodeFailure { path, .. } => HumanError {
            message: format!("'{}' is not a readable image.", path.display()),
            suggestion: "The file was skipped. Remove it from the folder or re-export it.".into(),
            severity: Severity::ActionRequired,
        },

        FramekitError::ImageError(detail) => HumanError {
            message: "Writing an image failed.".into(),
            suggestion: format!("Check the output folder is writable. ({detail})"),
            severity: Severity::Fatal,
        },

        FramekitError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file or folder couldn't be found.".into(),
                    suggestion: "Check the paths passed on the command line.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied.".into(),
                    suggestion: "Check the permissions of the manifest and image folders.".into(),
                    severity: Severity::Fatal,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "The disk may be full. Free some space and run again.".into(),
                    severity: Severity::Fatal,
                }
            }
        }

        FramekitError::Serialization(_) => HumanError {
            message: "The manifest is not valid JSON.".into(),
            suggestion: "Open it in an editor or `jq .` to find the syntax error.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
