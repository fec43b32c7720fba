// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// framekit-image — Image rescaling for Framekit datasets.
//
// Provides a single-image processor (load with format sniffing, exact
// Lanczos3 resize, save in the source format) and a directory rescaler that
// applies it to every image in a folder.

pub mod processor;
pub mod rescale;

// Re-export the primary structs so callers can use `framekit_image::ImageRescaler` etc.
pub use processor::ImageProcessor;
pub use rescale::{ImageRescaler, RescaleReport, SkippedImage, rescale_directory};
