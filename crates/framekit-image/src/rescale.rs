// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory rescaling — resize every image in a folder to one resolution.
//
// Stateless per file and independent of any manifest. Files that are not
// images are skipped and reported; the batch keeps going.

use std::fs;
use std::path::{Path, PathBuf};

use framekit_core::error::{FramekitError, Result};
use tracing::{debug, info, instrument, warn};

use crate::processor::ImageProcessor;

/// A file the rescaler could not process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of one rescale batch.
#[derive(Debug, Clone, Default)]
pub struct RescaleReport {
    /// Output path of every image written, in processing order.
    pub processed: Vec<PathBuf>,
    pub skipped: Vec<SkippedImage>,
}

impl RescaleReport {
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}

/// Resizes every image in a directory to a fixed size.
#[derive(Debug, Clone)]
pub struct ImageRescaler {
    width: u32,
    height: u32,
    /// Only files with this extension (case-insensitive, no dot) are visited.
    extension_filter: Option<String>,
}

impl ImageRescaler {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            extension_filter: None,
        }
    }

    /// Restrict the batch to files ending in `extension` (with or without
    /// the leading dot).
    pub fn only_extension(mut self, extension: impl Into<String>) -> Self {
        let ext = extension.into();
        self.extension_filter = Some(ext.trim_start_matches('.').to_ascii_lowercase());
        self
    }

    pub fn target_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resize every regular file in `input_dir` into `output_dir` under the
    /// same file name. Files are visited in name order; sub-directories are
    /// ignored. `output_dir` is created if needed.
    #[instrument(skip(self, input_dir, output_dir), fields(
        input = %input_dir.as_ref().display(),
        output = %output_dir.as_ref().display(),
        width = self.width,
        height = self.height,
    ))]
    pub fn rescale_directory(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<RescaleReport> {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        let mut files = Vec::new();
        for entry in fs::read_dir(input_dir)? {
            let path = entry?.path();
            if path.is_file() && self.accepts(&path) {
                files.push(path);
            }
        }
        files.sort();

        let mut report = RescaleReport::default();
        for path in files {
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let output_path = output_dir.join(file_name);

            let processor = match ImageProcessor::open(&path) {
                Ok(processor) => processor,
                Err(FramekitError::DecodeFailure { path, reason }) => {
                    warn!(path = %path.display(), %reason, "skipping unreadable image");
                    report.skipped.push(SkippedImage { path, reason });
                    continue;
                }
                Err(other) => return Err(other),
            };

            match processor
                .resize_exact(self.width, self.height)
                .save(&output_path)
            {
                Ok(()) => {
                    debug!(output = %output_path.display(), "image rescaled");
                    report.processed.push(output_path);
                }
                Err(FramekitError::ImageError(reason)) => {
                    warn!(path = %path.display(), %reason, "skipping image that cannot be re-encoded");
                    report.skipped.push(SkippedImage { path, reason });
                }
                Err(other) => return Err(other),
            }
        }

        info!(
            processed = report.processed.len(),
            skipped = report.skipped.len(),
            "rescale complete"
        );
        Ok(report)
    }

    fn accepts(&self, path: &Path) -> bool {
        match &self.extension_filter {
            None => true,
            Some(wanted) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted)),
        }
    }
}

/// Resize every image in `input_dir` to `width` x `height` into `output_dir`.
/// Returns the number of images written.
pub fn rescale_directory(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    width: u32,
    height: u32,
) -> Result<usize> {
    ImageRescaler::new(width, height)
        .rescale_directory(input_dir, output_dir)
        .map(|report| report.processed_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, ImageReader, Rgb, RgbImage};

    fn write_png(path: &Path, w: u32, h: u32) {
        RgbImage::from_pixel(w, h, Rgb([10, 120, 240]))
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    fn dimensions(path: &Path) -> (u32, u32) {
        ImageReader::open(path)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .into_dimensions()
            .unwrap()
    }

    #[test]
    fn rescales_images_and_skips_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("nested/out");
        fs::create_dir_all(input.join("subdir")).unwrap();
        write_png(&input.join("a.png"), 64, 32);
        write_png(&input.join("b"), 30, 30);
        fs::write(input.join("notes.txt"), b"hello").unwrap();
        write_png(&input.join("subdir/c.png"), 10, 10);

        let report = ImageRescaler::new(16, 9)
            .rescale_directory(&input, &output)
            .unwrap();

        assert_eq!(report.processed, vec![output.join("a.png"), output.join("b")]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, input.join("notes.txt"));
        assert_eq!(dimensions(&output.join("a.png")), (16, 9));
        assert_eq!(dimensions(&output.join("b")), (16, 9));
        assert!(!output.join("subdir").exists());
        assert!(!output.join("notes.txt").exists());
    }

    #[test]
    fn extension_filter_limits_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("lego/test");
        let output = dir.path().join("lego/test_resized");
        fs::create_dir_all(&input).unwrap();
        write_png(&input.join("r_0.PNG"), 20, 20);
        write_png(&input.join("r_0_depth"), 20, 20);

        let report = ImageRescaler::new(8, 8)
            .only_extension(".png")
            .rescale_directory(&input, &output)
            .unwrap();

        assert_eq!(report.processed, vec![output.join("r_0.PNG")]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn free_function_counts_processed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir_all(&input).unwrap();
        write_png(&input.join("0.png"), 4, 4);
        write_png(&input.join("1.png"), 4, 4);

        let count = rescale_directory(&input, dir.path().join("out"), 2, 2).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn missing_input_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = rescale_directory(dir.path().join("absent"), dir.path().join("out"), 2, 2);
        assert!(matches!(result, Err(FramekitError::Io(_))));
    }
}
