// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — load, resize, and save a single image with the `image`
// crate. The on-disk format is sniffed from the file content, so dataset
// frames stored without an extension still load and save in their own
// format.

use std::path::Path;

use framekit_core::error::FramekitError;
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::{debug, info, instrument};

/// A decoded image plus the format it was stored in.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so calls
/// chain:
///
/// ```ignore
/// ImageProcessor::open("train/0007.png")?
///     .resize_exact(960, 540)
///     .save("scaled/0007.png")?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
    /// Source format, reused when saving. `None` for images built in memory.
    format: Option<ImageFormat>,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path, detecting the format from its bytes.
    ///
    /// Anything that cannot be opened as an image becomes
    /// `FramekitError::DecodeFailure`; I/O errors while opening the file are
    /// reported as `FramekitError::Io`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FramekitError> {
        let path = path.as_ref();
        let decode_failure = |reason: String| FramekitError::DecodeFailure {
            path: path.to_path_buf(),
            reason,
        };

        let reader = ImageReader::open(path)?
            .with_guessed_format()
            .map_err(|err| decode_failure(err.to_string()))?;
        let format = reader.format();
        let img = reader
            .decode()
            .map_err(|err| decode_failure(err.to_string()))?;

        debug!(
            width = img.width(),
            height = img.height(),
            ?format,
            "Image loaded"
        );
        Ok(Self { image: img, format })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image,
            format: None,
        }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Format detected when the image was opened.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Resize the image to exactly `width` x `height`, ignoring aspect ratio.
    /// Uses Lanczos3 filtering for high-quality resampling.
    #[instrument(skip(self), fields(width, height))]
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            width,
            height,
            "Resizing image"
        );
        let resized =
            self.image
                .resize_exact(width, height, image::imageops::FilterType::Lanczos3);
        Self {
            image: resized,
            format: self.format,
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image to `path` in its source format, or in the format
    /// implied by the extension of `path` when the source format is unknown.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FramekitError> {
        let path = path.as_ref();
        let result = match self.format {
            Some(format) => self.image.save_with_format(path, format),
            None => self.image.save(path),
        };
        result.map_err(|err| match err {
            image::ImageError::IoError(io) => FramekitError::Io(io),
            other => FramekitError::ImageError(format!(
                "failed to save image to {}: {}",
                path.display(),
                other
            )),
        })
    }
}
