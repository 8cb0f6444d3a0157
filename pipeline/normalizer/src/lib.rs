use std::error::Error;
use std::fmt::{Display, Formatter};

use digitpad_helpers::{MODEL_INPUT_SIDE, THUMBNAIL_SIDE};
use image::imageops::{self, FilterType};
use image::GrayImage;
use ndarray::Array3;

/// The classifier input: shape (1, 28, 28), ink at 1.0 and background at 0.0.
pub type InputTensor = Array3<f32>;

/// Errors that can occur when preparing a bitmap for the classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// The bitmap is not the size the normalizer was configured for
    UnexpectedDimensions {
        expected: (u32, u32),
        found: (u32, u32),
    },
}

impl Display for NormalizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeError::UnexpectedDimensions { expected, found } => write!(
                f,
                "Expected a {}x{} bitmap, got {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
        }
    }
}

impl Error for NormalizeError {}

/// Turns canvas bitmaps into classifier tensors.
///
/// The pipeline is fixed: Lanczos resample to 28x28, invert (`255 - p`), scale into
/// [0, 1], add a batch dimension of 1. Identical bitmaps always give identical tensors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    width: u32,
    height: u32,
}

impl Normalizer {
    /// Creates a normalizer for bitmaps of exactly `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Resamples the bitmap down to the model resolution.
    ///
    /// Uses Lanczos3 so thin strokes survive as gray levels instead of vanishing.
    ///
    /// # Errors
    ///
    /// Returns `NormalizeError::UnexpectedDimensions` if the bitmap size differs from the
    /// configured one.
    pub fn downsample(&self, bitmap: &GrayImage) -> Result<GrayImage, NormalizeError> {
        let found = bitmap.dimensions();
        if found != (self.width, self.height) {
            return Err(NormalizeError::UnexpectedDimensions {
                expected: (self.width, self.height),
                found,
            });
        }
        Ok(imageops::resize(
            bitmap,
            MODEL_INPUT_SIDE,
            MODEL_INPUT_SIDE,
            FilterType::Lanczos3,
        ))
    }

    /// Runs the whole pipeline on a canvas bitmap.
    pub fn normalize(&self, bitmap: &GrayImage) -> Result<InputTensor, NormalizeError> {
        let small = self.downsample(bitmap)?;
        Ok(to_tensor(&small))
    }
}

/// Inverts and scales an already downsampled image into a (1, h, w) tensor.
pub fn to_tensor(small: &GrayImage) -> InputTensor {
    let (width, height) = small.dimensions();
    let tensor = Array3::from_shape_fn((1, height as usize, width as usize), |(_, row, col)| {
        let pixel = small.get_pixel(col as u32, row as u32)[0];
        (255 - pixel) as f32 / 255.0
    });
    log::debug!(
        "Tensor {:?}, ink mass {:.2}",
        tensor.shape(),
        tensor.sum()
    );
    tensor
}

/// Blows the 28x28 image up to 56x56 with nearest-neighbor sampling so each
/// classifier pixel shows as a crisp 2x2 block.
pub fn thumbnail(small: &GrayImage) -> GrayImage {
    imageops::resize(small, THUMBNAIL_SIDE, THUMBNAIL_SIDE, FilterType::Nearest)
}
