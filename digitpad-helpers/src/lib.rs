// Include submodules
mod common;

// Re-export types from submodules
pub use common::{ClassScore, PredictionResult};

/// Side length in pixels of the square drawing canvas.
pub const DEFAULT_CANVAS_SIZE: u32 = 280;

/// Diameter in pixels of the round brush.
pub const DEFAULT_BRUSH_SIZE: u32 = 20;

/// Side length of the square image the classifier consumes.
pub const MODEL_INPUT_SIDE: u32 = 28;

/// Side length of the blocky preview shown next to a prediction.
pub const THUMBNAIL_SIDE: u32 = 56;

/// Number of digit classes the classifier scores.
pub const NUM_CLASSES: usize = 10;

/// How many ranked classes are reported with each prediction.
pub const TOP_K: usize = 3;

/// Grayscale value of an untouched canvas pixel.
pub const BACKGROUND: u8 = 255;

/// Grayscale value laid down by the brush.
pub const INK: u8 = 0;
