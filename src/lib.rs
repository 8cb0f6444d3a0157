//! Draw a digit, let a pretrained model read it back, and keep score.
//!
//! The drawing pipeline lives in the workspace crates (`stroke-canvas`, `normalizer`,
//! `session`); this crate ties them to a model through the `Classifier` trait and drives
//! them from the `Controller`.

// Include submodules
mod classifier;
mod controller;

pub use classifier::{argmax, rank, Classifier, ClassifierAdapter, ClassifierError};
pub use controller::{Controller, PadConfig, PadError, PredictOutcome};

// Re-export types from the workspace crates
pub use digitpad_helpers::{
    ClassScore, PredictionResult, DEFAULT_BRUSH_SIZE, DEFAULT_CANVAS_SIZE, MODEL_INPUT_SIDE,
    NUM_CLASSES, THUMBNAIL_SIDE, TOP_K,
};
pub use normalizer::{InputTensor, NormalizeError, Normalizer};
pub use session::{AccuracyCounters, History, HistoryEntry, Session};
pub use stroke_canvas::{CanvasError, Dab, StrokeCanvas};
