use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use digitpad_helpers::{DEFAULT_BRUSH_SIZE, DEFAULT_CANVAS_SIZE, PredictionResult};
use image::GrayImage;
use normalizer::{NormalizeError, Normalizer};
use session::{AccuracyCounters, Session};
use stroke_canvas::{CanvasError, StrokeCanvas};

use crate::classifier::{Classifier, ClassifierAdapter, ClassifierError};

/// Errors surfaced by the controller's command handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum PadError {
    Canvas(CanvasError),
    Normalize(NormalizeError),
    Classifier(ClassifierError),
}

impl Display for PadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PadError::Canvas(e) => write!(f, "{}", e),
            PadError::Normalize(e) => write!(f, "{}", e),
            PadError::Classifier(e) => write!(f, "{}", e),
        }
    }
}

impl Error for PadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PadError::Canvas(e) => Some(e),
            PadError::Normalize(e) => Some(e),
            PadError::Classifier(e) => Some(e),
        }
    }
}

impl From<CanvasError> for PadError {
    fn from(e: CanvasError) -> Self {
        PadError::Canvas(e)
    }
}

impl From<NormalizeError> for PadError {
    fn from(e: NormalizeError) -> Self {
        PadError::Normalize(e)
    }
}

impl From<ClassifierError> for PadError {
    fn from(e: ClassifierError) -> Self {
        PadError::Classifier(e)
    }
}

/// Canvas geometry and brush settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub brush_size: u32,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            brush_size: DEFAULT_BRUSH_SIZE,
        }
    }
}

/// What the GUI shows after a prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictOutcome {
    pub result: PredictionResult,
    /// The 28x28 image the model saw, enlarged to 56x56 with nearest-neighbor.
    pub thumbnail: GrayImage,
}

/// The main application state.
/// It owns the canvas, the model and the session, and exposes one method per user action.
pub struct Controller {
    canvas: StrokeCanvas,
    normalizer: Normalizer,
    adapter: ClassifierAdapter,
    session: Session,
}

impl Controller {
    pub fn new(config: PadConfig, classifier: Box<dyn Classifier>) -> Result<Self, PadError> {
        let canvas = StrokeCanvas::new(config.canvas_width, config.canvas_height, config.brush_size)?;
        let adapter = ClassifierAdapter::new(classifier);
        log::info!(
            "Ready: {}x{} canvas, brush {}px, model {}",
            config.canvas_width,
            config.canvas_height,
            config.brush_size,
            adapter.name()
        );
        Ok(Self {
            canvas,
            normalizer: Normalizer::new(config.canvas_width, config.canvas_height),
            adapter,
            session: Session::new(),
        })
    }

    /// Paints one brush dab at a pointer position reported by the GUI.
    pub fn on_stroke(&mut self, x: f32, y: f32) {
        self.canvas.stroke(x, y);
    }

    /// Classifies the current drawing and records the result in the history.
    ///
    /// Nothing is recorded if any step fails.
    pub fn on_predict(&mut self) -> Result<PredictOutcome, PadError> {
        let small = self.normalizer.downsample(self.canvas.bitmap())?;
        let tensor = normalizer::to_tensor(&small);
        let result = self.adapter.predict(&tensor)?;

        log::info!(
            "Predicted {} (top: {})",
            result,
            result
                .top
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        if self.canvas.is_blank() {
            log::debug!("Classified an empty canvas");
        }

        self.session.record_prediction(result.clone());
        Ok(PredictOutcome {
            result,
            thumbnail: normalizer::thumbnail(&small),
        })
    }

    pub fn on_mark_correct(&mut self) -> AccuracyCounters {
        let counters = self.session.mark_correct();
        log::debug!("{}", counters);
        counters
    }

    pub fn on_mark_incorrect(&mut self) -> AccuracyCounters {
        let counters = self.session.mark_incorrect();
        log::debug!("{}", counters);
        counters
    }

    /// Wipes the drawing. History and counters are kept.
    pub fn on_clear(&mut self) {
        self.canvas.reset();
    }

    /// Exports the drawing as PNG.
    ///
    /// A missing or empty path means the user backed out, so nothing happens and
    /// `Ok(None)` is returned. Otherwise returns the path actually written, with `.png`
    /// appended when the given path had no extension.
    pub fn on_save(&self, path: Option<&Path>) -> Result<Option<PathBuf>, PadError> {
        let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(None);
        };
        let target = stroke_canvas::png_path(path);
        self.canvas.save_png(&target)?;
        Ok(Some(target))
    }

    /// Headline text for the result label.
    pub fn result_text(&self) -> String {
        match self.session.last_prediction() {
            Some(result) => format!("Predicted digit: {}", result),
            None => "Predicted digit: ".to_string(),
        }
    }

    pub fn canvas(&self) -> &StrokeCanvas {
        &self.canvas
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn model_name(&self) -> String {
        self.adapter.name()
    }
}
