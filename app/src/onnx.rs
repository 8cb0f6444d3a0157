use std::path::Path;

use digitpad::{Classifier, ClassifierError};

#[cfg(feature = "onnx")]
use ndarray::ArrayView3;
#[cfg(feature = "onnx")]
use ort::session::builder::GraphOptimizationLevel;
#[cfg(feature = "onnx")]
use ort::session::Session;
#[cfg(feature = "onnx")]
use std::sync::Mutex;

/// A pretrained MNIST model exported to ONNX, run through ONNX Runtime.
///
/// `Session::run` needs `&mut self`, hence the `Mutex`; inference still happens
/// synchronously on the calling thread.
#[cfg(feature = "onnx")]
pub struct OnnxClassifier {
    session: Mutex<Session>,
    file_name: String,
    softmax: bool,
}

#[cfg(feature = "onnx")]
impl OnnxClassifier {
    /// Loads the model at `path`.
    ///
    /// With `softmax` set, raw outputs are turned into probabilities before they leave
    /// the backend.
    pub fn load(path: &Path, softmax: bool) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ModelLoad(format!(
                "model file not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| ClassifierError::ModelLoad(format!("could not create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ClassifierError::ModelLoad(format!("could not set optimization level: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| ClassifierError::ModelLoad(e.to_string()))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::info!("Loaded ONNX model {}", path.display());

        Ok(Self {
            session: Mutex::new(session),
            file_name,
            softmax,
        })
    }
}

#[cfg(feature = "onnx")]
impl Classifier for OnnxClassifier {
    fn classify(&self, tensor: ArrayView3<f32>) -> Result<Vec<f32>, ClassifierError> {
        let input = ort::value::Tensor::from_array(tensor.to_owned())
            .map_err(|e| ClassifierError::Backend(format!("could not build input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ClassifierError::Backend(format!("session lock poisoned: {}", e)))?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| ClassifierError::Backend(e.to_string()))?;
        let scores: Vec<f32> = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| ClassifierError::Backend(format!("could not read model output: {}", e)))?
            .iter()
            .copied()
            .collect();

        if self.softmax {
            Ok(softmax(&scores))
        } else {
            Ok(scores)
        }
    }

    fn name(&self) -> String {
        format!("ONNX ({})", self.file_name)
    }
}

/// Builds the classifier named on the command line.
#[cfg(feature = "onnx")]
pub fn load_classifier(path: &Path, softmax: bool) -> Result<Box<dyn Classifier>, ClassifierError> {
    Ok(Box::new(OnnxClassifier::load(path, softmax)?))
}

#[cfg(not(feature = "onnx"))]
pub fn load_classifier(_path: &Path, _softmax: bool) -> Result<Box<dyn Classifier>, ClassifierError> {
    Err(ClassifierError::ModelLoad(
        "this build has no model backend; rebuild with the `onnx` feature".to_string(),
    ))
}

/// Numerically stable softmax.
#[cfg_attr(not(feature = "onnx"), allow(dead_code))]
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.iter().map(|e| e / sum).collect()
}
