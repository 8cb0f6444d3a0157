use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

use digitpad_helpers::{ClassScore, PredictionResult, MODEL_INPUT_SIDE, NUM_CLASSES, TOP_K};
use ndarray::ArrayView3;
use normalizer::InputTensor;

/// Errors that can occur when loading or running a classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// The model could not be loaded
    ModelLoad(String),
    /// The tensor handed to the model is not (1, 28, 28)
    InputShape(Vec<usize>),
    /// The model returned something other than one score per digit
    OutputShape(usize),
    /// The inference backend reported an error
    Backend(String),
}

impl Display for ClassifierError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifierError::ModelLoad(msg) => write!(f, "Failed to load model: {}", msg),
            ClassifierError::InputShape(shape) => {
                write!(f, "Expected an input tensor of shape [1, 28, 28], got {:?}", shape)
            }
            ClassifierError::OutputShape(len) => write!(
                f,
                "Expected {} class probabilities from the model, got {}",
                NUM_CLASSES, len
            ),
            ClassifierError::Backend(msg) => write!(f, "Inference failed: {}", msg),
        }
    }
}

impl Error for ClassifierError {}

/// A trait that defines the interface of a pretrained digit model.
///
/// Implementations receive a (1, 28, 28) tensor with ink at 1.0 and must return one
/// probability per digit, already normalized.
pub trait Classifier: Send + Sync {
    /// Score a single image.
    fn classify(&self, tensor: ArrayView3<f32>) -> Result<Vec<f32>, ClassifierError>;

    /// Return a human readable name for the model (e.g., "ONNX (mnist.onnx)").
    fn name(&self) -> String;
}

/// Turns the raw output of a `Classifier` into a ranked `PredictionResult`.
pub struct ClassifierAdapter {
    classifier: Box<dyn Classifier>,
}

impl ClassifierAdapter {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn name(&self) -> String {
        self.classifier.name()
    }

    /// Classifies one tensor.
    ///
    /// The model output is taken as is: no re-normalization is applied.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::InputShape` for a tensor that is not (1, 28, 28),
    /// `ClassifierError::OutputShape` if the model does not return exactly 10 values, and
    /// passes backend errors through untouched.
    pub fn predict(&self, tensor: &InputTensor) -> Result<PredictionResult, ClassifierError> {
        let side = MODEL_INPUT_SIDE as usize;
        if tensor.shape() != [1, side, side] {
            return Err(ClassifierError::InputShape(tensor.shape().to_vec()));
        }

        let probabilities = self.classifier.classify(tensor.view())?;
        if probabilities.len() != NUM_CLASSES {
            return Err(ClassifierError::OutputShape(probabilities.len()));
        }

        let class = argmax(&probabilities);
        let top = rank(&probabilities, TOP_K);
        Ok(PredictionResult::new(class, probabilities, top))
    }
}

/// Index of the largest value. The first index wins a tie.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// The `k` highest scoring classes, best first.
///
/// Equal probabilities keep ascending class order because the sort is stable.
pub fn rank(probabilities: &[f32], k: usize) -> Vec<ClassScore> {
    let mut scores: Vec<ClassScore> = probabilities
        .iter()
        .enumerate()
        .map(|(class, &p)| ClassScore::new(class, p))
        .collect();
    scores.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });
    scores.truncate(k);
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array3;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    /// Returns the same vector for every input.
    struct FixedClassifier(Vec<f32>);

    impl Classifier for FixedClassifier {
        fn classify(&self, _tensor: ArrayView3<f32>) -> Result<Vec<f32>, ClassifierError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> String {
            "fixed".to_string()
        }
    }

    fn blank_tensor() -> InputTensor {
        Array3::zeros((1, 28, 28))
    }

    fn random_softmax(rng: &mut Xoshiro256PlusPlus) -> Vec<f32> {
        let logits: Vec<f32> = (0..NUM_CLASSES).map(|_| rng.random_range(-5.0..5.0)).collect();
        let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let exp: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
        let sum: f32 = exp.iter().sum();
        exp.iter().map(|e| e / sum).collect()
    }

    #[test]
    fn test_predict_picks_argmax() {
        let mut probabilities = vec![0.01; 10];
        probabilities[7] = 0.85;
        probabilities[1] = 0.06;
        let adapter = ClassifierAdapter::new(Box::new(FixedClassifier(probabilities.clone())));

        let result = adapter.predict(&blank_tensor()).unwrap();
        assert_eq!(result.class, 7);
        assert_eq!(result.probability, 0.85);
        assert_eq!(result.probabilities, probabilities);
        assert_eq!(result.top[0], ClassScore::new(7, 0.85));
        assert_eq!(result.top[1], ClassScore::new(1, 0.06));
        assert_eq!(adapter.name(), "fixed");
    }

    #[test]
    fn test_predict_random_outputs_hold_invariants() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..200 {
            let probabilities = random_softmax(&mut rng);
            let adapter = ClassifierAdapter::new(Box::new(FixedClassifier(probabilities)));
            let result = adapter.predict(&blank_tensor()).unwrap();

            assert_eq!(result.probabilities.len(), 10);
            assert!(result.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
            assert_abs_diff_eq!(result.probabilities.iter().sum::<f32>(), 1.0, epsilon = 1e-4);

            assert!(result.probabilities.iter().all(|&p| p <= result.probability));
            assert_eq!(result.top.len(), 3);
            assert_eq!(result.top[0].class, result.class);
            for pair in result.top.windows(2) {
                assert!(pair[0].probability >= pair[1].probability);
            }
        }
    }

    #[test]
    fn test_ties_prefer_lower_class() {
        let probabilities = vec![0.05, 0.2, 0.05, 0.2, 0.05, 0.2, 0.05, 0.1, 0.05, 0.05];
        assert_eq!(argmax(&probabilities), 1);

        let top = rank(&probabilities, 3);
        let classes: Vec<usize> = top.iter().map(|s| s.class).collect();
        assert_eq!(classes, vec![1, 3, 5]);

        let uniform = vec![0.1; 10];
        let classes: Vec<usize> = rank(&uniform, 3).iter().map(|s| s.class).collect();
        assert_eq!(classes, vec![0, 1, 2]);
        assert_eq!(argmax(&uniform), 0);
    }

    #[test]
    fn test_error_on_wrong_output_length() {
        let adapter = ClassifierAdapter::new(Box::new(FixedClassifier(vec![0.5, 0.5])));
        let result = adapter.predict(&blank_tensor());
        assert_eq!(result, Err(ClassifierError::OutputShape(2)));
    }

    #[test]
    fn test_error_on_wrong_input_shape() {
        let adapter = ClassifierAdapter::new(Box::new(FixedClassifier(vec![0.1; 10])));
        let tensor = Array3::zeros((1, 14, 14));
        let result = adapter.predict(&tensor);
        assert_eq!(result, Err(ClassifierError::InputShape(vec![1, 14, 14])));
    }
}
