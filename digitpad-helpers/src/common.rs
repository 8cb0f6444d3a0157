use std::fmt::{Display, Formatter};

/// A digit class paired with the probability the classifier gave it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct ClassScore {
    pub class: usize,
    pub probability: f32,
}

impl ClassScore {
    pub fn new(class: usize, probability: f32) -> Self {
        ClassScore { class, probability }
    }
}

impl Display for ClassScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.2}%", self.class, self.probability * 100.0)
    }
}

/// The outcome of classifying one drawing.
///
/// `probabilities` holds one entry per class in class order, exactly as the model
/// produced them. `top` is the ranked head of that vector, best first.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct PredictionResult {
    pub class: usize,
    pub probability: f32,
    pub probabilities: Vec<f32>,
    pub top: Vec<ClassScore>,
}

impl PredictionResult {
    /// Builds a result whose headline probability is `probabilities[class]`.
    ///
    /// # Panics
    ///
    /// Panics if `class` is not a valid index into `probabilities`.
    pub fn new(class: usize, probabilities: Vec<f32>, top: Vec<ClassScore>) -> Self {
        let probability = probabilities[class];
        PredictionResult {
            class,
            probability,
            probabilities,
            top,
        }
    }

    /// The predicted class together with its probability.
    pub fn best(&self) -> ClassScore {
        ClassScore::new(self.class, self.probability)
    }
}

impl Display for PredictionResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.2}%)", self.class, self.probability * 100.0)
    }
}
