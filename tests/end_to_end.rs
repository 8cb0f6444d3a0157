use std::sync::{Arc, Mutex};

use approx::assert_abs_diff_eq;
use digitpad::{Classifier, ClassifierError, Controller, PadConfig};
use ndarray::ArrayView3;

/// Softmax over a fixed logit vector, remembering the ink mass of every tensor it saw.
struct RecordingClassifier {
    seen: Arc<Mutex<Vec<f32>>>,
}

impl Classifier for RecordingClassifier {
    fn classify(&self, tensor: ArrayView3<f32>) -> Result<Vec<f32>, ClassifierError> {
        self.seen
            .lock()
            .map_err(|e| ClassifierError::Backend(e.to_string()))?
            .push(tensor.sum());

        let logits = [0.1f32, 0.3, 0.2, 2.0, 0.0, 0.5, 0.4, 1.5, 0.8, 0.6];
        let sum: f32 = logits.iter().map(|l| l.exp()).sum();
        Ok(logits.iter().map(|l| l.exp() / sum).collect())
    }

    fn name(&self) -> String {
        "recording".to_string()
    }
}

fn new_pad() -> (Controller, Arc<Mutex<Vec<f32>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let classifier = RecordingClassifier { seen: seen.clone() };
    let controller = Controller::new(PadConfig::default(), Box::new(classifier)).unwrap();
    (controller, seen)
}

#[test]
fn test_blank_session_scenario() {
    let (mut pad, seen) = new_pad();

    // Nothing drawn: the model gets an all-zero tensor and still answers.
    let first = pad.on_predict().unwrap();
    assert_eq!(seen.lock().unwrap()[0], 0.0);
    assert_eq!(first.result.class, 3);
    assert_eq!(first.result.probabilities.len(), 10);
    assert_abs_diff_eq!(
        first.result.probabilities.iter().sum::<f32>(),
        1.0,
        epsilon = 1e-5
    );

    let counters = pad.on_mark_incorrect();
    assert_eq!((counters.correct(), counters.total()), (0, 1));

    pad.on_predict().unwrap();
    assert_eq!(pad.session().history.len(), 2);
    assert_eq!(pad.session().counters.correct(), 0);
    assert_eq!(pad.session().counters.total(), 1);

    let counters = pad.on_mark_correct();
    assert_eq!((counters.correct(), counters.total()), (1, 2));
    assert_eq!(counters.to_string(), "Correct: 1 / 2");
}

#[test]
fn test_history_tracks_every_prediction() {
    let (mut pad, seen) = new_pad();

    for k in 1..=6 {
        pad.on_stroke(40.0 * k as f32, 140.0);
        let outcome = pad.on_predict().unwrap();

        let session = pad.session();
        assert_eq!(session.history.len(), k);
        let latest = session.history.latest().unwrap();
        assert_eq!(latest.class, outcome.result.class);
        assert_eq!(latest.probability, outcome.result.probability);
        assert_eq!(session.last_prediction(), Some(&outcome.result));
    }

    // More ink each time, so the model saw a growing mass.
    let masses = seen.lock().unwrap().clone();
    for pair in masses.windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn test_top_three_and_labels() {
    let (mut pad, _) = new_pad();
    let outcome = pad.on_predict().unwrap();

    let classes: Vec<usize> = outcome.result.top.iter().map(|s| s.class).collect();
    assert_eq!(classes, vec![3, 7, 8]);

    let entry = pad.session().history.latest().unwrap();
    assert!(entry.to_string().starts_with("3 ("));
    assert!(pad.result_text().starts_with("Predicted digit: 3 ("));
}

#[test]
fn test_clear_restores_blank_tensor() {
    let (mut pad, seen) = new_pad();
    pad.on_stroke(140.0, 140.0);
    pad.on_predict().unwrap();
    pad.on_clear();
    pad.on_predict().unwrap();

    let masses = seen.lock().unwrap().clone();
    assert!(masses[0] > 0.0);
    assert_eq!(masses[1], 0.0);
}
