use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use digitpad_helpers::PredictionResult;

/// Tally of the user's own verdicts on the predictions they have seen.
///
/// `correct` can never exceed `total`: both only move through `mark_correct` and
/// `mark_incorrect`, and predicting does not touch them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct AccuracyCounters {
    correct: u64,
    total: u64,
}

impl AccuracyCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_correct(&mut self) {
        self.total += 1;
        self.correct += 1;
    }

    pub fn mark_incorrect(&mut self) {
        self.total += 1;
    }

    pub fn correct(&self) -> u64 {
        self.correct
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Fraction of judged predictions marked correct, or `None` before any verdict.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f64 / self.total as f64)
        }
    }
}

impl Display for AccuracyCounters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Correct: {} / {}", self.correct, self.total)
    }
}

/// One line of the prediction history.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct HistoryEntry {
    pub class: usize,
    pub probability: f32,
}

impl From<&PredictionResult> for HistoryEntry {
    fn from(result: &PredictionResult) -> Self {
        HistoryEntry {
            class: result.class,
            probability: result.probability,
        }
    }
}

impl Display for HistoryEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.1}%)", self.class, self.probability * 100.0)
    }
}

/// Every prediction made this session, newest first. Entries are never edited or dropped.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates from the most recent entry to the oldest.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

/// Everything that accumulates over the lifetime of the application.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub counters: AccuracyCounters,
    pub history: History,
    last: Option<PredictionResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `result` as the latest prediction and prepends it to the history.
    pub fn record_prediction(&mut self, result: PredictionResult) {
        let entry = HistoryEntry::from(&result);
        self.history.record(entry);
        log::debug!("History now holds {} predictions", self.history.len());
        self.last = Some(result);
    }

    pub fn last_prediction(&self) -> Option<&PredictionResult> {
        self.last.as_ref()
    }

    pub fn mark_correct(&mut self) -> AccuracyCounters {
        self.counters.mark_correct();
        self.counters
    }

    pub fn mark_incorrect(&mut self) -> AccuracyCounters {
        self.counters.mark_incorrect();
        self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn result_for(class: usize, probability: f32) -> PredictionResult {
        let mut probabilities = vec![0.0; 10];
        probabilities[class] = probability;
        PredictionResult::new(class, probabilities, vec![])
    }

    #[test]
    fn test_counters_start_empty() {
        let counters = AccuracyCounters::new();
        assert_eq!((counters.correct(), counters.total()), (0, 0));
        assert_eq!(counters.accuracy(), None);
        assert_eq!(counters.to_string(), "Correct: 0 / 0");
    }

    #[test]
    fn test_counters_follow_random_verdicts() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut counters = AccuracyCounters::new();
        let mut expected_correct = 0;

        for n in 1..=500u64 {
            if rng.random_bool(0.6) {
                counters.mark_correct();
                expected_correct += 1;
            } else {
                counters.mark_incorrect();
            }
            assert_eq!(counters.total(), n);
            assert_eq!(counters.correct(), expected_correct);
            assert!(counters.correct() <= counters.total());
        }
    }

    #[test]
    fn test_accuracy_ratio() {
        let mut counters = AccuracyCounters::new();
        counters.mark_correct();
        counters.mark_correct();
        counters.mark_correct();
        counters.mark_incorrect();
        assert_abs_diff_eq!(counters.accuracy().unwrap(), 0.75);
        assert_eq!(counters.to_string(), "Correct: 3 / 4");
    }

    #[test]
    fn test_history_is_newest_first() {
        let mut session = Session::new();
        for class in 0..5 {
            session.record_prediction(result_for(class, 0.5));
        }

        assert_eq!(session.history.len(), 5);
        let classes: Vec<usize> = session.history.iter().map(|e| e.class).collect();
        assert_eq!(classes, vec![4, 3, 2, 1, 0]);

        let last = session.last_prediction().unwrap();
        assert_eq!(session.history.latest(), Some(&HistoryEntry::from(last)));
    }

    #[test]
    fn test_predictions_leave_counters_alone() {
        let mut session = Session::new();
        session.mark_incorrect();
        session.record_prediction(result_for(3, 0.9));
        session.record_prediction(result_for(8, 0.4));
        assert_eq!(session.counters.total(), 1);
        assert_eq!(session.counters.correct(), 0);
    }

    #[test]
    fn test_history_entry_display() {
        let entry = HistoryEntry {
            class: 7,
            probability: 0.98123,
        };
        assert_eq!(entry.to_string(), "7 (98.1%)");
    }
}
