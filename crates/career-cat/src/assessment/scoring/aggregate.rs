use std::collections::BTreeMap;

use tracing::debug;

pub(crate) use super::super::domain::SCALE_MAX;
use super::super::domain::{Answer, AnswerValue, RiasecScores, SecondaryTraitScores};
use super::config::{RiasecWeights, ScoringConfig};

pub(crate) const SINGLE_CHOICE_INTENSITY: f64 = 0.8;
pub(crate) const MULTI_CHOICE_INTENSITY: f64 = 0.6;

const DIRECT_SCALE_FACTOR: f64 = 0.2;
const DIRECT_SINGLE_FACTOR: f64 = 4.0;
const DIRECT_MULTI_FACTOR: f64 = 0.5;

/// Raw numeric ratings kept for the consistency part of confidence.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ScaleStatistics {
    values: Vec<f64>,
}

impl ScaleStatistics {
    pub(crate) fn record(&mut self, rating: f64) {
        self.values.push(rating);
    }

    pub(crate) fn count(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Mean rating, or the neutral midpoint when nothing was rated.
    pub(crate) fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 3.0;
        }
        self.sum() / self.count() as f64
    }

    pub(crate) fn variance(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        self.values
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / self.count() as f64
    }
}

/// Un-normalized accumulators for one scoring call.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Accumulators {
    pub riasec: RiasecScores,
    pub secondary: SecondaryTraitScores,
    pub direct: BTreeMap<String, f64>,
    pub scale: ScaleStatistics,
    pub recognized: usize,
    pub skipped: usize,
}

impl Accumulators {
    pub(crate) fn collect(answers: &[Answer], config: &ScoringConfig) -> Self {
        let mut accumulators = Self::default();
        for answer in answers {
            accumulators.accumulate(answer, config);
        }
        accumulators
    }

    pub(crate) fn has_signal(&self) -> bool {
        self.recognized > 0
    }

    fn accumulate(&mut self, answer: &Answer, config: &ScoringConfig) {
        let category = answer.category.as_deref();
        let weights = config.weights_for(category);

        match &answer.value {
            AnswerValue::Scale(rating) => {
                let normalized = rating / SCALE_MAX;
                self.add_riasec(weights, normalized);
                self.scale.record(*rating);
                if let Some(trait_code) = config.secondary_trait_for(category) {
                    self.secondary.add(trait_code, normalized);
                }
                self.add_direct(answer, rating * DIRECT_SCALE_FACTOR);
            }
            AnswerValue::Single(_) => {
                self.add_riasec(weights, SINGLE_CHOICE_INTENSITY);
                self.add_direct(answer, DIRECT_SINGLE_FACTOR);
            }
            AnswerValue::Multi(selections) => {
                if !selections.is_empty() {
                    let per_selection = MULTI_CHOICE_INTENSITY / selections.len() as f64;
                    for _ in selections {
                        self.add_riasec(weights, per_selection);
                    }
                }
                self.add_direct(answer, selections.len() as f64 * DIRECT_MULTI_FACTOR);
            }
            AnswerValue::Unrecognized(_) => {
                debug!(answer_id = %answer.id, "skipping answer with unrecognized value");
                self.skipped += 1;
                return;
            }
        }

        self.recognized += 1;
    }

    fn add_riasec(&mut self, weights: Option<&RiasecWeights>, intensity: f64) {
        let Some(weights) = weights else {
            return;
        };
        for (code, weight) in weights {
            self.riasec.add(*code, intensity * weight);
        }
    }

    /// Adds `factor × points` for every track the question targets directly.
    fn add_direct(&mut self, answer: &Answer, factor: f64) {
        for (track, points) in &answer.tracks {
            *self.direct.entry(track.clone()).or_default() += factor * points;
        }
    }
}
