mod aggregate;
mod confidence;
mod config;
mod projection;

pub use config::{
    RiasecWeights, ScoringConfig, ScoringConfigError, SecondaryTraitRule, TrackProfile,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{Answer, AssessmentResult};
use aggregate::Accumulators;

/// Question budget and early-stop threshold for one assessment flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringOptions {
    pub max_questions: u32,
    pub stop_at_confidence: f64,
}

impl ScoringOptions {
    pub const DEFAULT_MAX_QUESTIONS: u32 = 25;
    pub const DEFAULT_STOP_AT_CONFIDENCE: f64 = 0.85;

    pub fn stop_at_in_range(value: f64) -> bool {
        value.is_finite() && value > 0.0 && value <= 1.0
    }

    /// Layer per-request values over these defaults. A threshold outside
    /// (0, 1] is ignored.
    pub fn with_overrides(mut self, max_questions: Option<u32>, stop_at: Option<f64>) -> Self {
        if let Some(max_questions) = max_questions {
            self.max_questions = max_questions;
        }

        match stop_at {
            Some(stop_at) if Self::stop_at_in_range(stop_at) => {
                self.stop_at_confidence = stop_at;
            }
            Some(stop_at) => {
                warn!(
                    stop_at,
                    fallback = self.stop_at_confidence,
                    "stopAt outside (0, 1]; using default"
                );
            }
            None => {}
        }

        self
    }
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            max_questions: Self::DEFAULT_MAX_QUESTIONS,
            stop_at_confidence: Self::DEFAULT_STOP_AT_CONFIDENCE,
        }
    }
}

/// Stateless scorer bound to a validated set of weighting tables.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn standard() -> Self {
        Self {
            config: ScoringConfig::standard(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, answers: &[Answer], options: &ScoringOptions) -> AssessmentResult {
        score(answers, &self.config, options)
    }
}

/// Turn an answer list into trait vectors, track scores, a stopping signal,
/// and the top recommendations. Malformed answers are skipped, never fatal.
pub fn score(
    answers: &[Answer],
    config: &ScoringConfig,
    options: &ScoringOptions,
) -> AssessmentResult {
    let accumulators = Accumulators::collect(answers, config);
    let answer_count = answers.len();
    if accumulators.skipped > 0 {
        debug!(
            skipped = accumulators.skipped,
            answer_count, "answers without a recognized value were skipped"
        );
    }

    let riasec = accumulators.riasec.normalized();
    let secondary_traits = accumulators.secondary.normalized();

    let track_scores =
        projection::score_tracks(&riasec, &accumulators.direct, answer_count, config);
    let recommendations = projection::rank(&track_scores);

    let confidence = confidence::confidence(
        &accumulators.scale,
        answer_count,
        options.max_questions,
        accumulators.has_signal(),
    );
    let done = answer_count >= options.max_questions as usize
        || confidence >= options.stop_at_confidence;

    AssessmentResult {
        riasec,
        secondary_traits,
        tracks: track_scores.into_iter().collect(),
        confidence,
        done,
        recommendations,
    }
}
