use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{AssessmentResult, RiasecScores, SecondaryTraitScores};

/// Stored shape consumed by the dashboard; field names are part of the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub user_id: String,
    /// Top recommendation.
    pub track_id: Option<String>,
    /// Score of `track_id`.
    pub score: f64,
    pub answers: AssessmentRecordPayload,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecordPayload {
    pub riasec_scores: RiasecScores,
    pub big5_scores: SecondaryTraitScores,
    pub track_scores: BTreeMap<String, f64>,
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub raw_answers: Vec<Value>,
}

impl AssessmentRecord {
    pub fn from_result(
        user_id: impl Into<String>,
        result: &AssessmentResult,
        raw_answers: Vec<Value>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let (track_id, score) = match result.top_track() {
            Some((track, score)) => (Some(track.to_string()), score),
            None => (None, 0.0),
        };

        Self {
            user_id: user_id.into(),
            track_id,
            score,
            answers: AssessmentRecordPayload {
                riasec_scores: result.riasec,
                big5_scores: result.secondary_traits,
                track_scores: result.tracks.clone(),
                confidence: result.confidence,
                recommendations: result.recommendations.clone(),
                raw_answers,
            },
            completed_at,
        }
    }
}

/// Storage abstraction owned by the surrounding application.
pub trait ResultRepository: Send + Sync {
    fn save(&self, record: AssessmentRecord) -> Result<(), RepositoryError>;
    fn latest(&self, user_id: &str) -> Result<Option<AssessmentRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
