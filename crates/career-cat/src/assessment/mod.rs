//! Adaptive assessment scoring and its service/HTTP boundary.
//!
//! The engine is a pure function of the submitted answers and the weighting
//! tables; persistence is delegated to a [`ResultRepository`] supplied by the
//! caller.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Answer, AnswerValue, AssessmentError, AssessmentRequest, AssessmentResult, RiasecCode,
    RiasecScores, SecondaryTrait, SecondaryTraitScores,
};
pub use repository::{AssessmentRecord, AssessmentRecordPayload, RepositoryError, ResultRepository};
pub use router::assessment_router;
pub use scoring::{
    score, RiasecWeights, ScoringConfig, ScoringConfigError, ScoringEngine, ScoringOptions,
    SecondaryTraitRule, TrackProfile,
};
pub use service::{AssessmentService, AssessmentServiceError};
