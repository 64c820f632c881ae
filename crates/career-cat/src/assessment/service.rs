use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use super::domain::{AssessmentError, AssessmentRequest, AssessmentResult};
use super::repository::{AssessmentRecord, RepositoryError, ResultRepository};
use super::scoring::{ScoringEngine, ScoringOptions};

/// Service composing the scoring engine with the result repository.
pub struct AssessmentService<R> {
    engine: Arc<ScoringEngine>,
    repository: Arc<R>,
    defaults: ScoringOptions,
}

impl<R> AssessmentService<R>
where
    R: ResultRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: ScoringEngine, defaults: ScoringOptions) -> Self {
        Self {
            engine: Arc::new(engine),
            repository,
            defaults,
        }
    }

    /// Validate and score a raw request body.
    pub fn submit_json(&self, body: Value) -> Result<AssessmentResult, AssessmentServiceError> {
        let request = AssessmentRequest::from_json(body)?;
        self.submit(request)
    }

    /// Score a submission and persist it when it names a user.
    pub fn submit(
        &self,
        request: AssessmentRequest,
    ) -> Result<AssessmentResult, AssessmentServiceError> {
        let options = self.options_for(&request);
        let result = self.engine.score(&request.answers, &options);

        let top_track = result.recommendations.first().map(String::as_str);
        info!(
            answers = request.answers.len(),
            confidence = result.confidence,
            done = result.done,
            top_track,
            requested_track = request.track.as_deref(),
            "assessment scored"
        );

        if let Some(user_id) = request.user_id {
            let record =
                AssessmentRecord::from_result(user_id, &result, request.raw_answers, Utc::now());
            self.repository.save(record)?;
        }

        Ok(result)
    }

    /// Latest stored record for a user.
    pub fn latest(&self, user_id: &str) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .latest(user_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Request options layered over the configured defaults.
    pub fn options_for(&self, request: &AssessmentRequest) -> ScoringOptions {
        self.defaults
            .with_overrides(request.max_questions, request.stop_at)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Input(#[from] AssessmentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
