use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::repository::{AssessmentRecord, RepositoryError, ResultRepository};
use crate::assessment::{
    assessment_router, Answer, AssessmentResult, AssessmentService, ScoringEngine,
    ScoringOptions,
};

pub(super) fn options() -> ScoringOptions {
    ScoringOptions {
        max_questions: 25,
        stop_at_confidence: 0.85,
    }
}

pub(super) fn score(answers: &[Answer]) -> AssessmentResult {
    ScoringEngine::standard().score(answers, &options())
}

pub(super) fn tech_answer(id: &str, rating: f64) -> Answer {
    Answer::scale(id, rating).with_category("tech_interest")
}

pub(super) fn mixed_answers() -> Vec<Answer> {
    vec![
        Answer::scale("q1", 4.0).with_category("planning"),
        Answer::single("q2", "mentor").with_category("values"),
        Answer::multi("q3", ["sketching", "prototyping"]).with_category("creativity"),
    ]
}

pub(super) fn assert_sums_to_one(total: f64) {
    assert!((total - 1.0).abs() < 1e-9, "expected unit sum, got {total}");
}

pub(super) fn build_service() -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service =
        AssessmentService::new(repository.clone(), ScoringEngine::standard(), options());
    (service, repository)
}

pub(super) fn router_with_service(service: AssessmentService<MemoryRepository>) -> axum::Router {
    assessment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<String, Vec<AssessmentRecord>>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, user_id: &str) -> Vec<AssessmentRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl ResultRepository for MemoryRepository {
    fn save(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .entry(record.user_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    fn latest(&self, user_id: &str) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Ok(self.stored(user_id).pop())
    }
}

pub(super) struct UnavailableRepository;

impl ResultRepository for UnavailableRepository {
    fn save(&self, _record: AssessmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest(&self, _user_id: &str) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
