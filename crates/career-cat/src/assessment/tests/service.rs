use std::sync::Arc;

use serde_json::json;

use super::common::*;
use crate::assessment::{
    AssessmentRequest, AssessmentService, AssessmentServiceError, RepositoryError, ScoringEngine,
};

fn request_body() -> serde_json::Value {
    json!({
        "user_id": "user-42",
        "track": "ai",
        "answers": [
            { "id": "q1", "value": 5, "category": "tech_interest", "tracks": { "ai": 5 } },
            { "id": "q2", "value": "build things", "category": "problem_solving" },
            { "id": "q3", "value": ["python", "rust"], "tracks": { "ai": 2, "cyber": 1 } }
        ]
    })
}

#[test]
fn submit_persists_record_for_known_user() {
    let (service, repository) = build_service();

    let result = service.submit_json(request_body()).expect("submission scores");

    let stored = repository.stored("user-42");
    assert_eq!(stored.len(), 1);
    let record = &stored[0];
    assert_eq!(record.track_id.as_deref(), result.recommendations.first().map(String::as_str));
    assert_eq!(record.score, result.tracks[&result.recommendations[0]]);
    assert_eq!(record.answers.riasec_scores, result.riasec);
    assert_eq!(record.answers.big5_scores, result.secondary_traits);
    assert_eq!(record.answers.track_scores, result.tracks);
    assert_eq!(record.answers.confidence, result.confidence);
    assert_eq!(record.answers.raw_answers.len(), 3);
    assert_eq!(record.answers.raw_answers[0]["id"], "q1");
}

#[test]
fn anonymous_submissions_are_not_persisted() {
    let (service, repository) = build_service();
    let mut body = request_body();
    body.as_object_mut().expect("object").remove("user_id");

    service.submit_json(body).expect("submission scores");

    assert!(repository.records.lock().expect("mutex").is_empty());
}

#[test]
fn missing_answers_are_an_input_error() {
    let (service, _) = build_service();

    let err = service
        .submit_json(json!({ "user_id": "user-42" }))
        .expect_err("answers required");
    assert!(matches!(err, AssessmentServiceError::Input(_)));

    let err = service
        .submit_json(json!({ "answers": "q1=5" }))
        .expect_err("answers must be an array");
    assert_eq!(err.to_string(), "invalid assessment input: answers must be an array");
}

#[test]
fn request_options_override_defaults_within_range() {
    let (service, _) = build_service();
    let mut body = request_body();
    body["maxQuestions"] = json!(3);
    body["stopAt"] = json!(0.5);

    let request = AssessmentRequest::from_json(body).expect("valid request");
    let resolved = service.options_for(&request);

    assert_eq!(resolved.max_questions, 3);
    assert_eq!(resolved.stop_at_confidence, 0.5);
    assert!(service.submit(request).expect("scores").done);
}

#[test]
fn out_of_range_options_fall_back_to_defaults() {
    let (service, _) = build_service();
    let mut body = request_body();
    body["maxQuestions"] = json!(-4);
    body["stopAt"] = json!(1.7);

    let request = AssessmentRequest::from_json(body).expect("valid request");
    let resolved = service.options_for(&request);

    assert_eq!(resolved, options());
}

#[test]
fn repository_failures_surface_to_caller() {
    let service = AssessmentService::new(
        Arc::new(UnavailableRepository),
        ScoringEngine::standard(),
        options(),
    );

    let err = service
        .submit_json(request_body())
        .expect_err("persistence failure propagates");
    assert!(matches!(
        err,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn latest_returns_most_recent_record() {
    let (service, _) = build_service();
    service.submit_json(request_body()).expect("first");
    let mut body = request_body();
    body["answers"] = json!([{ "id": "q1", "value": "lead", "category": "leadership" }]);
    let second = service.submit_json(body).expect("second");

    let record = service.latest("user-42").expect("record stored");
    assert_eq!(record.answers.recommendations, second.recommendations);

    let err = service.latest("someone-else").expect_err("nothing stored");
    assert!(matches!(
        err,
        AssessmentServiceError::Repository(RepositoryError::NotFound)
    ));
}
