//! End-to-end scenarios for the assessment scoring service.
//!
//! Requests go through the public router so the wire contract, the scoring
//! engine, and the persisted record shape are exercised together.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use serde_json::Value;

    use career_cat::assessment::{
        assessment_router, AssessmentRecord, AssessmentService, RepositoryError,
        ResultRepository, ScoringEngine, ScoringOptions,
    };

    #[derive(Default, Clone)]
    pub struct RecordingRepository {
        records: Arc<Mutex<HashMap<String, AssessmentRecord>>>,
    }

    impl RecordingRepository {
        pub fn get(&self, user_id: &str) -> Option<AssessmentRecord> {
            self.records
                .lock()
                .expect("repository mutex poisoned")
                .get(user_id)
                .cloned()
        }
    }

    impl ResultRepository for RecordingRepository {
        fn save(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
            self.records
                .lock()
                .expect("repository mutex poisoned")
                .insert(record.user_id.clone(), record);
            Ok(())
        }

        fn latest(&self, user_id: &str) -> Result<Option<AssessmentRecord>, RepositoryError> {
            Ok(self.get(user_id))
        }
    }

    pub fn router() -> (axum::Router, RecordingRepository) {
        let repository = RecordingRepository::default();
        let service = AssessmentService::new(
            Arc::new(repository.clone()),
            ScoringEngine::standard(),
            ScoringOptions::default(),
        );
        (assessment_router(Arc::new(service)), repository)
    }

    pub fn post_json(body: &Value) -> Request<Body> {
        Request::post("/api/v1/assessment/score")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("serializes")))
            .expect("request builds")
    }

    pub async fn read_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }
}

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn full_questionnaire_recommends_and_persists() {
    let (router, repository) = router();
    let answers: Vec<_> = (0..25)
        .map(|index| json!({ "id": format!("q{index}"), "value": 5, "tracks": { "ai": 5 } }))
        .collect();

    let response = router
        .oneshot(post_json(&json!({
            "user_id": "student-1",
            "answers": answers,
            "maxQuestions": 25,
            "stopAt": 0.85
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["recommendations"][0], "ai");
    assert_eq!(payload["done"], true);
    assert_eq!(payload["confidence"], 1.0);

    let record = repository.get("student-1").expect("record persisted");
    assert_eq!(record.track_id.as_deref(), Some("ai"));
    assert_eq!(record.answers.raw_answers.len(), 25);
    assert_eq!(record.answers.recommendations[0], "ai");

    let stored = serde_json::to_value(&record).expect("record serializes");
    for key in [
        "riasec_scores",
        "big5_scores",
        "track_scores",
        "confidence",
        "recommendations",
        "raw_answers",
    ] {
        assert!(stored["answers"].get(key).is_some(), "missing {key}");
    }
}

#[tokio::test]
async fn partial_questionnaire_keeps_going() {
    let (router, repository) = router();

    let response = router
        .oneshot(post_json(&json!({
            "answers": [
                { "id": "q1", "value": 5, "category": "tech_interest" },
                { "id": "q2", "value": null },
                { "id": "q3", "value": ["draw", "paint"], "category": "creativity" }
            ]
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(payload["done"], false);
    let total: f64 = payload["riasec"]
        .as_object()
        .expect("riasec object")
        .values()
        .filter_map(|value| value.as_f64())
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(repository.get("").is_none());
}

#[tokio::test]
async fn missing_answers_are_rejected_with_error_body() {
    let (router, _) = router();

    let response = router
        .oneshot(post_json(&json!({ "user_id": "student-2" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("answers"));
}
