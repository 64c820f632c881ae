use career_cat::assessment::{
    AssessmentRecord, RepositoryError, ResultRepository, ScoringOptions,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local stand-in for the application's result store; keeps the
/// latest record per user.
#[derive(Default, Clone)]
pub(crate) struct InMemoryResultRepository {
    records: Arc<Mutex<HashMap<String, AssessmentRecord>>>,
}

impl ResultRepository for InMemoryResultRepository {
    fn save(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        guard.insert(record.user_id.clone(), record);
        Ok(())
    }

    fn latest(&self, user_id: &str) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.get(user_id).cloned())
    }
}

pub(crate) fn parse_stop_at(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    if ScoringOptions::stop_at_in_range(value) {
        Ok(value)
    } else {
        Err(format!("stop-at must be in (0, 1], got {value}"))
    }
}
