//! Adaptive assessment scoring: questionnaire answers in, RIASEC profile, track
//! affinities, a stopping signal, and ranked track recommendations out.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
