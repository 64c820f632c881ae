use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::super::domain::{RiasecCode, SecondaryTrait};

/// Per-code multipliers applied to an answer's intensity.
pub type RiasecWeights = BTreeMap<RiasecCode, f64>;

/// Hand-authored weighting tables consumed by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Category tag to RIASEC weights. Must contain [`ScoringConfig::DEFAULT_CATEGORY`].
    pub categories: BTreeMap<String, RiasecWeights>,
    /// Track catalog; its order breaks ties between equal track scores.
    pub tracks: Vec<TrackProfile>,
    /// Evaluated in order, first match wins.
    #[serde(default)]
    pub secondary_rules: Vec<SecondaryTraitRule>,
}

/// Catalog entry for a recommendable track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackProfile {
    pub id: String,
    /// Ordered affinity codes; only the first three carry positional weight.
    pub codes: Vec<RiasecCode>,
    pub weight: f64,
}

impl TrackProfile {
    pub fn new(id: impl Into<String>, codes: [RiasecCode; 3], weight: f64) -> Self {
        Self {
            id: id.into(),
            codes: codes.to_vec(),
            weight,
        }
    }
}

/// Maps answer categories containing any of `contains` onto a secondary trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryTraitRule {
    pub contains: Vec<String>,
    #[serde(rename = "trait")]
    pub trait_code: SecondaryTrait,
}

impl SecondaryTraitRule {
    pub fn new(contains: &[&str], trait_code: SecondaryTrait) -> Self {
        Self {
            contains: contains.iter().map(|needle| needle.to_string()).collect(),
            trait_code,
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        let category = category.to_ascii_lowercase();
        self.contains
            .iter()
            .any(|needle| category.contains(&needle.to_ascii_lowercase()))
    }
}

impl ScoringConfig {
    pub const DEFAULT_CATEGORY: &'static str = "default";

    /// Built-in tables used when no override file is configured.
    pub fn standard() -> Self {
        use RiasecCode::{
            Artistic as A, Conventional as C, Enterprising as E, Investigative as I,
            Realistic as R, Social as S,
        };

        let uniform = 1.0 / RiasecCode::ALL.len() as f64;
        let mut categories = BTreeMap::new();
        categories.insert(
            Self::DEFAULT_CATEGORY.to_string(),
            RiasecCode::ALL.iter().map(|code| (*code, uniform)).collect(),
        );
        for (category, weights) in [
            ("tech_interest", vec![(R, 0.4), (I, 0.4), (A, 0.2)]),
            ("problem_solving", vec![(I, 0.5), (R, 0.3), (C, 0.2)]),
            ("creativity", vec![(A, 0.6), (I, 0.2), (S, 0.2)]),
            ("teamwork", vec![(S, 0.5), (E, 0.3), (A, 0.2)]),
            ("leadership", vec![(E, 0.6), (S, 0.2), (C, 0.2)]),
            ("planning", vec![(C, 0.5), (E, 0.3), (I, 0.2)]),
            ("values", vec![(S, 0.6), (A, 0.2), (E, 0.2)]),
            ("work_style", vec![(R, 0.3), (C, 0.4), (I, 0.3)]),
        ] {
            categories.insert(category.to_string(), weights.into_iter().collect());
        }

        Self {
            categories,
            tracks: vec![
                TrackProfile::new("ai", [I, R, C], 1.0),
                TrackProfile::new("web", [A, I, R], 0.95),
                TrackProfile::new("cyber", [I, C, R], 0.9),
                TrackProfile::new("design", [A, S, E], 0.95),
                TrackProfile::new("business", [E, S, C], 0.9),
            ],
            secondary_rules: vec![
                SecondaryTraitRule::new(&["openness", "tech"], SecondaryTrait::Openness),
                SecondaryTraitRule::new(
                    &["planning", "organized"],
                    SecondaryTrait::Conscientiousness,
                ),
                SecondaryTraitRule::new(&["teamwork", "social"], SecondaryTrait::Extraversion),
                SecondaryTraitRule::new(&["values", "helping"], SecondaryTrait::Agreeableness),
            ],
        }
    }

    /// Weight table for a category, falling back to the default table.
    pub fn weights_for(&self, category: Option<&str>) -> Option<&RiasecWeights> {
        category
            .and_then(|category| self.categories.get(category))
            .or_else(|| self.categories.get(Self::DEFAULT_CATEGORY))
    }

    pub fn secondary_trait_for(&self, category: Option<&str>) -> Option<SecondaryTrait> {
        let category = category?;
        self.secondary_rules
            .iter()
            .find(|rule| rule.matches(category))
            .map(|rule| rule.trait_code)
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        if !self.categories.contains_key(Self::DEFAULT_CATEGORY) {
            return Err(ScoringConfigError::MissingDefaultCategory);
        }

        for (category, weights) in &self.categories {
            for (code, weight) in weights {
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(ScoringConfigError::InvalidWeight {
                        context: format!("category '{category}' code {}", code.code()),
                        weight: *weight,
                    });
                }
            }
        }

        if self.tracks.is_empty() {
            return Err(ScoringConfigError::EmptyTrackCatalog);
        }

        let mut seen = BTreeSet::new();
        for track in &self.tracks {
            if !seen.insert(track.id.as_str()) {
                return Err(ScoringConfigError::DuplicateTrack(track.id.clone()));
            }
            if track.codes.is_empty() {
                return Err(ScoringConfigError::TrackWithoutCodes(track.id.clone()));
            }
            if !track.weight.is_finite() || track.weight < 0.0 {
                return Err(ScoringConfigError::InvalidWeight {
                    context: format!("track '{}'", track.id),
                    weight: track.weight,
                });
            }
        }

        Ok(())
    }
}

/// Configuration faults detected when the tables are loaded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("category table is missing the mandatory 'default' entry")]
    MissingDefaultCategory,
    #[error("track catalog is empty")]
    EmptyTrackCatalog,
    #[error("track '{0}' is listed more than once")]
    DuplicateTrack(String),
    #[error("track '{0}' has no RIASEC codes")]
    TrackWithoutCodes(String),
    #[error("{context} has invalid weight {weight}")]
    InvalidWeight { context: String, weight: f64 },
}
