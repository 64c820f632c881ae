use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Six-code interest taxonomy driving track affinities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiasecCode {
    #[serde(rename = "R")]
    Realistic,
    #[serde(rename = "I")]
    Investigative,
    #[serde(rename = "A")]
    Artistic,
    #[serde(rename = "S")]
    Social,
    #[serde(rename = "E")]
    Enterprising,
    #[serde(rename = "C")]
    Conventional,
}

impl RiasecCode {
    pub const ALL: [RiasecCode; 6] = [
        RiasecCode::Realistic,
        RiasecCode::Investigative,
        RiasecCode::Artistic,
        RiasecCode::Social,
        RiasecCode::Enterprising,
        RiasecCode::Conventional,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            RiasecCode::Realistic => "R",
            RiasecCode::Investigative => "I",
            RiasecCode::Artistic => "A",
            RiasecCode::Social => "S",
            RiasecCode::Enterprising => "E",
            RiasecCode::Conventional => "C",
        }
    }

}

/// Big-Five-like dimensions fed only by categorised scale answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SecondaryTrait {
    #[serde(rename = "O")]
    Openness,
    #[serde(rename = "C")]
    Conscientiousness,
    #[serde(rename = "E")]
    Extraversion,
    #[serde(rename = "A")]
    Agreeableness,
    #[serde(rename = "N")]
    Neuroticism,
}

impl SecondaryTrait {
    pub const ALL: [SecondaryTrait; 5] = [
        SecondaryTrait::Openness,
        SecondaryTrait::Conscientiousness,
        SecondaryTrait::Extraversion,
        SecondaryTrait::Agreeableness,
        SecondaryTrait::Neuroticism,
    ];
}

/// Upper bound of the rating scale; ratings are divided by it.
pub const SCALE_MAX: f64 = 5.0;

/// Shape of a single response.
///
/// Decoding from JSON never fails: anything that is not a rating in
/// `[0, SCALE_MAX]`, a string, or an array made only of strings lands in
/// `Unrecognized` and is skipped by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AnswerValue {
    Scale(f64),
    Single(String),
    Multi(BTreeSet<String>),
    Unrecognized(Value),
}

impl AnswerValue {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, AnswerValue::Unrecognized(_))
    }
}

impl From<Value> for AnswerValue {
    fn from(raw: Value) -> Self {
        match raw {
            Value::Number(number) => match number.as_f64() {
                Some(value) if (0.0..=SCALE_MAX).contains(&value) => AnswerValue::Scale(value),
                _ => AnswerValue::Unrecognized(Value::Number(number)),
            },
            Value::String(token) => AnswerValue::Single(token),
            Value::Array(items) => {
                if items.iter().all(Value::is_string) {
                    let selections = items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::String(token) => Some(token),
                            _ => None,
                        })
                        .collect();
                    AnswerValue::Multi(selections)
                } else {
                    AnswerValue::Unrecognized(Value::Array(items))
                }
            }
            other => AnswerValue::Unrecognized(other),
        }
    }
}

impl From<AnswerValue> for Value {
    fn from(value: AnswerValue) -> Self {
        match value {
            AnswerValue::Scale(rating) => serde_json::Number::from_f64(rating)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AnswerValue::Single(token) => Value::String(token),
            AnswerValue::Multi(selections) => {
                Value::Array(selections.into_iter().map(Value::String).collect())
            }
            AnswerValue::Unrecognized(raw) => raw,
        }
    }
}

/// One respondent answer plus the question metadata needed for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Answer {
    pub id: String,
    pub value: AnswerValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tracks: BTreeMap<String, f64>,
}

impl Answer {
    pub fn new(id: impl Into<String>, value: AnswerValue) -> Self {
        Self {
            id: id.into(),
            value,
            category: None,
            tracks: BTreeMap::new(),
        }
    }

    pub fn scale(id: impl Into<String>, rating: f64) -> Self {
        Self::new(id, AnswerValue::Scale(rating))
    }

    pub fn single(id: impl Into<String>, token: impl Into<String>) -> Self {
        Self::new(id, AnswerValue::Single(token.into()))
    }

    pub fn multi<I, S>(id: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            id,
            AnswerValue::Multi(tokens.into_iter().map(Into::into).collect()),
        )
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_track(mut self, track: impl Into<String>, points: f64) -> Self {
        self.tracks.insert(track.into(), points);
        self
    }

    fn unrecognized(raw: Value) -> Self {
        Self::new(String::new(), AnswerValue::Unrecognized(raw))
    }
}

impl From<Value> for Answer {
    fn from(raw: Value) -> Self {
        let mut fields = match raw {
            Value::Object(fields) => fields,
            other => return Self::unrecognized(other),
        };

        let id = match fields.remove("id") {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => String::new(),
        };

        let value = fields
            .remove("value")
            .map(AnswerValue::from)
            .unwrap_or(AnswerValue::Unrecognized(Value::Null));

        let category = match fields.remove("category") {
            Some(Value::String(category)) if !category.trim().is_empty() => Some(category),
            _ => None,
        };

        let tracks = match fields.remove("tracks") {
            Some(Value::Object(tracks)) => direct_track_points(tracks),
            _ => BTreeMap::new(),
        };

        Self {
            id,
            value,
            category,
            tracks,
        }
    }
}

fn direct_track_points(tracks: Map<String, Value>) -> BTreeMap<String, f64> {
    tracks
        .into_iter()
        .filter_map(|(track, points)| {
            points
                .as_f64()
                .filter(|points| points.is_finite() && *points >= 0.0)
                .map(|points| (track, points))
        })
        .collect()
}

/// RIASEC accumulator; normalized so the six codes sum to one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiasecScores {
    #[serde(rename = "R")]
    pub realistic: f64,
    #[serde(rename = "I")]
    pub investigative: f64,
    #[serde(rename = "A")]
    pub artistic: f64,
    #[serde(rename = "S")]
    pub social: f64,
    #[serde(rename = "E")]
    pub enterprising: f64,
    #[serde(rename = "C")]
    pub conventional: f64,
}

impl RiasecScores {
    pub fn get(&self, code: RiasecCode) -> f64 {
        match code {
            RiasecCode::Realistic => self.realistic,
            RiasecCode::Investigative => self.investigative,
            RiasecCode::Artistic => self.artistic,
            RiasecCode::Social => self.social,
            RiasecCode::Enterprising => self.enterprising,
            RiasecCode::Conventional => self.conventional,
        }
    }

    fn slot(&mut self, code: RiasecCode) -> &mut f64 {
        match code {
            RiasecCode::Realistic => &mut self.realistic,
            RiasecCode::Investigative => &mut self.investigative,
            RiasecCode::Artistic => &mut self.artistic,
            RiasecCode::Social => &mut self.social,
            RiasecCode::Enterprising => &mut self.enterprising,
            RiasecCode::Conventional => &mut self.conventional,
        }
    }

    pub fn add(&mut self, code: RiasecCode, amount: f64) {
        *self.slot(code) += amount;
    }

    pub fn total(&self) -> f64 {
        RiasecCode::ALL.iter().map(|code| self.get(*code)).sum()
    }

    /// Scale the vector to sum to one; a vector without signal stays zero.
    pub fn normalized(mut self) -> Self {
        let total = self.total();
        if total > 0.0 {
            for code in RiasecCode::ALL {
                *self.slot(code) /= total;
            }
        }
        self
    }

    pub fn dominant(&self) -> Option<RiasecCode> {
        RiasecCode::ALL
            .into_iter()
            .filter(|code| self.get(*code) > 0.0)
            .fold(None, |best: Option<RiasecCode>, code| match best {
                Some(current) if self.get(current) >= self.get(code) => Some(current),
                _ => Some(code),
            })
    }
}

/// Secondary trait accumulator, normalized the same way as RIASEC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondaryTraitScores {
    #[serde(rename = "O")]
    pub openness: f64,
    #[serde(rename = "C")]
    pub conscientiousness: f64,
    #[serde(rename = "E")]
    pub extraversion: f64,
    #[serde(rename = "A")]
    pub agreeableness: f64,
    #[serde(rename = "N")]
    pub neuroticism: f64,
}

impl SecondaryTraitScores {
    pub fn get(&self, trait_code: SecondaryTrait) -> f64 {
        match trait_code {
            SecondaryTrait::Openness => self.openness,
            SecondaryTrait::Conscientiousness => self.conscientiousness,
            SecondaryTrait::Extraversion => self.extraversion,
            SecondaryTrait::Agreeableness => self.agreeableness,
            SecondaryTrait::Neuroticism => self.neuroticism,
        }
    }

    fn slot(&mut self, trait_code: SecondaryTrait) -> &mut f64 {
        match trait_code {
            SecondaryTrait::Openness => &mut self.openness,
            SecondaryTrait::Conscientiousness => &mut self.conscientiousness,
            SecondaryTrait::Extraversion => &mut self.extraversion,
            SecondaryTrait::Agreeableness => &mut self.agreeableness,
            SecondaryTrait::Neuroticism => &mut self.neuroticism,
        }
    }

    pub fn add(&mut self, trait_code: SecondaryTrait, amount: f64) {
        *self.slot(trait_code) += amount;
    }

    pub fn total(&self) -> f64 {
        SecondaryTrait::ALL
            .iter()
            .map(|trait_code| self.get(*trait_code))
            .sum()
    }

    pub fn normalized(mut self) -> Self {
        let total = self.total();
        if total > 0.0 {
            for trait_code in SecondaryTrait::ALL {
                *self.slot(trait_code) /= total;
            }
        }
        self
    }
}

/// Output of a scoring call. Owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub riasec: RiasecScores,
    pub secondary_traits: SecondaryTraitScores,
    pub tracks: BTreeMap<String, f64>,
    pub confidence: f64,
    pub done: bool,
    pub recommendations: Vec<String>,
}

impl AssessmentResult {
    /// Highest ranked track and its score.
    pub fn top_track(&self) -> Option<(&str, f64)> {
        let track = self.recommendations.first()?;
        let score = self.tracks.get(track).copied().unwrap_or_default();
        Some((track.as_str(), score))
    }
}

/// Submission accepted at the HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRequest {
    pub user_id: Option<String>,
    pub answers: Vec<Answer>,
    pub raw_answers: Vec<Value>,
    pub track: Option<String>,
    pub max_questions: Option<u32>,
    pub stop_at: Option<f64>,
}

impl AssessmentRequest {
    /// Validate the request envelope. Only a missing or non-array `answers`
    /// field is an error; option fields of the wrong type are dropped.
    pub fn from_json(body: Value) -> Result<Self, AssessmentError> {
        let mut fields = match body {
            Value::Object(fields) => fields,
            _ => {
                return Err(AssessmentError::InvalidInput(
                    "request body must be a JSON object".to_string(),
                ))
            }
        };

        let raw_answers = match fields.remove("answers") {
            Some(Value::Array(answers)) => answers,
            Some(_) => {
                return Err(AssessmentError::InvalidInput(
                    "answers must be an array".to_string(),
                ))
            }
            None => {
                return Err(AssessmentError::InvalidInput(
                    "answers is required".to_string(),
                ))
            }
        };

        let answers = raw_answers.iter().cloned().map(Answer::from).collect();

        let user_id = match fields.remove("user_id") {
            Some(Value::String(user_id)) if !user_id.trim().is_empty() => Some(user_id),
            _ => None,
        };

        let track = match fields.remove("track") {
            Some(Value::String(track)) if !track.trim().is_empty() => Some(track),
            _ => None,
        };

        let max_questions = fields
            .get("maxQuestions")
            .and_then(Value::as_u64)
            .map(|value| u32::try_from(value).unwrap_or(u32::MAX));

        let stop_at = fields.get("stopAt").and_then(Value::as_f64);

        Ok(Self {
            user_id,
            answers,
            raw_answers,
            track,
            max_questions,
            stop_at,
        })
    }
}

/// Structural violation of the scoring input contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("invalid assessment input: {0}")]
    InvalidInput(String),
}
