use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::super::domain::RiasecScores;
use super::aggregate::SCALE_MAX;
use super::config::{ScoringConfig, TrackProfile};

/// Weights for the first, second and third affinity code of a track.
pub(crate) const POSITIONAL_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];
pub(crate) const RIASEC_SHARE: f64 = 0.7;
pub(crate) const DIRECT_SHARE: f64 = 0.3;
pub(crate) const RECOMMENDATION_LIMIT: usize = 3;

pub(crate) fn riasec_projection(riasec: &RiasecScores, track: &TrackProfile) -> f64 {
    track
        .codes
        .iter()
        .zip(POSITIONAL_WEIGHTS)
        .map(|(code, weight)| riasec.get(*code) * weight)
        .sum()
}

/// Direct points relative to the ceiling of `answer_count × 5`.
///
/// The ceiling assumes every answer could award five points to every track,
/// which is a heuristic rather than the true attainable maximum.
pub(crate) fn direct_normalized(direct_points: f64, answer_count: usize) -> f64 {
    if answer_count == 0 {
        return 0.0;
    }
    direct_points / (answer_count as f64 * SCALE_MAX)
}

/// Scores every catalog track, preserving catalog order.
pub(crate) fn score_tracks(
    riasec: &RiasecScores,
    direct: &BTreeMap<String, f64>,
    answer_count: usize,
    config: &ScoringConfig,
) -> Vec<(String, f64)> {
    config
        .tracks
        .iter()
        .map(|track| {
            let projection = riasec_projection(riasec, track);
            let direct_points = direct.get(&track.id).copied().unwrap_or_default();
            let blended = projection * RIASEC_SHARE
                + direct_normalized(direct_points, answer_count) * DIRECT_SHARE;
            (track.id.clone(), blended * track.weight)
        })
        .collect()
}

/// Top track ids by descending score; equal scores keep catalog order.
pub(crate) fn rank(track_scores: &[(String, f64)]) -> Vec<String> {
    let mut ranked: Vec<&(String, f64)> = track_scores.iter().collect();
    ranked.sort_by(|left, right| right.1.partial_cmp(&left.1).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .take(RECOMMENDATION_LIMIT)
        .map(|(track, _)| track.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::RiasecCode;

    #[test]
    fn projection_uses_positional_weights() {
        let config = ScoringConfig::standard();
        let mut riasec = RiasecScores::default();
        riasec.add(RiasecCode::Investigative, 0.5);
        riasec.add(RiasecCode::Realistic, 0.5);

        let ai = &config.tracks[0];
        assert_eq!(ai.id, "ai");
        assert!((riasec_projection(&riasec, ai) - (0.5 * 0.5 + 0.5 * 0.3)).abs() < 1e-12);
    }

    #[test]
    fn codes_beyond_the_third_are_ignored() {
        let track = TrackProfile {
            id: "data".to_string(),
            codes: vec![
                RiasecCode::Investigative,
                RiasecCode::Conventional,
                RiasecCode::Realistic,
                RiasecCode::Social,
            ],
            weight: 1.0,
        };
        let mut riasec = RiasecScores::default();
        riasec.add(RiasecCode::Social, 1.0);

        assert_eq!(riasec_projection(&riasec, &track), 0.0);
    }

    #[test]
    fn direct_normalization_guards_empty_submissions() {
        assert_eq!(direct_normalized(12.0, 0), 0.0);
        assert_eq!(direct_normalized(10.0, 4), 0.5);
    }

    #[test]
    fn blend_is_scaled_by_track_weight() {
        let config = ScoringConfig::standard();
        let mut direct = BTreeMap::new();
        direct.insert("cyber".to_string(), 5.0);

        let scores = score_tracks(&RiasecScores::default(), &direct, 1, &config);
        let cyber = scores
            .iter()
            .find(|(track, _)| track == "cyber")
            .expect("cyber scored");

        assert!((cyber.1 - 0.3 * 0.9).abs() < 1e-12);
    }

    #[test]
    fn ranking_is_stable_and_truncated() {
        let scores = vec![
            ("ai".to_string(), 0.1),
            ("web".to_string(), 0.4),
            ("cyber".to_string(), 0.1),
            ("design".to_string(), 0.4),
            ("business".to_string(), 0.1),
        ];

        assert_eq!(rank(&scores), vec!["web", "design", "ai"]);
    }
}
