use super::aggregate::{ScaleStatistics, SCALE_MAX};

pub(crate) const COMPLETION_SHARE: f64 = 0.6;
pub(crate) const CONSISTENCY_SHARE: f64 = 0.4;

/// Share of the question budget already answered, capped at one.
pub(crate) fn completion_factor(answer_count: usize, max_questions: u32) -> f64 {
    if max_questions == 0 {
        return 1.0;
    }
    (answer_count as f64 / f64::from(max_questions)).min(1.0)
}

/// One minus the rating spread relative to the scale ceiling.
pub(crate) fn consistency_factor(scale: &ScaleStatistics) -> f64 {
    1.0 - (scale.variance().sqrt() / SCALE_MAX).min(1.0)
}

/// Stopping confidence rounded to two decimals. Zero when no answer carried
/// a recognized value.
pub(crate) fn confidence(
    scale: &ScaleStatistics,
    answer_count: usize,
    max_questions: u32,
    has_signal: bool,
) -> f64 {
    if !has_signal {
        return 0.0;
    }
    let raw = completion_factor(answer_count, max_questions) * COMPLETION_SHARE
        + consistency_factor(scale) * CONSISTENCY_SHARE;
    round_hundredths(raw.min(1.0))
}

pub(crate) fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(values: &[f64]) -> ScaleStatistics {
        let mut stats = ScaleStatistics::default();
        for value in values {
            stats.record(*value);
        }
        stats
    }

    #[test]
    fn single_rating_is_fully_consistent() {
        let stats = ratings(&[5.0]);
        assert_eq!(consistency_factor(&stats), 1.0);
        assert_eq!(confidence(&stats, 1, 25, true), 0.42);
    }

    #[test]
    fn spread_ratings_reduce_consistency() {
        let stats = ratings(&[1.0, 5.0]);
        assert!((consistency_factor(&stats) - 0.6).abs() < 1e-12);
        assert_eq!(confidence(&stats, 2, 2, true), 0.84);
    }

    #[test]
    fn completion_is_capped_and_guards_zero_budget() {
        assert_eq!(completion_factor(30, 25), 1.0);
        assert_eq!(completion_factor(0, 0), 1.0);
        assert_eq!(completion_factor(5, 20), 0.25);
    }

    #[test]
    fn no_signal_means_no_confidence() {
        assert_eq!(confidence(&ScaleStatistics::default(), 3, 25, false), 0.0);
    }

    #[test]
    fn full_budget_of_identical_ratings_saturates() {
        let stats = ratings(&[4.0; 25]);
        assert_eq!(confidence(&stats, 25, 25, true), 1.0);
    }
}
