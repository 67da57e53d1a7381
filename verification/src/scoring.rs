//! Scoring of a meter reading against a pledge.
//!
//! ```text
//! reduction     = max(baseline − actual, 0)
//! reduction_pct = reduction · 100 / baseline        (0 when baseline is 0)
//! score         = 100                   if reduction_pct ≥ committed
//!               = min(reduction_pct, 100) otherwise
//! ```
//!
//! All arithmetic is integer; the percentage is truncated.

use gridpledge_types::params::MAX_SCORE;
use gridpledge_types::Kwh;

/// Intermediate values of a scored reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub reduction_kwh: Kwh,
    pub reduction_pct: u128,
    pub score: u8,
}

/// Score a reading. Returns `None` only on arithmetic overflow.
pub fn score_reading(baseline_kwh: Kwh, committed_kwh: Kwh, actual_kwh: Kwh) -> Option<ScoreBreakdown> {
    let reduction_kwh = baseline_kwh.saturating_sub(actual_kwh);
    let reduction_pct = if baseline_kwh == 0 {
        0
    } else {
        reduction_kwh.checked_mul(100)? / baseline_kwh
    };
    let score = if reduction_pct >= committed_kwh {
        MAX_SCORE
    } else {
        reduction_pct.min(MAX_SCORE as u128) as u8
    };
    Some(ScoreBreakdown {
        reduction_kwh,
        reduction_pct,
        score,
    })
}

/// Reward multiplier for a score: `score · reward_multiplier / 100`.
pub fn reward_multiplier(score: u8, reward_multiplier: u32) -> u128 {
    score as u128 * reward_multiplier as u128 / MAX_SCORE as u128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_the_pledge_scores_full_marks() {
        // 100 → 70 is a 30% reduction against a 20% pledge.
        let s = score_reading(100, 20, 70).unwrap();
        assert_eq!(s.reduction_kwh, 30);
        assert_eq!(s.reduction_pct, 30);
        assert_eq!(s.score, 100);
    }

    #[test]
    fn falling_short_scores_the_achieved_percentage() {
        // 10% achieved against a 40% pledge.
        let s = score_reading(200, 40, 180).unwrap();
        assert_eq!(s.reduction_pct, 10);
        assert_eq!(s.score, 10);
    }

    #[test]
    fn consumption_above_baseline_scores_zero() {
        let s = score_reading(100, 20, 150).unwrap();
        assert_eq!(s.reduction_kwh, 0);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn percentage_is_truncated() {
        // 1/3 of 100 → 33.33% → 33.
        let s = score_reading(3, 50, 2).unwrap();
        assert_eq!(s.reduction_pct, 33);
        assert_eq!(s.score, 33);
    }

    #[test]
    fn zero_baseline_yields_zero_percentage() {
        let s = score_reading(0, 10, 0).unwrap();
        assert_eq!(s.reduction_pct, 0);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn pledge_above_hundred_caps_score_at_hundred() {
        let s = score_reading(100, 500, 0).unwrap();
        assert_eq!(s.reduction_pct, 100);
        assert_eq!(s.score, 100);
    }

    #[test]
    fn multiplier_scales_by_percent() {
        assert_eq!(reward_multiplier(100, 150), 150);
        assert_eq!(reward_multiplier(33, 150), 49);
        assert_eq!(reward_multiplier(0, 150), 0);
    }
}
