//! Trend Analyzer: aggregates a window of sentiment records into trend and risk labels.
//!
//! Pure: the same window always yields the same `TrendAnalysis`. Filtering the window
//! to one user and a recency bound is the store's job, not this module's.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::models::{ScoreError, SentimentLabel};
use crate::models::sentiment::SentimentRecordRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Order of the record slice handed to `analyze_trend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrder {
    NewestFirst,
    OldestFirst,
}

/// Tunable thresholds. Fractions are exclusive (`>`), streaks inclusive (`>=`).
#[derive(Debug, Clone, Copy)]
pub struct TrendPolicy {
    pub trend_fraction: f64,
    pub high_risk_fraction: f64,
    pub medium_risk_fraction: f64,
    pub high_risk_streak: usize,
    pub medium_risk_streak: usize,
}

impl Default for TrendPolicy {
    fn default() -> Self {
        Self {
            trend_fraction: 0.6,
            high_risk_fraction: 0.8,
            medium_risk_fraction: 0.6,
            high_risk_streak: 5,
            medium_risk_streak: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub risk_level: RiskLevel,
    /// Unbroken run of negative records ending at the newest record.
    pub consecutive_negative: usize,
    pub total_entries: usize,
    pub negative_count: usize,
    pub positive_count: usize,
    pub average_negative_score: f64,
}

impl TrendAnalysis {
    /// Baseline for an empty window.
    pub fn empty() -> Self {
        Self {
            trend: Trend::Stable,
            risk_level: RiskLevel::Low,
            consecutive_negative: 0,
            total_entries: 0,
            negative_count: 0,
            positive_count: 0,
            average_negative_score: 0.0,
        }
    }
}

/// Computes trend and risk over a window of records.
///
/// Every record's score distribution is validated first; a malformed one rejects
/// the whole window rather than being normalized.
pub fn analyze_trend(
    records: &[SentimentRecordRow],
    order: RecordOrder,
    policy: &TrendPolicy,
) -> Result<TrendAnalysis, ScoreError> {
    for record in records {
        record.sentiment_scores.validate()?;
    }

    if records.is_empty() {
        return Ok(TrendAnalysis::empty());
    }

    let total = records.len();
    let negative_count = count_label(records, SentimentLabel::Negative);
    let positive_count = count_label(records, SentimentLabel::Positive);

    let is_negative = |r: &&SentimentRecordRow| r.sentiment_label == SentimentLabel::Negative;
    let consecutive_negative = match order {
        RecordOrder::NewestFirst => records.iter().take_while(is_negative).count(),
        RecordOrder::OldestFirst => records.iter().rev().take_while(is_negative).count(),
    };

    let exceeds = |count: usize, fraction: f64| count as f64 > total as f64 * fraction;

    let trend = if exceeds(negative_count, policy.trend_fraction) {
        Trend::Declining
    } else if exceeds(positive_count, policy.trend_fraction) {
        Trend::Improving
    } else {
        Trend::Stable
    };

    let risk_level = if consecutive_negative >= policy.high_risk_streak
        || exceeds(negative_count, policy.high_risk_fraction)
    {
        RiskLevel::High
    } else if consecutive_negative >= policy.medium_risk_streak
        || exceeds(negative_count, policy.medium_risk_fraction)
    {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let average_negative_score = records
        .iter()
        .map(|r| r.sentiment_scores.negative)
        .sum::<f64>()
        / total as f64;

    Ok(TrendAnalysis {
        trend,
        risk_level,
        consecutive_negative,
        total_entries: total,
        negative_count,
        positive_count,
        average_negative_score,
    })
}

fn count_label(records: &[SentimentRecordRow], label: SentimentLabel) -> usize {
    records
        .iter()
        .filter(|r| r.sentiment_label == label)
        .count()
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::analysis::models::SentimentScores;

    /// Builds an oldest-first window, one record per hour.
    pub(crate) fn window(labels: &[SentimentLabel]) -> Vec<SentimentRecordRow> {
        let user_id = Uuid::new_v4();
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        labels
            .iter()
            .enumerate()
            .map(|(i, &label)| SentimentRecordRow {
                id: Uuid::new_v4(),
                user_id,
                journal_entry_id: None,
                sentiment_label: label,
                sentiment_scores: scores_for(label),
                detected_emotions: vec![],
                crisis_flag: false,
                crisis_keywords: vec![],
                created_at: start + Duration::hours(i as i64),
            })
            .collect()
    }

    fn scores_for(label: SentimentLabel) -> SentimentScores {
        match label {
            SentimentLabel::Negative => SentimentScores {
                negative: 0.8,
                neutral: 0.15,
                positive: 0.05,
            },
            SentimentLabel::Neutral => SentimentScores {
                negative: 0.2,
                neutral: 0.6,
                positive: 0.2,
            },
            SentimentLabel::Positive => SentimentScores {
                negative: 0.05,
                neutral: 0.15,
                positive: 0.8,
            },
        }
    }

    use crate::analysis::models::SentimentLabel::{Negative as N, Neutral as U, Positive as P};

    fn analyze(labels: &[SentimentLabel]) -> TrendAnalysis {
        analyze_trend(&window(labels), RecordOrder::OldestFirst, &TrendPolicy::default()).unwrap()
    }

    #[test]
    fn test_empty_window_is_stable_low() {
        let analysis =
            analyze_trend(&[], RecordOrder::NewestFirst, &TrendPolicy::default()).unwrap();
        assert_eq!(analysis, TrendAnalysis::empty());
        assert_eq!(analysis.trend, Trend::Stable);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert_eq!(analysis.consecutive_negative, 0);
        assert_eq!(analysis.total_entries, 0);
        assert_eq!(analysis.average_negative_score, 0.0);
    }

    #[test]
    fn test_seventy_percent_negative_is_declining() {
        let analysis = analyze(&[N, N, N, N, N, N, N, P, P, P]);
        assert_eq!(analysis.trend, Trend::Declining);
        assert_eq!(analysis.negative_count, 7);
    }

    #[test]
    fn test_exactly_sixty_percent_stays_stable() {
        let analysis = analyze(&[N, N, N, N, N, N, P, P, P, U]);
        assert_eq!(analysis.trend, Trend::Stable);
    }

    #[test]
    fn test_exactly_sixty_percent_positive_stays_stable() {
        let analysis = analyze(&[P, P, P, P, P, P, N, U, U, U]);
        assert_eq!(analysis.trend, Trend::Stable);
    }

    #[test]
    fn test_mostly_positive_is_improving() {
        let analysis = analyze(&[U, P, P, P, P]);
        assert_eq!(analysis.trend, Trend::Improving);
        assert_eq!(analysis.positive_count, 4);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_streak_counts_only_tail_run() {
        let analysis = analyze(&[N, P, N, N, N]);
        assert_eq!(analysis.consecutive_negative, 3);
    }

    #[test]
    fn test_streak_is_zero_when_newest_is_not_negative() {
        let analysis = analyze(&[N, N, N, N, P]);
        assert_eq!(analysis.consecutive_negative, 0);
    }

    #[test]
    fn test_newest_first_order_reads_streak_from_front() {
        // Same window as test_streak_counts_only_tail_run, reversed.
        let mut records = window(&[N, P, N, N, N]);
        records.reverse();
        let analysis =
            analyze_trend(&records, RecordOrder::NewestFirst, &TrendPolicy::default()).unwrap();
        assert_eq!(analysis.consecutive_negative, 3);
    }

    #[test]
    fn test_streak_of_five_is_high_risk_at_half_negative() {
        let analysis = analyze(&[P, P, P, P, P, N, N, N, N, N]);
        assert_eq!(analysis.consecutive_negative, 5);
        assert_eq!(analysis.trend, Trend::Stable);
        assert_eq!(analysis.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_over_eighty_percent_negative_is_high_risk() {
        let analysis = analyze(&[N, N, N, N, N, N, N, N, N, P]);
        assert_eq!(analysis.consecutive_negative, 0);
        assert_eq!(analysis.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_streak_of_three_is_medium_risk() {
        let analysis = analyze(&[P, P, P, U, U, U, U, N, N, N]);
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_seventy_percent_without_streak_is_medium_risk() {
        let analysis = analyze(&[N, N, N, N, N, N, N, P, P, P]);
        assert_eq!(analysis.consecutive_negative, 0);
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_average_negative_score() {
        let analysis = analyze(&[N, P]);
        assert!((analysis.average_negative_score - 0.425).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_scores_rejected() {
        let mut records = window(&[N, P]);
        records[1].sentiment_scores.positive = 0.9;
        let result = analyze_trend(&records, RecordOrder::OldestFirst, &TrendPolicy::default());
        assert!(matches!(result, Err(ScoreError::BadSum { .. })));
    }

    #[test]
    fn test_component_slightly_above_one_accepted() {
        let mut records = window(&[N, N]);
        records[1].sentiment_scores = SentimentScores {
            negative: 1.0 + 5e-7,
            neutral: 0.0,
            positive: 0.0,
        };
        let analysis =
            analyze_trend(&records, RecordOrder::OldestFirst, &TrendPolicy::default()).unwrap();
        assert_eq!(analysis.consecutive_negative, 2);
    }

    #[test]
    fn test_any_distribution_near_one_is_accepted() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(2026);
        let mut distributions = vec![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0 + 1e-6, 0.0, 0.0],
            [0.0, 0.0, 1.0 - 1e-6],
        ];
        for _ in 0..500 {
            let (a, b): (f64, f64) = (rng.gen(), rng.gen());
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let mut parts = [lo, hi - lo, 1.0 - hi];
            // Drift the largest component so none goes negative.
            let largest = (0..3)
                .max_by(|&i, &j| parts[i].total_cmp(&parts[j]))
                .unwrap();
            parts[largest] += rng.gen_range(-1e-6..=1e-6);
            distributions.push(parts);
        }

        let records: Vec<SentimentRecordRow> = window(&vec![U; distributions.len()])
            .into_iter()
            .zip(&distributions)
            .map(|(mut record, &[negative, neutral, positive])| {
                record.sentiment_scores = SentimentScores {
                    negative,
                    neutral,
                    positive,
                };
                record.sentiment_label = record.sentiment_scores.primary_label();
                record
            })
            .collect();

        for record in &records {
            let single = std::slice::from_ref(record);
            assert!(
                analyze_trend(single, RecordOrder::OldestFirst, &TrendPolicy::default()).is_ok(),
                "rejected {:?}",
                record.sentiment_scores
            );
        }
        assert!(analyze_trend(&records, RecordOrder::OldestFirst, &TrendPolicy::default()).is_ok());
    }

    #[test]
    fn test_reanalysis_is_identical() {
        let records = window(&[N, U, P, N, N, P, U]);
        let policy = TrendPolicy::default();
        let first = analyze_trend(&records, RecordOrder::OldestFirst, &policy).unwrap();
        let second = analyze_trend(&records, RecordOrder::OldestFirst, &policy).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.average_negative_score.to_bits(),
            second.average_negative_score.to_bits()
        );
    }

    #[test]
    fn test_custom_policy_thresholds() {
        let policy = TrendPolicy {
            trend_fraction: 0.5,
            ..TrendPolicy::default()
        };
        let records = window(&[N, N, N, P, U]);
        let analysis = analyze_trend(&records, RecordOrder::OldestFirst, &policy).unwrap();
        assert_eq!(analysis.trend, Trend::Declining);
    }
}
