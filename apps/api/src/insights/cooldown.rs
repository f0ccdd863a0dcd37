//! Insight Deduplicator: per-type cooldown between insights for one user.
//!
//! Advisory only: two concurrent requests can both pass the check and emit.
//! Exactly-once emission would need a conditional write in the insight store.

use chrono::{DateTime, Duration, Utc};

use crate::insights::models::InsightType;
use crate::models::insight::InsightRow;

/// Minimum hours between two insights of the same type. Zero disables the gate.
#[derive(Debug, Clone, Copy)]
pub struct CooldownPolicy {
    pub daily_tip_hours: i64,
    pub mood_pattern_hours: i64,
    pub wellness_recommendation_hours: i64,
    pub crisis_support_hours: i64,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            daily_tip_hours: 24,
            mood_pattern_hours: 48,
            wellness_recommendation_hours: 6,
            crisis_support_hours: 0,
        }
    }
}

impl CooldownPolicy {
    pub fn cooldown(&self, insight_type: InsightType) -> Duration {
        let hours = match insight_type {
            InsightType::DailyTip => self.daily_tip_hours,
            InsightType::MoodPattern => self.mood_pattern_hours,
            InsightType::WellnessRecommendation => self.wellness_recommendation_hours,
            InsightType::CrisisSupport => self.crisis_support_hours,
        };
        Duration::hours(hours)
    }
}

/// Anything carrying an insight type and a creation time.
pub trait CooldownEntry {
    fn insight_type(&self) -> &str;

    /// `None` when the timestamp is missing or could not be parsed.
    /// Such entries never block emission.
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

impl CooldownEntry for InsightRow {
    fn insight_type(&self) -> &str {
        self.insight_type.as_str()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

/// Returns false iff an existing insight of the same type was created strictly
/// after `now - cooldown`.
pub fn should_emit<E: CooldownEntry>(
    existing: &[E],
    insight_type: InsightType,
    now: DateTime<Utc>,
    policy: &CooldownPolicy,
) -> bool {
    let cooldown = policy.cooldown(insight_type);
    if cooldown <= Duration::zero() {
        return true;
    }

    let cutoff = now - cooldown;
    !existing
        .iter()
        .filter(|e| e.insight_type() == insight_type.as_str())
        .filter_map(|e| e.created_at())
        .any(|created_at| created_at > cutoff)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, TimeZone};

    use super::*;

    /// Mirrors loosely-typed history coming from an external store.
    struct RawStamp {
        insight_type: &'static str,
        created_at: Option<String>,
    }

    impl CooldownEntry for RawStamp {
        fn insight_type(&self) -> &str {
            self.insight_type
        }

        fn created_at(&self) -> Option<DateTime<Utc>> {
            let raw = self.created_at.as_deref()?;
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                        .map(|naive| naive.and_utc())
                })
                .ok()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap()
    }

    fn stamp(insight_type: &'static str, hours_ago: i64) -> RawStamp {
        RawStamp {
            insight_type,
            created_at: Some((now() - Duration::hours(hours_ago)).to_rfc3339()),
        }
    }

    #[test]
    fn test_empty_history_allows_emission() {
        let existing: Vec<RawStamp> = vec![];
        assert!(should_emit(
            &existing,
            InsightType::DailyTip,
            now(),
            &CooldownPolicy::default()
        ));
    }

    #[test]
    fn test_daily_tip_one_hour_ago_blocks() {
        let existing = vec![stamp("daily_tip", 1)];
        assert!(!should_emit(
            &existing,
            InsightType::DailyTip,
            now(),
            &CooldownPolicy::default()
        ));
    }

    #[test]
    fn test_wellness_seven_hours_ago_allows() {
        let existing = vec![stamp("wellness_recommendation", 7)];
        assert!(should_emit(
            &existing,
            InsightType::WellnessRecommendation,
            now(),
            &CooldownPolicy::default()
        ));
    }

    #[test]
    fn test_other_type_does_not_block() {
        let existing = vec![stamp("daily_tip", 1)];
        assert!(should_emit(
            &existing,
            InsightType::MoodPattern,
            now(),
            &CooldownPolicy::default()
        ));
    }

    #[test]
    fn test_exactly_at_cutoff_does_not_block() {
        let existing = vec![stamp("mood_pattern", 48)];
        assert!(should_emit(
            &existing,
            InsightType::MoodPattern,
            now(),
            &CooldownPolicy::default()
        ));
    }

    #[test]
    fn test_mood_pattern_within_two_days_blocks() {
        let existing = vec![stamp("mood_pattern", 47)];
        assert!(!should_emit(
            &existing,
            InsightType::MoodPattern,
            now(),
            &CooldownPolicy::default()
        ));
    }

    #[test]
    fn test_crisis_support_always_allowed() {
        let existing = vec![
            stamp("crisis_support", 0),
            stamp("crisis_support", 1),
            RawStamp {
                insight_type: "crisis_support",
                created_at: Some((now() + Duration::hours(2)).to_rfc3339()),
            },
        ];
        assert!(should_emit(
            &existing,
            InsightType::CrisisSupport,
            now(),
            &CooldownPolicy::default()
        ));
    }

    #[test]
    fn test_unparseable_timestamp_fails_open() {
        let existing = vec![
            RawStamp {
                insight_type: "daily_tip",
                created_at: Some("yesterday-ish".to_string()),
            },
            RawStamp {
                insight_type: "daily_tip",
                created_at: None,
            },
        ];
        assert!(should_emit(
            &existing,
            InsightType::DailyTip,
            now(),
            &CooldownPolicy::default()
        ));
    }

    #[test]
    fn test_unparseable_entry_skipped_but_valid_one_still_blocks() {
        let existing = vec![
            RawStamp {
                insight_type: "daily_tip",
                created_at: Some("not a date".to_string()),
            },
            stamp("daily_tip", 3),
        ];
        assert!(!should_emit(
            &existing,
            InsightType::DailyTip,
            now(),
            &CooldownPolicy::default()
        ));
    }

    #[test]
    fn test_naive_and_zulu_timestamps_parse() {
        let naive = RawStamp {
            insight_type: "daily_tip",
            created_at: Some("2026-05-10T11:00:00.123456".to_string()),
        };
        let zulu = RawStamp {
            insight_type: "daily_tip",
            created_at: Some("2026-05-10T11:00:00Z".to_string()),
        };
        assert!(!should_emit(
            &[naive],
            InsightType::DailyTip,
            now(),
            &CooldownPolicy::default()
        ));
        assert!(!should_emit(
            &[zulu],
            InsightType::DailyTip,
            now(),
            &CooldownPolicy::default()
        ));
    }

    #[test]
    fn test_custom_policy() {
        let policy = CooldownPolicy {
            daily_tip_hours: 0,
            ..CooldownPolicy::default()
        };
        let existing = vec![stamp("daily_tip", 0)];
        assert!(should_emit(&existing, InsightType::DailyTip, now(), &policy));
    }
}
