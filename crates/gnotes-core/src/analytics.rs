//! Analytics aggregation.
//!
//! Everything here is recomputed from the note collection and the AI usage
//! log on each request; nothing is persisted except the optional snapshot
//! cache kept by the API crate.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults::{TOP_TAG_LIMIT, TRAILING_DAYS};
use crate::models::{AiFeature, AiUsageEvent, Note};
use crate::tags::{self, TagCount};

/// Calls per AI feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiUsageCounts {
    pub summarize: u64,
    #[serde(rename = "autoTitle")]
    pub auto_title: u64,
    pub generate: u64,
}

impl AiUsageCounts {
    pub fn from_events(events: &[AiUsageEvent]) -> Self {
        let mut counts = Self::default();
        for event in events {
            counts.record(event.feature);
        }
        counts
    }

    pub fn record(&mut self, feature: AiFeature) {
        *self.slot(feature) += 1;
    }

    pub fn get(&self, feature: AiFeature) -> u64 {
        match feature {
            AiFeature::Summarize => self.summarize,
            AiFeature::AutoTitle => self.auto_title,
            AiFeature::Generate => self.generate,
        }
    }

    pub fn total(&self) -> u64 {
        self.summarize + self.auto_title + self.generate
    }

    fn slot(&mut self, feature: AiFeature) -> &mut u64 {
        match feature {
            AiFeature::Summarize => &mut self.summarize,
            AiFeature::AutoTitle => &mut self.auto_title,
            AiFeature::Generate => &mut self.generate,
        }
    }
}

/// Notes created on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Everything the analytics view shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub generated_at: DateTime<Utc>,
    /// Oldest day first, ending today.
    pub notes_per_day: Vec<DayCount>,
    pub ai_usage: AiUsageCounts,
    pub top_tags: Vec<TagCount>,
    pub tag_counts: BTreeMap<String, usize>,
    pub total_notes: usize,
    pub total_unique_tags: usize,
}

impl AnalyticsSnapshot {
    /// Aggregate `notes` and AI usage as seen at `now`.
    ///
    /// Notes are bucketed by the calendar date of `created_at` in `now`'s
    /// time zone. Notes outside the trailing window are ignored by the
    /// histogram but still count toward the totals.
    pub fn compute<Tz: TimeZone>(notes: &[Note], ai_usage: AiUsageCounts, now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        let mut notes_per_day: Vec<DayCount> = trailing_dates(today, TRAILING_DAYS)
            .into_iter()
            .map(|date| DayCount { date, count: 0 })
            .collect();
        for note in notes {
            let local = note.created_at.with_timezone(&tz).date_naive();
            if let Some(day) = notes_per_day.iter_mut().find(|d| d.date == local) {
                day.count += 1;
            }
        }

        let counts = tags::tag_counts(notes);
        let tag_counts: BTreeMap<String, usize> =
            counts.iter().map(|c| (c.tag.clone(), c.count)).collect();
        let total_unique_tags = counts.len();
        let mut top_tags = counts;
        top_tags.truncate(TOP_TAG_LIMIT);

        Self {
            generated_at: now.with_timezone(&Utc),
            notes_per_day,
            ai_usage,
            top_tags,
            tag_counts,
            total_notes: notes.len(),
            total_unique_tags,
        }
    }

    /// Replace the usage counts, e.g. with cached ones when the log is down.
    pub fn with_ai_usage(mut self, ai_usage: AiUsageCounts) -> Self {
        self.ai_usage = ai_usage;
        self
    }
}

/// The `days` dates ending at `today`, oldest first.
pub fn trailing_dates(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    (0..days as i64)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use uuid::Uuid;

    fn note_at(tags: &[&str], created_at: DateTime<Utc>) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: "t".into(),
            content: "c".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at,
            embedding: None,
        }
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_trailing_dates_oldest_first() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let dates = trailing_dates(today, 7);
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 2, 25).unwrap());
        assert_eq!(dates[6], today);
    }

    #[test]
    fn test_usage_counts_from_events() {
        let now = Utc::now();
        let events: Vec<AiUsageEvent> = [
            AiFeature::Summarize,
            AiFeature::AutoTitle,
            AiFeature::AutoTitle,
            AiFeature::Generate,
        ]
        .into_iter()
        .map(|feature| AiUsageEvent {
            feature,
            created_at: now,
        })
        .collect();
        let counts = AiUsageCounts::from_events(&events);
        assert_eq!(counts.get(AiFeature::Summarize), 1);
        assert_eq!(counts.get(AiFeature::AutoTitle), 2);
        assert_eq!(counts.get(AiFeature::Generate), 1);
        assert_eq!(counts.total(), 4);

        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["autoTitle"], 2);
    }

    #[test]
    fn test_snapshot_totals() {
        let now = utc("2024-05-10T12:00:00Z");
        let notes = vec![
            note_at(&["a", "b"], now),
            note_at(&["a", "c"], now),
            note_at(&["b", "d"], now),
            note_at(&["e"], now),
            note_at(&["f"], now),
        ];
        let snapshot = AnalyticsSnapshot::compute(&notes, AiUsageCounts::default(), &now);

        assert_eq!(snapshot.total_notes, 5);
        assert_eq!(snapshot.total_unique_tags, 6);
        assert_eq!(snapshot.tag_counts["a"], 2);
        assert_eq!(snapshot.tag_counts["b"], 2);
        assert_eq!(snapshot.top_tags[0].tag, "a");
        assert_eq!(snapshot.top_tags[1].tag, "b");
    }

    #[test]
    fn test_histogram_covers_trailing_week() {
        let now = utc("2024-05-10T12:00:00Z");
        let notes = vec![
            note_at(&["x"], utc("2024-05-10T01:00:00Z")),
            note_at(&["x"], utc("2024-05-10T23:00:00Z")),
            note_at(&["x"], utc("2024-05-04T08:00:00Z")),
            note_at(&["x"], utc("2024-05-03T08:00:00Z")),
        ];
        let snapshot = AnalyticsSnapshot::compute(&notes, AiUsageCounts::default(), &now);

        assert_eq!(snapshot.notes_per_day.len(), 7);
        assert_eq!(snapshot.notes_per_day[0].date.to_string(), "2024-05-04");
        assert_eq!(snapshot.notes_per_day[0].count, 1);
        assert_eq!(snapshot.notes_per_day[6].count, 2);
        let in_window: usize = snapshot.notes_per_day.iter().map(|d| d.count).sum();
        assert_eq!(in_window, 3);
        assert_eq!(snapshot.total_notes, 4);
    }

    #[test]
    fn test_histogram_uses_local_calendar_date() {
        // 2024-05-10 22:30 UTC is already 2024-05-11 in UTC+2
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = utc("2024-05-11T10:00:00Z").with_timezone(&tz);
        let notes = vec![note_at(&["x"], utc("2024-05-10T22:30:00Z"))];
        let snapshot = AnalyticsSnapshot::compute(&notes, AiUsageCounts::default(), &now);

        let last = snapshot.notes_per_day.last().unwrap();
        assert_eq!(last.date.to_string(), "2024-05-11");
        assert_eq!(last.count, 1);
    }

    #[test]
    fn test_top_tags_capped_at_ten() {
        let now = Utc::now();
        let names: Vec<String> = (0..12).map(|i| format!("tag{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let notes = vec![note_at(&refs, now)];
        let snapshot = AnalyticsSnapshot::compute(&notes, AiUsageCounts::default(), &now);
        assert_eq!(snapshot.top_tags.len(), 10);
        assert_eq!(snapshot.total_unique_tags, 12);
    }

    #[test]
    fn test_empty_collection() {
        let now = Utc::now();
        let snapshot = AnalyticsSnapshot::compute(&[], AiUsageCounts::default(), &now);
        assert_eq!(snapshot.total_notes, 0);
        assert!(snapshot.top_tags.is_empty());
        assert!(snapshot.notes_per_day.iter().all(|d| d.count == 0));
    }
}
