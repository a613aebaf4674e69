// src/progress.rs

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::models::{ProgressRecord, StudyStats};
use crate::storage::{ProgressStore, Result};

/// Per-learner study state: one record per attempted card, backed by a
/// persistence collaborator.
///
/// The in-memory set is authoritative for the session. Every mutation is
/// written through to the store before it is committed here, so a failed
/// write surfaces as an error and leaves the session state untouched.
pub struct ProgressTracker<S: ProgressStore> {
    store: S,
    records: Vec<ProgressRecord>,
    total_cards: usize,
}

impl<S: ProgressStore> ProgressTracker<S> {
    /// Loads whatever the store holds for this learner. `total_cards` is the
    /// repository size and only feeds statistics.
    pub fn new(mut store: S, total_cards: usize) -> Result<Self> {
        let records = store.load()?;
        debug!("loaded {} progress records", records.len());
        Ok(ProgressTracker {
            store,
            records,
            total_cards,
        })
    }

    /// Records a grading event against the wall clock.
    pub fn record_attempt(&mut self, card_id: &str, correct: bool) -> Result<StudyStats> {
        self.record_attempt_at(card_id, correct, Utc::now())
    }

    /// Folds a grading event into the record for `card_id`, creating the
    /// record on the first attempt, then recomputes and persists statistics.
    pub fn record_attempt_at(
        &mut self,
        card_id: &str,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Result<StudyStats> {
        let position = self.records.iter().position(|r| r.card_id == card_id);
        let updated = match position {
            Some(i) => {
                let mut record = self.records[i].clone();
                record.register(correct, now);
                record
            }
            None => ProgressRecord::first_attempt(card_id, correct, now),
        };

        self.store.upsert_attempt(&updated)?;
        match position {
            Some(i) => self.records[i] = updated,
            None => self.records.push(updated),
        }

        let stats = self.stats();
        self.store.save_stats(&stats)?;
        info!(
            "attempt recorded for {}: correct={}, {}/{} cards at {:.0}% accuracy",
            card_id, correct, stats.completed_cards, stats.total_cards, stats.accuracy
        );
        Ok(stats)
    }

    pub fn get_record(&self, card_id: &str) -> Option<&ProgressRecord> {
        self.records.iter().find(|r| r.card_id == card_id)
    }

    pub fn records(&self) -> &[ProgressRecord] {
        &self.records
    }

    /// Ids of every studied card whose next review is due at `now`.
    pub fn due_for_review(&self, now: DateTime<Utc>) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.next_review <= now)
            .map(|r| r.card_id.as_str())
            .collect()
    }

    /// Drops every record for this learner. The store is cleared first so a
    /// storage failure leaves the session intact.
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear()?;
        self.records.clear();
        info!("progress reset");
        Ok(())
    }

    /// Statistics are derived fresh from the record set on every call.
    pub fn stats(&self) -> StudyStats {
        compute_stats(&self.records, self.total_cards)
    }
}

/// Aggregates a record set into the learner's headline numbers.
///
/// `correct_cards` counts cards whose most recent attempt was correct, not
/// correct attempts overall. The streak stays 0: no per-day study log exists
/// yet to derive one from.
pub fn compute_stats(records: &[ProgressRecord], total_cards: usize) -> StudyStats {
    let completed_cards = records.iter().filter(|r| r.completed).count();
    let correct_cards = records.iter().filter(|r| r.correct).count();
    let accuracy = if completed_cards > 0 {
        correct_cards as f64 / completed_cards as f64 * 100.0
    } else {
        0.0
    };

    StudyStats {
        total_cards,
        completed_cards,
        correct_cards,
        accuracy,
        streak: 0,
        last_studied: records.iter().map(|r| r.last_studied).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REVIEW_INTERVAL_HOURS;
    use crate::storage::StorageError;
    use chrono::Duration;
    use std::io;

    /// Ephemeral store used to observe write-through behavior.
    #[derive(Default)]
    struct MemoryStore {
        records: Vec<ProgressRecord>,
        stats: Option<StudyStats>,
    }

    impl ProgressStore for MemoryStore {
        fn load(&mut self) -> Result<Vec<ProgressRecord>> {
            Ok(self.records.clone())
        }

        fn upsert_attempt(&mut self, record: &ProgressRecord) -> Result<()> {
            match self.records.iter_mut().find(|r| r.card_id == record.card_id) {
                Some(existing) => *existing = record.clone(),
                None => self.records.push(record.clone()),
            }
            Ok(())
        }

        fn save_stats(&mut self, stats: &StudyStats) -> Result<()> {
            self.stats = Some(stats.clone());
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            self.records.clear();
            self.stats = None;
            Ok(())
        }
    }

    /// Store whose writes always fail, for failure-isolation tests.
    #[derive(Default)]
    struct FailingStore;

    impl ProgressStore for FailingStore {
        fn load(&mut self) -> Result<Vec<ProgressRecord>> {
            Ok(Vec::new())
        }

        fn upsert_attempt(&mut self, _record: &ProgressRecord) -> Result<()> {
            Err(StorageError::Io(io::Error::new(
                io::ErrorKind::Other,
                "backend unavailable",
            )))
        }

        fn clear(&mut self) -> Result<()> {
            Err(StorageError::Io(io::Error::new(
                io::ErrorKind::Other,
                "backend unavailable",
            )))
        }
    }

    fn tracker(total: usize) -> ProgressTracker<MemoryStore> {
        ProgressTracker::new(MemoryStore::default(), total).unwrap()
    }

    #[test]
    fn first_attempt_creates_a_record() {
        let mut tracker = tracker(10);
        let now = Utc::now();
        tracker.record_attempt_at("A", true, now).unwrap();

        let record = tracker.get_record("A").unwrap();
        assert!(record.completed);
        assert!(record.correct);
        assert_eq!(record.attempts, 1);
        assert_eq!(record.last_studied, now);
        assert_eq!(
            record.next_review,
            now + Duration::hours(REVIEW_INTERVAL_HOURS)
        );
    }

    #[test]
    fn repeat_attempts_merge_into_one_record() {
        let mut tracker = tracker(10);
        let now = Utc::now();
        tracker.record_attempt_at("A", true, now).unwrap();
        tracker
            .record_attempt_at("A", true, now + Duration::minutes(1))
            .unwrap();

        assert_eq!(tracker.records().len(), 1);
        let record = tracker.get_record("A").unwrap();
        assert_eq!(record.attempts, 2);
        assert!(record.correct);
    }

    #[test]
    fn correctness_is_most_recent_wins() {
        let mut tracker = tracker(10);
        let now = Utc::now();
        tracker.record_attempt_at("A", true, now).unwrap();
        tracker
            .record_attempt_at("A", false, now + Duration::minutes(1))
            .unwrap();

        let record = tracker.get_record("A").unwrap();
        assert!(!record.correct);
        assert_eq!(record.attempts, 2);
    }

    #[test]
    fn stats_track_the_record_set() {
        let mut tracker = tracker(5);
        let now = Utc::now();
        tracker.record_attempt_at("A", true, now).unwrap();
        tracker.record_attempt_at("B", false, now).unwrap();
        tracker.record_attempt_at("C", true, now).unwrap();

        let stats = tracker.stats();
        assert_eq!(stats.total_cards, 5);
        assert_eq!(stats.completed_cards, 3);
        assert_eq!(stats.correct_cards, 2);
        assert!(stats.completed_cards <= stats.total_cards);
        assert!(stats.correct_cards <= stats.completed_cards);
        assert!((stats.accuracy - 2.0 / 3.0 * 100.0).abs() < 1e-9);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.last_studied, Some(now));
    }

    #[test]
    fn empty_record_set_reports_zero_accuracy() {
        let stats = compute_stats(&[], 5);
        assert_eq!(stats.completed_cards, 0);
        assert_eq!(stats.accuracy, 0.0);
        assert_eq!(stats.last_studied, None);
    }

    #[test]
    fn review_becomes_due_after_the_interval() {
        let mut tracker = tracker(10);
        let now = Utc::now();
        tracker.record_attempt_at("A", true, now).unwrap();

        assert!(tracker.due_for_review(now).is_empty());
        assert!(tracker
            .due_for_review(now + Duration::hours(REVIEW_INTERVAL_HOURS) - Duration::seconds(1))
            .is_empty());
        assert_eq!(
            tracker.due_for_review(
                now + Duration::hours(REVIEW_INTERVAL_HOURS) + Duration::seconds(1)
            ),
            vec!["A"]
        );
    }

    #[test]
    fn reattempt_pushes_the_review_out() {
        let mut tracker = tracker(10);
        let now = Utc::now();
        tracker.record_attempt_at("A", true, now).unwrap();
        let later = now + Duration::hours(REVIEW_INTERVAL_HOURS) + Duration::minutes(1);
        tracker.record_attempt_at("A", true, later).unwrap();

        assert!(tracker.due_for_review(later).is_empty());
    }

    #[test]
    fn reset_clears_records_and_stats() {
        let mut tracker = tracker(10);
        tracker.record_attempt("A", true).unwrap();
        tracker.record_attempt("B", false).unwrap();

        tracker.reset().unwrap();
        assert!(tracker.get_record("A").is_none());
        assert!(tracker.get_record("B").is_none());
        let stats = tracker.stats();
        assert_eq!(stats.completed_cards, 0);
        assert_eq!(stats.accuracy, 0.0);
    }

    #[test]
    fn attempts_are_written_through_to_the_store() {
        let mut tracker = tracker(10);
        tracker.record_attempt("A", true).unwrap();

        assert_eq!(tracker.store.records.len(), 1);
        let saved = tracker.store.stats.as_ref().unwrap();
        assert_eq!(saved.completed_cards, 1);
        assert_eq!(saved.correct_cards, 1);
    }

    #[test]
    fn failed_write_leaves_session_state_untouched() {
        let mut tracker = ProgressTracker::new(FailingStore, 10).unwrap();
        assert!(tracker.record_attempt("A", true).is_err());
        assert!(tracker.get_record("A").is_none());
        assert_eq!(tracker.stats().completed_cards, 0);
    }

    #[test]
    fn failed_clear_keeps_records() {
        let mut tracker = ProgressTracker::new(FailingStore, 10).unwrap();
        assert!(tracker.reset().is_err());
    }
}
