//! Per-action state for AI calls.
//!
//! Each AI action (a feature, optionally bound to one note) moves through
//! idle, loading, and then succeeded or failed, independently of every other
//! action. Starting an action hands out a ticket; only the ticket from the
//! most recent start may record the outcome.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::models::AiFeature;

/// Identifies one independently tracked AI action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActionKey {
    pub feature: AiFeature,
    /// Note the action works on, when bound to one (summaries).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Uuid>,
}

impl ActionKey {
    pub fn new(feature: AiFeature) -> Self {
        Self {
            feature,
            target: None,
        }
    }

    pub fn for_note(feature: AiFeature, note_id: Uuid) -> Self {
        Self {
            feature,
            target: Some(note_id),
        }
    }
}

/// Observable state of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionStatus {
    Idle,
    Loading,
    Succeeded,
    Failed { message: String, retryable: bool },
}

/// Proof of having started an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTicket {
    key: ActionKey,
    generation: u64,
}

impl ActionTicket {
    pub fn key(&self) -> ActionKey {
        self.key
    }
}

/// Snapshot entry returned by [`ActionTracker::snapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
    #[serde(flatten)]
    pub key: ActionKey,
    #[serde(flatten)]
    pub status: ActionStatus,
    pub attempts: u64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
struct ActionState {
    status: ActionStatus,
    generation: u64,
    updated_at: DateTime<Utc>,
}

/// Tracks loading and error state for every AI action.
#[derive(Debug, Default)]
pub struct ActionTracker {
    actions: Mutex<HashMap<ActionKey, ActionState>>,
}

impl ActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as loading and return the ticket for its outcome.
    ///
    /// Any ticket from an earlier `begin` on the same key becomes stale.
    pub fn begin(&self, key: ActionKey) -> ActionTicket {
        let mut actions = self.lock();
        let state = actions.entry(key).or_insert_with(|| ActionState {
            status: ActionStatus::Idle,
            generation: 0,
            updated_at: Utc::now(),
        });
        state.generation += 1;
        state.status = ActionStatus::Loading;
        state.updated_at = Utc::now();
        ActionTicket {
            key,
            generation: state.generation,
        }
    }

    /// Record the outcome of the action `ticket` was issued for.
    ///
    /// Returns `false` without touching state when the ticket is stale.
    pub fn finish<T>(&self, ticket: ActionTicket, outcome: &Result<T>) -> bool {
        let mut actions = self.lock();
        let Some(state) = actions.get_mut(&ticket.key) else {
            return false;
        };
        if state.generation != ticket.generation {
            return false;
        }
        state.status = match outcome {
            Ok(_) => ActionStatus::Succeeded,
            Err(e) => ActionStatus::Failed {
                message: format!("AI error: {}", e),
                retryable: e.is_retryable(),
            },
        };
        state.updated_at = Utc::now();
        true
    }

    pub fn status(&self, key: ActionKey) -> ActionStatus {
        self.lock()
            .get(&key)
            .map(|s| s.status.clone())
            .unwrap_or(ActionStatus::Idle)
    }

    pub fn is_loading(&self, key: ActionKey) -> bool {
        self.status(key) == ActionStatus::Loading
    }

    /// Drop every action bound to `note_id`.
    ///
    /// Outcomes still in flight for those actions are then discarded as
    /// stale. Returns how many actions were removed.
    pub fn forget_note(&self, note_id: Uuid) -> usize {
        let mut actions = self.lock();
        let before = actions.len();
        actions.retain(|key, _| key.target != Some(note_id));
        before - actions.len()
    }

    /// Every action that has been started, most recently updated first.
    pub fn snapshot(&self) -> Vec<ActionReport> {
        let mut reports: Vec<ActionReport> = self
            .lock()
            .iter()
            .map(|(key, state)| ActionReport {
                key: *key,
                status: state.status.clone(),
                attempts: state.generation,
                updated_at: state.updated_at,
            })
            .collect();
        reports.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        reports
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ActionKey, ActionState>> {
        // state is plain data, so a poisoned lock is still usable
        self.actions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn ok() -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_forget_note_drops_only_its_actions() {
        let tracker = ActionTracker::new();
        let gone = Uuid::new_v4();
        let kept = Uuid::new_v4();
        let in_flight = tracker.begin(ActionKey::for_note(AiFeature::Summarize, gone));
        tracker.begin(ActionKey::for_note(AiFeature::Summarize, kept));
        tracker.begin(ActionKey::new(AiFeature::AutoTitle));

        assert_eq!(tracker.forget_note(gone), 1);
        assert!(!tracker.finish(in_flight, &ok()));
        let keys: Vec<ActionKey> = tracker.snapshot().into_iter().map(|r| r.key).collect();
        assert_eq!(keys.len(), 2);
        assert!(!keys.contains(&ActionKey::for_note(AiFeature::Summarize, gone)));
    }

    #[test]
    fn test_unknown_action_is_idle() {
        let tracker = ActionTracker::new();
        assert_eq!(
            tracker.status(ActionKey::new(AiFeature::AutoTitle)),
            ActionStatus::Idle
        );
    }

    #[test]
    fn test_begin_then_finish_ok() {
        let tracker = ActionTracker::new();
        let key = ActionKey::new(AiFeature::Generate);
        let ticket = tracker.begin(key);
        assert!(tracker.is_loading(key));
        assert!(tracker.finish(ticket, &ok()));
        assert_eq!(tracker.status(key), ActionStatus::Succeeded);
    }

    #[test]
    fn test_failure_message_and_retry_flag() {
        let tracker = ActionTracker::new();
        let key = ActionKey::new(AiFeature::AutoTitle);
        let ticket = tracker.begin(key);
        let outcome: Result<()> = Err(Error::RateLimited("slow down".into()));
        tracker.finish(ticket, &outcome);
        assert_eq!(
            tracker.status(key),
            ActionStatus::Failed {
                message: "AI error: Rate limit exceeded: slow down".into(),
                retryable: true,
            }
        );
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let tracker = ActionTracker::new();
        let key = ActionKey::new(AiFeature::Generate);
        let first = tracker.begin(key);
        let second = tracker.begin(key);

        assert!(tracker.finish(second, &ok()));
        let late: Result<()> = Err(Error::Request("timeout".into()));
        assert!(!tracker.finish(first, &late));
        assert_eq!(tracker.status(key), ActionStatus::Succeeded);
    }

    #[test]
    fn test_actions_are_independent() {
        let tracker = ActionTracker::new();
        let a = ActionKey::for_note(AiFeature::Summarize, Uuid::new_v4());
        let b = ActionKey::for_note(AiFeature::Summarize, Uuid::new_v4());
        let title = ActionKey::new(AiFeature::AutoTitle);

        let ta = tracker.begin(a);
        let _tb = tracker.begin(b);
        let _tt = tracker.begin(title);
        tracker.finish(ta, &ok());

        assert_eq!(tracker.status(a), ActionStatus::Succeeded);
        assert!(tracker.is_loading(b));
        assert!(tracker.is_loading(title));
    }

    #[test]
    fn test_snapshot_serialization() {
        let tracker = ActionTracker::new();
        let key = ActionKey::new(AiFeature::AutoTitle);
        tracker.begin(key);
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 1);
        let json = serde_json::to_value(&snapshot[0]).unwrap();
        assert_eq!(json["feature"], "autoTitle");
        assert_eq!(json["status"], "loading");
        assert_eq!(json["attempts"], 1);
        assert!(json.get("target").is_none());
    }
}
