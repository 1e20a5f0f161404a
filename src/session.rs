//! Review session queue management
//!
//! Turns the due subset of a collection into a shuffled, gradable queue,
//! re-tests items graded `Forgot` before the session can complete, and
//! accumulates graded results into a commit-ready batch keyed by item
//! identity. The session never touches the caller's collection; the
//! caller commits (or discards) the staged results when the queue is
//! empty.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::{self, select_due};
use crate::models::{Grade, ReviewItem};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session is already completed")]
    SessionCompleted,

    #[error("session is still in progress")]
    SessionInProgress,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Progress state of a review session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

/// One review session over the due subset of a collection.
///
/// The queue holds clones of the due items; graded results are staged
/// separately so an abandoned session leaves the collection untouched.
#[derive(Debug)]
pub struct ReviewSession {
    queue: VecDeque<ReviewItem>,
    staged: HashMap<String, ReviewItem>,
}

impl ReviewSession {
    /// Start a session over everything due at `now`.
    ///
    /// The due set is shuffled so learners cannot pattern-match on
    /// storage order. An empty due set yields a session that is born
    /// `Completed`; that is the normal steady state once the backlog is
    /// cleared, not an error.
    pub fn start(items: &[ReviewItem], now: DateTime<Utc>) -> Self {
        Self::start_with_rng(items, now, &mut rand::thread_rng())
    }

    /// Start with a caller-supplied RNG so presentation order can be
    /// made deterministic in tests.
    pub fn start_with_rng<R: Rng>(
        items: &[ReviewItem],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let mut due = select_due(items, now);
        due.shuffle(rng);
        log::debug!("Starting review session with {} due items", due.len());

        Self {
            queue: due.into(),
            staged: HashMap::new(),
        }
    }

    /// The item currently presented for grading, `None` once completed
    pub fn current(&self) -> Option<&ReviewItem> {
        self.queue.front()
    }

    pub fn status(&self) -> SessionStatus {
        if self.queue.is_empty() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        }
    }

    /// Items still waiting in the queue, requeued ones included
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Graded results staged so far, keyed by identity
    pub fn staged(&self) -> &HashMap<String, ReviewItem> {
        &self.staged
    }

    /// Grade the current item and move to the next one.
    ///
    /// The graded result is staged under the item's identity; a later
    /// grading of the same identity overwrites the earlier one. An item
    /// graded `Forgot` goes back to the end of the queue in its
    /// pre-grade state, so it is re-tested within this session before
    /// the session can complete.
    ///
    /// Calling this on a completed session is a contract violation and
    /// returns `SessionError::SessionCompleted`.
    pub fn advance(&mut self, grade: Grade, now: DateTime<Utc>) -> Result<SessionStatus> {
        let item = self
            .queue
            .pop_front()
            .ok_or(SessionError::SessionCompleted)?;

        let updated = algorithm::grade(&item, grade, now);
        self.staged.insert(updated.identity.clone(), updated);

        if grade == Grade::Forgot {
            self.queue.push_back(item);
        }

        Ok(self.status())
    }

    /// Consume the session and hand the staged results to the caller's
    /// own commit path. Errors if the queue is not yet empty.
    pub fn into_staged(self) -> Result<HashMap<String, ReviewItem>> {
        if !self.queue.is_empty() {
            return Err(SessionError::SessionInProgress);
        }
        Ok(self.staged)
    }

    /// Merge staged results into a collection, replacing each graded
    /// item by identity match. Items never graded in this session are
    /// left untouched. Returns how many items were replaced.
    pub fn commit_into(self, items: &mut [ReviewItem]) -> Result<usize> {
        let staged = self.into_staged()?;

        let mut applied = 0;
        for item in items.iter_mut() {
            if let Some(updated) = staged.get(&item.identity) {
                *item = updated.clone();
                applied += 1;
            }
        }

        log::info!("Committed {} reviewed items", applied);
        Ok(applied)
    }
}
