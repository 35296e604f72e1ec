use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use vocab_core::Clock;
use vocab_core::model::{ActivityKind, AttemptResult, SessionId, VocabularyItem, WordId};

use super::listener::AttemptListener;
use crate::error::ActivityError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of an activity run.
///
/// `Loading → Presenting → Judging → { Presenting | Complete }`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Loading,
    Presenting,
    /// An attempt is being resolved; listeners observe the runner in this state.
    Judging,
    Complete,
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunnerState::Loading => "loading",
            RunnerState::Presenting => "presenting",
            RunnerState::Judging => "judging",
            RunnerState::Complete => "complete",
        })
    }
}

/// What happens after an attempt is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Wrong answer; the same item stays on screen.
    Retry,
    /// Correct answer; the next item is presented.
    Next,
    /// Correct answer on the last item.
    Complete,
}

/// Result of submitting one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    pub result: AttemptResult,
    pub advance: Advance,
}

impl AttemptOutcome {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.result.is_correct()
    }
}

/// Snapshot of progress through the queue, useful for "Word 2 of 5" displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based index of the item on screen; equals `total` once complete.
    pub position: usize,
    pub total: usize,
    pub correct: u32,
    pub attempts: u32,
    pub is_complete: bool,
}

/// Final score of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub correct_answers: u32,
    pub total_items: u32,
    pub total_attempts: u32,
    /// `correct_answers / total_items`, rounded. Retries do not lower it.
    pub percentage: u32,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Per-run state: the shuffled queue, the cursor and the counters.
#[derive(Debug, Clone)]
pub struct ActivitySession {
    id: SessionId,
    kind: ActivityKind,
    queue: Vec<VocabularyItem>,
    cursor: usize,
    correct: u32,
    attempts: u32,
    item_attempts: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl ActivitySession {
    fn new(kind: ActivityKind, queue: Vec<VocabularyItem>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::random(),
            kind,
            queue,
            cursor: 0,
            correct: 0,
            attempts: 0,
            item_attempts: 0,
            started_at,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    /// Items in play order.
    #[must_use]
    pub fn queue(&self) -> &[VocabularyItem] {
        &self.queue
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    fn current(&self) -> Option<&VocabularyItem> {
        self.queue.get(self.cursor)
    }
}

//
// ─── RUNNER ────────────────────────────────────────────────────────────────────
//

/// Drives one learner through one shuffled vocabulary list for one activity.
///
/// Every resolved attempt produces exactly one `AttemptResult`, handed to subscribed
/// listeners synchronously. Persistence happens in listeners and never feeds back into
/// the runner, so the in-memory state here is authoritative.
pub struct ActivityRunner {
    clock: Clock,
    rng: StdRng,
    source: Vec<VocabularyItem>,
    session: Option<ActivitySession>,
    state: RunnerState,
    listeners: Vec<Arc<dyn AttemptListener>>,
}

impl ActivityRunner {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            rng: StdRng::from_os_rng(),
            source: Vec::new(),
            session: None,
            state: RunnerState::Loading,
            listeners: Vec::new(),
        }
    }

    /// Use a deterministic shuffle sequence.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Register a listener for every future attempt result.
    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: AttemptListener + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    pub fn subscribe_shared(&mut self, listener: Arc<dyn AttemptListener>) {
        self.listeners.push(listener);
    }

    /// Begin a run over `items`, discarding any previous run.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::EmptyInput` if `items` is empty and
    /// `ActivityError::DuplicateItem` if two items share an id.
    pub fn start(
        &mut self,
        items: Vec<VocabularyItem>,
        kind: ActivityKind,
    ) -> Result<&VocabularyItem, ActivityError> {
        self.state = RunnerState::Loading;
        self.session = None;

        if items.is_empty() {
            return Err(ActivityError::EmptyInput);
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                return Err(ActivityError::DuplicateItem(item.id()));
            }
        }

        self.source = items;
        self.begin(kind)
    }

    /// Reshuffle the same items and start over with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` if no run was ever started.
    pub fn restart(&mut self) -> Result<&VocabularyItem, ActivityError> {
        let Some(kind) = self.session.as_ref().map(ActivitySession::kind) else {
            return Err(ActivityError::InvalidState {
                operation: "restart",
                state: self.state,
            });
        };
        self.state = RunnerState::Loading;
        self.begin(kind)
    }

    fn begin(&mut self, kind: ActivityKind) -> Result<&VocabularyItem, ActivityError> {
        let mut queue = self.source.clone();
        queue.shuffle(&mut self.rng);

        let session = ActivitySession::new(kind, queue, self.clock.now());
        tracing::info!(
            session_id = %session.id,
            kind = %kind,
            items = session.queue.len(),
            "activity started"
        );
        self.state = RunnerState::Presenting;
        let session = self.session.insert(session);
        session.current().ok_or(ActivityError::EmptyInput)
    }

    /// Judge a typed or assembled answer against the current word.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` unless an item is being presented.
    pub fn submit_attempt(&mut self, candidate: &str) -> Result<AttemptOutcome, ActivityError> {
        let is_correct = self.presented_item("submit an attempt")?.matches(candidate);
        self.resolve(is_correct)
    }

    /// Judge a structural choice: correct iff `chosen` is the current item.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` unless an item is being presented.
    pub fn submit_choice(&mut self, chosen: WordId) -> Result<AttemptOutcome, ActivityError> {
        let is_correct = self.presented_item("submit a choice")?.id() == chosen;
        self.resolve(is_correct)
    }

    fn presented_item(&self, operation: &'static str) -> Result<&VocabularyItem, ActivityError> {
        let invalid = ActivityError::InvalidState {
            operation,
            state: self.state,
        };
        if !matches!(self.state, RunnerState::Presenting | RunnerState::Judging) {
            return Err(invalid);
        }
        self.session
            .as_ref()
            .and_then(ActivitySession::current)
            .ok_or(invalid)
    }

    fn resolve(&mut self, is_correct: bool) -> Result<AttemptOutcome, ActivityError> {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return Err(ActivityError::InvalidState {
                operation: "resolve an attempt",
                state: self.state,
            });
        };
        let Some(item_id) = session.current().map(VocabularyItem::id) else {
            return Err(ActivityError::InvalidState {
                operation: "resolve an attempt",
                state: self.state,
            });
        };

        self.state = RunnerState::Judging;
        session.attempts = session.attempts.saturating_add(1);
        session.item_attempts = session.item_attempts.saturating_add(1);
        if is_correct {
            session.correct = session.correct.saturating_add(1);
        }
        let result = AttemptResult::new(
            item_id,
            session.kind,
            is_correct,
            session.item_attempts,
            now,
        )?;

        tracing::debug!(
            session_id = %session.id,
            item_id = %item_id,
            correct = is_correct,
            attempt_count = session.item_attempts,
            "attempt judged"
        );

        for listener in &self.listeners {
            listener.on_attempt(&result);
        }

        let advance = if is_correct {
            session.cursor += 1;
            session.item_attempts = 0;
            if session.cursor >= session.queue.len() {
                session.completed_at = Some(now);
                self.state = RunnerState::Complete;
                tracing::info!(
                    session_id = %session.id,
                    correct = session.correct,
                    attempts = session.attempts,
                    "activity complete"
                );
                Advance::Complete
            } else {
                self.state = RunnerState::Presenting;
                Advance::Next
            }
        } else {
            self.state = RunnerState::Presenting;
            Advance::Retry
        };

        Ok(AttemptOutcome { result, advance })
    }

    /// Final score; only available once every item has been answered correctly.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::InvalidState` before the run is complete.
    pub fn summary(&self) -> Result<SessionSummary, ActivityError> {
        let session = match (&self.session, self.state) {
            (Some(session), RunnerState::Complete) => session,
            _ => {
                return Err(ActivityError::InvalidState {
                    operation: "summarize",
                    state: self.state,
                });
            }
        };

        let total_items = u32::try_from(session.queue.len()).unwrap_or(u32::MAX);
        Ok(SessionSummary {
            correct_answers: session.correct,
            total_items,
            total_attempts: session.attempts,
            percentage: percentage(session.correct, total_items),
        })
    }

    #[must_use]
    pub fn state(&self) -> RunnerState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == RunnerState::Complete
    }

    /// The item on screen, if any.
    #[must_use]
    pub fn current_item(&self) -> Option<&VocabularyItem> {
        match self.state {
            RunnerState::Presenting | RunnerState::Judging => {
                self.session.as_ref().and_then(ActivitySession::current)
            }
            RunnerState::Loading | RunnerState::Complete => None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&ActivitySession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(ActivitySession::id)
    }

    #[must_use]
    pub fn kind(&self) -> Option<ActivityKind> {
        self.session.as_ref().map(ActivitySession::kind)
    }

    #[must_use]
    pub fn progress(&self) -> Option<Progress> {
        let session = self.session.as_ref()?;
        let total = session.queue.len();
        Some(Progress {
            position: (session.cursor + 1).min(total),
            total,
            correct: session.correct,
            attempts: session.attempts,
            is_complete: self.is_complete(),
        })
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl fmt::Debug for ActivityRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityRunner")
            .field("state", &self.state)
            .field("source_len", &self.source.len())
            .field("session", &self.session.as_ref().map(ActivitySession::id))
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(correct) / f64::from(total) * 100.0).round() as u32
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
