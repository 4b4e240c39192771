//! The serialized dispatch engine.
//!
//! The engine owns a bot's live state and guarantees the framework's
//! ordering invariants:
//!
//! - at most one dispatch transition is in flight per engine at any time;
//! - mutations emitted by one reducer call run their transition hooks
//!   strictly sequentially, in emission order;
//! - dispatches that arrive while a transition is in flight queue FIFO and
//!   never interleave; each fully commits before the next starts.
//!
//! # Pipeline
//!
//! `dispatch` admits the action (or queues it), reduces synchronously,
//! short-circuits when the reducer returns the identical state, otherwise
//! awaits the transition hook once per mutation, commits the new state, and
//! releases anything that queued in the meantime.
//!
//! # Failure
//!
//! A failed reducer or hook rejects the dispatch without committing, but the
//! in-flight marker is released and the queue drained on every path,
//! including the caller dropping its future mid-transition. An engine can
//! slow down behind a hook that never resolves, but it cannot wedge.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::action::{Action, Changes, Mutation};
use crate::behavior::Behavior;
use crate::error::{DispatchError, DispatchResult};
use crate::state::BotState;

/// The result every dispatch settles with: `None` for an identity no-op,
/// the committed state otherwise.
pub type DispatchOutcome = DispatchResult<Option<BotState>>;

/// A dispatch deferred because a transition was in flight.
struct QueuedDispatch {
    action: Action,
    responder: oneshot::Sender<DispatchOutcome>,
}

struct EngineInner {
    state: BotState,
    transitioning: bool,
    queue: VecDeque<QueuedDispatch>,
}

struct EngineShared {
    behavior: Arc<dyn Behavior>,
    inner: Mutex<EngineInner>,
}

/// The per-bot dispatch engine.
///
/// A cheap-to-clone handle; clones share the same state, marker, and queue.
/// All mutation of the live state happens on a single logical timeline, so
/// one engine is exclusively owned by one bot instance.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<EngineShared>,
}

impl Engine {
    /// Creates an engine with a null state.
    ///
    /// The owning bot installs its real initial state when it lazily
    /// initializes on the first message.
    pub fn new(behavior: Arc<dyn Behavior>) -> Self {
        Self {
            shared: Arc::new(EngineShared {
                behavior,
                inner: Mutex::new(EngineInner {
                    state: BotState::default(),
                    transitioning: false,
                    queue: VecDeque::new(),
                }),
            }),
        }
    }

    /// Returns a handle to the live state.
    pub fn state(&self) -> BotState {
        self.shared.inner.lock().state.clone()
    }

    /// Installs a state directly, bypassing reduce and transition hooks.
    ///
    /// Used for initialization and snapshot restore. Not serialized against
    /// an in-flight dispatch; callers coordinate that themselves.
    pub fn install_state(&self, state: BotState) {
        self.shared.inner.lock().state = state;
    }

    /// Dispatches an action through the reduce → transition → commit
    /// pipeline.
    ///
    /// If a transition is already in flight the action queues, and the
    /// returned future settles when the queued action *completes*, not when
    /// it is merely dequeued. Resolves `Ok(None)` when the reducer returned
    /// the identical state (no hooks run, nothing committed).
    pub async fn dispatch(&self, action: impl Into<Action>) -> DispatchOutcome {
        let action = action.into();

        let waiter = {
            let mut inner = self.shared.inner.lock();
            if inner.transitioning {
                let (responder, waiter) = oneshot::channel();
                trace!(
                    action = %action.kind,
                    depth = inner.queue.len() + 1,
                    "transition in flight, dispatch queued"
                );
                inner.queue.push_back(QueuedDispatch { action: action.clone(), responder });
                Some(waiter)
            } else {
                inner.transitioning = true;
                None
            }
        };

        if let Some(waiter) = waiter {
            // The pump settles the responder; a dropped responder means the
            // engine went away mid-flight.
            return waiter.await.unwrap_or(Err(DispatchError::Abandoned));
        }

        let guard = InFlightGuard::new(Arc::clone(&self.shared));
        let outcome = self.shared.process(action).await;
        guard.release();
        outcome
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("Engine")
            .field("transitioning", &inner.transitioning)
            .field("queued", &inner.queue.len())
            .finish()
    }
}

impl EngineShared {
    /// Runs one admitted action to completion. The in-flight marker must be
    /// held by the caller.
    async fn process(&self, action: Action) -> DispatchOutcome {
        let (prev, next, mutations) = {
            let mut inner = self.inner.lock();
            let mut changes = Changes::new(action.payload.clone());
            let next = self.behavior.reduce(&inner.state, &action, &mut changes)?;
            if next.same_as(&inner.state) {
                trace!(action = %action.kind, "reducer returned identical state, no-op");
                return Ok(None);
            }
            (inner.state.clone(), next, changes.into_mutations())
        };

        self.run_transitions(&action, &prev, &next, &mutations)
            .await?;

        self.inner.lock().state = next.clone();
        Ok(Some(next))
    }

    /// Awaits the transition hook once per mutation, in emission order.
    async fn run_transitions(
        &self,
        action: &Action,
        prev: &BotState,
        next: &BotState,
        mutations: &[Mutation],
    ) -> DispatchResult<()> {
        for mutation in mutations {
            debug!(mutation = %mutation.kind, "transition");
            self.behavior
                .transition(action, prev, next, mutation)
                .await?;
        }
        Ok(())
    }

    /// Pops the next queued dispatch, or clears the in-flight marker when
    /// the queue is empty. The marker stays held across the hand-off so new
    /// arrivals keep queuing behind the drain.
    fn take_next_or_release(&self) -> Option<QueuedDispatch> {
        let mut inner = self.inner.lock();
        match inner.queue.pop_front() {
            Some(entry) => Some(entry),
            None => {
                inner.transitioning = false;
                None
            }
        }
    }

    /// Releases the in-flight marker, spawning a pump when work queued.
    fn release_in_flight(self: &Arc<Self>) {
        if let Some(entry) = self.take_next_or_release() {
            let shared = Arc::clone(self);
            tokio::spawn(shared.pump(entry));
        }
    }

    /// Drains the queue strictly FIFO, one entry fully at a time.
    async fn pump(self: Arc<Self>, first: QueuedDispatch) {
        let mut entry = first;
        loop {
            let outcome = self.process(entry.action).await;
            // A queued caller may have stopped waiting; the dispatch still
            // ran to completion, so just drop the outcome.
            let _ = entry.responder.send(outcome);
            match self.take_next_or_release() {
                Some(next) => entry = next,
                None => break,
            }
        }
    }
}

/// Scoped ownership of the in-flight marker.
///
/// Normal completion releases explicitly; if the owning future is dropped
/// mid-transition, `Drop` releases instead so queued dispatches still run.
struct InFlightGuard {
    shared: Arc<EngineShared>,
    armed: bool,
}

impl InFlightGuard {
    fn new(shared: Arc<EngineShared>) -> Self {
        Self {
            shared,
            armed: true,
        }
    }

    fn release(mut self) {
        self.armed = false;
        self.shared.release_in_flight();
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.armed {
            self.shared.release_in_flight();
        }
    }
}
