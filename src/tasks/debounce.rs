//! Debounced cache invalidation.
//!
//! A single shared slot moves between `Idle` and `Pending(deadline)`.
//! Scheduling while pending moves the deadline, so bursts of tree-change
//! notifications coalesce into one clear after the last of them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Action run when a debounced clear fires.
pub type ClearAction = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug)]
enum DebounceState {
    Idle,
    Pending {
        deadline: Instant,
        generation: u64,
        timer: JoinHandle<()>,
    },
}

#[derive(Debug)]
struct Slot {
    state: DebounceState,
    next_generation: u64,
}

struct Shared {
    slot: Mutex<Slot>,
    action: ClearAction,
    fired: AtomicU64,
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared").finish_non_exhaustive()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Timer expiry: fires only if this generation is still the pending one.
    fn fire(&self, generation: u64) {
        {
            let mut slot = self.lock();
            let is_current = matches!(
                slot.state,
                DebounceState::Pending { generation: current, .. } if current == generation
            );
            if !is_current {
                return;
            }
            slot.state = DebounceState::Idle;
        }
        (self.action)();
        self.fired.fetch_add(1, Ordering::Relaxed);
        debug!(generation, "Debounced cache clear fired");
    }

    fn cancel(&self, generation: Option<u64>) -> bool {
        let mut slot = self.lock();
        let matches = match (&slot.state, generation) {
            (DebounceState::Pending { .. }, None) => true,
            (DebounceState::Pending { generation: current, .. }, Some(wanted)) => {
                *current == wanted
            }
            (DebounceState::Idle, _) => false,
        };
        if !matches {
            return false;
        }
        if let DebounceState::Pending { timer, generation, .. } =
            std::mem::replace(&mut slot.state, DebounceState::Idle)
        {
            timer.abort();
            debug!(generation, "Debounced cache clear cancelled");
        }
        true
    }
}

// == Debouncer ==
/// Coalesces repeated clear requests into one delayed clear.
#[derive(Clone)]
pub struct Debouncer {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("slot", &*self.shared.lock())
            .field("fired", &self.fire_count())
            .finish()
    }
}

impl Debouncer {
    pub fn new(action: ClearAction) -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    state: DebounceState::Idle,
                    next_generation: 0,
                }),
                action,
                fired: AtomicU64::new(0),
            }),
        }
    }

    // == Schedule ==
    /// Arms (or re-arms) the shared timer to fire `delay` from now.
    ///
    /// Outside a Tokio runtime there is no timer to arm, so the action runs
    /// immediately; clearing early never changes results.
    pub fn schedule(&self, delay: Duration) -> DebounceHandle {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No Tokio runtime available; clearing caches immediately");
            (self.shared.action)();
            self.shared.fired.fetch_add(1, Ordering::Relaxed);
            return DebounceHandle {
                shared: Weak::new(),
                generation: 0,
            };
        };

        let mut slot = self.shared.lock();
        if let DebounceState::Pending { timer, .. } =
            std::mem::replace(&mut slot.state, DebounceState::Idle)
        {
            timer.abort();
        }

        slot.next_generation += 1;
        let generation = slot.next_generation;
        let deadline = Instant::now() + delay;
        let shared = Arc::clone(&self.shared);
        let timer = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            shared.fire(generation);
        });
        slot.state = DebounceState::Pending {
            deadline,
            generation,
            timer,
        };
        debug!(generation, delay_ms = delay.as_millis() as u64, "Debounced cache clear scheduled");

        DebounceHandle {
            shared: Arc::downgrade(&self.shared),
            generation,
        }
    }

    /// Cancels whatever clear is pending. Returns whether one was.
    pub fn cancel_pending(&self) -> bool {
        self.shared.cancel(None)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.shared.lock().state, DebounceState::Pending { .. })
    }

    /// Deadline of the pending clear, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match self.shared.lock().state {
            DebounceState::Pending { deadline, .. } => Some(deadline),
            DebounceState::Idle => None,
        }
    }

    /// Number of clears that have actually run.
    pub fn fire_count(&self) -> u64 {
        self.shared.fired.load(Ordering::Relaxed)
    }
}

// == Debounce Handle ==
/// Cancels the clear armed by one [`Debouncer::schedule`] call.
///
/// Once a later call re-arms the timer this handle no longer controls it.
#[derive(Debug, Clone)]
pub struct DebounceHandle {
    shared: Weak<Shared>,
    generation: u64,
}

impl DebounceHandle {
    /// Prevents the clear from firing. Returns whether anything was cancelled.
    pub fn cancel(&self) -> bool {
        match self.shared.upgrade() {
            Some(shared) => shared.cancel(Some(self.generation)),
            None => false,
        }
    }
}
