//! Single- versus double-click disambiguation.
//!
//! A first click arms a timer of length `delay` and records the target as
//! pending. If the timer fires while the target is still pending, the single
//! click callback runs. A second click on the same target before that cancels
//! the timer and runs the double click callback right away.
//!
//! Pending clicks live in a side map keyed by target identity, outside the
//! derived table state, so re-deriving rows or re-rendering views never resets
//! a disambiguation in flight.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;

use crate::source::RowId;
use crate::timer::Timer;

/// Identity of a click target: a row, or one cell of a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InteractionKey {
    pub row_id: RowId,
    pub column_id: Option<String>,
}

impl InteractionKey {
    pub fn row(row_id: RowId) -> Self {
        Self {
            row_id,
            column_id: None,
        }
    }

    pub fn cell(row_id: RowId, column_id: impl Into<String>) -> Self {
        Self {
            row_id,
            column_id: Some(column_id.into()),
        }
    }
}

/// Disambiguation state of one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingClick {
    None,
    Single,
}

/// What a pointer-down did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// First click; the single-click timer is running.
    Armed,
    /// Second click; the double-click callback ran.
    Double,
    /// No timer could be armed; the single-click callback ran immediately.
    Immediate,
}

#[derive(Debug)]
struct Pending {
    generation: u64,
    timer: Option<Timer>,
}

type PendingMap<K> = Mutex<HashMap<K, Pending>>;

fn lock<K>(map: &PendingMap<K>) -> MutexGuard<'_, HashMap<K, Pending>> {
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Click disambiguation for any number of targets.
#[derive(Debug)]
pub struct ClickDisambiguator<K> {
    delay: Duration,
    pending: Arc<PendingMap<K>>,
    generation: AtomicU64,
}

impl<K> ClickDisambiguator<K>
where
    K: Clone + Eq + Hash + Send + 'static,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Handle a pointer-down on `key`.
    ///
    /// `on_single` runs from the timer task once the window closes without a
    /// second click; `on_double` runs synchronously on the second click.
    pub fn pointer_down<S, D>(&self, key: K, on_single: S, on_double: D) -> ClickOutcome
    where
        S: FnOnce() + Send + 'static,
        D: FnOnce(),
    {
        let mut pending = lock(&self.pending);

        if let Some(entry) = pending.remove(&key) {
            drop(pending);
            if let Some(timer) = entry.timer {
                timer.cancel();
            }
            on_double();
            return ClickOutcome::Double;
        }

        let Ok(runtime) = Handle::try_current() else {
            drop(pending);
            log::warn!("No runtime to drive click timers, treating as single click");
            on_single();
            return ClickOutcome::Immediate;
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst);
        pending.insert(
            key.clone(),
            Pending {
                generation,
                timer: None,
            },
        );
        drop(pending);

        let map = Arc::downgrade(&self.pending);
        let timer_key = key.clone();
        let timer = Timer::start_on(&runtime, self.delay, move || {
            let Some(map) = map.upgrade() else {
                log::trace!("Click timer fired after teardown");
                return;
            };
            let fired = {
                let mut guard = lock(&map);
                match guard.get(&timer_key) {
                    Some(entry) if entry.generation == generation => guard.remove(&timer_key),
                    _ => None,
                }
            };
            match fired {
                Some(entry) => {
                    if let Some(timer) = entry.timer {
                        timer.detach();
                    }
                    on_single();
                }
                None => log::trace!("Ignoring expired click timer"),
            }
        });

        let mut pending = lock(&self.pending);
        if let Some(entry) = pending.get_mut(&key)
            && entry.generation == generation
        {
            entry.timer = Some(timer);
        }
        ClickOutcome::Armed
    }

    /// Disambiguation state of a target.
    pub fn pending(&self, key: &K) -> PendingClick {
        if lock(&self.pending).contains_key(key) {
            PendingClick::Single
        } else {
            PendingClick::None
        }
    }

    /// Number of targets waiting for their window to close.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Drop a pending click without firing it.
    pub fn forget(&self, key: &K) {
        if let Some(entry) = lock(&self.pending).remove(key)
            && let Some(timer) = entry.timer
        {
            timer.cancel();
        }
    }

    /// Keep only pending clicks whose target passes the predicate.
    pub fn retain<F: FnMut(&K) -> bool>(&self, mut keep: F) {
        lock(&self.pending).retain(|key, _| keep(key));
    }

    /// Cancel every pending click.
    pub fn teardown(&self) {
        lock(&self.pending).clear();
    }
}
