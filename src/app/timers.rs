use crate::app::events::AppEvent;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// One slot per purpose; row slots are indexed by row position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    SearchDebounce,
    Spinner,
    ProgressPoll,
    OverlayFrame,
    RowEntrance(usize),
    RowArtwork(usize),
    RowExit(usize),
}

impl TimerKey {
    pub fn is_row(&self) -> bool {
        matches!(
            self,
            TimerKey::RowEntrance(_) | TimerKey::RowArtwork(_) | TimerKey::RowExit(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub key: TimerKey,
    pub id: u64,
}

struct Pending {
    id: u64,
    repeating: bool,
    task: JoinHandle<()>,
}

/// Cancellable timers that post `AppEvent::Timer` back into the event loop.
///
/// A firing only counts if its id is still the live one for its key: aborting a
/// task cannot recall an event it already queued, so `accept` filters those out.
pub struct Timers {
    tx: UnboundedSender<AppEvent>,
    next_id: u64,
    live: HashMap<TimerKey, Pending>,
}

impl Timers {
    pub fn new(tx: UnboundedSender<AppEvent>) -> Self {
        Self {
            tx,
            next_id: 0,
            live: HashMap::new(),
        }
    }

    /// Fire once after `delay`, replacing any timer under the same key.
    pub fn once(&mut self, key: TimerKey, delay: Duration) {
        let id = self.take_id();
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(AppEvent::Timer(TimerFired { key, id }));
        });
        self.install(key, id, false, task);
    }

    /// Fire every `period` (first firing one period from now) until cancelled.
    pub fn every(&mut self, key: TimerKey, period: Duration) {
        let id = self.take_id();
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(AppEvent::Timer(TimerFired { key, id })).is_err() {
                    break;
                }
            }
        });
        self.install(key, id, true, task);
    }

    pub fn cancel(&mut self, key: TimerKey) -> bool {
        match self.live.remove(&key) {
            Some(pending) => {
                pending.task.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_where(&mut self, mut pred: impl FnMut(&TimerKey) -> bool) -> usize {
        let keys: Vec<TimerKey> = self.live.keys().copied().filter(|k| pred(k)).collect();
        for key in &keys {
            self.cancel(*key);
        }
        keys.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.live.len();
        for (_, pending) in self.live.drain() {
            pending.task.abort();
        }
        if count > 0 {
            debug!(count, "timers cancelled");
        }
        count
    }

    /// True if `fired` belongs to the live timer for its key. One-shot timers are
    /// retired on acceptance.
    pub fn accept(&mut self, fired: TimerFired) -> bool {
        match self.live.get(&fired.key) {
            Some(p) if p.id == fired.id => {
                if !p.repeating {
                    self.live.remove(&fired.key);
                }
                true
            }
            _ => {
                debug!(key = ?fired.key, id = fired.id, "stale timer ignored");
                false
            }
        }
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.live.contains_key(&key)
    }

    pub fn pending(&self) -> usize {
        self.live.len()
    }

    fn take_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn install(&mut self, key: TimerKey, id: u64, repeating: bool, task: JoinHandle<()>) {
        if let Some(old) = self.live.insert(key, Pending { id, repeating, task }) {
            old.task.abort();
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
