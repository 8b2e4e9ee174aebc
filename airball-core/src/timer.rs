//! One-Shot Timers on a Shared Deadline Heap
//!
//! ## Overview
//!
//! The settings surface needs two one-shot timers (adjustment inactivity,
//! long-press detection) that are constantly restarted as the user works
//! the knob. Spawning a thread per pending timer and polling it to death
//! is the obvious shape and a waste of wakeups; instead one worker thread
//! parks on a condvar until the earliest deadline and fires callbacks as
//! they come due.
//!
//! ```text
//! schedule(delay, f) ──► binary heap of deadlines ──► worker thread
//! cancel(handle) ──────► flip the entry's flag          │
//!                                                       ▼
//!                                          fire f() if not cancelled
//! ```
//!
//! ## Cancellation
//!
//! Cancellation is a flag on the entry, checked at fire time, so a
//! cancelled timer never delivers. The one sharp edge: a callback that
//! has already started delivering when `cancel` is called will complete.
//! Callers that restart timers (see [`RestartableTimer`]) therefore may
//! observe one already-in-flight delivery right after a restart, exactly
//! as they could have observed it right before; consumers must treat the
//! fired event as advisory, not as proof the timer was live.

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

type Callback = Box<dyn FnOnce() + Send>;

struct Entry {
    deadline: Instant,
    seq: u64,
    cancelled: Arc<AtomicBool>,
    callback: Callback,
}

// The heap is a max-heap; order entries so the earliest deadline (ties
// broken by schedule order) surfaces first.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

#[derive(Default)]
struct TimerState {
    queue: BinaryHeap<Entry>,
    next_seq: u64,
    shutdown: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<TimerState>,
    wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Handle to one scheduled timer.
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Prevent the timer from delivering, if it has not already begun to.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// The shared timer worker. Create one per process and hand out clones
/// of its `Arc`.
pub struct TimerService {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl TimerService {
    /// Start the worker thread.
    pub fn spawn() -> Self {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::spawn(move || run_worker(&worker_shared));
        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Run `callback` once, `delay` from now, unless cancelled first.
    pub fn schedule(
        &self,
        delay: Duration,
        callback: impl FnOnce() + Send + 'static,
    ) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut state = self.shared.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.queue.push(Entry {
            deadline: Instant::now() + delay,
            seq,
            cancelled: Arc::clone(&cancelled),
            callback: Box::new(callback),
        });
        drop(state);
        self.shared.wake.notify_one();
        TimerHandle { cancelled }
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.wake.notify_one();
        if let Some(worker) = self.worker.take() {
            // Pending timers die unfired with the service.
            let _ = worker.join();
        }
    }
}

fn run_worker(shared: &Shared) {
    let mut state = shared.lock();
    loop {
        if state.shutdown {
            return;
        }
        let now = Instant::now();
        match state.queue.peek().map(|entry| entry.deadline) {
            Some(deadline) if deadline <= now => {
                if let Some(entry) = state.queue.pop() {
                    // Callbacks run unlocked so they may schedule timers
                    // of their own.
                    drop(state);
                    if !entry.cancelled.load(Ordering::Relaxed) {
                        (entry.callback)();
                    }
                    state = shared.lock();
                }
            }
            Some(deadline) => {
                state = shared
                    .wake
                    .wait_timeout(state, deadline - now)
                    .map(|(guard, _)| guard)
                    .unwrap_or_else(|e| e.into_inner().0);
            }
            None => {
                state = shared
                    .wake
                    .wait(state)
                    .unwrap_or_else(|e| e.into_inner());
            }
        }
    }
}

/// A timer slot that is restarted far more often than it fires.
///
/// `restart` atomically replaces whatever was pending, so a press from
/// the knob thread and an expiry from the worker can race without ever
/// leaving two timers live.
pub struct RestartableTimer {
    service: Arc<TimerService>,
    slot: Mutex<Option<TimerHandle>>,
}

impl RestartableTimer {
    /// An empty slot using `service` for scheduling.
    pub fn new(service: Arc<TimerService>) -> Self {
        Self {
            service,
            slot: Mutex::new(None),
        }
    }

    /// Cancel the pending timer, if any, and schedule a fresh one.
    pub fn restart(&self, delay: Duration, callback: impl FnOnce() + Send + 'static) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
        *slot = Some(self.service.schedule(delay, callback));
    }

    /// Cancel the pending timer, if any.
    pub fn stop(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn fires_after_the_deadline() {
        let service = TimerService::spawn();
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();
        service.schedule(Duration::from_millis(20), move || {
            tx.send(()).ok();
        });
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn fires_in_deadline_order() {
        let service = TimerService::spawn();
        let (tx, rx) = mpsc::channel();
        for (delay, label) in [(60, "late"), (10, "early"), (35, "middle")] {
            let tx = tx.clone();
            service.schedule(Duration::from_millis(delay), move || {
                tx.send(label).ok();
            });
        }
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "early");
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "middle");
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "late");
    }

    #[test]
    fn cancelled_timers_never_deliver() {
        let service = TimerService::spawn();
        let (tx, rx) = mpsc::channel();
        let handle = service.schedule(Duration::from_millis(50), move || {
            tx.send(()).ok();
        });
        handle.cancel();
        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    }

    #[test]
    fn restart_replaces_the_pending_timer() {
        let service = Arc::new(TimerService::spawn());
        let slot = RestartableTimer::new(Arc::clone(&service));
        let (tx, rx) = mpsc::channel();

        let first = tx.clone();
        slot.restart(Duration::from_millis(50), move || {
            first.send("first").ok();
        });
        let second = tx.clone();
        slot.restart(Duration::from_millis(50), move || {
            second.send("second").ok();
        });

        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "second");
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn stop_empties_the_slot() {
        let service = Arc::new(TimerService::spawn());
        let slot = RestartableTimer::new(Arc::clone(&service));
        let (tx, rx) = mpsc::channel();
        slot.restart(Duration::from_millis(50), move || {
            tx.send(()).ok();
        });
        slot.stop();
        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    }

    #[test]
    fn dropping_the_service_stops_the_worker() {
        let service = TimerService::spawn();
        let (tx, rx) = mpsc::channel::<()>();
        service.schedule(Duration::from_secs(60), move || {
            tx.send(()).ok();
        });
        drop(service);
        // The worker has joined; the pending timer died with it.
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
