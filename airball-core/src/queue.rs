//! Event Queue Between Source Threads and the Model Thread
//!
//! ## Overview
//!
//! All the blocking work (socket reads, device reads, timer waits) lives
//! on source threads; all the model state lives on one consumer thread.
//! This queue is the only thing they share: sources [`post`] events, the
//! model thread [`drain`]s them in arrival order and applies them one at
//! a time.
//!
//! A mutex around a `VecDeque` is the whole mechanism. Contention is a
//! handful of posts per second from humans and a 20 Hz probe, and the
//! drain swaps the backlog out in one short critical section, so nothing
//! here earns cleverer synchronization.
//!
//! [`post`]: EventQueue::post
//! [`drain`]: EventQueue::drain

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::events::ModelEvent;

/// FIFO event channel from the source threads into the model thread.
///
/// Shared as `Arc<EventQueue>`; posting never blocks on the consumer and
/// draining never blocks on producers beyond the queue swap.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Mutex<VecDeque<ModelEvent>>,
}

impl EventQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event.
    pub fn post(&self, event: ModelEvent) {
        self.lock().push_back(event);
    }

    /// Take the whole backlog, oldest first, leaving the queue empty.
    pub fn drain(&self) -> Vec<ModelEvent> {
        let backlog = std::mem::take(&mut *self.lock());
        backlog.into_iter().collect()
    }

    /// Number of events waiting.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether anything is waiting.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<ModelEvent>> {
        // A poisoned queue still holds plain data; keep running rather
        // than cascade a source thread's panic into the model.
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ButtonEvent;
    use std::sync::Arc;

    #[test]
    fn drains_in_arrival_order() {
        let queue = EventQueue::new();
        queue.post(ModelEvent::Button(ButtonEvent::Increment));
        queue.post(ModelEvent::CancelTimerFired);
        queue.post(ModelEvent::Button(ButtonEvent::Decrement));

        let drained = queue.drain();
        assert_eq!(
            drained,
            vec![
                ModelEvent::Button(ButtonEvent::Increment),
                ModelEvent::CancelTimerFired,
                ModelEvent::Button(ButtonEvent::Decrement),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn drain_on_empty_is_empty() {
        let queue = EventQueue::new();
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn posts_interleave_across_threads() {
        let queue = Arc::new(EventQueue::new());
        let mut workers = Vec::new();
        for _ in 0..4 {
            let queue = Arc::clone(&queue);
            workers.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    queue.post(ModelEvent::CancelTimerFired);
                }
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(queue.len(), 400);
    }
}
