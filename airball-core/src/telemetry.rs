//! Message transport seam.
//!
//! Real transports (serial link, UDP) live outside this crate; the
//! model only needs two shapes. [`Telemetry`] is a full bidirectional
//! endpoint whose receive side runs on a dedicated thread (see
//! [`spawn_receiver`]). [`MessageSink`] is the narrower outbound-only
//! view the settings facade broadcasts through. Every telemetry
//! endpoint is usable as a sink.
//!
//! [`LoopbackTelemetry`] wires two endpoints back to back in memory,
//! standing in for a real link in tests and bench setups.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use airball_wire::Message;

use crate::events::ModelEvent;
use crate::queue::EventQueue;

/// Outbound-only message destination.
pub trait MessageSink: Send {
    /// Hand one message to the transport.
    fn send(&mut self, message: Message);
}

/// A bidirectional message transport.
pub trait Telemetry: Send {
    /// Hand one message to the transport.
    fn send(&mut self, message: Message);

    /// Block until the next inbound message. `None` means the transport
    /// closed and no more will come.
    fn receive(&mut self) -> Option<Message>;
}

impl<T: Telemetry> MessageSink for T {
    fn send(&mut self, message: Message) {
        Telemetry::send(self, message);
    }
}

/// Two in-memory endpoints joined back to back.
pub struct LoopbackTelemetry {
    tx: Sender<Message>,
    rx: Receiver<Message>,
}

impl LoopbackTelemetry {
    /// A connected pair: whatever one endpoint sends, the other
    /// receives.
    pub fn pair() -> (Self, Self) {
        let (near_tx, far_rx) = mpsc::channel();
        let (far_tx, near_rx) = mpsc::channel();
        (
            Self {
                tx: near_tx,
                rx: near_rx,
            },
            Self {
                tx: far_tx,
                rx: far_rx,
            },
        )
    }
}

impl Telemetry for LoopbackTelemetry {
    fn send(&mut self, message: Message) {
        // A dropped peer just swallows traffic, like an unplugged link.
        let _ = self.tx.send(message);
    }

    fn receive(&mut self) -> Option<Message> {
        self.rx.recv().ok()
    }
}

/// A sink that records everything sent through it. Clones share the
/// record, so a test can keep one handle and give the other away.
#[derive(Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl MemorySink {
    /// An empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<Message> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Forget the record.
    pub fn clear(&self) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl MessageSink for MemorySink {
    fn send(&mut self, message: Message) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
    }
}

/// Run a transport's receive side on its own thread, posting every
/// inbound message to the model queue. The thread ends when the
/// transport closes.
pub fn spawn_receiver(
    mut telemetry: impl Telemetry + 'static,
    queue: Arc<EventQueue>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        while let Some(message) = telemetry.receive() {
            queue.post(ModelEvent::Telemetry(message));
        }
        log::info!("telemetry receive thread exiting, transport closed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use airball_wire::ids;

    #[test]
    fn loopback_carries_both_directions() {
        let (mut panel, mut probe) = LoopbackTelemetry::pair();
        Telemetry::send(&mut probe, Message::field(ids::AIRDATA_ALPHA, 1, 0.1));
        Telemetry::send(&mut panel, Message::new(ids::SETTINGS_REQUEST));

        assert_eq!(panel.receive().map(|m| m.id), Some(ids::AIRDATA_ALPHA));
        assert_eq!(probe.receive().map(|m| m.id), Some(ids::SETTINGS_REQUEST));
    }

    #[test]
    fn receive_reports_a_closed_transport() {
        let (mut panel, probe) = LoopbackTelemetry::pair();
        drop(probe);
        assert!(panel.receive().is_none());
    }

    #[test]
    fn memory_sink_clones_share_the_record() {
        let recorder = MemorySink::new();
        let mut handle: Box<dyn MessageSink> = Box::new(recorder.clone());
        handle.send(Message::new(0x0100));
        handle.send(Message::new(0x0101));

        let sent = recorder.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].id, 0x0100);
        recorder.clear();
        assert!(recorder.sent().is_empty());
    }

    #[test]
    fn receiver_thread_posts_inbound_messages() {
        let (panel, mut probe) = LoopbackTelemetry::pair();
        let queue = Arc::new(EventQueue::new());
        let worker = spawn_receiver(panel, Arc::clone(&queue));

        for seq in 0..3 {
            Telemetry::send(
                &mut probe,
                Message::field(ids::AIRDATA_DYNAMIC_PRESSURE, seq, 100.0),
            );
        }
        drop(probe);
        worker.join().unwrap();

        let events = queue.drain();
        assert_eq!(events.len(), 3);
        assert!(events
            .iter()
            .all(|e| matches!(e, ModelEvent::Telemetry(m) if m.id == ids::AIRDATA_DYNAMIC_PRESSURE)));
    }
}
