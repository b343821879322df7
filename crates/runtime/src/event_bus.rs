use std::fmt;

/// What part of the explorer produced an event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ingest,
    Resolution,
    Selection,
    Camera,
    Style,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKind::Ingest => "ingest",
            EventKind::Resolution => "resolution",
            EventKind::Selection => "selection",
            EventKind::Camera => "camera",
            EventKind::Style => "style",
        };
        f.write_str(s)
    }
}

/// Event record for traceability of state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Monotonic sequence number across the session.
    pub seq: u64,
    pub kind: EventKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    next_seq: u64,
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, kind: EventKind, message: impl Into<String>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            seq,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, EventKind};

    #[test]
    fn records_events_in_sequence() {
        let mut bus = EventBus::new();
        bus.emit(EventKind::Selection, "toggle");
        bus.emit(EventKind::Camera, "fly-to");
        let seqs: Vec<u64> = bus.events().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert_eq!(bus.events()[1].kind, EventKind::Camera);
    }

    #[test]
    fn drain_keeps_sequence_running() {
        let mut bus = EventBus::new();
        bus.emit(EventKind::Ingest, "a");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
        bus.emit(EventKind::Ingest, "b");
        assert_eq!(bus.events()[0].seq, 1);
    }
}
