/// Application events and the records they produce
///
/// The voice-recognition driver is external; it hands over a
/// `DetectionEvent` which is turned into a `StatusAlert` for the link.
use crate::contracts::{MessageKind, StatusAlert};

/// Peripheral that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventSource {
    VoiceRecognizer = 1,
}

/// One poll result from the recognition module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionEvent {
    pub source: EventSource,
    pub ts_ms: u32,
    pub recognized: bool,

    /// Recognized record, -1 when nothing was recognized
    pub record_id: i16,

    /// Module confidence, -1 when unavailable
    pub confidence: i16,
}

impl DetectionEvent {
    pub fn recognized(ts_ms: u32, record_id: i16, confidence: i16) -> Self {
        Self {
            source: EventSource::VoiceRecognizer,
            ts_ms,
            recognized: true,
            record_id,
            confidence,
        }
    }

    /// Event with nothing recognized
    pub fn idle(ts_ms: u32) -> Self {
        Self {
            source: EventSource::VoiceRecognizer,
            ts_ms,
            recognized: false,
            record_id: -1,
            confidence: -1,
        }
    }

    /// Build the outgoing record for this event
    ///
    /// A recognized command becomes an alert carrying the record id in the
    /// status byte; anything else is a plain status report.
    pub fn to_status_alert(&self, dev_id: u8, seq: u16, battery_mv: u16) -> StatusAlert {
        if self.recognized && self.record_id >= 0 {
            StatusAlert::new(
                dev_id,
                MessageKind::Alert,
                self.ts_ms,
                seq,
                self.record_id as u8,
                battery_mv,
            )
        } else {
            StatusAlert::heartbeat(dev_id, self.ts_ms, seq, battery_mv)
        }
    }
}

/// Wrapping 16-bit sequence generator, one per device
#[derive(Debug, Clone, Default)]
pub struct SequenceCounter {
    next: u16,
}

impl SequenceCounter {
    pub fn starting_at(next: u16) -> Self {
        Self { next }
    }

    /// Return the current sequence number and advance
    pub fn next_seq(&mut self) -> u16 {
        let seq = self.next;
        self.next = self.next.wrapping_add(1);
        seq
    }

    pub fn peek(&self) -> u16 {
        self.next
    }
}
