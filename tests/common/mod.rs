//! Scripted radio double driven by a shared simulated clock

#![allow(dead_code)]

use std::collections::VecDeque;

use fieldlink_core::{Ack, Clock, LinkError, ManualClock, RadioConfig, RadioDriver, Result};

/// A frame the double will announce once the clock reaches its due time
#[derive(Debug, Clone)]
pub struct Inbound {
    pub delay_ms: u32,
    /// Length reported by `parse_packet`
    pub announced: usize,
    pub bytes: Vec<u8>,
}

impl Inbound {
    pub fn after(delay_ms: u32, bytes: Vec<u8>) -> Self {
        Self {
            delay_ms,
            announced: bytes.len(),
            bytes,
        }
    }

    pub fn ack(delay_ms: u32, ack: Ack) -> Self {
        Self::after(delay_ms, ack.encode().to_vec())
    }

    /// Announces more bytes than it actually delivers
    pub fn truncated(delay_ms: u32, announced: usize, bytes: Vec<u8>) -> Self {
        Self {
            delay_ms,
            announced,
            bytes,
        }
    }
}

type Responder = Box<dyn FnMut(&[u8], usize) -> Vec<Inbound>>;

pub struct ScriptedRadio {
    clock: ManualClock,
    responder: Responder,
    pending: Vec<(u32, Inbound)>,
    current: VecDeque<u8>,
    tx_buffer: Vec<u8>,
    pub sent: Vec<Vec<u8>>,
    pub sent_at: Vec<u32>,
    pub init_calls: usize,
    pub receive_calls: usize,
    pub fail_init: bool,
    pub rssi: i32,
    pub snr: f32,
}

impl ScriptedRadio {
    /// Radio whose peer never answers
    pub fn silent(clock: &ManualClock) -> Self {
        Self::with_responder(clock, |_, _| Vec::new())
    }

    /// Radio whose peer answers the `n`-th transmission (0-based) with `responder(frame, n)`
    pub fn with_responder<F>(clock: &ManualClock, responder: F) -> Self
    where
        F: FnMut(&[u8], usize) -> Vec<Inbound> + 'static,
    {
        Self {
            clock: clock.clone(),
            responder: Box::new(responder),
            pending: Vec::new(),
            current: VecDeque::new(),
            tx_buffer: Vec::new(),
            sent: Vec::new(),
            sent_at: Vec::new(),
            init_calls: 0,
            receive_calls: 0,
            fail_init: false,
            rssi: -70,
            snr: 8.0,
        }
    }

    /// Queue an inbound frame relative to the current time
    pub fn push_inbound(&mut self, inbound: Inbound) {
        let due = self.clock.now_ms() + inbound.delay_ms;
        self.pending.push((due, inbound));
        self.pending.sort_by_key(|(due, _)| *due);
    }

    pub fn unread(&self) -> usize {
        self.current.len()
    }
}

impl RadioDriver for ScriptedRadio {
    fn init(&mut self, config: &RadioConfig) -> Result<()> {
        self.init_calls += 1;
        if self.fail_init {
            return Err(LinkError::RadioInit {
                frequency_hz: config.frequency_hz,
            });
        }
        Ok(())
    }

    fn begin_packet(&mut self) -> Result<()> {
        self.tx_buffer.clear();
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.tx_buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn end_packet(&mut self) -> Result<()> {
        let frame = std::mem::take(&mut self.tx_buffer);
        let index = self.sent.len();
        for inbound in (self.responder)(&frame, index) {
            self.push_inbound(inbound);
        }
        self.sent_at.push(self.clock.now_ms());
        self.sent.push(frame);
        Ok(())
    }

    fn receive(&mut self) -> Result<()> {
        self.receive_calls += 1;
        Ok(())
    }

    fn parse_packet(&mut self) -> usize {
        match self.pending.first() {
            Some((due, _)) if *due <= self.clock.now_ms() => {
                let (_, inbound) = self.pending.remove(0);
                self.current = inbound.bytes.into_iter().collect();
                inbound.announced
            }
            _ => 0,
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.current.pop_front()
    }

    fn packet_rssi(&self) -> i32 {
        self.rssi
    }

    fn packet_snr(&self) -> f32 {
        self.snr
    }
}
