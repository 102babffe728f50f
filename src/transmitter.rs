/// Transmitter module - reliable delivery of one request frame
///
/// Sends a status/alert frame, listens for the matching acknowledgement and
/// retries on timeout. One request is outstanding at a time; the radio is
/// borrowed mutably for the transmitter's whole lifetime.
use log::{debug, warn};

use crate::ack_manager::{AckManager, AckPoll};
use crate::clock::Clock;
use crate::contracts::{AckMetrics, StatusAlert, STATUS_ALERT_SIZE};
use crate::errors::Result;
use crate::radio::RadioDriver;

/// Result of a delivery procedure
///
/// Both variants carry fully populated metrics. On exhaustion the receipt
/// timestamp and round-trip time stay zero in the metrics; the accessors
/// below return `None` for them instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// A matching acknowledgement arrived
    Acked(AckMetrics),
    /// Every attempt timed out without a matching acknowledgement
    Exhausted(AckMetrics),
}

impl Delivery {
    pub fn is_acked(&self) -> bool {
        matches!(self, Self::Acked(_))
    }

    pub fn metrics(&self) -> &AckMetrics {
        match self {
            Self::Acked(metrics) | Self::Exhausted(metrics) => metrics,
        }
    }

    pub fn into_metrics(self) -> AckMetrics {
        match self {
            Self::Acked(metrics) | Self::Exhausted(metrics) => metrics,
        }
    }

    /// Round-trip time of the successful attempt
    pub fn rtt_ms(&self) -> Option<u32> {
        match self {
            Self::Acked(metrics) => Some(metrics.rtt_ms),
            Self::Exhausted(_) => None,
        }
    }

    /// Receipt time of the matching acknowledgement
    pub fn ack_rx_ms(&self) -> Option<u32> {
        match self {
            Self::Acked(metrics) => Some(metrics.ack_rx_ms),
            Self::Exhausted(_) => None,
        }
    }
}

/// TransmitterBuilder - Fluent interface for transmitter configuration
pub struct TransmitterBuilder {
    max_retries: u8,
    ack_timeout_ms: u32,
    retry_backoff_ms: u32,
    poll_interval_ms: u32,
}

impl TransmitterBuilder {
    /// Create a new TransmitterBuilder with defaults
    pub fn new() -> Self {
        Self {
            max_retries: crate::MAX_RETRIES,
            ack_timeout_ms: crate::ACK_TIMEOUT_MS,
            retry_backoff_ms: crate::RETRY_BACKOFF_MS,
            poll_interval_ms: crate::POLL_INTERVAL_MS,
        }
    }

    /// Set retries after the first attempt
    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the per-attempt acknowledgement window
    pub fn with_ack_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.ack_timeout_ms = timeout_ms;
        self
    }

    /// Set the pause between a failed attempt and the next one
    pub fn with_retry_backoff_ms(mut self, backoff_ms: u32) -> Self {
        self.retry_backoff_ms = backoff_ms;
        self
    }

    /// Set the yield between empty polls
    pub fn with_poll_interval_ms(mut self, interval_ms: u32) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    pub fn get_max_retries(&self) -> u8 {
        self.max_retries
    }

    pub fn get_ack_timeout_ms(&self) -> u32 {
        self.ack_timeout_ms
    }

    pub fn get_retry_backoff_ms(&self) -> u32 {
        self.retry_backoff_ms
    }

    pub fn get_poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }

    /// Bind the configuration to a radio and a clock
    pub fn build<R: RadioDriver, C: Clock>(self, radio: &mut R, clock: C) -> Transmitter<'_, R, C> {
        Transmitter {
            radio,
            clock,
            max_retries: self.max_retries,
            ack_timeout_ms: self.ack_timeout_ms,
            retry_backoff_ms: self.retry_backoff_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}

impl Default for TransmitterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Transmitter - send/await-ack/retry state machine
pub struct Transmitter<'r, R: RadioDriver, C: Clock> {
    radio: &'r mut R,
    clock: C,
    max_retries: u8,
    ack_timeout_ms: u32,
    retry_backoff_ms: u32,
    poll_interval_ms: u32,
}

impl<'r, R: RadioDriver, C: Clock> Transmitter<'r, R, C> {
    /// Transmitter with default timing
    pub fn new(radio: &'r mut R, clock: C) -> Self {
        TransmitterBuilder::new().build(radio, clock)
    }

    /// Encode `message` and deliver it with the configured timeout and retries
    pub fn send_status_alert(&mut self, message: &StatusAlert) -> Result<Delivery> {
        let frame = message.encode();
        self.send_with_ack(&frame, message.seq, self.ack_timeout_ms, self.max_retries)
    }

    /// Deliver `frame` and wait for an acknowledgement echoing `seq`
    ///
    /// Makes up to `1 + max_retries` attempts, each listening for
    /// `timeout_ms` from its own start. Wrong-length, undecodable and
    /// mismatched frames are discarded without ending the attempt.
    ///
    /// # Errors
    /// Only radio transport faults. Running out of attempts is
    /// `Ok(Delivery::Exhausted(_))`.
    pub fn send_with_ack(
        &mut self,
        frame: &[u8; STATUS_ALERT_SIZE],
        seq: u16,
        timeout_ms: u32,
        max_retries: u8,
    ) -> Result<Delivery> {
        let mut metrics = AckMetrics::default();
        let total_attempts = u16::from(max_retries) + 1;
        let mut acked = false;

        for attempt in 1..=total_attempts {
            metrics.attempts = attempt;

            let t0 = self.clock.now_ms();
            if attempt == 1 {
                metrics.tx_first_ms = t0;
            }
            metrics.tx_last_ms = t0;

            debug!("seq {} attempt {}/{}", seq, attempt, total_attempts);
            self.radio.transmit(frame)?;
            self.radio.receive()?;

            while self.clock.elapsed_since(t0) < timeout_ms {
                match AckManager::poll_ack(&mut *self.radio, seq) {
                    AckPoll::Idle => self.clock.sleep_ms(self.poll_interval_ms),
                    AckPoll::Discarded(_) => continue,
                    AckPoll::Matched(ack) => {
                        let ack_rx_ms = self.clock.now_ms();
                        metrics.ack_rx_ms = ack_rx_ms;
                        metrics.rtt_ms = ack_rx_ms.wrapping_sub(t0);
                        metrics.ack_rssi = ack.rssi_dbm;
                        metrics.ack_snr = ack.snr_db;
                        acked = true;
                        break;
                    }
                }
            }

            if acked {
                debug!(
                    "seq {} acked on attempt {} rtt={}ms rssi={} snr={}",
                    seq, attempt, metrics.rtt_ms, metrics.ack_rssi, metrics.ack_snr
                );
                break;
            }

            if attempt < total_attempts {
                self.clock.sleep_ms(self.retry_backoff_ms);
            }
        }

        metrics.tx_end_ms = self.clock.now_ms();

        if acked {
            Ok(Delivery::Acked(metrics))
        } else {
            warn!("seq {} not acknowledged after {} attempts", seq, metrics.attempts);
            Ok(Delivery::Exhausted(metrics))
        }
    }
}
