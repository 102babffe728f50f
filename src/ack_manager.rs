/// ACK Manager module - acknowledgement generation and matching
///
/// The gateway side builds and sends acknowledgements; the device side
/// polls the radio once per step and classifies whatever arrived against
/// the outstanding sequence number.
use log::trace;

use crate::contracts::{Ack, ACK_SIZE};
use crate::errors::Result;
use crate::radio::RadioDriver;

/// Why an inbound candidate was thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Length differs from the ack size, bytes were drained
    WrongLength(usize),
    /// Right length but the bytes could not be read or decoded
    Undecodable,
    /// Decoded but the tag or sequence does not match
    Mismatch { msg_type: u8, seq: u16 },
}

/// Outcome of a single poll of the radio while awaiting an ack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckPoll {
    /// Nothing pending
    Idle,
    Discarded(DiscardReason),
    Matched(Ack),
}

/// ACK Manager - stateless helpers around the ack frame
pub struct AckManager;

impl AckManager {
    /// Round an SNR reading to whole dB, halves away from zero, truncated to a byte
    pub fn round_snr(snr_db: f32) -> i8 {
        (snr_db.round() as i32) as i8
    }

    /// Build the ack for `seq` from raw link-quality readings
    ///
    /// RSSI is truncated to a signed byte the way the radio reports it.
    pub fn build_ack(seq: u16, rssi_dbm: i32, snr_db: f32) -> Ack {
        Ack::new(seq, rssi_dbm as i8, Self::round_snr(snr_db))
    }

    /// Send an ack for `seq` and return the radio to receive mode
    ///
    /// Fire and forget: nothing waits for the peer.
    pub fn send_ack<R: RadioDriver>(
        radio: &mut R,
        seq: u16,
        rssi_dbm: i32,
        snr_db: f32,
    ) -> Result<[u8; ACK_SIZE]> {
        let bytes = Self::build_ack(seq, rssi_dbm, snr_db).encode();
        radio.transmit(&bytes)?;
        radio.receive()?;
        Ok(bytes)
    }

    /// Poll the radio once for an ack matching `seq`
    pub fn poll_ack<R: RadioDriver>(radio: &mut R, seq: u16) -> AckPoll {
        let packet_size = radio.parse_packet();
        if packet_size == 0 {
            return AckPoll::Idle;
        }

        if packet_size != ACK_SIZE {
            radio.drain();
            trace!("discarding {} byte frame while awaiting ack {}", packet_size, seq);
            return AckPoll::Discarded(DiscardReason::WrongLength(packet_size));
        }

        let ack = match radio.read_frame::<ACK_SIZE>().map(|raw| Ack::decode(&raw)) {
            Some(Ok(ack)) => ack,
            _ => {
                trace!("discarding undecodable ack candidate");
                return AckPoll::Discarded(DiscardReason::Undecodable);
            }
        };

        if !ack.acknowledges(seq) {
            trace!(
                "ignoring ack tag={:#04x} seq={} while awaiting seq={}",
                ack.msg_type,
                ack.seq,
                seq
            );
            return AckPoll::Discarded(DiscardReason::Mismatch {
                msg_type: ack.msg_type,
                seq: ack.seq,
            });
        }

        AckPoll::Matched(ack)
    }
}
