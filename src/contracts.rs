//! Core data structures for the field link protocol
//!
//! Both frame kinds have a fixed wire size. Field order below matches the
//! byte order on the wire; see the `codec` module for the exact layout.

/// Wire size of a [`StatusAlert`] frame
pub const STATUS_ALERT_SIZE: usize = 11;

/// Wire size of an [`Ack`] frame
pub const ACK_SIZE: usize = 5;

/// Reserved frame-type tag for alert frames
pub const MSG_ALERT: u8 = 0xA1;

/// Reserved frame-type tag for periodic status frames
pub const MSG_STATUS: u8 = 0xB1;

/// Reserved frame-type tag for acknowledgement frames
pub const MSG_ACK: u8 = 0xC1;

/// Frame-type discriminator
///
/// Only [`MessageKind::Ack`] is checked by the transport. Alert and status
/// are application-level and pass through the codec untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    Alert = MSG_ALERT,
    Status = MSG_STATUS,
    Ack = MSG_ACK,
}

impl MessageKind {
    /// Wire tag for this kind
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Map a wire tag back to a kind, `None` for unreserved tags
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            MSG_ALERT => Some(Self::Alert),
            MSG_STATUS => Some(Self::Status),
            MSG_ACK => Some(Self::Ack),
            _ => None,
        }
    }
}

/// StatusAlert - Request frame from the field device to the gateway
///
/// # Wire Layout
/// Total size: 11 bytes
/// - dev_id: 1 byte
/// - msg_type: 1 byte
/// - uptime_ms: 4 bytes (u32, LE)
/// - seq: 2 bytes (u16, LE)
/// - field8: 1 byte
/// - battery_mv: 2 bytes (u16, LE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusAlert {
    /// Device identifier
    pub dev_id: u8,

    /// Frame-type tag, normally [`MSG_ALERT`] or [`MSG_STATUS`]
    pub msg_type: u8,

    /// Monotonic uptime at the moment the record was produced
    pub uptime_ms: u32,

    /// Sequence number, echoed back by the peer's acknowledgement
    pub seq: u16,

    /// Application-defined status byte
    pub field8: u8,

    /// Battery voltage in millivolts
    pub battery_mv: u16,
}

impl StatusAlert {
    /// Create a record of the given kind
    pub fn new(
        dev_id: u8,
        kind: MessageKind,
        uptime_ms: u32,
        seq: u16,
        field8: u8,
        battery_mv: u16,
    ) -> Self {
        Self {
            dev_id,
            msg_type: kind.tag(),
            uptime_ms,
            seq,
            field8,
            battery_mv,
        }
    }

    /// Plain status record with a zero status byte
    pub fn heartbeat(dev_id: u8, uptime_ms: u32, seq: u16, battery_mv: u16) -> Self {
        Self::new(dev_id, MessageKind::Status, uptime_ms, seq, 0, battery_mv)
    }

    /// Reserved kind of this record, if its tag is one
    pub fn kind(&self) -> Option<MessageKind> {
        MessageKind::from_tag(self.msg_type)
    }

    pub fn is_alert(&self) -> bool {
        self.msg_type == MSG_ALERT
    }
}

/// Ack - Acknowledgement frame from the gateway back to the field device
///
/// # Wire Layout
/// Total size: 5 bytes
/// - msg_type: 1 byte (must be [`MSG_ACK`] to be accepted)
/// - seq: 2 bytes (u16, LE)
/// - rssi_dbm: 1 byte (i8)
/// - snr_db: 1 byte (i8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ack {
    pub msg_type: u8,

    /// Sequence number of the request being acknowledged
    pub seq: u16,

    /// Signal strength the gateway observed for the request
    pub rssi_dbm: i8,

    /// Signal-to-noise ratio the gateway observed, rounded to whole dB
    pub snr_db: i8,
}

impl Ack {
    /// Create an acknowledgement for `seq`
    pub fn new(seq: u16, rssi_dbm: i8, snr_db: i8) -> Self {
        Self {
            msg_type: MSG_ACK,
            seq,
            rssi_dbm,
            snr_db,
        }
    }

    /// Check the tag and echoed sequence against an outstanding request
    pub fn acknowledges(&self, seq: u16) -> bool {
        self.msg_type == MSG_ACK && self.seq == seq
    }
}

/// Per-request delivery bookkeeping
///
/// Never transmitted. All timestamps come from the transmitter's clock.
/// Fields left at zero mean "did not happen"; use
/// [`crate::transmitter::Delivery`] accessors to tell that apart from a
/// genuine zero reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AckMetrics {
    /// Attempts made, including the first transmission
    pub attempts: u16,

    /// Round-trip time of the successful attempt
    pub rtt_ms: u32,

    /// Signal strength reported inside the acknowledgement
    pub ack_rssi: i8,

    /// SNR reported inside the acknowledgement
    pub ack_snr: i8,

    /// Start of the first attempt
    pub tx_first_ms: u32,

    /// Start of the most recent attempt
    pub tx_last_ms: u32,

    /// Receipt time of the matching acknowledgement
    pub ack_rx_ms: u32,

    /// End of the whole procedure
    pub tx_end_ms: u32,
}

impl AckMetrics {
    /// Wall time spent in the procedure, all attempts and backoffs included
    pub fn total_ms(&self) -> u32 {
        self.tx_end_ms.wrapping_sub(self.tx_first_ms)
    }
}

/// Inbound request frame together with the link quality at receipt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceivedPacket {
    pub message: StatusAlert,

    /// Bytes exactly as read from the radio
    pub raw: [u8; STATUS_ALERT_SIZE],

    /// Packet RSSI in dBm
    pub rssi: i32,

    /// Packet SNR in dB
    pub snr: f32,
}
