//! FieldLink Core - Reliable status/alert delivery over a half-duplex LoRa link
//!
//! **Creator**: Shayan Golmezerji
//! **License**: Creative Commons Attribution 4.0 International (CC BY 4.0)
//!
//! A field device sends fixed-size status/alert frames to a gateway and
//! retries until the gateway echoes the sequence number back in an
//! acknowledgement frame. The radio chip driver stays outside this crate
//! behind the [`radio::RadioDriver`] trait.
//!
//! # Design Principles
//! - Fixed-length little-endian frames, pure encode/decode
//! - One outstanding request, bounded attempts
//! - Radio held by exclusive borrow, never as global state
//! - Clock and sleep injected so the retry loop runs on simulated time

pub mod errors;
pub mod contracts;
pub mod codec;
pub mod clock;
pub mod radio;
pub mod ack_manager;
pub mod transmitter;
pub mod receiver;
pub mod udp;
pub mod event;

pub use clock::{Clock, ManualClock, SystemClock};
pub use contracts::{Ack, AckMetrics, MessageKind, ReceivedPacket, StatusAlert};
pub use errors::{LinkError, Result};
pub use radio::{RadioConfig, RadioDriver, RadioPins};
pub use receiver::Receiver;
pub use transmitter::{Delivery, Transmitter, TransmitterBuilder};

/// Per-attempt acknowledgement window in milliseconds
pub const ACK_TIMEOUT_MS: u32 = 1200;

/// Retries after the first transmission
pub const MAX_RETRIES: u8 = 3;

/// Pause between a failed attempt and the next one
pub const RETRY_BACKOFF_MS: u32 = 50;

/// Yield between empty polls while awaiting an acknowledgement
pub const POLL_INTERVAL_MS: u32 = 1;
