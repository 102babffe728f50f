/// Radio driver capability set and its configuration
///
/// The chip driver itself is external. Transmitter and receiver hold a
/// `&mut` borrow of the driver for their whole lifetime, so exactly one
/// of them can touch the radio at any instant.
use log::info;

use crate::errors::{LinkError, Result};

/// Signal bandwidths accepted by SX127x-class transceivers, in Hz
pub const SUPPORTED_BANDWIDTHS_HZ: [u32; 10] = [
    7_800, 10_400, 15_600, 20_800, 31_250, 41_700, 62_500, 125_000, 250_000, 500_000,
];

/// Chip-select, reset and DIO0 interrupt pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioPins {
    pub ss: u8,
    pub reset: u8,
    pub dio0: u8,
}

impl Default for RadioPins {
    fn default() -> Self {
        Self {
            ss: 5,
            reset: 14,
            dio0: 2,
        }
    }
}

/// Modulation and bring-up parameters passed to [`RadioDriver::init`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioConfig {
    pub frequency_hz: u64,
    pub pins: RadioPins,

    /// Spreading factor, 6..=12
    pub spreading_factor: u8,

    /// One of [`SUPPORTED_BANDWIDTHS_HZ`]
    pub bandwidth_hz: u32,

    /// Coding rate denominator `d` of 4/d, 5..=8
    pub coding_rate: u8,

    /// Output power, 2..=20 dBm
    pub tx_power_dbm: i8,

    /// Hardware CRC on the payload
    pub crc_enabled: bool,
}

impl RadioConfig {
    pub fn new(frequency_hz: u64) -> Self {
        Self {
            frequency_hz,
            ..Self::default()
        }
    }

    pub fn with_pins(mut self, pins: RadioPins) -> Self {
        self.pins = pins;
        self
    }

    pub fn with_spreading_factor(mut self, sf: u8) -> Self {
        self.spreading_factor = sf;
        self
    }

    pub fn with_bandwidth_hz(mut self, bw: u32) -> Self {
        self.bandwidth_hz = bw;
        self
    }

    pub fn with_coding_rate(mut self, cr: u8) -> Self {
        self.coding_rate = cr;
        self
    }

    pub fn with_tx_power_dbm(mut self, dbm: i8) -> Self {
        self.tx_power_dbm = dbm;
        self
    }

    pub fn with_crc(mut self, enabled: bool) -> Self {
        self.crc_enabled = enabled;
        self
    }

    /// Check every parameter against the transceiver's limits
    ///
    /// # Errors
    /// `LinkError::InvalidConfig` naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.frequency_hz == 0 {
            return Err(LinkError::InvalidConfig("frequency must be non-zero".into()));
        }
        if !(6..=12).contains(&self.spreading_factor) {
            return Err(LinkError::InvalidConfig(format!(
                "spreading factor {} outside 6..=12",
                self.spreading_factor
            )));
        }
        if !SUPPORTED_BANDWIDTHS_HZ.contains(&self.bandwidth_hz) {
            return Err(LinkError::InvalidConfig(format!(
                "unsupported bandwidth {} Hz",
                self.bandwidth_hz
            )));
        }
        if !(5..=8).contains(&self.coding_rate) {
            return Err(LinkError::InvalidConfig(format!(
                "coding rate 4/{} outside 4/5..=4/8",
                self.coding_rate
            )));
        }
        if !(2..=20).contains(&self.tx_power_dbm) {
            return Err(LinkError::InvalidConfig(format!(
                "tx power {} dBm outside 2..=20",
                self.tx_power_dbm
            )));
        }
        Ok(())
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 915_000_000,
            pins: RadioPins::default(),
            spreading_factor: 7,
            bandwidth_hz: 125_000,
            coding_rate: 5,
            tx_power_dbm: 17,
            crc_enabled: true,
        }
    }
}

/// Byte-level packet radio
///
/// Mirrors the usual LoRa driver surface: a packet is framed by
/// `begin_packet`/`end_packet`, and inbound packets are announced by
/// `parse_packet` then consumed byte by byte.
pub trait RadioDriver {
    /// Bring the radio up with `config`
    ///
    /// # Errors
    /// `LinkError::RadioInit` if the chip does not respond at the frequency.
    fn init(&mut self, config: &RadioConfig) -> Result<()>;

    fn begin_packet(&mut self) -> Result<()>;

    fn write(&mut self, bytes: &[u8]) -> Result<usize>;

    /// Finish and transmit the current packet, blocking until it is on air
    fn end_packet(&mut self) -> Result<()>;

    /// Switch to continuous receive mode
    fn receive(&mut self) -> Result<()>;

    /// Length of the next inbound packet, 0 if none is pending
    fn parse_packet(&mut self) -> usize;

    /// Next byte of the current inbound packet
    fn read_byte(&mut self) -> Option<u8>;

    /// RSSI of the last received packet, dBm
    fn packet_rssi(&self) -> i32;

    /// SNR of the last received packet, dB
    fn packet_snr(&self) -> f32;

    /// Send one complete packet
    fn transmit(&mut self, frame: &[u8]) -> Result<()> {
        self.begin_packet()?;
        self.write(frame)?;
        self.end_packet()
    }

    /// Discard whatever remains of the current inbound packet
    fn drain(&mut self) -> usize {
        let mut dropped = 0;
        while self.read_byte().is_some() {
            dropped += 1;
        }
        dropped
    }

    /// Read exactly `N` bytes of the current packet, `None` on a short read
    fn read_frame<const N: usize>(&mut self) -> Option<[u8; N]>
    where
        Self: Sized,
    {
        let mut buf = [0u8; N];
        for slot in buf.iter_mut() {
            *slot = self.read_byte()?;
        }
        Some(buf)
    }
}

/// Validate `config` and bring the radio up with it
pub fn init_radio<R: RadioDriver>(radio: &mut R, config: &RadioConfig) -> Result<()> {
    config.validate()?;
    radio.init(config)?;
    info!(
        "radio up: {} Hz sf{} bw{} cr4/{} {} dBm crc={}",
        config.frequency_hz,
        config.spreading_factor,
        config.bandwidth_hz,
        config.coding_rate,
        config.tx_power_dbm,
        config.crc_enabled
    );
    Ok(())
}
