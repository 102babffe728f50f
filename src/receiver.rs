use log::{debug, trace};

use crate::ack_manager::AckManager;
use crate::contracts::{ReceivedPacket, StatusAlert, ACK_SIZE, STATUS_ALERT_SIZE};
use crate::errors::{LinkError, Result};
use crate::radio::{init_radio, RadioConfig, RadioDriver};

pub struct Receiver<'r, R: RadioDriver> {
    radio: &'r mut R,
}

impl<'r, R: RadioDriver> Receiver<'r, R> {
    pub fn new(radio: &'r mut R) -> Self {
        Self { radio }
    }

    /// Read and decode the pending frame announced with `packet_size` bytes
    ///
    /// Wrong-sized frames are drained so the radio is ready for the next one.
    pub fn receive_status_alert(&mut self, packet_size: usize) -> Result<ReceivedPacket> {
        if packet_size != STATUS_ALERT_SIZE {
            let dropped = self.radio.drain();
            trace!("drained {} bytes of a {} byte frame", dropped, packet_size);
            return Err(LinkError::SizeMismatch {
                expected: STATUS_ALERT_SIZE,
                received: packet_size,
            });
        }

        let raw = self
            .radio
            .read_frame::<STATUS_ALERT_SIZE>()
            .ok_or_else(|| LinkError::Unpack("frame ended before 11 bytes".to_string()))?;

        let message = StatusAlert::decode(&raw).map_err(|e| LinkError::Unpack(e.to_string()))?;

        Ok(ReceivedPacket {
            message,
            raw,
            rssi: self.radio.packet_rssi(),
            snr: self.radio.packet_snr(),
        })
    }

    /// Acknowledge `seq` with the link quality observed for the request
    pub fn send_ack_for_seq(&mut self, seq: u16, rssi: i32, snr: f32) -> Result<[u8; ACK_SIZE]> {
        AckManager::send_ack(&mut *self.radio, seq, rssi, snr)
    }

    /// Service one pending frame: receive it and, if valid, acknowledge it
    ///
    /// `Ok(None)` when nothing is pending.
    pub fn poll_and_ack(&mut self) -> Result<Option<ReceivedPacket>> {
        let packet_size = self.radio.parse_packet();
        if packet_size == 0 {
            return Ok(None);
        }

        let packet = self.receive_status_alert(packet_size)?;
        self.send_ack_for_seq(packet.message.seq, packet.rssi, packet.snr)?;
        debug!(
            "acked dev {} seq {} rssi={} snr={:.1}",
            packet.message.dev_id, packet.message.seq, packet.rssi, packet.snr
        );

        Ok(Some(packet))
    }
}

pub struct ReceiverBuilder {
    config: RadioConfig,
}

impl ReceiverBuilder {
    pub fn new(config: RadioConfig) -> Self {
        Self { config }
    }

    pub fn get_config(&self) -> &RadioConfig {
        &self.config
    }

    /// Validate the radio configuration, initialise the radio and start listening
    pub fn build<R: RadioDriver>(self, radio: &mut R) -> Result<Receiver<'_, R>> {
        init_radio(radio, &self.config)?;
        radio.receive()?;
        Ok(Receiver::new(radio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receiver_builder_keeps_config() {
        let builder = ReceiverBuilder::new(RadioConfig::new(868_000_000).with_spreading_factor(9));
        assert_eq!(builder.get_config().frequency_hz, 868_000_000);
        assert_eq!(builder.get_config().spreading_factor, 9);
    }
}
