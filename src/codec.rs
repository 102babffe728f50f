/// Wire codec for the two frame kinds
///
/// Encoding is total and returns a fresh fixed-size array. Decoding only
/// checks the length; tag semantics are left to the caller.
use crate::contracts::{Ack, StatusAlert, ACK_SIZE, STATUS_ALERT_SIZE};
use crate::errors::{LinkError, Result};

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    <[u8; N]>::try_from(bytes).map_err(|_| LinkError::SizeMismatch {
        expected: N,
        received: bytes.len(),
    })
}

impl StatusAlert {
    /// Pack into the 11-byte wire layout
    pub fn encode(&self) -> [u8; STATUS_ALERT_SIZE] {
        let mut out = [0u8; STATUS_ALERT_SIZE];
        out[0] = self.dev_id;
        out[1] = self.msg_type;
        out[2..6].copy_from_slice(&self.uptime_ms.to_le_bytes());
        out[6..8].copy_from_slice(&self.seq.to_le_bytes());
        out[8] = self.field8;
        out[9..11].copy_from_slice(&self.battery_mv.to_le_bytes());
        out
    }

    /// Unpack from the 11-byte wire layout
    ///
    /// # Errors
    /// `LinkError::SizeMismatch` if `bytes` is not exactly 11 bytes long.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let b = fixed::<STATUS_ALERT_SIZE>(bytes)?;
        Ok(Self {
            dev_id: b[0],
            msg_type: b[1],
            uptime_ms: u32::from_le_bytes([b[2], b[3], b[4], b[5]]),
            seq: u16::from_le_bytes([b[6], b[7]]),
            field8: b[8],
            battery_mv: u16::from_le_bytes([b[9], b[10]]),
        })
    }
}

impl Ack {
    /// Pack into the 5-byte wire layout
    pub fn encode(&self) -> [u8; ACK_SIZE] {
        let seq = self.seq.to_le_bytes();
        [
            self.msg_type,
            seq[0],
            seq[1],
            self.rssi_dbm as u8,
            self.snr_db as u8,
        ]
    }

    /// Unpack from the 5-byte wire layout
    ///
    /// # Errors
    /// `LinkError::SizeMismatch` if `bytes` is not exactly 5 bytes long.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let b = fixed::<ACK_SIZE>(bytes)?;
        Ok(Self {
            msg_type: b[0],
            seq: u16::from_le_bytes([b[1], b[2]]),
            rssi_dbm: b[3] as i8,
            snr_db: b[4] as i8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{MessageKind, MSG_ACK};

    #[test]
    fn test_status_alert_layout() {
        let msg = StatusAlert::new(0x07, MessageKind::Alert, 0x1234_5678, 0xBEEF, 0x5A, 3712);
        let bytes = msg.encode();

        assert_eq!(
            bytes,
            [0x07, 0xA1, 0x78, 0x56, 0x34, 0x12, 0xEF, 0xBE, 0x5A, 0x80, 0x0E]
        );
        assert_eq!(StatusAlert::decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_ack_layout() {
        let ack = Ack::new(42, -80, 7);
        let bytes = ack.encode();

        assert_eq!(bytes, [MSG_ACK, 42, 0, 0xB0, 7]);
        assert_eq!(Ack::decode(&bytes).unwrap(), ack);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        for len in [0usize, 1, 5, 9, 10, 12, 64] {
            let buf = vec![0u8; len];
            assert_eq!(
                StatusAlert::decode(&buf),
                Err(LinkError::SizeMismatch { expected: STATUS_ALERT_SIZE, received: len })
            );
        }
        for len in [0usize, 4, 6, 11] {
            let buf = vec![0u8; len];
            assert_eq!(
                Ack::decode(&buf),
                Err(LinkError::SizeMismatch { expected: ACK_SIZE, received: len })
            );
        }
    }

    #[test]
    fn test_decode_does_not_validate_tag() {
        let raw = [0x00, 0x2A, 0x00, 0xFF, 0x80];
        let ack = Ack::decode(&raw).unwrap();
        assert_eq!(ack.msg_type, 0x00);
        assert_eq!(ack.rssi_dbm, -1);
        assert_eq!(ack.snr_db, -128);
        assert_eq!(ack.encode(), raw);
    }
}
