use fieldlink_core::contracts::{ACK_SIZE, STATUS_ALERT_SIZE};
use fieldlink_core::{Ack, LinkError, StatusAlert};
use rand::Rng;

fn random_alert(rng: &mut impl Rng) -> StatusAlert {
    StatusAlert {
        dev_id: rng.gen(),
        msg_type: rng.gen(),
        uptime_ms: rng.gen(),
        seq: rng.gen(),
        field8: rng.gen(),
        battery_mv: rng.gen(),
    }
}

#[test]
fn test_status_alert_decode_inverts_encode() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let msg = random_alert(&mut rng);
        assert_eq!(StatusAlert::decode(&msg.encode()), Ok(msg));
    }
}

#[test]
fn test_ack_decode_inverts_encode() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let ack = Ack {
            msg_type: rng.gen(),
            seq: rng.gen(),
            rssi_dbm: rng.gen(),
            snr_db: rng.gen(),
        };
        assert_eq!(Ack::decode(&ack.encode()), Ok(ack));
    }
}

#[test]
fn test_encode_inverts_decode_on_arbitrary_bytes() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let raw: [u8; STATUS_ALERT_SIZE] = rng.gen();
        assert_eq!(StatusAlert::decode(&raw).unwrap().encode(), raw);

        let raw: [u8; ACK_SIZE] = rng.gen();
        assert_eq!(Ack::decode(&raw).unwrap().encode(), raw);
    }
}

#[test]
fn test_any_other_length_is_size_mismatch() {
    let buf = [0u8; 64];
    for len in 0..buf.len() {
        let alert = StatusAlert::decode(&buf[..len]);
        if len == STATUS_ALERT_SIZE {
            assert!(alert.is_ok());
        } else {
            assert_eq!(
                alert,
                Err(LinkError::SizeMismatch { expected: STATUS_ALERT_SIZE, received: len })
            );
        }

        let ack = Ack::decode(&buf[..len]);
        if len == ACK_SIZE {
            assert!(ack.is_ok());
        } else {
            assert_eq!(ack, Err(LinkError::SizeMismatch { expected: ACK_SIZE, received: len }));
        }
    }
}

#[test]
fn test_encoding_is_deterministic() {
    let msg = StatusAlert::heartbeat(200, u32::MAX, u16::MAX, 4200);
    let first = msg.encode();
    for _ in 0..100 {
        assert_eq!(msg.encode(), first);
    }
}
