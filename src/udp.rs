/// UDP-backed radio for host-side benches and loopback tests
///
/// Each packet is one datagram to a fixed peer. With CRC enabled a CRC-32
/// trailer is appended and checked on receipt; corrupted datagrams are
/// dropped the way a radio with hardware CRC drops them.
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};

use log::warn;
use rand::Rng;

use crate::errors::{LinkError, Result};
use crate::radio::{RadioConfig, RadioDriver};

const CRC_LEN: usize = 4;
const MAX_DATAGRAM: usize = 256;

pub struct UdpRadio {
    socket: UdpSocket,
    peer: Option<SocketAddr>,
    crc_enabled: bool,
    loss_probability: f64,
    rssi_dbm: i32,
    snr_db: f32,
    tx_buffer: Vec<u8>,
    rx_packet: VecDeque<u8>,
    recv_buffer: [u8; MAX_DATAGRAM],
}

impl UdpRadio {
    /// Bind a radio to a local address
    pub fn bind(local: &str) -> Result<Self> {
        let socket = UdpSocket::bind(local)?;
        Ok(Self {
            socket,
            peer: None,
            crc_enabled: false,
            loss_probability: 0.0,
            rssi_dbm: -60,
            snr_db: 9.5,
            tx_buffer: Vec::with_capacity(MAX_DATAGRAM),
            rx_packet: VecDeque::with_capacity(MAX_DATAGRAM),
            recv_buffer: [0u8; MAX_DATAGRAM],
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Set the address every transmitted packet goes to
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Drop outbound packets with probability `p`
    pub fn with_loss_probability(mut self, p: f64) -> Self {
        self.loss_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Link quality reported for every received packet
    pub fn with_link_quality(mut self, rssi_dbm: i32, snr_db: f32) -> Self {
        self.rssi_dbm = rssi_dbm;
        self.snr_db = snr_db;
        self
    }

    fn checked_payload(&self, datagram: &[u8]) -> Option<usize> {
        if !self.crc_enabled {
            return Some(datagram.len());
        }
        if datagram.len() < CRC_LEN {
            return None;
        }
        let body = datagram.len() - CRC_LEN;
        let mut trailer = [0u8; CRC_LEN];
        trailer.copy_from_slice(&datagram[body..]);
        (crc32fast::hash(&datagram[..body]) == u32::from_le_bytes(trailer)).then_some(body)
    }
}

impl RadioDriver for UdpRadio {
    fn init(&mut self, config: &RadioConfig) -> Result<()> {
        self.socket
            .set_nonblocking(true)
            .map_err(|_| LinkError::RadioInit {
                frequency_hz: config.frequency_hz,
            })?;
        self.crc_enabled = config.crc_enabled;
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
        let peer = self
            .peer
            .ok_or_else(|| LinkError::Io("no peer address configured".to_string()))?;

        if self.crc_enabled {
            let crc = crc32fast::hash(&self.tx_buffer);
            self.tx_buffer.extend_from_slice(&crc.to_le_bytes());
        }

        if self.loss_probability > 0.0 && rand::thread_rng().gen_bool(self.loss_probability) {
            return Ok(());
        }

        self.socket.send_to(&self.tx_buffer, peer)?;
        Ok(())
    }

    fn receive(&mut self) -> Result<()> {
        Ok(())
    }

    fn parse_packet(&mut self) -> usize {
        let received = match self.socket.recv_from(&mut self.recv_buffer) {
            Ok((n, _)) => n,
            Err(e) if e.kind() == ErrorKind::WouldBlock => return 0,
            Err(e) => {
                warn!("udp radio receive failed: {}", e);
                return 0;
            }
        };

        let Some(len) = self.checked_payload(&self.recv_buffer[..received]) else {
            warn!("dropping {} byte datagram with bad CRC", received);
            return 0;
        };

        self.rx_packet.clear();
        self.rx_packet.extend(&self.recv_buffer[..len]);
        len
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx_packet.pop_front()
    }

    fn packet_rssi(&self) -> i32 {
        self.rssi_dbm
    }

    fn packet_snr(&self) -> f32 {
        self.snr_db
    }
}
