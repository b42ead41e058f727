//! UDP transport for IR blaster appliances.
//!
//! One [`UdpBlaster`] per appliance; discovery is a broadcast over the
//! local network. Sockets use SO_REUSEADDR so discovery can coexist with
//! other listeners.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tokio::time::{timeout, Instant};
use tracing::debug;

use super::{format_mac, wire, Blaster, CapturedCode, DiscoveredDevice};
use crate::error::TransportError;

use async_trait::async_trait;

/// UDP port appliances listen on for discovery and commands.
pub const APPLIANCE_PORT: u16 = 80;

/// Client name reported during the authentication handshake.
const CLIENT_NAME: &str = "ir-remotes";

fn create_socket() -> Result<std::net::UdpSocket, std::io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_broadcast(true)?;

    let addr: SocketAddr = "0.0.0.0:0".parse().unwrap();
    socket.bind(&addr.into())?;
    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

#[derive(Debug, Clone, Copy)]
struct Session {
    id: u32,
    key: [u8; 16],
}

/// Live UDP handle for a single appliance.
///
/// Holds the session key negotiated by [`Blaster::authenticate`];
/// re-authentication of a live session is a no-op.
pub struct UdpBlaster {
    socket: UdpSocket,
    addr: SocketAddr,
    mac: [u8; 6],
    device_type: u16,
    exchange_timeout: Duration,
    counter: AtomicU16,
    session: Mutex<Option<Session>>,
}

impl UdpBlaster {
    /// Build a handle from directory record fields. Resolves the
    /// endpoint and parses the MAC; no network traffic happens here.
    pub fn new(
        udp_address: &str,
        mac_address: &str,
        device_type: u16,
        exchange_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let addr = udp_address
            .to_socket_addrs()
            .map_err(|_| TransportError::InvalidAddress(udp_address.to_string()))?
            .next()
            .ok_or_else(|| TransportError::InvalidAddress(udp_address.to_string()))?;
        let mac = super::parse_mac(mac_address)?;

        let socket = UdpSocket::from_std(create_socket()?)?;

        Ok(Self {
            socket,
            addr,
            mac,
            device_type,
            exchange_timeout,
            counter: AtomicU16::new(1),
            session: Mutex::new(None),
        })
    }

    fn address(&self) -> String {
        self.addr.to_string()
    }

    async fn exchange(&self, packet: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.socket.send_to(packet, self.addr).await?;

        let mut buf = vec![0u8; 2048];
        let (len, _) = timeout(self.exchange_timeout, self.socket.recv_from(&mut buf))
            .await
            .map_err(|_| TransportError::Timeout {
                address: self.address(),
                timeout: self.exchange_timeout,
            })??;
        buf.truncate(len);
        Ok(buf)
    }

    /// Send an authenticated 0x6a exchange; returns the header error
    /// code and the decrypted payload (empty unless the code is 0).
    async fn payload_exchange(&self, payload: &[u8]) -> Result<(u16, Vec<u8>), TransportError> {
        let session = {
            let guard = self.session.lock().await;
            (*guard).ok_or_else(|| TransportError::Protocol {
                address: self.address(),
                message: "not authenticated".to_string(),
            })?
        };

        let counter = self.counter.fetch_add(1, Ordering::Relaxed);
        let packet = wire::command_packet(
            self.device_type,
            wire::CMD_PAYLOAD,
            counter,
            &self.mac,
            session.id,
            &session.key,
            payload,
        );

        let response = self.exchange(&packet).await?;
        let error_code =
            wire::response_error_code(&response).ok_or_else(|| TransportError::Protocol {
                address: self.address(),
                message: format!("short response ({} bytes)", response.len()),
            })?;

        if error_code != 0 {
            return Ok((error_code, Vec::new()));
        }
        Ok((0, wire::response_payload(&response, &session.key)))
    }
}

#[async_trait]
impl Blaster for UdpBlaster {
    async fn authenticate(&self) -> Result<(), TransportError> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Ok(());
        }

        let payload = wire::auth_payload(&[0u8; 15], CLIENT_NAME);
        let counter = self.counter.fetch_add(1, Ordering::Relaxed);
        let packet = wire::command_packet(
            self.device_type,
            wire::CMD_AUTH,
            counter,
            &self.mac,
            0,
            &wire::INITIAL_KEY,
            &payload,
        );

        let response = self.exchange(&packet).await?;
        match wire::response_error_code(&response) {
            Some(0) => {}
            Some(code) => {
                return Err(TransportError::Auth {
                    address: self.address(),
                    message: format!("appliance refused handshake (error {:#06x})", code),
                })
            }
            None => {
                return Err(TransportError::Auth {
                    address: self.address(),
                    message: "short handshake response".to_string(),
                })
            }
        }

        let plain = wire::response_payload(&response, &wire::INITIAL_KEY);
        let (id, key) = wire::parse_auth_response(&plain).ok_or(TransportError::Auth {
            address: self.address(),
            message: "handshake response missing session key".to_string(),
        })?;

        debug!(address = %self.addr, mac = %format_mac(&self.mac), "authenticated");
        *session = Some(Session { id, key });
        Ok(())
    }

    async fn start_capture(&self) -> Result<(), TransportError> {
        let payload = [wire::OP_START_CAPTURE, 0, 0, 0];
        let (error_code, _) = self.payload_exchange(&payload).await?;
        if error_code != 0 {
            return Err(TransportError::Protocol {
                address: self.address(),
                message: format!("appliance refused capture mode (error {:#06x})", error_code),
            });
        }
        Ok(())
    }

    async fn poll_captured(&self) -> Result<Option<CapturedCode>, TransportError> {
        let payload = [wire::OP_READ_CAPTURED, 0, 0, 0];
        let (error_code, plain) = self.payload_exchange(&payload).await?;

        match error_code {
            0 => {}
            wire::ERR_NOT_CAPTURED => return Ok(None),
            code => {
                return Err(TransportError::Protocol {
                    address: self.address(),
                    message: format!("read of captured code failed (error {:#06x})", code),
                })
            }
        }

        // The first four payload bytes echo the opcode; the code blob
        // starts with its class byte.
        if plain.len() <= 4 {
            return Err(TransportError::Protocol {
                address: self.address(),
                message: "short learn response".to_string(),
            });
        }
        let data = plain[4..].to_vec();
        Ok(Some(CapturedCode {
            code_class: data[0],
            data,
        }))
    }

    async fn send(&self, code: &[u8], repeat: u8) -> Result<(), TransportError> {
        let mut payload = vec![wire::OP_SEND_CODE, repeat, 0, 0];
        payload.extend_from_slice(code);

        let (error_code, _) = self.payload_exchange(&payload).await?;
        if error_code != 0 {
            return Err(TransportError::Protocol {
                address: self.address(),
                message: format!("appliance refused code send (error {:#06x})", error_code),
            });
        }
        Ok(())
    }
}

/// Broadcast a discovery hello and collect appliance answers until the
/// timeout elapses. Duplicate answers (same MAC) are collapsed.
pub async fn discover(discovery_timeout: Duration) -> Result<Vec<DiscoveredDevice>, TransportError> {
    let socket = UdpSocket::from_std(create_socket()?)?;

    let local = socket.local_addr()?;
    let local_ip = match local.ip() {
        IpAddr::V4(ip) => ip.octets(),
        IpAddr::V6(_) => [0, 0, 0, 0],
    };
    let hello = wire::hello_packet(local_ip, local.port());

    let broadcast = SocketAddr::from(([255, 255, 255, 255], APPLIANCE_PORT));
    socket.send_to(&hello, broadcast).await?;

    let mut found: Vec<DiscoveredDevice> = Vec::new();
    let deadline = Instant::now() + discovery_timeout;
    let mut buf = vec![0u8; 2048];

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        match timeout(remaining, socket.recv_from(&mut buf)).await {
            Ok(Ok((len, from))) => {
                let Some((device_type, mac)) = wire::parse_hello_response(&buf[..len]) else {
                    debug!(from = %from, "ignoring malformed discovery answer");
                    continue;
                };
                let mac_address = format_mac(&mac);
                if found.iter().any(|d| d.mac_address == mac_address) {
                    continue;
                }
                found.push(DiscoveredDevice {
                    udp_address: SocketAddr::new(from.ip(), APPLIANCE_PORT).to_string(),
                    mac_address,
                    device_type,
                });
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => break,
        }
    }

    Ok(found)
}
