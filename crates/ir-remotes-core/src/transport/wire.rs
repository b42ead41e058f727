//! Vendor packet framing and payload encryption.
//!
//! Command packets carry an AES-128-CBC encrypted payload inside a
//! 0x38-byte header. Until authentication completes, exchanges use the
//! vendor's well-known initial key; afterwards the session key returned
//! by the appliance.

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;

/// Well-known pre-authentication AES key.
pub const INITIAL_KEY: [u8; 16] = [
    0x09, 0x76, 0x28, 0x34, 0x3f, 0xe9, 0x9e, 0x23, 0x76, 0x5c, 0x15, 0x13, 0xac, 0xcf, 0x8b, 0x02,
];

/// CBC initialisation vector, fixed by the protocol.
pub const IV: [u8; 16] = [
    0x56, 0x2e, 0x17, 0x99, 0x6d, 0x09, 0x3d, 0x28, 0xdd, 0xb3, 0xba, 0x69, 0x5a, 0x2e, 0x6f, 0x58,
];

/// Command byte: discovery hello broadcast.
pub const CMD_HELLO: u8 = 0x06;
/// Command byte: authentication handshake.
pub const CMD_AUTH: u8 = 0x65;
/// Command byte: authenticated payload exchange.
pub const CMD_PAYLOAD: u8 = 0x6a;

/// Payload opcode: replay a control code.
pub const OP_SEND_CODE: u8 = 0x02;
/// Payload opcode: enter learning mode.
pub const OP_START_CAPTURE: u8 = 0x03;
/// Payload opcode: read back a learned code.
pub const OP_READ_CAPTURED: u8 = 0x04;

/// Response error code meaning "learning mode has not seen a code yet".
pub const ERR_NOT_CAPTURED: u16 = 0xfff6;

const MAGIC: [u8; 8] = [0x5a, 0xa5, 0xaa, 0x55, 0x5a, 0xa5, 0xaa, 0x55];

/// Header length of command packets and their responses.
pub const HEADER_LEN: usize = 0x38;

/// Protocol checksum: 0xbeaf plus the wrapping byte sum.
pub fn checksum(data: &[u8]) -> u16 {
    data.iter()
        .fold(0xbeafu16, |acc, b| acc.wrapping_add(*b as u16))
}

fn zero_pad(data: &[u8]) -> Vec<u8> {
    let mut padded = data.to_vec();
    let rem = padded.len() % 16;
    if rem != 0 {
        padded.resize(padded.len() + 16 - rem, 0);
    }
    padded
}

/// AES-128-CBC encrypt with zero padding.
pub fn encrypt(key: &[u8; 16], data: &[u8]) -> Vec<u8> {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let padded = zero_pad(data);
    let mut out = Vec::with_capacity(padded.len());
    let mut prev = IV;

    for chunk in padded.chunks_exact(16) {
        let mut block = [0u8; 16];
        for (i, b) in chunk.iter().enumerate() {
            block[i] = b ^ prev[i];
        }
        let mut ga = GenericArray::from(block);
        cipher.encrypt_block(&mut ga);
        prev.copy_from_slice(&ga);
        out.extend_from_slice(&ga);
    }
    out
}

/// AES-128-CBC decrypt. Input length must be a block multiple; trailing
/// partial blocks are dropped, matching appliance behaviour.
pub fn decrypt(key: &[u8; 16], data: &[u8]) -> Vec<u8> {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut out = Vec::with_capacity(data.len());
    let mut prev = IV;

    for chunk in data.chunks_exact(16) {
        let mut ga = GenericArray::clone_from_slice(chunk);
        cipher.decrypt_block(&mut ga);
        for (i, b) in ga.iter().enumerate() {
            out.push(b ^ prev[i]);
        }
        prev.copy_from_slice(chunk);
    }
    out
}

/// Build an authenticated command packet around an encrypted payload.
#[allow(clippy::too_many_arguments)]
pub fn command_packet(
    device_type: u16,
    command: u8,
    counter: u16,
    mac: &[u8; 6],
    session_id: u32,
    key: &[u8; 16],
    payload: &[u8],
) -> Vec<u8> {
    let mut packet = vec![0u8; HEADER_LEN];
    packet[0x00..0x08].copy_from_slice(&MAGIC);
    packet[0x24..0x26].copy_from_slice(&device_type.to_le_bytes());
    packet[0x26] = command;
    packet[0x28..0x2a].copy_from_slice(&counter.to_le_bytes());
    packet[0x2a..0x30].copy_from_slice(mac);
    packet[0x30..0x34].copy_from_slice(&session_id.to_le_bytes());
    packet[0x34..0x36].copy_from_slice(&checksum(payload).to_le_bytes());

    packet.extend_from_slice(&encrypt(key, payload));

    let full = checksum(&packet);
    packet[0x20..0x22].copy_from_slice(&full.to_le_bytes());
    packet
}

/// Error code reported in a command response header.
pub fn response_error_code(response: &[u8]) -> Option<u16> {
    if response.len() < 0x24 {
        return None;
    }
    Some(u16::from_le_bytes([response[0x22], response[0x23]]))
}

/// Decrypt the payload of a command response.
pub fn response_payload(response: &[u8], key: &[u8; 16]) -> Vec<u8> {
    if response.len() <= HEADER_LEN {
        return Vec::new();
    }
    decrypt(key, &response[HEADER_LEN..])
}

/// Build the discovery hello broadcast.
///
/// The clock fields are left zero: the appliance only uses them to set
/// its display and answers regardless.
pub fn hello_packet(local_ip: [u8; 4], local_port: u16) -> Vec<u8> {
    let mut packet = vec![0u8; 0x30];
    packet[0x18..0x1c].copy_from_slice(&local_ip);
    packet[0x1c..0x1e].copy_from_slice(&local_port.to_le_bytes());
    packet[0x26] = CMD_HELLO;

    let sum = checksum(&packet);
    packet[0x20..0x22].copy_from_slice(&sum.to_le_bytes());
    packet
}

/// Parse a discovery answer into (device type, MAC).
pub fn parse_hello_response(response: &[u8]) -> Option<(u16, [u8; 6])> {
    if response.len() < 0x40 {
        return None;
    }
    let device_type = u16::from_le_bytes([response[0x34], response[0x35]]);
    let mut mac = [0u8; 6];
    // The wire carries the MAC least-significant byte first.
    for (i, b) in response[0x3a..0x40].iter().rev().enumerate() {
        mac[i] = *b;
    }
    Some((device_type, mac))
}

/// Build the authentication payload carrying the client identity.
pub fn auth_payload(client_id: &[u8; 15], client_name: &str) -> Vec<u8> {
    let mut payload = vec![0u8; 0x50];
    payload[0x04..0x13].copy_from_slice(client_id);
    payload[0x1e] = 0x01;
    payload[0x2d] = 0x01;

    let name = client_name.as_bytes();
    let len = name.len().min(0x50 - 0x30 - 1);
    payload[0x30..0x30 + len].copy_from_slice(&name[..len]);
    payload
}

/// Parse a decrypted authentication response into (session id, key).
pub fn parse_auth_response(payload: &[u8]) -> Option<(u32, [u8; 16])> {
    if payload.len() < 0x14 {
        return None;
    }
    let id = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let mut key = [0u8; 16];
    key.copy_from_slice(&payload[0x04..0x14]);
    Some((id, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = INITIAL_KEY;
        let data = b"attack at dawn, repeat, at dawn";
        let ct = encrypt(&key, data);
        assert_eq!(ct.len() % 16, 0);

        let pt = decrypt(&key, &ct);
        assert_eq!(&pt[..data.len()], data);
        // Zero padding only.
        assert!(pt[data.len()..].iter().all(|b| *b == 0));
    }

    #[test]
    fn checksum_matches_known_base() {
        assert_eq!(checksum(&[]), 0xbeaf);
        assert_eq!(checksum(&[0x01, 0x02]), 0xbeb2);
    }

    #[test]
    fn command_packet_checksums_verify() {
        let mac = [0, 1, 2, 3, 4, 5];
        let payload = [OP_START_CAPTURE, 0, 0, 0];
        let packet = command_packet(0x2712, CMD_PAYLOAD, 7, &mac, 0x1001, &INITIAL_KEY, &payload);

        assert_eq!(packet[0x26], CMD_PAYLOAD);
        assert_eq!(
            u16::from_le_bytes([packet[0x34], packet[0x35]]),
            checksum(&payload)
        );

        // Recomputing the packet checksum with the field zeroed matches.
        let mut copy = packet.clone();
        copy[0x20] = 0;
        copy[0x21] = 0;
        assert_eq!(
            u16::from_le_bytes([packet[0x20], packet[0x21]]),
            checksum(&copy)
        );
    }

    #[test]
    fn hello_response_parses_type_and_mac() {
        let mut response = vec![0u8; 0x40];
        response[0x34..0x36].copy_from_slice(&0x2737u16.to_le_bytes());
        response[0x3a..0x40].copy_from_slice(&[0x05, 0x04, 0x03, 0x02, 0x01, 0x00]);

        let (device_type, mac) = parse_hello_response(&response).unwrap();
        assert_eq!(device_type, 0x2737);
        assert_eq!(mac, [0x00, 0x01, 0x02, 0x03, 0x04, 0x05]);
    }

    #[test]
    fn auth_round_trip_layout() {
        let payload = auth_payload(&[7u8; 15], "ir-remotes");
        assert_eq!(payload.len(), 0x50);
        assert_eq!(payload[0x04], 7);
        assert_eq!(payload[0x1e], 1);
        assert_eq!(&payload[0x30..0x3a], b"ir-remotes");

        let mut response = vec![0u8; 0x14];
        response[0..4].copy_from_slice(&0xdeadu32.to_le_bytes());
        response[0x04..0x14].copy_from_slice(&[9u8; 16]);
        let (id, key) = parse_auth_response(&response).unwrap();
        assert_eq!(id, 0xdead);
        assert_eq!(key, [9u8; 16]);
    }
}
