//! Hardware capability boundary for IR blaster appliances.
//!
//! The vendor UDP protocol lives behind the [`Blaster`] trait so the
//! registry, capture, and dispatch layers never see wire details. The
//! production implementation is [`udp::UdpBlaster`]; tests script their
//! own implementations.

pub mod udp;
mod wire;

use async_trait::async_trait;

use crate::error::TransportError;

/// Code class reported by the appliance for an infra-red capture.
pub const CODE_CLASS_IR: u8 = 0x26;
/// 433 MHz radio capture, rejected by the capture engine.
pub const CODE_CLASS_RF433: u8 = 0xb2;
/// 315 MHz radio capture, rejected by the capture engine.
pub const CODE_CLASS_RF315: u8 = 0xd7;

/// A control code read back from an appliance in learning mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCode {
    /// Signal family reported by the appliance (`CODE_CLASS_*`).
    pub code_class: u8,
    /// Opaque code blob, replayable through [`Blaster::send`].
    pub data: Vec<u8>,
}

/// Identity of an appliance that answered a discovery broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Appliance endpoint as host:port.
    pub udp_address: String,
    /// Colon-separated lowercase MAC address.
    pub mac_address: String,
    /// Vendor device-type code.
    pub device_type: u16,
}

impl DiscoveredDevice {
    /// Human-readable model name for the vendor type code, when known.
    pub fn model_name(&self) -> Option<&'static str> {
        model_name(self.device_type)
    }
}

/// The six-operation capability consumed from the hardware-protocol
/// layer. Network discovery is the seventh, a free function on the
/// implementation since it is not tied to one appliance.
#[async_trait]
pub trait Blaster: Send + Sync {
    /// Perform the vendor authentication handshake. Implementations
    /// treat re-authentication of a live session as a no-op.
    async fn authenticate(&self) -> Result<(), TransportError>;

    /// Put the appliance into remote-code learning mode.
    async fn start_capture(&self) -> Result<(), TransportError>;

    /// Poll for a learned code. `Ok(None)` means nothing captured yet.
    async fn poll_captured(&self) -> Result<Option<CapturedCode>, TransportError>;

    /// Replay a control code `repeat` extra times.
    async fn send(&self, code: &[u8], repeat: u8) -> Result<(), TransportError>;
}

/// Vendor model names for the device-type codes this tool targets.
pub fn model_name(device_type: u16) -> Option<&'static str> {
    match device_type {
        0x2712 => Some("RM2"),
        0x2737 => Some("RM Mini"),
        0x273d => Some("RM Pro Phicomm"),
        0x2783 => Some("RM2 Home Plus"),
        0x277c => Some("RM2 Home Plus GDT"),
        0x2787 => Some("RM2 Pro Plus2"),
        0x278b => Some("RM2 Pro Plus BL"),
        0x278f => Some("RM Mini Shate"),
        _ => None,
    }
}

/// Format a hardware address as colon-separated lowercase hex.
pub fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse a colon-separated MAC address.
pub fn parse_mac(s: &str) -> Result<[u8; 6], TransportError> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 6 {
        return Err(TransportError::InvalidMac(s.to_string()));
    }
    let mut mac = [0u8; 6];
    for (i, part) in parts.iter().enumerate() {
        mac[i] =
            u8::from_str_radix(part, 16).map_err(|_| TransportError::InvalidMac(s.to_string()))?;
    }
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_round_trip() {
        let mac = [0x00, 0x01, 0x02, 0xaa, 0xbb, 0xcc];
        let text = format_mac(&mac);
        assert_eq!(text, "00:01:02:aa:bb:cc");
        assert_eq!(parse_mac(&text).unwrap(), mac);
    }

    #[test]
    fn parse_mac_rejects_garbage() {
        assert!(parse_mac("00:01:02:aa:bb").is_err());
        assert!(parse_mac("00:01:02:aa:bb:zz").is_err());
        assert!(parse_mac("not a mac").is_err());
    }

    #[test]
    fn model_names_resolve() {
        assert_eq!(model_name(0x2737), Some("RM Mini"));
        assert_eq!(model_name(0x1234), None);
    }
}
