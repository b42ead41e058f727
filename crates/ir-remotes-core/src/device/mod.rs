//! Appliance identity records and the device directory.

pub mod directory;
pub mod session;

use serde::{Deserialize, Serialize};

use crate::transport::DiscoveredDevice;

pub use directory::DeviceDirectory;
pub use session::SessionTable;

/// Identity record for one physical appliance.
///
/// Pure data: the live, authenticated handle lives in the
/// [`SessionTable`], keyed by MAC address. The MAC is the true identity
/// key; the name is user-assigned and only checked for collisions at
/// insert time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub name: String,
    pub udp_address: String,
    pub mac_address: String,
    #[serde(rename = "type")]
    pub device_type: u16,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_name: Option<String>,
}

impl Device {
    /// Build a record for a discovered appliance under a user-assigned
    /// name, resolving the model name from the vendor type code.
    pub fn from_discovered(name: &str, discovered: &DiscoveredDevice) -> Self {
        Self {
            name: name.to_string(),
            udp_address: discovered.udp_address.clone(),
            mac_address: discovered.mac_address.clone(),
            device_type: discovered.device_type,
            type_name: discovered.model_name().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovered() -> DiscoveredDevice {
        DiscoveredDevice {
            udp_address: "192.168.1.20:80".to_string(),
            mac_address: "00:01:02:03:04:05".to_string(),
            device_type: 0x2737,
        }
    }

    #[test]
    fn builds_record_from_discovery() {
        let dev = Device::from_discovered("livingroom", &discovered());
        assert_eq!(dev.name, "livingroom");
        assert_eq!(dev.mac_address, "00:01:02:03:04:05");
        assert_eq!(dev.type_name.as_deref(), Some("RM Mini"));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let dev = Device::from_discovered("livingroom", &discovered());
        let value = serde_json::to_value(&dev).unwrap();
        assert_eq!(value["udpAddress"], "192.168.1.20:80");
        assert_eq!(value["macAddress"], "00:01:02:03:04:05");
        assert_eq!(value["type"], 0x2737);
        assert_eq!(value["typeName"], "RM Mini");
    }

    #[test]
    fn type_name_is_optional() {
        let mut dev = Device::from_discovered("x", &discovered());
        dev.type_name = None;
        let value = serde_json::to_value(&dev).unwrap();
        assert!(value.get("typeName").is_none());

        let back: Device = serde_json::from_value(value).unwrap();
        assert_eq!(back, dev);
    }
}
