//! Device directory: the ordered collection of known appliances.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::Device;
use crate::error::DirectoryError;
use crate::transport::DiscoveredDevice;

/// Ordered collection of appliance records, at most one per MAC address.
///
/// The serde form is a bare JSON array, matching the devices file on
/// disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceDirectory {
    devices: Vec<Device>,
}

impl DeviceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    ///
    /// A record whose MAC matches an existing entry replaces it in
    /// place; re-assigning a device's name is legitimate. A record whose
    /// name matches an existing entry with a different MAC is rejected:
    /// names are not identity keys once a MAC is registered under them.
    pub fn upsert(&mut self, device: Device) -> Result<(), DirectoryError> {
        for (idx, existing) in self.devices.iter().enumerate() {
            if existing.mac_address == device.mac_address {
                self.devices[idx] = device;
                return Ok(());
            }
            if existing.name == device.name {
                return Err(DirectoryError::NamingConflict {
                    name: device.name.clone(),
                    existing: existing.mac_address.clone(),
                    new: device.mac_address.clone(),
                });
            }
        }
        self.devices.push(device);
        Ok(())
    }

    /// Linear scan, first match wins.
    pub fn find(&self, predicate: impl Fn(&Device) -> bool) -> Option<&Device> {
        self.devices.iter().find(|d| predicate(d))
    }

    pub fn by_name(&self, name: &str) -> Option<&Device> {
        self.find(|d| d.name == name)
    }

    pub fn by_mac(&self, mac: &str) -> Option<&Device> {
        self.find(|d| d.mac_address == mac)
    }

    /// The default dispatch target: the first configured record.
    pub fn first(&self) -> Option<&Device> {
        self.devices.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Merge a discovery batch into the directory.
    ///
    /// Rediscovered MACs are logged and skipped rather than refreshed,
    /// so a user-assigned name survives rediscovery; renaming is a
    /// direct edit, not a rediscovery. New identities are named through
    /// `name_for`; returning `None` skips the appliance. Returns the
    /// number of records added.
    pub fn merge_discovered(
        &mut self,
        discovered: &[DiscoveredDevice],
        mut name_for: impl FnMut(&DiscoveredDevice) -> Option<String>,
    ) -> usize {
        let mut added = 0;

        for item in discovered {
            if let Some(existing) = self.by_mac(&item.mac_address) {
                info!(
                    mac = %existing.mac_address,
                    name = %existing.name,
                    "device already exists in directory, skipping"
                );
                continue;
            }

            let Some(name) = name_for(item) else {
                info!(mac = %item.mac_address, "no name assigned, skipping device");
                continue;
            };

            match self.upsert(Device::from_discovered(&name, item)) {
                Ok(()) => added += 1,
                Err(e) => {
                    warn!(mac = %item.mac_address, error = %e, "failed to store device");
                }
            }
        }

        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, mac: &str) -> Device {
        Device {
            name: name.to_string(),
            udp_address: "1.1.1.1:80".to_string(),
            mac_address: mac.to_string(),
            device_type: 0x2712,
            type_name: Some("RM2".to_string()),
        }
    }

    #[test]
    fn upsert_replaces_on_matching_mac() {
        let mut dir = DeviceDirectory::new();
        dir.upsert(device("foo", "00:01:02:03:04:05")).unwrap();
        assert_eq!(dir.len(), 1);

        // Same MAC, new name: record is replaced in place.
        dir.upsert(device("bar", "00:01:02:03:04:05")).unwrap();
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.devices()[0].name, "bar");
    }

    #[test]
    fn upsert_rejects_name_collision_across_macs() {
        let mut dir = DeviceDirectory::new();
        dir.upsert(device("bar", "00:01:02:03:04:05")).unwrap();
        dir.upsert(device("boo", "05:04:03:02:01:00")).unwrap();
        assert_eq!(dir.len(), 2);

        let err = dir
            .upsert(device("bar", "ff:ee:dd:cc:bb:aa"))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NamingConflict { .. }));
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.by_name("bar").unwrap().mac_address, "00:01:02:03:04:05");
    }

    #[test]
    fn find_first_match_wins() {
        let mut dir = DeviceDirectory::new();
        dir.upsert(device("foo", "00:01:02:03:04:05")).unwrap();
        dir.upsert(device("boo", "05:04:03:02:01:00")).unwrap();

        assert_eq!(dir.by_name("boo").unwrap().mac_address, "05:04:03:02:01:00");
        assert_eq!(dir.by_mac("00:01:02:03:04:05").unwrap().name, "foo");
        assert!(dir.by_name("missing").is_none());
        assert_eq!(dir.first().unwrap().name, "foo");
    }

    #[test]
    fn merge_skips_known_macs_without_refreshing() {
        let mut dir = DeviceDirectory::new();
        dir.upsert(device("livingroom", "00:01:02:03:04:05"))
            .unwrap();

        let rediscovered = DiscoveredDevice {
            udp_address: "10.0.0.9:80".to_string(),
            mac_address: "00:01:02:03:04:05".to_string(),
            device_type: 0x2737,
        };
        let fresh = DiscoveredDevice {
            udp_address: "10.0.0.10:80".to_string(),
            mac_address: "05:04:03:02:01:00".to_string(),
            device_type: 0x2737,
        };

        let added = dir.merge_discovered(&[rediscovered, fresh], |_| Some("bedroom".to_string()));

        assert_eq!(added, 1);
        assert_eq!(dir.len(), 2);
        // The known record keeps its original endpoint and name.
        let known = dir.by_mac("00:01:02:03:04:05").unwrap();
        assert_eq!(known.name, "livingroom");
        assert_eq!(known.udp_address, "1.1.1.1:80");
    }

    #[test]
    fn merge_skips_unnamed_devices() {
        let mut dir = DeviceDirectory::new();
        let fresh = DiscoveredDevice {
            udp_address: "10.0.0.10:80".to_string(),
            mac_address: "05:04:03:02:01:00".to_string(),
            device_type: 0x2737,
        };

        let added = dir.merge_discovered(&[fresh], |_| None);
        assert_eq!(added, 0);
        assert!(dir.is_empty());
    }

    #[test]
    fn serde_is_a_bare_array() {
        let mut dir = DeviceDirectory::new();
        dir.upsert(device("foo", "00:01:02:03:04:05")).unwrap();

        let value = serde_json::to_value(&dir).unwrap();
        assert!(value.is_array());

        let back: DeviceDirectory = serde_json::from_value(value).unwrap();
        assert_eq!(back, dir);
    }
}
