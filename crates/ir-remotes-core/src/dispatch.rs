//! Remote/command/device resolution and single-shot hardware dispatch.

use std::time::Duration;

use tracing::info;

use crate::device::{DeviceDirectory, SessionTable};
use crate::error::DispatchError;
use crate::remote::RemoteList;

/// Repeat count for every dispatched send.
pub const SEND_REPEAT_COUNT: u8 = 1;

/// Resolve a (remote, command, device) triple and issue exactly one send.
///
/// Resolution order: remote by name, command within that remote, then
/// the target device (the first configured record unless `device`
/// names one explicitly). All lookups complete before any hardware
/// interaction. A send failure is reported with the transport error
/// text, never retried.
pub async fn dispatch(
    directory: &DeviceDirectory,
    remotes: &RemoteList,
    sessions: &SessionTable,
    remote: &str,
    command: &str,
    device: Option<&str>,
    udp_timeout: Duration,
) -> Result<(), DispatchError> {
    let remote = remotes
        .find(remote)
        .ok_or_else(|| DispatchError::RemoteNotFound(remote.to_string()))?;

    let code = remote
        .commands
        .get(command)
        .ok_or_else(|| DispatchError::CommandNotFound {
            remote: remote.name.clone(),
            command: command.to_string(),
        })?;

    let target = match device {
        Some(name) => directory
            .by_name(name)
            .ok_or_else(|| DispatchError::DeviceNotFound(name.to_string()))?,
        None => directory.first().ok_or(DispatchError::NoDevices)?,
    };

    let handle = sessions
        .resolve(target, udp_timeout)
        .await
        .map_err(|source| DispatchError::Auth {
            device: target.name.clone(),
            source,
        })?;

    handle
        .send(code.as_bytes(), SEND_REPEAT_COUNT)
        .await
        .map_err(DispatchError::Send)?;

    info!(
        remote = %remote.name,
        command = %command,
        device = %target.name,
        "IR command dispatched"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::command::IrCommand;
    use crate::device::Device;
    use crate::error::TransportError;
    use crate::transport::{Blaster, CapturedCode};

    #[derive(Default)]
    struct RecordingBlaster {
        sends: AtomicUsize,
        last: Mutex<Option<(Vec<u8>, u8)>>,
    }

    #[async_trait]
    impl Blaster for RecordingBlaster {
        async fn authenticate(&self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn start_capture(&self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn poll_captured(&self) -> Result<Option<CapturedCode>, TransportError> {
            Ok(None)
        }

        async fn send(&self, code: &[u8], repeat: u8) -> Result<(), TransportError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((code.to_vec(), repeat));
            Ok(())
        }
    }

    fn fixture() -> (DeviceDirectory, RemoteList, Arc<RecordingBlaster>, SessionTable) {
        let mut directory = DeviceDirectory::new();
        directory
            .upsert(Device {
                name: "livingroom".to_string(),
                udp_address: "1.1.1.1:80".to_string(),
                mac_address: "00:01:02:03:04:05".to_string(),
                device_type: 0x2712,
                type_name: None,
            })
            .unwrap();
        directory
            .upsert(Device {
                name: "bedroom".to_string(),
                udp_address: "1.1.1.2:80".to_string(),
                mac_address: "05:04:03:02:01:00".to_string(),
                device_type: 0x2712,
                type_name: None,
            })
            .unwrap();

        let mut remotes = RemoteList::new();
        remotes
            .find_or_create("amp")
            .commands
            .insert("power", IrCommand::new(vec![0x26, 0x00, 0x0a]))
            .unwrap();

        let blaster = Arc::new(RecordingBlaster::default());
        let shared = blaster.clone();
        let sessions = SessionTable::new(move |_| Ok(shared.clone() as Arc<dyn Blaster>));

        (directory, remotes, blaster, sessions)
    }

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn sends_once_with_fixed_repeat() {
        let (directory, remotes, blaster, sessions) = fixture();

        dispatch(
            &directory, &remotes, &sessions, "amp", "power", None, TIMEOUT,
        )
        .await
        .unwrap();

        assert_eq!(blaster.sends.load(Ordering::SeqCst), 1);
        let (code, repeat) = blaster.last.lock().unwrap().clone().unwrap();
        assert_eq!(code, vec![0x26, 0x00, 0x0a]);
        assert_eq!(repeat, SEND_REPEAT_COUNT);
    }

    #[tokio::test]
    async fn missing_remote_sends_nothing() {
        let (directory, remotes, blaster, sessions) = fixture();

        let err = dispatch(
            &directory, &remotes, &sessions, "missing", "x", None, TIMEOUT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DispatchError::RemoteNotFound(_)));
        assert!(err.is_not_found());
        assert_eq!(blaster.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_command_sends_nothing() {
        let (directory, remotes, blaster, sessions) = fixture();

        let err = dispatch(
            &directory, &remotes, &sessions, "amp", "volume", None, TIMEOUT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DispatchError::CommandNotFound { .. }));
        assert_eq!(blaster.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn explicit_device_selector_must_resolve() {
        let (directory, remotes, blaster, sessions) = fixture();

        let err = dispatch(
            &directory,
            &remotes,
            &sessions,
            "amp",
            "power",
            Some("garage"),
            TIMEOUT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DispatchError::DeviceNotFound(_)));
        assert_eq!(blaster.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_directory_is_a_lookup_miss() {
        let (_, remotes, blaster, sessions) = fixture();
        let directory = DeviceDirectory::new();

        let err = dispatch(
            &directory, &remotes, &sessions, "amp", "power", None, TIMEOUT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DispatchError::NoDevices));
        assert_eq!(blaster.sends.load(Ordering::SeqCst), 0);
    }
}
