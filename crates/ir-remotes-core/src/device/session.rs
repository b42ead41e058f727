//! Live appliance sessions, separate from directory identity data.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OnceCell};

use super::Device;
use crate::error::TransportError;
use crate::transport::udp::UdpBlaster;
use crate::transport::Blaster;

type Connector = dyn Fn(&Device) -> Result<Arc<dyn Blaster>, TransportError> + Send + Sync;

/// Handle cache keyed by MAC address.
///
/// A handle is built lazily on first resolve and authenticated exactly
/// once for the process lifetime; concurrent first-use races collapse to
/// a single handshake, with every caller observing its result.
pub struct SessionTable {
    connect: Box<Connector>,
    sessions: Mutex<HashMap<String, Arc<OnceCell<Arc<dyn Blaster>>>>>,
}

impl SessionTable {
    /// Build a table around a handle constructor. The constructor parses
    /// identity data into transport form; it must not touch the network.
    pub fn new(
        connect: impl Fn(&Device) -> Result<Arc<dyn Blaster>, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            connect: Box::new(connect),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Table backed by the production UDP transport.
    pub fn with_udp(exchange_timeout: Duration) -> Self {
        Self::new(move |device: &Device| {
            let blaster = UdpBlaster::new(
                &device.udp_address,
                &device.mac_address,
                device.device_type,
                exchange_timeout,
            )?;
            Ok(Arc::new(blaster) as Arc<dyn Blaster>)
        })
    }

    /// Resolve the live handle for a record, authenticating on first
    /// use. Resolving an already-authenticated record is a no-op. A
    /// timeout elapsing during the handshake is an authentication
    /// failure, not retried.
    pub async fn resolve(
        &self,
        device: &Device,
        auth_timeout: Duration,
    ) -> Result<Arc<dyn Blaster>, TransportError> {
        let cell = {
            let mut sessions = self.sessions.lock().await;
            sessions
                .entry(device.mac_address.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        cell.get_or_try_init(|| async {
            let handle = (self.connect)(device)?;
            match tokio::time::timeout(auth_timeout, handle.authenticate()).await {
                Ok(Ok(())) => Ok(handle),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(TransportError::Auth {
                    address: device.udp_address.clone(),
                    message: format!("authentication timed out after {:?}", auth_timeout),
                }),
            }
        })
        .await
        .cloned()
    }
}
