//! In-memory transport for tests and development without hardware.
//!
//! A [`LoopbackPeripheral`] is a scripted GATT server: give it services and
//! characteristics, optionally arm a fault, then hand it to a
//! [`LoopbackTransport`]. Clones share state, so a test keeps one handle for
//! assertions while the transport owns another.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::error::BleError;
use crate::transport::{GattCharacteristic, GattService, Link, PeripheralIdentity, Transport};

/// One write observed by the peripheral-side handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub service: Uuid,
    pub characteristic: Uuid,
    pub payload: Vec<u8>,
}

#[derive(Debug, Default)]
struct Faults {
    connect: bool,
    discovery: bool,
    reject_write: bool,
    write: bool,
}

#[derive(Debug)]
struct Inner {
    identity: PeripheralIdentity,
    services: Vec<GattService>,
    writes: Vec<WriteRecord>,
    open_attempts: usize,
    link_dropped: bool,
    faults: Faults,
}

/// A scripted peripheral with a fixed GATT table.
#[derive(Debug, Clone)]
pub struct LoopbackPeripheral {
    inner: Arc<Mutex<Inner>>,
}

impl LoopbackPeripheral {
    pub fn new(name: &str, address: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                identity: PeripheralIdentity {
                    address: address.to_string(),
                    name: Some(name.to_string()),
                },
                services: Vec::new(),
                writes: Vec::new(),
                open_attempts: 0,
                link_dropped: false,
                faults: Faults::default(),
            })),
        }
    }

    /// Add a service with the given (characteristic UUID, property bitmask)
    /// entries.
    pub fn with_service(self, uuid: Uuid, characteristics: &[(Uuid, u8)]) -> Self {
        self.lock().services.push(GattService {
            uuid,
            characteristics: characteristics
                .iter()
                .map(|&(uuid, properties)| GattCharacteristic { uuid, properties })
                .collect(),
        });
        self
    }

    /// Refuse the next link attempt as if the peer were unreachable.
    pub fn with_connect_failure(self) -> Self {
        self.lock().faults.connect = true;
        self
    }

    /// Let the link come up but fail service discovery.
    pub fn with_discovery_failure(self) -> Self {
        self.lock().faults.discovery = true;
        self
    }

    /// Refuse write submissions locally, before anything reaches the peer.
    pub fn with_write_rejection(self) -> Self {
        self.lock().faults.reject_write = true;
        self
    }

    /// Accept write submissions but report completion failure.
    pub fn with_write_failure(self) -> Self {
        self.lock().faults.write = true;
        self
    }

    /// Drop the link from the peer side. Existing links report closed from
    /// here on.
    pub fn drop_link(&self) {
        self.lock().link_dropped = true;
    }

    pub fn identity(&self) -> PeripheralIdentity {
        self.lock().identity.clone()
    }

    /// Every write this peripheral has accepted, in order.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.lock().writes.clone()
    }

    /// How many times a link to this peripheral was attempted.
    pub fn open_attempts(&self) -> usize {
        self.lock().open_attempts
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("loopback peripheral state poisoned")
    }
}

/// Transport backed entirely by [`LoopbackPeripheral`]s.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    peripherals: Vec<LoopbackPeripheral>,
    permission_denied: bool,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_peripheral(mut self, peripheral: LoopbackPeripheral) -> Self {
        self.peripherals.push(peripheral);
        self
    }

    /// Make every platform call fail as if runtime permissions were revoked.
    pub fn with_permission_denied(mut self) -> Self {
        self.permission_denied = true;
        self
    }
}

impl Transport for LoopbackTransport {
    type Link = LoopbackLink;

    async fn paired_peripherals(&self) -> Result<Vec<PeripheralIdentity>, BleError> {
        if self.permission_denied {
            return Err(BleError::Permission("bluetooth permission revoked".into()));
        }
        Ok(self.peripherals.iter().map(|p| p.identity()).collect())
    }

    async fn open(&self, address: &str) -> Result<LoopbackLink, BleError> {
        if self.permission_denied {
            return Err(BleError::Permission("bluetooth permission revoked".into()));
        }
        let peripheral = self
            .peripherals
            .iter()
            .find(|p| p.identity().address.eq_ignore_ascii_case(address))
            .cloned()
            .ok_or(BleError::DeviceNotFound)?;

        {
            let mut inner = peripheral.lock();
            inner.open_attempts += 1;
            if inner.faults.connect {
                return Err(BleError::ConnectionFailed("peer unreachable".into()));
            }
        }

        Ok(LoopbackLink {
            peripheral,
            services: Vec::new(),
            open: true,
        })
    }
}

/// Live link to a [`LoopbackPeripheral`].
#[derive(Debug)]
pub struct LoopbackLink {
    peripheral: LoopbackPeripheral,
    services: Vec<GattService>,
    open: bool,
}

impl Link for LoopbackLink {
    async fn discover_services(&mut self) -> Result<(), BleError> {
        let inner = self.peripheral.lock();
        if inner.faults.discovery {
            return Err(BleError::DiscoveryFailed("discovery rejected by peer".into()));
        }
        self.services = inner.services.clone();
        Ok(())
    }

    fn services(&self) -> &[GattService] {
        &self.services
    }

    async fn is_open(&self) -> bool {
        self.open && !self.peripheral.lock().link_dropped
    }

    async fn write(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
        payload: &[u8],
    ) -> Result<(), BleError> {
        if !self.open {
            return Err(BleError::NotConnected);
        }
        let mut inner = self.peripheral.lock();
        if inner.link_dropped {
            return Err(BleError::WriteFailed("link lost".into()));
        }
        if inner.faults.reject_write {
            return Err(BleError::WriteRejected);
        }
        if inner.faults.write {
            return Err(BleError::WriteFailed("peer rejected write".into()));
        }
        inner.writes.push(WriteRecord {
            service,
            characteristic,
            payload: payload.to_vec(),
        });
        Ok(())
    }

    async fn close(&mut self) {
        self.open = false;
    }
}
