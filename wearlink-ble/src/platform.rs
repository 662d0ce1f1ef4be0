//! btleplug-backed transport for real hardware.

use btleplug::api::{Central, Manager as _, Peripheral as _, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use uuid::Uuid;

use crate::error::BleError;
use crate::transport::{GattCharacteristic, GattService, Link, PeripheralIdentity, Transport};

fn map_err(e: btleplug::Error) -> BleError {
    match e {
        btleplug::Error::PermissionDenied => {
            BleError::Permission("bluetooth permission denied".to_string())
        }
        btleplug::Error::DeviceNotFound => BleError::DeviceNotFound,
        other => BleError::ConnectionFailed(other.to_string()),
    }
}

/// Transport over the first Bluetooth adapter on the host.
pub struct BtleTransport {
    adapter: Adapter,
}

impl BtleTransport {
    pub async fn new() -> Result<Self, BleError> {
        let manager = Manager::new().await.map_err(map_err)?;
        let adapters = manager.adapters().await.map_err(map_err)?;
        let adapter = adapters
            .into_iter()
            .next()
            .ok_or_else(|| BleError::ConnectionFailed("no bluetooth adapter found".to_string()))?;
        Ok(Self { adapter })
    }

    async fn find_peripheral(&self, address: &str) -> Result<Option<Peripheral>, BleError> {
        let peripherals = self.adapter.peripherals().await.map_err(map_err)?;
        Ok(peripherals
            .into_iter()
            .find(|p| p.address().to_string().eq_ignore_ascii_case(address)))
    }
}

impl Transport for BtleTransport {
    type Link = BtleLink;

    async fn paired_peripherals(&self) -> Result<Vec<PeripheralIdentity>, BleError> {
        let peripherals = self.adapter.peripherals().await.map_err(map_err)?;
        let mut identities = Vec::with_capacity(peripherals.len());
        for peripheral in peripherals {
            let name = match peripheral.properties().await {
                Ok(Some(props)) => props.local_name,
                _ => None,
            };
            identities.push(PeripheralIdentity {
                address: peripheral.address().to_string(),
                name,
            });
        }
        Ok(identities)
    }

    async fn open(&self, address: &str) -> Result<BtleLink, BleError> {
        let peripheral = self
            .find_peripheral(address)
            .await?
            .ok_or(BleError::DeviceNotFound)?;
        peripheral.connect().await.map_err(map_err)?;
        Ok(BtleLink {
            peripheral,
            services: Vec::new(),
        })
    }
}

/// Live btleplug link, with the discovered GATT table cached so resolution
/// can run without further platform calls.
pub struct BtleLink {
    peripheral: Peripheral,
    services: Vec<GattService>,
}

impl Link for BtleLink {
    async fn discover_services(&mut self) -> Result<(), BleError> {
        self.peripheral
            .discover_services()
            .await
            .map_err(|e| BleError::DiscoveryFailed(e.to_string()))?;
        self.services = self
            .peripheral
            .services()
            .into_iter()
            .map(|s| GattService {
                uuid: s.uuid,
                characteristics: s
                    .characteristics
                    .into_iter()
                    .map(|c| GattCharacteristic {
                        uuid: c.uuid,
                        properties: c.properties.bits(),
                    })
                    .collect(),
            })
            .collect();
        Ok(())
    }

    fn services(&self) -> &[GattService] {
        &self.services
    }

    async fn is_open(&self) -> bool {
        self.peripheral.is_connected().await.unwrap_or(false)
    }

    async fn write(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
        payload: &[u8],
    ) -> Result<(), BleError> {
        let target = self
            .peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == characteristic && c.service_uuid == service)
            .ok_or(BleError::CharacteristicNotFound(characteristic))?;

        // WithResponse is the acknowledged write mode, matching the firmware's
        // expectation for the text-input characteristic. NotConnected is the
        // stack refusing the submission locally; anything else is a failed
        // completion.
        self.peripheral
            .write(&target, payload, WriteType::WithResponse)
            .await
            .map_err(|e| match e {
                btleplug::Error::NotConnected => BleError::WriteRejected,
                other => BleError::WriteFailed(other.to_string()),
            })
    }

    async fn close(&mut self) {
        if let Err(e) = self.peripheral.disconnect().await {
            tracing::warn!("disconnect failed: {e}");
        }
    }
}
