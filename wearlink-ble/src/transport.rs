//! Transport abstraction over the host Bluetooth stack.
//!
//! The session logic never talks to btleplug directly; it goes through these
//! traits so the same code runs against real hardware (`platform`) and the
//! in-memory peripheral (`loopback`).

use uuid::Uuid;

use crate::error::BleError;

/// A previously-paired peripheral as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeripheralIdentity {
    /// Opaque platform address, e.g. "AA:BB:CC:DD:EE:FF".
    pub address: String,
    /// Advertised name, if the platform knows one.
    pub name: Option<String>,
}

impl PeripheralIdentity {
    /// Display name, falling back to the address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }
}

/// One characteristic in a discovered GATT table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GattCharacteristic {
    pub uuid: Uuid,
    /// Raw property bitmask as reported by the stack (read/write/notify bits).
    pub properties: u8,
}

/// One service in a discovered GATT table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GattService {
    pub uuid: Uuid,
    pub characteristics: Vec<GattCharacteristic>,
}

/// An established link to one peripheral.
#[allow(async_fn_in_trait)]
pub trait Link {
    /// Walk the peripheral's GATT table. Must be called once after the link
    /// comes up, before any write.
    async fn discover_services(&mut self) -> Result<(), BleError>;

    /// The discovered table; empty until [`Link::discover_services`] succeeds.
    fn services(&self) -> &[GattService];

    /// Whether the link is still up according to the platform stack. A
    /// peer-initiated drop flips this to false.
    async fn is_open(&self) -> bool;

    /// Submit one acknowledged write and await its completion.
    async fn write(
        &mut self,
        service: Uuid,
        characteristic: Uuid,
        payload: &[u8],
    ) -> Result<(), BleError>;

    /// Release the link. Infallible by contract; backends swallow and log
    /// teardown errors.
    async fn close(&mut self);
}

/// Factory for links, plus access to the platform's paired-device list.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Link: Link;

    /// Enumerate previously-bonded peripherals known to the platform.
    async fn paired_peripherals(&self) -> Result<Vec<PeripheralIdentity>, BleError>;

    /// Open a link to the peripheral at `address`.
    async fn open(&self, address: &str) -> Result<Self::Link, BleError>;
}
