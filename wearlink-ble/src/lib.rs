//! BLE client core for wearlink devices
//!
//! Owns a single GATT session to one peripheral and delivers UTF-8 text/byte
//! payloads to characteristics from the fixed table in `wearlink-proto`.
//! Every operation resolves to exactly one outcome: a `Result` on the call
//! itself, mirrored once as a [`SessionEvent`] for UI layers that want a
//! callback-shaped surface.
//!
//! Backends plug in through the [`Transport`]/[`Link`] traits: `platform`
//! drives real hardware via btleplug, `loopback` is an in-memory peripheral
//! for tests and development.

pub mod error;
pub mod event;
pub mod loopback;
pub mod platform;
pub mod session;
pub mod transport;
mod write;

pub use error::{BleError, ErrorKind};
pub use event::SessionEvent;
pub use session::{Session, SessionState};
pub use transport::{GattCharacteristic, GattService, Link, PeripheralIdentity, Transport};
pub use wearlink_proto::CharacteristicId;
