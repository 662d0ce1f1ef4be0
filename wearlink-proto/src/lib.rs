//! wearlink protocol constants
//!
//! The GATT table exposed by wearlink firmware, shared between the mobile
//! controller and tooling.

pub mod ble;

pub use ble::CharacteristicId;
