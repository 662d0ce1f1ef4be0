//! BLE GATT table for wearlink devices
//!
//! UUIDs are fixed at build time and must match the firmware's GATT server.
//! The current firmware exposes a single "system" service carrying the
//! text-input characteristic. Older firmware revisions additionally exposed
//! per-fixture services (LED, fan, heater); their UUIDs are kept here so
//! tooling can still address those units, but the app's write path only uses
//! the system service.

use uuid::Uuid;

/// System service, present on all firmware revisions
pub const SYSTEM_SERVICE_UUID: Uuid = Uuid::from_u128(0x00004000_0000_1000_8000_00805f9b34fb);

/// Text input characteristic (write, UTF-8 payload)
pub const TEXT_INPUT_UUID: Uuid = Uuid::from_u128(0x00004002_0000_1000_8000_00805f9b34fb);

/// LED service (pre-v2 firmware)
pub const LED_SERVICE_UUID: Uuid = Uuid::from_u128(0x00001000_0000_1000_8000_00805f9b34fb);

/// LED power characteristic (write, single byte)
pub const LED_POWER_UUID: Uuid = Uuid::from_u128(0x00001001_0000_1000_8000_00805f9b34fb);

/// Fan service (pre-v2 firmware)
pub const FAN_SERVICE_UUID: Uuid = Uuid::from_u128(0x00002000_0000_1000_8000_00805f9b34fb);

/// Fan power characteristic (write, single byte)
pub const FAN_POWER_UUID: Uuid = Uuid::from_u128(0x00002001_0000_1000_8000_00805f9b34fb);

/// Heater service (pre-v2 firmware)
pub const HEATER_SERVICE_UUID: Uuid = Uuid::from_u128(0x00003000_0000_1000_8000_00805f9b34fb);

/// Heater power characteristic (write, single byte)
pub const HEATER_POWER_UUID: Uuid = Uuid::from_u128(0x00003001_0000_1000_8000_00805f9b34fb);

/// A writable characteristic from the fixed GATT table, paired with its
/// owning service. There is no dynamic registration; everything the app can
/// write to is listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacteristicId {
    TextInput,
    LedPower,
    FanPower,
    HeaterPower,
}

impl CharacteristicId {
    /// The characteristic's own UUID.
    pub const fn uuid(self) -> Uuid {
        match self {
            CharacteristicId::TextInput => TEXT_INPUT_UUID,
            CharacteristicId::LedPower => LED_POWER_UUID,
            CharacteristicId::FanPower => FAN_POWER_UUID,
            CharacteristicId::HeaterPower => HEATER_POWER_UUID,
        }
    }

    /// UUID of the service this characteristic lives under.
    pub const fn service_uuid(self) -> Uuid {
        match self {
            CharacteristicId::TextInput => SYSTEM_SERVICE_UUID,
            CharacteristicId::LedPower => LED_SERVICE_UUID,
            CharacteristicId::FanPower => FAN_SERVICE_UUID,
            CharacteristicId::HeaterPower => HEATER_SERVICE_UUID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_lives_under_system_service() {
        assert_eq!(CharacteristicId::TextInput.uuid(), TEXT_INPUT_UUID);
        assert_eq!(
            CharacteristicId::TextInput.service_uuid(),
            SYSTEM_SERVICE_UUID
        );
    }

    #[test]
    fn table_has_no_duplicate_uuids() {
        let all = [
            CharacteristicId::TextInput,
            CharacteristicId::LedPower,
            CharacteristicId::FanPower,
            CharacteristicId::HeaterPower,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.uuid(), b.uuid());
            }
        }
    }
}
