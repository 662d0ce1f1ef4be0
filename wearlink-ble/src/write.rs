//! Characteristic resolution for the write transaction.

use uuid::Uuid;

use crate::error::BleError;
use crate::transport::GattService;

/// Check that `characteristic` exists under `service` in the discovered
/// table. On a missing characteristic, dump what the peripheral actually
/// exposes under that service to the log before failing; firmware revisions
/// drift and the bitmask listing is the fastest way to spot it.
pub(crate) fn resolve(
    services: &[GattService],
    service: Uuid,
    characteristic: Uuid,
) -> Result<(), BleError> {
    let svc = services
        .iter()
        .find(|s| s.uuid == service)
        .ok_or(BleError::ServiceNotFound(service))?;

    if svc.characteristics.iter().any(|c| c.uuid == characteristic) {
        return Ok(());
    }

    tracing::error!(
        "characteristic {characteristic} not found under service {service}, peripheral exposes:"
    );
    for (uuid, properties) in present_characteristics(svc) {
        tracing::error!("  {uuid} properties 0x{properties:02x}");
    }

    Err(BleError::CharacteristicNotFound(characteristic))
}

/// Everything the peripheral exposes under one service, as (UUID, property
/// bitmask) pairs. Diagnostic only; not part of the write contract.
pub(crate) fn present_characteristics(service: &GattService) -> Vec<(Uuid, u8)> {
    service
        .characteristics
        .iter()
        .map(|c| (c.uuid, c.properties))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::GattCharacteristic;

    fn table() -> Vec<GattService> {
        vec![GattService {
            uuid: wearlink_proto::ble::SYSTEM_SERVICE_UUID,
            characteristics: vec![
                GattCharacteristic {
                    uuid: Uuid::from_u128(0xdead),
                    properties: 0x02,
                },
                GattCharacteristic {
                    uuid: Uuid::from_u128(0xbeef),
                    properties: 0x08,
                },
            ],
        }]
    }

    #[test]
    fn missing_service_is_reported_first() {
        let err = resolve(
            &table(),
            wearlink_proto::ble::LED_SERVICE_UUID,
            wearlink_proto::ble::LED_POWER_UUID,
        )
        .unwrap_err();
        assert!(matches!(err, BleError::ServiceNotFound(_)));
    }

    #[test]
    fn missing_characteristic_is_reported() {
        let err = resolve(
            &table(),
            wearlink_proto::ble::SYSTEM_SERVICE_UUID,
            wearlink_proto::ble::TEXT_INPUT_UUID,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "characteristic not found ({})",
                wearlink_proto::ble::TEXT_INPUT_UUID
            )
        );
    }

    #[test]
    fn diagnostic_listing_covers_every_characteristic() {
        let services = table();
        let listed = present_characteristics(&services[0]);
        assert_eq!(
            listed,
            vec![
                (Uuid::from_u128(0xdead), 0x02),
                (Uuid::from_u128(0xbeef), 0x08),
            ]
        );
    }
}
