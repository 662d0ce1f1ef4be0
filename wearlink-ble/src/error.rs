//! Error types for the BLE core.
//!
//! Variants stay distinct so callers can build retry logic on top of
//! [`BleError::kind`]; the event surface collapses everything to a success
//! flag plus the `Display` message.

use uuid::Uuid;

/// Coarse error taxonomy, stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller lacks a runtime permission the platform stack requires.
    Permission,
    /// Session precondition violated (no live link, or one already exists).
    Session,
    /// Target service or characteristic absent from the peripheral's GATT table.
    Resolution,
    /// Link-level failure: peer unreachable, link drop, write rejected or failed.
    Transport,
}

#[derive(Debug, thiserror::Error)]
pub enum BleError {
    #[error("permission error: {0}")]
    Permission(String),

    #[error("not connected")]
    NotConnected,

    #[error("already connected, disconnect first")]
    AlreadyConnected,

    #[error("device not found")]
    DeviceNotFound,

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("service discovery failed: {0}")]
    DiscoveryFailed(String),

    #[error("service not found ({0})")]
    ServiceNotFound(Uuid),

    #[error("characteristic not found ({0})")]
    CharacteristicNotFound(Uuid),

    /// The stack refused the write submission locally (link busy).
    #[error("write request failed")]
    WriteRejected,

    /// The write was submitted but the completion reported failure.
    #[error("write failed: {0}")]
    WriteFailed(String),
}

impl BleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BleError::Permission(_) => ErrorKind::Permission,
            BleError::NotConnected | BleError::AlreadyConnected => ErrorKind::Session,
            BleError::ServiceNotFound(_) | BleError::CharacteristicNotFound(_) => {
                ErrorKind::Resolution
            }
            BleError::DeviceNotFound
            | BleError::ConnectionFailed(_)
            | BleError::DiscoveryFailed(_)
            | BleError::WriteRejected
            | BleError::WriteFailed(_) => ErrorKind::Transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_outcome_contract() {
        assert_eq!(BleError::NotConnected.to_string(), "not connected");
        assert_eq!(BleError::DeviceNotFound.to_string(), "device not found");
        assert_eq!(BleError::WriteRejected.to_string(), "write request failed");
    }

    #[test]
    fn kinds_cover_taxonomy() {
        assert_eq!(
            BleError::Permission("revoked".into()).kind(),
            ErrorKind::Permission
        );
        assert_eq!(BleError::NotConnected.kind(), ErrorKind::Session);
        assert_eq!(
            BleError::ServiceNotFound(uuid::Uuid::nil()).kind(),
            ErrorKind::Resolution
        );
        assert_eq!(
            BleError::WriteFailed("gatt error 133".into()).kind(),
            ErrorKind::Transport
        );
    }
}
