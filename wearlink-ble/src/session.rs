//! Connection session lifecycle and the write transaction entry point.

use tokio::sync::mpsc;
use wearlink_proto::CharacteristicId;

use crate::error::BleError;
use crate::event::SessionEvent;
use crate::transport::{Link, PeripheralIdentity, Transport};
use crate::write;

/// Where the session is in its lifecycle.
///
/// ```text
/// Idle --connect()--> Connecting --link up--> Connected
///     Connected --discovery ok--> ServicesDiscovered
/// Connecting --link error--> Disconnected
/// any --disconnect()--> Idle
/// ```
///
/// Discovery failure leaves the session at `Connected`: the link is alive but
/// useless for writes, and callers should treat it like a connection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Connected,
    ServicesDiscovered,
    Disconnected,
}

/// One BLE session to one peripheral.
///
/// The session owns its link outright. A second `connect()` while a link is
/// live is rejected instead of silently replacing the handle; call
/// [`Session::disconnect`] first. `write` takes `&mut self`, so writes cannot
/// overlap and every call gets its own completion.
pub struct Session<T: Transport> {
    transport: T,
    link: Option<T::Link>,
    state: SessionState,
    device_name: Option<String>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl<T: Transport> Session<T> {
    /// Create a session over `transport`, returning the event stream that
    /// mirrors every terminal outcome.
    pub fn new(transport: T) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                transport,
                link: None,
                state: SessionState::Idle,
                device_name: None,
                events,
            },
            rx,
        )
    }

    /// Previously-paired peripherals known to the platform.
    ///
    /// Degrades to an empty list on any platform error, permission denial
    /// included. Deliberate policy: the paired-device picker never faults.
    pub async fn paired_peripherals(&self) -> Vec<PeripheralIdentity> {
        match self.transport.paired_peripherals().await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("paired-device enumeration failed: {e}");
                Vec::new()
            }
        }
    }

    /// Connect to the paired peripheral at `address`, discover its services,
    /// and return the device name.
    ///
    /// Emits `ServicesDiscovered` then `ConnectionSuccess` on the event
    /// stream; any failure emits one `ConnectionFailed` instead. An address
    /// absent from the paired set fails with [`BleError::DeviceNotFound`]
    /// before any link attempt reaches the platform.
    pub async fn connect(&mut self, address: &str) -> Result<String, BleError> {
        if self.link.is_some() {
            let err = BleError::AlreadyConnected;
            self.emit(SessionEvent::ConnectionFailed {
                reason: err.to_string(),
            });
            return Err(err);
        }

        match self.connect_inner(address).await {
            Ok(name) => {
                self.emit(SessionEvent::ServicesDiscovered);
                self.emit(SessionEvent::ConnectionSuccess { name: name.clone() });
                Ok(name)
            }
            Err(err) => {
                self.emit(SessionEvent::ConnectionFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn connect_inner(&mut self, address: &str) -> Result<String, BleError> {
        let identity = self
            .transport
            .paired_peripherals()
            .await?
            .into_iter()
            .find(|p| p.address.eq_ignore_ascii_case(address))
            .ok_or(BleError::DeviceNotFound)?;

        self.state = SessionState::Connecting;
        tracing::debug!("connecting to {} ({address})", identity.display_name());

        let mut link = match self.transport.open(address).await {
            Ok(link) => link,
            Err(e) => {
                self.state = SessionState::Disconnected;
                return Err(e);
            }
        };
        self.state = SessionState::Connected;

        // Discovery is automatic and unconditional once the link is up. On
        // failure the link is kept but the session stays at Connected, so
        // every write fails the ServicesDiscovered precondition.
        if let Err(e) = link.discover_services().await {
            self.link = Some(link);
            return Err(e);
        }

        self.state = SessionState::ServicesDiscovered;
        let name = identity.display_name().to_string();
        self.device_name = Some(name.clone());
        tracing::debug!("connected to {name}, services discovered");
        Ok(name)
    }

    /// Deliver `payload` to `characteristic` as one acknowledged write.
    ///
    /// Exactly one outcome per call: the returned `Result`, mirrored as one
    /// `DataSent` event. Requires the session to be at `ServicesDiscovered`;
    /// anything else fails with [`BleError::NotConnected`] synchronously,
    /// before any platform call.
    pub async fn write(
        &mut self,
        payload: &[u8],
        characteristic: CharacteristicId,
    ) -> Result<(), BleError> {
        let outcome = self.write_inner(payload, characteristic).await;
        match &outcome {
            Ok(()) => self.emit(SessionEvent::DataSent {
                success: true,
                message: "write succeeded".to_string(),
            }),
            Err(e) => self.emit(SessionEvent::DataSent {
                success: false,
                message: e.to_string(),
            }),
        }
        outcome
    }

    async fn write_inner(
        &mut self,
        payload: &[u8],
        characteristic: CharacteristicId,
    ) -> Result<(), BleError> {
        if self.state != SessionState::ServicesDiscovered {
            return Err(BleError::NotConnected);
        }
        if !self.check_link().await {
            return Err(BleError::NotConnected);
        }
        let link = self.link.as_mut().ok_or(BleError::NotConnected)?;

        let service = characteristic.service_uuid();
        write::resolve(link.services(), service, characteristic.uuid())?;

        link.write(service, characteristic.uuid(), payload).await
    }

    /// Whether the link is still up, reaping it if the peer dropped it.
    ///
    /// There is no background watcher; link loss is detected here and at the
    /// start of every write. On a dropped link the session releases the
    /// handle, moves to `Disconnected`, and emits one `ConnectionFailed`.
    /// No auto-retry.
    pub async fn check_link(&mut self) -> bool {
        let Some(link) = self.link.as_ref() else {
            return false;
        };
        if link.is_open().await {
            return true;
        }
        self.link = None;
        self.device_name = None;
        self.state = SessionState::Disconnected;
        self.emit(SessionEvent::ConnectionFailed {
            reason: "device disconnected".to_string(),
        });
        false
    }

    /// Tear down the link. Idempotent; safe to call when already disconnected.
    pub async fn disconnect(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.close().await;
        }
        self.device_name = None;
        self.state = SessionState::Idle;
    }

    /// Whether a live link handle exists. True even when discovery failed and
    /// the session is unusable for writes.
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Name of the connected peripheral, once discovery has completed.
    pub fn connected_device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    fn emit(&self, event: SessionEvent) {
        // Receiver may be gone; the Result surface still reports the outcome.
        let _ = self.events.send(event);
    }
}
