//! Session events mirrored to the caller.

/// Terminal outcomes, delivered at most once per operation on the channel
/// handed out by [`Session::new`](crate::Session::new). A UI layer can drive
/// its whole display off this stream; headless callers can ignore it and use
/// the `Result` values instead.
///
/// `ServicesDiscovered` is always delivered before `ConnectionSuccess`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// GATT table of the connected peripheral is now known.
    ServicesDiscovered,
    /// Link is up and usable for writes.
    ConnectionSuccess { name: String },
    /// Connection attempt failed or the link was lost.
    ConnectionFailed { reason: String },
    /// Outcome of one write transaction.
    DataSent { success: bool, message: String },
}
