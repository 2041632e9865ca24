//! Error types for stackwm.
//!
//! Every error in this crate is fatal: it is logged once by the binary and the
//! process exits with status 1. Transient absence of a window, an unmatched key
//! press or a failed application launch are not errors and never reach this
//! module.
//!
//! # Error Categories
//!
//! - **Initialization errors**: the display cannot be opened, or another window
//!   manager already owns substructure redirection on the root window
//! - **Connection errors**: the display connection broke while running
//! - **Protocol errors**: the server rejected one of our requests

use std::fmt;

use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};

/// Result type alias for window manager operations.
pub type WmResult<T> = Result<T, WmError>;

/// Errors that terminate the window manager.
#[derive(Debug, Error)]
pub enum WmError {
    /// The display connection could not be opened.
    #[error("failed to open the display: {0}")]
    Connect(#[from] ConnectError),

    /// The display connection failed after it was established.
    #[error("display connection failed: {0}")]
    Connection(#[from] ConnectionError),

    /// Selecting substructure redirection on the root window was refused.
    #[error("another window manager is already running")]
    AnotherWmRunning,

    /// The display server reported an error for one of our requests.
    #[error("XError: {0}")]
    Protocol(ProtocolError),
}

impl WmError {
    /// Returns `true` if the server rejected a request, as opposed to the
    /// connection itself failing.
    #[must_use]
    pub const fn is_protocol(&self) -> bool { matches!(self, Self::Protocol(_)) }

    /// Returns `true` if this error happened before the event loop started.
    #[must_use]
    pub const fn is_startup(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::AnotherWmRunning)
    }
}

impl From<ReplyError> for WmError {
    fn from(err: ReplyError) -> Self {
        match err {
            ReplyError::ConnectionError(err) => Self::Connection(err),
            ReplyError::X11Error(err) => Self::Protocol(ProtocolError::from(&err)),
        }
    }
}

impl From<ProtocolError> for WmError {
    fn from(err: ProtocolError) -> Self { Self::Protocol(err) }
}

/// An error reported by the display server.
///
/// X11 delivers these asynchronously, after the request that caused them has
/// long been sent. The fields identify the failing request well enough to make
/// the log line useful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    /// The raw error code.
    pub code: u8,
    /// Human-readable name of the error kind (e.g. `Window`, `Match`).
    pub kind: String,
    /// Major opcode of the failed request.
    pub major_opcode: u8,
    /// Minor opcode of the failed request (zero for core requests).
    pub minor_opcode: u16,
    /// The offending resource id or value.
    pub bad_value: u32,
    /// Sequence number of the failed request.
    pub sequence: u16,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (code {}) in request {}.{} on value {:#x}, sequence {}",
            self.kind,
            self.code,
            self.major_opcode,
            self.minor_opcode,
            self.bad_value,
            self.sequence
        )
    }
}

impl From<&x11rb::x11_utils::X11Error> for ProtocolError {
    fn from(err: &x11rb::x11_utils::X11Error) -> Self {
        Self {
            code: err.error_code,
            kind: format!("{:?}", err.error_kind),
            major_opcode: err.major_opcode,
            minor_opcode: err.minor_opcode,
            bad_value: err.bad_value,
            sequence: err.sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_window() -> ProtocolError {
        ProtocolError {
            code: 3,
            kind: "Window".to_string(),
            major_opcode: 12,
            minor_opcode: 0,
            bad_value: 0x0040_0001,
            sequence: 42,
        }
    }

    #[test]
    fn test_protocol_error_display() {
        assert_eq!(
            bad_window().to_string(),
            "Window (code 3) in request 12.0 on value 0x400001, sequence 42"
        );
    }

    #[test]
    fn test_protocol_error_wraps_into_wm_error() {
        let err: WmError = bad_window().into();
        assert!(err.is_protocol());
        assert!(!err.is_startup());
        assert!(err.to_string().starts_with("XError: Window (code 3)"));
    }

    #[test]
    fn test_another_wm_running() {
        let err = WmError::AnotherWmRunning;
        assert!(err.is_startup());
        assert!(!err.is_protocol());
        assert_eq!(err.to_string(), "another window manager is already running");
    }

    #[test]
    fn test_connection_error_display() {
        let err = WmError::from(ConnectionError::UnknownError);
        assert!(err.to_string().starts_with("display connection failed"));
        assert!(!err.is_startup());
    }

    #[test]
    fn test_reply_error_splits_by_cause() {
        let err = WmError::from(ReplyError::ConnectionError(ConnectionError::UnknownError));
        assert!(matches!(err, WmError::Connection(_)));
    }

    #[test]
    fn test_error_is_debug() {
        let debug_str = format!("{:?}", WmError::AnotherWmRunning);
        assert!(debug_str.contains("AnotherWmRunning"));
    }
}
