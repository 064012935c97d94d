//! Typed error variants for display-side operations.
//!
//! These are produced by [`DisplayLink`](crate::display::DisplayLink)
//! implementations. None of them are fatal to the host server: the bridge
//! absorbs every variant into its availability flags plus a log line, and
//! callers observe the degradation through the
//! [`BellBridge`](crate::bridge::BellBridge) accessors rather than through
//! propagated errors.

use thiserror::Error;

/// Errors surfaced by a display-server link.
///
/// Absence of the keyboard extension is deliberately *not* an error
/// variant — `query_keyboard_extension` returns `None` for that, since a
/// display without the extension is an ordinary, fully supported
/// configuration.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The short-lived auxiliary connection used for the extension
    /// handshake could not be opened.
    #[error("auxiliary display connection failed: {0}")]
    AuxConnection(String),

    /// An event-selection request was rejected by the display server.
    #[error("event selection rejected: {0}")]
    EventSelection(String),

    /// Any other display request failure.
    #[error("display request failed: {0}")]
    Request(String),
}
