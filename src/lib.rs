//! Keyboard bell detection and forwarding for the farview remote display server.
//!
//! This crate bridges the display server's keyboard-bell notifications to
//! connected remote viewers. It covers:
//!
//! - Probing the display server for the keyboard extension and the event
//!   type tag its events carry on the shared event stream
//! - A small watch/sound state machine gating whether bell events are
//!   observed and whether observed bells are forwarded
//! - The per-poll decision of whether a pending bell event is broadcast
//!   to all connected viewers
//!
//! Audio rendering, remote protocol framing and display connection
//! management belong to the host server; this crate consumes them through
//! the [`DisplayLink`] and [`ViewerRegistry`] traits. The host's event loop
//! drives [`BellBridge::poll_once`] once per iteration while holding its
//! display connection lock (see [`LockedDisplay`]).
//!
//! Failures never propagate to the host's control flow: a missing
//! extension, a failed auxiliary connection or a rejected event selection
//! each degrade the feature (flags forced off, warning logged) and the
//! server carries on without bell forwarding.

pub mod bridge;
pub mod config;
pub mod display;
pub mod error;
mod probe;
pub mod viewers;

// Re-export the main types for convenience
pub use bridge::BellBridge;
pub use config::BellConfig;
pub use display::{
    BELL_NOTIFY_MASK, CORE_KEYBOARD, DisplayLink, ExtensionInfo, KeyboardEvent, LockedDisplay,
    NO_EVENT_TAG, NoKeyboardExtension,
};
pub use error::DisplayError;
pub use viewers::ViewerRegistry;
