//! Bell forwarding configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the keyboard bell bridge.
///
/// Supplies the startup values; `watch` and `sound` remain togglable at
/// runtime through the [`BellBridge`](crate::bridge::BellBridge)
/// accessors. Bells are forwarded by default, matching the behavior
/// operators expect from a remote display server unless they opt out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BellConfig {
    /// Listen for keyboard bell events on the display connection.
    #[serde(default = "default_watch")]
    pub watch: bool,

    /// Forward observed bells to connected viewers.
    #[serde(default = "default_sound")]
    pub sound: bool,

    /// Suppress non-fatal warnings when the keyboard extension is
    /// missing or the feature degrades.
    #[serde(default)]
    pub quiet: bool,
}

fn default_watch() -> bool {
    true
}

fn default_sound() -> bool {
    true
}

impl Default for BellConfig {
    fn default() -> Self {
        Self {
            watch: default_watch(),
            sound: default_sound(),
            quiet: false,
        }
    }
}
