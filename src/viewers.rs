//! Remote-viewer boundary for bell broadcasting.

/// Narrow interface onto the host's viewer registry.
///
/// The bridge never stores or mutates viewer state; it only asks whether
/// a broadcast is currently safe and, when it is, fires one. The host's
/// registry owns the screen handle, the per-viewer connections and the
/// wire-level bell message.
pub trait ViewerRegistry {
    /// Returns `true` once every connected viewer has completed its
    /// protocol handshake.
    ///
    /// Bells detected before then are skipped, not queued; a viewer
    /// mid-handshake is an expected transient condition.
    fn all_viewers_initialized(&self) -> bool;

    /// Number of currently connected viewers.
    fn viewer_count(&self) -> usize;

    /// Notify every connected viewer of an audible bell.
    ///
    /// Fire-and-forget: per-viewer delivery failures are the host's
    /// concern and are never reported back to the bridge.
    fn broadcast_bell(&self);
}
