//! One-shot keyboard extension probing.
//!
//! Establishes whether the display server carries the keyboard extension
//! and which event-type tag its events use on the shared stream.
//! Obtaining the tag requires an extension handshake distinct from the
//! main connection, so the probe opens a short-lived auxiliary connection
//! and closes it before returning.

use crate::display::{DisplayLink, NO_EVENT_TAG};

/// Result of probing the display server for the keyboard extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProbeReport {
    /// Keyboard extension present and the handshake succeeded.
    pub available: bool,
    /// Event-type tag for extension events, [`NO_EVENT_TAG`] when
    /// unavailable.
    pub event_tag: i32,
}

impl ProbeReport {
    fn unavailable() -> Self {
        Self {
            available: false,
            event_tag: NO_EVENT_TAG,
        }
    }
}

/// Raw credential handling, scoped to the auxiliary open.
///
/// Entered before the open and left on drop, so the mode is reinstated on
/// every exit path.
struct RawAuthScope<'a, L: DisplayLink> {
    link: &'a L,
}

impl<'a, L: DisplayLink> RawAuthScope<'a, L> {
    fn enter(link: &'a L) -> Option<Self> {
        if link.set_raw_auth_mode(true) {
            Some(Self { link })
        } else {
            None
        }
    }
}

impl<L: DisplayLink> Drop for RawAuthScope<'_, L> {
    fn drop(&mut self) {
        self.link.set_raw_auth_mode(false);
    }
}

/// Probe `link` for the keyboard extension and its event-type tag.
///
/// Warnings are suppressed by `quiet`. The probe touches nothing beyond
/// the auxiliary connection it opens and closes itself; it is safe to
/// re-run after reconnecting to a different display, and each run fully
/// replaces the previous report.
pub(crate) fn probe<L: DisplayLink>(link: &L, quiet: bool) -> ProbeReport {
    let Some(info) = link.query_keyboard_extension() else {
        if !quiet {
            log::warn!("keyboard extension not present on display server");
        }
        return ProbeReport::unavailable();
    };

    log::debug!(
        "keyboard extension v{}.{} present, fetching event type",
        info.major,
        info.minor
    );

    let Some(_raw) = RawAuthScope::enter(link) else {
        if !quiet {
            log::warn!("disabling bell watch: raw auth mode unavailable");
        }
        return ProbeReport::unavailable();
    };

    // The handshake connection only exists to yield the event tag; close
    // it right away so it does not leak.
    match link.open_aux_connection() {
        Ok((handle, event_tag)) => {
            link.close_aux_connection(handle);
            ProbeReport {
                available: true,
                event_tag,
            }
        }
        Err(e) => {
            if !quiet {
                log::warn!("disabling bell watch: {e}");
            }
            ProbeReport::unavailable()
        }
    }
}
