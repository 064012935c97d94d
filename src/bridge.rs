//! Watch/sound state machine and the per-poll forwarding decision.
//!
//! [`BellBridge`] owns the process-wide bell state: whether the keyboard
//! extension is present on the current display connection, the event-type
//! tag its events carry, and the watch/sound flags toggled by the host's
//! control surface. The host runs [`BellBridge::initialize`] once per
//! display connection, [`BellBridge::register_watch`] at startup and after
//! enabling watch, and [`BellBridge::poll_once`] every event-loop
//! iteration.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use crate::config::BellConfig;
use crate::display::{
    BELL_NOTIFY_MASK, CORE_KEYBOARD, DisplayLink, KeyboardEvent, LockedDisplay, NO_EVENT_TAG,
};
use crate::probe::{self, ProbeReport};
use crate::viewers::ViewerRegistry;

/// Bridges keyboard bell events from the display server to remote viewers.
///
/// One instance lives for the lifetime of a display connection. All
/// methods take `&self`: the flags are atomics so a shared handle (for
/// example an `Arc<BellBridge>`) can be read from the event loop while a
/// control command flips them from another context. Last write wins; a
/// flip taking effect one poll cycle later is acceptable.
///
/// The flags are coupled: sound implies watch implies extension presence.
/// Whenever the extension turns out to be unavailable or event
/// registration fails, both flags are forced off and the server carries
/// on without bell forwarding.
pub struct BellBridge {
    /// Keyboard extension present on the current display connection.
    extension_present: AtomicBool,
    /// Event-type tag for keyboard extension events, [`NO_EVENT_TAG`]
    /// while the extension is unavailable.
    event_tag: AtomicI32,
    /// Observe bell events on the shared stream.
    watch_enabled: AtomicBool,
    /// Forward observed bells to viewers.
    sound_enabled: AtomicBool,
    /// Suppress degradation warnings.
    quiet: bool,
}

impl BellBridge {
    /// Create a bridge with the given startup configuration.
    ///
    /// The watch/sound flags start at their configured values but have no
    /// effect until [`initialize`](Self::initialize) finds the extension
    /// and [`register_watch`](Self::register_watch) selects its events.
    pub fn new(config: &BellConfig) -> Self {
        Self {
            extension_present: AtomicBool::new(false),
            event_tag: AtomicI32::new(NO_EVENT_TAG),
            watch_enabled: AtomicBool::new(config.watch),
            sound_enabled: AtomicBool::new(config.sound),
            quiet: config.quiet,
        }
    }

    /// Probe `link` for the keyboard extension and record the result.
    ///
    /// Run once at startup, and again after reconnecting to a different
    /// display; each run fully overwrites the previous availability and
    /// event tag. With no link there is nothing to probe and the bridge
    /// records the extension as unavailable.
    pub fn initialize<L: DisplayLink>(&self, link: Option<&L>) {
        let report = match link {
            Some(link) => probe::probe(link, self.quiet),
            None => ProbeReport {
                available: false,
                event_tag: NO_EVENT_TAG,
            },
        };

        self.extension_present.store(report.available, Ordering::SeqCst);
        self.event_tag.store(report.event_tag, Ordering::SeqCst);

        // Sound without watch is meaningless and watch without the
        // extension is impossible; keep the flags coupled.
        if !report.available {
            self.watch_enabled.store(false, Ordering::SeqCst);
            self.sound_enabled.store(false, Ordering::SeqCst);
        }
    }

    /// (Re)register for bell notifications on the display server.
    ///
    /// Call at startup and again whenever watch toggles on, so the full
    /// bell-notify mask is requested; redundant calls are safe since
    /// event re-selection is idempotent at the display server.
    ///
    /// The baseline selection keeps extension events identifiable on the
    /// shared stream even while forwarding is off. If the full-mask
    /// selection fails, bell forwarding is disabled (watch and sound
    /// forced off) and the server carries on; the failure is never fatal
    /// to the process.
    pub fn register_watch<L: DisplayLink>(&self, link: Option<&L>) {
        if !self.extension_present.load(Ordering::SeqCst) {
            if !self.quiet {
                log::warn!("disabling bell forwarding: keyboard extension not present");
            }
            self.watch_enabled.store(false, Ordering::SeqCst);
            self.sound_enabled.store(false, Ordering::SeqCst);
            return;
        }

        // Nothing to register on a connection that does not exist.
        let Some(link) = link else {
            return;
        };

        // Baseline, informational-level selection; deliberately unchecked.
        let _ = link.select_events(CORE_KEYBOARD, BELL_NOTIFY_MASK, 0);

        if !self.watch_enabled.load(Ordering::SeqCst) {
            return;
        }

        if let Err(e) = link.select_events(CORE_KEYBOARD, BELL_NOTIFY_MASK, BELL_NOTIFY_MASK) {
            if !self.quiet {
                log::warn!("disabling bell forwarding: {e}");
            }
            self.watch_enabled.store(false, Ordering::SeqCst);
            self.sound_enabled.store(false, Ordering::SeqCst);
        }
    }

    /// Process at most one pending keyboard event.
    ///
    /// Called once per event-loop iteration; the check is non-blocking
    /// and returns immediately when nothing is pending. The caller must
    /// hold the display connection lock for the duration of the call,
    /// which is what the [`LockedDisplay`] wrapper asserts.
    ///
    /// A pending event is dequeued even while watch is off, so bell
    /// notifications do not pile up behind the baseline selection; such
    /// events are discarded, never buffered for replay. Each qualifying
    /// bell yields exactly one broadcast — bursts pass through as-is.
    pub fn poll_once<L, V>(&self, display: &LockedDisplay<'_, L>, viewers: &V)
    where
        L: DisplayLink,
        V: ViewerRegistry,
    {
        let event_tag = self.event_tag.load(Ordering::SeqCst);
        if event_tag == NO_EVENT_TAG {
            return;
        }

        let Some(event) = display.link().check_pending_event(event_tag) else {
            return;
        };

        if !self.watch_enabled.load(Ordering::SeqCst) {
            // Dequeued and dropped on purpose.
            return;
        }

        if event != KeyboardEvent::Bell || !self.sound_enabled.load(Ordering::SeqCst) {
            return;
        }

        if !viewers.all_viewers_initialized() {
            log::debug!("not forwarding bell: viewers still initializing");
            return;
        }

        if viewers.viewer_count() > 0 {
            viewers.broadcast_bell();
        }
    }

    /// `true` when [`initialize`](Self::initialize) found the keyboard
    /// extension on the current display connection.
    pub fn is_extension_present(&self) -> bool {
        self.extension_present.load(Ordering::SeqCst)
    }

    /// Event-type tag for keyboard extension events, [`NO_EVENT_TAG`]
    /// while the extension is unavailable.
    pub fn event_tag(&self) -> i32 {
        self.event_tag.load(Ordering::SeqCst)
    }

    /// Whether bell events are being observed.
    pub fn watch_enabled(&self) -> bool {
        self.watch_enabled.load(Ordering::SeqCst)
    }

    /// Toggle bell watching.
    ///
    /// Enabling is clamped to the extension being present. Disabling also
    /// disables sound. After enabling, call
    /// [`register_watch`](Self::register_watch) so the full bell-notify
    /// mask is requested from the display server.
    pub fn set_watch_enabled(&self, enabled: bool) {
        let enabled = enabled && self.extension_present.load(Ordering::SeqCst);
        self.watch_enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.sound_enabled.store(false, Ordering::SeqCst);
        }
    }

    /// Whether observed bells are forwarded to viewers.
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled.load(Ordering::SeqCst)
    }

    /// Toggle bell forwarding.
    ///
    /// Enabling is clamped to watch being enabled; enable watch first.
    pub fn set_sound_enabled(&self, enabled: bool) {
        let enabled = enabled && self.watch_enabled.load(Ordering::SeqCst);
        self.sound_enabled.store(enabled, Ordering::SeqCst);
    }
}

impl Default for BellBridge {
    fn default() -> Self {
        Self::new(&BellConfig::default())
    }
}
