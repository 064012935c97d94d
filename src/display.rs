//! Display-server boundary for keyboard bell detection.
//!
//! [`DisplayLink`] is the narrow seam between the bell bridge and the
//! host's display connection: extension probing, event selection and the
//! non-blocking event-queue check all go through it. The host implements
//! it over its live connection; [`NoKeyboardExtension`] stands in on
//! builds or sessions where the keyboard extension does not exist, so call
//! sites never branch on a compile-time feature.

use crate::error::DisplayError;

/// Device specifier for the core keyboard device.
pub const CORE_KEYBOARD: u16 = 0x0100;

/// Event-selection mask bit for bell notifications.
pub const BELL_NOTIFY_MASK: u32 = 1 << 8;

/// Sentinel event-type tag reported while the keyboard extension is
/// unavailable. No real event class uses this value.
pub const NO_EVENT_TAG: i32 = 0;

/// Presence and version information for the keyboard extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionInfo {
    /// Major version reported by the display server.
    pub major: u16,
    /// Minor version reported by the display server.
    pub minor: u16,
}

/// One event dequeued from the shared event stream.
///
/// Several event variants share the keyboard extension's type tag; only
/// [`KeyboardEvent::Bell`] identifies a genuine bell notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEvent {
    /// An audible bell was rung on the keyboard device.
    Bell,
    /// Any other keyboard-extension event (state, map, indicator, ...).
    Other,
}

/// Narrow interface onto the host's display-server connection.
///
/// The host owns the connection and the event loop; the bridge only
/// issues the handful of requests needed to detect bells. Implementations
/// wrap whatever connection type the host uses and are free to keep their
/// own auxiliary-handle representation via [`AuxHandle`](DisplayLink::AuxHandle).
///
/// # Notes
///
/// All methods take `&self`. Connection-level mutual exclusion is the
/// caller's responsibility; see [`LockedDisplay`] for where that contract
/// is enforced at the interface.
pub trait DisplayLink {
    /// Handle for the short-lived auxiliary connection opened during
    /// probing.
    type AuxHandle;

    /// Query the display server for the keyboard extension.
    ///
    /// Returns `None` when the extension is not present.
    fn query_keyboard_extension(&self) -> Option<ExtensionInfo>;

    /// Open a separate, short-lived connection for the extension
    /// handshake that yields the event-type tag.
    ///
    /// Returns the connection handle and the tag. The caller closes the
    /// handle via [`close_aux_connection`](DisplayLink::close_aux_connection)
    /// as soon as the tag is in hand; the main connection is untouched
    /// either way.
    fn open_aux_connection(&self) -> Result<(Self::AuxHandle, i32), DisplayError>;

    /// Close an auxiliary connection obtained from
    /// [`open_aux_connection`](DisplayLink::open_aux_connection).
    fn close_aux_connection(&self, handle: Self::AuxHandle);

    /// Toggle raw credential handling around auxiliary opens.
    ///
    /// Returns `false` when the mode could not be changed.
    fn set_raw_auth_mode(&self, raw: bool) -> bool;

    /// Select keyboard events for `device`.
    ///
    /// `affect` names the mask bits to change and `enabled` their new
    /// values. Re-selection is idempotent at the display server.
    fn select_events(&self, device: u16, affect: u32, enabled: u32) -> Result<(), DisplayError>;

    /// Non-blocking check for a pending event carrying `event_tag` on the
    /// shared event stream.
    ///
    /// Must dequeue and return the event when one is pending and return
    /// `None` otherwise, without waiting in either case.
    fn check_pending_event(&self, event_tag: i32) -> Option<KeyboardEvent>;
}

/// Stand-in link for builds or sessions without the keyboard extension.
///
/// Always reports the extension absent and refuses every request, so the
/// bridge degrades to its disabled state through the ordinary probe path.
/// Hosts select this at startup instead of a real link when the extension
/// is not compiled in or the platform has no display server.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoKeyboardExtension;

impl DisplayLink for NoKeyboardExtension {
    type AuxHandle = ();

    fn query_keyboard_extension(&self) -> Option<ExtensionInfo> {
        None
    }

    fn open_aux_connection(&self) -> Result<((), i32), DisplayError> {
        Err(DisplayError::AuxConnection(
            "keyboard extension not available".into(),
        ))
    }

    fn close_aux_connection(&self, _handle: ()) {}

    fn set_raw_auth_mode(&self, _raw: bool) -> bool {
        // Nothing to relax; trivially succeeds.
        true
    }

    fn select_events(&self, _device: u16, _affect: u32, _enabled: u32) -> Result<(), DisplayError> {
        Err(DisplayError::Request(
            "keyboard extension not available".into(),
        ))
    }

    fn check_pending_event(&self, _event_tag: i32) -> Option<KeyboardEvent> {
        None
    }
}

/// Caller-supplied witness that the display connection lock is held.
///
/// Reading the shared event queue is not safe concurrently with other
/// users of the connection, so [`BellBridge::poll_once`] only accepts a
/// link wrapped in this type. Construct it inside the scope that holds
/// the host's connection lock and let it go out of scope with that lock:
///
/// ```ignore
/// let _guard = display_lock.lock();
/// bridge.poll_once(&LockedDisplay::assert_locked(&link), &viewers);
/// ```
///
/// The wrapper carries no runtime state; it exists to make the locking
/// precondition visible at the interface instead of burying it in a
/// calling convention.
///
/// [`BellBridge::poll_once`]: crate::bridge::BellBridge::poll_once
pub struct LockedDisplay<'a, L: DisplayLink> {
    link: &'a L,
}

impl<'a, L: DisplayLink> LockedDisplay<'a, L> {
    /// Assert that the caller currently holds the connection lock.
    pub fn assert_locked(link: &'a L) -> Self {
        Self { link }
    }

    /// Access the underlying link.
    pub fn link(&self) -> &L {
        self.link
    }
}
