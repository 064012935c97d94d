//! Shared integration test fixtures for farview-bell.
//!
//! Provides fake implementations of the two boundary traits with enough
//! call recording to assert on probe, registration and forwarding
//! behavior without a live display server or viewer connections.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{FakeDisplay, FakeViewers};
//! ```

#![allow(dead_code)]

use std::collections::VecDeque;

use farview_bell::{
    DisplayError, DisplayLink, ExtensionInfo, KeyboardEvent, ViewerRegistry,
};
use parking_lot::Mutex;

/// Mutable side of [`FakeDisplay`], behind one sync-only lock.
#[derive(Default)]
struct FakeDisplayState {
    /// Extension reported by `query_keyboard_extension`.
    extension: Option<ExtensionInfo>,
    /// Event tag handed out by the auxiliary handshake.
    event_tag: i32,
    /// Pending events on the shared stream, oldest first.
    pending: VecDeque<KeyboardEvent>,
    /// Make `open_aux_connection` fail.
    fail_aux_open: bool,
    /// Make `select_events` fail when a nonzero enabled mask is requested.
    fail_full_selection: bool,
    /// Every `set_raw_auth_mode` argument, in call order.
    raw_auth_calls: Vec<bool>,
    /// Every `select_events` call as `(device, affect, enabled)`.
    select_calls: Vec<(u16, u32, u32)>,
    /// Auxiliary connections opened / closed.
    aux_opened: usize,
    aux_closed: usize,
}

/// Scriptable fake display-server link.
pub struct FakeDisplay {
    state: Mutex<FakeDisplayState>,
}

impl FakeDisplay {
    /// A display carrying the keyboard extension, handing out `event_tag`.
    pub fn with_extension(event_tag: i32) -> Self {
        Self {
            state: Mutex::new(FakeDisplayState {
                extension: Some(ExtensionInfo { major: 1, minor: 0 }),
                event_tag,
                ..FakeDisplayState::default()
            }),
        }
    }

    /// A display without the keyboard extension.
    pub fn without_extension() -> Self {
        Self {
            state: Mutex::new(FakeDisplayState::default()),
        }
    }

    /// Make the auxiliary open fail.
    pub fn fail_aux_open(self) -> Self {
        self.state.lock().fail_aux_open = true;
        self
    }

    /// Make full-mask event selection fail (the baseline, unmasked
    /// selection still succeeds).
    pub fn fail_full_selection(self) -> Self {
        self.state.lock().fail_full_selection = true;
        self
    }

    /// Queue an event on the shared stream.
    pub fn push_event(&self, event: KeyboardEvent) {
        self.state.lock().pending.push_back(event);
    }

    /// Number of events still pending on the stream.
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Raw-auth toggles observed so far, in call order.
    pub fn raw_auth_calls(&self) -> Vec<bool> {
        self.state.lock().raw_auth_calls.clone()
    }

    /// Event selections observed so far as `(device, affect, enabled)`.
    pub fn select_calls(&self) -> Vec<(u16, u32, u32)> {
        self.state.lock().select_calls.clone()
    }

    /// Auxiliary connections opened and closed so far.
    pub fn aux_counts(&self) -> (usize, usize) {
        let state = self.state.lock();
        (state.aux_opened, state.aux_closed)
    }
}

impl DisplayLink for FakeDisplay {
    type AuxHandle = u32;

    fn query_keyboard_extension(&self) -> Option<ExtensionInfo> {
        self.state.lock().extension
    }

    fn open_aux_connection(&self) -> Result<(u32, i32), DisplayError> {
        let mut state = self.state.lock();
        if state.fail_aux_open {
            return Err(DisplayError::AuxConnection("connection refused".into()));
        }
        state.aux_opened += 1;
        Ok((state.aux_opened as u32, state.event_tag))
    }

    fn close_aux_connection(&self, _handle: u32) {
        self.state.lock().aux_closed += 1;
    }

    fn set_raw_auth_mode(&self, raw: bool) -> bool {
        self.state.lock().raw_auth_calls.push(raw);
        true
    }

    fn select_events(&self, device: u16, affect: u32, enabled: u32) -> Result<(), DisplayError> {
        let mut state = self.state.lock();
        state.select_calls.push((device, affect, enabled));
        if enabled != 0 && state.fail_full_selection {
            return Err(DisplayError::EventSelection("bad device class".into()));
        }
        Ok(())
    }

    fn check_pending_event(&self, _event_tag: i32) -> Option<KeyboardEvent> {
        self.state.lock().pending.pop_front()
    }
}

/// Fake viewer registry counting bell broadcasts.
pub struct FakeViewers {
    all_initialized: bool,
    count: usize,
    bells: Mutex<usize>,
}

impl FakeViewers {
    /// `count` viewers, all fully initialized.
    pub fn initialized(count: usize) -> Self {
        Self {
            all_initialized: true,
            count,
            bells: Mutex::new(0),
        }
    }

    /// `count` viewers with at least one still mid-handshake.
    pub fn initializing(count: usize) -> Self {
        Self {
            all_initialized: false,
            count,
            bells: Mutex::new(0),
        }
    }

    /// Number of bell broadcasts fired so far.
    pub fn bells(&self) -> usize {
        *self.bells.lock()
    }
}

impl ViewerRegistry for FakeViewers {
    fn all_viewers_initialized(&self) -> bool {
        self.all_initialized
    }

    fn viewer_count(&self) -> usize {
        self.count
    }

    fn broadcast_bell(&self) {
        *self.bells.lock() += 1;
    }
}
