//! [`Platform`] implementation for a terminal session.

use crate::host::{Notice, Orientation, Platform, ScreenHost, ScreenSize};
use std::time::{Duration, Instant};
use tracing::debug;

pub type App = ScreenHost<TerminalPlatform>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toast {
    pub notice: Notice,
    pub shown_at: Instant,
}

#[derive(Debug)]
pub struct TerminalPlatform {
    cols: u16,
    rows: u16,
    toast: Option<Toast>,
    toast_duration: Duration,
    pulse_until: Option<Instant>,
    bell_pending: bool,
    settings_requested: bool,
}

impl TerminalPlatform {
    pub fn new(cols: u16, rows: u16, toast_duration: Duration) -> Self {
        TerminalPlatform {
            cols,
            rows,
            toast: None,
            toast_duration,
            pulse_until: None,
            bell_pending: false,
            settings_requested: false,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// The notice still on screen at `now`, if any.
    pub fn active_toast(&self, now: Instant) -> Option<Notice> {
        self.toast
            .filter(|toast| now.duration_since(toast.shown_at) < self.toast_duration)
            .map(|toast| toast.notice)
    }

    /// Drops an expired notice; returns true when the screen needs a redraw.
    pub fn expire(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.toast.is_some() && self.active_toast(now).is_none() {
            self.toast = None;
            changed = true;
        }
        if self.pulse_until.is_some_and(|until| now >= until) {
            self.pulse_until = None;
            changed = true;
        }
        changed
    }

    pub fn is_pulsing(&self, now: Instant) -> bool {
        self.pulse_until.is_some_and(|until| now < until)
    }

    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    pub fn take_settings_request(&mut self) -> bool {
        std::mem::take(&mut self.settings_requested)
    }
}

impl Platform for TerminalPlatform {
    fn screen_size(&self) -> ScreenSize {
        ScreenSize::classify(self.cols, self.rows)
    }

    fn orientation(&self) -> Orientation {
        Orientation::from_size(self.cols, self.rows)
    }

    fn notify(&mut self, notice: Notice) {
        debug!(%notice, "Showing notice");
        self.toast = Some(Toast {
            notice,
            shown_at: Instant::now(),
        });
    }

    fn vibrate(&mut self, duration: Duration) {
        self.pulse_until = Some(Instant::now() + duration);
        self.bell_pending = true;
    }

    fn open_settings(&mut self) {
        self.settings_requested = true;
    }
}
