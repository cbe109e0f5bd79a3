//! Open/closed state of an overlay that hosts a calendar, such as a date picker popup.

use crate::calendar::CalendarResponse;

/// Whether the overlay is open, and whether picking a value closes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModalState {
    pub is_open: bool,

    /// Close once the contained control reports a new value. (Default: `true`)
    pub close_on_value_change: bool,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            is_open: false,
            close_on_value_change: true,
        }
    }
}

impl ModalState {
    /// Keep the overlay open after a value is picked.
    #[inline]
    pub fn close_on_value_change(mut self, close_on_value_change: bool) -> Self {
        self.close_on_value_change = close_on_value_change;
        self
    }

    #[inline]
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    #[inline]
    pub fn open(&mut self) {
        self.is_open = true;
    }

    #[inline]
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// The contained control has a new value.
    ///
    /// Returns `true` if this closed the overlay.
    pub fn notify_value_change(&mut self) -> bool {
        if self.is_open && self.close_on_value_change {
            log::debug!("Closing overlay after value change");
            self.is_open = false;
            true
        } else {
            false
        }
    }

    /// Forward a calendar's response; closes on a confirmed selection.
    ///
    /// Returns `true` if this closed the overlay.
    pub fn observe(&mut self, response: &CalendarResponse) -> bool {
        response.changed() && self.notify_value_change()
    }
}
