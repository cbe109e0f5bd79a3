//! Binding the calendar's selection to a host form control.
//!
//! Values written by the host are loosely typed ([`RawValue`]) and normalized to an
//! optional [`CalendarDate`]; anything that isn't a valid date clears the control.
//! Selections made in the calendar go back out through [`ValueBinding::confirm_selection`].

use chrono::{DateTime, NaiveDateTime, TimeZone};

use crate::{
    CalendarDate,
    date::{self, StartOfDay as _},
    policy,
};

/// A value as written by the host, before validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RawValue {
    /// No value at all.
    #[default]
    Null,

    Date(CalendarDate),

    /// Date plus time-of-day. The time is dropped on normalization.
    DateTime(NaiveDateTime),

    /// A date object that doesn't represent any day.
    InvalidDate,

    /// Text is never parsed, not even `"2019-02-24"`.
    Text(String),

    Number(f64),
}

impl RawValue {
    pub fn is_valid_date(&self) -> bool {
        matches!(self, Self::Date(_) | Self::DateTime(_))
    }

    /// The day this value represents, if it is a valid date.
    pub fn as_valid_date(&self) -> Option<CalendarDate> {
        match self {
            Self::Date(date) => Some(date.start_of_day()),
            Self::DateTime(date_time) => Some(date_time.start_of_day()),
            Self::Null | Self::InvalidDate | Self::Text(_) | Self::Number(_) => None,
        }
    }
}

impl From<CalendarDate> for RawValue {
    #[inline]
    fn from(date: CalendarDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for RawValue {
    #[inline]
    fn from(date_time: NaiveDateTime) -> Self {
        Self::DateTime(date_time)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for RawValue {
    #[inline]
    fn from(date_time: DateTime<Tz>) -> Self {
        Self::DateTime(date_time.naive_local())
    }
}

impl From<Option<CalendarDate>> for RawValue {
    #[inline]
    fn from(date: Option<CalendarDate>) -> Self {
        date.map_or(Self::Null, Self::Date)
    }
}

impl From<&str> for RawValue {
    #[inline]
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for RawValue {
    #[inline]
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for RawValue {
    #[inline]
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

/// Canonicalize a host value to start-of-day, or `None` if it isn't a valid date.
///
/// Never fails: malformed input clears the control.
pub fn normalize_incoming(raw: &RawValue) -> Option<CalendarDate> {
    let date = raw.as_valid_date();
    if date.is_none() && *raw != RawValue::Null {
        log::trace!("Ignoring non-date value {raw:?}");
    }
    date
}

// ----------------------------------------------------------------------------

type OnChange = Box<dyn FnMut(CalendarDate)>;
type OnTouched = Box<dyn FnMut()>;

/// The form-control side of a calendar: current value, touched and disabled flags,
/// plus the host's change listeners.
#[derive(Default)]
pub struct ValueBinding {
    value: Option<CalendarDate>,
    touched: bool,
    disabled: bool,
    on_change: Option<OnChange>,
    on_touched: Option<OnTouched>,
}

impl std::fmt::Debug for ValueBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueBinding")
            .field("value", &self.value.map(date::to_iso_date_string))
            .field("touched", &self.touched)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl ValueBinding {
    pub fn new(value: Option<CalendarDate>) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    /// Called with every confirmed selection.
    pub fn register_on_change(&mut self, on_change: impl FnMut(CalendarDate) + 'static) {
        self.on_change = Some(Box::new(on_change));
    }

    /// Called after every confirmed selection, once the change listener has run.
    pub fn register_on_touched(&mut self, on_touched: impl FnMut() + 'static) {
        self.on_touched = Some(Box::new(on_touched));
    }

    /// Replace the value from the host side. No listener is called.
    ///
    /// Returns the normalized value.
    pub fn write_value(&mut self, raw: &RawValue) -> Option<CalendarDate> {
        self.value = normalize_incoming(raw);
        self.value
    }

    #[inline]
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Accept a date picked by the user.
    ///
    /// Does nothing at all while disabled, for dates before `min`, or for the date
    /// already selected. Otherwise stores `date`, marks the control touched, calls the
    /// listeners and returns `date` itself.
    pub fn confirm_selection(
        &mut self,
        date: CalendarDate,
        min: Option<CalendarDate>,
    ) -> Option<CalendarDate> {
        if self.disabled {
            log::trace!("Ignoring selection of {date} while disabled");
            return None;
        }
        if !policy::is_selectable(date, self.value, min) {
            log::trace!("Ignoring selection of {date}: disabled or already selected");
            return None;
        }

        self.value = Some(date);
        self.touched = true;
        if let Some(on_change) = &mut self.on_change {
            on_change(date);
        }
        if let Some(on_touched) = &mut self.on_touched {
            on_touched();
        }
        Some(date)
    }

    #[inline]
    pub fn value(&self) -> Option<CalendarDate> {
        self.value
    }

    /// Has the user ever confirmed a selection? Never goes back to `false`.
    #[inline]
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}
