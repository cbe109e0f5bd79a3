//! Which months are shown, and which date has keyboard focus.
//!
//! The calendar works in one of two modes, picked by comparing the view size to the
//! stepper threshold:
//!
//! * [`NavigationMode::Stepper`]: few months are shown, starting at the active month,
//!   with steppers to page through them.
//! * [`NavigationMode::FixedRange`]: many months are shown, starting at an anchor month
//!   chosen by the host. Navigation never pages the view.
//!
//! The displayed months are rebuilt, never patched, and only when the view size, the
//! anchor, or (in stepper mode) the active month changes.

use std::{num::NonZeroU32, str::FromStr, sync::Arc};

use chrono::Datelike as _;

use crate::{CalendarDate, Month, date};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ViewSizeError {
    #[error("View size {0:?} is not a number")]
    NotANumber(String),

    #[error("View size must be positive, got {0}")]
    NotPositive(i64),

    #[error("View size must be at most {max} months, got {0}", max = ViewSize::MAX.get())]
    TooLarge(i64),
}

/// How many consecutive months are displayed. Between one and [`Self::MAX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct ViewSize(NonZeroU32);

impl ViewSize {
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// A hundred years.
    pub const MAX: Self = Self(NonZeroU32::MIN.saturating_add(1199));

    /// `None` for zero, or for more than [`Self::MAX`] months.
    #[inline]
    pub fn new(months: u32) -> Option<Self> {
        NonZeroU32::new(months)
            .filter(|months| *months <= Self::MAX.0)
            .map(Self)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Like [`Self::try_from`], but never fails.
    ///
    /// Too large sizes are clamped to [`Self::MAX`]; anything else invalid shows one month.
    pub fn coerce(months: i64) -> Self {
        Self::try_from(months).unwrap_or_else(Self::fallback)
    }

    /// Like [`Self::from_str`], but never fails. See [`Self::coerce`].
    pub fn coerce_str(months: &str) -> Self {
        months.parse().unwrap_or_else(Self::fallback)
    }

    fn fallback(err: ViewSizeError) -> Self {
        if matches!(err, ViewSizeError::TooLarge(_)) {
            log::warn!("{err}; showing {} months", Self::MAX.get());
            Self::MAX
        } else {
            log::warn!("{err}; showing one month");
            Self::ONE
        }
    }
}

impl Default for ViewSize {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<i64> for ViewSize {
    type Error = ViewSizeError;

    fn try_from(months: i64) -> Result<Self, Self::Error> {
        if months <= 0 {
            return Err(ViewSizeError::NotPositive(months));
        }
        u32::try_from(months)
            .ok()
            .and_then(Self::new)
            .ok_or(ViewSizeError::TooLarge(months))
    }
}

impl TryFrom<u32> for ViewSize {
    type Error = ViewSizeError;

    #[inline]
    fn try_from(months: u32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(months))
    }
}

impl From<ViewSize> for u32 {
    #[inline]
    fn from(view_size: ViewSize) -> Self {
        view_size.get()
    }
}

impl FromStr for ViewSize {
    type Err = ViewSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let months: i64 = s
            .trim()
            .parse()
            .map_err(|_err| ViewSizeError::NotANumber(s.to_owned()))?;
        Self::try_from(months)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationMode {
    /// Pages follow the active month; month steppers are shown.
    Stepper,

    /// Pages start at the anchor month; no steppers.
    FixedRange,
}

/// Active date, active month and the displayed months of one calendar.
///
/// Nothing is displayed until [`Self::attach`] has run once. Setting inputs before
/// that only records them.
#[derive(Clone, Debug)]
pub struct NavigationState {
    today: CalendarDate,
    active_date: CalendarDate,
    active_month: Option<Month>,
    anchor_month: Option<Month>,
    view_size: ViewSize,
    stepper_threshold: ViewSize,

    displayed_months: Arc<[Month]>,
    attached: bool,

    /// Number of times the displayed months were built.
    generation: u64,

    focus_pending: bool,
}

impl NavigationState {
    /// `today` is the active date until the user navigates, and the page shown when
    /// there is neither an active month nor an anchor.
    pub fn new(today: CalendarDate) -> Self {
        Self {
            today,
            active_date: today,
            active_month: None,
            anchor_month: None,
            view_size: ViewSize::ONE,
            stepper_threshold: ViewSize::ONE,
            displayed_months: Arc::new([]),
            attached: false,
            generation: 0,
            focus_pending: false,
        }
    }

    /// Largest view size that still shows month steppers. (Default: 1)
    #[inline]
    pub fn with_stepper_threshold(mut self, stepper_threshold: ViewSize) -> Self {
        self.stepper_threshold = stepper_threshold;
        self
    }

    /// Build the displayed months for the first time.
    ///
    /// Returns `false` if already attached; later calls do nothing.
    pub fn attach(&mut self) -> bool {
        if self.attached {
            return false;
        }
        self.attached = true;
        self.regenerate();
        true
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn mode(&self) -> NavigationMode {
        if self.view_size <= self.stepper_threshold {
            NavigationMode::Stepper
        } else {
            NavigationMode::FixedRange
        }
    }

    #[inline]
    pub fn shows_stepper(&self) -> bool {
        self.mode() == NavigationMode::Stepper
    }

    /// Returns `true` if the displayed months were rebuilt.
    pub fn set_view_size(&mut self, view_size: ViewSize) -> bool {
        if view_size == self.view_size {
            return false;
        }
        self.view_size = view_size;
        self.regenerate_if_attached()
    }

    /// Returns `true` if the displayed months were rebuilt.
    pub fn set_stepper_threshold(&mut self, stepper_threshold: ViewSize) -> bool {
        if stepper_threshold == self.stepper_threshold {
            return false;
        }
        let mode = self.mode();
        self.stepper_threshold = stepper_threshold;
        mode != self.mode() && self.regenerate_if_attached()
    }

    /// Set the first month of the fixed-range view.
    ///
    /// In stepper mode this also moves the active month there.
    /// Returns `true` if the displayed months were rebuilt.
    pub fn set_anchor_month(&mut self, anchor_month: Option<Month>) -> bool {
        if anchor_month == self.anchor_month {
            return false;
        }
        self.anchor_month = anchor_month;
        if self.shows_stepper() {
            self.active_month = anchor_month;
        }
        self.regenerate_if_attached()
    }

    /// Move the active date by `days`.
    ///
    /// Crossing into another month moves the active month along, and in stepper mode
    /// pages the view. Afterwards a focus move to the new active date is pending, see
    /// [`Self::take_focus_request`].
    pub fn step_active_date(&mut self, days: i64) {
        self.active_date = date::add_days(self.active_date, days);

        if !self.current_active_month().contains(self.active_date) {
            self.active_month = Some(Month::of(self.active_date));
            if self.shows_stepper() {
                self.regenerate_if_attached();
            }
        }

        self.focus_pending = true;
    }

    /// Page the active month by `months`, keeping the active day-of-month.
    ///
    /// The day-of-month overflows like [`date::add_months`]: stepping from the 31st
    /// into a 30-day month lands on the 1st of the month after.
    pub fn step_active_month(&mut self, months: i32) {
        let active_month = self.current_active_month().add(months);
        self.active_month = Some(active_month);
        self.active_date = date::set_date(
            active_month.first_day(),
            i64::from(self.active_date.day()),
        );

        if self.shows_stepper() {
            self.regenerate_if_attached();
        }
    }

    /// Follow a date the user picked from the displayed months.
    ///
    /// The picked date is already on screen, so the pages stay where they are.
    pub fn select(&mut self, date: CalendarDate) {
        self.active_date = date;
        self.active_month = Some(Month::of(date));
    }

    /// Jump to a date written from outside.
    ///
    /// In stepper mode the pages follow it.
    pub fn on_external_select(&mut self, date: CalendarDate) {
        self.active_date = date;
        self.active_month = Some(Month::of(date));
        if self.shows_stepper() {
            self.regenerate_if_attached();
        }
    }

    /// The date a pending focus move should target, once.
    ///
    /// Call after the render reflecting the latest step has been committed.
    pub fn take_focus_request(&mut self) -> Option<CalendarDate> {
        std::mem::take(&mut self.focus_pending).then_some(self.active_date)
    }

    #[inline]
    pub fn has_focus_request(&self) -> bool {
        self.focus_pending
    }

    /// Consecutive months starting at the active month (stepper mode) or the anchor
    /// (fixed-range mode). Empty until attached.
    #[inline]
    pub fn displayed_months(&self) -> &Arc<[Month]> {
        &self.displayed_months
    }

    /// Bumped every time the displayed months are rebuilt.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn active_date(&self) -> CalendarDate {
        self.active_date
    }

    #[inline]
    pub fn active_month(&self) -> Option<Month> {
        self.active_month
    }

    #[inline]
    pub fn anchor_month(&self) -> Option<Month> {
        self.anchor_month
    }

    #[inline]
    pub fn view_size(&self) -> ViewSize {
        self.view_size
    }

    #[inline]
    pub fn stepper_threshold(&self) -> ViewSize {
        self.stepper_threshold
    }

    #[inline]
    pub fn today(&self) -> CalendarDate {
        self.today
    }

    /// The month the first displayed page starts at.
    pub fn base_month(&self) -> Month {
        let base = match self.mode() {
            NavigationMode::Stepper => self.active_month,
            NavigationMode::FixedRange => self.anchor_month,
        };
        base.unwrap_or_else(|| Month::of(self.today))
    }

    fn current_active_month(&self) -> Month {
        self.active_month.unwrap_or_else(|| Month::of(self.today))
    }

    fn regenerate_if_attached(&mut self) -> bool {
        if self.attached {
            self.regenerate();
        }
        self.attached
    }

    fn regenerate(&mut self) {
        let base = self.base_month();
        self.displayed_months = (0..self.view_size.get())
            .map_while(|offset| i32::try_from(offset).ok())
            .map(|offset| base.add(offset))
            .collect();
        self.generation += 1;
        log::debug!(
            "Displaying {} month(s) from {base} ({:?})",
            self.view_size.get(),
            self.mode()
        );
    }
}
