use std::sync::Arc;

use chrono::Weekday;

use crate::{
    CalendarDate, Month,
    date::weekday_identifier,
    grid::{CellContext, DayCell, MonthGrid},
    locale::{EnglishLocaleData, LocaleData, LocaleFormats, TranslationWidth},
    navigation::{NavigationState, ViewSize},
    policy::{NavKey, key_to_day_step},
    value::{RawValue, ValueBinding},
};

/// Inputs of a [`Calendar`], set once at construction and changeable later.
///
/// ```
/// # use ecalendar::{CalendarOptions, Month, ViewSize};
/// let options = CalendarOptions::default()
///     .locale("en-GB")
///     .view_size(ViewSize::new(3).unwrap())
///     .anchor_month(Month::new(2019, 2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalendarOptions {
    /// Overrides the calendar's default locale.
    pub locale: Option<String>,

    /// Dates before this one can't be selected.
    pub min: Option<CalendarDate>,

    /// CLDR-style caption pattern, e.g. `"y. MMM"`. Defaults to the locale's.
    pub month_and_year_format: Option<String>,

    /// Defaults to the locale's.
    pub first_day_of_week: Option<Weekday>,

    pub view_size: ViewSize,

    /// First month of a multi-month view.
    pub anchor_month: Option<Month>,

    /// Largest view size that pages with month steppers.
    pub stepper_threshold: ViewSize,
}

impl CalendarOptions {
    #[inline]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[inline]
    pub fn min(mut self, min: CalendarDate) -> Self {
        self.min = Some(min);
        self
    }

    #[inline]
    pub fn month_and_year_format(mut self, pattern: impl Into<String>) -> Self {
        self.month_and_year_format = Some(pattern.into());
        self
    }

    #[inline]
    pub fn first_day_of_week(mut self, first_day_of_week: Weekday) -> Self {
        self.first_day_of_week = Some(first_day_of_week);
        self
    }

    #[inline]
    pub fn view_size(mut self, view_size: ViewSize) -> Self {
        self.view_size = view_size;
        self
    }

    #[inline]
    pub fn anchor_month(mut self, anchor_month: Option<Month>) -> Self {
        self.anchor_month = anchor_month;
        self
    }

    #[inline]
    pub fn stepper_threshold(mut self, stepper_threshold: ViewSize) -> Self {
        self.stepper_threshold = stepper_threshold;
        self
    }
}

/// Something the rendering layer reports.
#[derive(Clone, Debug, PartialEq)]
pub enum CalendarEvent {
    /// A day cell was clicked or otherwise activated.
    DayActivated(CalendarDate),

    /// A key was pressed while a day cell had focus.
    KeyPressed(NavKey),

    DayStepRequested(i64),

    /// A month stepper was pressed.
    MonthStepRequested(i32),

    ViewSizeChanged(ViewSize),
    AnchorMonthChanged(Option<Month>),

    /// The host wrote a new value into the control.
    ExternalValueWritten(RawValue),

    DisabledStateChanged(bool),
}

/// What handling a [`CalendarEvent`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalendarResponse {
    /// The newly selected date, if the user picked one.
    pub value_changed: Option<CalendarDate>,

    /// The host should suppress the default action of the key.
    pub prevent_default: bool,

    /// This event moved the active date, so focus should follow it.
    /// Call [`Calendar::after_render`] once rendered.
    pub focus_scheduled: bool,

    /// The displayed months were rebuilt.
    pub months_changed: bool,
}

impl CalendarResponse {
    /// Did the user pick a new date?
    #[inline]
    pub fn changed(&self) -> bool {
        self.value_changed.is_some()
    }
}

/// Moves keyboard focus to the cell in the tab order.
pub trait FocusHost {
    fn focus_active_cell(&mut self, date: CalendarDate);
}

impl<F: FnMut(CalendarDate)> FocusHost for F {
    fn focus_active_cell(&mut self, date: CalendarDate) {
        self(date);
    }
}

/// Identity of a displayed month, for renderers that reuse month components.
///
/// Stepper views key by position, so the month components (and the focused stepper)
/// survive paging. Multi-month views key by month, so components survive a change
/// of the anchor month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonthKey {
    Position(usize),
    Month(Month),
}

/// Everything a renderer needs to draw one month.
#[derive(Clone, Debug)]
pub struct MonthView {
    pub key: MonthKey,
    pub month: Month,

    /// E.g. "February 2019".
    pub caption: String,

    /// Shared with the underlying grid until the month changes.
    pub days: Arc<[CalendarDate]>,

    /// Lowercase weekday identifier of day 1, e.g. `"friday"`.
    pub first_day_of_month: &'static str,

    /// Empty cells before day 1.
    pub leading_blanks: usize,

    pub show_stepper: bool,

    /// One per day, in the order of [`Self::days`].
    pub cells: Vec<DayCell>,
}

/// A calendar date picker's view state.
///
/// Feed it the rendering layer's events with [`Self::handle`], and render what
/// [`Self::months`] returns.
///
/// ```
/// # use chrono::NaiveDate;
/// # use ecalendar::{Calendar, CalendarEvent, CalendarOptions, NavKey};
/// let today = NaiveDate::from_ymd_opt(2019, 2, 14).unwrap();
/// let mut calendar = Calendar::new(today, "en-US", CalendarOptions::default());
/// calendar.attach();
///
/// let response = calendar.handle(CalendarEvent::KeyPressed(NavKey::ArrowDown));
/// assert!(response.prevent_default);
/// calendar.after_render(&mut |date: NaiveDate| assert_eq!(date.to_string(), "2019-02-21"));
///
/// let months = calendar.months();
/// assert_eq!(months[0].caption, "February 2019");
/// ```
pub struct Calendar<P = EnglishLocaleData> {
    default_locale: String,
    options: CalendarOptions,
    formats: LocaleFormats<P>,
    navigation: NavigationState,
    binding: ValueBinding,

    grids: Vec<(MonthKey, MonthGrid)>,
    grids_generation: u64,
}

impl<P> std::fmt::Debug for Calendar<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calendar")
            .field("default_locale", &self.default_locale)
            .field("options", &self.options)
            .field("navigation", &self.navigation)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl Calendar {
    /// A calendar using the built-in English locale data.
    ///
    /// `default_locale` is used whenever [`CalendarOptions::locale`] is unset.
    pub fn new(
        today: CalendarDate,
        default_locale: impl Into<String>,
        options: CalendarOptions,
    ) -> Self {
        Self::with_provider(today, default_locale, options, EnglishLocaleData)
    }

    /// Like [`Self::new`], with today's date from the local system clock.
    #[cfg(feature = "clock")]
    pub fn with_system_clock(default_locale: impl Into<String>, options: CalendarOptions) -> Self {
        Self::new(chrono::Local::now().date_naive(), default_locale, options)
    }
}

impl<P: LocaleData> Calendar<P> {
    pub fn with_provider(
        today: CalendarDate,
        default_locale: impl Into<String>,
        options: CalendarOptions,
        provider: P,
    ) -> Self {
        let mut navigation =
            NavigationState::new(today).with_stepper_threshold(options.stepper_threshold);
        navigation.set_view_size(options.view_size);
        navigation.set_anchor_month(options.anchor_month);

        Self {
            default_locale: default_locale.into(),
            options,
            formats: LocaleFormats::new(provider),
            navigation,
            binding: ValueBinding::default(),
            grids: Vec::new(),
            grids_generation: 0,
        }
    }

    /// Build the displayed months for the first time.
    ///
    /// Call once the host has written its initial value, if any. Later calls do nothing.
    pub fn attach(&mut self) {
        if self.navigation.attach() {
            self.sync_grids();
        }
    }

    pub fn handle(&mut self, event: CalendarEvent) -> CalendarResponse {
        let generation = self.navigation.generation();
        let mut response = CalendarResponse::default();

        match event {
            CalendarEvent::DayActivated(date) => {
                response.value_changed = self.binding.confirm_selection(date, self.options.min);
                if let Some(date) = response.value_changed {
                    self.navigation.select(date);
                }
            }
            CalendarEvent::KeyPressed(key) => {
                if let Some(days) = key_to_day_step(key) {
                    self.navigation.step_active_date(days);
                    response.prevent_default = true;
                    response.focus_scheduled = true;
                } else {
                    log::trace!("Ignoring key {key:?}");
                }
            }
            CalendarEvent::DayStepRequested(days) => {
                self.navigation.step_active_date(days);
                response.focus_scheduled = true;
            }
            CalendarEvent::MonthStepRequested(months) => {
                self.navigation.step_active_month(months);
            }
            CalendarEvent::ViewSizeChanged(view_size) => {
                self.options.view_size = view_size;
                self.navigation.set_view_size(view_size);
            }
            CalendarEvent::AnchorMonthChanged(anchor_month) => {
                self.options.anchor_month = anchor_month;
                self.navigation.set_anchor_month(anchor_month);
            }
            CalendarEvent::ExternalValueWritten(raw) => {
                if let Some(date) = self.binding.write_value(&raw) {
                    self.navigation.on_external_select(date);
                }
            }
            CalendarEvent::DisabledStateChanged(disabled) => {
                self.binding.set_disabled(disabled);
            }
        }

        response.months_changed = self.navigation.generation() != generation;
        self.sync_grids();
        response
    }

    /// Run a pending focus move, now that the latest render is on screen.
    ///
    /// Returns `true` if `host` was asked to move focus.
    pub fn after_render(&mut self, host: &mut impl FocusHost) -> bool {
        if let Some(date) = self.navigation.take_focus_request() {
            host.focus_active_cell(date);
            true
        } else {
            false
        }
    }

    /// Render state of every displayed month. Empty until [`Self::attach`].
    pub fn months(&mut self) -> Vec<MonthView> {
        let ctx = self.cell_context();
        let first_day_of_week = self.first_day_of_week();
        let show_stepper = self.navigation.shows_stepper();
        let locale = self.options.locale.as_deref().unwrap_or(&self.default_locale);
        let pattern = self.options.month_and_year_format.as_deref();

        self.grids
            .iter()
            .map(|(key, grid)| MonthView {
                key: *key,
                month: grid.month(),
                caption: self.formats.month_and_year(grid.month(), locale, pattern),
                days: Arc::clone(grid.days()),
                first_day_of_month: grid.first_day_of_month(),
                leading_blanks: grid.leading_blanks(first_day_of_week),
                show_stepper,
                cells: grid.cells(&ctx).collect(),
            })
            .collect()
    }

    /// Caption of `month`, using the configured pattern or the locale's.
    pub fn month_and_year(&mut self, month: Month) -> String {
        let locale = self.options.locale.as_deref().unwrap_or(&self.default_locale);
        let pattern = self.options.month_and_year_format.as_deref();
        self.formats.month_and_year(month, locale, pattern)
    }

    /// Weekday header labels, starting on [`Self::first_day_of_week`].
    ///
    /// Headers that show wide names with narrow ones for small screens ask for both.
    pub fn weekday_names(&mut self, width: TranslationWidth) -> Vec<String> {
        let first_day_of_week = self.first_day_of_week();
        let locale = self.options.locale.as_deref().unwrap_or(&self.default_locale);
        self.formats
            .ordered_weekday_names(locale, width, first_day_of_week)
    }

    /// The configured first day of the week, or the locale's.
    pub fn first_day_of_week(&self) -> Weekday {
        self.options
            .first_day_of_week
            .unwrap_or_else(|| self.formats.first_day_of_week(self.locale()))
    }

    /// Lowercase identifier of [`Self::first_day_of_week`], e.g. `"monday"`.
    pub fn first_day_of_week_identifier(&self) -> &'static str {
        weekday_identifier(self.first_day_of_week())
    }

    /// Stable key of the displayed month at `index`.
    pub fn month_key(&self, index: usize, month: Month) -> MonthKey {
        if self.navigation.shows_stepper() {
            MonthKey::Position(index)
        } else {
            MonthKey::Month(month)
        }
    }

    // ------------------------------------------------------------------------

    pub fn locale(&self) -> &str {
        self.options.locale.as_deref().unwrap_or(&self.default_locale)
    }

    /// `None` or an empty locale falls back to the default locale.
    pub fn set_locale(&mut self, locale: Option<String>) {
        self.options.locale = locale.filter(|locale| !locale.is_empty());
    }

    pub fn set_min(&mut self, min: Option<CalendarDate>) {
        self.options.min = min;
    }

    pub fn set_month_and_year_format(&mut self, pattern: Option<String>) {
        self.options.month_and_year_format = pattern;
    }

    pub fn set_first_day_of_week(&mut self, first_day_of_week: Option<Weekday>) {
        self.options.first_day_of_week = first_day_of_week;
    }

    pub fn set_stepper_threshold(&mut self, stepper_threshold: ViewSize) {
        self.options.stepper_threshold = stepper_threshold;
        self.navigation.set_stepper_threshold(stepper_threshold);
        self.sync_grids();
    }

    /// Register the host's change listener.
    pub fn binding_mut(&mut self) -> &mut ValueBinding {
        &mut self.binding
    }

    pub fn binding(&self) -> &ValueBinding {
        &self.binding
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn options(&self) -> &CalendarOptions {
        &self.options
    }

    pub fn formats(&self) -> &LocaleFormats<P> {
        &self.formats
    }

    #[inline]
    pub fn value(&self) -> Option<CalendarDate> {
        self.binding.value()
    }

    #[inline]
    pub fn active_date(&self) -> CalendarDate {
        self.navigation.active_date()
    }

    #[inline]
    pub fn displayed_months(&self) -> &[Month] {
        self.navigation.displayed_months()
    }

    #[inline]
    pub fn shows_stepper(&self) -> bool {
        self.navigation.shows_stepper()
    }

    fn cell_context(&self) -> CellContext {
        CellContext {
            selected: self.binding.value(),
            active: self.navigation.active_date(),
            min: self.options.min,
            today: self.navigation.today(),
        }
    }

    /// Bring the month grids in line with the displayed months.
    ///
    /// A grid is reused when its key survives, and only rebuilt if its month changed.
    fn sync_grids(&mut self) {
        if self.grids_generation == self.navigation.generation() {
            return;
        }
        self.grids_generation = self.navigation.generation();

        let displayed = Arc::clone(self.navigation.displayed_months());
        let mut previous = std::mem::take(&mut self.grids);

        self.grids = displayed
            .iter()
            .enumerate()
            .map(|(index, &month)| {
                let key = self.month_key(index, month);
                let grid = match previous.iter().position(|(k, _)| *k == key) {
                    Some(i) => {
                        let (_, mut grid) = previous.swap_remove(i);
                        grid.set_month(month.first_day());
                        grid
                    }
                    None => MonthGrid::new(month),
                };
                (key, grid)
            })
            .collect();
    }
}
