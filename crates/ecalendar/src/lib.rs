//! View state for calendar date pickers: which months are shown, which day is active,
//! selected or disabled, and how navigation moves between them.
//!
//! `ecalendar` does no rendering. A renderer draws what [`Calendar::months`] returns,
//! and reports clicks, key presses and host value writes back through
//! [`Calendar::handle`].
//!
//! Dates are day-granular [`chrono::NaiveDate`]s, aliased as [`CalendarDate`].
//! Locale data (month names, patterns, week starts) comes from a [`LocaleData`]
//! provider. [`EnglishLocaleData`] is built in.
//!
//! ## Feature flags
#![cfg_attr(feature = "document-features", doc = document_features::document_features!())]
//!

#![forbid(unsafe_code)]

mod calendar;
pub mod date;
pub mod grid;
pub mod locale;
pub mod modal;
pub mod navigation;
pub mod pattern;
pub mod policy;
pub mod value;

pub use crate::{
    calendar::{
        Calendar, CalendarEvent, CalendarOptions, CalendarResponse, FocusHost, MonthKey,
        MonthView,
    },
    date::{CalendarDate, Month},
    grid::{DayCell, MonthGrid},
    locale::{DatePart, EnglishLocaleData, LocaleData, LocaleError, LocaleFormats, TranslationWidth},
    modal::ModalState,
    navigation::{NavigationMode, NavigationState, ViewSize, ViewSizeError},
    policy::NavKey,
    value::{RawValue, ValueBinding},
};
