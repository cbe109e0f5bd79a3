//! Day-granular date arithmetic.
//!
//! All functions here are pure. Month arithmetic keeps the day-of-month and lets it
//! overflow into the following month, the way a native date object rolls over:
//! `2019-01-31` plus one month is `2019-03-03`, not `2019-02-28`.

use chrono::{DateTime, Datelike as _, Days, NaiveDate, NaiveDateTime, TimeZone, Weekday};

/// A point in time truncated to day granularity.
///
/// Two values are equal iff year, month and day-of-month are equal.
pub type CalendarDate = NaiveDate;

/// A calendar page: a [`CalendarDate`] truncated to the first day of its month.
///
/// Two months are equal iff year and month index match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Month(CalendarDate);

impl Month {
    /// `month` is 1-based. Returns `None` for an out-of-range month or year.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month containing `date`.
    #[inline]
    pub fn of(date: CalendarDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Day 1 of this month.
    #[inline]
    pub fn first_day(self) -> CalendarDate {
        self.0
    }

    #[inline]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// 1-based month index.
    #[inline]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Step by whole months, adjusting the year as needed.
    ///
    /// Saturates at the bounds of the representable calendar.
    pub fn add(self, months: i32) -> Self {
        let total = i64::from(self.year()) * 12 + i64::from(self.0.month0()) + i64::from(months);
        let year = total.div_euclid(12);
        let month0 = total.rem_euclid(12) as u32;
        i32::try_from(year)
            .ok()
            .and_then(|year| Self::new(year, month0 + 1))
            .unwrap_or_else(|| {
                if months < 0 {
                    Self(NaiveDate::MIN)
                } else {
                    Self::of(NaiveDate::MAX)
                }
            })
    }

    /// Number of days in this month, leap-year aware.
    pub fn num_days(self) -> u32 {
        let next = self.add(1).first_day();
        if next <= self.0 {
            // Last representable month.
            return NaiveDate::MAX.day();
        }
        next.signed_duration_since(self.0).num_days() as u32
    }

    /// Does `date` fall within this month?
    #[inline]
    pub fn contains(self, date: CalendarDate) -> bool {
        is_same_month(self.0, date)
    }
}

impl From<CalendarDate> for Month {
    #[inline]
    fn from(date: CalendarDate) -> Self {
        Self::of(date)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

// ----------------------------------------------------------------------------

/// Anything that can be truncated to a [`CalendarDate`].
pub trait StartOfDay {
    fn start_of_day(&self) -> CalendarDate;
}

impl StartOfDay for NaiveDate {
    #[inline]
    fn start_of_day(&self) -> CalendarDate {
        *self
    }
}

impl StartOfDay for NaiveDateTime {
    #[inline]
    fn start_of_day(&self) -> CalendarDate {
        self.date()
    }
}

impl<Tz: TimeZone> StartOfDay for DateTime<Tz> {
    #[inline]
    fn start_of_day(&self) -> CalendarDate {
        self.date_naive()
    }
}

/// Drop the time-of-day, keeping year, month and day.
#[inline]
pub fn start_of_day(date: &impl StartOfDay) -> CalendarDate {
    date.start_of_day()
}

/// The first day of the month of `date`.
#[inline]
pub fn start_of_month(date: CalendarDate) -> Month {
    Month::of(date)
}

/// Offset by `days` (negative allowed). Saturates at the bounds of the calendar.
pub fn add_days(date: CalendarDate, days: i64) -> CalendarDate {
    let result = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    result.unwrap_or(if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

/// Set the day-of-month, letting out-of-range days roll into neighbouring months.
///
/// Day `0` is the last day of the previous month; day 32 of a 31-day month is the
/// first of the next one.
#[inline]
pub fn set_date(date: CalendarDate, day_of_month: i64) -> CalendarDate {
    add_days(Month::of(date).first_day(), day_of_month - 1)
}

/// Offset by `months`, keeping the day-of-month and letting it overflow.
///
/// `add_months(2019-01-31, 1) == 2019-03-03`.
pub fn add_months(date: CalendarDate, months: i32) -> CalendarDate {
    let target = Month::of(date).add(months);
    set_date(target.first_day(), i64::from(date.day()))
}

/// Move `date` to `weekday` within its Sunday-based week.
pub fn set_day_of_week(date: CalendarDate, weekday: Weekday) -> CalendarDate {
    let delta = i64::from(weekday.num_days_from_sunday())
        - i64::from(date.weekday().num_days_from_sunday());
    add_days(date, delta)
}

#[inline]
pub fn is_same_date(a: CalendarDate, b: CalendarDate) -> bool {
    a == b
}

/// Same year and month index; the day is ignored.
#[inline]
pub fn is_same_month(a: CalendarDate, b: CalendarDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Strictly later, at day granularity.
#[inline]
pub fn is_after(a: CalendarDate, b: CalendarDate) -> bool {
    a > b
}

/// Number of days in the month of `date`.
#[inline]
pub fn days_in_month(date: CalendarDate) -> u32 {
    Month::of(date).num_days()
}

/// `YYYY-MM-DD`.
pub fn to_iso_date_string(date: CalendarDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Lowercase English identifier of a weekday, e.g. `"monday"`.
pub fn weekday_identifier(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn start_of_day_drops_time_and_is_idempotent() {
        let dt = ymd(2019, 2, 14).and_hms_opt(23, 59, 59).unwrap();
        let day = start_of_day(&dt);
        assert_eq!(day, ymd(2019, 2, 14));
        assert_eq!(start_of_day(&day), day);

        let utc = dt.and_utc();
        assert_eq!(start_of_day(&utc), day);
    }

    #[test]
    fn start_of_month_ignores_day() {
        assert_eq!(start_of_month(ymd(2019, 3, 14)).first_day(), ymd(2019, 3, 1));
        assert_eq!(start_of_month(ymd(2019, 3, 14)), Month::new(2019, 3).unwrap());
        assert_eq!(Month::of(ymd(2019, 3, 31)), Month::of(ymd(2019, 3, 1)));
    }

    #[test]
    fn add_days_rolls_over_month_and_year() {
        assert_eq!(add_days(ymd(2019, 1, 31), 1), ymd(2019, 2, 1));
        assert_eq!(add_days(ymd(2019, 1, 1), -1), ymd(2018, 12, 31));
        assert_eq!(add_days(ymd(2019, 2, 24), 7), ymd(2019, 3, 3));
        assert_eq!(add_days(NaiveDate::MAX, 1), NaiveDate::MAX);
        assert_eq!(add_days(NaiveDate::MIN, -1), NaiveDate::MIN);
    }

    /// Day-of-month overflows into the next month instead of clamping.
    /// Changing this to clamp is a behavior change for users stepping months.
    #[test]
    fn add_months_overflows_instead_of_clamping() {
        assert_eq!(add_months(ymd(2019, 1, 31), 1), ymd(2019, 3, 3));
        assert_eq!(add_months(ymd(2020, 1, 31), 1), ymd(2020, 3, 2));
        assert_eq!(add_months(ymd(2019, 3, 31), -1), ymd(2019, 3, 3));
    }

    #[test]
    fn add_months_across_years() {
        assert_eq!(add_months(ymd(2019, 12, 15), 1), ymd(2020, 1, 15));
        assert_eq!(add_months(ymd(2019, 1, 15), -1), ymd(2018, 12, 15));
        assert_eq!(add_months(ymd(2019, 2, 10), 24), ymd(2021, 2, 10));
        assert_eq!(add_months(ymd(2019, 2, 10), -14), ymd(2017, 12, 10));
    }

    #[test]
    fn add_months_round_trips_month_without_overflow() {
        let start = ymd(2019, 2, 14);
        for n in -30..30 {
            let there = add_months(start, n);
            assert!(is_same_month(add_months(there, -n), start), "n = {n}");
        }
    }

    #[test]
    fn set_date_overflows_both_ways() {
        let feb = ymd(2019, 2, 10);
        assert_eq!(set_date(feb, 1), ymd(2019, 2, 1));
        assert_eq!(set_date(feb, 28), ymd(2019, 2, 28));
        assert_eq!(set_date(feb, 29), ymd(2019, 3, 1));
        assert_eq!(set_date(feb, 0), ymd(2019, 1, 31));
    }

    #[test]
    fn set_day_of_week_stays_in_sunday_week() {
        // 2019-02-14 is a Thursday.
        assert_eq!(set_day_of_week(ymd(2019, 2, 14), Weekday::Sun), ymd(2019, 2, 10));
        assert_eq!(set_day_of_week(ymd(2019, 2, 14), Weekday::Sat), ymd(2019, 2, 16));
        assert_eq!(set_day_of_week(ymd(2019, 2, 14), Weekday::Thu), ymd(2019, 2, 14));
    }

    #[test]
    fn comparisons() {
        assert!(is_same_date(ymd(2019, 2, 14), ymd(2019, 2, 14)));
        assert!(!is_same_date(ymd(2019, 2, 14), ymd(2019, 2, 15)));
        assert!(is_same_month(ymd(2019, 2, 1), ymd(2019, 2, 28)));
        assert!(!is_same_month(ymd(2019, 2, 1), ymd(2020, 2, 1)));
        assert!(is_after(ymd(2019, 2, 15), ymd(2019, 2, 14)));
        assert!(!is_after(ymd(2019, 2, 14), ymd(2019, 2, 14)));
    }

    #[test]
    fn days_in_month_is_leap_year_aware() {
        assert_eq!(days_in_month(ymd(2019, 2, 10)), 28);
        assert_eq!(days_in_month(ymd(2020, 2, 10)), 29);
        assert_eq!(days_in_month(ymd(1900, 2, 1)), 28);
        assert_eq!(days_in_month(ymd(2000, 2, 1)), 29);
        assert_eq!(days_in_month(ymd(2019, 8, 1)), 31);
        assert_eq!(days_in_month(ymd(2019, 12, 31)), 31);
        assert_eq!(days_in_month(ymd(2019, 4, 30)), 30);
    }

    #[test]
    fn iso_string_and_identifiers() {
        assert_eq!(to_iso_date_string(ymd(2019, 2, 4)), "2019-02-04");
        assert_eq!(weekday_identifier(Weekday::Fri), "friday");
        assert_eq!(Month::new(2019, 3).unwrap().to_string(), "2019-03");
        assert_eq!(Month::new(2019, 13), None);
    }
}
