//! The dates of a calendar page, and the per-day flags a renderer needs.

use std::sync::Arc;

use chrono::{Datelike as _, Weekday};

use crate::{CalendarDate, Month, date, policy};

/// Every date of `month`, day 1 through the last, in ascending order.
pub fn days_of_month(month: Month) -> Vec<CalendarDate> {
    let first = month.first_day();
    (0..month.num_days())
        .map(|offset| date::add_days(first, i64::from(offset)))
        .collect()
}

/// Lowercase weekday identifier of day 1 of `month`, e.g. `"friday"`.
pub fn first_weekday_name(month: Month) -> &'static str {
    date::weekday_identifier(month.first_day().weekday())
}

/// The seven weekdays in display order, starting on `first_day_of_week`.
pub fn week_starting(first_day_of_week: Weekday) -> [Weekday; 7] {
    let mut day = first_day_of_week;
    std::array::from_fn(|_| {
        let current = day;
        day = day.succ();
        current
    })
}

/// Ambient state that decides the flags of each [`DayCell`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellContext {
    pub selected: Option<CalendarDate>,
    pub active: CalendarDate,
    pub min: Option<CalendarDate>,
    pub today: CalendarDate,
}

/// A date of a displayed month plus its render flags.
///
/// Derived on demand from a [`MonthGrid`]; never stored on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DayCell {
    pub date: CalendarDate,
    pub is_selected: bool,
    pub is_disabled: bool,

    /// The one date in the tab order.
    pub is_active: bool,

    /// Today.
    pub is_current: bool,
}

impl DayCell {
    pub fn new(date: CalendarDate, ctx: &CellContext) -> Self {
        Self {
            date,
            is_selected: ctx.selected == Some(date),
            is_disabled: policy::is_disabled(date, ctx.min),
            is_active: ctx.active == date,
            is_current: ctx.today == date,
        }
    }
}

/// Dates of one month, rebuilt only when the month actually changes.
///
/// Setting a date from the month already shown keeps the previous [`Self::days`]
/// allocation, so callers can use [`Arc::ptr_eq`] for cheap change detection.
#[derive(Clone, Debug)]
pub struct MonthGrid {
    month: Month,
    days: Arc<[CalendarDate]>,
    first_day_of_month: &'static str,
}

impl MonthGrid {
    pub fn new(month: Month) -> Self {
        Self {
            month,
            days: days_of_month(month).into(),
            first_day_of_month: first_weekday_name(month),
        }
    }

    /// Show the month containing `date`.
    ///
    /// Returns `true` if the grid was rebuilt, `false` if `date` is in the current month.
    pub fn set_month(&mut self, date: CalendarDate) -> bool {
        if self.month.contains(date) {
            return false;
        }
        log::debug!("Rebuilding month grid {} -> {}", self.month, Month::of(date));
        *self = Self::new(Month::of(date));
        true
    }

    #[inline]
    pub fn month(&self) -> Month {
        self.month
    }

    #[inline]
    pub fn days(&self) -> &Arc<[CalendarDate]> {
        &self.days
    }

    /// Lowercase weekday identifier of day 1.
    #[inline]
    pub fn first_day_of_month(&self) -> &'static str {
        self.first_day_of_month
    }

    /// Number of empty cells before day 1 in a week starting on `first_day_of_week`.
    pub fn leading_blanks(&self, first_day_of_week: Weekday) -> usize {
        let first = self.month.first_day().weekday().num_days_from_sunday();
        ((first + 7 - first_day_of_week.num_days_from_sunday()) % 7) as usize
    }

    /// Rows of seven, padded with `None` before day 1 and after the last day.
    pub fn weeks(&self, first_day_of_week: Weekday) -> Vec<[Option<CalendarDate>; 7]> {
        let blanks = self.leading_blanks(first_day_of_week);
        let mut slots = std::iter::repeat_n(None, blanks)
            .chain(self.days.iter().copied().map(Some))
            .peekable();

        let mut weeks = Vec::with_capacity(6);
        while slots.peek().is_some() {
            weeks.push(std::array::from_fn(|_| slots.next().flatten()));
        }
        weeks
    }

    pub fn cells<'a>(&'a self, ctx: &'a CellContext) -> impl Iterator<Item = DayCell> + 'a {
        self.days.iter().map(move |&day| DayCell::new(day, ctx))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    #[test]
    fn days_of_month_is_complete_and_ascending() {
        for y in [2019, 2020] {
            for m in 1..=12 {
                let month = month(y, m);
                let days = days_of_month(month);
                assert_eq!(days.len() as u32, month.num_days());
                assert_eq!(days.first().map(|d| d.day()), Some(1));
                assert_eq!(days.last().map(|d| d.day()), Some(month.num_days()));
                for pair in days.windows(2) {
                    assert_eq!(date::add_days(pair[0], 1), pair[1]);
                }
            }
        }
        assert_eq!(days_of_month(month(2019, 2)).len(), 28);
        assert_eq!(days_of_month(month(2020, 2)).len(), 29);
    }

    #[test]
    fn first_weekday_name_is_lowercase() {
        assert_eq!(first_weekday_name(month(2019, 2)), "friday");
        assert_eq!(first_weekday_name(month(2019, 9)), "sunday");
    }

    #[test]
    fn same_month_keeps_days_by_reference() {
        let mut grid = MonthGrid::new(month(2019, 2));
        let days = Arc::clone(grid.days());

        assert!(!grid.set_month(ymd(2019, 2, 14)));
        assert!(Arc::ptr_eq(&days, grid.days()));
        assert_eq!(grid.month().first_day(), ymd(2019, 2, 1));

        assert!(grid.set_month(ymd(2019, 3, 14)));
        assert!(!Arc::ptr_eq(&days, grid.days()));
        assert_eq!(grid.month(), month(2019, 3));
        assert_eq!(grid.days().len(), 31);
        assert_eq!(grid.first_day_of_month(), "friday");
    }

    #[test]
    fn leading_blanks_depend_on_week_start() {
        // 2019-02-01 is a Friday.
        let grid = MonthGrid::new(month(2019, 2));
        assert_eq!(grid.leading_blanks(Weekday::Sun), 5);
        assert_eq!(grid.leading_blanks(Weekday::Mon), 4);
        assert_eq!(grid.leading_blanks(Weekday::Fri), 0);
        assert_eq!(grid.leading_blanks(Weekday::Sat), 6);
    }

    #[test]
    fn weeks_are_padded_rows_of_seven() {
        let grid = MonthGrid::new(month(2019, 2));
        let weeks = grid.weeks(Weekday::Mon);
        assert_eq!(weeks.len(), 5);
        assert_eq!(
            weeks[0],
            [
                None,
                None,
                None,
                None,
                Some(ymd(2019, 2, 1)),
                Some(ymd(2019, 2, 2)),
                Some(ymd(2019, 2, 3)),
            ]
        );
        assert_eq!(weeks[4][3], Some(ymd(2019, 2, 28)));
        assert_eq!(weeks[4][4], None);

        let days: Vec<_> = weeks.iter().flatten().flatten().copied().collect();
        assert_eq!(days, days_of_month(month(2019, 2)));
    }

    #[test]
    fn week_starting_wraps_around() {
        assert_eq!(
            week_starting(Weekday::Sat),
            [
                Weekday::Sat,
                Weekday::Sun,
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ]
        );
    }

    #[test]
    fn cell_flags() {
        let grid = MonthGrid::new(month(2019, 8));
        let ctx = CellContext {
            selected: Some(ymd(2019, 8, 14)),
            active: ymd(2019, 8, 1),
            min: Some(ymd(2019, 8, 10)),
            today: ymd(2019, 8, 20),
        };
        let cells: Vec<_> = grid.cells(&ctx).collect();
        assert_eq!(cells.len(), 31);

        let active: Vec<_> = cells.iter().filter(|c| c.is_active).map(|c| c.date).collect();
        assert_eq!(active, vec![ymd(2019, 8, 1)]);

        assert!(cells[13].is_selected);
        assert!(cells[8].is_disabled);
        assert!(!cells[9].is_disabled);
        assert!(cells[19].is_current);
        assert_eq!(cells.iter().filter(|c| c.is_disabled).count(), 9);
    }
}
