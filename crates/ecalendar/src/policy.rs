//! Which dates can be picked, and how keys map to navigation steps.

use crate::CalendarDate;

/// Is `date` before the minimum?
///
/// The minimum itself is selectable. There is no upper bound.
#[inline]
pub fn is_disabled(date: CalendarDate, min: Option<CalendarDate>) -> bool {
    min.is_some_and(|min| date < min)
}

/// Can `date` be picked, given the current selection?
///
/// Re-picking the selected date is not a selection.
#[inline]
pub fn is_selectable(
    date: CalendarDate,
    selected: Option<CalendarDate>,
    min: Option<CalendarDate>,
) -> bool {
    !is_disabled(date, min) && selected != Some(date)
}

/// A key press, as far as calendar navigation is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,

    /// Anything else. Never handled, so the host keeps its default behavior.
    Other,
}

impl NavKey {
    /// Parse a DOM-style key name (`"ArrowLeft"`, `"Left"`, …).
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            _ => Self::Other,
        }
    }
}

/// Days to move the active date for `key`, or `None` if the key doesn't navigate.
///
/// `None` also means the host must not prevent the key's default action.
pub fn key_to_day_step(key: NavKey) -> Option<i64> {
    match key {
        NavKey::ArrowLeft => Some(-1),
        NavKey::ArrowRight => Some(1),
        NavKey::ArrowUp => Some(-7),
        NavKey::ArrowDown => Some(7),
        NavKey::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::date::add_days;

    #[test]
    fn min_bound_is_inclusive() {
        let min = NaiveDate::from_ymd_opt(2019, 2, 14).unwrap();
        assert!(!is_disabled(min, Some(min)));
        assert!(is_disabled(add_days(min, -1), Some(min)));
        assert!(!is_disabled(add_days(min, 1), Some(min)));
        assert!(!is_disabled(NaiveDate::MIN, None));
    }

    #[test]
    fn reselecting_is_not_selectable() {
        let day = NaiveDate::from_ymd_opt(2019, 2, 14).unwrap();
        assert!(!is_selectable(day, Some(day), None));
        assert!(is_selectable(day, None, None));
        assert!(is_selectable(day, Some(add_days(day, 1)), Some(day)));
        assert!(!is_selectable(add_days(day, -1), None, Some(day)));
    }

    #[test]
    fn arrow_keys() {
        assert_eq!(key_to_day_step(NavKey::ArrowLeft), Some(-1));
        assert_eq!(key_to_day_step(NavKey::ArrowRight), Some(1));
        assert_eq!(key_to_day_step(NavKey::ArrowUp), Some(-7));
        assert_eq!(key_to_day_step(NavKey::ArrowDown), Some(7));
        assert_eq!(key_to_day_step(NavKey::Other), None);
        assert_eq!(key_to_day_step(NavKey::from_name("Tab")), None);
        assert_eq!(key_to_day_step(NavKey::from_name("Down")), Some(7));
    }
}
