//! Locale-dependent month captions and weekday names.
//!
//! Locale data itself comes from a [`LocaleData`] provider.
//! [`LocaleFormats`] sits in front of a provider and memoizes what it derives, per locale.

use std::sync::{Arc, LazyLock};

use chrono::Weekday;

use crate::{
    Month,
    pattern::{DateSymbols, format_date},
};

/// Matches the day-of-month field of a long date pattern, with the separator that follows it.
static DAY_PART: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\s?d+(\.|,|\sde)?").expect("valid regex"));

/// The pattern used when neither the caller nor the provider has a better one.
pub const DEFAULT_MONTH_YEAR_PATTERN: &str = "MMMM y";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    #[error("Unsupported locale {0:?}")]
    Unsupported(String),

    #[error("Locale-aware month and year formatting is not available")]
    PartsUnavailable,
}

/// How long weekday names should be.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TranslationWidth {
    /// "Monday"
    #[default]
    Wide,

    /// "M"
    Narrow,
}

/// One piece of a formatted month-and-year, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Literal(String),

    /// A part with no month-and-year meaning. Dropped from derived patterns.
    Other,
}

/// Source of locale data.
///
/// Must answer synchronously. Implementations may be backed by CLDR tables,
/// the host platform, or a fixed set of locales.
pub trait LocaleData {
    /// The parts a long month plus numeric year formats to in `locale`, e.g.
    /// `[Month, Literal(" "), Year]` for English.
    ///
    /// # Errors
    /// If the locale is unknown, or the capability is missing in this environment.
    fn month_year_parts(&self, locale: &str) -> Result<Vec<DatePart>, LocaleError>;

    /// The long date pattern of `locale`, e.g. `"MMMM d, y"`.
    ///
    /// Must always return something, falling back to a generic pattern.
    fn long_date_pattern(&self, locale: &str) -> String;

    /// Seven weekday names starting on Sunday.
    fn weekday_names(&self, locale: &str, width: TranslationWidth) -> [String; 7];

    fn first_day_of_week(&self, locale: &str) -> Weekday;

    /// Format a month using a CLDR-style `pattern`.
    fn format_month_year(&self, month: Month, locale: &str, pattern: &str) -> String;
}

impl<T: LocaleData + ?Sized> LocaleData for Box<T> {
    fn month_year_parts(&self, locale: &str) -> Result<Vec<DatePart>, LocaleError> {
        (**self).month_year_parts(locale)
    }

    fn long_date_pattern(&self, locale: &str) -> String {
        (**self).long_date_pattern(locale)
    }

    fn weekday_names(&self, locale: &str, width: TranslationWidth) -> [String; 7] {
        (**self).weekday_names(locale, width)
    }

    fn first_day_of_week(&self, locale: &str) -> Weekday {
        (**self).first_day_of_week(locale)
    }

    fn format_month_year(&self, month: Month, locale: &str, pattern: &str) -> String {
        (**self).format_month_year(month, locale, pattern)
    }
}

// ----------------------------------------------------------------------------

/// Build a pattern from formatted parts: the year becomes `y`, the month `MMMM`,
/// and literals are quoted.
pub fn pattern_from_parts(parts: &[DatePart]) -> String {
    let mut pattern = String::new();
    for part in parts {
        match part {
            DatePart::Year => pattern.push('y'),
            DatePart::Month => pattern.push_str("MMMM"),
            DatePart::Literal(text) => {
                pattern.push('\'');
                pattern.push_str(&text.replace('\'', "''"));
                pattern.push('\'');
            }
            DatePart::Other => {}
        }
    }
    pattern
}

/// Remove the day-of-month field from a long date pattern.
///
/// `"MMMM d, y"` becomes `"MMMM y"`, `"d. MMMM y"` becomes `"MMMM y"`.
pub fn strip_day_part(long_date_pattern: &str) -> String {
    DAY_PART.replace(long_date_pattern, "").trim().to_owned()
}

/// Memoizing front of a [`LocaleData`] provider.
///
/// Caches grow with every distinct locale seen, which is fine for the small,
/// static set of locales a process uses.
pub struct LocaleFormats<P> {
    provider: P,
    month_year_patterns: ahash::HashMap<String, Arc<str>>,
    fallback_patterns: ahash::HashMap<String, Arc<str>>,
    weekday_names: ahash::HashMap<(String, TranslationWidth), Arc<[String; 7]>>,
}

impl<P: Default> Default for LocaleFormats<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P> std::fmt::Debug for LocaleFormats<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleFormats")
            .field("cached_locales", &self.month_year_patterns.len())
            .finish_non_exhaustive()
    }
}

impl<P> LocaleFormats<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            month_year_patterns: Default::default(),
            fallback_patterns: Default::default(),
            weekday_names: Default::default(),
        }
    }

    #[inline]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Number of memoized entries, over all caches.
    pub fn cache_len(&self) -> usize {
        self.month_year_patterns.len() + self.fallback_patterns.len() + self.weekday_names.len()
    }
}

impl<P: LocaleData> LocaleFormats<P> {
    /// The month-and-year pattern of `locale`, derived from the provider's parts.
    ///
    /// Falls back to [`Self::fallback_month_year_pattern`] when the provider can't
    /// format the locale.
    pub fn month_year_pattern(&mut self, locale: &str) -> Arc<str> {
        if let Some(pattern) = self.month_year_patterns.get(locale) {
            return Arc::clone(pattern);
        }

        let pattern = match self.provider.month_year_parts(locale) {
            Ok(parts) => Arc::<str>::from(pattern_from_parts(&parts)),
            Err(err) => {
                log::debug!("{err}; deriving the month and year pattern from the long date format");
                self.fallback_month_year_pattern(locale)
            }
        };
        self.month_year_patterns
            .insert(locale.to_owned(), Arc::clone(&pattern));
        pattern
    }

    /// The long date pattern of `locale`, with the day field stripped.
    pub fn fallback_month_year_pattern(&mut self, locale: &str) -> Arc<str> {
        if let Some(pattern) = self.fallback_patterns.get(locale) {
            return Arc::clone(pattern);
        }

        let stripped = strip_day_part(&self.provider.long_date_pattern(locale));
        let pattern: Arc<str> = if stripped.is_empty() {
            DEFAULT_MONTH_YEAR_PATTERN.into()
        } else {
            stripped.into()
        };
        self.fallback_patterns
            .insert(locale.to_owned(), Arc::clone(&pattern));
        pattern
    }

    /// Seven weekday names starting on Sunday.
    pub fn weekday_names(&mut self, locale: &str, width: TranslationWidth) -> Arc<[String; 7]> {
        let provider = &self.provider;
        Arc::clone(
            self.weekday_names
                .entry((locale.to_owned(), width))
                .or_insert_with(|| Arc::new(provider.weekday_names(locale, width))),
        )
    }

    /// Weekday names in display order, starting on `first_day`.
    pub fn ordered_weekday_names(
        &mut self,
        locale: &str,
        width: TranslationWidth,
        first_day: Weekday,
    ) -> Vec<String> {
        let names = self.weekday_names(locale, width);
        let offset = first_day.num_days_from_sunday() as usize;
        (0..7).map(|i| names[(offset + i) % 7].clone()).collect()
    }

    #[inline]
    pub fn first_day_of_week(&self, locale: &str) -> Weekday {
        self.provider.first_day_of_week(locale)
    }

    /// Caption of a month: `pattern` if given, otherwise the locale's month-and-year pattern.
    pub fn month_and_year(&mut self, month: Month, locale: &str, pattern: Option<&str>) -> String {
        match pattern {
            Some(pattern) => self.provider.format_month_year(month, locale, pattern),
            None => {
                let pattern = self.month_year_pattern(locale);
                self.provider.format_month_year(month, locale, &pattern)
            }
        }
    }
}

// ----------------------------------------------------------------------------

/// English names, as in CLDR `en`. Wide month names come from [`chrono::Month::name`].
pub static ENGLISH_SYMBOLS: LazyLock<DateSymbols> = LazyLock::new(|| DateSymbols {
    months_wide: chrono_month_names(),
    months_abbreviated: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    months_narrow: ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"],
    weekdays_wide: [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ],
    weekdays_abbreviated: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    weekdays_narrow: ["S", "M", "T", "W", "T", "F", "S"],
});

/// January first.
fn chrono_month_names() -> [&'static str; 12] {
    let mut month = chrono::Month::January;
    std::array::from_fn(|_| {
        let name = month.name();
        month = month.succ();
        name
    })
}

/// Built-in provider with English data.
///
/// Only `en` and its regional variants (`en-US`, `en_GB`, …) are supported;
/// [`LocaleData::month_year_parts`] reports every other locale as unsupported,
/// which makes [`LocaleFormats`] use its fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishLocaleData;

impl EnglishLocaleData {
    fn is_english(locale: &str) -> bool {
        primary_subtag(locale).eq_ignore_ascii_case("en")
    }
}

/// `"en"` for `"en-US"` and `"en_US"`.
pub fn primary_subtag(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

impl LocaleData for EnglishLocaleData {
    fn month_year_parts(&self, locale: &str) -> Result<Vec<DatePart>, LocaleError> {
        if Self::is_english(locale) {
            Ok(vec![
                DatePart::Month,
                DatePart::Literal(" ".to_owned()),
                DatePart::Year,
            ])
        } else {
            Err(LocaleError::Unsupported(locale.to_owned()))
        }
    }

    fn long_date_pattern(&self, locale: &str) -> String {
        if Self::is_english(locale) {
            "MMMM d, y".to_owned()
        } else {
            // CLDR root
            "y MMMM d".to_owned()
        }
    }

    fn weekday_names(&self, _locale: &str, width: TranslationWidth) -> [String; 7] {
        let names = match width {
            TranslationWidth::Wide => ENGLISH_SYMBOLS.weekdays_wide,
            TranslationWidth::Narrow => ENGLISH_SYMBOLS.weekdays_narrow,
        };
        names.map(str::to_owned)
    }

    fn first_day_of_week(&self, locale: &str) -> Weekday {
        if Self::is_english(locale) {
            Weekday::Sun
        } else {
            Weekday::Mon
        }
    }

    fn format_month_year(&self, month: Month, _locale: &str, pattern: &str) -> String {
        format_date(month.first_day(), pattern, &ENGLISH_SYMBOLS)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts provider calls, and pretends `hu` can only be formatted through the fallback.
    #[derive(Default)]
    struct CountingData {
        parts_calls: Cell<usize>,
        long_calls: Cell<usize>,
        names_calls: Cell<usize>,
    }

    impl LocaleData for CountingData {
        fn month_year_parts(&self, locale: &str) -> Result<Vec<DatePart>, LocaleError> {
            self.parts_calls.set(self.parts_calls.get() + 1);
            match locale {
                "de" => Ok(vec![
                    DatePart::Month,
                    DatePart::Literal(" ".to_owned()),
                    DatePart::Year,
                ]),
                "zh" => Ok(vec![
                    DatePart::Year,
                    DatePart::Literal("年".to_owned()),
                    DatePart::Month,
                    DatePart::Other,
                ]),
                _ => Err(LocaleError::Unsupported(locale.to_owned())),
            }
        }

        fn long_date_pattern(&self, locale: &str) -> String {
            self.long_calls.set(self.long_calls.get() + 1);
            match locale {
                "hu" => "y. MMMM d.".to_owned(),
                "es" => "d 'de' MMMM 'de' y".to_owned(),
                _ => "d".to_owned(),
            }
        }

        fn weekday_names(&self, _locale: &str, _width: TranslationWidth) -> [String; 7] {
            self.names_calls.set(self.names_calls.get() + 1);
            ["S", "M", "T", "W", "T", "F", "S"].map(str::to_owned)
        }

        fn first_day_of_week(&self, _locale: &str) -> Weekday {
            Weekday::Mon
        }

        fn format_month_year(&self, month: Month, _locale: &str, pattern: &str) -> String {
            format!("{pattern}|{month}")
        }
    }

    #[test]
    fn pattern_from_formatted_parts() {
        let mut formats = LocaleFormats::new(CountingData::default());
        assert_eq!(&*formats.month_year_pattern("de"), "MMMM' 'y");
        assert_eq!(&*formats.month_year_pattern("zh"), "y'年'MMMM");
    }

    #[test]
    fn patterns_are_memoized_per_locale() {
        let mut formats = LocaleFormats::new(CountingData::default());
        let first = formats.month_year_pattern("de");
        let second = formats.month_year_pattern("de");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(formats.provider().parts_calls.get(), 1);

        formats.month_year_pattern("zh");
        assert_eq!(formats.provider().parts_calls.get(), 2);
    }

    #[test]
    fn unsupported_locale_uses_long_date_pattern_without_day() {
        let mut formats = LocaleFormats::new(CountingData::default());
        assert_eq!(&*formats.month_year_pattern("hu"), "y. MMMM");
        assert_eq!(&*formats.month_year_pattern("hu"), "y. MMMM");
        assert_eq!(formats.provider().long_calls.get(), 1);
        assert_eq!(formats.provider().parts_calls.get(), 1);
    }

    #[test]
    fn fallback_never_returns_an_empty_pattern() {
        let mut formats = LocaleFormats::new(CountingData::default());
        assert_eq!(&*formats.month_year_pattern("xx"), DEFAULT_MONTH_YEAR_PATTERN);
    }

    #[test]
    fn strip_day_part_of_common_long_patterns() {
        assert_eq!(strip_day_part("MMMM d, y"), "MMMM y");
        assert_eq!(strip_day_part("d MMMM y"), "MMMM y");
        assert_eq!(strip_day_part("d. MMMM y"), "MMMM y");
        assert_eq!(strip_day_part("y. MMMM d."), "y. MMMM");
        assert_eq!(strip_day_part("d 'de' MMMM 'de' y"), "'de' MMMM 'de' y");
        assert_eq!(strip_day_part("y MMMM d"), "y MMMM");
    }

    #[test]
    fn weekday_names_are_memoized_per_locale_and_width() {
        let mut formats = LocaleFormats::new(CountingData::default());
        let wide = formats.weekday_names("de", TranslationWidth::Wide);
        let again = formats.weekday_names("de", TranslationWidth::Wide);
        assert!(Arc::ptr_eq(&wide, &again));
        formats.weekday_names("de", TranslationWidth::Narrow);
        formats.weekday_names("fr", TranslationWidth::Narrow);
        assert_eq!(formats.provider().names_calls.get(), 3);
        assert_eq!(formats.cache_len(), 3);
    }

    #[test]
    fn caption_prefers_the_explicit_pattern() {
        let mut formats = LocaleFormats::new(CountingData::default());
        let june = Month::new(2019, 6).unwrap();
        assert_eq!(formats.month_and_year(june, "de", Some("y. MMM")), "y. MMM|2019-06");
        assert_eq!(formats.provider().parts_calls.get(), 0);
        assert_eq!(formats.month_and_year(june, "de", None), "MMMM' 'y|2019-06");
    }

    #[test]
    fn english_provider() {
        let mut formats = LocaleFormats::new(EnglishLocaleData);
        let june = Month::new(2019, 6).unwrap();
        assert_eq!(formats.month_and_year(june, "en-US", None), "June 2019");
        assert_eq!(formats.month_and_year(june, "en-US", Some("y. MMM")), "2019. Jun");

        // Unsupported locales still get a caption through the fallback.
        assert_eq!(&*formats.month_year_pattern("hu"), "y MMMM");
        assert_eq!(formats.month_and_year(june, "hu", None), "2019 June");

        assert_eq!(formats.first_day_of_week("en_GB"), Weekday::Sun);
        assert_eq!(formats.first_day_of_week("de-DE"), Weekday::Mon);
    }

    #[test]
    fn english_month_names_run_january_to_december() {
        let names = ENGLISH_SYMBOLS.months_wide;
        assert_eq!(names[0], "January");
        assert_eq!(names[1], "February");
        assert_eq!(names[11], "December");
        for (wide, abbreviated) in names.iter().zip(ENGLISH_SYMBOLS.months_abbreviated) {
            assert!(wide.starts_with(abbreviated), "{wide} / {abbreviated}");
        }
    }

    #[test]
    fn ordered_weekday_names_start_on_first_day() {
        let mut formats = LocaleFormats::new(EnglishLocaleData);
        let names = formats.ordered_weekday_names("en", TranslationWidth::Wide, Weekday::Mon);
        assert_eq!(names.first().map(String::as_str), Some("Monday"));
        assert_eq!(names.last().map(String::as_str), Some("Sunday"));
        assert_eq!(names.len(), 7);
    }
}
