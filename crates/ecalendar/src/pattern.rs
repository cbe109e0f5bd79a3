//! CLDR-style date patterns, such as `"MMMM y"` or `"y. MMM"`.
//!
//! Only the fields a calendar caption or day label needs are understood:
//! `y` (year), `M`/`L` (month), `d` (day), `E` (weekday).
//! Text inside single quotes is literal, and `''` is an escaped quote.
//! Any other character is copied verbatim.

use chrono::Datelike as _;

use crate::CalendarDate;

/// One piece of a tokenized pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternItem {
    /// A run of the same field letter, e.g. `MMMM` is `Field('M', 4)`.
    Field(char, usize),
    Literal(String),
}

/// Split a pattern into fields and literals.
pub fn tokenize(pattern: &str) -> Vec<PatternItem> {
    let mut items = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                literal.push('\'');
                continue;
            }
            // Quoted run, up to the closing quote (or end of pattern).
            while let Some(q) = chars.next() {
                if q == '\'' {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        literal.push('\'');
                    } else {
                        break;
                    }
                } else {
                    literal.push(q);
                }
            }
        } else if is_field_letter(c) {
            let mut width = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                width += 1;
            }
            if !literal.is_empty() {
                items.push(PatternItem::Literal(std::mem::take(&mut literal)));
            }
            items.push(PatternItem::Field(c, width));
        } else {
            literal.push(c);
        }
    }

    if !literal.is_empty() {
        items.push(PatternItem::Literal(literal));
    }
    items
}

fn is_field_letter(c: char) -> bool {
    matches!(c, 'y' | 'M' | 'L' | 'd' | 'E')
}

/// Month and weekday names used when formatting.
#[derive(Clone, Copy, Debug)]
pub struct DateSymbols {
    /// January first.
    pub months_wide: [&'static str; 12],
    pub months_abbreviated: [&'static str; 12],
    pub months_narrow: [&'static str; 12],

    /// Sunday first.
    pub weekdays_wide: [&'static str; 7],
    pub weekdays_abbreviated: [&'static str; 7],
    pub weekdays_narrow: [&'static str; 7],
}

/// Render `date` according to `pattern`.
pub fn format_date(date: CalendarDate, pattern: &str, symbols: &DateSymbols) -> String {
    let month0 = date.month0() as usize;
    let weekday = date.weekday().num_days_from_sunday() as usize;

    let mut out = String::with_capacity(pattern.len() + 8);
    for item in tokenize(pattern) {
        match item {
            PatternItem::Literal(text) => out.push_str(&text),
            PatternItem::Field('y', 2) => {
                out.push_str(&format!("{:02}", date.year().rem_euclid(100)));
            }
            PatternItem::Field('y', width) => {
                out.push_str(&format!("{:0width$}", date.year()));
            }
            PatternItem::Field('M' | 'L', 1) => out.push_str(&date.month().to_string()),
            PatternItem::Field('M' | 'L', 2) => out.push_str(&format!("{:02}", date.month())),
            PatternItem::Field('M' | 'L', 3) => out.push_str(symbols.months_abbreviated[month0]),
            PatternItem::Field('M' | 'L', 4) => out.push_str(symbols.months_wide[month0]),
            PatternItem::Field('M' | 'L', _) => out.push_str(symbols.months_narrow[month0]),
            PatternItem::Field('d', 1) => out.push_str(&date.day().to_string()),
            PatternItem::Field('d', _) => out.push_str(&format!("{:02}", date.day())),
            PatternItem::Field('E', 1..=3) => out.push_str(symbols.weekdays_abbreviated[weekday]),
            PatternItem::Field('E', 4) => out.push_str(symbols.weekdays_wide[weekday]),
            PatternItem::Field('E', _) => out.push_str(symbols.weekdays_narrow[weekday]),
            PatternItem::Field(letter, width) => {
                out.extend(std::iter::repeat_n(letter, width));
            }
        }
    }
    out
}
