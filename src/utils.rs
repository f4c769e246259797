/// Calendar helpers and token parsers.
use crate::pattern::PatternValueType;

/// Converts string into unsigned number with bounds validation.
///
/// Only plain ASCII digits are accepted (leading zeros are fine, signs are not).
pub(crate) fn parse_digital_value(
    input: &str,
    min: PatternValueType,
    max: PatternValueType,
) -> Option<PatternValueType> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match input.parse::<PatternValueType>() {
        Ok(value) if value >= min && value <= max => Some(value),
        _ => None,
    }
}

/// Converts string with mnemonic value representation into its index in `values`.
pub(crate) fn parse_string_value(input: &str, values: &[&str]) -> Option<PatternValueType> {
    if input.is_empty() {
        None
    } else {
        values
            .iter()
            .position(|x| x.eq_ignore_ascii_case(input))
            .map(|i| i as PatternValueType)
    }
}

/// Returns `true` if provided year is leap.
#[inline]
pub(crate) fn is_leap_year(year: PatternValueType) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns number of days in specified month.
pub(crate) fn days_in_month(year: PatternValueType, month: PatternValueType) -> PatternValueType {
    if month == 0 || month > 12 {
        panic!("Invalid month: {month}");
    }

    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => unreachable!(),
    }
}

/// Returns `true` if the day exists in the specified month, no rollover to the neighbors.
pub(crate) fn is_valid_date(year: PatternValueType, month: PatternValueType, day: i32) -> bool {
    (1..=12).contains(&month) && day >= 1 && day <= days_in_month(year, month) as i32
}

/// Calculates day of week for specified date: 1 is Sunday, 7 is Saturday.
pub(crate) fn day_of_week(year: PatternValueType, month: PatternValueType, day: PatternValueType) -> PatternValueType {
    if !is_valid_date(year, month, day as i32) || year == 0 {
        panic!("Invalid date: {year:04}-{month:02}-{day:02}");
    }

    let month_offset: PatternValueType = if is_leap_year(year) {
        [0, 3, 4, 0, 2, 5, 0, 3, 6, 1, 4, 6]
    } else {
        [0, 3, 3, 6, 1, 4, 6, 2, 5, 0, 3, 5]
    }[(month - 1) as usize];

    let year = year - 1;

    (day + month_offset + 5 * (year % 4) + 4 * (year % 100) + 6 * (year % 400)) % 7 + 1
}

/// Returns `true` for Monday to Friday, `false` for weekends and for days outside the month.
pub(crate) fn is_weekday(year: PatternValueType, month: PatternValueType, day: i32) -> bool {
    is_valid_date(year, month, day) && (2..=6).contains(&day_of_week(year, month, day as PatternValueType))
}

/// Returns day in the month for the last specified day of the week.
pub(crate) fn last_dow(year: PatternValueType, month: PatternValueType, dow: PatternValueType) -> PatternValueType {
    if !(1..=7).contains(&dow) {
        panic!("Invalid day of week: {dow}");
    }

    let mut last_day = days_in_month(year, month);

    while day_of_week(year, month, last_day) != dow {
        last_day -= 1;
    }

    last_day
}

/// Returns date (day in the month) of the N-th occurrence of the specified day of the week,
/// `None` if the month has less than N such days.
pub(crate) fn nth_dow(
    year: PatternValueType,
    month: PatternValueType,
    dow: PatternValueType,
    n: PatternValueType,
) -> Option<PatternValueType> {
    if n == 0 || !(1..=7).contains(&dow) {
        return None;
    }

    let first_dow = day_of_week(year, month, 1);
    let day = 1 + (dow + 7 - first_dow) % 7 + (n - 1) * 7;

    (day <= days_in_month(year, month)).then_some(day)
}

/// Returns date of the weekday (not Sunday or Saturday) nearest to the specified date in the same month.
///
/// Candidates are checked in order `day`, `day+1`, `day-1`, `day+2`, `day-2`.
/// Returns `None` if `day` doesn't exist in the month.
pub(crate) fn nearest_weekday(year: PatternValueType, month: PatternValueType, day: i32) -> Option<PatternValueType> {
    if !is_valid_date(year, month, day) {
        return None;
    }

    [0, 1, -1, 2, -2]
        .into_iter()
        .map(|offset| day + offset)
        .find(|candidate| is_weekday(year, month, *candidate))
        .map(|day| day as PatternValueType)
}
