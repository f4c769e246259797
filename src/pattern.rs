use crate::{series::SeriesWithStep, utils, CronError, Result};
use std::collections::BTreeSet;

/// Minimum valid year.
pub const MIN_YEAR: u16 = 1970;
/// Maximum valid year.
pub const MAX_YEAR: u16 = 2199;

pub(crate) type PatternValueType = u16;

/// Sorted and de-duplicated set of values of a single schedule field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Pattern {
    values: Vec<PatternValueType>,
}

impl Pattern {
    /// Parses comma-separated list of values, ranges and repeating patterns.
    pub(crate) fn parse(type_: PatternType, input: &str) -> Result<Self> {
        let mut values = BTreeSet::new();

        for item in input.split(',') {
            let series = PatternItem::parse(type_, item)
                .and_then(|item| item.values(type_))
                .ok_or_else(|| type_.error(input))?;
            values.extend(series);
        }

        if values.is_empty() {
            return Err(type_.error(input));
        }

        Ok(Self {
            values: values.into_iter().collect(),
        })
    }

    #[inline]
    pub(crate) fn values(&self) -> &[PatternValueType] {
        &self.values
    }

    #[inline]
    pub(crate) fn contains(&self, value: PatternValueType) -> bool {
        self.values.binary_search(&value).is_ok()
    }
}

/// Returns the first (smallest) value which isn't less than `lower`.
#[inline]
pub(crate) fn first_from(values: &[PatternValueType], lower: PatternValueType) -> Option<PatternValueType> {
    values.iter().copied().find(|v| *v >= lower)
}

/// Returns the last (largest) value which isn't greater than `upper`.
#[inline]
pub(crate) fn last_up_to(values: &[PatternValueType], upper: PatternValueType) -> Option<PatternValueType> {
    values.iter().rev().copied().find(|v| *v <= upper)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum PatternType {
    Minutes,
    Hours,
    Doms,
    Months,
    Dows,
    Years,
}

impl PatternType {
    const DAYS_OF_WEEK: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
    const MONTHS: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];

    fn min_max(&self) -> (PatternValueType, PatternValueType) {
        match self {
            Self::Minutes => (0, 59),
            Self::Hours => (0, 23),
            Self::Doms => (1, 31),
            Self::Months => (1, 12),
            Self::Dows => (1, 7),
            Self::Years => (MIN_YEAR, MAX_YEAR),
        }
    }

    fn max_step(&self) -> PatternValueType {
        match self {
            Self::Years => MAX_YEAR - MIN_YEAR,
            _ => self.min_max().1,
        }
    }

    /// Builds field specific error.
    pub(crate) fn error(&self, input: &str) -> CronError {
        let input = input.to_owned();
        match self {
            Self::Minutes => CronError::InvalidMinuteValue(input),
            Self::Hours => CronError::InvalidHourValue(input),
            Self::Doms => CronError::InvalidDayOfMonthValue(input),
            Self::Months => CronError::InvalidMonthValue(input),
            Self::Dows => CronError::InvalidDayOfWeekValue(input),
            Self::Years => CronError::InvalidYearValue(input),
        }
    }

    /// Parses single value: number within the field's bounds or month/weekday name.
    fn parse(&self, input: &str) -> Option<PatternValueType> {
        let (min, max) = self.min_max();
        let variants: &[&str] = match self {
            Self::Months => &Self::MONTHS,
            Self::Dows => &Self::DAYS_OF_WEEK,
            _ => &[],
        };

        utils::parse_digital_value(input, min, max)
            .or_else(|| utils::parse_string_value(input, variants).map(|v| v + 1))
    }
}

/// Single element of a comma-separated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum PatternItem {
    All,
    Particular(PatternValueType),
    // start-finish
    Range(PatternValueType, PatternValueType),
    // start/step
    RepeatingValue(PatternValueType, PatternValueType),
    // start-finish/step
    RepeatingRange(PatternValueType, PatternValueType, PatternValueType),
}

impl PatternItem {
    fn parse(type_: PatternType, value: &str) -> Option<Self> {
        if value == "*" {
            Some(Self::All)
        } else if let Some((base, repeater)) = value.split_once('/') {
            if type_ == PatternType::Dows {
                return None;
            }

            let step = utils::parse_digital_value(repeater, 1, type_.max_step())?;
            if base == "*" {
                Some(Self::RepeatingValue(type_.min_max().0, step))
            } else if let Some((start, end)) = base.split_once('-') {
                let (start, end) = Self::parse_range(type_, start, end)?;
                Some(Self::RepeatingRange(start, end, step))
            } else {
                Some(Self::RepeatingValue(type_.parse(base)?, step))
            }
        } else if let Some((start, end)) = value.split_once('-') {
            let (start, end) = Self::parse_range(type_, start, end)?;
            Some(Self::Range(start, end))
        } else {
            Some(Self::Particular(type_.parse(value)?))
        }
    }

    fn parse_range(type_: PatternType, start: &str, end: &str) -> Option<(PatternValueType, PatternValueType)> {
        let start = type_.parse(start)?;
        let end = type_.parse(end)?;
        (start <= end).then_some((start, end))
    }

    fn values(&self, type_: PatternType) -> Option<SeriesWithStep> {
        let (min, max) = type_.min_max();
        let (start, end, step) = match *self {
            Self::All => (min, max, 1),
            Self::Particular(value) => (value, value, 1),
            Self::Range(start, end) => (start, end, 1),
            Self::RepeatingValue(start, step) => (start, max, step),
            Self::RepeatingRange(start, end, step) => (start, end, step),
        };

        SeriesWithStep::new(start, end, step)
    }
}

/// Day-of-month part of the schedule, used when day-of-week is `?`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum DomPattern {
    Days(Pattern),
    // L or L-offset
    Last(PatternValueType),
    // dayW
    Weekday(PatternValueType),
    // LW
    LastWeekday,
}

impl DomPattern {
    pub(crate) fn parse(input: &str) -> Result<Self> {
        let type_ = PatternType::Doms;

        if input == "L" {
            Ok(Self::Last(0))
        } else if input == "LW" {
            Ok(Self::LastWeekday)
        } else if let Some(offset) = input.strip_prefix("L-") {
            utils::parse_digital_value(offset, 0, 30)
                .map(Self::Last)
                .ok_or_else(|| type_.error(input))
        } else if let Some(day) = input.strip_suffix('W') {
            type_
                .parse(day)
                .map(Self::Weekday)
                .ok_or_else(|| type_.error(input))
        } else {
            Pattern::parse(type_, input).map(Self::Days)
        }
    }

    fn days_in(&self, year: PatternValueType, month: PatternValueType) -> Vec<PatternValueType> {
        let days_in_month = utils::days_in_month(year, month);

        match self {
            Self::Days(pattern) => pattern
                .values()
                .iter()
                .copied()
                .filter(|day| utils::is_valid_date(year, month, *day as i32))
                .collect(),
            Self::Last(offset) => {
                if *offset < days_in_month {
                    vec![days_in_month - offset]
                } else {
                    vec![]
                }
            }
            Self::Weekday(day) => utils::nearest_weekday(year, month, *day as i32).into_iter().collect(),
            Self::LastWeekday => utils::nearest_weekday(year, month, days_in_month as i32)
                .into_iter()
                .collect(),
        }
    }
}

/// Day-of-week part of the schedule, used when day-of-month is `?`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum DowPattern {
    Days(Pattern),
    // dowL
    Last(PatternValueType),
    // dow#nth
    Nth(PatternValueType, PatternValueType),
}

impl DowPattern {
    pub(crate) fn parse(input: &str) -> Result<Self> {
        let type_ = PatternType::Dows;
        let upper = input.to_ascii_uppercase();
        let error = || type_.error(input);

        if upper == "L" {
            // standalone L is the last day of the week
            Pattern::parse(type_, "7").map(Self::Days)
        } else if let Some(dow) = upper.strip_prefix("L-") {
            type_.parse(dow).map(Self::Last).ok_or_else(error)
        } else if let Some(dow) = upper.strip_suffix('L') {
            type_.parse(dow).map(Self::Last).ok_or_else(error)
        } else if let Some((dow, nth)) = upper.split_once('#') {
            let dow = type_.parse(dow).ok_or_else(error)?;
            let nth = utils::parse_digital_value(nth, 1, 5).ok_or_else(error)?;
            Ok(Self::Nth(dow, nth))
        } else {
            Pattern::parse(type_, &upper)
                .map(Self::Days)
                .map_err(|_| error())
        }
    }

    fn days_in(&self, year: PatternValueType, month: PatternValueType) -> Vec<PatternValueType> {
        match self {
            Self::Days(pattern) => (1..=utils::days_in_month(year, month))
                .filter(|day| pattern.contains(utils::day_of_week(year, month, *day)))
                .collect(),
            Self::Last(dow) => vec![utils::last_dow(year, month, *dow)],
            Self::Nth(dow, nth) => utils::nth_dow(year, month, *dow, *nth).into_iter().collect(),
        }
    }
}

/// Days part of the schedule: exactly one of day-of-month or day-of-week is in charge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum DaysPattern {
    OfMonth(DomPattern),
    OfWeek(DowPattern),
}

impl DaysPattern {
    /// Parses pair of day-of-month and day-of-week fields, one of them must be `?`.
    pub(crate) fn parse(dom: &str, dow: &str) -> Result<Self> {
        match (dom, dow) {
            ("?", "?") => Err(CronError::InvalidDaysPattern(format!("{dom} {dow}"))),
            (dom, "?") => DomPattern::parse(dom).map(Self::OfMonth),
            ("?", dow) => DowPattern::parse(dow).map(Self::OfWeek),
            (_, _) => Err(CronError::InvalidDaysPattern(format!("{dom} {dow}"))),
        }
    }

    /// Returns sorted list of days of the specified month which satisfy the pattern.
    pub(crate) fn days_in(&self, year: PatternValueType, month: PatternValueType) -> Vec<PatternValueType> {
        match self {
            Self::OfMonth(dom) => dom.days_in(year, month),
            Self::OfWeek(dow) => dow.days_in(year, month),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn values(type_: PatternType, input: &str) -> Vec<PatternValueType> {
        Pattern::parse(type_, input)
            .unwrap_or_else(|e| panic!("type = {type_:?}, input = {input}, error = {e}"))
            .values
    }

    #[rstest]
    #[case(PatternType::Minutes, "6", vec![6])]
    #[case(PatternType::Minutes, "0/23", vec![0, 23, 46])]
    #[case(PatternType::Minutes, "*/5", (0..=59).step_by(5).collect())]
    #[case(PatternType::Minutes, "0-29/5", vec![0, 5, 10, 15, 20, 25])]
    #[case(PatternType::Minutes, "5,4", vec![4, 5])]
    #[case(PatternType::Minutes, "1/5", (1..=59).step_by(5).collect())]
    #[case(PatternType::Minutes, "10,20,30,40", vec![10, 20, 30, 40])]
    #[case(PatternType::Minutes, "*", (0..=59).collect())]
    #[case(PatternType::Minutes, "10,12,20/5,25-30,40-45/2,*/30", vec![0,10,12,20,25,26,27,28,29,30,35,40,42,44,45,50,55])]
    #[case(PatternType::Hours, "4/3", vec![4, 7, 10, 13, 16, 19, 22])]
    #[case(PatternType::Hours, "*/3", vec![0, 3, 6, 9, 12, 15, 18, 21])]
    #[case(PatternType::Hours, "07/12", vec![7, 19])]
    #[case(PatternType::Hours, "1-7/2,11-23/2,10", vec![1, 3, 5, 7, 10, 11, 13, 15, 17, 19, 21, 23])]
    #[case(PatternType::Hours, "8-17", (8..=17).collect())]
    #[case(PatternType::Hours, "5-5", vec![5])]
    #[case(PatternType::Doms, "8,18-20,26-28", vec![8, 18, 19, 20, 26, 27, 28])]
    #[case(PatternType::Doms, "*/1", (1..=31).collect())]
    #[case(PatternType::Doms, "09", vec![9])]
    #[case(PatternType::Doms, "15,30,31", vec![15, 30, 31])]
    #[case(PatternType::Doms, "1/4", vec![1, 5, 9, 13, 17, 21, 25, 29])]
    #[case(PatternType::Months, "*", (1..=12).collect())]
    #[case(PatternType::Months, "MAR/4", vec![3, 7, 11])]
    #[case(PatternType::Months, "JAN,JUL,DEC", vec![1, 7, 12])]
    #[case(PatternType::Months, "aug,Jul", vec![7, 8])]
    #[case(PatternType::Months, "04,09,12", vec![4, 9, 12])]
    #[case(PatternType::Months, "1-12/3", vec![1, 4, 7, 10])]
    #[case(PatternType::Months, "JAN-APR,JUL-OCT/2,DEC", vec![1, 2, 3, 4, 7, 9, 12])]
    #[case(PatternType::Dows, "MON-FRI", vec![2, 3, 4, 5, 6])]
    #[case(PatternType::Dows, "SUN,MON", vec![1, 2])]
    #[case(PatternType::Dows, "1,5,7", vec![1, 5, 7])]
    #[case(PatternType::Dows, "*", (1..=7).collect())]
    #[case(PatternType::Years, "2020-2030", (2020..=2030).collect())]
    #[case(PatternType::Years, "2020,2021,2028,2199", vec![2020, 2021, 2028, 2199])]
    #[case(PatternType::Years, "2020-2021,2028-2199", (2020..=2021).chain(2028..=2199).collect())]
    #[case(PatternType::Years, "*", (MIN_YEAR..=MAX_YEAR).collect())]
    #[case(PatternType::Years, "*/100", vec![1970, 2070, 2170])]
    fn test_pattern_parse_valid(
        #[case] type_: PatternType,
        #[case] input: &str,
        #[case] expected: Vec<PatternValueType>,
    ) {
        assert_eq!(values(type_, input), expected, "type = {type_:?}, input = {input}");
    }

    #[rstest]
    #[case(PatternType::Minutes, vec!["", " ", ",", "/", "*/", "5/", "-", "1-", "?", "L", "W", "60", "89", "65/15", "5/155", "0/0", "5-1", "*,", "1,", ",1", "1, 2", "a", "1#1", "+5", "-1"])]
    #[case(PatternType::Hours, vec!["", "24", "65", "0/24", "1-7/2,11-23/2,", "5-1/2", "1-2-3", "?", "L"])]
    #[case(PatternType::Doms, vec!["", "0", "32", "0/1", "1/32", "?", "L", "W", "15-10"])]
    #[case(PatternType::Months, vec!["", "0", "13", "04,09,13", "JANUARY", "j@n", "0/12", "DEC-JAN"])]
    #[case(PatternType::Dows, vec!["", "0", "8", "01,05,8", "*/2", "1/2", "MONDAY", "SAT-SUN"])]
    #[case(PatternType::Years, vec!["", "1969", "2200", "2400", "2000-2200", "2005-2001", "2000/230", "20"])]
    fn test_pattern_parse_invalid(#[case] type_: PatternType, #[case] input: Vec<&str>) {
        for item in input {
            let result = Pattern::parse(type_, item);
            assert_eq!(result, Err(type_.error(item)), "type = {type_:?}, input = '{item}'");
        }
    }

    #[test]
    fn test_pattern_lookups() {
        let pattern = Pattern::parse(PatternType::Minutes, "0/23").unwrap();
        let values = pattern.values();

        assert_eq!(first_from(values, 0), Some(0));
        assert_eq!(first_from(values, 1), Some(23));
        assert_eq!(first_from(values, 46), Some(46));
        assert_eq!(first_from(values, 47), None);
        assert_eq!(last_up_to(values, 59), Some(46));
        assert_eq!(last_up_to(values, 45), Some(23));
        assert_eq!(last_up_to(values, 0), Some(0));
        assert_eq!(last_up_to(&[], 10), None);
        assert!(pattern.contains(23));
        assert!(!pattern.contains(24));
    }

    #[rstest]
    #[case("L", DomPattern::Last(0))]
    #[case("L-2", DomPattern::Last(2))]
    #[case("L-30", DomPattern::Last(30))]
    #[case("LW", DomPattern::LastWeekday)]
    #[case("3W", DomPattern::Weekday(3))]
    #[case("31W", DomPattern::Weekday(31))]
    #[case("7", DomPattern::Days(Pattern::parse(PatternType::Doms, "7").unwrap()))]
    fn test_dom_pattern_parse_valid(#[case] input: &str, #[case] expected: DomPattern) {
        assert_eq!(DomPattern::parse(input).unwrap(), expected, "input = {input}");
    }

    #[rstest]
    #[case("3L")]
    #[case("L-31")]
    #[case("L-")]
    #[case("W")]
    #[case("32W")]
    #[case("0W")]
    #[case("1#2")]
    #[case("?")]
    fn test_dom_pattern_parse_invalid(#[case] input: &str) {
        assert_eq!(
            DomPattern::parse(input),
            Err(CronError::InvalidDayOfMonthValue(input.to_owned()))
        );
    }

    #[rstest]
    #[case("6L", DowPattern::Last(6))]
    #[case("FRIL", DowPattern::Last(6))]
    #[case("satl", DowPattern::Last(7))]
    #[case("L-2", DowPattern::Last(2))]
    #[case("2#1", DowPattern::Nth(2, 1))]
    #[case("MON#5", DowPattern::Nth(2, 5))]
    #[case("L", DowPattern::Days(Pattern::parse(PatternType::Dows, "7").unwrap()))]
    #[case("mon-fri", DowPattern::Days(Pattern::parse(PatternType::Dows, "2-6").unwrap()))]
    fn test_dow_pattern_parse_valid(#[case] input: &str, #[case] expected: DowPattern) {
        assert_eq!(DowPattern::parse(input).unwrap(), expected, "input = {input}");
    }

    #[rstest]
    #[case("2#6")]
    #[case("2#0")]
    #[case("8#1")]
    #[case("#1")]
    #[case("0L")]
    #[case("8L")]
    #[case("L-8")]
    #[case("1W")]
    #[case("?")]
    fn test_dow_pattern_parse_invalid(#[case] input: &str) {
        assert_eq!(
            DowPattern::parse(input),
            Err(CronError::InvalidDayOfWeekValue(input.to_owned()))
        );
    }

    #[rstest]
    #[case("?", "?")]
    #[case("*", "*")]
    #[case("1", "MON")]
    fn test_days_pattern_invalid_combination(#[case] dom: &str, #[case] dow: &str) {
        assert!(matches!(
            DaysPattern::parse(dom, dow),
            Err(CronError::InvalidDaysPattern(_))
        ));
    }

    #[rstest]
    // plain days, dropped when not in the month
    #[case("8,18-20,26-28", "?", 2020, 1, vec![8, 18, 19, 20, 26, 27, 28])]
    #[case("10,30,31", "?", 2021, 4, vec![10, 30])]
    #[case("29-31", "?", 2023, 2, vec![])]
    #[case("29-31", "?", 2024, 2, vec![29])]
    // last day of the month and offsets
    #[case("L", "?", 2024, 2, vec![29])]
    #[case("L", "?", 2023, 2, vec![28])]
    #[case("L-2", "?", 2020, 5, vec![29])]
    #[case("L-2", "?", 2020, 6, vec![28])]
    #[case("L-27", "?", 2023, 2, vec![1])]
    #[case("L-28", "?", 2023, 2, vec![])]
    #[case("L-30", "?", 2025, 2, vec![])]
    #[case("L-30", "?", 2025, 1, vec![1])]
    // nearest weekday
    #[case("3W", "?", 2020, 8, vec![3])]
    #[case("3W", "?", 2020, 10, vec![2])]
    #[case("31W", "?", 2020, 5, vec![29])]
    #[case("31W", "?", 2020, 6, vec![])]
    #[case("31W", "?", 2021, 1, vec![29])]
    #[case("LW", "?", 2020, 5, vec![29])]
    #[case("LW", "?", 2024, 3, vec![29])]
    #[case("LW", "?", 2024, 4, vec![30])]
    // days of week
    #[case("?", "2", 2023, 9, vec![4, 11, 18, 25])]
    #[case("?", "7", 2023, 9, vec![2, 9, 16, 23, 30])]
    #[case("?", "MON,TUE", 2023, 12, vec![4, 5, 11, 12, 18, 19, 25, 26])]
    #[case("?", "1", 2023, 2, vec![5, 12, 19, 26])]
    #[case("?", "2L", 2024, 2, vec![26])]
    #[case("?", "7L", 2023, 4, vec![29])]
    #[case("?", "6L", 2020, 5, vec![29])]
    #[case("?", "4#2", 2023, 11, vec![8])]
    #[case("?", "6#3", 2023, 11, vec![17])]
    #[case("?", "3#1", 2023, 6, vec![6])]
    #[case("?", "2#5", 2023, 12, vec![])]
    #[case("?", "1#5", 2023, 12, vec![31])]
    fn test_days_pattern_days_in(
        #[case] dom: &str,
        #[case] dow: &str,
        #[case] year: PatternValueType,
        #[case] month: PatternValueType,
        #[case] expected: Vec<PatternValueType>,
    ) {
        let pattern = DaysPattern::parse(dom, dow).unwrap();
        assert_eq!(
            pattern.days_in(year, month),
            expected,
            "dom = {dom}, dow = {dow}, date = {year}-{month:02}"
        );
    }
}
