use crate::{
    occurrence::{self, Direction, Occurrence},
    pattern::{DaysPattern, Pattern, PatternType},
    CronError, Result,
};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::{fmt::Display, str::FromStr};

/// Represents AWS EventBridge cron schedule with its methods.
///
/// For cron schedule clarification and usage examples, please refer to the [crate documentation](crate).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
#[cfg_attr(feature = "serde", serde(into = "String"))]
pub struct Schedule {
    expression: String,
    pub(crate) minute: Pattern,
    pub(crate) hour: Pattern,
    pub(crate) days: DaysPattern,
    pub(crate) month: Pattern,
    pub(crate) year: Pattern,
}

impl Schedule {
    /// Parses and validates provided `expression` and constructs [`Schedule`] instance.
    ///
    /// Expression must contain exactly six whitespace-separated fields:
    /// minutes, hours, day of month, month, day of week and year.
    /// Exactly one of day-of-month and day-of-week fields must be `?`.
    ///
    /// Alternative way to construct [`Schedule`] is to use one of `try_from` or `from_str` methods.
    ///
    /// Returns [`CronError`] in a case provided expression is unparsable or has format errors.
    pub fn new(expression: impl Into<String>) -> Result<Self> {
        let expression = expression.into();
        let fields: Vec<&str> = expression.split_whitespace().collect();

        let [minute, hour, dom, month, dow, year] = fields[..] else {
            return Err(CronError::InvalidCronExpression(expression));
        };

        if (dom == "?") == (dow == "?") {
            return Err(CronError::InvalidDaysPattern(expression));
        }

        Ok(Self {
            minute: Pattern::parse(PatternType::Minutes, minute)?,
            hour: Pattern::parse(PatternType::Hours, hour)?,
            days: DaysPattern::parse(dom, dow)?,
            month: Pattern::parse(PatternType::Months, month)?,
            year: Pattern::parse(PatternType::Years, year)?,
            expression: fields.join(" "),
        })
    }

    /// Returns time of the nearest cron event after `from` (truncated to the whole minute).
    ///
    /// If `inclusive` is `true` and `from` itself (truncated) satisfies the schedule, it's returned as is.
    ///
    /// Returns `None` if there are no more events or search depth is exhausted,
    /// see [`MAX_SEARCH_DEPTH`](crate::MAX_SEARCH_DEPTH).
    #[inline]
    pub fn next(&self, from: &DateTime<Utc>, inclusive: bool) -> Option<DateTime<Utc>> {
        self.find(&from.naive_utc(), inclusive, Direction::Forward)
            .map(|dt| Utc.from_utc_datetime(&dt))
    }

    /// Returns time of the nearest cron event before `from` (truncated to the whole minute).
    ///
    /// Mirror of the [`next`](Schedule::next).
    #[inline]
    pub fn prev(&self, from: &DateTime<Utc>, inclusive: bool) -> Option<DateTime<Utc>> {
        self.find(&from.naive_utc(), inclusive, Direction::Backward)
            .map(|dt| Utc.from_utc_datetime(&dt))
    }

    /// Returns `n` consecutive upcoming events, each one is looked up from the previous.
    ///
    /// `inclusive` is applied to the first lookup only.
    /// As soon as some lookup returns `None`, the rest of the result is `None` as well.
    pub fn next_n(&self, from: &DateTime<Utc>, n: usize, inclusive: bool) -> Vec<Option<DateTime<Utc>>> {
        self.sequence(from, n, inclusive, Direction::Forward)
    }

    /// Returns `n` consecutive preceding events, mirror of the [`next_n`](Schedule::next_n).
    pub fn prev_n(&self, from: &DateTime<Utc>, n: usize, inclusive: bool) -> Vec<Option<DateTime<Utc>>> {
        self.sequence(from, n, inclusive, Direction::Backward)
    }

    /// Returns all events within `[from, to]` in ascending order, both ends are truncated to the whole minute.
    ///
    /// If `exclude_ends` is `true`, events equal to the (truncated) ends of the interval are omitted.
    /// Empty list is returned if `from` is later than `to`.
    pub fn between(&self, from: &DateTime<Utc>, to: &DateTime<Utc>, exclude_ends: bool) -> Vec<DateTime<Utc>> {
        let (Some(start), Some(end)) = (
            occurrence::truncate(&from.naive_utc()),
            occurrence::truncate(&to.naive_utc()),
        ) else {
            return vec![];
        };

        if start > end {
            return vec![];
        }

        let start = Utc.from_utc_datetime(&start);
        let end = Utc.from_utc_datetime(&end);
        let mut events: Vec<_> = ScheduleIterator::new(self, &start, true, Direction::Forward)
            .take_while(|event| *event <= end)
            .collect();

        if exclude_ends {
            events.retain(|event| *event != start && *event != end);
        }

        events
    }

    /// Returns the last event before `to` (exclusively), or `None` if it's earlier than `from`.
    pub fn final_before(&self, from: &DateTime<Utc>, to: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.prev(to, false).filter(|event| event >= from)
    }

    /// Returns `true` if `instant` (truncated to the whole minute) satisfies the schedule.
    pub fn matches(&self, instant: &DateTime<Utc>) -> bool {
        occurrence::truncate(&instant.naive_utc()).is_some_and(|instant| occurrence::matches(self, &instant))
    }

    /// Returns iterator of upcoming events starting after `from` (exclusively).
    #[inline]
    pub fn iter(&self, from: &DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        ScheduleIterator::new(self, from, false, Direction::Forward)
    }

    /// Returns iterator of preceding events in descending order, starting before `from` (exclusively).
    #[inline]
    pub fn iter_rev(&self, from: &DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        ScheduleIterator::new(self, from, false, Direction::Backward)
    }

    /// Every lookup gets a fresh search context, so depth limit is per call.
    #[inline]
    fn find(&self, from: &NaiveDateTime, inclusive: bool, direction: Direction) -> Option<NaiveDateTime> {
        Occurrence::new(self, direction).find(from, inclusive)
    }

    fn sequence(
        &self,
        from: &DateTime<Utc>,
        n: usize,
        inclusive: bool,
        direction: Direction,
    ) -> Vec<Option<DateTime<Utc>>> {
        let mut events = Vec::with_capacity(n);
        let mut anchor = Some(from.naive_utc());

        for i in 0..n {
            let event = anchor.and_then(|anchor| self.find(&anchor, inclusive && i == 0, direction));
            events.push(event.map(|dt| Utc.from_utc_datetime(&dt)));
            anchor = event;
        }

        events
    }
}

/// Contains iterator state.
#[derive(Debug, Clone)]
struct ScheduleIterator<'a> {
    schedule: &'a Schedule,
    direction: Direction,
    next: Option<NaiveDateTime>,
}

impl<'a> ScheduleIterator<'a> {
    fn new(schedule: &'a Schedule, from: &DateTime<Utc>, inclusive: bool, direction: Direction) -> Self {
        Self {
            schedule,
            direction,
            next: schedule.find(&from.naive_utc(), inclusive, direction),
        }
    }
}

impl Iterator for ScheduleIterator<'_> {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = self.schedule.find(&current, false, self.direction);
        Some(Utc.from_utc_datetime(&current))
    }
}

/// Parses RFC 3339 timestamp which must be in UTC (`Z` or zero offset).
///
/// Returns [`CronError::InvalidInstant`] if text is unparsable or has non-zero offset.
pub fn parse_utc(text: &str) -> Result<DateTime<Utc>> {
    let instant = DateTime::parse_from_rfc3339(text).map_err(|_| CronError::InvalidInstant(text.to_owned()))?;

    if instant.offset().local_minus_utc() != 0 {
        return Err(CronError::InvalidInstant(text.to_owned()));
    }

    Ok(instant.with_timezone(&Utc))
}

impl From<Schedule> for String {
    fn from(value: Schedule) -> Self {
        value.expression
    }
}

impl From<&Schedule> for String {
    fn from(value: &Schedule) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Schedule {
    type Error = CronError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&String> for Schedule {
    type Error = CronError;

    fn try_from(value: &String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Schedule {
    type Error = CronError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Schedule {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.expression)
    }
}
