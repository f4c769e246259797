use crate::{
    pattern::{first_from, last_up_to, PatternValueType},
    Schedule,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use tracing::{debug, trace};

/// Maximum number of retries a single search makes before it gives up.
///
/// Every time some level (month, day, hour or minute) has no suitable value,
/// search restarts from the next (or previous) enclosing unit, which costs one step.
/// Very sparse schedules may hit this limit and return `None` even if an occurrence exists.
pub const MAX_SEARCH_DEPTH: usize = 10;

/// Direction of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    fn shift(&self) -> TimeDelta {
        match self {
            Self::Forward => TimeDelta::minutes(1),
            Self::Backward => TimeDelta::minutes(-1),
        }
    }
}

/// Result of the single search pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Found(NaiveDateTime),
    Retry(NaiveDateTime),
    Exhausted,
}

impl Step {
    #[inline]
    fn retry(anchor: Option<NaiveDateTime>) -> Self {
        anchor.map_or(Self::Exhausted, Self::Retry)
    }
}

/// Search context: a schedule borrowed for the single lookup in one direction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Occurrence<'a> {
    schedule: &'a Schedule,
    direction: Direction,
    depth: usize,
}

impl<'a> Occurrence<'a> {
    pub(crate) fn new(schedule: &'a Schedule, direction: Direction) -> Self {
        Self {
            schedule,
            direction,
            depth: 0,
        }
    }

    /// Looks for the nearest occurrence starting from `from` truncated to the whole minute.
    ///
    /// If `inclusive` is `false`, the truncated `from` itself is skipped.
    pub(crate) fn find(mut self, from: &NaiveDateTime, inclusive: bool) -> Option<NaiveDateTime> {
        let mut anchor = truncate(from)?;
        if !inclusive {
            anchor = anchor.checked_add_signed(self.direction.shift())?;
        }

        while self.depth <= MAX_SEARCH_DEPTH {
            self.depth += 1;

            let step = match self.direction {
                Direction::Forward => self.forward(&anchor),
                Direction::Backward => self.backward(&anchor),
            };

            match step {
                Step::Found(found) => return Some(found),
                Step::Retry(next) => {
                    trace!(schedule = %self.schedule, depth = self.depth, %anchor, %next, "retry search");
                    anchor = next;
                }
                Step::Exhausted => {
                    debug!(schedule = %self.schedule, direction = ?self.direction, %anchor, "no more years to search");
                    return None;
                }
            }
        }

        debug!(schedule = %self.schedule, direction = ?self.direction, %anchor, "search depth exceeded");
        None
    }

    fn forward(&self, anchor: &NaiveDateTime) -> Step {
        let schedule = self.schedule;
        let anchor_year = year_of(anchor);
        let mut month_from = anchor.month() as PatternValueType;
        let mut day_from = anchor.day() as PatternValueType;
        let mut hour_from = anchor.hour() as PatternValueType;
        let mut minute_from = anchor.minute() as PatternValueType;

        let Some(year) = first_from(schedule.year.values(), anchor_year) else {
            return Step::Exhausted;
        };
        if year > anchor_year {
            (month_from, day_from, hour_from, minute_from) = (1, 1, 0, 0);
        }

        let Some(month) = first_from(schedule.month.values(), month_from) else {
            trace!(year, "no month left in the year");
            return Step::retry(datetime(year + 1, 1, 1, 0, 0));
        };
        if month > month_from {
            (day_from, hour_from, minute_from) = (1, 0, 0);
        }

        let Some(day) = first_from(&schedule.days.days_in(year, month), day_from) else {
            trace!(year, month, "no day left in the month");
            let (year, month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
            return Step::retry(datetime(year, month, 1, 0, 0));
        };
        if day > day_from {
            (hour_from, minute_from) = (0, 0);
        }

        let Some(hour) = first_from(schedule.hour.values(), hour_from) else {
            trace!(year, month, day, "no hour left in the day");
            return Step::retry(
                datetime(year, month, day, 0, 0).and_then(|dt| dt.checked_add_signed(TimeDelta::days(1))),
            );
        };
        if hour > hour_from {
            minute_from = 0;
        }

        let Some(minute) = first_from(schedule.minute.values(), minute_from) else {
            trace!(year, month, day, hour, "no minute left in the hour");
            return Step::retry(
                datetime(year, month, day, hour, 0).and_then(|dt| dt.checked_add_signed(TimeDelta::hours(1))),
            );
        };

        datetime(year, month, day, hour, minute).map_or(Step::Exhausted, Step::Found)
    }

    fn backward(&self, anchor: &NaiveDateTime) -> Step {
        let schedule = self.schedule;
        let anchor_year = year_of(anchor);
        let mut month_to = anchor.month() as PatternValueType;
        let mut day_to = anchor.day() as PatternValueType;
        let mut hour_to = anchor.hour() as PatternValueType;
        let mut minute_to = anchor.minute() as PatternValueType;

        let Some(year) = last_up_to(schedule.year.values(), anchor_year) else {
            return Step::Exhausted;
        };
        if year < anchor_year {
            (month_to, day_to, hour_to, minute_to) = (12, 31, 23, 59);
        }

        let Some(month) = last_up_to(schedule.month.values(), month_to) else {
            trace!(year, "no month left in the year");
            return Step::retry(datetime(year - 1, 12, 31, 23, 59));
        };
        if month < month_to {
            (day_to, hour_to, minute_to) = (31, 23, 59);
        }

        let Some(day) = last_up_to(&schedule.days.days_in(year, month), day_to) else {
            trace!(year, month, "no day left in the month");
            return Step::retry(before(datetime(year, month, 1, 0, 0)));
        };
        if day < day_to {
            (hour_to, minute_to) = (23, 59);
        }

        let Some(hour) = last_up_to(schedule.hour.values(), hour_to) else {
            trace!(year, month, day, "no hour left in the day");
            return Step::retry(before(datetime(year, month, day, 0, 0)));
        };
        if hour < hour_to {
            minute_to = 59;
        }

        let Some(minute) = last_up_to(schedule.minute.values(), minute_to) else {
            trace!(year, month, day, hour, "no minute left in the hour");
            return Step::retry(before(datetime(year, month, day, hour, 0)));
        };

        datetime(year, month, day, hour, minute).map_or(Step::Exhausted, Step::Found)
    }
}

/// Checks if the instant (truncated to the minute) satisfies every field of the schedule.
pub(crate) fn matches(schedule: &Schedule, instant: &NaiveDateTime) -> bool {
    let year = year_of(instant);
    let month = instant.month() as PatternValueType;

    schedule.year.contains(year)
        && schedule.month.contains(month)
        && schedule
            .days
            .days_in(year, month)
            .contains(&(instant.day() as PatternValueType))
        && schedule.hour.contains(instant.hour() as PatternValueType)
        && schedule.minute.contains(instant.minute() as PatternValueType)
}

/// Drops seconds and sub-second part.
#[inline]
pub(crate) fn truncate(instant: &NaiveDateTime) -> Option<NaiveDateTime> {
    instant.with_second(0)?.with_nanosecond(0)
}

#[inline]
fn year_of(instant: &NaiveDateTime) -> PatternValueType {
    instant.year().clamp(0, PatternValueType::MAX as i32) as PatternValueType
}

#[inline]
fn datetime(
    year: PatternValueType,
    month: PatternValueType,
    day: PatternValueType,
    hour: PatternValueType,
    minute: PatternValueType,
) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)?.and_hms_opt(hour as u32, minute as u32, 0)
}

/// One minute before the instant.
#[inline]
fn before(instant: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    instant?.checked_sub_signed(TimeDelta::minutes(1))
}
