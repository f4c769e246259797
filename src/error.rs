use thiserror::Error;

/// Crate specific Errors implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CronError {
    /// Expression has a wrong number of fields.
    #[error("invalid cron expression: {0}")]
    InvalidCronExpression(String),
    /// Exactly one of day-of-month and day-of-week must be `?`.
    #[error("invalid combination of day-of-month and day-of-week, one of them must be '?': {0}")]
    InvalidDaysPattern(String),
    /// Invalid minute value specified.
    #[error("invalid minute value: {0}")]
    InvalidMinuteValue(String),
    /// Invalid hour value specified.
    #[error("invalid hour value: {0}")]
    InvalidHourValue(String),
    /// Invalid day of month value specified.
    #[error("invalid day-of-month value: {0}")]
    InvalidDayOfMonthValue(String),
    /// Invalid month value specified.
    #[error("invalid month value: {0}")]
    InvalidMonthValue(String),
    /// Invalid day of week value specified.
    #[error("invalid day-of-week value: {0}")]
    InvalidDayOfWeekValue(String),
    /// Invalid year value specified.
    #[error("invalid year value: {0}")]
    InvalidYearValue(String),
    /// Provided instant isn't a valid UTC timestamp.
    #[error("invalid UTC instant: {0}")]
    InvalidInstant(String),
}
