//! AWS EventBridge cron expressions parser with forward and backward occurrence search.
#![deny(unsafe_code, missing_docs)]

//! This is a small crate, intended to:
//! - parse and validate six-field cron expressions in the [AWS EventBridge](https://docs.aws.amazon.com/eventbridge/latest/userguide/eb-scheduled-rule-pattern.html#eb-cron-expressions) format;
//! - find the next or previous time the expression fires, starting from any UTC instant;
//! - list all the firing times within an interval.
//!
//! _This is not a cron jobs scheduler or runner._ All the calculations are in UTC with one minute precision.
//!
//! ## Cron expression format
//!
//! Expression consists of exactly six fields separated by whitespace: minutes, hours, day of month,
//! month, day of week and year. Seconds aren't supported.
//!
//! The table below describes valid values and patterns of each field:
//!
//! | Field        | Allowed values  | Allowed special characters |
//! |--------------|-----------------|----------------------------|
//! | Minutes      | 0-59            | * , - /                    |
//! | Hours        | 0-23            | * , - /                    |
//! | Day of Month | 1-31            | * , - / ? L W              |
//! | Month        | 1-12 or JAN-DEC | * , - /                    |
//! | Day of Week  | 1-7 or SUN-SAT  | * , - ? L #                |
//! | Year         | 1970-2199       | * , - /                    |
//!
//! Patterns meanings:
//! - `*` - each possible value, i.e. `0,1,2,...,59` for minutes;
//! - `,` - list of values or patterns, i.e. `1,7,12`, `SUN,FRI`;
//! - `-` - range of values, i.e. `0-15`, `JAN-MAR`;
//! - `/` - repeating values, i.e. `*/12`, `10/5`, `30-59/2`;
//! - `L` - last day of the month (`L`, `L-3` is three days before the last one, `LW` is the last weekday),
//!   or last particular day of the week (`5L`, `FRIL`);
//! - `W` - the weekday (Monday to Friday), nearest to the specified day of month in the same month, i.e. `22W`;
//! - `#` - specific day of the week, i.e. `FRI#1`, `2#4`;
//! - `?` - exactly one of day-of-month and day-of-week fields must be `?`, it means the other one is in charge.
//!
//! Day of week `1` is Sunday and `7` is Saturday. Month and weekday names are case-insensitive.
//!
//! ## How to use
//!
//! The main public entity of the crate is a [`Schedule`] structure:
//! - [new()](Schedule::new): constructor to parse and validate provided expression;
//! - [next()](Schedule::next) and [prev()](Schedule::prev): time of the nearest event after or before the provided instant;
//! - [next_n()](Schedule::next_n) and [prev_n()](Schedule::prev_n): series of consecutive events;
//! - [between()](Schedule::between) and [final_before()](Schedule::final_before): events within an interval;
//! - [iter()](Schedule::iter) and [iter_rev()](Schedule::iter_rev): lazy iterators in both directions.
//!
//! Each lookup makes at most [`MAX_SEARCH_DEPTH`] retries, so extremely sparse schedules may return `None`
//! even if a matching time exists further away.
//!
//! ### Example with `next` and `prev`
//! ```rust
//! use aws_cron_lite::{parse_utc, Result, Schedule};
//!
//! fn main() -> Result<()> {
//!     let schedule = Schedule::new("0 9 ? * MON *")?;
//!     let from = parse_utc("2021-12-31T21:00:00Z")?;
//!
//!     assert_eq!(schedule.next(&from, false), Some(parse_utc("2022-01-03T09:00:00Z")?));
//!     assert_eq!(schedule.prev(&from, false), Some(parse_utc("2021-12-27T09:00:00Z")?));
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Example with `between`
//! ```rust
//! use aws_cron_lite::{parse_utc, Result, Schedule};
//!
//! fn main() -> Result<()> {
//!     let schedule = Schedule::new("0/23 * * * ? *")?;
//!     let from = parse_utc("2021-08-07T08:46:57Z")?;
//!     let to = parse_utc("2021-08-07T11:23:57Z")?;
//!
//!     // 08:46 and 11:23 are excluded
//!     let events = schedule.between(&from, &to, true);
//!     assert_eq!(events.len(), 7);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Search steps are reported via [tracing](https://crates.io/crates/tracing) at `trace` and `debug` levels.
//! The crate never installs a subscriber.
//!
//! # Feature flags
//! * `serde`: adds [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html) and [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html) trait implementation for [`Schedule`].

/// Crate specific Error implementation.
pub mod error;
mod occurrence;
mod pattern;
/// Cron expression parser and occurrence lookups.
pub mod schedule;
mod series;
mod utils;

// Re-export of public entities.
pub use error::CronError;
pub use occurrence::MAX_SEARCH_DEPTH;
pub use pattern::{MAX_YEAR, MIN_YEAR};
pub use schedule::{parse_utc, Schedule};

/// Convenient alias for `Result`.
pub type Result<T, E = CronError> = std::result::Result<T, E>;
