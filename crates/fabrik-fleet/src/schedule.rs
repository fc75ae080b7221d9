//! Randomized cron schedules for recurring per-instance jobs
//!
//! Every instance gets its own randomly placed minute and hour (and for
//! some shapes a random starting hour), so thousands of instances created
//! with the same settings do not fire at once. All generators are pure
//! functions of their input and the injected [`RandomSource`].

use crate::error::{FleetError, Result};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Largest "every N" value accepted by the simple generators
pub const MAX_SIMPLE_INTERVAL: u32 = 28;

const MINUTES_PER_HOUR: u32 = 60;
const HOURS_PER_DAY: u32 = 24;
const DAYS_PER_WEEK: u32 = 7;
const LAST_SCHEDULED_DAY: u32 = 29;
// Day 1 of the next month, counted from the start of a 30-day month.
const NEXT_MONTH_START: u32 = 31;

/// Source of random integers
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[0, bound)`; `bound` is always positive
    fn random_int(&self, bound: u32) -> u32;
}

/// Thread-local generator from `rand`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn random_int(&self, bound: u32) -> u32 {
        rand::thread_rng().gen_range(0..bound.max(1))
    }
}

/// Always yields the same value, reduced modulo the bound
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub u32);

impl RandomSource for FixedRandom {
    fn random_int(&self, bound: u32) -> u32 {
        self.0 % bound.max(1)
    }
}

/// A five-field cron expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CronSchedule(String);

impl CronSchedule {
    fn from_fields(minute: u32, hour: &str, day_of_month: &str, day_of_week: &str) -> Self {
        Self(format!(
            "{} {} {} * {}",
            minute, hour, day_of_month, day_of_week
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.split_whitespace().collect()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Day-of-week window for weekly schedules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyConstraints {
    /// First allowed weekday (0 = Sunday), inclusive
    #[serde(default)]
    pub start_after_weekday: Option<u32>,

    /// Weekday the window ends on, exclusive; 7 means end of week
    #[serde(default)]
    pub start_before_weekday: Option<u32>,

    /// Step between scheduled weekdays
    #[serde(default)]
    pub day_interval: Option<u32>,
}

impl WeeklyConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(mut self, weekday: u32) -> Self {
        self.start_after_weekday = Some(weekday);
        self
    }

    pub fn before(mut self, weekday: u32) -> Self {
        self.start_before_weekday = Some(weekday);
        self
    }

    pub fn every(mut self, days: u32) -> Self {
        self.day_interval = Some(days);
        self
    }
}

/// Interval understood by [`ScheduleGenerator::with_interval`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalDescriptor {
    Daily,
    Hours(u32),
}

impl FromStr for IntervalDescriptor {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self> {
        static HOURS: OnceLock<Regex> = OnceLock::new();
        let hours_pattern = HOURS
            .get_or_init(|| Regex::new(r"^([0-9]+) hours$").expect("hours pattern is valid"));

        if s == "daily" {
            return Ok(IntervalDescriptor::Daily);
        }

        let caps = hours_pattern.captures(s).ok_or_else(|| {
            FleetError::invalid_schedule(format!(
                "interval must be 'daily' or '<N> hours', got '{}'",
                s
            ))
        })?;
        let hours: u32 = caps[1]
            .parse()
            .map_err(|_| FleetError::invalid_schedule(format!("interval out of range: {}", s)))?;

        if hours == 0 || hours > HOURS_PER_DAY {
            return Err(FleetError::invalid_schedule(format!(
                "hour interval must be between 1 and {}, got {}",
                HOURS_PER_DAY, hours
            )));
        }
        Ok(IntervalDescriptor::Hours(hours))
    }
}

/// Cron generator with an injectable random source
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator<R: RandomSource = ThreadRandom> {
    random: R,
}

impl ScheduleGenerator<ThreadRandom> {
    pub fn new() -> Self {
        Self {
            random: ThreadRandom,
        }
    }
}

impl<R: RandomSource> ScheduleGenerator<R> {
    pub fn with_random(random: R) -> Self {
        Self { random }
    }

    /// Once every `days` days: `minute hour 1,1+N,... * *`
    pub fn once_every_n_days(&self, days: u32) -> Result<CronSchedule> {
        check_simple_interval(days, "day")?;

        let minute = self.random_minute();
        let hour = self.random_hour();
        let day_list = join(
            (1..=LAST_SCHEDULED_DAY)
                .step_by(days as usize)
                .take_while(|day| day + days <= NEXT_MONTH_START),
        );

        Ok(CronSchedule::from_fields(minute, &hour.to_string(), &day_list, "*"))
    }

    /// Every `hours` hours through the day, from a random start hour
    pub fn every_n_hours(&self, hours: u32) -> Result<CronSchedule> {
        check_simple_interval(hours, "hour")?;

        let minute = self.random_minute();
        let start = self.random.random_int(hours.min(HOURS_PER_DAY));
        let hour_list = join((start..HOURS_PER_DAY).step_by(hours as usize));

        Ok(CronSchedule::from_fields(minute, &hour_list, "*", "*"))
    }

    /// Weekly schedule within a weekday window
    pub fn weekly(&self, constraints: &WeeklyConstraints) -> Result<CronSchedule> {
        let weekdays = weekday_list(constraints)?;
        let minute = self.random_minute();
        let hour = self.random_hour();

        Ok(CronSchedule::from_fields(minute, &hour.to_string(), "*", &join(weekdays)))
    }

    /// Schedule from an interval descriptor such as `daily` or `8 hours`
    ///
    /// `after_minutes` pushes the first run of a non-divisible hour interval
    /// back by that many minutes, rounded up to whole hours.
    pub fn with_interval(&self, interval: &str, after_minutes: Option<u32>) -> Result<CronSchedule> {
        let minute = self.random_minute();

        match interval.parse::<IntervalDescriptor>()? {
            IntervalDescriptor::Daily => {
                let hour = self.random_hour();
                Ok(CronSchedule::from_fields(minute, &hour.to_string(), "*", "*"))
            }
            IntervalDescriptor::Hours(hours) if HOURS_PER_DAY % hours == 0 => {
                let hour_list = join((0..HOURS_PER_DAY).step_by(hours as usize));
                Ok(CronSchedule::from_fields(minute, &hour_list, "*", "*"))
            }
            IntervalDescriptor::Hours(hours) => {
                let shift = after_minutes.unwrap_or(0).div_ceil(MINUTES_PER_HOUR);
                let start = (self.random.random_int(hours) + shift) % hours;
                let hour_list = join((start..HOURS_PER_DAY).step_by(hours as usize));
                Ok(CronSchedule::from_fields(minute, &hour_list, "*", "*"))
            }
        }
    }

    fn random_minute(&self) -> u32 {
        self.random.random_int(MINUTES_PER_HOUR)
    }

    fn random_hour(&self) -> u32 {
        self.random.random_int(HOURS_PER_DAY)
    }
}

fn check_simple_interval(value: u32, unit: &str) -> Result<()> {
    if value == 0 || value > MAX_SIMPLE_INTERVAL {
        return Err(FleetError::invalid_schedule(format!(
            "{} interval must be between 1 and {}, got {}",
            unit, MAX_SIMPLE_INTERVAL, value
        )));
    }
    Ok(())
}

fn weekday_list(constraints: &WeeklyConstraints) -> Result<Vec<u32>> {
    let after = constraints.start_after_weekday.unwrap_or(0);
    let before = constraints.start_before_weekday.unwrap_or(DAYS_PER_WEEK);

    if after >= DAYS_PER_WEEK {
        return Err(FleetError::invalid_schedule(format!(
            "start_after_weekday must be between 0 and 6, got {}",
            after
        )));
    }
    if before > DAYS_PER_WEEK {
        return Err(FleetError::invalid_schedule(format!(
            "start_before_weekday must be between 0 and 7, got {}",
            before
        )));
    }
    if after == before {
        let message = if constraints.start_after_weekday.is_none() {
            "start_before_weekday 0 leaves no days after the default start_after_weekday of 0"
                .to_string()
        } else {
            format!("start_after_weekday and start_before_weekday are both {}", after)
        };
        return Err(FleetError::invalid_schedule(message));
    }

    let step = match constraints.day_interval.unwrap_or(1) % DAYS_PER_WEEK {
        0 => 1,
        step => step,
    };
    let span = if before > after {
        before - after
    } else {
        before + DAYS_PER_WEEK - after
    };

    let mut days: Vec<u32> = (0..span)
        .step_by(step as usize)
        .map(|offset| (after + offset) % DAYS_PER_WEEK)
        .collect();
    days.sort_unstable();
    Ok(days)
}

fn join(values: impl IntoIterator<Item = u32>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stubbed() -> ScheduleGenerator<FixedRandom> {
        ScheduleGenerator::with_random(FixedRandom(1))
    }

    fn day_of_week(schedule: &CronSchedule) -> String {
        schedule.fields()[4].to_string()
    }

    #[test]
    fn test_once_every_n_days() {
        let gen = stubbed();
        assert!(matches!(
            gen.once_every_n_days(29),
            Err(FleetError::InvalidSchedule(_))
        ));
        assert!(gen.once_every_n_days(0).is_err());
        assert_eq!(
            gen.once_every_n_days(2).unwrap().as_str(),
            "1 1 1,3,5,7,9,11,13,15,17,19,21,23,25,27,29 * *"
        );
        assert_eq!(gen.once_every_n_days(7).unwrap().as_str(), "1 1 1,8,15,22 * *");
        assert_eq!(gen.once_every_n_days(15).unwrap().as_str(), "1 1 1,16 * *");
        assert_eq!(gen.once_every_n_days(28).unwrap().as_str(), "1 1 1 * *");
    }

    #[test]
    fn test_once_every_day_stops_at_29() {
        let schedule = stubbed().once_every_n_days(1).unwrap();
        let days = schedule.fields()[2].to_string();
        assert!(days.ends_with(",28,29"));
        assert_eq!(days.split(',').count(), 29);
    }

    #[test]
    fn test_every_n_hours() {
        let gen = stubbed();
        assert!(matches!(
            gen.every_n_hours(29),
            Err(FleetError::InvalidSchedule(_))
        ));
        assert_eq!(gen.every_n_hours(8).unwrap().as_str(), "1 1,9,17 * * *");
        assert_eq!(gen.every_n_hours(7).unwrap().as_str(), "1 1,8,15,22 * * *");
        assert_eq!(
            gen.every_n_hours(3).unwrap().as_str(),
            "1 1,4,7,10,13,16,19,22 * * *"
        );
    }

    #[test]
    fn test_every_hour_with_single_bound() {
        let schedule = ScheduleGenerator::with_random(FixedRandom(5))
            .every_n_hours(1)
            .unwrap();
        assert_eq!(schedule.fields()[1].split(',').count(), 24);
    }

    #[test]
    fn test_weekly_defaults_cover_whole_week() {
        let schedule = stubbed().weekly(&WeeklyConstraints::new()).unwrap();
        assert_eq!(day_of_week(&schedule), "0,1,2,3,4,5,6");
        assert_eq!(schedule.fields()[2], "*");
    }

    #[test]
    fn test_weekly_windows() {
        let gen = stubbed();
        let cases = [
            (WeeklyConstraints::new().after(3), "3,4,5,6"),
            (WeeklyConstraints::new().every(1), "0,1,2,3,4,5,6"),
            (WeeklyConstraints::new().after(3).before(5).every(1), "3,4"),
            (WeeklyConstraints::new().after(0).before(3).every(1), "0,1,2"),
            (WeeklyConstraints::new().every(0), "0,1,2,3,4,5,6"),
            (WeeklyConstraints::new().after(3).every(7), "3,4,5,6"),
            (WeeklyConstraints::new().after(0).every(2), "0,2,4,6"),
            (WeeklyConstraints::new().every(9), "0,2,4,6"),
            (WeeklyConstraints::new().after(5).before(2), "0,1,5,6"),
        ];
        for (constraints, expected) in cases {
            let schedule = gen.weekly(&constraints).unwrap();
            assert_eq!(day_of_week(&schedule), expected, "{:?}", constraints);
        }
    }

    #[test]
    fn test_weekly_rejects_equal_bounds() {
        let constraints = WeeklyConstraints::new().after(0).before(0).every(1);
        assert!(matches!(
            stubbed().weekly(&constraints),
            Err(FleetError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn test_weekly_before_zero_with_default_after() {
        match stubbed().weekly(&WeeklyConstraints::new().before(0)) {
            Err(FleetError::InvalidSchedule(msg)) => {
                assert!(msg.contains("default start_after_weekday"), "{}", msg);
                assert!(!msg.contains("are both"), "{}", msg);
            }
            other => panic!("expected InvalidSchedule, got {:?}", other),
        }

        match stubbed().weekly(&WeeklyConstraints::new().after(4).before(4)) {
            Err(FleetError::InvalidSchedule(msg)) => assert!(msg.contains("are both 4"), "{}", msg),
            other => panic!("expected InvalidSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_weekly_rejects_out_of_range_bounds() {
        assert!(stubbed().weekly(&WeeklyConstraints::new().after(7)).is_err());
        assert!(stubbed().weekly(&WeeklyConstraints::new().before(8)).is_err());
    }

    #[test]
    fn test_interval_daily_and_24_hours() {
        let gen = stubbed();
        assert_eq!(gen.with_interval("daily", None).unwrap().as_str(), "1 1 * * *");
        assert_eq!(gen.with_interval("24 hours", None).unwrap().as_str(), "1 0 * * *");
    }

    #[test]
    fn test_interval_dividing_day() {
        let gen = stubbed();
        assert_eq!(
            gen.with_interval("8 hours", None).unwrap().as_str(),
            "1 0,8,16 * * *"
        );
        assert_eq!(
            gen.with_interval("1 hours", None).unwrap().fields()[1]
                .split(',')
                .count(),
            24
        );
    }

    #[test]
    fn test_interval_not_dividing_day() {
        let gen = stubbed();
        assert_eq!(
            gen.with_interval("9 hours", None).unwrap().as_str(),
            "1 1,10,19 * * *"
        );
        // 90 minutes rounds up to a two hour shift.
        assert_eq!(
            gen.with_interval("9 hours", Some(90)).unwrap().as_str(),
            "1 3,12,21 * * *"
        );
        assert_eq!(
            gen.with_interval("9 hours", Some(2)).unwrap().as_str(),
            "1 2,11,20 * * *"
        );
    }

    #[test]
    fn test_interval_rejects_bad_descriptors() {
        let gen = stubbed();
        for bad in ["random", "35 hours", "0 hours", "8 hour", "weekly", ""] {
            assert!(
                matches!(gen.with_interval(bad, Some(2)), Err(FleetError::InvalidSchedule(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_thread_random_stays_in_bounds() {
        let gen = ScheduleGenerator::new();
        for _ in 0..50 {
            let schedule = gen.once_every_n_days(7).unwrap();
            let fields = schedule.fields();
            assert!(fields[0].parse::<u32>().unwrap() < 60);
            assert!(fields[1].parse::<u32>().unwrap() < 24);

            let hours = gen.every_n_hours(5).unwrap();
            let start: u32 = hours.fields()[1].split(',').next().unwrap().parse().unwrap();
            assert!(start < 5);
        }
    }
}
