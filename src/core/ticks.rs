//! Tick generation for numeric and time axes.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Signed increment between "nice" ticks; negative values encode `1 / step`
/// for sub-unit increments so tick values stay exact.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Absolute tick step for `[start, stop]`.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let step0 = (stop - start).abs() / count.max(1) as f64;
    let mut step1 = 10f64.powf(step0.log10().floor());
    let error = step0 / step1;
    if error >= E10 {
        step1 *= 10.0;
    } else if error >= E5 {
        step1 *= 5.0;
    } else if error >= E2 {
        step1 *= 2.0;
    }
    if stop < start { -step1 } else { step1 }
}

/// Roughly `count` evenly spaced round values covering `[start, stop]`.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let increment = tick_increment(lo, hi, count);
    if increment == 0.0 || !increment.is_finite() {
        return Vec::new();
    }

    let mut values = Vec::new();
    if increment > 0.0 {
        let first = (lo / increment).ceil();
        let last = (hi / increment).floor();
        let n = (last - first + 1.0).ceil().max(0.0) as usize;
        values.extend((0..n).map(|i| (first + i as f64) * increment));
    } else {
        let inverse = -increment;
        let first = (lo * inverse).ceil();
        let last = (hi * inverse).floor();
        let n = (last - first + 1.0).ceil().max(0.0) as usize;
        values.extend((0..n).map(|i| (first + i as f64) / inverse));
    }
    if reverse {
        values.reverse();
    }
    values
}

/// Calendar unit of a time tick interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// One rung of the time tick ladder: `every` units of `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub unit: TimeUnit,
    pub every: u32,
}

const SECOND: i64 = 1_000;
const MINUTE: i64 = SECOND * 60;
const HOUR: i64 = MINUTE * 60;
const DAY: i64 = HOUR * 24;
const WEEK: i64 = DAY * 7;
const MONTH: i64 = DAY * 30;
const YEAR: i64 = DAY * 365;

const LADDER: [(TimeUnit, u32, i64); 17] = [
    (TimeUnit::Second, 1, SECOND),
    (TimeUnit::Second, 5, 5 * SECOND),
    (TimeUnit::Second, 15, 15 * SECOND),
    (TimeUnit::Second, 30, 30 * SECOND),
    (TimeUnit::Minute, 1, MINUTE),
    (TimeUnit::Minute, 5, 5 * MINUTE),
    (TimeUnit::Minute, 15, 15 * MINUTE),
    (TimeUnit::Minute, 30, 30 * MINUTE),
    (TimeUnit::Hour, 1, HOUR),
    (TimeUnit::Hour, 3, 3 * HOUR),
    (TimeUnit::Hour, 6, 6 * HOUR),
    (TimeUnit::Hour, 12, 12 * HOUR),
    (TimeUnit::Day, 1, DAY),
    (TimeUnit::Day, 2, 2 * DAY),
    (TimeUnit::Week, 1, WEEK),
    (TimeUnit::Month, 1, MONTH),
    (TimeUnit::Month, 3, 3 * MONTH),
];

/// Picks the ladder interval whose duration is closest to `span / count`.
#[must_use]
pub fn time_interval(start_millis: f64, stop_millis: f64, count: usize) -> TimeInterval {
    let target = (stop_millis - start_millis).abs() / count.max(1) as f64;
    let index = LADDER.partition_point(|(_, _, duration)| (*duration as f64) < target);
    if index == LADDER.len() {
        let years = tick_step(start_millis / YEAR as f64, stop_millis / YEAR as f64, count)
            .abs()
            .max(1.0);
        return TimeInterval {
            unit: TimeUnit::Year,
            every: years as u32,
        };
    }
    if index == 0 {
        return TimeInterval {
            unit: TimeUnit::Second,
            every: 1,
        };
    }
    let (before, after) = (LADDER[index - 1], LADDER[index]);
    let chosen = if target / (before.2 as f64) < (after.2 as f64) / target {
        before
    } else {
        after
    };
    TimeInterval {
        unit: chosen.0,
        every: chosen.1,
    }
}

fn floor_to(time: DateTime<Utc>, interval: TimeInterval) -> Option<DateTime<Utc>> {
    let every = interval.every.max(1);
    let date = time.date_naive();
    let at_midnight = |date: NaiveDate| date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    match interval.unit {
        TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour => {
            let unit = match interval.unit {
                TimeUnit::Second => SECOND,
                TimeUnit::Minute => MINUTE,
                _ => HOUR,
            } * i64::from(every);
            let millis = time.timestamp_millis().div_euclid(unit) * unit;
            Utc.timestamp_millis_opt(millis).single()
        }
        TimeUnit::Day => {
            let day0 = date.day0() - date.day0() % every;
            at_midnight(date.with_day0(day0)?)
        }
        TimeUnit::Week => {
            let back = i64::from(date.weekday().num_days_from_sunday());
            at_midnight(date - Duration::days(back))
        }
        TimeUnit::Month => {
            let month0 = date.month0() - date.month0() % every;
            at_midnight(NaiveDate::from_ymd_opt(date.year(), month0 + 1, 1)?)
        }
        TimeUnit::Year => {
            let year = date.year() - date.year().rem_euclid(every as i32);
            at_midnight(NaiveDate::from_ymd_opt(year, 1, 1)?)
        }
    }
}

fn advance(time: DateTime<Utc>, interval: TimeInterval) -> Option<DateTime<Utc>> {
    let every = i64::from(interval.every.max(1));
    match interval.unit {
        TimeUnit::Second => Some(time + Duration::seconds(every)),
        TimeUnit::Minute => Some(time + Duration::minutes(every)),
        TimeUnit::Hour => Some(time + Duration::hours(every)),
        TimeUnit::Week => Some(time + Duration::weeks(every)),
        TimeUnit::Day => {
            let next = time + Duration::days(every);
            // Day steps restart at the first of each month.
            if next.month() != time.month() {
                let date = next.date_naive().with_day(1)?;
                date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
            } else {
                Some(next)
            }
        }
        TimeUnit::Month => {
            let months = time.year() * 12 + time.month0() as i32 + every as i32;
            let date = NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)?;
            date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
        }
        TimeUnit::Year => {
            let date = NaiveDate::from_ymd_opt(time.year() + every as i32, 1, 1)?;
            date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
        }
    }
}

const MAX_TIME_TICKS: usize = 1_000;

/// Calendar-aligned ticks covering `[start, stop]` (epoch milliseconds).
#[must_use]
pub fn time_ticks(start_millis: f64, stop_millis: f64, count: usize) -> Vec<DateTime<Utc>> {
    if !start_millis.is_finite() || !stop_millis.is_finite() || count == 0 {
        return Vec::new();
    }
    let (lo, hi) = if stop_millis < start_millis {
        (stop_millis, start_millis)
    } else {
        (start_millis, stop_millis)
    };
    let (Some(lo_time), Some(hi_time)) = (
        Utc.timestamp_millis_opt(lo as i64).single(),
        Utc.timestamp_millis_opt(hi as i64).single(),
    ) else {
        return Vec::new();
    };
    if lo == hi {
        return vec![lo_time];
    }

    let interval = time_interval(lo, hi, count);
    let mut ticks = Vec::new();
    let mut cursor = floor_to(lo_time, interval);
    while let Some(tick) = cursor {
        if tick > hi_time || ticks.len() >= MAX_TIME_TICKS {
            break;
        }
        if tick >= lo_time {
            ticks.push(tick);
        }
        cursor = advance(tick, interval);
    }
    ticks
}

/// Multi-scale label for a time tick: the coarsest calendar field that
/// changes at this instant decides the format.
#[must_use]
pub fn time_tick_label(time: DateTime<Utc>) -> String {
    let pattern = if time.timestamp_subsec_millis() != 0 {
        ".%3f"
    } else if time.second() != 0 {
        ":%S"
    } else if time.minute() != 0 {
        "%I:%M"
    } else if time.hour() != 0 {
        "%I %p"
    } else if time.day() != 1 {
        if time.weekday().num_days_from_sunday() != 0 {
            "%a %d"
        } else {
            "%b %d"
        }
    } else if time.month() != 1 {
        "%B"
    } else {
        "%Y"
    };
    time.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::{TimeUnit, tick_increment, ticks, time_interval, time_tick_label, time_ticks};
    use chrono::{TimeZone, Utc};

    #[test]
    fn numeric_ticks_are_round_and_cover_the_domain() {
        assert_eq!(ticks(0.0, 10.0, 10), (0..=10).map(f64::from).collect::<Vec<_>>());
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(-3.0, 17.0, 4), vec![0.0, 5.0, 10.0, 15.0]);
        assert_eq!(ticks(5.0, 5.0, 10), vec![5.0]);
    }

    #[test]
    fn reversed_domain_yields_reversed_ticks() {
        assert_eq!(ticks(10.0, 0.0, 2), vec![10.0, 5.0, 0.0]);
    }

    #[test]
    fn sub_unit_increments_are_negative_inverses() {
        assert_eq!(tick_increment(0.0, 1.0, 10), -10.0);
        assert_eq!(tick_increment(0.0, 100.0, 10), 10.0);
    }

    #[test]
    fn time_interval_tracks_the_span() {
        let day = 86_400_000.0;
        assert_eq!(time_interval(0.0, 10.0 * day, 10).unit, TimeUnit::Day);
        assert_eq!(time_interval(0.0, 3_600_000.0, 10).unit, TimeUnit::Minute);
        assert_eq!(time_interval(0.0, 3650.0 * day, 10).unit, TimeUnit::Year);
    }

    #[test]
    fn daily_ticks_land_on_midnight() {
        let start = Utc.with_ymd_and_hms(2016, 1, 1, 6, 0, 0).single().expect("start");
        let end = Utc.with_ymd_and_hms(2016, 1, 8, 0, 0, 0).single().expect("end");
        let generated = time_ticks(
            start.timestamp_millis() as f64,
            end.timestamp_millis() as f64,
            7,
        );
        assert_eq!(generated.len(), 7);
        assert!(generated.iter().all(|tick| tick.format("%H:%M").to_string() == "00:00"));
    }

    #[test]
    fn labels_pick_the_coarsest_changing_field() {
        let year = Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).single().expect("year");
        let month = Utc.with_ymd_and_hms(2017, 3, 1, 0, 0, 0).single().expect("month");
        let hour = Utc.with_ymd_and_hms(2017, 3, 2, 15, 0, 0).single().expect("hour");
        assert_eq!(time_tick_label(year), "2017");
        assert_eq!(time_tick_label(month), "March");
        assert_eq!(time_tick_label(hour), "03 PM");
    }
}
