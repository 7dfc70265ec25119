//! Opening-hours evaluation for the directory's schedule text.
//!
//! Schedules are `;`-separated clauses of the form `DAYS:HH:MM-HH:MM`, for
//! example `"L-V: 07:00-22:00; S: 08:00-14:00"`. A `24H` token anywhere in the
//! text means the station never closes.
//!
//! Day specs are matched by literal character containment against the
//! Spanish day initial of the evaluated instant. Ranges are not expanded, so
//! `L-V` matches Monday and Friday only.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// Marker for stations open around the clock.
pub const ALWAYS_OPEN: &str = "24H";

/// Spanish single-letter initial used by the directory for a weekday.
#[must_use]
pub fn day_code(weekday: Weekday) -> char {
    match weekday {
        Weekday::Mon => 'L',
        Weekday::Tue => 'M',
        Weekday::Wed => 'X',
        Weekday::Thu => 'J',
        Weekday::Fri => 'V',
        Weekday::Sat => 'S',
        Weekday::Sun => 'D',
    }
}

/// Encode a time of day as `hour * 100 + minute` (13:30 is `1330`).
#[must_use]
pub fn hhmm(instant: NaiveDateTime) -> u32 {
    instant.hour() * 100 + instant.minute()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One `DAYS:OPEN-CLOSE` clause of a schedule.
pub struct ScheduleClause {
    /// Raw day spec, e.g. `"L-V"`.
    pub days: String,
    /// Opening time in HHMM encoding.
    pub open: u32,
    /// Closing time in HHMM encoding, inclusive.
    pub close: u32,
}

impl ScheduleClause {
    /// Parse a single clause, returning `None` when it is malformed.
    #[must_use]
    pub fn parse(clause: &str) -> Option<Self> {
        let (days, hours) = clause.trim().split_once(':')?;
        let mut bounds = hours.split('-');
        let open = bounds.next()?;
        let close = bounds.next()?;
        Some(Self {
            days: days.trim().to_owned(),
            open: parse_hhmm(open)?,
            close: parse_hhmm(close)?,
        })
    }

    /// Whether the day spec literally contains `day`.
    #[must_use]
    pub fn applies_to(&self, day: char) -> bool {
        self.days.contains(day)
    }

    /// Whether `time` (HHMM) lies within the opening hours, both ends inclusive.
    #[must_use]
    pub fn covers(&self, time: u32) -> bool {
        (self.open..=self.close).contains(&time)
    }
}

/// Read the leading digits of a bound once colons are removed, so that
/// `"14:00 y 16:00"` yields `1400`.
fn parse_hhmm(raw: &str) -> Option<u32> {
    let digits: String = raw
        .replace(':', "")
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Parse every well-formed clause of a schedule, skipping malformed ones.
pub fn clauses(schedule: &str) -> impl Iterator<Item = ScheduleClause> + '_ {
    schedule.split(';').filter_map(|raw| {
        let clause = ScheduleClause::parse(raw);
        if clause.is_none() && !raw.trim().is_empty() {
            tracing::trace!(clause = raw.trim(), "skipping malformed schedule clause");
        }
        clause
    })
}

/// Decide whether a station with the given schedule is open at `now`.
#[must_use]
pub fn is_open_now(schedule: &str, now: NaiveDateTime) -> bool {
    if schedule.contains(ALWAYS_OPEN) {
        return true;
    }

    let today = day_code(now.weekday());
    let time = hhmm(now);

    clauses(schedule).any(|clause| clause.applies_to(today) && clause.covers(time))
}
