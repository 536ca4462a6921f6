//! Calendar-month ranges in a fixed reference zone.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{EngineError, ResultEngine};

/// Zone used when none is configured.
pub const DEFAULT_REFERENCE_ZONE: Tz = chrono_tz::Asia::Jakarta;

/// An inclusive `[start, end]` range, `end` being the last nanosecond of the
/// period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl Period {
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }
}

/// Resolves the month containing `now` in `zone`, with `month`/`year`
/// overriding the respective component when given. A zero counts as not
/// given.
pub fn month_period(
    zone: Tz,
    month: Option<u32>,
    year: Option<i32>,
    now: DateTime<Utc>,
) -> ResultEngine<Period> {
    let local_now = now.with_timezone(&zone);
    let year = year.filter(|y| *y != 0).unwrap_or(local_now.year());
    let month = month.filter(|m| *m != 0).unwrap_or(local_now.month());
    if !(1..=12).contains(&month) {
        return Err(EngineError::Validation(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }

    let first = first_instant(zone, year, month)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next_first = first_instant(zone, next_year, next_month)?;

    Ok(Period {
        start: first,
        end: next_first - Duration::nanoseconds(1),
    })
}

fn first_instant(zone: Tz, year: i32, month: u32) -> ResultEngine<DateTime<Tz>> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::Validation(format!("invalid year {year}")))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EngineError::Validation(format!("invalid year {year}")))?;
    match zone.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        // Midnight skipped by a DST jump: the month starts at the transition,
        // i.e. midnight read with the offset in force just before it.
        LocalResult::None => {
            let before = zone.offset_from_utc_datetime(&(midnight - Duration::days(1)));
            let offset = i64::from(before.fix().local_minus_utc());
            Ok(zone.from_utc_datetime(&(midnight - Duration::seconds(offset))))
        }
    }
}
