//! Turns a "day preset + time of day" choice into an absolute instant.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref TIME_OF_DAY: Regex = Regex::new(r"^([0-9]{1,2}):([0-9]{2})$").unwrap();
}

const FALLBACK_HOUR: u32 = 18;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayPreset {
    #[default]
    Today,
    Tomorrow,
    DayAfter,
}

impl DayPreset {
    pub const fn offset_days(&self) -> i64 {
        match self {
            DayPreset::Today => 0,
            DayPreset::Tomorrow => 1,
            DayPreset::DayAfter => 2,
        }
    }
}

/// Parses `HH:MM`; anything unparseable or out of range yields 18:00.
pub fn parse_time_of_day(input: &str) -> NaiveTime {
    TIME_OF_DAY
        .captures(input.trim())
        .and_then(|caps| {
            let hour = caps[1].parse::<u32>().ok()?;
            let minute = caps[2].parse::<u32>().ok()?;
            NaiveTime::from_hms_opt(hour, minute, 0)
        })
        .unwrap_or_else(|| NaiveTime::from_hms_opt(FALLBACK_HOUR, 0, 0).unwrap_or_default())
}

/// Composes `preset` and `time_of_day` in the civil time of `now`'s own
/// zone and returns the matching UTC instant, with seconds zeroed.
///
/// Ambiguous local times take the earliest mapping. Local times that fall in
/// a DST gap are pushed forward by an hour.
pub fn compose_start<Tz: TimeZone>(preset: DayPreset, time_of_day: &str, now: &DateTime<Tz>) -> DateTime<Utc> {
    let date = now.date_naive() + Duration::days(preset.offset_days());
    let local = date.and_time(parse_time_of_day(time_of_day));
    let zone = now.timezone();

    zone.from_local_datetime(&local)
        .earliest()
        .or_else(|| zone.from_local_datetime(&(local + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, Timelike};
    use chrono_tz::Europe::Stockholm;

    fn stockholm_winter() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    #[test]
    fn time_in_spring_gap_moves_forward_an_hour() {
        // Stockholm skips 02:00-03:00 on 2024-03-31
        let now = Stockholm.with_ymd_and_hms(2024, 3, 31, 0, 10, 0).unwrap();
        let start = compose_start(DayPreset::Today, "02:30", &now);

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).unwrap());
        let local = start.with_timezone(&Stockholm);
        assert_eq!((local.hour(), local.minute()), (3, 30));
    }

    #[test]
    fn repeated_autumn_time_takes_the_earlier_instant() {
        // 02:00-03:00 happens twice on 2024-10-27, first in CEST then in CET
        let now = Stockholm.with_ymd_and_hms(2024, 10, 26, 20, 0, 0).unwrap();
        let start = compose_start(DayPreset::Tomorrow, "02:30", &now);

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap());
    }

    #[test]
    fn tomorrow_morning_in_local_time() {
        let tz = stockholm_winter();
        let now = tz.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let start = compose_start(DayPreset::Tomorrow, "09:30", &now);
        let local = start.with_timezone(&tz);

        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!((local.hour(), local.minute(), local.second()), (9, 30, 0));
        assert_eq!(local.nanosecond(), 0);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 2, 8, 30, 0).unwrap());
    }

    #[test]
    fn presets_shift_whole_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 30, 22, 15, 42).unwrap();
        assert_eq!(
            compose_start(DayPreset::Today, "23:00", &now),
            Utc.with_ymd_and_hms(2024, 3, 30, 23, 0, 0).unwrap()
        );
        assert_eq!(
            compose_start(DayPreset::DayAfter, "7:05", &now),
            Utc.with_ymd_and_hms(2024, 4, 1, 7, 5, 0).unwrap()
        );
    }

    #[test]
    fn local_date_is_taken_from_the_callers_zone() {
        // 23:30 UTC on Dec 31 is already Jan 1 in UTC+1
        let tz = stockholm_winter();
        let now = Utc.with_ymd_and_hms(2023, 12, 31, 23, 30, 0).unwrap().with_timezone(&tz);
        let start = compose_start(DayPreset::Today, "20:00", &now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 19, 0, 0).unwrap());
    }

    #[test]
    fn bad_time_falls_back_to_six_pm() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap();
        for input in ["", "soon", "25:00", "12:61", "12-30"] {
            assert_eq!(compose_start(DayPreset::Today, input, &now), expected, "{input:?}");
        }
    }
}
