//! Timezone resolution and local-time mapping.
//!
//! Schedules carry an IANA zone name; an absent or unresolvable name falls
//! back to the viewer's local zone, then UTC. Mapping a local wall-clock
//! candidate to an instant has to survive DST seams: ambiguous local times
//! take the earlier offset, and nonexistent local times (the spring-forward
//! gap) shift forward one hour.

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Resolve an optional IANA zone name, falling back to the viewer's local
/// zone and finally UTC.
pub fn resolve_zone(name: Option<&str>) -> Tz {
    if let Some(name) = name {
        match name.parse::<Tz>() {
            Ok(tz) => return tz,
            Err(_) => {
                tracing::debug!(zone = name, "unresolvable timezone, using local zone");
            }
        }
    }
    local_zone()
}

/// The viewer's local IANA zone, or UTC when it cannot be determined.
pub fn local_zone() -> Tz {
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(Tz::UTC)
}

/// Map a local wall-clock datetime in `tz` to a UTC instant.
///
/// Returns `None` only when even the hour-shifted gap candidate has no
/// mapping, which real tzdata does not produce for one-hour transitions.
pub fn local_instant(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn resolves_known_zone() {
        assert_eq!(
            resolve_zone(Some("America/New_York")),
            chrono_tz::America::New_York
        );
    }

    #[test]
    fn unknown_zone_falls_back() {
        // Falls back to the local zone; just assert it does not panic and
        // yields something parseable.
        let tz = resolve_zone(Some("Mars/Olympus_Mons"));
        assert!(!tz.name().is_empty());
    }

    #[test]
    fn spring_forward_gap_shifts_one_hour() {
        // 2026-03-08 02:30 does not exist in US Pacific (clocks jump 02:00 -> 03:00).
        let tz = chrono_tz::America::Los_Angeles;
        let mapped = local_instant(tz, naive(2026, 3, 8, 2, 30)).unwrap();
        let local = mapped.with_timezone(&tz);
        assert_eq!(local.to_string(), "2026-03-08 03:30:00 PDT");
    }

    #[test]
    fn fall_back_ambiguity_takes_earlier_offset() {
        // 2026-11-01 01:30 occurs twice in US Pacific; the PDT reading wins.
        let tz = chrono_tz::America::Los_Angeles;
        let mapped = local_instant(tz, naive(2026, 11, 1, 1, 30)).unwrap();
        assert_eq!(mapped.with_timezone(&tz).to_string(), "2026-11-01 01:30:00 PDT");
    }
}
