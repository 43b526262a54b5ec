use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime};

use crate::error::{ParseTokenError, normalize_token};

/// Named relative time window resolved against a caller-supplied reference
/// instant.
///
/// Day, week, and month tokens use calendar granularity in the offset of the
/// reference instant; weeks start on Monday. The rolling ±7/±30-day windows
/// are closed at both ends, while [`Past`](Self::Past) and
/// [`Future`](Self::Future) are strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateRangeToken {
    /// Same calendar day as the reference instant.
    Today,
    /// The calendar day after the reference instant.
    Tomorrow,
    /// The Monday-based week containing the reference instant.
    ThisWeek,
    /// The seven days following this week.
    NextWeek,
    /// Same calendar month as the reference instant.
    ThisMonth,
    /// The calendar month after the reference instant.
    NextMonth,
    /// Strictly before the reference instant.
    Past,
    /// Strictly after the reference instant.
    Future,
    /// The closed interval `[now - 7d, now]`.
    Last7Days,
    /// The closed interval `[now - 30d, now]`.
    Last30Days,
    /// The closed interval `[now, now + 7d]`.
    Next7Days,
    /// The closed interval `[now, now + 30d]`.
    Next30Days,
}

impl DateRangeToken {
    /// Token representation used in persisted configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::ThisWeek => "this_week",
            Self::NextWeek => "next_week",
            Self::ThisMonth => "this_month",
            Self::NextMonth => "next_month",
            Self::Past => "past",
            Self::Future => "future",
            Self::Last7Days => "last_7_days",
            Self::Last30Days => "last_30_days",
            Self::Next7Days => "next_7_days",
            Self::Next30Days => "next_30_days",
        }
    }

    /// Whether `instant` falls within this window relative to `now`.
    ///
    /// Calendar math that cannot resolve (date overflow at the extremes of
    /// the supported range) yields `false` rather than an error.
    #[must_use]
    pub fn contains(self, instant: OffsetDateTime, now: OffsetDateTime) -> bool {
        let day = instant.to_offset(now.offset()).date();
        let today = now.date();
        match self {
            Self::Today => day == today,
            Self::Tomorrow => today.next_day().is_some_and(|tomorrow| day == tomorrow),
            Self::ThisWeek => week_of(today).is_some_and(|(start, end)| day >= start && day < end),
            Self::NextWeek => week_of(today)
                .and_then(|(_, end)| Some((end, end.checked_add(Duration::days(7))?)))
                .is_some_and(|(start, end)| day >= start && day < end),
            Self::ThisMonth => (day.year(), day.month()) == (today.year(), today.month()),
            Self::NextMonth => {
                let month = today.month().next();
                let year = if month == Month::January {
                    today.year() + 1
                } else {
                    today.year()
                };
                (day.year(), day.month()) == (year, month)
            }
            Self::Past => instant < now,
            Self::Future => instant > now,
            Self::Last7Days => rolling_window(instant, now, -7),
            Self::Last30Days => rolling_window(instant, now, -30),
            Self::Next7Days => rolling_window(instant, now, 7),
            Self::Next30Days => rolling_window(instant, now, 30),
        }
    }
}

impl fmt::Display for DateRangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRangeToken {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "today" => Ok(Self::Today),
            "tomorrow" => Ok(Self::Tomorrow),
            "this_week" => Ok(Self::ThisWeek),
            "next_week" => Ok(Self::NextWeek),
            "this_month" => Ok(Self::ThisMonth),
            "next_month" => Ok(Self::NextMonth),
            "past" => Ok(Self::Past),
            "future" => Ok(Self::Future),
            "last_7_days" => Ok(Self::Last7Days),
            "last_30_days" => Ok(Self::Last30Days),
            "next_7_days" => Ok(Self::Next7Days),
            "next_30_days" => Ok(Self::Next30Days),
            _ => Err(ParseTokenError::new("date range", s)),
        }
    }
}

/// Monday-based `[start, end)` bounds of the week containing `day`.
fn week_of(day: Date) -> Option<(Date, Date)> {
    let start = day.checked_sub(Duration::days(i64::from(
        day.weekday().number_days_from_monday(),
    )))?;
    let end = start.checked_add(Duration::days(7))?;
    Some((start, end))
}

/// Closed interval between `now` and `now + days` (either direction).
fn rolling_window(instant: OffsetDateTime, now: OffsetDateTime, days: i64) -> bool {
    let Some(edge) = now.checked_add(Duration::days(days)) else {
        return false;
    };
    if days < 0 {
        instant >= edge && instant <= now
    } else {
        instant >= now && instant <= edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-03-11 12:00 UTC); // a Wednesday

    #[test]
    fn today_spans_the_whole_calendar_day() {
        assert!(DateRangeToken::Today.contains(datetime!(2026-03-11 00:00 UTC), NOW));
        assert!(DateRangeToken::Today.contains(datetime!(2026-03-11 23:59:59 UTC), NOW));
        assert!(!DateRangeToken::Today.contains(datetime!(2026-03-10 23:59:59 UTC), NOW));
        assert!(!DateRangeToken::Today.contains(datetime!(2026-03-12 00:00 UTC), NOW));
    }

    #[test]
    fn tomorrow_is_exactly_the_next_day() {
        assert!(DateRangeToken::Tomorrow.contains(datetime!(2026-03-12 08:00 UTC), NOW));
        assert!(!DateRangeToken::Tomorrow.contains(datetime!(2026-03-11 23:59 UTC), NOW));
        assert!(!DateRangeToken::Tomorrow.contains(datetime!(2026-03-13 00:00 UTC), NOW));
    }

    #[test]
    fn weeks_start_on_monday() {
        // 2026-03-09 is the Monday of NOW's week.
        assert!(DateRangeToken::ThisWeek.contains(datetime!(2026-03-09 00:00 UTC), NOW));
        assert!(DateRangeToken::ThisWeek.contains(datetime!(2026-03-15 23:59 UTC), NOW));
        assert!(!DateRangeToken::ThisWeek.contains(datetime!(2026-03-08 23:59 UTC), NOW));
        assert!(!DateRangeToken::ThisWeek.contains(datetime!(2026-03-16 00:00 UTC), NOW));

        assert!(DateRangeToken::NextWeek.contains(datetime!(2026-03-16 00:00 UTC), NOW));
        assert!(DateRangeToken::NextWeek.contains(datetime!(2026-03-22 12:00 UTC), NOW));
        assert!(!DateRangeToken::NextWeek.contains(datetime!(2026-03-23 00:00 UTC), NOW));
    }

    #[test]
    fn months_use_calendar_granularity() {
        assert!(DateRangeToken::ThisMonth.contains(datetime!(2026-03-01 00:00 UTC), NOW));
        assert!(DateRangeToken::ThisMonth.contains(datetime!(2026-03-31 23:59 UTC), NOW));
        assert!(!DateRangeToken::ThisMonth.contains(datetime!(2026-04-01 00:00 UTC), NOW));

        assert!(DateRangeToken::NextMonth.contains(datetime!(2026-04-15 10:00 UTC), NOW));
        assert!(!DateRangeToken::NextMonth.contains(datetime!(2026-05-01 00:00 UTC), NOW));
    }

    #[test]
    fn next_month_wraps_december_into_january() {
        let december = datetime!(2026-12-10 09:00 UTC);
        assert!(DateRangeToken::NextMonth.contains(datetime!(2027-01-20 09:00 UTC), december));
        assert!(!DateRangeToken::NextMonth.contains(datetime!(2026-12-20 09:00 UTC), december));
    }

    #[test]
    fn past_and_future_are_strict() {
        assert!(!DateRangeToken::Past.contains(NOW, NOW));
        assert!(!DateRangeToken::Future.contains(NOW, NOW));
        assert!(DateRangeToken::Past.contains(NOW - Duration::seconds(1), NOW));
        assert!(DateRangeToken::Future.contains(NOW + Duration::seconds(1), NOW));
    }

    #[test]
    fn rolling_windows_are_closed_at_both_ends() {
        let edge = NOW - Duration::days(7);
        assert!(DateRangeToken::Last7Days.contains(edge, NOW));
        assert!(DateRangeToken::Last7Days.contains(NOW, NOW));
        assert!(!DateRangeToken::Last7Days.contains(edge - Duration::seconds(1), NOW));
        assert!(!DateRangeToken::Last7Days.contains(NOW + Duration::seconds(1), NOW));

        let edge = NOW + Duration::days(30);
        assert!(DateRangeToken::Next30Days.contains(edge, NOW));
        assert!(DateRangeToken::Next30Days.contains(NOW, NOW));
        assert!(!DateRangeToken::Next30Days.contains(edge + Duration::seconds(1), NOW));
    }

    #[test]
    fn instants_resolve_in_the_reference_offset() {
        // 23:30 UTC on the 11th is already the 12th at +02:00.
        let local_now = datetime!(2026-03-12 01:00 +02:00);
        assert!(DateRangeToken::Today.contains(datetime!(2026-03-11 23:30 UTC), local_now));
    }

    #[test]
    fn tokens_round_trip() {
        for token in [
            DateRangeToken::Today,
            DateRangeToken::Tomorrow,
            DateRangeToken::ThisWeek,
            DateRangeToken::NextWeek,
            DateRangeToken::ThisMonth,
            DateRangeToken::NextMonth,
            DateRangeToken::Past,
            DateRangeToken::Future,
            DateRangeToken::Last7Days,
            DateRangeToken::Last30Days,
            DateRangeToken::Next7Days,
            DateRangeToken::Next30Days,
        ] {
            let parsed: DateRangeToken = token
                .as_str()
                .parse()
                .unwrap_or_else(|err| panic!("token must parse: {err}"));
            assert_eq!(parsed, token);
        }
        assert!("fortnight".parse::<DateRangeToken>().is_err());
    }
}
