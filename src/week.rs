use crate::duration::parse_duration;
use crate::models::Issue;
use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDateTime};
use log::warn;

/// The current reporting week in local wall time: [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WeekWindow {
    /// True iff `ts` falls inside the window (start inclusive, end exclusive)
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts < self.end
    }
}

/// Compute the Sunday-to-Sunday week containing `now`
///
/// The window runs from local midnight of the most recent Sunday (when `now`
/// is itself a Sunday, that day's own midnight) to the following Sunday's
/// midnight, exclusive. Both ends are naive local datetimes, so the window is
/// always seven midnight-to-midnight days in wall time regardless of what
/// the underlying clock representation does in between.
pub fn week_window(now: DateTime<Local>) -> WeekWindow {
    let today = now.date_naive();
    let days_since_sunday = today.weekday().num_days_from_sunday() as i64;

    let start = (today - Duration::days(days_since_sunday))
        .and_hms_opt(0, 0, 0)
        .unwrap();

    WeekWindow {
        start,
        end: start + Duration::days(7),
    }
}

/// True iff a worklog timestamp falls in the week containing `now`
///
/// `now` is passed explicitly so callers and tests control the clock.
pub fn is_in_current_week(started: DateTime<FixedOffset>, now: DateTime<Local>) -> bool {
    week_window(now).contains(started.with_timezone(&Local).naive_local())
}

/// Weekly time rolled up for one issue
#[derive(Debug, Clone)]
pub struct IssueTimeSummary {
    pub id: String,
    pub key: String,
    pub project: String,
    pub summary: String,
    pub minutes_this_week: u32,
}

/// Result of aggregating the current week's worklogs across all issues
#[derive(Debug, Clone, Default)]
pub struct WeeklySummary {
    pub by_issue: Vec<IssueTimeSummary>,
    pub total_minutes: u32,
}

/// Roll up the current week's logged time per issue and in total
///
/// Issues appear in the output in input order, each with the minutes logged
/// against it inside the week containing `now`. A worklog whose timestamp or
/// duration cannot be read contributes nothing and is logged as a warning;
/// one bad historical record never blocks the summary.
pub fn summarize(issues: &[Issue], now: DateTime<Local>) -> WeeklySummary {
    let window = week_window(now);

    let mut by_issue = Vec::with_capacity(issues.len());
    let mut total_minutes: u32 = 0;

    for issue in issues {
        let mut minutes_this_week: u32 = 0;

        for worklog in &issue.worklogs {
            let raw_started = match worklog.started.as_deref() {
                Some(s) => s,
                None => {
                    warn!("Worklog on {} has no start timestamp; skipping", issue.key);
                    continue;
                }
            };

            let started = match parse_started(raw_started) {
                Some(ts) => ts,
                None => {
                    warn!(
                        "Worklog on {} has unreadable start timestamp '{}'; skipping",
                        issue.key, raw_started
                    );
                    continue;
                }
            };

            if !window.contains(started.with_timezone(&Local).naive_local()) {
                continue;
            }

            match parse_duration(worklog.time_spent.as_deref().unwrap_or("")) {
                Ok(minutes) => {
                    minutes_this_week = minutes_this_week.saturating_add(minutes);
                    total_minutes = total_minutes.saturating_add(minutes);
                }
                Err(e) => {
                    warn!("Skipping malformed worklog on {}: {}", issue.key, e);
                }
            }
        }

        by_issue.push(IssueTimeSummary {
            id: issue.id.clone(),
            key: issue.key.clone(),
            project: issue.project.clone(),
            summary: issue.summary.clone(),
            minutes_this_week,
        });
    }

    WeeklySummary {
        by_issue,
        total_minutes,
    }
}

/// Parse Jira's worklog timestamp, with or without a colon in the offset
fn parse_started(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}
