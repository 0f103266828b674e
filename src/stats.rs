use crate::models::{Activity, ActivityType, DailySummary, Goal};
use chrono::{DateTime, NaiveDate, TimeZone};

/// Recomputes every goal's `current` from the activities logged on the day
/// of `now`, in `now`'s time zone.
///
/// A goal aggregates the activities of its type whose lowercased name
/// contains the goal's match key (see [`match_key`]). Goals without matches
/// settle at zero; every other field passes through untouched.
pub fn recompute_goals_at<Tz: TimeZone>(
    activities: &[Activity],
    goals: &[Goal],
    now: &DateTime<Tz>,
) -> Vec<Goal> {
    let today = now.date_naive();
    let todays: Vec<&Activity> = activities
        .iter()
        .filter(|activity| local_date(activity.timestamp, &now.timezone()) == Some(today))
        .collect();

    goals
        .iter()
        .map(|goal| {
            let key = match_key(&goal.name);
            let current = ordered_sum(
                todays
                    .iter()
                    .filter(|activity| activity.kind == goal.kind)
                    .filter(|activity| activity.name.to_lowercase().contains(&key))
                    .map(|activity| activity.value),
            );
            Goal {
                current,
                ..goal.clone()
            }
        })
        .collect()
}

/// Totals today's activity values per type, independent of goals.
pub fn daily_summary_at<Tz: TimeZone>(activities: &[Activity], now: &DateTime<Tz>) -> DailySummary {
    let today = now.date_naive();
    let todays: Vec<&Activity> = activities
        .iter()
        .filter(|activity| local_date(activity.timestamp, &now.timezone()) == Some(today))
        .collect();

    let total = |kind: ActivityType| {
        ordered_sum(
            todays
                .iter()
                .filter(|activity| activity.kind == kind)
                .map(|activity| activity.value),
        )
    };
    DailySummary {
        fitness: total(ActivityType::Fitness),
        habit: total(ActivityType::Habit),
        task: total(ActivityType::Task),
    }
}

/// Sums in ascending order so the result does not depend on the order the
/// values were logged in.
fn ordered_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

/// Lowercased first whitespace-delimited token of a goal name.
///
/// "Daily Exercise" yields "daily", so an activity called "Morning Run" does
/// not count toward it.
pub fn match_key(goal_name: &str) -> String {
    goal_name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Calendar date of an epoch-millisecond instant in `tz`.
pub fn local_date<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|utc| utc.with_timezone(tz).date_naive())
}

pub fn is_same_day<Tz: TimeZone>(timestamp_ms: i64, now: &DateTime<Tz>) -> bool {
    local_date(timestamp_ms, &now.timezone()) == Some(now.date_naive())
}
