//! In-process interface used by the presentation layer.
//!
//! Every activity mutation ends with one synchronous recompute pass: goals
//! are re-derived from the full activity collection, written back through the
//! goal repository, and subscribers are notified with the new snapshots.

use crate::errors::{TrackerError, TrackerResult};
use crate::models::{
    Activity, ActivityFilter, DailySummary, DashboardResponse, Goal, GoalProgress, NewActivity,
};
use crate::repo::{ActivityRepository, GoalRepository};
use crate::stats::{daily_summary_at, is_same_day, recompute_goals_at};
use crate::storage::Store;
use chrono::{DateTime, Local, TimeZone};
use std::sync::Arc;
use tracing::warn;

/// Number of today's activities shown on the dashboard.
pub const RECENT_LIMIT: usize = 5;

type Listener = Box<dyn Fn(&[Activity], &[Goal]) + Send>;

pub struct Tracker<S: Store> {
    activities: ActivityRepository<S>,
    goals: GoalRepository<S>,
    listeners: Vec<Listener>,
}

impl<S: Store> Tracker<S> {
    pub fn open(store: Arc<S>) -> Self {
        Self::open_at(store, &Local::now())
    }

    /// Loads both collections and brings every goal's `current` up to date
    /// for the day of `now`.
    ///
    /// A failed write of the refreshed goals is logged and the tracker still
    /// opens with its in-memory state.
    pub fn open_at<Tz: TimeZone>(store: Arc<S>, now: &DateTime<Tz>) -> Self {
        let mut tracker = Self {
            activities: ActivityRepository::load(Arc::clone(&store)),
            goals: GoalRepository::load(store),
            listeners: Vec::new(),
        };
        if tracker.recompute(now).is_err() {
            warn!("opened with goal progress that is not persisted");
        }
        tracker
    }

    /// Registers a callback run after every recompute pass.
    pub fn subscribe(&mut self, listener: impl Fn(&[Activity], &[Goal]) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn add_activity(&mut self, input: &NewActivity) -> TrackerResult<Activity> {
        self.add_activity_at(input, &Local::now())
    }

    pub fn add_activity_at<Tz: TimeZone>(
        &mut self,
        input: &NewActivity,
        now: &DateTime<Tz>,
    ) -> TrackerResult<Activity> {
        let added = self.activities.add(input, now.timestamp_millis());
        if let Err(TrackerError::Validation(_)) = added {
            return added;
        }
        let recomputed = self.recompute(now);
        let activity = added?;
        recomputed?;
        Ok(activity)
    }

    /// Deletes the activity with `id`; returns whether it existed.
    ///
    /// An unknown id changes nothing, including the goals.
    pub fn delete_activity(&mut self, id: &str) -> TrackerResult<bool> {
        self.delete_activity_at(id, &Local::now())
    }

    pub fn delete_activity_at<Tz: TimeZone>(
        &mut self,
        id: &str,
        now: &DateTime<Tz>,
    ) -> TrackerResult<bool> {
        let deleted = self.activities.delete(id);
        if let Ok(false) = deleted {
            return deleted;
        }
        let recomputed = self.recompute(now);
        let deleted = deleted?;
        recomputed?;
        Ok(deleted)
    }

    pub fn list_activities(&self) -> &[Activity] {
        self.activities.list()
    }

    /// History view: activities passing `filter`, newest first.
    pub fn list_activities_filtered(&self, filter: ActivityFilter) -> Vec<Activity> {
        let mut activities: Vec<Activity> = self
            .activities
            .list()
            .iter()
            .filter(|activity| filter.matches(activity))
            .cloned()
            .collect();
        activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        activities
    }

    pub fn list_goals(&self) -> &[Goal] {
        self.goals.list()
    }

    pub fn activity_count(&self) -> usize {
        self.activities.list().len()
    }

    pub fn daily_summary(&self) -> DailySummary {
        self.daily_summary_at(&Local::now())
    }

    pub fn daily_summary_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DailySummary {
        daily_summary_at(self.activities.list(), now)
    }

    /// Today's activities, newest first, at most `limit` of them.
    pub fn today_activities_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        limit: usize,
    ) -> Vec<Activity> {
        let mut todays: Vec<Activity> = self
            .activities
            .list()
            .iter()
            .filter(|activity| is_same_day(activity.timestamp, now))
            .cloned()
            .collect();
        todays.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        todays.truncate(limit);
        todays
    }

    pub fn dashboard(&self) -> DashboardResponse {
        self.dashboard_at(&Local::now())
    }

    pub fn dashboard_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DashboardResponse {
        DashboardResponse {
            date: now.date_naive().to_string(),
            summary: self.daily_summary_at(now),
            goals: self.goals.list().iter().cloned().map(GoalProgress::from).collect(),
            recent: self.today_activities_at(now, RECENT_LIMIT),
            total_activities: self.activity_count(),
        }
    }

    fn recompute<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> TrackerResult<()> {
        let recomputed = recompute_goals_at(self.activities.list(), self.goals.list(), now);
        let saved = self.goals.replace_currents(&recomputed);
        if let Err(err) = &saved {
            warn!("goal progress not persisted: {err}");
        }
        for listener in &self.listeners {
            listener(self.activities.list(), self.goals.list());
        }
        saved.map_err(TrackerError::from)
    }
}
