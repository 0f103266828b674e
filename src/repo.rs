//! Repositories owning the two persisted collections.
//!
//! Each repository holds the only mutable copy of its collection and writes
//! the whole collection through the [`Store`] after every mutation. Callers
//! only ever see borrowed, read-only slices.

use crate::errors::{StoreError, TrackerResult};
use crate::models::{Activity, Goal, NewActivity, default_goals};
use crate::storage::{ACTIVITIES_KEY, GOALS_KEY, Store};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct ActivityRepository<S: Store> {
    store: Arc<S>,
    activities: Vec<Activity>,
}

impl<S: Store> ActivityRepository<S> {
    /// Loads persisted activities, starting empty when none are stored.
    pub fn load(store: Arc<S>) -> Self {
        let activities = store.load(ACTIVITIES_KEY).unwrap_or_default();
        Self { store, activities }
    }

    pub fn list(&self) -> &[Activity] {
        &self.activities
    }

    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id == id)
    }

    /// Validates `input`, logs it as a new activity stamped `timestamp_ms`
    /// and persists the collection.
    ///
    /// Invalid input leaves the collection untouched. When only the write
    /// fails, the activity stays in memory and the storage error is returned.
    pub fn add(&mut self, input: &NewActivity, timestamp_ms: i64) -> TrackerResult<Activity> {
        let (name, value, unit) = input.validate()?;
        let activity = Activity {
            id: Uuid::new_v4().to_string(),
            kind: input.kind,
            name,
            value,
            unit,
            timestamp: timestamp_ms,
        };
        self.activities.insert(0, activity.clone());
        info!(id = %activity.id, kind = %activity.kind, value = activity.value, "activity logged");

        self.persist()?;
        Ok(activity)
    }

    /// Removes the activity with `id`. Returns `Ok(false)` without writing
    /// anything when no such activity exists.
    pub fn delete(&mut self, id: &str) -> TrackerResult<bool> {
        let Some(index) = self.activities.iter().position(|activity| activity.id == id) else {
            debug!(id, "delete ignored, activity not found");
            return Ok(false);
        };
        let removed = self.activities.remove(index);
        info!(id = %removed.id, kind = %removed.kind, "activity deleted");

        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store.save(ACTIVITIES_KEY, &self.activities)
    }
}

pub struct GoalRepository<S: Store> {
    store: Arc<S>,
    goals: Vec<Goal>,
}

impl<S: Store> GoalRepository<S> {
    /// Loads persisted goals, seeding the default set on first run.
    pub fn load(store: Arc<S>) -> Self {
        let goals = store.load(GOALS_KEY).unwrap_or_else(|| {
            info!("no stored goals, seeding defaults");
            default_goals()
        });
        Self { store, goals }
    }

    pub fn list(&self) -> &[Goal] {
        &self.goals
    }

    /// Copies `current` from `recomputed` onto the goal with the same id and
    /// persists. Every other field keeps its stored value.
    pub(crate) fn replace_currents(&mut self, recomputed: &[Goal]) -> Result<(), StoreError> {
        for goal in &mut self.goals {
            goal.current = recomputed
                .iter()
                .find(|candidate| candidate.id == goal.id)
                .map_or(0.0, |candidate| candidate.current);
        }
        self.store.save(GOALS_KEY, &self.goals)
    }
}
