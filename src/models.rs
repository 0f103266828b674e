use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Fitness,
    Habit,
    Task,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fitness => "fitness",
            Self::Habit => "habit",
            Self::Task => "task",
        }
    }

    /// Unit assigned to a new activity when the caller leaves it blank.
    pub fn default_unit(self) -> &'static str {
        match self {
            Self::Fitness => "minutes",
            Self::Habit | Self::Task => "count",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fitness" => Ok(Self::Fitness),
            "habit" => Ok(Self::Habit),
            "task" => Ok(Self::Task),
            other => Err(ValidationError::UnknownType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub name: String,
    pub value: f64,
    pub unit: String,
    /// Creation instant in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target: f64,
    pub current: f64,
    pub unit: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
}

impl Goal {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ActivityType,
        target: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target,
            current: 0.0,
            unit: unit.into(),
            kind,
        }
    }

    /// Share of the target reached today, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        (self.current / self.target * 100.0).min(100.0)
    }
}

/// Goals seeded on first run when nothing has been persisted yet.
pub fn default_goals() -> Vec<Goal> {
    vec![
        Goal::new("1", "Daily Exercise", ActivityType::Fitness, 30.0, "minutes"),
        Goal::new("2", "Water Intake", ActivityType::Habit, 8.0, "glasses"),
        Goal::new("3", "Deep Work", ActivityType::Task, 4.0, "hours"),
    ]
}

/// Caller-supplied fields of an activity that has not been logged yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub kind: ActivityType,
    pub name: String,
    pub value: f64,
    pub unit: Option<String>,
}

impl NewActivity {
    pub fn new(kind: ActivityType, name: impl Into<String>, value: f64) -> Self {
        Self {
            kind,
            name: name.into(),
            value,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Checks the input and returns the normalized `(name, value, unit)`.
    pub fn validate(&self) -> Result<(String, f64, String), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !self.value.is_finite() {
            return Err(ValidationError::InvalidValue(self.value.to_string()));
        }
        if self.value < 0.0 {
            return Err(ValidationError::NegativeValue(self.value));
        }
        let unit = match self.unit.as_deref().map(str::trim) {
            Some(unit) if !unit.is_empty() => unit.to_string(),
            _ => self.kind.default_unit().to_string(),
        };
        Ok((name.to_string(), self.value, unit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySummary {
    pub fitness: f64,
    pub habit: f64,
    pub task: f64,
}

impl DailySummary {
    pub fn get(&self, kind: ActivityType) -> f64 {
        match kind {
            ActivityType::Fitness => self.fitness,
            ActivityType::Habit => self.habit,
            ActivityType::Task => self.task,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    #[default]
    All,
    Only(ActivityType),
}

impl ActivityFilter {
    pub fn matches(self, activity: &Activity) -> bool {
        match self {
            Self::All => true,
            Self::Only(kind) => activity.kind == kind,
        }
    }
}

impl FromStr for ActivityFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// JSON body of `POST /api/activities`.
#[derive(Debug, Deserialize)]
pub struct AddActivityRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub value: RawValue,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Quantity as submitted by a form: either a JSON number or numeric text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn parse(&self) -> Result<f64, ValidationError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidValue(text.clone())),
        }
    }
}

impl AddActivityRequest {
    pub fn into_new_activity(self) -> Result<NewActivity, ValidationError> {
        Ok(NewActivity {
            kind: self.kind.parse()?,
            value: self.value.parse()?,
            name: self.name,
            unit: self.unit,
        })
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ActivityQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: f64,
}

impl From<Goal> for GoalProgress {
    fn from(goal: Goal) -> Self {
        Self {
            progress: goal.progress_percent(),
            goal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub date: String,
    pub summary: DailySummary,
    pub goals: Vec<GoalProgress>,
    pub recent: Vec<Activity>,
    pub total_activities: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_serializes_with_type_field() {
        let activity = Activity {
            id: "a1".into(),
            kind: ActivityType::Habit,
            name: "Water Glass #1".into(),
            value: 1.0,
            unit: "count".into(),
            timestamp: 1_767_600_000_000,
        };
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "habit");
        assert_eq!(json["timestamp"], 1_767_600_000_000i64);
        let back: Activity = serde_json::from_value(json).unwrap();
        assert_eq!(back, activity);
    }

    #[test]
    fn validate_defaults_unit_by_type() {
        let input = NewActivity::new(ActivityType::Fitness, "  Morning Run ", 20.0);
        let (name, value, unit) = input.validate().unwrap();
        assert_eq!(name, "Morning Run");
        assert_eq!(value, 20.0);
        assert_eq!(unit, "minutes");

        let input = NewActivity::new(ActivityType::Task, "Report", 1.0).with_unit("  ");
        assert_eq!(input.validate().unwrap().2, "count");

        let input = NewActivity::new(ActivityType::Habit, "Water", 2.0).with_unit("glasses");
        assert_eq!(input.validate().unwrap().2, "glasses");
    }

    #[test]
    fn validate_rejects_bad_input() {
        let blank = NewActivity::new(ActivityType::Habit, "   ", 1.0);
        assert!(matches!(blank.validate(), Err(ValidationError::EmptyName)));

        let nan = NewActivity::new(ActivityType::Habit, "Water", f64::NAN);
        assert!(matches!(nan.validate(), Err(ValidationError::InvalidValue(_))));

        let negative = NewActivity::new(ActivityType::Habit, "Water", -1.0);
        assert!(matches!(negative.validate(), Err(ValidationError::NegativeValue(_))));
    }

    #[test]
    fn raw_value_accepts_numbers_and_numeric_text() {
        assert_eq!(RawValue::Number(2.5).parse().unwrap(), 2.5);
        assert_eq!(RawValue::Text(" 15 ".into()).parse().unwrap(), 15.0);
        assert!(RawValue::Text("ten".into()).parse().is_err());
        assert!(RawValue::Text(String::new()).parse().is_err());
    }

    #[test]
    fn filter_parses_all_and_types() {
        assert_eq!("all".parse::<ActivityFilter>().unwrap(), ActivityFilter::All);
        assert_eq!(
            "Fitness".parse::<ActivityFilter>().unwrap(),
            ActivityFilter::Only(ActivityType::Fitness)
        );
        assert!("sleep".parse::<ActivityFilter>().is_err());
    }

    #[test]
    fn progress_is_capped_and_guards_zero_target() {
        let mut goal = Goal::new("g", "Water Intake", ActivityType::Habit, 8.0, "glasses");
        goal.current = 4.0;
        assert_eq!(goal.progress_percent(), 50.0);
        goal.current = 12.0;
        assert_eq!(goal.progress_percent(), 100.0);
        goal.target = 0.0;
        assert_eq!(goal.progress_percent(), 0.0);
    }
}
