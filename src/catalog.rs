//! Workouts available for dragging onto the planner.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entry::WorkoutEntry;
use crate::error::PlannerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Strength,
    Cardio,
    Flexibility,
    Recovery,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Strength => "strength",
            Category::Cardio => "cardio",
            Category::Flexibility => "flexibility",
            Category::Recovery => "recovery",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Strength => "Strength",
            Category::Cardio => "Cardio",
            Category::Flexibility => "Flexibility",
            Category::Recovery => "Recovery",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strength" => Ok(Category::Strength),
            "cardio" => Ok(Category::Cardio),
            "flexibility" => Ok(Category::Flexibility),
            "recovery" => Ok(Category::Recovery),
            _ => Err(PlannerError::UnknownCategory(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<u32>,
    pub category: Category,
}

impl WorkoutDefinition {
    pub fn new(name: impl Into<String>, minutes: Option<u32>, category: Category) -> Self {
        Self {
            name: name.into(),
            minutes,
            category,
        }
    }

    /// Label shown under the workout name, e.g. `45 min • Strength`.
    pub fn duration_label(&self) -> String {
        match self.minutes {
            Some(minutes) => format!("{minutes} min • {}", self.category.label()),
            None => self.category.label().to_string(),
        }
    }

    pub fn to_entry(&self) -> WorkoutEntry {
        WorkoutEntry::new(self.name.clone(), self.duration_label())
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    workouts: Vec<WorkoutDefinition>,
}

impl Default for Catalog {
    fn default() -> Self {
        use Category::{Cardio, Flexibility, Recovery, Strength};
        let workouts = vec![
            WorkoutDefinition::new("Chest Day", Some(60), Strength),
            WorkoutDefinition::new("Leg Day", Some(75), Strength),
            WorkoutDefinition::new("Back & Shoulders", Some(60), Strength),
            WorkoutDefinition::new("Arms & Abs", Some(45), Strength),
            WorkoutDefinition::new("Running", Some(30), Cardio),
            WorkoutDefinition::new("HIIT Training", Some(30), Cardio),
            WorkoutDefinition::new("Cycling", Some(45), Cardio),
            WorkoutDefinition::new("Yoga", Some(60), Flexibility),
            WorkoutDefinition::new("Stretching", Some(20), Flexibility),
            WorkoutDefinition::new("Rest Day", None, Recovery),
        ];
        Self { workouts }
    }
}

impl Catalog {
    pub fn new(workouts: Vec<WorkoutDefinition>) -> Self {
        Self { workouts }
    }

    pub fn workouts(&self) -> &[WorkoutDefinition] {
        &self.workouts
    }

    /// Workouts shown for `filter`, in catalog order.
    pub fn filter(&self, filter: CategoryFilter) -> impl Iterator<Item = &WorkoutDefinition> {
        self.workouts
            .iter()
            .filter(move |workout| filter.matches(workout.category))
    }

    pub fn find(&self, name: &str) -> Option<&WorkoutDefinition> {
        let name = name.trim();
        self.workouts
            .iter()
            .find(|workout| workout.name.eq_ignore_ascii_case(name))
    }
}
