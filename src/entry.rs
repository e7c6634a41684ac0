use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// A workout placed on a schedule day.
///
/// `duration` is a display label such as `"45 min • Strength"` and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub name: String,
    pub duration: String,
}

impl WorkoutEntry {
    pub fn new(name: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: duration.into(),
        }
    }

    /// Builds an entry, rejecting a blank name.
    pub fn try_new(name: impl Into<String>, duration: impl Into<String>) -> PlannerResult<Self> {
        let entry = Self::new(name, duration);
        entry.validate()?;
        Ok(entry)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if self.name.trim().is_empty() {
            return Err(PlannerError::InvalidEntry(
                "workout name must not be empty".into(),
            ));
        }
        Ok(())
    }
}
