use std::fmt;
use std::str::FromStr;

use crate::entry::WorkoutEntry;
use crate::error::PlannerError;
use crate::schedule::WeeklySchedule;
use crate::weekday::WeekDay;

type TemplateDay = (WeekDay, &'static [(&'static str, &'static str)]);

const BEGINNER: &[TemplateDay] = &[
    (WeekDay::Monday, &[("Chest Day", "45 min • Strength")]),
    (WeekDay::Wednesday, &[("Leg Day", "45 min • Strength")]),
    (WeekDay::Friday, &[("Back & Shoulders", "45 min • Strength")]),
    (WeekDay::Sunday, &[("Rest Day", "Recovery")]),
];

const INTERMEDIATE: &[TemplateDay] = &[
    (WeekDay::Monday, &[("Chest Day", "60 min • Strength")]),
    (WeekDay::Tuesday, &[("Running", "30 min • Cardio")]),
    (WeekDay::Wednesday, &[("Leg Day", "75 min • Strength")]),
    (WeekDay::Thursday, &[("HIIT Training", "30 min • Cardio")]),
    (WeekDay::Friday, &[("Back & Shoulders", "60 min • Strength")]),
    (WeekDay::Sunday, &[("Rest Day", "Recovery")]),
];

const ADVANCED: &[TemplateDay] = &[
    (WeekDay::Monday, &[("Chest Day", "60 min • Strength")]),
    (WeekDay::Tuesday, &[("Leg Day", "75 min • Strength")]),
    (WeekDay::Wednesday, &[("HIIT Training", "30 min • Cardio")]),
    (WeekDay::Thursday, &[("Back & Shoulders", "60 min • Strength")]),
    (WeekDay::Friday, &[("Arms & Abs", "45 min • Strength")]),
    (WeekDay::Saturday, &[("Running", "30 min • Cardio")]),
    (WeekDay::Sunday, &[("Yoga", "60 min • Flexibility")]),
];

/// Predefined weekly plans that can replace the current schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl TemplateLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateLevel::Beginner => "beginner",
            TemplateLevel::Intermediate => "intermediate",
            TemplateLevel::Advanced => "advanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TemplateLevel::Beginner => "Beginner",
            TemplateLevel::Intermediate => "Intermediate",
            TemplateLevel::Advanced => "Advanced",
        }
    }

    pub fn variants() -> [(&'static str, &'static str); 3] {
        [
            (
                TemplateLevel::Beginner.as_str(),
                "Three strength days and a rest day",
            ),
            (
                TemplateLevel::Intermediate.as_str(),
                "Strength split with two cardio sessions",
            ),
            (
                TemplateLevel::Advanced.as_str(),
                "Seven-day plan mixing strength, cardio and yoga",
            ),
        ]
    }

    fn days(self) -> &'static [TemplateDay] {
        match self {
            TemplateLevel::Beginner => BEGINNER,
            TemplateLevel::Intermediate => INTERMEDIATE,
            TemplateLevel::Advanced => ADVANCED,
        }
    }

    /// Template entries in the order they are added to the planner.
    pub fn entries(self) -> impl Iterator<Item = (WeekDay, WorkoutEntry)> {
        self.days().iter().flat_map(|(day, workouts)| {
            workouts
                .iter()
                .map(move |(name, duration)| (*day, WorkoutEntry::new(*name, *duration)))
        })
    }

    pub fn schedule(self) -> WeeklySchedule {
        let mut schedule = WeeklySchedule::new();
        for (day, entry) in self.entries() {
            schedule.push(day, entry);
        }
        schedule
    }
}

impl fmt::Display for TemplateLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateLevel {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(TemplateLevel::Beginner),
            "intermediate" => Ok(TemplateLevel::Intermediate),
            "advanced" => Ok(TemplateLevel::Advanced),
            _ => Err(PlannerError::UnknownTemplate(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beginner_leaves_unlisted_days_empty() {
        let schedule = TemplateLevel::Beginner.schedule();
        assert_eq!(
            schedule.entries(WeekDay::Monday),
            &[WorkoutEntry::new("Chest Day", "45 min • Strength")]
        );
        assert!(schedule.is_day_empty(WeekDay::Tuesday));
        assert!(schedule.is_day_empty(WeekDay::Thursday));
        assert!(schedule.is_day_empty(WeekDay::Saturday));
        assert_eq!(schedule.total_entries(), 4);
    }

    #[test]
    fn advanced_fills_every_day() {
        let schedule = TemplateLevel::Advanced.schedule();
        assert!(WeekDay::ALL.iter().all(|day| !schedule.is_day_empty(*day)));
        assert_eq!(schedule.entries(WeekDay::Sunday)[0].name, "Yoga");
    }

    #[test]
    fn parses_known_levels_only() {
        assert_eq!(
            "Intermediate".parse::<TemplateLevel>().unwrap(),
            TemplateLevel::Intermediate
        );
        let err = "expert".parse::<TemplateLevel>().unwrap_err();
        assert!(matches!(err, PlannerError::UnknownTemplate(ref name) if name == "expert"));
    }

    #[test]
    fn variants_round_trip_through_from_str() {
        for (key, _) in TemplateLevel::variants() {
            assert_eq!(key.parse::<TemplateLevel>().unwrap().as_str(), key);
        }
    }
}
