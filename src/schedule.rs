use serde::de::{Error as _, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::entry::WorkoutEntry;
use crate::error::{PlannerError, PlannerResult};
use crate::weekday::WeekDay;

/// A week of workouts: every day is always present, each holding entries in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Vec<WorkoutEntry>; 7],
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, day: WeekDay) -> &[WorkoutEntry] {
        &self.days[day.index()]
    }

    /// Appends `entry` to `day` and returns its position.
    pub fn push(&mut self, day: WeekDay, entry: WorkoutEntry) -> usize {
        let entries = &mut self.days[day.index()];
        entries.push(entry);
        entries.len() - 1
    }

    /// Removes the first entry on `day` whose name matches exactly.
    pub fn remove_first(&mut self, day: WeekDay, name: &str) -> Option<WorkoutEntry> {
        let entries = &mut self.days[day.index()];
        let position = entries.iter().position(|entry| entry.name == name)?;
        Some(entries.remove(position))
    }

    pub fn clear(&mut self) {
        for entries in &mut self.days {
            entries.clear();
        }
    }

    pub fn is_day_empty(&self, day: WeekDay) -> bool {
        self.days[day.index()].is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    pub fn total_entries(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WeekDay, &[WorkoutEntry])> + '_ {
        WeekDay::ALL
            .into_iter()
            .map(move |day| (day, self.entries(day)))
    }

    /// Checks every entry the way a snapshot is checked when it is read back.
    pub fn validate(&self) -> PlannerResult<()> {
        for (day, entries) in self.iter() {
            for entry in entries {
                entry.validate().map_err(|err| match err {
                    PlannerError::InvalidEntry(reason) => {
                        PlannerError::InvalidEntry(format!("{day}: {reason}"))
                    }
                    other => other,
                })?;
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WeekDay::ALL.len()))?;
        for (day, entries) in self.iter() {
            map.serialize_entry(&day, entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeeklySchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WeekVisitor)
    }
}

struct WeekVisitor;

impl<'de> Visitor<'de> for WeekVisitor {
    type Value = WeeklySchedule;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from week day to a list of workouts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        // Days absent from the document stay empty.
        let mut schedule = WeeklySchedule::new();
        let mut seen = [false; 7];
        while let Some(day) = map.next_key::<WeekDay>()? {
            if std::mem::replace(&mut seen[day.index()], true) {
                return Err(A::Error::custom(format!("duplicate day '{}'", day.as_str())));
            }
            let entries: Vec<WorkoutEntry> = map.next_value()?;
            for entry in &entries {
                entry
                    .validate()
                    .map_err(|err| A::Error::custom(format!("{day}: {err}")))?;
            }
            schedule.days[day.index()] = entries;
        }
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> WorkoutEntry {
        WorkoutEntry::new("Running", "30 min • Cardio")
    }

    #[test]
    fn new_schedule_has_every_day_empty() {
        let schedule = WeeklySchedule::new();
        for day in WeekDay::ALL {
            assert!(schedule.entries(day).is_empty(), "{day} should be empty");
        }
        assert!(schedule.is_empty());
        assert_eq!(schedule.iter().count(), 7);
    }

    #[test]
    fn remove_first_only_takes_one_duplicate() {
        let mut schedule = WeeklySchedule::new();
        schedule.push(WeekDay::Friday, running());
        schedule.push(WeekDay::Friday, WorkoutEntry::new("Yoga", "60 min • Flexibility"));
        schedule.push(WeekDay::Friday, running());

        let removed = schedule.remove_first(WeekDay::Friday, "Running");
        assert_eq!(removed, Some(running()));
        let names: Vec<_> = schedule
            .entries(WeekDay::Friday)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Yoga", "Running"]);
    }

    #[test]
    fn remove_first_without_match_is_noop() {
        let mut schedule = WeeklySchedule::new();
        schedule.push(WeekDay::Monday, running());
        assert_eq!(schedule.remove_first(WeekDay::Monday, "running"), None);
        assert_eq!(schedule.remove_first(WeekDay::Tuesday, "Running"), None);
        assert_eq!(schedule.total_entries(), 1);
    }

    #[test]
    fn serializes_all_days_in_week_order() {
        let mut schedule = WeeklySchedule::new();
        schedule.push(WeekDay::Sunday, WorkoutEntry::new("Rest Day", "Recovery"));
        let json = schedule.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"monday":[],"tuesday":[],"wednesday":[],"thursday":[],"friday":[],"saturday":[],"sunday":[{"name":"Rest Day","duration":"Recovery"}]}"#
        );
    }

    #[test]
    fn missing_days_default_to_empty() {
        let schedule =
            WeeklySchedule::from_json(r#"{"friday":[{"name":"Running","duration":"30 min • Cardio"}]}"#)
                .unwrap();
        assert_eq!(schedule.entries(WeekDay::Friday), &[running()]);
        assert!(schedule.is_day_empty(WeekDay::Monday));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(WeeklySchedule::from_json(r#"{"funday":[]}"#).is_err());
        assert!(WeeklySchedule::from_json(r#"{"monday":"Chest Day"}"#).is_err());
        assert!(WeeklySchedule::from_json(r#"{"monday":[{"name":"Chest Day"}]}"#).is_err());
        assert!(WeeklySchedule::from_json(r#"{"monday":[{"name":"","duration":"x"}]}"#).is_err());
        assert!(WeeklySchedule::from_json("[]").is_err());
    }

    #[test]
    fn duplicate_day_keys_are_rejected() {
        let json = r#"{"monday":[{"name":"Chest Day","duration":"60 min • Strength"}],"monday":[]}"#;
        let err = WeeklySchedule::from_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate day 'monday'"), "{err}");
    }

    #[test]
    fn validate_names_the_offending_day() {
        let mut schedule = WeeklySchedule::new();
        schedule.push(WeekDay::Monday, running());
        assert!(schedule.validate().is_ok());

        schedule.push(WeekDay::Wednesday, WorkoutEntry::new("  ", "20 min • Flexibility"));
        match schedule.validate() {
            Err(PlannerError::InvalidEntry(reason)) => assert!(reason.starts_with("wednesday")),
            other => panic!("expected invalid entry, got {other:?}"),
        }
    }
}
