//! Weekly schedule - in-memory store for the week's exercises and
//! completed-workout history

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The seven fixed weekday keys of a schedule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days in week order, for iteration
    pub fn all() -> &'static [Day] {
        &[
            Day::Monday,
            Day::Tuesday,
            Day::Wednesday,
            Day::Thursday,
            Day::Friday,
            Day::Saturday,
            Day::Sunday,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monday" | "mon" => Ok(Day::Monday),
            "tuesday" | "tue" => Ok(Day::Tuesday),
            "wednesday" | "wed" => Ok(Day::Wednesday),
            "thursday" | "thu" => Ok(Day::Thursday),
            "friday" | "fri" => Ok(Day::Friday),
            "saturday" | "sat" => Ok(Day::Saturday),
            "sunday" | "sun" => Ok(Day::Sunday),
            other => Err(format!("unknown day: {other}")),
        }
    }
}

/// A single prescribed movement within a day's plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    /// Number of sets
    pub series: u32,
    /// Free-form rep scheme, e.g. "8-10"
    pub reps: String,
    /// Rest between sets in seconds, free-form
    pub pause: String,
    /// Working weight in kg
    pub weight: f64,
    pub video_url: Option<String>,
}

/// Record that a day's exercises were performed on a given date.
/// The exercise list is a snapshot copy, independent of later edits
/// to the live schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedWorkout {
    pub day: Day,
    pub datetime: DateTime<Local>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("exercise name cannot be empty")]
    EmptyName,

    #[error("{day} has no exercise at position {index}")]
    IndexOutOfRange { day: Day, index: usize },

    #[error("no exercises scheduled for {0}")]
    EmptyDay(Day),

    #[error("{0} was already saved today")]
    AlreadySaved(Day),
}

/// In-memory weekly plan plus this session's completed-workout history.
///
/// All operations are synchronous; failures are validation errors meant
/// to be shown to the user and corrected.
#[derive(Debug, Clone)]
pub struct WeeklySchedule {
    days: HashMap<Day, Vec<Exercise>>,
    completed: Vec<CompletedWorkout>,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl WeeklySchedule {
    /// Empty schedule with all seven days present
    pub fn new() -> Self {
        let days = Day::all().iter().map(|&d| (d, Vec::new())).collect();
        Self { days, completed: Vec::new() }
    }

    /// Exercises planned for a day, in execution order
    pub fn exercises(&self, day: Day) -> &[Exercise] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn completed(&self) -> &[CompletedWorkout] {
        &self.completed
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }

    /// Append an exercise to a day's plan
    pub fn add_exercise(&mut self, day: Day, exercise: Exercise) -> Result<(), ScheduleError> {
        if exercise.name.trim().is_empty() {
            return Err(ScheduleError::EmptyName);
        }
        self.days.entry(day).or_default().push(exercise);
        Ok(())
    }

    /// Replace the exercise at `index` in a day's plan
    pub fn update_exercise(
        &mut self,
        day: Day,
        index: usize,
        exercise: Exercise,
    ) -> Result<(), ScheduleError> {
        if exercise.name.trim().is_empty() {
            return Err(ScheduleError::EmptyName);
        }
        let slot = self
            .days
            .entry(day)
            .or_default()
            .get_mut(index)
            .ok_or(ScheduleError::IndexOutOfRange { day, index })?;
        *slot = exercise;
        Ok(())
    }

    /// Remove and return the exercise at `index` in a day's plan
    pub fn delete_exercise(&mut self, day: Day, index: usize) -> Result<Exercise, ScheduleError> {
        let list = self.days.entry(day).or_default();
        if index >= list.len() {
            return Err(ScheduleError::IndexOutOfRange { day, index });
        }
        Ok(list.remove(index))
    }

    /// Record the day's plan as performed at `now`.
    ///
    /// At most one workout per (day, calendar date): a second save on the
    /// same local date is rejected and history is left untouched.
    pub fn save_workout(
        &mut self,
        day: Day,
        now: DateTime<Local>,
    ) -> Result<CompletedWorkout, ScheduleError> {
        let exercises = self.exercises(day);
        if exercises.is_empty() {
            return Err(ScheduleError::EmptyDay(day));
        }

        let already_saved = self
            .completed
            .iter()
            .any(|w| w.day == day && w.datetime.date_naive() == now.date_naive());
        if already_saved {
            return Err(ScheduleError::AlreadySaved(day));
        }

        let workout = CompletedWorkout {
            day,
            datetime: now,
            exercises: exercises.to_vec(),
        };
        self.completed.push(workout.clone());
        Ok(workout)
    }

    /// Re-attach a previously recorded workout (used when loading history
    /// from the database, so the duplicate-save rule sees past saves)
    pub fn restore_completed(&mut self, workout: CompletedWorkout) {
        self.completed.push(workout);
    }

    /// Built-in starter plan, seeded on first run
    pub fn starter_plan() -> Self {
        let mut plan = Self::new();
        let seed = [
            (Day::Monday, "Bench Press", 4, "8-10", "90", 60.0,
             "https://www.youtube.com/watch?v=XSza8hVTlmM"),
            (Day::Monday, "Squats", 4, "10-12", "120", 80.0,
             "https://www.youtube.com/watch?v=aclHkVaku9U"),
            (Day::Tuesday, "Pull-ups", 3, "8-10", "90", 0.0,
             "https://www.youtube.com/watch?v=eGo4IYlbE5g"),
            (Day::Tuesday, "Barbell Row", 3, "10-12", "90", 50.0,
             "https://www.youtube.com/watch?v=G8l_8chR5BE"),
            (Day::Wednesday, "Overhead Press", 4, "8-10", "90", 40.0,
             "https://www.youtube.com/watch?v=2yjwXTZQDDI"),
            (Day::Wednesday, "Lateral Raises", 3, "12-15", "60", 10.0,
             "https://www.youtube.com/watch?v=3VcKaXpzqRo"),
            (Day::Saturday, "Deadlift", 4, "6-8", "120", 100.0,
             "https://www.youtube.com/watch?v=1ZXobu7JvvE"),
            (Day::Saturday, "Hip Thrust", 3, "12-15", "90", 70.0,
             "https://www.youtube.com/watch?v=xDmFkJxPzeM"),
        ];

        for (day, name, series, reps, pause, weight, url) in seed {
            // Names are non-empty constants, add cannot fail
            let _ = plan.add_exercise(day, Exercise {
                name: name.to_string(),
                series,
                reps: reps.to_string(),
                pause: pause.to_string(),
                weight,
                video_url: Some(url.to_string()),
            });
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn exercise(name: &str) -> Exercise {
        Exercise {
            name: name.to_string(),
            series: 3,
            reps: "8-10".to_string(),
            pause: "90".to_string(),
            weight: 40.0,
            video_url: None,
        }
    }

    fn noon(year: i32, month: u32, day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_schedule_has_all_days_empty() {
        let schedule = WeeklySchedule::new();
        for &day in Day::all() {
            assert!(schedule.exercises(day).is_empty());
        }
        assert!(schedule.is_empty());
        assert!(schedule.completed().is_empty());
    }

    #[test]
    fn test_add_appends_and_preserves_order() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();
        assert_eq!(schedule.exercises(Day::Monday).len(), 1);

        schedule.add_exercise(Day::Monday, exercise("squats")).unwrap();
        let names: Vec<_> = schedule
            .exercises(Day::Monday)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["bench press", "squats"]);
    }

    #[test]
    fn test_add_does_not_touch_other_days() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();
        assert!(schedule.exercises(Day::Tuesday).is_empty());
    }

    #[test]
    fn test_add_rejects_empty_name() {
        let mut schedule = WeeklySchedule::new();
        let err = schedule.add_exercise(Day::Monday, exercise("")).unwrap_err();
        assert_eq!(err, ScheduleError::EmptyName);
        assert!(schedule.exercises(Day::Monday).is_empty());
    }

    #[test]
    fn test_add_rejects_whitespace_name() {
        let mut schedule = WeeklySchedule::new();
        let err = schedule.add_exercise(Day::Monday, exercise("   ")).unwrap_err();
        assert_eq!(err, ScheduleError::EmptyName);
    }

    #[test]
    fn test_update_replaces_only_target_index() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Friday, exercise("deadlift")).unwrap();
        schedule.add_exercise(Day::Friday, exercise("hip thrust")).unwrap();
        schedule.add_exercise(Day::Friday, exercise("lunges")).unwrap();

        let mut heavier = exercise("deadlift");
        heavier.weight = 110.0;
        schedule.update_exercise(Day::Friday, 0, heavier).unwrap();

        let list = schedule.exercises(Day::Friday);
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].weight, 110.0);
        assert_eq!(list[1].name, "hip thrust");
        assert_eq!(list[2].name, "lunges");
    }

    #[test]
    fn test_update_out_of_range() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();
        let err = schedule
            .update_exercise(Day::Monday, 1, exercise("squats"))
            .unwrap_err();
        assert_eq!(err, ScheduleError::IndexOutOfRange { day: Day::Monday, index: 1 });
    }

    #[test]
    fn test_update_rejects_empty_name() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();
        let err = schedule
            .update_exercise(Day::Monday, 0, exercise(""))
            .unwrap_err();
        assert_eq!(err, ScheduleError::EmptyName);
        assert_eq!(schedule.exercises(Day::Monday)[0].name, "bench press");
    }

    #[test]
    fn test_delete_preserves_relative_order() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();
        schedule.add_exercise(Day::Monday, exercise("squats")).unwrap();
        schedule.add_exercise(Day::Monday, exercise("dips")).unwrap();

        let removed = schedule.delete_exercise(Day::Monday, 1).unwrap();
        assert_eq!(removed.name, "squats");

        let names: Vec<_> = schedule
            .exercises(Day::Monday)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["bench press", "dips"]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut schedule = WeeklySchedule::new();
        let err = schedule.delete_exercise(Day::Sunday, 0).unwrap_err();
        assert_eq!(err, ScheduleError::IndexOutOfRange { day: Day::Sunday, index: 0 });
    }

    #[test]
    fn test_save_workout_empty_day_fails() {
        let mut schedule = WeeklySchedule::new();
        let err = schedule.save_workout(Day::Thursday, noon(2026, 8, 27)).unwrap_err();
        assert_eq!(err, ScheduleError::EmptyDay(Day::Thursday));
        assert!(schedule.completed().is_empty());
    }

    #[test]
    fn test_save_workout_records_snapshot() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();

        let workout = schedule.save_workout(Day::Monday, noon(2026, 8, 27)).unwrap();
        assert_eq!(workout.day, Day::Monday);
        assert_eq!(workout.exercises.len(), 1);
        assert_eq!(schedule.completed().len(), 1);
    }

    #[test]
    fn test_save_workout_duplicate_same_date_fails() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();

        let morning = noon(2026, 8, 27) - Duration::hours(3);
        let evening = noon(2026, 8, 27) + Duration::hours(6);
        schedule.save_workout(Day::Monday, morning).unwrap();

        let err = schedule.save_workout(Day::Monday, evening).unwrap_err();
        assert_eq!(err, ScheduleError::AlreadySaved(Day::Monday));
        assert_eq!(schedule.completed().len(), 1);
    }

    #[test]
    fn test_save_workout_next_day_succeeds() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();

        schedule.save_workout(Day::Monday, noon(2026, 8, 27)).unwrap();
        schedule.save_workout(Day::Monday, noon(2026, 9, 3)).unwrap();
        assert_eq!(schedule.completed().len(), 2);
    }

    #[test]
    fn test_save_workout_other_day_same_date_succeeds() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();
        schedule.add_exercise(Day::Tuesday, exercise("pull-ups")).unwrap();

        schedule.save_workout(Day::Monday, noon(2026, 8, 27)).unwrap();
        schedule.save_workout(Day::Tuesday, noon(2026, 8, 27)).unwrap();
        assert_eq!(schedule.completed().len(), 2);
    }

    #[test]
    fn test_snapshot_independent_of_later_edits() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();
        let workout = schedule.save_workout(Day::Monday, noon(2026, 8, 27)).unwrap();

        schedule.delete_exercise(Day::Monday, 0).unwrap();
        let mut changed = exercise("incline press");
        changed.weight = 70.0;
        schedule.add_exercise(Day::Monday, changed).unwrap();

        assert_eq!(workout.exercises[0].name, "bench press");
        assert_eq!(schedule.completed()[0].exercises[0].name, "bench press");
    }

    #[test]
    fn test_restore_completed_feeds_duplicate_check() {
        let mut schedule = WeeklySchedule::new();
        schedule.add_exercise(Day::Monday, exercise("bench press")).unwrap();

        let today = noon(2026, 8, 27);
        schedule.restore_completed(CompletedWorkout {
            day: Day::Monday,
            datetime: today - Duration::hours(5),
            exercises: vec![exercise("bench press")],
        });

        let err = schedule.save_workout(Day::Monday, today).unwrap_err();
        assert_eq!(err, ScheduleError::AlreadySaved(Day::Monday));
    }

    #[test]
    fn test_day_parse() {
        assert_eq!("monday".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("SAT".parse::<Day>().unwrap(), Day::Saturday);
        assert!("someday".parse::<Day>().is_err());
    }

    #[test]
    fn test_starter_plan_layout() {
        let plan = WeeklySchedule::starter_plan();
        assert_eq!(plan.exercises(Day::Monday).len(), 2);
        assert_eq!(plan.exercises(Day::Saturday).len(), 2);
        assert!(plan.exercises(Day::Thursday).is_empty());
        assert!(plan.exercises(Day::Sunday).is_empty());
        assert_eq!(plan.exercises(Day::Monday)[0].name, "Bench Press");
    }
}
