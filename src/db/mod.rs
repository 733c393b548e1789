//! Database module - SQLite storage for the weekly plan and workout history

use anyhow::Result;
use chrono::{DateTime, Local};
use rusqlite::{Connection, params};

use crate::schedule::{CompletedWorkout, Day, Exercise, WeeklySchedule};

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS plan (
                day TEXT NOT NULL,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                series INTEGER NOT NULL,
                reps TEXT NOT NULL,
                pause TEXT NOT NULL,
                weight REAL NOT NULL,
                video_url TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS completed_workouts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                day TEXT NOT NULL,
                datetime TEXT NOT NULL,
                exercises TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Replace the stored weekly plan with the given one
    pub fn save_plan(&mut self, schedule: &WeeklySchedule) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM plan", [])?;
        for &day in Day::all() {
            for (position, e) in schedule.exercises(day).iter().enumerate() {
                tx.execute(
                    "INSERT INTO plan (day, position, name, series, reps, pause, weight, video_url)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        day.name(),
                        position as i64,
                        e.name,
                        e.series,
                        e.reps,
                        e.pause,
                        e.weight,
                        e.video_url,
                    ],
                )?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Load the weekly plan plus workout history into a fresh schedule
    pub fn load_schedule(&self) -> Result<WeeklySchedule> {
        let mut schedule = WeeklySchedule::new();

        let mut stmt = self.conn.prepare(
            "SELECT day, name, series, reps, pause, weight, video_url
             FROM plan ORDER BY day, position",
        )?;
        let rows = stmt.query_map([], |row| {
            let day: String = row.get(0)?;
            Ok((
                day,
                Exercise {
                    name: row.get(1)?,
                    series: row.get(2)?,
                    reps: row.get(3)?,
                    pause: row.get(4)?,
                    weight: row.get(5)?,
                    video_url: row.get(6)?,
                },
            ))
        })?;

        for row in rows {
            let (day, exercise) = row?;
            if let Ok(day) = day.parse::<Day>() {
                // An empty name here means a hand-edited db, skip the row
                let _ = schedule.add_exercise(day, exercise);
            }
        }

        for workout in self.get_completed()? {
            schedule.restore_completed(workout);
        }

        Ok(schedule)
    }

    /// Append a completed workout record
    pub fn add_completed(&self, workout: &CompletedWorkout) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO completed_workouts (day, datetime, exercises) VALUES (?1, ?2, ?3)",
            params![
                workout.day.name(),
                workout.datetime.to_rfc3339(),
                serde_json::to_string(&workout.exercises)?,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all completed workouts, oldest first
    pub fn get_completed(&self) -> Result<Vec<CompletedWorkout>> {
        let mut stmt = self.conn.prepare(
            "SELECT day, datetime, exercises FROM completed_workouts ORDER BY datetime",
        )?;

        let workouts = stmt
            .query_map([], |row| {
                let day: String = row.get(0)?;
                let datetime: String = row.get(1)?;
                let exercises: String = row.get(2)?;
                Ok((day, datetime, exercises))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = Vec::with_capacity(workouts.len());
        for (day, datetime, exercises) in workouts {
            let day = match day.parse::<Day>() {
                Ok(d) => d,
                Err(_) => continue,
            };
            let datetime = DateTime::parse_from_rfc3339(&datetime)
                .map(|d| d.with_timezone(&Local))
                .unwrap_or_else(|_| Local::now());
            let exercises: Vec<Exercise> = serde_json::from_str(&exercises)?;
            result.push(CompletedWorkout { day, datetime, exercises });
        }

        Ok(result)
    }
}
