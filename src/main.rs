//! rutina - Personal weekly workout planner and tracker

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

use rutina::config::{Config, Theme};
use rutina::db::Database;
use rutina::schedule::{Day, Exercise, WeeklySchedule};
use rutina::tui::{App, open_url};

const CONFIG_PATH: &str = "rutina.json";

#[derive(Parser)]
#[command(name = "rutina")]
#[command(author, version, about = "Personal weekly workout planner and tracker")]
struct Cli {
    /// Database path (or set RUTINA_DB env var)
    #[arg(long, env = "RUTINA_DB", default_value = "rutina.db")]
    db: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Add an exercise to a day's plan
    Add {
        /// Day of the week (e.g. "monday" or "mon")
        day: Day,

        /// Exercise name
        name: String,

        /// Number of sets
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        series: u32,

        /// Rep scheme, e.g. "8-10"
        #[arg(short, long, default_value = "10-12")]
        reps: String,

        /// Rest between sets in seconds
        #[arg(short, long, default_value = "60")]
        pause: String,

        /// Working weight in kg
        #[arg(short, long, default_value = "0", value_parser = parse_weight)]
        weight: f64,

        /// Demonstration video URL
        #[arg(short, long)]
        video: Option<String>,
    },

    /// List a day's plan, or the whole week
    List {
        /// Day of the week; omit for all days
        day: Option<Day>,
    },

    /// Edit an exercise in place
    Edit {
        day: Day,

        /// Position within the day (see `list`)
        index: usize,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        series: Option<u32>,

        #[arg(short, long)]
        reps: Option<String>,

        #[arg(short, long)]
        pause: Option<String>,

        #[arg(short, long, value_parser = parse_weight)]
        weight: Option<f64>,

        #[arg(short, long)]
        video: Option<String>,
    },

    /// Delete an exercise from a day's plan
    Delete {
        day: Day,

        /// Position within the day (see `list`)
        index: usize,
    },

    /// Save today's run of a day's plan into history
    Complete { day: Day },

    /// Show completed-workout history
    History {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Open an exercise's demonstration video
    Open {
        day: Day,

        /// Position within the day (see `list`)
        index: usize,
    },

    /// Show or change settings
    Config {
        /// First day shown in week views (e.g. "monday" or "mon")
        #[arg(long)]
        start_day: Option<Day>,

        /// Color scheme: light, dark or system
        #[arg(long)]
        theme: Option<Theme>,
    },
}

/// Weight must be a non-negative number
fn parse_weight(s: &str) -> Result<f64, String> {
    let weight: f64 = s.parse().map_err(|_| format!("invalid weight: {s}"))?;
    if weight < 0.0 {
        return Err(format!("weight cannot be negative: {s}"));
    }
    Ok(weight)
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut db = Database::open(&cli.db)?;
    let config = Config::load(Path::new(CONFIG_PATH))?;

    let mut schedule = db.load_schedule()?;
    if schedule.is_empty() && schedule.completed().is_empty() {
        // First run: seed the built-in starter plan
        schedule = WeeklySchedule::starter_plan();
        db.save_plan(&schedule)?;
        info!("seeded starter plan");
    }

    match cli.command {
        Some(Commands::Tui) | None => {
            let mut app = App::new(db, config)?;
            app.run()?;
        }

        Some(Commands::Add { day, name, series, reps, pause, weight, video }) => {
            let exercise = Exercise {
                name: name.clone(),
                series,
                reps,
                pause,
                weight,
                video_url: video,
            };
            schedule.add_exercise(day, exercise)?;
            db.save_plan(&schedule)?;
            println!("Added {} to {} ({} exercises)", name, day, schedule.exercises(day).len());
        }

        Some(Commands::List { day }) => {
            let days: Vec<Day> = match day {
                Some(d) => vec![d],
                None => config.week_order(),
            };
            for day in days {
                let exercises = schedule.exercises(day);
                println!("{}", day);
                println!("{:-<60}", "");
                if exercises.is_empty() {
                    println!("  (rest day)");
                }
                for (i, e) in exercises.iter().enumerate() {
                    println!(
                        "  {} | {:25} | {}x{} | {}s rest | {} kg{}",
                        i,
                        e.name,
                        e.series,
                        e.reps,
                        e.pause,
                        e.weight,
                        if e.video_url.is_some() { " | video" } else { "" },
                    );
                }
            }
        }

        Some(Commands::Edit { day, index, name, series, reps, pause, weight, video }) => {
            let Some(current) = schedule.exercises(day).get(index).cloned() else {
                anyhow::bail!("{day} has no exercise at position {index}");
            };
            let updated = Exercise {
                name: name.unwrap_or(current.name),
                series: series.unwrap_or(current.series),
                reps: reps.unwrap_or(current.reps),
                pause: pause.unwrap_or(current.pause),
                weight: weight.unwrap_or(current.weight),
                video_url: video.or(current.video_url),
            };
            schedule.update_exercise(day, index, updated)?;
            db.save_plan(&schedule)?;
            println!("Updated {} #{}", day, index);
        }

        Some(Commands::Delete { day, index }) => {
            let removed = schedule.delete_exercise(day, index)?;
            db.save_plan(&schedule)?;
            println!("Deleted {} from {}", removed.name, day);
        }

        Some(Commands::Complete { day }) => {
            let workout = schedule.save_workout(day, Local::now())?;
            db.add_completed(&workout)?;
            println!(
                "{} saved: {} exercises done at {}",
                workout.day,
                workout.exercises.len(),
                workout.datetime.format("%H:%M"),
            );
        }

        Some(Commands::History { limit }) => {
            println!("Completed workouts:");
            println!("{:-<60}", "");
            for w in schedule.completed().iter().rev().take(limit) {
                let names: Vec<_> = w.exercises.iter().map(|e| e.name.as_str()).collect();
                println!(
                    "{} | {:10} | {}",
                    w.datetime.format("%Y-%m-%d %H:%M"),
                    w.day.name(),
                    names.join(", "),
                );
            }
        }

        Some(Commands::Open { day, index }) => {
            let Some(exercise) = schedule.exercises(day).get(index) else {
                anyhow::bail!("{day} has no exercise at position {index}");
            };
            match &exercise.video_url {
                Some(url) => {
                    open_url(url)?;
                    println!("Opening {url}");
                }
                None => println!("No video for {}", exercise.name),
            }
        }

        Some(Commands::Config { start_day, theme }) => {
            let mut config = config;
            if let Some(day) = start_day {
                config.start_day = day;
            }
            if let Some(theme) = theme {
                config.theme = theme;
            }
            config.save(Path::new(CONFIG_PATH))?;
            println!("start day: {} | theme: {}", config.start_day, config.theme);
        }
    }

    Ok(())
}
