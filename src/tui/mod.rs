//! TUI module - Terminal dashboard with ratatui

use anyhow::Result;
use chrono::Local;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
};
use std::io::{Stdout, stdout};
use std::process::Command;

use crate::config::{Config, Theme};
use crate::db::Database;
use crate::schedule::{Day, Exercise, WeeklySchedule};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Which screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Schedule,
    History,
}

const FIELD_LABELS: [&str; 6] = ["Name", "Sets", "Reps", "Rest (s)", "Weight (kg)", "Video URL"];

/// Add/edit prompt, one field at a time
struct ExerciseForm {
    /// None = adding, Some(i) = editing position i
    editing: Option<usize>,
    fields: [String; 6],
    current: usize,
}

impl ExerciseForm {
    fn blank() -> Self {
        // Same defaults the dialog starts from
        Self {
            editing: None,
            fields: [
                String::new(),
                "1".to_string(),
                "10-12".to_string(),
                "60".to_string(),
                "0".to_string(),
                String::new(),
            ],
            current: 0,
        }
    }

    fn from_exercise(index: usize, exercise: &Exercise) -> Self {
        Self {
            editing: Some(index),
            fields: [
                exercise.name.clone(),
                exercise.series.to_string(),
                exercise.reps.clone(),
                exercise.pause.clone(),
                exercise.weight.to_string(),
                exercise.video_url.clone().unwrap_or_default(),
            ],
            current: 0,
        }
    }

    fn to_exercise(&self) -> Exercise {
        let video_url = self.fields[5].trim();
        Exercise {
            name: self.fields[0].trim().to_string(),
            series: self.fields[1].trim().parse().unwrap_or(1).max(1),
            reps: self.fields[2].trim().to_string(),
            pause: self.fields[3].trim().to_string(),
            weight: self.fields[4].trim().parse().unwrap_or(0.0_f64).max(0.0),
            video_url: (!video_url.is_empty()).then(|| video_url.to_string()),
        }
    }

    /// Numeric fields only accept what parses later
    fn accepts(&self, c: char) -> bool {
        match self.current {
            1 => c.is_ascii_digit(),
            4 => c.is_ascii_digit() || c == '.',
            _ => true,
        }
    }
}

/// App state for TUI
pub struct App {
    db: Database,
    config: Config,
    schedule: WeeklySchedule,
    week: Vec<Day>,
    day_index: usize,
    selected: usize,
    view: View,
    form: Option<ExerciseForm>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(db: Database, config: Config) -> Result<Self> {
        let schedule = db.load_schedule()?;
        let week = config.week_order();
        Ok(Self {
            db,
            config,
            schedule,
            week,
            day_index: 0,
            selected: 0,
            view: View::Schedule,
            form: None,
            status: None,
            should_quit: false,
        })
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }

        restore_terminal()?;
        Ok(())
    }

    fn day(&self) -> Day {
        self.week[self.day_index]
    }

    fn accent(&self) -> Color {
        match self.config.theme {
            Theme::Light => Color::Blue,
            Theme::Dark | Theme::System => Color::Cyan,
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new("rutina - Weekly Workout Planner")
            .style(Style::default().fg(self.accent()).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        // Day tabs
        let titles: Vec<_> = self.week.iter().map(|d| d.name()).collect();
        let tabs = Tabs::new(titles)
            .select(self.day_index)
            .highlight_style(Style::default().fg(self.accent()).bold())
            .block(Block::default().borders(Borders::ALL).title("Week"));
        frame.render_widget(tabs, chunks[1]);

        match self.view {
            View::Schedule => self.render_day(frame, chunks[2]),
            View::History => self.render_history(frame, chunks[2]),
        }

        // Footer: last validation message, or the keymap
        let footer_text = match &self.status {
            Some(msg) => msg.clone(),
            None => match self.view {
                View::Schedule => {
                    "q: quit | \u{2190}\u{2192}: day | \u{2191}\u{2193}: select | a: add | e: edit | d: delete | s: save day | v: video | h: history".to_string()
                }
                View::History => "q: quit | h/esc: back to schedule".to_string(),
            },
        };
        let footer_style = if self.status.is_some() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let footer = Paragraph::new(footer_text)
            .style(footer_style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[3]);

        if let Some(form) = &self.form {
            self.render_form(frame, area, form);
        }
    }

    fn render_day(&self, frame: &mut Frame, area: Rect) {
        let exercises = self.schedule.exercises(self.day());

        if exercises.is_empty() {
            let empty = Paragraph::new("No exercises scheduled for this day")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(Block::default().borders(Borders::ALL).title(self.day().name()));
            frame.render_widget(empty, area);
            return;
        }

        let rows: Vec<Row> = exercises
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let style = if i == self.selected {
                    Style::default().fg(self.accent()).bold()
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(e.name.clone()),
                    Cell::from(e.series.to_string()),
                    Cell::from(e.reps.clone()),
                    Cell::from(format!("{}s", e.pause)),
                    Cell::from(format!("{} kg", e.weight)),
                    Cell::from(if e.video_url.is_some() { "\u{25b6}" } else { "" }),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(5),
            ],
        )
        .header(
            Row::new(vec!["Exercise", "Sets", "Reps", "Rest", "Weight", "Video"])
                .style(Style::default().bold()),
        )
        .block(Block::default().borders(Borders::ALL).title(self.day().name()));

        frame.render_widget(table, area);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .schedule
            .completed()
            .iter()
            .rev()
            .map(|w| {
                let names: Vec<_> = w.exercises.iter().map(|e| e.name.as_str()).collect();
                Row::new(vec![
                    Cell::from(w.datetime.format("%Y-%m-%d %H:%M").to_string()),
                    Cell::from(w.day.name()),
                    Cell::from(w.exercises.len().to_string()),
                    Cell::from(names.join(", ")),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(11),
                Constraint::Length(5),
                Constraint::Min(20),
            ],
        )
        .header(Row::new(vec!["Date", "Day", "#", "Exercises"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Completed Workouts"));

        frame.render_widget(table, area);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, form: &ExerciseForm) {
        let popup = centered_rect(50, 12, area);
        frame.render_widget(Clear, popup);

        let title = if form.editing.is_some() { "Edit Exercise" } else { "Add Exercise" };
        let mut lines: Vec<Line> = Vec::with_capacity(FIELD_LABELS.len() + 2);
        for (i, label) in FIELD_LABELS.iter().enumerate() {
            let marker = if i == form.current { "> " } else { "  " };
            let style = if i == form.current {
                Style::default().fg(self.accent()).bold()
            } else {
                Style::default()
            };
            lines.push(Line::styled(
                format!("{marker}{label}: {}", form.fields[i]),
                style,
            ));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "enter: next/save | esc: cancel",
            Style::default().fg(Color::DarkGray),
        ));

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, popup);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if self.form.is_some() {
                self.handle_form_key(key.code)?;
            } else {
                self.handle_key(key.code)?;
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        self.status = None;
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') => {
                self.view = match self.view {
                    View::Schedule => View::History,
                    View::History => View::Schedule,
                };
            }
            KeyCode::Esc if self.view == View::History => self.view = View::Schedule,
            KeyCode::Left | KeyCode::BackTab => {
                self.day_index = (self.day_index + self.week.len() - 1) % self.week.len();
                self.selected = 0;
            }
            KeyCode::Right | KeyCode::Tab => {
                self.day_index = (self.day_index + 1) % self.week.len();
                self.selected = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.schedule.exercises(self.day()).len();
                if len > 0 && self.selected < len - 1 {
                    self.selected += 1;
                }
            }
            KeyCode::Char('a') if self.view == View::Schedule => {
                self.form = Some(ExerciseForm::blank());
            }
            KeyCode::Char('e') if self.view == View::Schedule => {
                if let Some(exercise) = self.schedule.exercises(self.day()).get(self.selected) {
                    self.form = Some(ExerciseForm::from_exercise(self.selected, exercise));
                }
            }
            KeyCode::Char('d') if self.view == View::Schedule => {
                match self.schedule.delete_exercise(self.day(), self.selected) {
                    Ok(removed) => {
                        self.db.save_plan(&self.schedule)?;
                        self.selected = self.selected.saturating_sub(1);
                        self.status = Some(format!("Deleted {}", removed.name));
                    }
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
            KeyCode::Char('s') if self.view == View::Schedule => {
                match self.schedule.save_workout(self.day(), Local::now()) {
                    Ok(workout) => {
                        self.db.add_completed(&workout)?;
                        self.status = Some(format!(
                            "{} saved, {} exercises done",
                            workout.day,
                            workout.exercises.len()
                        ));
                    }
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
            KeyCode::Char('v') if self.view == View::Schedule => {
                match self
                    .schedule
                    .exercises(self.day())
                    .get(self.selected)
                    .and_then(|e| e.video_url.as_deref())
                {
                    Some(url) => {
                        open_url(url)?;
                        self.status = Some(format!("Opening {url}"));
                    }
                    None => self.status = Some("No video for this exercise".to_string()),
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Result<()> {
        if code == KeyCode::Esc {
            self.form = None;
            return Ok(());
        }

        let at_last_field = self
            .form
            .as_ref()
            .is_some_and(|f| f.current + 1 == FIELD_LABELS.len());
        if code == KeyCode::Enter && at_last_field {
            return self.submit_form();
        }

        let Some(form) = self.form.as_mut() else {
            return Ok(());
        };
        match code {
            KeyCode::Backspace => {
                form.fields[form.current].pop();
            }
            KeyCode::Up | KeyCode::BackTab => {
                form.current = form.current.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Tab | KeyCode::Enter => {
                form.current = (form.current + 1).min(FIELD_LABELS.len() - 1);
            }
            KeyCode::Char(c) => {
                if form.accepts(c) {
                    form.fields[form.current].push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_form(&mut self) -> Result<()> {
        let Some(form) = self.form.take() else {
            return Ok(());
        };
        let exercise = form.to_exercise();
        let day = self.day();
        let result = match form.editing {
            Some(index) => self.schedule.update_exercise(day, index, exercise),
            None => self.schedule.add_exercise(day, exercise),
        };
        match result {
            Ok(()) => {
                self.db.save_plan(&self.schedule)?;
                self.status = None;
            }
            Err(e) => {
                // Keep the form open so the input can be corrected
                self.status = Some(e.to_string());
                self.form = Some(form);
            }
        }
        Ok(())
    }
}

/// Open a URL with the host's default handler
pub fn open_url(url: &str) -> Result<()> {
    #[cfg(target_os = "linux")]
    Command::new("xdg-open").arg(url).spawn()?;
    #[cfg(target_os = "macos")]
    Command::new("open").arg(url).spawn()?;
    #[cfg(target_os = "windows")]
    Command::new("cmd").args(["/C", "start", "", url]).spawn()?;
    Ok(())
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    // Widened to avoid u16 overflow on very wide terminals
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height.min(area.height))
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
