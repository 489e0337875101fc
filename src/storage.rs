//! Read side of the JSON stores the desktop app maintains. All loading is
//! lenient: a missing or corrupt file yields an empty/default value, never
//! an error, so a bad store can degrade a render but not abort it.

use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::config::WallpaperSettings;
use crate::models::Task;

#[derive(Debug, Deserialize)]
struct TaskFile {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
struct NotesFile {
    #[serde(default)]
    content: String,
}

/// Loads the task list from a `{"tasks": [...]}` JSON file.
pub fn load_tasks(path: impl AsRef<Path>) -> Vec<Task> {
    fs::read_to_string(path.as_ref())
        .ok()
        .and_then(|contents| serde_json::from_str::<TaskFile>(&contents).ok())
        .map(|file| file.tasks)
        .unwrap_or_default()
}

/// Loads free-text notes from a `{"content": "..."}` JSON file.
pub fn load_notes(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path.as_ref())
        .ok()
        .and_then(|contents| serde_json::from_str::<NotesFile>(&contents).ok())
        .map(|file| file.content)
        .unwrap_or_default()
}

/// Loads settings, resolving defaults for missing keys and clamping every
/// percent field. A missing or unparsable file yields the defaults.
pub fn load_settings(path: impl AsRef<Path>) -> WallpaperSettings {
    fs::read_to_string(path.as_ref())
        .ok()
        .and_then(|contents| serde_json::from_str::<WallpaperSettings>(&contents).ok())
        .unwrap_or_default()
        .normalized()
}

/// Tasks whose date falls inside the given month. Malformed dates are
/// skipped.
pub fn tasks_for_month(tasks: &[Task], year: i32, month: u32) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| {
            task.parsed_date()
                .is_some_and(|date| date.year() == year && date.month() == month)
        })
        .collect()
}

/// Tasks dated between today and `days` out, sorted by date string.
pub fn upcoming_tasks<'a>(tasks: &'a [Task], today: NaiveDate, days: i64) -> Vec<&'a Task> {
    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|task| {
            task.parsed_date().is_some_and(|date| {
                let delta = date.signed_duration_since(today).num_days();
                (0..=days).contains(&delta)
            })
        })
        .collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date));
    upcoming
}

/// Tasks matching one exact `YYYY-MM-DD` date string.
pub fn tasks_for_date<'a>(tasks: &'a [Task], date: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|task| task.date == date).collect()
}
