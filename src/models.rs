use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display color for a task category, mapped from the fixed palette table.
pub type CategoryColor = [u8; 3];

/// Task classification used for dot markers and list accents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum TaskCategory {
    Deadline,
    Important,
    Birthday,
    Reminder,
    #[default]
    Default,
}

impl From<String> for TaskCategory {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "deadline" => Self::Deadline,
            "important" => Self::Important,
            "birthday" => Self::Birthday,
            "reminder" => Self::Reminder,
            _ => Self::Default,
        }
    }
}

impl From<TaskCategory> for &'static str {
    fn from(category: TaskCategory) -> Self {
        match category {
            TaskCategory::Deadline => "deadline",
            TaskCategory::Important => "important",
            TaskCategory::Birthday => "birthday",
            TaskCategory::Reminder => "reminder",
            TaskCategory::Default => "default",
        }
    }
}

impl TaskCategory {
    pub fn color(self) -> CategoryColor {
        match self {
            Self::Deadline => [231, 76, 60],
            Self::Important => [241, 196, 15],
            Self::Birthday => [155, 89, 182],
            Self::Reminder => [46, 204, 113],
            Self::Default => [149, 165, 166],
        }
    }
}

/// A dated task as produced by the external task store.
///
/// The compositor only reads tasks; uniqueness of `id` is the store's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    /// Calendar date in `YYYY-MM-DD` form.
    pub date: String,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub created_at: String,
}

impl Task {
    /// Parses the task date, returning `None` for malformed values so the
    /// caller can skip the task instead of failing the render.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_falls_back_to_default() {
        let task: Task = serde_json::from_str(
            r#"{"id":"a1","title":"dentist","date":"2024-02-15","category":"urgent!!"}"#,
        )
        .expect("task should deserialize");
        assert_eq!(task.category, TaskCategory::Default);
    }

    #[test]
    fn category_round_trips_through_json() {
        let task = Task {
            id: "b2".to_string(),
            title: "cake".to_string(),
            date: "2024-03-01".to_string(),
            category: TaskCategory::Birthday,
            created_at: String::new(),
        };
        let serialized = serde_json::to_string(&task).expect("task should serialize");
        assert!(serialized.contains("\"category\":\"birthday\""));
    }

    #[test]
    fn malformed_date_parses_to_none() {
        let task = Task {
            id: "c3".to_string(),
            title: "broken".to_string(),
            date: "15/02/2024".to_string(),
            category: TaskCategory::Default,
            created_at: String::new(),
        };
        assert!(task.parsed_date().is_none());
    }

    #[test]
    fn valid_date_parses() {
        let task = Task {
            id: "d4".to_string(),
            title: "ok".to_string(),
            date: "2024-02-15".to_string(),
            category: TaskCategory::Deadline,
            created_at: String::new(),
        };
        let date = task.parsed_date().expect("date should parse");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 15).expect("valid ymd"));
    }
}
