use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Study,
    Assignment,
    Project,
    Reading,
    Exam,
    Other,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Study => "study",
            Self::Assignment => "assignment",
            Self::Project => "project",
            Self::Reading => "reading",
            Self::Exam => "exam",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }
}

pub struct NewTask {
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub description: String,
}

impl NewTask {
    /// Quick-add form: title only, everything else defaulted.
    pub fn quick(title: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            title: title.into(),
            category: Category::Other,
            priority: Priority::Medium,
            due_date: today,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StatusFilter {
    Completed,
    Pending,
    #[default]
    All,
}

#[derive(Default)]
pub struct TaskFilter {
    pub due: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: StatusFilter,
    pub search: Option<String>,
    /// Inclusive due-date range, e.g. a calendar month.
    pub month_range: Option<(NaiveDate, NaiveDate)>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(due) = self.due {
            if task.due_date != due {
                return false;
            }
        }

        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }

        match self.status {
            StatusFilter::Completed if !task.completed => return false,
            StatusFilter::Pending if task.completed => return false,
            _ => {}
        }

        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            let hit = task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle)
                || task.category.name().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some((start, end)) = self.month_range {
            if task.due_date < start || task.due_date > end {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub text: String,
    pub time: String,
}
