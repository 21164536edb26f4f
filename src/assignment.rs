use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recurrence tag attached to an assignment. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    #[default]
    None,
    Weekly,
    Monthly,
}

impl RepeatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatType::None => "none",
            RepeatType::Weekly => "weekly",
            RepeatType::Monthly => "monthly",
        }
    }

    /// Strict parse of the stored tag.
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "none" => Some(RepeatType::None),
            "weekly" => Some(RepeatType::Weekly),
            "monthly" => Some(RepeatType::Monthly),
            _ => None,
        }
    }

    /// Anything other than `weekly` or `monthly` is `none`.
    pub fn coerce(value: &str) -> Self {
        Self::from_str(value.trim()).unwrap_or_default()
    }

    pub fn variants() -> &'static [(&'static str, &'static str)] {
        &[
            ("none", "Does not repeat"),
            ("weekly", "Repeats every week"),
            ("monthly", "Repeats every month"),
        ]
    }
}

impl fmt::Display for RepeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub course: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub repeat_type: RepeatType,
}

impl Assignment {
    pub fn new(
        name: impl Into<String>,
        course: impl Into<String>,
        due_date: NaiveDate,
        repeat_type: RepeatType,
    ) -> Self {
        Self {
            name: name.into(),
            course: course.into(),
            due_date,
            repeat_type,
        }
    }

    pub fn due_date_iso(&self) -> String {
        self.due_date.format(crate::codec::DATE_FORMAT).to_string()
    }
}
