use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The user-chosen predicate narrowing the visible entries.
///
/// All set conditions must hold. An empty `text` and a `None` date or tag
/// impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tag: Option<String>,
}

impl Filter {
    pub fn date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The tag condition, ignoring an empty tag.
    pub fn active_tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|tag| !tag.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.date.is_some() || self.active_tag().is_some() || !self.text.is_empty()
    }

    /// Returns the filter produced by a user action.
    pub fn apply(self, change: FilterChange) -> Self {
        match change {
            FilterChange::Day { date } => Self {
                date: Some(date),
                ..self
            },
            FilterChange::Tag { tag } => Self {
                tag: Some(tag),
                ..self
            },
            FilterChange::Search { date, text } => Self {
                date,
                text: text.to_lowercase(),
                tag: None,
            },
            FilterChange::Clear => Self::default(),
        }
    }
}

/// A user action on the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterChange {
    /// A calendar day was clicked.
    Day { date: NaiveDate },
    /// A palette tag was clicked.
    Tag { tag: String },
    /// The search form was submitted; it replaces date and text and drops the tag.
    Search {
        date: Option<NaiveDate>,
        text: String,
    },
    /// Every condition removed.
    Clear,
}
