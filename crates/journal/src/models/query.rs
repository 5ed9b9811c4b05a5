use chrono::NaiveDate;
use serde::Deserialize;

use journal_core::calendar::CalendarMonth;
use journal_core::filter::Filter;
use journal_core::serde::{deserialize_optional_date, deserialize_optional_string};
use journal_core::state::JournalState;

/// Filter and calendar position carried in the query string.
///
/// Blank fields mean "not set", matching what an untouched HTML form sends.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct JournalQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub tag: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

impl JournalQuery {
    pub fn filter(&self) -> Filter {
        Filter {
            date: self.date,
            text: self
                .text
                .as_deref()
                .map(|text| text.trim().to_lowercase())
                .unwrap_or_default(),
            tag: self.tag.clone(),
        }
    }

    /// The requested month; else the filtered day's month; else today's.
    pub fn month(&self, today: NaiveDate) -> CalendarMonth {
        self.year
            .zip(self.month)
            .and_then(|(year, month)| CalendarMonth::new(year, month))
            .unwrap_or_else(|| CalendarMonth::containing(self.date.unwrap_or(today)))
    }

    pub fn journal_state(&self, today: NaiveDate) -> JournalState {
        JournalState::new(self.month(today)).with_filter(self.filter())
    }
}
