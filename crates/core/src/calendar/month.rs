use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The month the calendar is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    year: i32,
    /// 1-based month.
    month: u32,
}

impl CalendarMonth {
    /// Returns `None` when the month is outside 1..=12, or when it or either
    /// neighbouring month falls outside the representable date range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let candidate = Self { year, month };
        candidate.first_day()?;
        candidate.wrapping_previous().first_day()?;
        candidate.wrapping_next().first_day()?;
        Some(candidate)
    }

    /// The month containing the given day.
    pub fn containing(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month before, or `self` at the start of the representable range.
    pub fn previous(self) -> Self {
        let previous = self.wrapping_previous();
        Self::new(previous.year, previous.month).unwrap_or(self)
    }

    /// The month after, or `self` at the end of the representable range.
    pub fn next(self) -> Self {
        let next = self.wrapping_next();
        Self::new(next.year, next.month).unwrap_or(self)
    }

    fn wrapping_previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year.saturating_sub(1),
                month: 12,
            }
        } else {
            Self {
                month: self.month - 1,
                ..self
            }
        }
    }

    fn wrapping_next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year.saturating_add(1),
                month: 1,
            }
        } else {
            Self {
                month: self.month + 1,
                ..self
            }
        }
    }

    /// Moves by one month in the given direction.
    pub fn step(self, step: MonthStep) -> Self {
        match step {
            MonthStep::Previous => self.previous(),
            MonthStep::Next => self.next(),
        }
    }

    /// `"March 2024"`.
    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }

    pub(crate) fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub(crate) fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|&day| NaiveDate::from_ymd_opt(self.year, self.month, day).is_some())
            .unwrap_or(0)
    }
}

/// Calendar navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthStep {
    Previous,
    Next,
}
