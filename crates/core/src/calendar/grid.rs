use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::Entry;

use super::month::CalendarMonth;

/// One square of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub day_of_month: u32,
    /// Set only for days of the displayed month; padding days are not clickable.
    pub date: Option<NaiveDate>,
    pub in_month: bool,
    pub today: bool,
    pub has_entries: bool,
}

impl CalendarCell {
    fn padding(day_of_month: u32) -> Self {
        Self {
            day_of_month,
            date: None,
            in_month: false,
            today: false,
            has_entries: false,
        }
    }

    /// CSS classes for the cell.
    pub fn css_class(&self) -> String {
        let mut classes = vec!["calendar-day"];
        if !self.in_month {
            classes.push("other-month");
        }
        if self.today {
            classes.push("today");
        }
        if self.has_entries {
            classes.push("has-entries");
        }
        classes.join(" ")
    }
}

/// A month laid out in full weeks starting on Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarGrid {
    pub month: CalendarMonth,
    pub title: String,
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    /// Cells grouped by week, for table-style rendering.
    pub fn weeks(&self) -> Vec<&[CalendarCell]> {
        self.cells.chunks(7).collect()
    }
}

/// Lays out the month and marks days that have at least one entry.
pub fn build_grid(month: CalendarMonth, entries: &[Entry], today: NaiveDate) -> CalendarGrid {
    let marked: HashSet<&str> = entries.iter().filter_map(Entry::day).collect();

    let Some(first) = month.first_day() else {
        return CalendarGrid {
            month,
            title: month.title(),
            cells: Vec::new(),
        };
    };

    let leading = first.weekday().num_days_from_sunday();
    let days_in_month = month.days_in_month();

    let mut cells = Vec::with_capacity(42);

    for offset in (1..=leading).rev() {
        let day = first
            .checked_sub_days(Days::new(u64::from(offset)))
            .map_or(0, |date| date.day());
        cells.push(CalendarCell::padding(day));
    }

    for day in 1..=days_in_month {
        let Some(date) = first.checked_add_days(Days::new(u64::from(day - 1))) else {
            continue;
        };
        let key = date.format("%Y-%m-%d").to_string();
        cells.push(CalendarCell {
            day_of_month: day,
            date: Some(date),
            in_month: true,
            today: date == today,
            has_entries: marked.contains(key.as_str()),
        });
    }

    let remaining = 7 - (leading + days_in_month) % 7;
    if remaining < 7 {
        for day in 1..=remaining {
            cells.push(CalendarCell::padding(day));
        }
    }

    CalendarGrid {
        month,
        title: month.title(),
        cells,
    }
}
