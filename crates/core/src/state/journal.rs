use chrono::NaiveDate;

use crate::calendar::{CalendarMonth, MonthStep};
use crate::entry::Snapshot;
use crate::filter::{Filter, FilterChange};

use super::cache::EntryCache;

/// Everything that changes the page's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEvent {
    /// The store pushed a new full snapshot.
    SnapshotReceived(Snapshot),
    /// The user edited the filter (search, tag click, day click, clear).
    FilterChanged(FilterChange),
    /// The user moved the calendar by a month.
    MonthNavigated(MonthStep),
    /// The store accepted a new entry; the filter resets.
    EntryCreated,
}

/// Per-page state: cache, filter and the calendar month on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalState {
    pub cache: EntryCache,
    pub filter: Filter,
    pub month: CalendarMonth,
}

impl JournalState {
    pub fn new(month: CalendarMonth) -> Self {
        Self {
            cache: EntryCache::default(),
            filter: Filter::default(),
            month,
        }
    }

    /// Starts on the month containing `today`.
    pub fn starting_on(today: NaiveDate) -> Self {
        Self::new(CalendarMonth::containing(today))
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Pure transition: (state, event) -> state.
    pub fn apply(self, event: JournalEvent) -> Self {
        match event {
            JournalEvent::SnapshotReceived(snapshot) => {
                if snapshot.version < self.cache.version() {
                    tracing::debug!(
                        received = snapshot.version,
                        current = self.cache.version(),
                        "Ignoring stale snapshot"
                    );
                    return self;
                }
                Self {
                    cache: EntryCache::from_snapshot(snapshot),
                    ..self
                }
            }
            JournalEvent::FilterChanged(change) => Self {
                filter: self.filter.apply(change),
                ..self
            },
            JournalEvent::MonthNavigated(step) => Self {
                month: self.month.step(step),
                ..self
            },
            JournalEvent::EntryCreated => Self {
                filter: Filter::default(),
                ..self
            },
        }
    }
}
