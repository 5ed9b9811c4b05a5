mod grid;
mod month;

pub use grid::{build_grid, CalendarCell, CalendarGrid};
pub use month::{CalendarMonth, MonthStep};
