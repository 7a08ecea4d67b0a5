//! Picker state and its reducer.
//!
//! The reducer is a plain total function over [`CalendarAction`]: every action
//! overwrites exactly the field it names. It knows nothing about how the
//! fields relate to each other; the navigation controller and the selection
//! protocol keep the invariants by issuing actions in sequence.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use super::navigation::YearMonth;

/// State owned by one picker instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarState {
    /// Selected start, or the only selected date outside range mode
    pub start_date: Option<NaiveDateTime>,
    /// Selected end (range mode); `None` until a second date is chosen
    pub end_date: Option<NaiveDateTime>,
    pub modal_open: bool,
    /// Primary pane
    pub year: i32,
    /// Primary pane, zero-based
    pub month: u32,
    /// Secondary pane, never before the primary one
    pub second_year: i32,
    /// Secondary pane, zero-based
    pub second_month: u32,
    /// Every date from start to end inclusive; empty unless both are set
    pub range_days: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarAction {
    SetStartDate(Option<NaiveDateTime>),
    SetEndDate(Option<NaiveDateTime>),
    ToggleModal,
    SetYear(i32),
    SetSecondYear(i32),
    SetMonth(u32),
    SetSecondMonth(u32),
    SetRangeDays(Vec<NaiveDate>),
}

/// Applies one action. Never fails and never touches a field the action does
/// not name.
pub fn reduce(mut state: CalendarState, action: CalendarAction) -> CalendarState {
    match action {
        CalendarAction::SetStartDate(date) => state.start_date = date,
        CalendarAction::SetEndDate(date) => state.end_date = date,
        CalendarAction::ToggleModal => state.modal_open = !state.modal_open,
        CalendarAction::SetYear(year) => state.year = year,
        CalendarAction::SetSecondYear(year) => state.second_year = year,
        CalendarAction::SetMonth(month) => state.month = month,
        CalendarAction::SetSecondMonth(month) => state.second_month = month,
        CalendarAction::SetRangeDays(days) => state.range_days = days,
    }
    state
}

impl CalendarState {
    /// State for a freshly mounted picker.
    ///
    /// The primary pane shows the start date's month, or `today`'s. In range
    /// mode the secondary pane shows the end date's month when that is later,
    /// otherwise the month after the primary.
    ///
    /// An end on a day before the start is read like a click before the
    /// start: the earlier date becomes the start and the end is cleared.
    pub fn initial(
        start_date: Option<NaiveDateTime>,
        end_date: Option<NaiveDateTime>,
        is_range: bool,
        modal_open: bool,
        today: NaiveDate,
    ) -> Self {
        let end_date = if is_range { end_date } else { None };
        let (start_date, end_date) = match (start_date, end_date) {
            (Some(start), Some(end)) if end.date() < start.date() => {
                debug!("end {} is before start {}, restarting range from it", end, start);
                (Some(end), None)
            }
            bounds => bounds,
        };
        let primary = YearMonth::of(start_date.map_or(today, |d| d.date()));
        let secondary = end_date
            .map(|d| YearMonth::of(d.date()))
            .filter(|end| is_range && *end > primary)
            .unwrap_or_else(|| primary.succ());

        let mut state = CalendarState {
            start_date,
            end_date,
            modal_open,
            year: primary.year,
            month: primary.month,
            second_year: secondary.year,
            second_month: secondary.month,
            range_days: Vec::new(),
        };
        state.refresh_range_days();
        state
    }

    /// Runs `action` through the reducer in place
    pub fn dispatch(&mut self, action: CalendarAction) {
        let current = std::mem::take(self);
        *self = reduce(current, action);
    }

    /// Recomputes the derived `range_days` cache from the current bounds
    pub fn refresh_range_days(&mut self) {
        let days = compute_range_days(self.start_date, self.end_date);
        self.dispatch(CalendarAction::SetRangeDays(days));
    }

    pub fn primary(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    pub fn secondary(&self) -> YearMonth {
        YearMonth::new(self.second_year, self.second_month)
    }
}

/// Every calendar date from `start` to `end` inclusive.
///
/// Empty unless both are set and `start` is not after `end`.
pub fn compute_range_days(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Vec<NaiveDate> {
    match (start, end) {
        (Some(start), Some(end)) if start.date() <= end.date() => {
            let last = end.date();
            start.date().iter_days().take_while(|d| *d <= last).collect()
        }
        _ => Vec::new(),
    }
}
