//! Day-click handling.
//!
//! Interprets a click on a grid cell against the picker's mode and its
//! current selection, updates the state through the reducer and reports what
//! the picker has to do next (notify the host, clear range highlighting,
//! close the popover). Clicks on cells that cannot be selected are ignored.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use shared::{CalendarDay, DateRangeChange};
use tracing::debug;

use super::reducer::{CalendarAction, CalendarState};

/// Time of day given to a selection when there is no previous one to copy
pub fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default()
}

/// How far a selection has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    NoSelection,
    StartOnly,
    StartAndEnd,
}

impl SelectionPhase {
    pub fn of(state: &CalendarState) -> Self {
        match (state.start_date, state.end_date) {
            (None, _) => SelectionPhase::NoSelection,
            (Some(_), None) => SelectionPhase::StartOnly,
            (Some(_), Some(_)) => SelectionPhase::StartAndEnd,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionMode {
    pub is_range: bool,
    pub with_time: bool,
}

/// What a click asks of the picker beyond the state change itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Committed bounds to hand to the host's `onChange`
    pub change: Option<DateRangeChange>,
    /// Stale "in range" markers must be cleared
    pub clear_highlights: bool,
    pub close_modal: bool,
}

impl SelectionOutcome {
    fn ignored() -> Self {
        Self::default()
    }
}

/// Applies a click on `day`.
///
/// Outside range mode the click replaces the selected date. In range mode the
/// first click (or a click after a complete range) starts a new range, the
/// second completes it, and a second click before the start restarts the
/// range from there instead of inverting it.
pub fn select_day(
    state: &mut CalendarState,
    day: &CalendarDay,
    mode: SelectionMode,
) -> SelectionOutcome {
    if !day.is_selectable() {
        debug!("ignoring click on disabled day {}", day.date);
        return SelectionOutcome::ignored();
    }

    let outcome = if mode.is_range {
        select_range_day(state, day.date, mode)
    } else {
        let start = keep_time(day.date, state.start_date);
        debug!("selected {}", start);
        state.dispatch(CalendarAction::SetStartDate(Some(start)));
        SelectionOutcome {
            change: Some(DateRangeChange {
                start_date: start,
                end_date: None,
            }),
            clear_highlights: false,
            close_modal: !mode.with_time,
        }
    };

    state.refresh_range_days();
    outcome
}

fn select_range_day(
    state: &mut CalendarState,
    date: NaiveDate,
    mode: SelectionMode,
) -> SelectionOutcome {
    match (SelectionPhase::of(state), state.start_date) {
        (SelectionPhase::StartOnly, Some(current)) if date < current.date() => {
            let start = keep_time(date, Some(current));
            debug!("{} is before start {}, restarting range", date, current.date());
            state.dispatch(CalendarAction::SetStartDate(Some(start)));
            SelectionOutcome {
                change: Some(DateRangeChange {
                    start_date: start,
                    end_date: None,
                }),
                clear_highlights: true,
                close_modal: false,
            }
        }
        (SelectionPhase::StartOnly, Some(current)) => {
            let end = keep_time(date, state.end_date);
            debug!("range completed: {} ~ {}", current, end);
            state.dispatch(CalendarAction::SetEndDate(Some(end)));
            SelectionOutcome {
                change: Some(DateRangeChange {
                    start_date: current,
                    end_date: Some(end),
                }),
                clear_highlights: false,
                close_modal: !mode.with_time,
            }
        }
        _ => {
            let start = keep_time(date, state.start_date);
            debug!("range started at {}", start);
            state.dispatch(CalendarAction::SetStartDate(Some(start)));
            state.dispatch(CalendarAction::SetEndDate(None));
            SelectionOutcome {
                change: Some(DateRangeChange {
                    start_date: start,
                    end_date: None,
                }),
                clear_highlights: true,
                close_modal: false,
            }
        }
    }
}

/// `date` at the time of day of `previous`, or at the default time
fn keep_time(date: NaiveDate, previous: Option<NaiveDateTime>) -> NaiveDateTime {
    date.and_time(previous.map_or_else(default_time, |p| p.time()))
}

/// Dates shown as "in range" while the pointer rests on `hovered` and only a
/// start is selected. Nothing is previewed before the start, since a click
/// there would restart the range.
pub fn hover_preview(state: &CalendarState, hovered: NaiveDate) -> Vec<NaiveDate> {
    match (SelectionPhase::of(state), state.start_date) {
        (SelectionPhase::StartOnly, Some(start)) if hovered >= start.date() => start
            .date()
            .iter_days()
            .take_while(|d| *d <= hovered)
            .collect(),
        _ => Vec::new(),
    }
}
