//! Month/year navigation across one or two panes.
//!
//! Translates navigation gestures into reducer actions. In range mode the
//! secondary pane must never show a month before the primary one:
//!
//! - primary changes push the secondary pane forward
//! - secondary changes pull the primary pane back, moving its year only when
//!   the month wraps past January
//!
//! The two directions are not mirror images of each other; the
//! tests pin the exact behaviour.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::reducer::{CalendarAction, CalendarState};
use crate::error::{PickerError, Result};

/// A visible month. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// Zero-based, 0 = January
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0())
    }

    /// First calendar day of this month
    pub fn first_day(self) -> Option<NaiveDate> {
        self.month
            .checked_add(1)
            .and_then(|month| NaiveDate::from_ymd_opt(self.year, month, 1))
    }

    /// Next month, rolling into January of the next year. Saturates at the
    /// last representable year.
    pub fn succ(self) -> Self {
        if self.month >= 11 {
            Self::new(self.year.saturating_add(1), 0)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Previous month, rolling into December of the previous year. Saturates
    /// at the first representable year.
    pub fn pred(self) -> Self {
        if self.month == 0 {
            Self::new(self.year.saturating_sub(1), 11)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }
}

fn check_month(month: u32) -> Result<()> {
    if month > 11 {
        return Err(PickerError::InvalidMonth(month));
    }
    Ok(())
}

/// Applies navigation gestures to a [`CalendarState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationController {
    is_range: bool,
}

impl NavigationController {
    pub fn new(is_range: bool) -> Self {
        Self { is_range }
    }

    pub fn is_range(&self) -> bool {
        self.is_range
    }

    /// Shows the previous month in the primary pane
    pub fn previous_month(&self, state: &mut CalendarState) {
        let target = state.primary().pred();
        debug!("navigating back to {}/{}", target.month + 1, target.year);
        self.move_primary(state, target);
    }

    /// Shows the next month in the primary pane
    pub fn next_month(&self, state: &mut CalendarState) {
        let target = state.primary().succ();
        debug!("navigating forward to {}/{}", target.month + 1, target.year);
        self.move_primary(state, target);
    }

    fn move_primary(&self, state: &mut CalendarState, target: YearMonth) {
        if !self.is_range {
            state.dispatch(CalendarAction::SetMonth(target.month));
            if target.year != state.year {
                state.dispatch(CalendarAction::SetYear(target.year));
            }
            return;
        }
        // Range mode goes through the clamped setters so the secondary pane
        // is pushed along.
        self.change_year(state, target.year);
        self.apply_primary_month(state, target.month);
    }

    /// Picks the primary pane's year. A year past the secondary pane's drags
    /// the secondary year along; months are left alone.
    pub fn change_year(&self, state: &mut CalendarState, year: i32) {
        state.dispatch(CalendarAction::SetYear(year));
        if self.is_range && year > state.second_year {
            debug!("primary year {} passed secondary, bumping it", year);
            state.dispatch(CalendarAction::SetSecondYear(year));
        }
    }

    /// Picks the primary pane's month (zero-based).
    ///
    /// When the new primary month is not strictly before the secondary pane,
    /// the secondary pane moves to the month after it.
    pub fn change_month(&self, state: &mut CalendarState, month: u32) -> Result<()> {
        check_month(month)?;
        self.apply_primary_month(state, month);
        Ok(())
    }

    fn apply_primary_month(&self, state: &mut CalendarState, month: u32) {
        let primary = YearMonth::new(state.year, month);
        if !self.is_range || primary < state.secondary() {
            state.dispatch(CalendarAction::SetMonth(month));
            return;
        }

        let pushed = primary.succ();
        debug!(
            "primary {}/{} reached secondary, pushing it to {}/{}",
            month + 1,
            primary.year,
            pushed.month + 1,
            pushed.year
        );
        state.dispatch(CalendarAction::SetMonth(month));
        state.dispatch(CalendarAction::SetSecondMonth(pushed.month));
        state.dispatch(CalendarAction::SetSecondYear(pushed.year));
    }

    /// Picks the secondary pane's year. A year before the primary pane's
    /// pulls the primary year down to match.
    pub fn change_second_year(&self, state: &mut CalendarState, year: i32) {
        state.dispatch(CalendarAction::SetSecondYear(year));
        if year < state.year {
            debug!("secondary year {} before primary, pulling it down", year);
            state.dispatch(CalendarAction::SetYear(year));
        }
    }

    /// Picks the secondary pane's month (zero-based).
    ///
    /// Landing at or before the primary pane moves the primary pane to the
    /// month before it. Its year only changes when that means wrapping from
    /// January back to December.
    pub fn change_second_month(&self, state: &mut CalendarState, month: u32) -> Result<()> {
        check_month(month)?;
        let secondary = YearMonth::new(state.second_year, month);

        if secondary <= state.primary() {
            debug!(
                "secondary {}/{} reached primary, pulling it back",
                month + 1,
                secondary.year
            );
            if month == 0 {
                state.dispatch(CalendarAction::SetMonth(11));
                state.dispatch(CalendarAction::SetYear(secondary.year.saturating_sub(1)));
            } else {
                state.dispatch(CalendarAction::SetMonth(month - 1));
            }
        }
        state.dispatch(CalendarAction::SetSecondMonth(month));
        Ok(())
    }
}
