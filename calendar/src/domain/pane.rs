//! View models for a rendered calendar pane.
//!
//! Presentation layers build what they draw from a live picker passed in
//! explicitly. There is no ambient picker to fall back on: asking for a view
//! without one is an integration error.

use chrono::{NaiveDate, NaiveDateTime};
use shared::{CalendarDay, Pane};

use super::locale::{month_long_names, weekday_short_names};
use super::picker::DatePicker;
use crate::error::{PickerError, Result};

/// Everything needed to draw one month pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneView {
    pub pane: Pane,
    pub year: i32,
    /// Zero-based
    pub month: u32,
    /// Localized "<month name> <year>"
    pub title: String,
    /// Column headers, Monday first to match the grid
    pub weekday_names: [String; 7],
    pub days: Vec<CalendarDay>,
}

/// Visual flags for one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellState {
    /// The cell is the start or the end of the selection
    pub selected: bool,
    /// Inside a committed range
    pub in_range: bool,
    /// Inside the hover preview
    pub preview: bool,
    pub today: bool,
    pub disabled: bool,
}

fn require(ctx: Option<&DatePicker>) -> Result<&DatePicker> {
    ctx.ok_or(PickerError::MissingContext)
}

/// Builds the view for `pane` of the picker in `ctx`.
///
/// Fails with [`PickerError::MissingContext`] when no picker is supplied.
pub fn pane_view(ctx: Option<&DatePicker>, pane: Pane) -> Result<PaneView> {
    let picker = require(ctx)?;
    let shown = picker.pane_month(pane);
    let locale = picker.options().locale.as_deref();

    let month_names = month_long_names(locale);
    let title = format!(
        "{} {}",
        month_names
            .get(shown.month as usize)
            .map(String::as_str)
            .unwrap_or_default(),
        shown.year
    );

    // weekday_short_names starts on Sunday
    let mut weekday_names = weekday_short_names(locale);
    weekday_names.rotate_left(1);

    Ok(PaneView {
        pane,
        year: shown.year,
        month: shown.month,
        title,
        weekday_names,
        days: picker.grid(pane),
    })
}

/// Visual flags for `day` given the picker's selection and hover preview
pub fn cell_state(ctx: Option<&DatePicker>, day: &CalendarDay) -> Result<CellState> {
    let picker = require(ctx)?;
    let state = picker.state();
    let is_bound = |bound: Option<NaiveDateTime>| bound.is_some_and(|b| b.date() == day.date);

    if !day.is_current_month {
        return Ok(CellState {
            disabled: true,
            ..Default::default()
        });
    }

    Ok(CellState {
        selected: is_bound(state.start_date) || is_bound(state.end_date),
        in_range: state.range_days.contains(&day.date),
        preview: picker.preview_days().contains(&day.date),
        today: day.is_today,
        disabled: day.is_disabled,
    })
}

/// Dates of `days` that are part of the committed range
pub fn range_dates_in(days: &[CalendarDay], ctx: Option<&DatePicker>) -> Result<Vec<NaiveDate>> {
    let picker = require(ctx)?;
    Ok(days
        .iter()
        .filter(|d| d.is_current_month && picker.state().range_days.contains(&d.date))
        .map(|d| d.date)
        .collect())
}
