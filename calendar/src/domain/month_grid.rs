//! Month grid generation.
//!
//! Builds the 6 x 7 cell grid a calendar pane renders: the days of the target
//! month, padded at the front with the tail of the previous month (weeks start
//! on Monday) and at the back with the head of the next month. Padding cells
//! are always disabled.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use shared::{CalendarDay, CalendarDayType};
use tracing::warn;

/// Six weeks of seven days
pub const GRID_CELLS: usize = 42;

/// First column of the grid
pub const WEEK_START: Weekday = Weekday::Mon;

/// Constraints applied to the days of the target month.
#[derive(Clone, Copy, Default)]
pub struct GridBounds<'a> {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    /// Extra rule from the host; `true` disables the date
    pub is_disabled: Option<&'a dyn Fn(NaiveDate) -> bool>,
}

impl GridBounds<'_> {
    /// Whether `date` falls outside `[min_date, max_date]` or is rejected by the
    /// host rule
    pub fn rejects(&self, date: NaiveDate) -> bool {
        self.min_date.is_some_and(|min| date < min)
            || self.max_date.is_some_and(|max| date > max)
            || self.is_disabled.is_some_and(|rule| rule(date))
    }
}

/// Grid for the zero-based `month0` of `year`, using the local clock for
/// `is_today`. Call it fresh per render: today moves.
pub fn month_grid(year: i32, month0: u32, bounds: &GridBounds<'_>) -> Vec<CalendarDay> {
    month_grid_on(Local::now().date_naive(), year, month0, bounds)
}

/// Same as [`month_grid`] with an explicit "today".
///
/// Returns an empty grid for a month outside `0..=11`, and for months whose
/// six weeks would run past the range of dates chrono can represent.
pub fn month_grid_on(
    today: NaiveDate,
    year: i32,
    month0: u32,
    bounds: &GridBounds<'_>,
) -> Vec<CalendarDay> {
    let Some(first) = month0
        .checked_add(1)
        .and_then(|month| NaiveDate::from_ymd_opt(year, month, 1))
    else {
        warn!("cannot build a grid for month {} of {}", month0, year);
        return Vec::new();
    };
    let lead_in = lead_in_count(first.weekday());

    let Some(grid_start) = first.checked_sub_days(Days::new(u64::from(lead_in))) else {
        warn!("grid for {}/{} starts before the earliest date", month0 + 1, year);
        return Vec::new();
    };
    let dates: Vec<NaiveDate> = grid_start.iter_days().take(GRID_CELLS).collect();
    if dates.len() < GRID_CELLS {
        warn!("grid for {}/{} runs past the latest date", month0 + 1, year);
        return Vec::new();
    }

    dates
        .into_iter()
        .map(|date| {
            if date < first {
                padding_day(date, CalendarDayType::PaddingBefore)
            } else if date.year() == year && date.month0() == month0 {
                CalendarDay {
                    day: date.day(),
                    date,
                    day_type: CalendarDayType::MonthDay,
                    is_current_month: true,
                    is_disabled: bounds.rejects(date),
                    is_today: date == today,
                }
            } else {
                padding_day(date, CalendarDayType::PaddingAfter)
            }
        })
        .collect()
}

fn padding_day(date: NaiveDate, day_type: CalendarDayType) -> CalendarDay {
    CalendarDay {
        day: date.day(),
        date,
        day_type,
        is_current_month: false,
        is_disabled: true,
        is_today: false,
    }
}

/// Number of days in the zero-based `month0` of `year`, 0 for an invalid
/// month
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    match month0 {
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        3 | 5 | 8 | 10 => 30,
        0..=11 => 31,
        _ => 0,
    }
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Weekday of the first day of the month, `None` for an invalid month
pub fn first_weekday(year: i32, month0: u32) -> Option<Weekday> {
    month0
        .checked_add(1)
        .and_then(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .map(|date| date.weekday())
}

/// Padding cells needed before a month starting on `first`: 0 for Monday up
/// to 6 for Sunday
pub fn lead_in_count(first: Weekday) -> u32 {
    (7 + first.num_days_from_monday() - WEEK_START.num_days_from_monday()) % 7
}
