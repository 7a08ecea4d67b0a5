use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// One of the two month panes a picker can show. Single-date pickers only use
/// the primary pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pane {
    Primary,
    Secondary,
}

/// Type of calendar cell for explicit rendering logic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarDayType {
    /// Lead-in day borrowed from the previous month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
    /// Lead-out day borrowed from the next month
    PaddingAfter,
}

/// Represents a single cell in a 6x7 month grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarDay {
    /// Day of month (1-31) of `date`
    pub day: u32,
    pub date: NaiveDate,
    pub day_type: CalendarDayType,
    pub is_current_month: bool,
    /// Padding days are always disabled
    pub is_disabled: bool,
    pub is_today: bool,
}

impl CalendarDay {
    /// Whether a click on this cell may change the selection
    pub fn is_selectable(&self) -> bool {
        self.is_current_month && !self.is_disabled
    }
}

/// Payload of the host's `onChange` callback.
///
/// Carries owned date values, never references into picker state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeChange {
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
}

/// Payload of the host's `onBlur` callback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeBlur {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

/// Props supplied by the host when a picker is created.
///
/// Every field has a default so options files only need to name what they
/// change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerOptions {
    /// Select a start and an end date instead of a single date
    pub is_range: bool,
    /// Keep the popover open after a commit so the time can be adjusted
    pub with_time: bool,
    /// Render inline; the modal never closes
    pub always_open: bool,
    /// BCP-47 style language tag ("en", "es-ES"); `None` uses the runtime default
    pub locale: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    /// Individual dates that can never be picked
    pub disabled_dates: Vec<NaiveDate>,
    /// Weekdays that can never be picked
    pub disabled_weekdays: Vec<Weekday>,
}

impl PickerOptions {
    /// Whether the declarative disable lists reject `date`
    pub fn disables(&self, date: NaiveDate) -> bool {
        self.disabled_dates.contains(&date) || self.disabled_weekdays.contains(&date.weekday())
    }
}
