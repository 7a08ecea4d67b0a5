//! # Domain Module
//!
//! Contains all calendar logic of the date picker.
//!
//! Nothing here depends on a rendering technology. State lives in a
//! [`reducer::CalendarState`] owned by one [`picker::DatePicker`]; the other
//! modules are pure functions and small controllers around it.
//!
//! ## Module Organization
//!
//! - **locale**: language tags, display patterns, weekday/month names, range text
//! - **month_grid**: the 42-cell month grid with padding days and disabled flags
//! - **reducer**: calendar state and the actions that change it
//! - **navigation**: previous/next month and explicit month/year picks per pane
//! - **selection**: interpreting a day click in single and range mode
//! - **outside_click**: pointer-event stream with scoped subscriptions
//! - **picker**: a live picker instance wiring the above together
//! - **pane**: view models for presentation layers
//!
//! ## Calendar Rules
//!
//! - Months are zero-based (0 = January) everywhere in calendar state
//! - Weeks start on Monday
//! - Padding days from adjacent months are shown but never selectable
//! - In range mode the secondary pane never shows a month before the primary
//! - A range never inverts: a click before the start restarts the range
//! - `range_days` is derived from the bounds and never edited directly

pub mod locale;
pub mod month_grid;
pub mod navigation;
pub mod outside_click;
pub mod pane;
pub mod picker;
pub mod reducer;
pub mod selection;

pub use locale::{
    date_format_pattern, date_time_format_pattern, format_date_range, month_long_names,
    resolve_locale, weekday_short_names, DateRangeFormat,
};
pub use month_grid::{month_grid, month_grid_on, GridBounds};
pub use navigation::{NavigationController, YearMonth};
pub use outside_click::{NodeId, PointerEvent, PointerEventStream, PointerSubscription};
pub use reducer::{reduce, CalendarAction, CalendarState};
pub use selection::{select_day, SelectionMode, SelectionOutcome, SelectionPhase};
