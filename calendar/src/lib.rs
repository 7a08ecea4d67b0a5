//! # Date Picker Calendar
//!
//! Headless core of a date / date-range picker.
//!
//! The crate holds everything a picker does except drawing it: month grid
//! generation, the calendar state reducer, month/year navigation across one or
//! two panes, the day-click selection protocol, locale-aware formatting and
//! the outside-click subscription that dismisses an open popover. A
//! presentation layer renders [`domain::pane::PaneView`]s and forwards user
//! gestures to a [`domain::picker::DatePicker`].
//!
//! ## Module Organization
//!
//! - **domain**: state, algorithms and the picker instance
//! - **config**: picker options loaded from YAML
//! - **error**: the crate's error type

pub mod config;
pub mod domain;
pub mod error;

pub use domain::pane::{cell_state, pane_view, CellState, PaneView};
pub use domain::picker::{DatePicker, RangeHighlighter};
pub use error::{PickerError, Result};
