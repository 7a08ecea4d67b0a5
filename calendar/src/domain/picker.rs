//! A live date picker instance.
//!
//! `DatePicker` owns one [`CalendarState`] and is the only thing that mutates
//! it. It wires the pure pieces together: the navigation controller and the
//! selection protocol produce state changes, the picker recomputes derived
//! data, notifies the host and holds the outside-click subscription while the
//! popover is open.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use shared::{CalendarDay, DateRangeBlur, DateRangeChange, Pane, PickerOptions};
use tracing::{debug, info};

use super::locale::{format_date_range, DateRangeFormat};
use super::month_grid::{month_grid, GridBounds};
use super::navigation::{NavigationController, YearMonth};
use super::outside_click::{NodeId, PointerEventStream, PointerSubscription};
use super::reducer::{CalendarAction, CalendarState};
use super::selection::{hover_preview, select_day, SelectionMode};
use crate::error::Result;

pub type ChangeCallback = Box<dyn FnMut(DateRangeChange)>;
pub type BlurCallback = Box<dyn FnMut(DateRangeBlur)>;
pub type DisablePredicate = Box<dyn Fn(NaiveDate) -> bool>;

/// Presentation-side per-day highlighting that the picker drives but does not
/// own.
pub trait RangeHighlighter {
    /// Drop every "in range" marker
    fn clear_in_range(&mut self);

    /// Mark `dates` as previewed; an empty slice removes the preview
    fn preview_in_range(&mut self, dates: &[NaiveDate]);
}

pub struct DatePicker {
    node: NodeId,
    options: PickerOptions,
    state: CalendarState,
    navigation: NavigationController,
    on_change: Option<ChangeCallback>,
    on_blur: Option<BlurCallback>,
    should_disable_date: Option<DisablePredicate>,
    highlighter: Option<Box<dyn RangeHighlighter>>,
    events: Option<PointerEventStream>,
    outside_click: Option<PointerSubscription>,
    dismissed: Rc<Cell<bool>>,
    hovered: Option<NaiveDate>,
}

impl DatePicker {
    /// Mounts a picker rooted at host node `node`
    pub fn new(node: NodeId, options: PickerOptions) -> Self {
        Self::new_on(node, options, Local::now().date_naive())
    }

    /// Same as [`DatePicker::new`] with an explicit "today" for the initially
    /// visible month
    pub fn new_on(node: NodeId, options: PickerOptions, today: NaiveDate) -> Self {
        let state = CalendarState::initial(
            options.start_date,
            options.end_date,
            options.is_range,
            options.always_open,
            today,
        );
        info!(
            "date picker {} mounted (range: {}, time: {}, always open: {})",
            node, options.is_range, options.with_time, options.always_open
        );

        Self {
            node,
            navigation: NavigationController::new(options.is_range),
            options,
            state,
            on_change: None,
            on_blur: None,
            should_disable_date: None,
            highlighter: None,
            events: None,
            outside_click: None,
            dismissed: Rc::new(Cell::new(false)),
            hovered: None,
        }
    }

    pub fn with_on_change(mut self, callback: impl FnMut(DateRangeChange) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn with_on_blur(mut self, callback: impl FnMut(DateRangeBlur) + 'static) -> Self {
        self.on_blur = Some(Box::new(callback));
        self
    }

    /// Host rule for dates that can never be picked
    pub fn with_should_disable_date(mut self, rule: impl Fn(NaiveDate) -> bool + 'static) -> Self {
        self.should_disable_date = Some(Box::new(rule));
        self
    }

    pub fn with_highlighter(mut self, highlighter: impl RangeHighlighter + 'static) -> Self {
        self.highlighter = Some(Box::new(highlighter));
        self
    }

    /// Stream the outside-click listener is registered on while the popover
    /// is open
    pub fn with_event_stream(mut self, events: PointerEventStream) -> Self {
        self.events = Some(events);
        self.sync_outside_click();
        self
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.state.modal_open
    }

    pub fn hovered(&self) -> Option<NaiveDate> {
        self.hovered
    }

    fn mode(&self) -> SelectionMode {
        SelectionMode {
            is_range: self.options.is_range,
            with_time: self.options.with_time,
        }
    }

    // Popover

    /// Opens or closes the popover. Inline pickers stay open.
    pub fn toggle_modal(&mut self) {
        if self.options.always_open {
            debug!("picker {} is always open, toggle ignored", self.node);
            return;
        }
        self.state.dispatch(CalendarAction::ToggleModal);
        debug!("picker {} modal open: {}", self.node, self.state.modal_open);
        self.state.refresh_range_days();
        self.sync_outside_click();
    }

    pub fn open(&mut self) {
        if !self.state.modal_open {
            self.toggle_modal();
        }
    }

    pub fn close(&mut self) {
        if self.state.modal_open {
            self.toggle_modal();
        }
    }

    /// Holds the outside-click listener exactly while the popover is open
    fn sync_outside_click(&mut self) {
        let wanted = self.state.modal_open && !self.options.always_open;

        match (&self.events, wanted, self.outside_click.is_some()) {
            (Some(events), true, false) => {
                let dismissed = self.dismissed.clone();
                let node = self.node;
                self.dismissed.set(false);
                self.outside_click = Some(events.subscribe(move |event| {
                    if !event.is_within(node) {
                        dismissed.set(true);
                    }
                }));
                debug!("picker {} listening for outside clicks", self.node);
            }
            (_, false, true) => {
                self.outside_click = None;
                self.dismissed.set(false);
                debug!("picker {} stopped listening for outside clicks", self.node);
            }
            _ => {}
        }
    }

    /// Applies an outside press seen since the last call: closes the popover
    /// and reports the current bounds through `onBlur`. Returns whether the
    /// picker was dismissed.
    pub fn handle_outside_clicks(&mut self) -> bool {
        if !self.dismissed.replace(false) || !self.state.modal_open {
            return false;
        }
        info!("picker {} dismissed by outside click", self.node);
        self.close();
        let blur = DateRangeBlur {
            start_date: self.state.start_date,
            end_date: self.state.end_date,
        };
        if let Some(on_blur) = self.on_blur.as_mut() {
            on_blur(blur);
        }
        true
    }

    // Selection

    /// Handles a click on a grid cell
    pub fn click_day(&mut self, day: &CalendarDay) {
        let day = CalendarDay {
            is_disabled: day.is_disabled || self.is_disabled(day.date),
            ..day.clone()
        };
        let mode = self.mode();
        let outcome = select_day(&mut self.state, &day, mode);

        if outcome.clear_highlights {
            self.hovered = None;
            if let Some(highlighter) = self.highlighter.as_mut() {
                highlighter.clear_in_range();
            }
        }
        if let Some(change) = outcome.change {
            info!("picker {} committed {:?}", self.node, change);
            if let Some(on_change) = self.on_change.as_mut() {
                on_change(change);
            }
        }
        if outcome.close_modal {
            self.close();
        }
    }

    /// Clicks the cell showing `date` in a visible pane. Dates that are not
    /// on screen are ignored.
    pub fn click_date(&mut self, date: NaiveDate) {
        let day = self
            .visible_panes()
            .into_iter()
            .flat_map(|pane| self.grid(pane))
            .find(|day| day.is_current_month && day.date == date);

        match day {
            Some(day) => self.click_day(&day),
            None => debug!("picker {}: {} is not visible, click ignored", self.node, date),
        }
    }

    /// Pointer entered the cell for `date`
    pub fn hover(&mut self, date: NaiveDate) {
        self.hovered = Some(date);
        let preview = hover_preview(&self.state, date);
        if let Some(highlighter) = self.highlighter.as_mut() {
            highlighter.preview_in_range(&preview);
        }
    }

    /// Pointer left the grid
    pub fn leave(&mut self) {
        self.hovered = None;
        if let Some(highlighter) = self.highlighter.as_mut() {
            highlighter.preview_in_range(&[]);
        }
    }

    /// Dates currently previewed under the pointer
    pub fn preview_days(&self) -> Vec<NaiveDate> {
        self.hovered
            .map(|date| hover_preview(&self.state, date))
            .unwrap_or_default()
    }

    /// New bounds pushed by the host. Replaces the selection and re-centres
    /// the panes without notifying `onChange`.
    pub fn set_dates(&mut self, start_date: Option<NaiveDateTime>, end_date: Option<NaiveDateTime>) {
        let reset = CalendarState::initial(
            start_date,
            end_date,
            self.options.is_range,
            self.state.modal_open,
            YearMonth::new(self.state.year, self.state.month)
                .first_day()
                .unwrap_or_else(|| Local::now().date_naive()),
        );
        debug!("picker {} bounds replaced by host", self.node);
        self.state.dispatch(CalendarAction::SetStartDate(reset.start_date));
        self.state.dispatch(CalendarAction::SetEndDate(reset.end_date));
        self.state.dispatch(CalendarAction::SetYear(reset.year));
        self.state.dispatch(CalendarAction::SetMonth(reset.month));
        self.state.dispatch(CalendarAction::SetSecondYear(reset.second_year));
        self.state.dispatch(CalendarAction::SetSecondMonth(reset.second_month));
        self.state.refresh_range_days();
    }

    // Navigation

    pub fn previous_month(&mut self) {
        self.navigation.previous_month(&mut self.state);
    }

    pub fn next_month(&mut self) {
        self.navigation.next_month(&mut self.state);
    }

    pub fn change_year(&mut self, year: i32) {
        self.navigation.change_year(&mut self.state, year);
    }

    pub fn change_month(&mut self, month: u32) -> Result<()> {
        self.navigation.change_month(&mut self.state, month)
    }

    pub fn change_second_year(&mut self, year: i32) {
        self.navigation.change_second_year(&mut self.state, year);
    }

    pub fn change_second_month(&mut self, month: u32) -> Result<()> {
        self.navigation.change_second_month(&mut self.state, month)
    }

    // Derived data

    /// Panes on screen: both in range mode, the primary one otherwise
    pub fn visible_panes(&self) -> Vec<Pane> {
        if self.options.is_range {
            vec![Pane::Primary, Pane::Secondary]
        } else {
            vec![Pane::Primary]
        }
    }

    pub fn pane_month(&self, pane: Pane) -> YearMonth {
        match pane {
            Pane::Primary => self.state.primary(),
            Pane::Secondary => self.state.secondary(),
        }
    }

    /// Whether `date` is out of bounds or rejected by a disable rule
    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        let rule = |d: NaiveDate| self.rejects(d);
        self.bounds(&rule).rejects(date)
    }

    fn rejects(&self, date: NaiveDate) -> bool {
        self.options.disables(date) || self.should_disable_date.as_ref().is_some_and(|rule| rule(date))
    }

    fn bounds<'a>(&self, rule: &'a dyn Fn(NaiveDate) -> bool) -> GridBounds<'a> {
        GridBounds {
            min_date: self.options.min_date,
            max_date: self.options.max_date,
            is_disabled: Some(rule),
        }
    }

    /// Fresh 42-cell grid for `pane`
    pub fn grid(&self, pane: Pane) -> Vec<CalendarDay> {
        let shown = self.pane_month(pane);
        let rule = |d: NaiveDate| self.rejects(d);
        month_grid(shown.year, shown.month, &self.bounds(&rule))
    }

    /// Text for the picker's input field
    pub fn display_text(&self) -> String {
        format_date_range(&DateRangeFormat {
            is_range: self.options.is_range,
            start_date: self.state.start_date,
            end_date: self.state.end_date,
            language_tag: self.options.locale.as_deref(),
            with_time: self.options.with_time,
        })
    }
}

impl Drop for DatePicker {
    fn drop(&mut self) {
        if self.outside_click.take().is_some() {
            debug!("picker {} torn down while open", self.node);
        }
    }
}

impl fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePicker")
            .field("node", &self.node)
            .field("options", &self.options)
            .field("state", &self.state)
            .field("listening", &self.outside_click.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::outside_click::PointerEvent;
    use std::cell::RefCell;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(9, 30, 0).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 2, 1)
    }

    fn range_options() -> PickerOptions {
        PickerOptions {
            is_range: true,
            locale: Some("en-US".to_string()),
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct Recorded {
        cleared: usize,
        previews: Vec<Vec<NaiveDate>>,
    }

    struct RecordingHighlighter(Rc<RefCell<Recorded>>);

    impl RangeHighlighter for RecordingHighlighter {
        fn clear_in_range(&mut self) {
            self.0.borrow_mut().cleared += 1;
        }

        fn preview_in_range(&mut self, dates: &[NaiveDate]) {
            self.0.borrow_mut().previews.push(dates.to_vec());
        }
    }

    #[test]
    fn test_new_picker_shows_today_and_is_closed() {
        let picker = DatePicker::new_on(1, PickerOptions::default(), date(2024, 12, 9));

        assert!(!picker.is_open());
        assert_eq!(picker.pane_month(Pane::Primary), YearMonth::new(2024, 11));
        assert_eq!(picker.visible_panes(), vec![Pane::Primary]);
        assert_eq!(picker.display_text(), "");
    }

    #[test]
    fn test_single_date_click_commits_and_closes() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let mut picker = DatePicker::new_on(1, PickerOptions::default(), today()).with_on_change({
            let changes = changes.clone();
            move |change| changes.borrow_mut().push(change)
        });
        picker.open();

        picker.click_date(date(2024, 2, 15));

        assert!(!picker.is_open());
        assert_eq!(picker.state().start_date, Some(at(2024, 2, 15)));
        assert_eq!(
            *changes.borrow(),
            vec![DateRangeChange {
                start_date: at(2024, 2, 15),
                end_date: None,
            }]
        );
    }

    #[test]
    fn test_range_selection_fires_change_for_start_and_end() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let mut picker = DatePicker::new_on(1, range_options(), today()).with_on_change({
            let changes = changes.clone();
            move |change| changes.borrow_mut().push(change)
        });
        picker.open();

        picker.click_date(date(2024, 2, 9));
        assert!(picker.is_open());
        picker.click_date(date(2024, 2, 11));

        assert!(!picker.is_open());
        assert_eq!(
            picker.state().range_days,
            vec![date(2024, 2, 9), date(2024, 2, 10), date(2024, 2, 11)]
        );
        let changes = changes.borrow();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].end_date, None);
        assert_eq!(changes[1].start_date, at(2024, 2, 9));
        assert_eq!(changes[1].end_date, Some(at(2024, 2, 11)));
        assert_eq!(picker.display_text(), "02/09/2024 ~ 02/11/2024");
    }

    #[test]
    fn test_range_can_span_both_panes() {
        let mut picker = DatePicker::new_on(1, range_options(), today());
        picker.open();

        picker.click_date(date(2024, 2, 27));
        picker.click_date(date(2024, 3, 2));

        assert_eq!(picker.state().end_date, Some(at(2024, 3, 2)));
        assert_eq!(picker.state().range_days.len(), 5);
    }

    #[test]
    fn test_disabled_dates_cannot_be_clicked() {
        let changes = Rc::new(RefCell::new(0));
        let options = PickerOptions {
            min_date: Some(date(2024, 2, 5)),
            disabled_dates: vec![date(2024, 2, 14)],
            ..Default::default()
        };
        let mut picker = DatePicker::new_on(1, options, today())
            .with_should_disable_date(|d| d == date(2024, 2, 20))
            .with_on_change({
                let changes = changes.clone();
                move |_| *changes.borrow_mut() += 1
            });

        picker.click_date(date(2024, 2, 4));
        picker.click_date(date(2024, 2, 14));
        picker.click_date(date(2024, 2, 20));
        picker.click_date(date(2024, 5, 1)); // not visible

        assert_eq!(*changes.borrow(), 0);
        assert_eq!(picker.state().start_date, None);
        assert!(picker.is_disabled(date(2024, 2, 20)));
        assert!(!picker.is_disabled(date(2024, 2, 21)));
    }

    #[test]
    fn test_stale_grid_cell_is_rechecked() {
        let options = PickerOptions {
            max_date: Some(date(2024, 2, 10)),
            ..Default::default()
        };
        let mut picker = DatePicker::new_on(1, options, today());
        let mut stale = picker
            .grid(Pane::Primary)
            .into_iter()
            .find(|d| d.date == date(2024, 2, 12))
            .unwrap();
        stale.is_disabled = false;

        picker.click_day(&stale);
        assert_eq!(picker.state().start_date, None);
    }

    #[test]
    fn test_with_time_keeps_modal_open() {
        let options = PickerOptions {
            with_time: true,
            ..Default::default()
        };
        let mut picker = DatePicker::new_on(1, options, today());
        picker.open();

        picker.click_date(date(2024, 2, 15));
        assert!(picker.is_open());
    }

    #[test]
    fn test_always_open_ignores_close() {
        let options = PickerOptions {
            always_open: true,
            ..Default::default()
        };
        let events = PointerEventStream::new();
        let mut picker = DatePicker::new_on(1, options, today()).with_event_stream(events.clone());

        assert!(picker.is_open());
        picker.toggle_modal();
        picker.click_date(date(2024, 2, 15));
        assert!(picker.is_open());
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_outside_click_listener_is_scoped_to_open_modal() {
        let events = PointerEventStream::new();
        let mut picker = DatePicker::new_on(10, PickerOptions::default(), today())
            .with_event_stream(events.clone());
        assert_eq!(events.listener_count(), 0);

        picker.open();
        assert_eq!(events.listener_count(), 1);

        picker.close();
        assert_eq!(events.listener_count(), 0);

        picker.open();
        assert_eq!(events.listener_count(), 1);
        drop(picker);
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_outside_click_closes_and_blurs() {
        let blurs = Rc::new(RefCell::new(Vec::new()));
        let events = PointerEventStream::new();
        let mut picker = DatePicker::new_on(10, range_options(), today())
            .with_event_stream(events.clone())
            .with_on_blur({
                let blurs = blurs.clone();
                move |blur| blurs.borrow_mut().push(blur)
            });
        picker.open();
        picker.click_date(date(2024, 2, 9));

        // press inside the picker: ignored
        events.dispatch(&PointerEvent::new(vec![42, 10, 1]));
        assert!(!picker.handle_outside_clicks());
        assert!(picker.is_open());

        events.dispatch(&PointerEvent::new(vec![99, 1]));
        assert!(picker.handle_outside_clicks());
        assert!(!picker.is_open());
        assert_eq!(events.listener_count(), 0);
        assert_eq!(
            *blurs.borrow(),
            vec![DateRangeBlur {
                start_date: Some(at(2024, 2, 9)),
                end_date: None,
            }]
        );

        // nothing pending any more
        assert!(!picker.handle_outside_clicks());
    }

    #[test]
    fn test_highlighter_previews_and_clears() {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let mut picker = DatePicker::new_on(1, range_options(), today())
            .with_highlighter(RecordingHighlighter(recorded.clone()));
        picker.open();

        picker.click_date(date(2024, 2, 9));
        assert_eq!(recorded.borrow().cleared, 1);

        picker.hover(date(2024, 2, 11));
        assert_eq!(
            recorded.borrow().previews.last().unwrap(),
            &vec![date(2024, 2, 9), date(2024, 2, 10), date(2024, 2, 11)]
        );
        assert_eq!(picker.preview_days().len(), 3);
        assert_eq!(picker.state().end_date, None);

        picker.leave();
        assert!(recorded.borrow().previews.last().unwrap().is_empty());
        assert!(picker.preview_days().is_empty());
    }

    #[test]
    fn test_navigation_keeps_secondary_after_primary() {
        let mut picker = DatePicker::new_on(1, range_options(), date(2024, 12, 5));
        assert_eq!(picker.pane_month(Pane::Secondary), YearMonth::new(2025, 0));

        picker.next_month();
        assert_eq!(picker.pane_month(Pane::Primary), YearMonth::new(2025, 0));
        assert_eq!(picker.pane_month(Pane::Secondary), YearMonth::new(2025, 1));

        assert!(picker.change_month(12).is_err());
        picker.change_second_year(2024);
        assert_eq!(picker.pane_month(Pane::Primary), YearMonth::new(2024, 0));
    }

    #[test]
    fn test_set_dates_recentres_without_notifying() {
        let changes = Rc::new(RefCell::new(0));
        let mut picker = DatePicker::new_on(1, range_options(), today()).with_on_change({
            let changes = changes.clone();
            move |_| *changes.borrow_mut() += 1
        });

        picker.set_dates(Some(at(2025, 6, 3)), Some(at(2025, 8, 1)));

        assert_eq!(*changes.borrow(), 0);
        assert_eq!(picker.pane_month(Pane::Primary), YearMonth::new(2025, 5));
        assert_eq!(picker.pane_month(Pane::Secondary), YearMonth::new(2025, 7));
        assert_eq!(picker.state().range_days.len(), 60);

        picker.set_dates(None, None);
        assert_eq!(picker.state().start_date, None);
        assert!(picker.state().range_days.is_empty());
        assert_eq!(picker.pane_month(Pane::Primary), YearMonth::new(2025, 5));
    }

    #[test]
    fn test_inverted_bounds_never_reach_state() {
        let mut picker = DatePicker::new_on(1, range_options(), today());

        picker.set_dates(Some(at(2024, 3, 10)), Some(at(2024, 3, 5)));

        let state = picker.state();
        assert_eq!(state.start_date, Some(at(2024, 3, 5)));
        assert_eq!(state.end_date, None);
        assert_eq!(picker.display_text(), "03/05/2024");

        let options = PickerOptions {
            start_date: Some(at(2024, 3, 10)),
            end_date: Some(at(2024, 3, 5)),
            ..range_options()
        };
        let picker = DatePicker::new_on(1, options, today());
        assert_eq!(picker.state().start_date, Some(at(2024, 3, 5)));
        assert_eq!(picker.state().end_date, None);
    }

    #[test]
    fn test_far_years_render_empty_grids_instead_of_panicking() {
        let mut picker = DatePicker::new_on(1, range_options(), today());

        picker.change_year(i32::MAX);
        assert!(picker.grid(Pane::Primary).is_empty());
        assert!(picker.grid(Pane::Secondary).is_empty());

        picker.next_month();
        picker.previous_month();
        picker.click_date(date(2024, 2, 9));
        assert_eq!(picker.state().start_date, None);

        picker.change_second_year(i32::MIN);
        assert!(picker.grid(Pane::Primary).is_empty());
    }
}
