use std::env;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use datepicker_calendar::config::load_options;
use datepicker_calendar::domain::{PointerEvent, PointerEventStream, YearMonth};
use datepicker_calendar::{cell_state, pane_view, DatePicker, PaneView};
use shared::PickerOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const PICKER_NODE: u64 = 1;
const OUTSIDE_NODE: u64 = 2;
const MAX_NAVIGATION_STEPS: usize = 1200;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut options_path = None;
    let mut dates = Vec::new();
    for arg in env::args().skip(1) {
        if arg.ends_with(".yaml") || arg.ends_with(".yml") {
            options_path = Some(arg);
        } else {
            let date = NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
                .with_context(|| format!("expected a YYYY-MM-DD date, got {:?}", arg))?;
            dates.push(date);
        }
    }

    let options = match options_path {
        Some(path) => load_options(&path).with_context(|| format!("Failed to load {}", path))?,
        None => PickerOptions::default(),
    };

    let events = PointerEventStream::new();
    let mut picker = DatePicker::new(PICKER_NODE, options)
        .with_event_stream(events.clone())
        .with_on_change(|change| info!("onChange: {:?}", change))
        .with_on_blur(|blur| info!("onBlur: {:?}", blur));
    picker.open();

    for date in dates {
        show_month(&mut picker, date)?;
        if picker.is_disabled(date) {
            warn!("{} is disabled, skipping", date);
            continue;
        }
        picker.click_date(date);
        if !picker.is_open() {
            picker.open();
        }
    }

    for pane in picker.visible_panes() {
        let view = pane_view(Some(&picker), pane)?;
        println!("{}", render(&view, &picker)?);
    }
    println!("Selection: {:?}", picker.display_text());

    // a press elsewhere dismisses the popover
    events.dispatch(&PointerEvent::new(vec![OUTSIDE_NODE]));
    if picker.handle_outside_clicks() {
        info!("picker closed by outside click");
    }

    Ok(())
}

/// Navigates until `date` is in a visible pane
fn show_month(picker: &mut DatePicker, date: NaiveDate) -> anyhow::Result<()> {
    let target = YearMonth::of(date);
    for _ in 0..MAX_NAVIGATION_STEPS {
        let visible = picker
            .visible_panes()
            .into_iter()
            .any(|pane| picker.pane_month(pane) == target);
        if visible {
            return Ok(());
        }
        if target < picker.state().primary() {
            picker.previous_month();
        } else {
            picker.next_month();
        }
    }
    bail!("{} is too far from the visible month", date)
}

fn render(view: &PaneView, picker: &DatePicker) -> anyhow::Result<String> {
    let mut out = format!("{:^28}\n", view.title);
    for name in &view.weekday_names {
        out.push_str(&format!("{:>4}", name.chars().take(3).collect::<String>()));
    }
    out.push('\n');

    for week in view.days.chunks(7) {
        for day in week {
            let cell = cell_state(Some(picker), day)?;
            let text = if !day.is_current_month {
                "   .".to_string()
            } else if cell.selected {
                format!(" [{:>2}", day.day)
            } else if cell.in_range {
                format!(" *{:>2}", day.day)
            } else if cell.disabled {
                format!("{:>3}x", day.day)
            } else {
                format!("{:>4}", day.day)
            };
            out.push_str(&text);
        }
        out.push('\n');
    }
    Ok(out)
}
