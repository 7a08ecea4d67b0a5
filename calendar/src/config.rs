//! Picker options read from YAML.
//!
//! ```yaml
//! is_range: true
//! locale: de-DE
//! start_date: 2024-02-09T09:30:00
//! min_date: 2024-01-01
//! disabled_weekdays: [Sat, Sun]
//! ```
//!
//! Every key is optional; missing keys take the defaults of
//! [`PickerOptions`].

use std::fs;
use std::path::Path;

use shared::PickerOptions;
use tracing::{info, warn};

use crate::error::Result;

/// Parses options from a YAML document
pub fn parse_options(yaml: &str) -> Result<PickerOptions> {
    // An empty document is null in YAML, which does not map onto a struct
    if yaml.trim().is_empty() {
        return Ok(PickerOptions::default());
    }

    let options: PickerOptions = serde_yaml::from_str(yaml)?;

    if let (Some(min), Some(max)) = (options.min_date, options.max_date) {
        if min > max {
            warn!("min_date {} is after max_date {}: every day will be disabled", min, max);
        }
    }
    if !options.is_range && options.end_date.is_some() {
        warn!("end_date is ignored outside range mode");
    }
    Ok(options)
}

/// Reads and parses the options file at `path`
pub fn load_options(path: impl AsRef<Path>) -> Result<PickerOptions> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path)?;
    let options = parse_options(&yaml)?;
    info!("Loaded picker options from {:?}", path);
    Ok(options)
}
