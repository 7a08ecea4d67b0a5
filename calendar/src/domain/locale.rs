//! Locale-aware date formatting.
//!
//! Turns language tags into display patterns, weekday and month names, and
//! renders a start/end pair for the picker's input field. Every string comes
//! from the locale database behind `chrono::Locale`, so the placeholder order
//! and the names follow local convention instead of an English table.
//!
//! All functions are pure apart from reading the process environment when no
//! tag is supplied.

use chrono::{Days, Locale, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Used when neither the caller nor the environment names a locale
pub const FALLBACK_LOCALE: &str = "en-US";

const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_TIME", "LANG"];

/// Day, month and year digits are pairwise distinct, so each placeholder can
/// be substituted without ambiguity.
const REFERENCE_YEAR: i32 = 2033;
const REFERENCE_MONTH: u32 = 11;
const REFERENCE_DAY: u32 = 22;

/// A known Sunday; weekday names are generated from here.
const REFERENCE_SUNDAY: (i32, u32, u32) = (2024, 1, 7);

const TIME_PATTERN: &str = "hh:mm aa";

/// Expands or defaults a language tag.
///
/// - `None` (or blank) uses the runtime default locale
/// - a two-letter tag is expanded to `xx-XX` ("en" becomes "en-EN")
/// - anything else is passed through unchanged
pub fn resolve_locale(language_tag: Option<&str>) -> String {
    match language_tag.map(str::trim).filter(|tag| !tag.is_empty()) {
        None => default_locale(),
        Some(tag) if tag.len() == 2 && tag.chars().all(|c| c.is_ascii_alphabetic()) => {
            format!("{}-{}", tag, tag.to_ascii_uppercase())
        }
        Some(tag) => tag.to_string(),
    }
}

/// Locale of the running process, read from the usual POSIX variables.
pub fn default_locale() -> String {
    LOCALE_ENV_VARS
        .iter()
        .find_map(|key| std::env::var(key).ok().and_then(|v| parse_env_locale(&v)))
        .unwrap_or_else(|| FALLBACK_LOCALE.to_string())
}

/// Parses values like "en_US.UTF-8" or "de_DE@euro" into "en-US" / "de-DE".
/// The C and POSIX locales carry no language and yield `None`.
pub fn parse_env_locale(raw: &str) -> Option<String> {
    let s = raw.trim();
    let s = s.split_once('.').map_or(s, |(part, _)| part);
    let s = s.split_once('@').map_or(s, |(part, _)| part);
    let s = s.trim();
    if s.is_empty() || s == "C" || s == "POSIX" {
        return None;
    }
    Some(s.replace('_', "-"))
}

/// Maps a resolved tag onto chrono's locale database.
///
/// Tries the exact `xx_YY` locale, then the language's primary region, then
/// falls back to POSIX. Unknown tags never fail.
pub fn chrono_locale(tag: &str) -> Locale {
    let mut parts = tag.trim().split(['-', '_']);
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts.next().map(str::to_ascii_uppercase);

    let mut candidates = Vec::with_capacity(2);
    if let Some(region) = region {
        candidates.push(format!("{language}_{region}"));
    }
    if let Some(region) = primary_region(&language) {
        candidates.push(format!("{language}_{region}"));
    }

    for candidate in &candidates {
        if let Ok(locale) = Locale::try_from(candidate.as_str()) {
            return locale;
        }
    }

    debug!("no locale data for '{}', using POSIX", tag);
    Locale::default()
}

fn primary_region(language: &str) -> Option<&'static str> {
    let region = match language {
        "en" => "US",
        "es" => "ES",
        "fr" => "FR",
        "de" => "DE",
        "it" => "IT",
        "pt" => "PT",
        "nl" => "NL",
        "sv" => "SE",
        "da" => "DK",
        "nb" => "NO",
        "fi" => "FI",
        "pl" => "PL",
        "cs" => "CZ",
        "el" => "GR",
        "tr" => "TR",
        "ru" => "RU",
        "uk" => "UA",
        "he" => "IL",
        "ar" => "SA",
        "hi" => "IN",
        "ja" => "JP",
        "ko" => "KR",
        "zh" => "CN",
        _ => return None,
    };
    Some(region)
}

fn locale_for(language_tag: Option<&str>) -> Locale {
    chrono_locale(&resolve_locale(language_tag))
}

/// Display pattern for a date, e.g. "mm/dd/yyyy" for en-US or "dd.mm.yyyy"
/// for de-DE.
///
/// The locale's short date format is applied to a reference date and each
/// numeric part is swapped for its placeholder, so the order is the one the
/// locale actually prints.
pub fn date_format_pattern(language_tag: Option<&str>) -> String {
    let locale = locale_for(language_tag);
    let Some(reference) = NaiveDate::from_ymd_opt(REFERENCE_YEAR, REFERENCE_MONTH, REFERENCE_DAY)
    else {
        return "mm/dd/yyyy".to_string();
    };

    let mut pattern = reference.format_localized("%x", locale).to_string();
    let full_year = REFERENCE_YEAR.to_string();
    let short_year = format!("{:02}", REFERENCE_YEAR % 100);

    if pattern.contains(&full_year) {
        pattern = pattern.replacen(&full_year, "yyyy", 1);
    } else {
        pattern = pattern.replacen(&short_year, "yyyy", 1);
    }
    pattern
        .replacen(&format!("{REFERENCE_MONTH:02}"), "mm", 1)
        .replacen(&format!("{REFERENCE_DAY:02}"), "dd", 1)
}

/// Date pattern followed by a 12-hour clock: "mm/dd/yyyy hh:mm aa"
pub fn date_time_format_pattern(language_tag: Option<&str>) -> String {
    format!("{} {}", date_format_pattern(language_tag), TIME_PATTERN)
}

/// Short weekday labels starting Sunday, first letter capitalized.
pub fn weekday_short_names(language_tag: Option<&str>) -> [String; 7] {
    let locale = locale_for(language_tag);
    let (y, m, d) = REFERENCE_SUNDAY;
    let sunday = NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

    std::array::from_fn(|offset| {
        let day = sunday + Days::new(offset as u64);
        capitalize(&day.format_localized("%a", locale).to_string())
    })
}

/// Full month names, January first.
pub fn month_long_names(language_tag: Option<&str>) -> [String; 12] {
    let locale = locale_for(language_tag);

    std::array::from_fn(|index| {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, index as u32 + 1, 1)
            .map(|first| first.format_localized("%B", locale).to_string())
            .unwrap_or_default()
    })
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Arguments for [`format_date_range`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRangeFormat<'a> {
    pub is_range: bool,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub language_tag: Option<&'a str>,
    pub with_time: bool,
}

/// Renders the selection for the picker's input field: the start alone, or
/// "start ~ end" once a range is complete. Empty when nothing is selected.
pub fn format_date_range(args: &DateRangeFormat<'_>) -> String {
    let Some(start) = args.start_date else {
        return String::new();
    };
    let locale = locale_for(args.language_tag);
    let start_text = format_date(start, locale, args.with_time);

    match args.end_date {
        Some(end) if args.is_range => {
            format!("{} ~ {}", start_text, format_date(end, locale, args.with_time))
        }
        _ => start_text,
    }
}

fn format_date(value: NaiveDateTime, locale: Locale, with_time: bool) -> String {
    let fmt = if with_time { "%x %I:%M %p" } else { "%x" };
    value
        .and_utc()
        .format_localized(fmt, locale)
        .to_string()
        .trim_end()
        .to_string()
}
