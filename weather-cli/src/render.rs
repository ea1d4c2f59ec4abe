//! Plain-text and JSON output for a normalized response.

use std::fmt::Write;

use serde_json::json;
use weather_core::{
    NormalizedResponse, Sample, UnitFormatter, Window, format::PLACEHOLDER, icon, window,
};

pub fn text(response: &NormalizedResponse, fmt: UnitFormatter) -> String {
    let tz = response.timezone_name.as_str();
    let windows = window::extract(response);
    let mut out = String::new();

    let _ = writeln!(out, "{}", response.display_address);
    let as_of = fmt.as_of(response.anchor.as_ref().map(|a| a.epoch_seconds), tz);
    let _ = writeln!(out, "As of {as_of}");

    if let Some(now) = &response.anchor {
        let _ = writeln!(
            out,
            "{}  {}  {}  wind {}  precip {}",
            icon::resolve(now.icon_code.as_deref()),
            fmt.temperature(now.temperature),
            now.conditions_text.as_deref().unwrap_or(PLACEHOLDER),
            fmt.wind_speed(now.wind_speed),
            fmt.precip_probability(now.precip_probability),
        );
    }

    section(&mut out, "Previous 24 hours", &windows.previous, fmt, tz);
    section(&mut out, "Next 24 hours", &windows.next, fmt, tz);
    out
}

fn section(out: &mut String, title: &str, window: &Window<'_>, fmt: UnitFormatter, tz: &str) {
    let _ = writeln!(out, "\n{title}");
    if window.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return;
    }
    for sample in window.samples {
        let _ = writeln!(out, "  {}", row(sample, fmt, tz));
    }
}

fn row(sample: &Sample, fmt: UnitFormatter, tz: &str) -> String {
    format!(
        "{:<12} {}  {:>6}  {:>8}  {:>4}  {}",
        fmt.time_of_day(sample.epoch_seconds, tz),
        icon::resolve(sample.icon_code.as_deref()),
        fmt.temperature(sample.temperature),
        fmt.wind_speed(sample.wind_speed),
        fmt.precip_probability(sample.precip_probability),
        sample.conditions_text.as_deref().unwrap_or(""),
    )
}

pub fn json(response: &NormalizedResponse) -> serde_json::Result<String> {
    let windows = window::extract(response);
    serde_json::to_string_pretty(&json!({
        "address": response.display_address,
        "timezone": response.timezone_name,
        "current": response.anchor,
        "previous": windows.previous.samples,
        "next": windows.next.samples,
    }))
}
