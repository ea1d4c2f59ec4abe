/// Symbol for any condition code missing from [`ICONS`].
pub const DEFAULT_ICON: &str = "🌡️";

/// Provider condition codes and their display symbols.
pub const ICONS: &[(&str, &str)] = &[
    ("clear-day", "☀️"),
    ("clear-night", "🌙"),
    ("partly-cloudy-day", "⛅"),
    ("partly-cloudy-night", "☁️🌙"),
    ("cloudy", "☁️"),
    ("fog", "🌫️"),
    ("wind", "💨"),
    ("rain", "🌧️"),
    ("showers-day", "🌦️"),
    ("showers-night", "🌧️🌙"),
    ("snow", "❄️"),
    ("snow-showers-day", "🌨️"),
    ("snow-showers-night", "🌨️🌙"),
    ("sleet", "🌨️"),
    ("hail", "🧊"),
    ("thunder", "🌩️"),
    ("thunder-rain", "⛈️"),
    ("thunder-showers-day", "⛈️"),
    ("thunder-showers-night", "⛈️🌙"),
];

/// Exact, case-sensitive lookup. Absent codes resolve like unknown ones.
pub fn resolve(code: Option<&str>) -> &'static str {
    code.and_then(|code| ICONS.iter().find(|(key, _)| *key == code))
        .map(|(_, symbol)| *symbol)
        .unwrap_or(DEFAULT_ICON)
}
