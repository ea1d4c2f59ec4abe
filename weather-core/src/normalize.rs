//! Flattening of the provider's `days[].hours[]` tree into one sorted sample list.

use serde_json::{Map, Value};

use crate::{
    error::WeatherError,
    model::{NormalizedResponse, Sample},
};

const DEFAULT_TIMEZONE: &str = "UTC";

/// Validate and flatten a decoded response body.
///
/// Only a missing `days` collection is fatal. Hour entries without a numeric
/// `datetimeEpoch` are dropped, so a response with no usable hours still
/// normalizes to an empty sample list.
pub fn normalize(body: &Value) -> Result<NormalizedResponse, WeatherError> {
    let root = body
        .as_object()
        .ok_or_else(|| WeatherError::MalformedResponse("response body is not an object".into()))?;

    let days = root
        .get("days")
        .and_then(Value::as_array)
        .ok_or_else(|| WeatherError::MalformedResponse("response has no `days` array".into()))?;

    let mut total = 0usize;
    let mut samples: Vec<Sample> = days
        .iter()
        .filter_map(|day| day.get("hours").and_then(Value::as_array))
        .flatten()
        .inspect(|_| total += 1)
        .filter_map(sample_from)
        .collect();

    // `sort_by_key` is stable: ties keep day-then-hour input order.
    samples.sort_by_key(|s| s.epoch_seconds);

    if samples.len() < total {
        tracing::debug!(
            dropped = total - samples.len(),
            "dropped hour entries without a timestamp"
        );
    }

    let anchor = root.get("currentConditions").and_then(sample_from);

    Ok(NormalizedResponse {
        timezone_name: string_field(root, "timezone")
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        display_address: string_field(root, "resolvedAddress")
            .or_else(|| string_field(root, "address"))
            .unwrap_or_default(),
        anchor,
        samples,
    })
}

fn sample_from(entry: &Value) -> Option<Sample> {
    let fields = entry.as_object()?;
    let epoch_seconds = epoch_field(fields.get("datetimeEpoch")?)?;

    Some(Sample {
        epoch_seconds,
        local_time: string_field(fields, "datetime"),
        temperature: number_field(fields, "temp"),
        wind_speed: number_field(fields, "windspeed"),
        precip_probability: number_field(fields, "precipprob"),
        conditions_text: string_field(fields, "conditions"),
        icon_code: string_field(fields, "icon"),
    })
}

fn epoch_field(value: &Value) -> Option<i64> {
    if let Some(epoch) = value.as_i64() {
        return Some(epoch);
    }

    let float = value.as_f64()?;
    (float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64)
        .then_some(float as i64)
}

fn number_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    fields.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}
