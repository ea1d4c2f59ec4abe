use std::ops::Range;

use crate::model::{NormalizedResponse, Sample};

pub const WINDOW_SECONDS: i64 = 86_400;

/// A half-open span of time and the samples that fall inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Window<'a> {
    /// `None` when there was no anchor to build the window around.
    pub bounds: Option<Range<i64>>,
    pub samples: &'a [Sample],
}

impl Window<'_> {
    pub fn empty() -> Self {
        Window {
            bounds: None,
            samples: &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The 24 hours before the anchor and the 24 hours from it onwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Windows<'a> {
    pub previous: Window<'a>,
    pub next: Window<'a>,
}

pub fn extract(response: &NormalizedResponse) -> Windows<'_> {
    match &response.anchor {
        Some(anchor) => around(&response.samples, anchor.epoch_seconds),
        None => Windows {
            previous: Window::empty(),
            next: Window::empty(),
        },
    }
}

/// Split `samples` (sorted ascending) around `anchor`.
///
/// Membership is decided in `i128`, so it stays exact near the ends of the
/// `i64` range. Only the reported `bounds` saturate there.
pub fn around(samples: &[Sample], anchor: i64) -> Windows<'_> {
    let lower = i128::from(anchor) - i128::from(WINDOW_SECONDS);
    let upper = i128::from(anchor) + i128::from(WINDOW_SECONDS);

    let first = samples.partition_point(|s| i128::from(s.epoch_seconds) < lower);
    let middle = samples.partition_point(|s| s.epoch_seconds < anchor);
    let last = samples.partition_point(|s| i128::from(s.epoch_seconds) < upper);

    Windows {
        previous: Window {
            bounds: Some(anchor.saturating_sub(WINDOW_SECONDS)..anchor),
            samples: &samples[first..middle],
        },
        next: Window {
            bounds: Some(anchor..anchor.saturating_add(WINDOW_SECONDS)),
            samples: &samples[middle..last],
        },
    }
}
