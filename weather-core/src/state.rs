//! What the display should show, as an explicit state machine.
//!
//! Transitions are pure: each consumes the old state and returns the new one.
//! [`Session`] adds request generations so a slow, superseded fetch can never
//! overwrite the result of a newer one.

use crate::{
    error::{ErrorKind, WeatherError},
    model::NormalizedResponse,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    /// A fetch is in flight. Whatever was on screen stays there meanwhile.
    Loading {
        previous: Option<Box<NormalizedResponse>>,
    },
    Loaded(NormalizedResponse),
    /// The last attempt failed. A failed fetch never discards earlier data.
    Failed {
        kind: ErrorKind,
        previous: Option<Box<NormalizedResponse>>,
    },
}

impl ViewState {
    pub fn loading(self) -> Self {
        ViewState::Loading {
            previous: self.into_displayed().map(Box::new),
        }
    }

    /// A successful response replaces the displayed one wholesale.
    pub fn loaded(self, response: NormalizedResponse) -> Self {
        ViewState::Loaded(response)
    }

    pub fn failed(self, kind: ErrorKind) -> Self {
        ViewState::Failed {
            kind,
            previous: self.into_displayed().map(Box::new),
        }
    }

    pub fn resolved(self, outcome: Result<NormalizedResponse, ErrorKind>) -> Self {
        match outcome {
            Ok(response) => self.loaded(response),
            Err(kind) => self.failed(kind),
        }
    }

    /// The response currently on screen, if any.
    pub fn displayed(&self) -> Option<&NormalizedResponse> {
        match self {
            ViewState::Idle => None,
            ViewState::Loaded(response) => Some(response),
            ViewState::Loading { previous } | ViewState::Failed { previous, .. } => {
                previous.as_deref()
            }
        }
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            ViewState::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    fn into_displayed(self) -> Option<NormalizedResponse> {
        match self {
            ViewState::Idle => None,
            ViewState::Loaded(response) => Some(response),
            ViewState::Loading { previous } | ViewState::Failed { previous, .. } => {
                previous.map(|boxed| *boxed)
            }
        }
    }
}

/// Monotonic id handed out per dispatched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Owns the view state and discards responses from superseded requests.
#[derive(Debug, Default)]
pub struct Session {
    state: ViewState,
    latest: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn begin(&mut self) -> Generation {
        self.latest += 1;
        self.transition(ViewState::loading);
        Generation(self.latest)
    }

    /// Apply an outcome. Returns `false` when the request was superseded and ignored.
    pub fn finish(
        &mut self,
        generation: Generation,
        outcome: Result<NormalizedResponse, WeatherError>,
    ) -> bool {
        if generation.0 != self.latest {
            tracing::debug!(
                stale = generation.0,
                latest = self.latest,
                "discarding superseded response"
            );
            return false;
        }

        let outcome = outcome.map_err(|e| e.kind());
        self.transition(|state| state.resolved(outcome));
        true
    }

    fn transition(&mut self, f: impl FnOnce(ViewState) -> ViewState) {
        let current = std::mem::take(&mut self.state);
        self.state = f(current);
    }
}
