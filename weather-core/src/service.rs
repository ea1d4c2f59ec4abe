use crate::{
    config::{Config, ProviderSettings},
    error::WeatherError,
    format::UnitFormatter,
    location::LocationResolver,
    model::{LocationQuery, NormalizedResponse},
    normalize::normalize,
    provider::{VisualCrossingProvider, WeatherProvider},
    query::QueryBuilder,
    state::Session,
};

/// One fetch pipeline: build the query, execute it once, normalize the body.
#[derive(Debug)]
pub struct WeatherService<P> {
    queries: QueryBuilder,
    provider: P,
}

impl WeatherService<VisualCrossingProvider> {
    /// Fails with a configuration error before any request when the key is missing.
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let settings = config.provider_settings()?;
        Ok(Self::new(settings, VisualCrossingProvider::new()?))
    }
}

impl<P: WeatherProvider> WeatherService<P> {
    pub fn new(settings: ProviderSettings, provider: P) -> Self {
        Self {
            queries: QueryBuilder::new(settings),
            provider,
        }
    }

    pub fn formatter(&self) -> UnitFormatter {
        UnitFormatter::new(self.queries.settings().unit_system)
    }

    pub async fn fetch(&self, query: &LocationQuery) -> Result<NormalizedResponse, WeatherError> {
        let request = self.queries.build(query)?;
        tracing::debug!(endpoint = request.endpoint(), "dispatching weather request");

        let body = self.provider.fetch(&request).await.inspect_err(log_cause)?;
        let response = normalize(&body).inspect_err(log_cause)?;

        tracing::debug!(
            samples = response.samples.len(),
            has_anchor = response.anchor.is_some(),
            address = %response.display_address,
            "normalized weather response"
        );
        Ok(response)
    }

    /// Run one fetch through `session`. Returns `false` if a newer fetch won the race.
    pub async fn refresh(&self, session: &mut Session, query: &LocationQuery) -> bool {
        let generation = session.begin();
        let outcome = self.fetch(query).await;
        session.finish(generation, outcome)
    }

    /// Initial load from the device position. A location failure is recorded in
    /// the session like any other failed attempt.
    pub async fn load_from_device(
        &self,
        session: &mut Session,
        locator: &mut LocationResolver,
    ) -> Option<LocationQuery> {
        let generation = session.begin();
        match locator.resolve().await {
            Ok(query) => {
                let outcome = self.fetch(&query).await;
                session.finish(generation, outcome);
                Some(query)
            }
            Err(err) => {
                session.finish(generation, Err(err));
                None
            }
        }
    }
}

fn log_cause(err: &WeatherError) {
    tracing::warn!(kind = ?err.kind(), "weather fetch failed: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        location::FixedPosition,
        model::{Coordinates, RequestDescriptor, UnitSystem},
    };
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Canned {
        body: Result<Value, ErrorKind>,
        seen: Mutex<Vec<RequestDescriptor>>,
    }

    impl Canned {
        fn ok(body: Value) -> Self {
            Self {
                body: Ok(body),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                body: Err(ErrorKind::Transport),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> usize {
            self.seen.lock().map(|seen| seen.len()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl WeatherProvider for Canned {
        async fn fetch(&self, request: &RequestDescriptor) -> Result<Value, WeatherError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(request.clone());
            }
            self.body
                .clone()
                .map_err(|_| WeatherError::Transport("connection refused".into()))
        }
    }

    fn settings() -> ProviderSettings {
        ProviderSettings {
            credential: "KEY".into(),
            base_url: "https://example.test/".into(),
            unit_system: UnitSystem::Metric,
        }
    }

    fn body() -> Value {
        json!({
            "resolvedAddress": "Lisboa, Portugal",
            "timezone": "Europe/Lisbon",
            "currentConditions": { "datetimeEpoch": 7_200, "temp": 18.2 },
            "days": [ { "hours": [ { "datetimeEpoch": 3_600 }, { "datetimeEpoch": 7_200 } ] } ]
        })
    }

    #[tokio::test]
    async fn fetch_builds_request_and_normalizes() {
        let service = WeatherService::new(settings(), Canned::ok(body()));

        let resp = service
            .fetch(&LocationQuery::Text("Lisbon".into()))
            .await
            .expect("canned body is valid");

        assert_eq!(resp.display_address, "Lisboa, Portugal");
        assert_eq!(resp.samples.len(), 2);
        assert_eq!(service.provider.requests(), 1);
    }

    #[tokio::test]
    async fn invalid_input_issues_no_request() {
        let service = WeatherService::new(settings(), Canned::ok(body()));

        let err = service.fetch(&LocationQuery::Text("  ".into())).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(service.provider.requests(), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_reported() {
        let service = WeatherService::new(settings(), Canned::ok(json!({ "message": "hi" })));
        let err = service.fetch(&LocationQuery::Text("Lisbon".into())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_display() {
        let good = WeatherService::new(settings(), Canned::ok(body()));
        let bad = WeatherService::new(settings(), Canned::failing());
        let query = LocationQuery::Text("Lisbon".into());
        let mut session = Session::new();

        assert!(good.refresh(&mut session, &query).await);
        assert!(bad.refresh(&mut session, &query).await);

        assert_eq!(session.state().error(), Some(ErrorKind::Transport));
        let shown = session.state().displayed().expect("prior data stays on screen");
        assert_eq!(shown.display_address, "Lisboa, Portugal");
    }

    #[tokio::test]
    async fn device_load_fetches_resolved_coordinates() {
        let service = WeatherService::new(settings(), Canned::ok(body()));
        let home = Coordinates {
            latitude: 38.72,
            longitude: -9.14,
        };
        let mut locator = LocationResolver::new(Some(Box::new(FixedPosition(home))));
        let mut session = Session::new();

        let query = service.load_from_device(&mut session, &mut locator).await;

        assert_eq!(query, Some(LocationQuery::Coordinates(home)));
        assert!(session.state().displayed().is_some());
        let seen = service.provider.seen.lock().expect("lock not poisoned");
        assert!(seen[0].endpoint().contains("38.72%2C-9.14"));
    }

    #[tokio::test]
    async fn device_load_without_capability_fails_without_fetching() {
        let service = WeatherService::new(settings(), Canned::ok(body()));
        let mut locator = LocationResolver::new(None);
        let mut session = Session::new();

        assert!(service.load_from_device(&mut session, &mut locator).await.is_none());
        assert_eq!(session.state().error(), Some(ErrorKind::LocationUnavailable));
        assert_eq!(service.provider.requests(), 0);
    }

    #[test]
    fn from_config_requires_credential() {
        let err = WeatherService::from_config(&Config::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
