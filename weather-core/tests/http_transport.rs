use serde_json::json;
use weather_core::{
    ErrorKind, LocationFailure, LocationQuery, PositionSource, ProviderSettings, QueryBuilder,
    Session, UnitSystem, VisualCrossingProvider, WeatherProvider, WeatherService,
    location::IpPositionSource, window,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn settings(server: &MockServer) -> ProviderSettings {
    ProviderSettings {
        credential: "TEST_KEY".to_string(),
        base_url: format!("{}/timeline/", server.uri()),
        unit_system: UnitSystem::Metric,
    }
}

fn provider() -> VisualCrossingProvider {
    VisualCrossingProvider::new().expect("client builds")
}

#[tokio::test]
async fn sends_fixed_parameters_and_decodes_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timeline/London/yesterday/tomorrow"))
        .and(query_param("key", "TEST_KEY"))
        .and(query_param("unitGroup", "metric"))
        .and(query_param("include", "days,hours,current"))
        .and(query_param("contentType", "json"))
        .and(query_param("options", "nonulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "days": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let request = QueryBuilder::new(settings(&server)).for_text("London").expect("valid input");
    let body = provider().fetch(&request).await.expect("mock responds 200");

    assert_eq!(body, json!({ "days": [] }));
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("No account found with API key"))
        .mount(&server)
        .await;

    let request = QueryBuilder::new(settings(&server)).for_text("Paris").expect("valid input");
    let err = provider().fetch(&request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let request = QueryBuilder::new(settings(&server)).for_text("Paris").expect("valid input");
    let err = provider().fetch(&request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn end_to_end_windows_around_current_conditions() {
    let server = MockServer::start().await;
    let anchor = 1_000_000_000_i64;
    Mock::given(method("GET"))
        .and(path("/timeline/Reykjavik/yesterday/tomorrow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resolvedAddress": "Reykjavík, Ísland",
            "timezone": "Atlantic/Reykjavik",
            "currentConditions": { "datetimeEpoch": anchor, "temp": 21.6, "icon": "clear-day" },
            "days": [
                { "hours": [
                    { "datetimeEpoch": anchor + 86_399, "temp": 10.0 },
                    { "datetimeEpoch": anchor - 86_400 },
                ] },
                { "hours": [
                    { "datetimeEpoch": anchor + 86_400 },
                    { "datetimeEpoch": anchor },
                    { "datetimeEpoch": anchor - 1 },
                    { "temp": 3.0 },
                ] },
            ]
        })))
        .mount(&server)
        .await;

    let service = WeatherService::new(settings(&server), provider());
    let response = service
        .fetch(&LocationQuery::Text("Reykjavik".into()))
        .await
        .expect("mock body is valid");

    let windows = window::extract(&response);
    let previous: Vec<i64> = windows.previous.samples.iter().map(|s| s.epoch_seconds).collect();
    let next: Vec<i64> = windows.next.samples.iter().map(|s| s.epoch_seconds).collect();

    assert_eq!(previous, vec![anchor - 86_400, anchor - 1]);
    assert_eq!(next, vec![anchor, anchor + 86_399]);

    let anchor_sample = response.anchor.as_ref().expect("anchor present");
    assert_eq!(service.formatter().temperature(anchor_sample.temperature), "22°C");
}

#[tokio::test]
async fn session_keeps_previous_display_when_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/timeline/Good/yesterday/tomorrow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": "good",
            "days": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/timeline/Bad/yesterday/tomorrow"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = WeatherService::new(settings(&server), provider());
    let mut session = Session::new();

    service.refresh(&mut session, &LocationQuery::Text("Good".into())).await;
    service.refresh(&mut session, &LocationQuery::Text("Bad".into())).await;

    assert_eq!(session.state().error(), Some(ErrorKind::Transport));
    let shown = session.state().displayed().expect("previous data retained");
    assert_eq!(shown.display_address, "good");
}

#[tokio::test]
async fn ip_lookup_reports_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "lat": 52.52,
            "lon": 13.405
        })))
        .mount(&server)
        .await;

    let source = IpPositionSource::with_url(format!("{}/json/", server.uri()));
    let coords = source.current_position().await.expect("mock reports success");

    assert_eq!(coords.latitude, 52.52);
    assert_eq!(coords.longitude, 13.405);
}

#[tokio::test]
async fn ip_lookup_failure_status_is_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "fail",
            "message": "reserved range"
        })))
        .mount(&server)
        .await;

    let source = IpPositionSource::with_url(server.uri());
    let err = source.current_position().await.unwrap_err();

    assert_eq!(err, LocationFailure::Denied);
}

#[tokio::test]
async fn send_failure_does_not_leak_the_credential() {
    let settings = ProviderSettings {
        credential: "SUPERSECRETKEY".to_string(),
        base_url: "http://127.0.0.1:9/timeline/".to_string(),
        unit_system: UnitSystem::Metric,
    };
    let request = QueryBuilder::new(settings).for_text("Oslo").expect("valid input");

    let err = provider().fetch(&request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    let msg = err.to_string();
    assert!(!msg.contains("SUPERSECRETKEY"), "credential leaked: {msg}");
    assert!(!msg.contains("key="), "query string leaked: {msg}");
}
