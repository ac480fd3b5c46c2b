//! Dataset loading over HTTP against a local mock server.

mod common;

use common::{init_tracing, SAMPLE_CSV, SAMPLE_JSON};
use resource_finder::{DataFormat, DatasetLoader, FinderConfig, FinderError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn loads_csv_by_extension() {
    let server = serve(
        "/resources.csv",
        ResponseTemplate::new(200).set_body_string(SAMPLE_CSV),
    )
    .await;

    let loader = DatasetLoader::new(format!("{}/resources.csv", server.uri()));
    assert_eq!(loader.format(), DataFormat::Csv);

    let dataset = loader.fetch().await.unwrap();
    assert_eq!(dataset.skipped, 1);
    let names: Vec<&str> = dataset.resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Durham Hub", "Wake Tech Library"]);

    let durham = &dataset.resources[0];
    assert_eq!(durham.primary_type, vec!["Device Access", "Virtual Support"]);
    assert!(durham.coordinates.is_none());
    let wake = &dataset.resources[1];
    assert_eq!(wake.geography, vec!["Wake", "27601"]);
    assert_eq!(wake.website_url().as_deref(), Some("https://waketech.edu"));
}

#[tokio::test]
async fn loads_json_with_mixed_shapes() {
    let server = serve(
        "/resources.json",
        ResponseTemplate::new(200).set_body_string(SAMPLE_JSON),
    )
    .await;

    let loader = DatasetLoader::new(format!("{}/resources.json", server.uri()));
    let resources = loader.load().await.unwrap();

    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0].name, "Chapel Hill Device Bank");
    assert_eq!(resources[0].geography, vec!["Orange", "27514"]);
    assert_eq!(resources[1].name, "Orange Learning Center");
    assert!(resources[1].coordinates.is_some());
}

#[tokio::test]
async fn format_override_beats_extension() {
    let server = serve(
        "/export",
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/json")
            .set_body_string("name\nOnly Row\n"),
    )
    .await;

    let loader =
        DatasetLoader::new(format!("{}/export", server.uri())).with_format(DataFormat::Csv);
    let resources = loader.load().await.unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].name, "Only Row");
}

#[tokio::test]
async fn non_success_status_is_fetch_error() {
    let server = serve(
        "/resources.json",
        ResponseTemplate::new(404).set_body_string("NoSuchKey"),
    )
    .await;

    let loader = DatasetLoader::new(format!("{}/resources.json", server.uri()));
    match loader.load().await {
        Err(FinderError::Fetch { status, message }) => {
            assert_eq!(status, Some(404));
            assert_eq!(message, "NoSuchKey");
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_payload_is_parse_error() {
    let server = serve(
        "/resources.json",
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;

    let loader = DatasetLoader::new(format!("{}/resources.json", server.uri()));
    assert!(matches!(loader.load().await, Err(FinderError::Parse(_))));
}

#[tokio::test]
async fn unreachable_host_is_fetch_error_without_status() {
    init_tracing();
    let server = MockServer::start().await;
    let url = format!("{}/resources.json", server.uri());
    drop(server);

    let err = DatasetLoader::new(url).load().await.unwrap_err();
    assert!(matches!(err, FinderError::Fetch { .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn loader_from_config_uses_configured_url_and_format() {
    let server = serve(
        "/data",
        ResponseTemplate::new(200).set_body_string("Name,Geography\nB,Wake\nA,Durham\n"),
    )
    .await;

    let config = FinderConfig {
        data_url: format!("{}/data", server.uri()),
        data_format: Some(DataFormat::Csv),
        request_timeout_secs: 5,
        ..FinderConfig::default()
    };
    let resources = DatasetLoader::from_config(&config)
        .unwrap()
        .load()
        .await
        .unwrap();
    let names: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}
