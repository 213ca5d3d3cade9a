//! Tests for the three-call deploy sequence against a mock Platform API.

use httpmock::prelude::*;
use serde_json::json;
use tempfile::NamedTempFile;

use skylift_core::deploy::{self, DeployEvent, DeployRequest, HerokuClient};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().expect("runtime")
}

fn artifact_file(contents: &[u8]) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp artifact");
    std::fs::write(file.path(), contents).expect("write artifact");
    file
}

fn request_for(app: &str, artifact: &NamedTempFile, version: Option<&str>) -> DeployRequest {
    DeployRequest {
        app: app.into(),
        artifact_path: artifact.path().to_path_buf(),
        version: version.map(String::from),
    }
}

#[test]
fn deploy_issues_three_calls_in_order() {
    let server = MockServer::start();

    let sources = server.mock(|when, then| {
        when.method(POST)
            .path("/apps/my-app/sources")
            .header("authorization", "Bearer t0ken")
            .header("accept", "application/vnd.heroku+json; version=3");
        then.status(201).json_body(json!({
            "source_blob": {
                "get_url": server.url("/blob/get"),
                "put_url": server.url("/blob/put"),
            }
        }));
    });
    let upload = server.mock(|when, then| {
        when.method(PUT).path("/blob/put").body("artifact bytes");
        then.status(200);
    });
    let build = server.mock(|when, then| {
        when.method(POST)
            .path("/apps/my-app/builds")
            .header("authorization", "Bearer t0ken")
            .header("accept", "application/vnd.heroku+json; version=3")
            .json_body(json!({
                "source_blob": {
                    "url": server.url("/blob/get"),
                    "version": "main@1a2b3c4 by octocat",
                }
            }));
        then.status(201);
    });

    let artifact = artifact_file(b"artifact bytes");
    let client = HerokuClient::with_base_url("t0ken", server.base_url()).unwrap();
    let request = request_for("my-app", &artifact, Some("main@1a2b3c4 by octocat"));

    let mut events = Vec::new();
    runtime()
        .block_on(deploy::run(&client, &request, |event| events.push(event)))
        .unwrap();

    sources.assert();
    upload.assert();
    build.assert();
    assert_eq!(
        events,
        vec![
            DeployEvent::SourceSlotCreated,
            DeployEvent::ArtifactUploaded,
            DeployEvent::BuildTriggered,
        ]
    );
}

#[test]
fn build_request_omits_version_when_absent() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/apps/my-app/sources");
        then.status(201).json_body(json!({
            "source_blob": {
                "get_url": server.url("/blob/get"),
                "put_url": server.url("/blob/put"),
            }
        }));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/blob/put");
        then.status(200);
    });
    let build = server.mock(|when, then| {
        when.method(POST)
            .path("/apps/my-app/builds")
            .json_body(json!({
                "source_blob": { "url": server.url("/blob/get") }
            }));
        then.status(201);
    });

    let artifact = artifact_file(b"bytes");
    let client = HerokuClient::with_base_url("t0ken", server.base_url()).unwrap();
    let request = request_for("my-app", &artifact, None);

    runtime()
        .block_on(deploy::run(&client, &request, |_| {}))
        .unwrap();

    build.assert();
}

#[test]
fn create_source_failure_stops_the_sequence() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/apps/my-app/sources");
        then.status(503);
    });
    let upload = server.mock(|when, then| {
        when.method(PUT).path("/blob/put");
        then.status(200);
    });
    let build = server.mock(|when, then| {
        when.method(POST).path("/apps/my-app/builds");
        then.status(201);
    });

    let artifact = artifact_file(b"bytes");
    let client = HerokuClient::with_base_url("t0ken", server.base_url()).unwrap();
    let request = request_for("my-app", &artifact, None);

    let mut events = Vec::new();
    let err = runtime()
        .block_on(deploy::run(&client, &request, |event| events.push(event)))
        .unwrap_err();

    assert!(err.to_string().contains("Failed to create source slot"));
    assert!(events.is_empty());
    assert_eq!(upload.hits(), 0);
    assert_eq!(build.hits(), 0);
}

#[test]
fn upload_failure_skips_the_build() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/apps/my-app/sources");
        then.status(201).json_body(json!({
            "source_blob": {
                "get_url": server.url("/blob/get"),
                "put_url": server.url("/blob/put"),
            }
        }));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/blob/put");
        then.status(403);
    });
    let build = server.mock(|when, then| {
        when.method(POST).path("/apps/my-app/builds");
        then.status(201);
    });

    let artifact = artifact_file(b"bytes");
    let client = HerokuClient::with_base_url("t0ken", server.base_url()).unwrap();
    let request = request_for("my-app", &artifact, None);

    let err = runtime()
        .block_on(deploy::run(&client, &request, |_| {}))
        .unwrap_err();

    assert!(err.to_string().contains("Failed to upload artifact"));
    assert_eq!(build.hits(), 0);
}

#[test]
fn malformed_source_slot_body_is_a_fatal_error() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/apps/my-app/sources");
        then.status(200).json_body(json!({ "unexpected": true }));
    });

    let artifact = artifact_file(b"bytes");
    let client = HerokuClient::with_base_url("t0ken", server.base_url()).unwrap();
    let request = request_for("my-app", &artifact, None);

    let err = runtime()
        .block_on(deploy::run(&client, &request, |_| {}))
        .unwrap_err();

    assert!(
        err.to_string()
            .contains("Failed to parse source slot response")
    );
}

#[test]
fn missing_artifact_fails_after_slot_creation() {
    let server = MockServer::start();

    let sources = server.mock(|when, then| {
        when.method(POST).path("/apps/my-app/sources");
        then.status(201).json_body(json!({
            "source_blob": {
                "get_url": server.url("/blob/get"),
                "put_url": server.url("/blob/put"),
            }
        }));
    });
    let upload = server.mock(|when, then| {
        when.method(PUT).path("/blob/put");
        then.status(200);
    });

    let client = HerokuClient::with_base_url("t0ken", server.base_url()).unwrap();
    let request = DeployRequest {
        app: "my-app".into(),
        artifact_path: "/nonexistent/build.tgz".into(),
        version: None,
    };

    let err = runtime()
        .block_on(deploy::run(&client, &request, |_| {}))
        .unwrap_err();

    assert!(err.to_string().contains("Failed to read artifact"));
    sources.assert();
    assert_eq!(upload.hits(), 0);
}
