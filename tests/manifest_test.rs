#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

mod common;

use common::*;
use concierge::{
    bootstrap::{self, CreateRequest},
    connection,
    engine::{self, Engine, EngineFlags},
    manifest::{self, EnvVar, JobMetadata, RenderContext},
    render::Renderer,
};

/// The script `engine` renders for `request`, outside of any manifest
fn direct_script(engine: &dyn Engine, request: &CreateRequest) -> String {
    engine
        .render_script(
            &Renderer::new(),
            &connection::resolve(&request.connection),
            &engine.options(&request.flags),
        )
        .unwrap()
}

fn assert_embedded_unchanged(request: &CreateRequest) {
    for engine in engine::registry() {
        let manifest = bootstrap::render(*engine, request, fixed_timestamp()).unwrap();
        assert_eq!(
            embedded_script(&manifest),
            direct_script(*engine, request),
            "{} script changed by embedding:\n{manifest}",
            engine.name()
        );
    }
}

#[test]
fn test_embedded_script_is_byte_identical() {
    assert_embedded_unchanged(&postgres_request());
}

#[test]
fn test_embedded_script_with_both_guards() {
    let mut request = postgres_request();
    request.flags.user_if_not_exists = true;
    request.flags.database_if_not_exists = true;
    assert_embedded_unchanged(&request);

    let manifest = bootstrap::render(
        engine::lookup("postgres").unwrap(),
        &request,
        fixed_timestamp(),
    )
    .unwrap();
    let script = embedded_script(&manifest);
    assert_eq!(script.matches("\\gexec").count(), 2);
}

#[test]
fn test_embedded_script_with_quotes() {
    let mut request = postgres_request();
    request.flags.username = "O'Neil \"the\" admin".to_string();
    request.flags.password = "it's `quoted` \"twice\" \\ and $HOME".to_string();
    request.connection.url = Some("postgresql://root:p'w@db/postgres?sslmode=require".to_string());
    assert_embedded_unchanged(&request);
}

#[test]
fn test_embedded_script_with_unicode_line_breaks() {
    let mut request = postgres_request();
    request.flags.password = "a\u{85}b\u{2028}c\u{2029}d".to_string();
    assert_embedded_unchanged(&request);

    let manifest = bootstrap::render(
        engine::lookup("mysql").unwrap(),
        &request,
        fixed_timestamp(),
    )
    .unwrap();
    assert!(embedded_script(&manifest).contains("IDENTIFIED BY 'a\u{85}b\u{2028}c\u{2029}d'"));
}

#[test]
fn test_embedded_script_with_keyword_names() {
    let mut request = postgres_request();
    request.flags.database = "verbose".to_string();
    request.flags.username = "join".to_string();
    assert_embedded_unchanged(&request);
}

#[test]
fn test_embedded_script_with_blank_lines() {
    let script = "psql <<'EOF'\n\nSELECT 'a';\n\n\nSELECT \"b\";\nEOF\n\n";
    let request = postgres_request();
    let context = RenderContext {
        connection: connection::resolve(&request.connection),
        options: engine::lookup("postgres")
            .unwrap()
            .options(&request.flags),
        metadata: JobMetadata::new(
            engine::lookup("postgres").unwrap(),
            "mydb",
            None,
            Vec::new(),
            fixed_timestamp(),
        ),
        script: script.to_string(),
    };

    let manifest = manifest::render(&context).unwrap();
    assert_eq!(embedded_script(&manifest), script);
}

#[test]
fn test_env_values_survive() {
    let mut request = postgres_request();
    request.envs = vec![
        EnvVar::new("PLAIN", "value"),
        EnvVar::new("NUMERIC", "10"),
        EnvVar::new("BOOLEAN", "true"),
        EnvVar::new("TRICKY", "a\u{85}b\u{2028}c: #not a comment"),
        EnvVar::new("EMPTY", ""),
    ];

    let manifest = bootstrap::render(
        engine::lookup("postgres").unwrap(),
        &request,
        fixed_timestamp(),
    )
    .unwrap();
    let manifest = parse_manifest(&manifest);
    let env = container(&manifest)["env"].as_sequence().unwrap();
    assert_eq!(env.len(), request.envs.len());
    for (entry, expected) in env.iter().zip(&request.envs) {
        assert_eq!(entry["name"].as_str(), Some(expected.name.as_str()));
        assert_eq!(entry["value"].as_str(), Some(expected.value.as_str()));
    }
}

#[test]
fn test_manifest_fields() {
    let request = CreateRequest {
        flags: EngineFlags {
            database: "shop".to_string(),
            version: Some("8.4".to_string()),
            no_user: true,
            ..EngineFlags::default()
        },
        ttl_seconds_after_finished: 30,
        ..CreateRequest::default()
    };

    let manifest = bootstrap::render(
        engine::lookup("mysql").unwrap(),
        &request,
        fixed_timestamp(),
    )
    .unwrap();
    let manifest = parse_manifest(&manifest);

    assert_eq!(manifest["metadata"]["name"], "concierge-mysql-create-shop");
    assert_eq!(manifest["metadata"]["labels"]["concierge/engine"], "mysql");
    assert_eq!(
        manifest["metadata"]["annotations"]["concierge/timestamp"],
        "2024-03-01T12:00:00Z"
    );
    assert_eq!(manifest["spec"]["backoffLimit"], 0);
    assert_eq!(manifest["spec"]["ttlSecondsAfterFinished"], 30);
    assert_eq!(manifest["spec"]["template"]["spec"]["restartPolicy"], "Never");
    assert_eq!(container(&manifest)["image"], "mysql:8.4");
}
