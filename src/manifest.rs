//! Kubernetes Job manifest wrapping the bootstrap script
//!
//! The Job is modeled as plain serializable structs and emitted with
//! `serde_yaml`, which picks a literal block for the multi-line script and
//! falls back to an escaped double-quoted scalar when a literal block could
//! not carry it unchanged.

use crate::{
    connection::ConnectionDescriptor,
    engine::{Engine, EngineOptions},
    error::Result,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

/// Seconds a finished job is kept before the cluster deletes it
pub const DEFAULT_TTL_SECONDS_AFTER_FINISHED: u32 = 100;

/// Image tag used when no version is requested
pub const DEFAULT_VERSION: &str = "latest";

/// Placeholder recorded as the job initiator
// TODO: populate from the invoking user's cluster identity
pub const DEFAULT_INITIATOR: &str = "user";

// A failed bootstrap is never retried by the job itself
const BACKOFF_LIMIT: u32 = 0;
const RESTART_POLICY: &str = "Never";
const CONTAINER_NAME: &str = "creator";
const SHELL: [&str; 2] = ["/bin/sh", "-c"];

/// Environment variable injected into the job container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Run metadata of the emitted job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobMetadata {
    pub job_name: String,
    /// Captured once per render
    pub timestamp: DateTime<Utc>,
    pub initiator: String,
    pub container_image: String,
    /// Emitted in insertion order
    pub envs: Vec<EnvVar>,
    pub ttl_seconds_after_finished: u32,
}

impl JobMetadata {
    #[must_use]
    pub fn new(
        engine: &dyn Engine,
        database: &str,
        version: Option<&str>,
        envs: Vec<EnvVar>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let version = version
            .filter(|version| !version.is_empty())
            .unwrap_or(DEFAULT_VERSION);

        Self {
            job_name: format!("concierge-{}-create-{database}", engine.name()),
            timestamp,
            initiator: DEFAULT_INITIATOR.to_string(),
            container_image: format!("{}:{version}", engine.image()),
            envs,
            ttl_seconds_after_finished: DEFAULT_TTL_SECONDS_AFTER_FINISHED,
        }
    }

    #[must_use]
    pub const fn with_ttl_seconds_after_finished(mut self, ttl: u32) -> Self {
        self.ttl_seconds_after_finished = ttl;
        self
    }
}

/// Everything one invocation renders from
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub connection: ConnectionDescriptor,
    pub options: EngineOptions,
    pub metadata: JobMetadata,
    /// Rendered bootstrap script
    pub script: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Job<'a> {
    api_version: &'static str,
    kind: &'static str,
    metadata: ObjectMeta<'a>,
    spec: JobSpec<'a>,
}

#[derive(Serialize)]
struct ObjectMeta<'a> {
    name: &'a str,
    labels: Labels,
    annotations: Annotations<'a>,
}

#[derive(Serialize)]
struct Labels {
    #[serde(rename = "app.kubernetes.io/managed-by")]
    managed_by: &'static str,
    #[serde(rename = "concierge/engine")]
    engine: &'static str,
}

#[derive(Serialize)]
struct Annotations<'a> {
    #[serde(rename = "concierge/timestamp")]
    timestamp: String,
    #[serde(rename = "concierge/initiator")]
    initiator: &'a str,
    #[serde(rename = "concierge/database")]
    database: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobSpec<'a> {
    backoff_limit: u32,
    ttl_seconds_after_finished: u32,
    template: PodTemplate<'a>,
}

#[derive(Serialize)]
struct PodTemplate<'a> {
    spec: PodSpec<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PodSpec<'a> {
    restart_policy: &'static str,
    containers: Vec<Container<'a>>,
}

#[derive(Serialize)]
struct Container<'a> {
    name: &'static str,
    image: &'a str,
    command: Vec<&'a str>,
    env: &'a [EnvVar],
}

impl<'a> From<&'a RenderContext> for Job<'a> {
    fn from(context: &'a RenderContext) -> Self {
        let metadata = &context.metadata;
        let command = SHELL
            .into_iter()
            .chain(std::iter::once(context.script.as_str()))
            .collect();

        Self {
            api_version: "batch/v1",
            kind: "Job",
            metadata: ObjectMeta {
                name: &metadata.job_name,
                labels: Labels {
                    managed_by: env!("CARGO_PKG_NAME"),
                    engine: context.options.engine(),
                },
                annotations: Annotations {
                    timestamp: metadata
                        .timestamp
                        .to_rfc3339_opts(SecondsFormat::Secs, true),
                    initiator: &metadata.initiator,
                    database: &context.options.common().database,
                },
            },
            spec: JobSpec {
                backoff_limit: BACKOFF_LIMIT,
                ttl_seconds_after_finished: metadata.ttl_seconds_after_finished,
                template: PodTemplate {
                    spec: PodSpec {
                        restart_policy: RESTART_POLICY,
                        containers: vec![Container {
                            name: CONTAINER_NAME,
                            image: &metadata.container_image,
                            command,
                            env: &metadata.envs,
                        }],
                    },
                },
            },
        }
    }
}

/// Render the Job manifest embedding the script of `context`.
///
/// # Errors
///
/// Returns [`crate::Error::Yaml`] if the manifest cannot be serialized
pub fn render(context: &RenderContext) -> Result<String> {
    debug!(
        connection = context.connection.kind(),
        job = %context.metadata.job_name,
        "embedding bootstrap script"
    );

    Ok(serde_yaml::to_string(&Job::from(context))?)
}
