use crate::{
    bootstrap::CreateRequest,
    cli::actions::Action,
    connection::ConnectionFlags,
    engine::{self, Engine, EngineFlags},
    error::Error,
    manifest::{DEFAULT_TTL_SECONDS_AFTER_FINISHED, EnvVar},
};
use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;

/// Extract the connection flags, which are global to `create`
fn extract_connection(matches: &ArgMatches) -> ConnectionFlags {
    ConnectionFlags {
        url: matches.get_one::<String>("url").cloned(),
        host: matches.get_one::<String>("host").cloned(),
        port: matches.get_one::<u16>("port").copied(),
        username: matches.get_one::<String>("connection-username").cloned(),
        password: matches.get_one::<String>("connection-password").cloned(),
    }
}

/// Extract the common engine flags plus the engine's own settings
fn extract_engine_flags(engine: &dyn Engine, matches: &ArgMatches) -> EngineFlags {
    let text = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();

    let settings = engine
        .settings()
        .iter()
        .filter_map(|setting| {
            matches
                .get_one::<String>(setting.name)
                .map(|value| (setting.name, value.clone()))
        })
        .collect();

    EngineFlags {
        database: text("database"),
        username: text("username"),
        password: text("password"),
        version: matches.get_one::<String>("database-version").cloned(),
        user_if_not_exists: matches.get_flag("user-if-not-exists"),
        database_if_not_exists: matches.get_flag("database-if-not-exists"),
        no_user: matches.get_flag("no-user"),
        settings,
    }
}

/// Parse the repeated `--env NAME=VALUE` flags, keeping their order
fn extract_envs(matches: &ArgMatches) -> Result<Vec<EnvVar>> {
    matches
        .get_many::<String>("env")
        .unwrap_or_default()
        .map(|env| -> Result<EnvVar> {
            let (name, value) = env
                .split_once('=')
                .with_context(|| format!("Invalid env, expected NAME=VALUE: {env}"))?;
            if name.is_empty() {
                bail!("Invalid env, empty name: {env}");
            }
            Ok(EnvVar::new(name, value))
        })
        .collect()
}

/// Build the create action for the engine sub-command under `create`
fn dispatch_create(matches: &ArgMatches) -> Result<Action> {
    let (name, matches) = matches.subcommand().ok_or(Error::MissingDatabaseType)?;
    let engine = engine::lookup(name)?;

    let request = CreateRequest {
        connection: extract_connection(matches),
        flags: extract_engine_flags(engine, matches),
        envs: extract_envs(matches)?,
        ttl_seconds_after_finished: matches
            .get_one::<u32>("ttl-seconds-after-finished")
            .copied()
            .unwrap_or(DEFAULT_TTL_SECONDS_AFTER_FINISHED),
    };

    Ok(Action::Create { engine, request })
}

/// Convert `ArgMatches` into typed Action enum with validation
///
/// # Errors
///
/// Returns an error if no database type is given or a flag is invalid
pub fn dispatch(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("create", matches)) => dispatch_create(matches),
        Some((name, _)) => Err(anyhow!("Unknown command: {name}")),
        None => bail!("Missing command"),
    }
}
