//! Supported database engines
//!
//! An engine bundles the settings it understands, the option set built from
//! them and the bootstrap script it renders. The registry below is the only
//! place an engine has to be listed: the command line and the dispatcher are
//! generated from it.

pub mod mysql;
pub mod postgres;

use crate::{
    connection::ConnectionDescriptor,
    error::{Error, Result},
    render::Renderer,
};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

pub use mysql::{Mysql, MysqlOptions};
pub use postgres::{Postgres, PostgresOptions};

static ENGINES: [&dyn Engine; 2] = [&Postgres, &Mysql];

/// Engine-specific setting exposed as a `--<name>` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    pub name: &'static str,
    pub help: &'static str,
    pub default: &'static str,
}

/// Raw engine flags as collected from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineFlags {
    pub database: String,
    pub username: String,
    pub password: String,
    /// Image tag of the engine, `latest` when unset
    pub version: Option<String>,
    pub user_if_not_exists: bool,
    pub database_if_not_exists: bool,
    pub no_user: bool,
    /// Values given for the engine's own settings, keyed by setting name
    pub settings: BTreeMap<&'static str, String>,
}

impl EngineFlags {
    /// Value of `setting`, falling back to its default
    #[must_use]
    pub fn setting(&self, setting: &Setting) -> String {
        self.settings
            .get(setting.name)
            .cloned()
            .unwrap_or_else(|| setting.default.to_string())
    }
}

/// Options every engine shares
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommonOptions {
    pub database: String,
    pub username: String,
    pub password: String,
    /// Skip user creation and only create the database
    pub no_user: bool,
    /// Guard `CREATE USER` against an existing user
    pub user_if_not_exists: bool,
    /// Guard `CREATE DATABASE` against an existing database
    pub database_if_not_exists: bool,
}

impl From<&EngineFlags> for CommonOptions {
    fn from(flags: &EngineFlags) -> Self {
        Self {
            database: flags.database.clone(),
            username: flags.username.clone(),
            password: flags.password.clone(),
            no_user: flags.no_user,
            user_if_not_exists: flags.user_if_not_exists,
            database_if_not_exists: flags.database_if_not_exists,
        }
    }
}

/// Validated options for one engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOptions {
    Postgres(PostgresOptions),
    Mysql(MysqlOptions),
}

impl EngineOptions {
    #[must_use]
    pub const fn common(&self) -> &CommonOptions {
        match self {
            Self::Postgres(options) => &options.common,
            Self::Mysql(options) => &options.common,
        }
    }

    /// Name of the engine these options were built for
    #[must_use]
    pub const fn engine(&self) -> &'static str {
        match self {
            Self::Postgres(_) => postgres::NAME,
            Self::Mysql(_) => mysql::NAME,
        }
    }
}

/// A database engine that can be bootstrapped
pub trait Engine: fmt::Debug + Sync {
    /// Sub-command name, also used in the job name
    fn name(&self) -> &'static str;

    fn about(&self) -> &'static str;

    /// Container image repository, tagged with the requested version
    fn image(&self) -> &'static str;

    /// Settings only this engine understands
    fn settings(&self) -> &'static [Setting];

    /// Build the option set, applying defaults for unset settings
    fn options(&self, flags: &EngineFlags) -> EngineOptions;

    /// Render the bootstrap script for `connection`.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` belong to another engine or the
    /// script template fails to render
    fn render_script(
        &self,
        renderer: &Renderer,
        connection: &ConnectionDescriptor,
        options: &EngineOptions,
    ) -> Result<String>;
}

/// All registered engines, in help order
#[must_use]
pub fn registry() -> &'static [&'static dyn Engine] {
    &ENGINES
}

/// Look up a registered engine by name.
///
/// # Errors
///
/// Returns [`Error::MissingDatabaseType`] for an empty name and
/// [`Error::UnsupportedDatabaseType`] for an unknown one
pub fn lookup(name: &str) -> Result<&'static dyn Engine> {
    if name.is_empty() {
        return Err(Error::MissingDatabaseType);
    }

    registry()
        .iter()
        .copied()
        .find(|engine| engine.name() == name)
        .ok_or_else(|| Error::UnsupportedDatabaseType(name.to_string()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("postgres").unwrap().name(), "postgres");
        assert_eq!(lookup("mysql").unwrap().name(), "mysql");
    }

    #[test]
    fn test_lookup_missing() {
        let err = lookup("").unwrap_err();
        assert!(matches!(err, Error::MissingDatabaseType));
        assert_eq!(err.to_string(), "missing database type");
    }

    #[test]
    fn test_lookup_unsupported() {
        let err = lookup("oracle").unwrap_err();
        assert!(matches!(err, Error::UnsupportedDatabaseType(ref name) if name == "oracle"));
    }

    #[test]
    fn test_registry_names_are_unique() {
        let mut names: Vec<_> = registry().iter().map(|engine| engine.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), registry().len());
    }

    #[test]
    fn test_setting_default() {
        let setting = Setting {
            name: "encoding",
            help: "",
            default: "UTF8",
        };
        let mut flags = EngineFlags::default();
        assert_eq!(flags.setting(&setting), "UTF8");

        flags.settings.insert("encoding", "LATIN1".to_string());
        assert_eq!(flags.setting(&setting), "LATIN1");
    }

    #[test]
    fn test_options_record_their_engine() {
        for engine in registry() {
            let options = engine.options(&EngineFlags::default());
            assert_eq!(options.engine(), engine.name());
        }
    }

    #[test]
    fn test_renderer_rejects_foreign_options() {
        let renderer = Renderer::new();
        let connection = ConnectionDescriptor::Url("postgresql://x".to_string());
        let options = Mysql.options(&EngineFlags::default());
        let err = Postgres
            .render_script(&renderer, &connection, &options)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::OptionsMismatch {
                engine: "postgres",
                found: "mysql"
            }
        ));
    }
}
