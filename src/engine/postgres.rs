use super::{CommonOptions, Engine, EngineFlags, EngineOptions, Setting};
use crate::{
    connection::ConnectionDescriptor,
    error::{Error, Result},
    render::Renderer,
};
use serde::Serialize;

pub const NAME: &str = "postgres";

const SCHEME: &str = "postgresql";

const ENCODING: Setting = Setting {
    name: "encoding",
    help: "Database encoding, psql ENCODING",
    default: "UTF8",
};

const COLLATION: Setting = Setting {
    name: "collation",
    help: "Database collation, psql LC_COLLATE",
    default: "en_US.UTF-8",
};

const COMPARISON: Setting = Setting {
    name: "comparison",
    help: "Database character classification, psql LC_CTYPE",
    default: "en_US.UTF-8",
};

const TEMPLATE: Setting = Setting {
    name: "template",
    help: "Template database to copy, template0 allows a locale other than template1's",
    default: "template0",
};

static SETTINGS: [Setting; 4] = [ENCODING, COLLATION, COMPARISON, TEMPLATE];

// PostgreSQL has no IF NOT EXISTS for either statement, the guarded forms
// let psql build the statement and \gexec it only when the catalog lookup
// finds nothing.
const SCRIPT: &str = r"psql {{sh_quote connection}} --set ON_ERROR_STOP=1 <<'EOF'
{{#unless no_user}}{{#if user_if_not_exists}}SELECT format('CREATE USER %I WITH PASSWORD %L', {{pg_literal username}}, {{pg_literal password}}) WHERE NOT EXISTS (SELECT FROM pg_catalog.pg_roles WHERE rolname = {{pg_literal username}})\gexec{{else}}CREATE USER {{pg_ident username}} WITH PASSWORD {{pg_literal password}};{{/if}}
{{/unless}}{{#if database_if_not_exists}}SELECT format('CREATE DATABASE %I{{#unless no_user}} WITH OWNER %I{{/unless}} TEMPLATE %I ENCODING %L LC_COLLATE %L LC_CTYPE %L', {{pg_literal database}}, {{#unless no_user}}{{pg_literal username}}, {{/unless}}{{pg_literal template}}, {{pg_literal encoding}}, {{pg_literal collation}}, {{pg_literal comparison}}) WHERE NOT EXISTS (SELECT FROM pg_catalog.pg_database WHERE datname = {{pg_literal database}})\gexec{{else}}CREATE DATABASE {{pg_ident database}}{{#unless no_user}} WITH OWNER {{pg_ident username}}{{/unless}} TEMPLATE {{pg_ident template}} ENCODING {{pg_literal encoding}} LC_COLLATE {{pg_literal collation}} LC_CTYPE {{pg_literal comparison}};{{/if}}
EOF
";

/// `PostgreSQL` option set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostgresOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    /// ENCODING
    pub encoding: String,
    /// `LC_COLLATE`
    pub collation: String,
    /// `LC_CTYPE`
    pub comparison: String,
    /// TEMPLATE
    pub template: String,
}

#[derive(Serialize)]
struct ScriptContext<'a> {
    connection: String,
    #[serde(flatten)]
    options: &'a PostgresOptions,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Engine for Postgres {
    fn name(&self) -> &'static str {
        NAME
    }

    fn about(&self) -> &'static str {
        "Creates a new postgres database"
    }

    fn image(&self) -> &'static str {
        "postgres"
    }

    fn settings(&self) -> &'static [Setting] {
        &SETTINGS
    }

    fn options(&self, flags: &EngineFlags) -> EngineOptions {
        EngineOptions::Postgres(PostgresOptions {
            common: CommonOptions::from(flags),
            encoding: flags.setting(&ENCODING),
            collation: flags.setting(&COLLATION),
            comparison: flags.setting(&COMPARISON),
            template: flags.setting(&TEMPLATE),
        })
    }

    fn render_script(
        &self,
        renderer: &Renderer,
        connection: &ConnectionDescriptor,
        options: &EngineOptions,
    ) -> Result<String> {
        let EngineOptions::Postgres(options) = options else {
            return Err(Error::OptionsMismatch {
                engine: NAME,
                found: options.engine(),
            });
        };

        let context = ScriptContext {
            connection: connection.connection_string(SCHEME),
            options,
        };

        renderer.render("postgres script", SCRIPT, &context)
    }
}
