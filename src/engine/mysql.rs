use super::{CommonOptions, Engine, EngineFlags, EngineOptions, Setting};
use crate::{
    connection::ConnectionDescriptor,
    error::{Error, Result},
    render::Renderer,
};
use serde::Serialize;

pub const NAME: &str = "mysql";

const SCHEME: &str = "mysql";

const CHARSET: Setting = Setting {
    name: "charset",
    help: "Database character set, CHARACTER SET",
    default: "utf8mb4",
};

const COLLATION: Setting = Setting {
    name: "collation",
    help: "Database collation, COLLATE",
    default: "utf8mb4_unicode_ci",
};

const USER_HOST: Setting = Setting {
    name: "user-host",
    help: "Host part of the created account",
    default: "%",
};

static SETTINGS: [Setting; 3] = [CHARSET, COLLATION, USER_HOST];

// MySQL databases have no owner, ownership is a grant on the schema
const SCRIPT: &str = r"mysqlsh --sql --uri {{sh_quote connection}} <<'EOF'
{{#unless no_user}}CREATE USER {{#if user_if_not_exists}}IF NOT EXISTS {{/if}}{{mysql_literal username}}@{{mysql_literal user_host}} IDENTIFIED BY {{mysql_literal password}};
{{/unless}}CREATE DATABASE {{#if database_if_not_exists}}IF NOT EXISTS {{/if}}{{mysql_ident database}} CHARACTER SET {{mysql_literal charset}} COLLATE {{mysql_literal collation}};
{{#unless no_user}}GRANT ALL PRIVILEGES ON {{mysql_ident database}}.* TO {{mysql_literal username}}@{{mysql_literal user_host}};
{{/unless}}EOF
";

/// `MySQL` option set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MysqlOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub charset: String,
    pub collation: String,
    pub user_host: String,
}

#[derive(Serialize)]
struct ScriptContext<'a> {
    connection: String,
    #[serde(flatten)]
    options: &'a MysqlOptions,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mysql;

impl Engine for Mysql {
    fn name(&self) -> &'static str {
        NAME
    }

    fn about(&self) -> &'static str {
        "Creates a new mysql database"
    }

    fn image(&self) -> &'static str {
        "mysql"
    }

    fn settings(&self) -> &'static [Setting] {
        &SETTINGS
    }

    fn options(&self, flags: &EngineFlags) -> EngineOptions {
        EngineOptions::Mysql(MysqlOptions {
            common: CommonOptions::from(flags),
            charset: flags.setting(&CHARSET),
            collation: flags.setting(&COLLATION),
            user_host: flags.setting(&USER_HOST),
        })
    }

    fn render_script(
        &self,
        renderer: &Renderer,
        connection: &ConnectionDescriptor,
        options: &EngineOptions,
    ) -> Result<String> {
        let EngineOptions::Mysql(options) = options else {
            return Err(Error::OptionsMismatch {
                engine: NAME,
                found: options.engine(),
            });
        };

        let context = ScriptContext {
            connection: connection.connection_string(SCHEME),
            options,
        };

        renderer.render("mysql script", SCRIPT, &context)
    }
}
