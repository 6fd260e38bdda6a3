use crate::engine::{self, Engine};
use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

/// Pure clap command definitions with zero business logic
#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .long_about(
            "Drafts Kubernetes Job specs that create and bootstrap databases on \
            postgres and mysql. The manifest is printed to stdout, pipe it to \
            `kubectl apply -f -`.",
        )
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)")
                .long("verbose")
                .short('v'),
        )
        .subcommand(create())
}

/// `create <engine>`, one sub-command per registered engine
fn create() -> Command {
    Command::new("create")
        .about("Creates a new database")
        .long_about("Templates a new database from a given type, name, user, and password")
        .args(connection_args())
        .arg(
            Arg::new("env")
                .action(ArgAction::Append)
                .global(true)
                .help("Environment variable for the job container, repeatable")
                .long("env")
                .short('e')
                .value_name("NAME=VALUE"),
        )
        .arg(
            Arg::new("ttl-seconds-after-finished")
                .global(true)
                .help("Seconds a finished job is kept before it is deleted [default: 100]")
                .long("ttl-seconds-after-finished")
                .value_name("SECONDS")
                .value_parser(clap::value_parser!(u32)),
        )
        .subcommands(engine::registry().iter().map(|engine| engine_command(*engine)))
}

fn connection_args() -> [Arg; 5] {
    [
        Arg::new("url")
            .env("CONCIERGE_URL")
            .global(true)
            .help("Connection URL of the server, takes precedence over the discrete flags")
            .long("url")
            .value_name("URL"),
        Arg::new("host")
            .env("CONCIERGE_HOST")
            .global(true)
            .help("Host of the server")
            .long("host"),
        Arg::new("port")
            .env("CONCIERGE_PORT")
            .global(true)
            .help("Port of the server")
            .long("port")
            .value_parser(clap::value_parser!(u16)),
        Arg::new("connection-username")
            .env("CONCIERGE_CONNECTION_USERNAME")
            .global(true)
            .help("Username used to connect to the server")
            .long("connection-username"),
        Arg::new("connection-password")
            .env("CONCIERGE_CONNECTION_PASSWORD")
            .global(true)
            .help("Password used to connect to the server")
            .hide_env_values(true)
            .long("connection-password"),
    ]
}

fn engine_command(engine: &dyn Engine) -> Command {
    let settings = engine.settings().iter().map(|setting| {
        Arg::new(setting.name)
            .help(format!("{} [default: {}]", setting.help, setting.default))
            .long(setting.name)
    });

    Command::new(engine.name())
        .about(engine.about())
        .long_about(format!(
            "Templates a kubernetes job that creates a new {} database",
            engine.name()
        ))
        .arg(
            Arg::new("database")
                .help("Database name to create")
                .long("database")
                .required(true)
                .short('d'),
        )
        .arg(
            Arg::new("username")
                .help("Username of user to create")
                .long("username")
                .short('u'),
        )
        .arg(
            Arg::new("password")
                .help("Password of user to create")
                .long("password")
                .short('p'),
        )
        .arg(
            Arg::new("database-version")
                .help("Database version to interact with, keep this matching your upstream database [default: latest]")
                .long("database-version")
                .value_name("VERSION"),
        )
        .arg(
            Arg::new("user-if-not-exists")
                .action(ArgAction::SetTrue)
                .help("Skip CREATE USER when the user already exists")
                .long("user-if-not-exists"),
        )
        .arg(
            Arg::new("database-if-not-exists")
                .action(ArgAction::SetTrue)
                .help("Skip CREATE DATABASE when the database already exists")
                .long("database-if-not-exists"),
        )
        .arg(
            Arg::new("no-user")
                .action(ArgAction::SetTrue)
                .help("Skips user creation and only creates a database")
                .long("no-user"),
        )
        .args(settings)
}
