use super::{commands, dispatch, telemetry};
use anyhow::Result;
use clap::ArgMatches;

/// Highest `-v` count seen along the sub-command chain
fn extract_verbosity(matches: &ArgMatches) -> u8 {
    let mut verbosity = 0;
    let mut current = Some(matches);
    while let Some(m) = current {
        let count = m
            .try_get_one::<u8>("verbose")
            .ok()
            .flatten()
            .copied()
            .unwrap_or_default();
        verbosity = verbosity.max(count);
        current = m.subcommand().map(|(_, sub)| sub);
    }
    verbosity
}

/// Main orchestrator - Pure orchestration with no business logic
///
/// Five-step data flow:
/// 1. Parse: Extract CLI arguments
/// 2. Extract Verbosity: Convert flag count to logging level
/// 3. Initialize Telemetry: Set up structured logging on stderr
/// 4. Dispatch: Convert `ArgMatches` into typed Action enum
/// 5. Execute: Render the manifest and write it to stdout
///
/// # Errors
///
/// Returns an error if any step in the flow fails
pub fn start() -> Result<()> {
    // 1. Parse: Extract CLI arguments
    let matches = commands::new().get_matches();

    // 2. Extract Verbosity
    let verbosity = extract_verbosity(&matches);

    // 3. Initialize Telemetry
    telemetry::init(verbosity)?;

    // 4. Dispatch: Convert ArgMatches into typed Action enum
    let action = dispatch::dispatch(&matches)?;

    // 5. Execute: Run the action's business logic
    action.execute()?;

    Ok(())
}
