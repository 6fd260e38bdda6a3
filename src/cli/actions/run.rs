use super::Action;
use anyhow::Context;
use chrono::Utc;
use std::io::{self, Write};

/// Execute the action's business logic by delegating to the appropriate module
pub fn execute(action: Action) -> anyhow::Result<()> {
    match action {
        Action::Create { engine, request } => {
            let manifest = crate::bootstrap::render(engine, &request, Utc::now())?;

            let mut stdout = io::stdout().lock();
            stdout
                .write_all(manifest.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write manifest to stdout")
        }
    }
}
