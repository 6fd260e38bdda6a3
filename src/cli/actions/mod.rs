mod run;

use crate::{bootstrap::CreateRequest, engine::Engine};

/// Action enum representing each possible command
#[derive(Debug)]
pub enum Action {
    Create {
        engine: &'static dyn Engine,
        request: CreateRequest,
    },
}

impl Action {
    /// Execute the action
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails to execute
    pub fn execute(self) -> anyhow::Result<()> {
        run::execute(self)
    }
}
