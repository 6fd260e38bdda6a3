use thiserror::Error;

/// Result type for rendering operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while turning a creation request into a manifest.
#[derive(Debug, Error)]
pub enum Error {
    /// `create` was invoked without an engine sub-command.
    #[error("missing database type")]
    MissingDatabaseType,
    /// The requested engine is not registered.
    #[error("unsupported database type: {0}")]
    UnsupportedDatabaseType(String),
    /// A script renderer was handed options built for another engine.
    #[error("{engine} cannot render options prepared for {found}")]
    OptionsMismatch {
        engine: &'static str,
        found: &'static str,
    },
    /// A template failed to parse or to execute against its context.
    #[error("failed to render {template} template")]
    Composition {
        template: &'static str,
        #[source]
        source: handlebars::RenderError,
    },
    /// Identifiers are never allowed to carry control characters.
    #[error("invalid identifier {0:?}: control characters are not allowed")]
    InvalidIdentifier(String),
    /// The job manifest could not be serialized.
    #[error("failed to encode job manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
