use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tracing::{debug, warn};

/// Characters that would break the userinfo part of a connection URL
const USERINFO: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Raw connection flags as collected from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionFlags {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Canonical description of how to reach the database server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionDescriptor {
    /// Pre-formed connection string, used verbatim
    Url(String),
    /// Discrete fields; missing ones are carried as empty strings
    Discrete {
        host: String,
        port: String,
        username: String,
        password: String,
    },
}

/// Reconcile the opaque URL and the discrete fields into one descriptor.
///
/// A non-empty URL wins and the discrete fields are not examined. An
/// incomplete discrete connection is not rejected here: it renders to a
/// connection string the client will refuse at execution time.
#[must_use]
pub fn resolve(flags: &ConnectionFlags) -> ConnectionDescriptor {
    if let Some(url) = flags.url.as_deref().filter(|url| !url.is_empty()) {
        debug!("using opaque connection url, discrete connection flags ignored");
        return ConnectionDescriptor::Url(url.to_string());
    }

    let descriptor = ConnectionDescriptor::Discrete {
        host: flags.host.clone().unwrap_or_default(),
        port: flags.port.map(|port| port.to_string()).unwrap_or_default(),
        username: flags.username.clone().unwrap_or_default(),
        password: flags.password.clone().unwrap_or_default(),
    };

    let missing = descriptor.missing_fields();
    if !missing.is_empty() {
        warn!(
            missing = %missing.join(", "),
            "discrete connection is incomplete, the rendered connection string will not be usable"
        );
    }

    descriptor
}

impl ConnectionDescriptor {
    /// Which of the two connection forms this is, safe to log
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::Discrete { .. } => "discrete",
        }
    }

    /// Names of the discrete fields left empty; always empty for a URL
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            Self::Url(_) => Vec::new(),
            Self::Discrete {
                host,
                port,
                username,
                password,
            } => [
                ("host", host),
                ("port", port),
                ("username", username),
                ("password", password),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect(),
        }
    }

    /// Render the connection string for a client speaking `scheme`.
    ///
    /// The opaque URL is returned untouched; discrete credentials are
    /// percent-encoded so reserved characters cannot split the URL.
    #[must_use]
    pub fn connection_string(&self, scheme: &str) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Discrete {
                host,
                port,
                username,
                password,
            } => format!(
                "{scheme}://{}:{}@{host}:{port}",
                utf8_percent_encode(username, USERINFO),
                utf8_percent_encode(password, USERINFO),
            ),
        }
    }
}
