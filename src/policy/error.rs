use std::fmt;

/// CORS policy configuration error.
///
/// Every variant is fatal at startup: the embedder must refuse to serve
/// with an ambiguous policy. There are no runtime error returns; once a
/// policy is built, every request yields a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The origins configuration string was empty.
    EmptyOrigins,
    /// The comma-separated origins string contained an empty entry.
    EmptyEntry {
        /// Zero-based position of the empty entry
        position: usize,
    },
    /// An origin entry is not a valid origin.
    ///
    /// Origins must be `scheme://host[:port]` with an http/https scheme and
    /// no path, query, fragment, or userinfo.
    InvalidOrigin {
        /// The offending entry
        origin: String,
        /// What was wrong with it
        reason: String,
    },
    /// Wildcard origin (`*`) cannot be combined with credentials.
    ///
    /// Credentialed responses require an explicit origin echo; a wildcard
    /// policy with credentials is rejected at startup.
    WildcardWithCredentials,
    /// Credentials require at least one allowed origin.
    CredentialsWithoutOrigins,
    /// An origin regex pattern failed to compile.
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Compiler diagnostic
        message: String,
    },
    /// The origins environment variable was not set.
    MissingEnv {
        /// Name of the variable
        var: String,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::EmptyOrigins => {
                write!(
                    f,
                    "CORS configuration error: allowed origins list is empty. \
                    Provide a comma-separated list of origins, e.g. \
                    http://localhost:5173,https://app.example.com"
                )
            }
            PolicyError::EmptyEntry { position } => {
                write!(
                    f,
                    "CORS configuration error: empty origin entry at position {} \
                    in the comma-separated origins list.",
                    position
                )
            }
            PolicyError::InvalidOrigin { origin, reason } => {
                write!(
                    f,
                    "CORS configuration error: invalid origin '{}': {}. \
                    Expected format: scheme://host[:port] (e.g. https://example.com)",
                    origin, reason
                )
            }
            PolicyError::WildcardWithCredentials => {
                write!(
                    f,
                    "CORS configuration error: cannot use wildcard origin (*) with \
                    credentials. When allow_credentials is true, you must specify \
                    exact origins."
                )
            }
            PolicyError::CredentialsWithoutOrigins => {
                write!(
                    f,
                    "CORS configuration error: cannot use credentials with an empty \
                    origins list. When allow_credentials is true, at least one \
                    origin must be specified."
                )
            }
            PolicyError::InvalidPattern { pattern, message } => {
                write!(
                    f,
                    "CORS configuration error: invalid origin pattern '{}': {}",
                    pattern, message
                )
            }
            PolicyError::MissingEnv { var } => {
                write!(
                    f,
                    "CORS configuration error: environment variable {} is not set. \
                    Allowed origins must be configured explicitly.",
                    var
                )
            }
        }
    }
}

impl std::error::Error for PolicyError {}
