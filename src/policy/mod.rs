//! # Policy Module
//!
//! The immutable CORS policy and its construction from configuration.
//!
//! A [`CorsPolicy`] is built once at process startup, validated, and then
//! shared read-only across all concurrently handled requests. Malformed
//! configuration is a fatal [`PolicyError`]; the process must not start
//! serving with an ambiguous policy.
//!
//! ## Configuration
//!
//! The externally tunable input is a single comma-separated string of
//! allowed origins:
//!
//! ```bash
//! export CORSFILTER_ALLOWED_ORIGINS=http://localhost:5173,https://app.example.com
//! ```
//!
//! ```rust
//! use corsfilter::CorsPolicy;
//!
//! let policy = CorsPolicy::from_origins("http://localhost:5173")?;
//! assert!(policy.allow_credentials);
//! assert_eq!(policy.max_age_seconds, 3600);
//! # Ok::<(), corsfilter::PolicyError>(())
//! ```
//!
//! There is no built-in default origin: origins must be configured
//! explicitly, and a missing `CORSFILTER_ALLOWED_ORIGINS` is a startup
//! error rather than a silently honored placeholder.

mod error;

pub use error::PolicyError;

use std::env;

use http::Method;
use regex::Regex;
use url::Url;

/// Environment variable holding the comma-separated allowed origins.
pub const ORIGINS_ENV_VAR: &str = "CORSFILTER_ALLOWED_ORIGINS";

/// Default preflight cache duration in seconds.
pub const DEFAULT_MAX_AGE_SECONDS: u32 = 3600;

/// Origin matching strategy.
#[derive(Debug, Clone)]
pub enum AllowedOrigins {
    /// Exact string matching against a fixed list
    Exact(Vec<String>),
    /// Regex pattern matching (programmatic construction only)
    Patterns(Vec<Regex>),
    /// Wildcard marker: any origin matches
    ///
    /// Even under `Any` the emitted `Access-Control-Allow-Origin` echoes
    /// the request origin exactly; the literal `*` is never sent.
    Any,
}

impl AllowedOrigins {
    /// Check whether an `Origin` header value is allowed.
    #[must_use]
    pub fn is_allowed(&self, origin: &str) -> bool {
        match self {
            AllowedOrigins::Exact(origins) => origins.iter().any(|o| o == origin),
            AllowedOrigins::Patterns(patterns) => patterns.iter().any(|re| re.is_match(origin)),
            AllowedOrigins::Any => true,
        }
    }
}

/// Request-header allowance for preflight validation.
#[derive(Debug, Clone)]
pub enum AllowedHeaders {
    /// Accept any requested header; preflight echoes the requested list
    Any,
    /// Accept only the listed headers (compared case-insensitively)
    List(Vec<String>),
}

impl AllowedHeaders {
    /// Check whether a single requested header name is permitted.
    #[must_use]
    pub fn permits(&self, header: &str) -> bool {
        match self {
            AllowedHeaders::Any => true,
            AllowedHeaders::List(allowed) => {
                allowed.iter().any(|h| h.eq_ignore_ascii_case(header))
            }
        }
    }
}

/// Immutable CORS policy, constructed once at process start.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    /// Origins permitted to read cross-origin responses
    pub allowed_origins: AllowedOrigins,
    /// Methods advertised on preflight responses
    pub allowed_methods: Vec<Method>,
    /// Request headers permitted on cross-origin requests
    pub allowed_headers: AllowedHeaders,
    /// Whether `Access-Control-Allow-Credentials: true` is emitted
    pub allow_credentials: bool,
    /// `Access-Control-Max-Age` value on preflight responses
    pub max_age_seconds: u32,
}

impl CorsPolicy {
    /// The fixed default method list: `GET, POST, PUT, DELETE, OPTIONS, PATCH`.
    #[must_use]
    pub fn default_methods() -> Vec<Method> {
        vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ]
    }

    /// Build a policy from a comma-separated origins string.
    ///
    /// Uses the default method list, wildcard request headers, credentials
    /// enabled, and a 3600 second preflight cache.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] for an empty list, an empty entry, an
    /// entry that is not a plain `scheme://host[:port]` origin, or a
    /// wildcard (credentials are on by default and require exact origins).
    pub fn from_origins(raw: &str) -> Result<Self, PolicyError> {
        let policy = Self {
            allowed_origins: parse_origins(raw)?,
            allowed_methods: Self::default_methods(),
            allowed_headers: AllowedHeaders::Any,
            allow_credentials: true,
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Build a policy from the `CORSFILTER_ALLOWED_ORIGINS` environment
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::MissingEnv`] when the variable is unset, and
    /// all the [`CorsPolicy::from_origins`] errors otherwise.
    pub fn from_env() -> Result<Self, PolicyError> {
        let raw = env::var(ORIGINS_ENV_VAR).map_err(|_| PolicyError::MissingEnv {
            var: ORIGINS_ENV_VAR.to_string(),
        })?;
        Self::from_origins(&raw)
    }

    /// Enforce the credentialed-origin invariant.
    ///
    /// When credentials are enabled the policy must resolve every allowed
    /// request to an explicit origin echo, so a wildcard or empty origins
    /// list is rejected.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.allow_credentials {
            return Ok(());
        }
        match &self.allowed_origins {
            AllowedOrigins::Any => Err(PolicyError::WildcardWithCredentials),
            AllowedOrigins::Exact(origins) if origins.is_empty() => {
                Err(PolicyError::CredentialsWithoutOrigins)
            }
            _ => Ok(()),
        }
    }

    /// Render the method list for `Access-Control-Allow-Methods`.
    #[must_use]
    pub fn methods_header_value(&self) -> String {
        self.allowed_methods
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse a comma-separated origins string into a matching strategy.
///
/// A lone `*` selects [`AllowedOrigins::Any`]. Entries are trimmed of
/// surrounding whitespace; anything else wrong with an entry is fatal.
pub fn parse_origins(raw: &str) -> Result<AllowedOrigins, PolicyError> {
    if raw.trim().is_empty() {
        return Err(PolicyError::EmptyOrigins);
    }
    if raw.trim() == "*" {
        return Ok(AllowedOrigins::Any);
    }

    let mut origins = Vec::new();
    for (position, entry) in raw.split(',').enumerate() {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(PolicyError::EmptyEntry { position });
        }
        validate_origin_entry(entry)?;
        origins.push(entry.to_string());
    }
    Ok(AllowedOrigins::Exact(origins))
}

/// Validate one origin entry as `scheme://host[:port]`.
///
/// The stored string is compared byte-for-byte against the request's
/// `Origin` header, so anything a browser would never send there (paths,
/// query strings, userinfo, embedded whitespace) is a configuration error.
fn validate_origin_entry(entry: &str) -> Result<(), PolicyError> {
    let invalid = |reason: &str| PolicyError::InvalidOrigin {
        origin: entry.to_string(),
        reason: reason.to_string(),
    };

    if entry == "*" {
        return Err(invalid("wildcard must be the only entry"));
    }
    if entry.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }

    let url = Url::parse(entry).map_err(|e| invalid(&e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if entry.ends_with('/') || !matches!(url.path(), "" | "/") {
        return Err(invalid("must not include a path"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not include a query or fragment"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("must not include userinfo"));
    }
    Ok(())
}
