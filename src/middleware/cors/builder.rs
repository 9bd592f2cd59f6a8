use http::Method;
use regex::Regex;

use super::CorsFilter;
use crate::policy::{
    AllowedHeaders, AllowedOrigins, CorsPolicy, PolicyError, DEFAULT_MAX_AGE_SECONDS,
};

/// Which origin strategy the builder was given; resolved in `build()`.
enum OriginSpec {
    Exact(Vec<String>),
    Patterns(Vec<String>),
    Any,
}

/// Fluent builder for programmatic [`CorsFilter`] construction.
///
/// The configuration-string path (`CorsPolicy::from_origins` /
/// `CorsFilter::from_env`) covers the common case; the builder exists for
/// embedders that need regex origin patterns, a header allow-list, or
/// non-default methods.
///
/// # Example
///
/// ```rust
/// use corsfilter::CorsFilterBuilder;
/// use http::Method;
///
/// let filter = CorsFilterBuilder::new()
///     .allowed_origins(&["https://example.com", "https://api.example.com"])
///     .allowed_methods(&[Method::GET, Method::POST])
///     .allow_credentials(true)
///     .max_age(3600)
///     .build()?;
/// # Ok::<(), corsfilter::PolicyError>(())
/// ```
pub struct CorsFilterBuilder {
    origins: OriginSpec,
    allowed_headers: AllowedHeaders,
    allowed_methods: Vec<Method>,
    allow_credentials: bool,
    max_age_seconds: u32,
}

impl CorsFilterBuilder {
    /// Create a builder with the policy defaults: no origins allowed yet,
    /// wildcard request headers, the fixed default method list,
    /// credentials enabled, and a 3600 second preflight cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origins: OriginSpec::Exact(vec![]),
            allowed_headers: AllowedHeaders::Any,
            allowed_methods: CorsPolicy::default_methods(),
            allow_credentials: true,
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
        }
    }

    /// Set exact-match allowed origins.
    #[must_use]
    pub fn allowed_origins(mut self, origins: &[&str]) -> Self {
        self.origins = OriginSpec::Exact(origins.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Set regex patterns for origin matching (e.g.
    /// `^https://.*\.example\.com$`). Patterns compile in `build()`.
    #[must_use]
    pub fn allowed_origin_patterns(mut self, patterns: &[&str]) -> Self {
        self.origins = OriginSpec::Patterns(patterns.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Allow every origin. Invalid with credentials; matched origins are
    /// still echoed exactly, never as `*`.
    #[must_use]
    pub fn any_origin(mut self) -> Self {
        self.origins = OriginSpec::Any;
        self
    }

    /// Set the advertised method list.
    #[must_use]
    pub fn allowed_methods(mut self, methods: &[Method]) -> Self {
        self.allowed_methods = methods.to_vec();
        self
    }

    /// Restrict cross-origin request headers to an allow-list. Preflights
    /// naming other headers are denied.
    #[must_use]
    pub fn allowed_headers(mut self, headers: &[&str]) -> Self {
        self.allowed_headers =
            AllowedHeaders::List(headers.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Accept any requested header (the default); preflight responses echo
    /// the requested list.
    #[must_use]
    pub fn any_header(mut self) -> Self {
        self.allowed_headers = AllowedHeaders::Any;
        self
    }

    /// Enable or disable `Access-Control-Allow-Credentials: true`.
    #[must_use]
    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    /// Set the preflight cache duration in seconds.
    #[must_use]
    pub fn max_age(mut self, seconds: u32) -> Self {
        self.max_age_seconds = seconds;
        self
    }

    /// Compile patterns, validate the policy, and build the filter.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::InvalidPattern`] for a regex that fails to compile
    /// - [`PolicyError::WildcardWithCredentials`] /
    ///   [`PolicyError::CredentialsWithoutOrigins`] when credentials are
    ///   enabled without explicit origins
    pub fn build(self) -> Result<CorsFilter, PolicyError> {
        let allowed_origins = match self.origins {
            OriginSpec::Exact(origins) => AllowedOrigins::Exact(origins),
            OriginSpec::Any => AllowedOrigins::Any,
            OriginSpec::Patterns(patterns) => {
                let mut compiled = Vec::with_capacity(patterns.len());
                for pattern in patterns {
                    match Regex::new(&pattern) {
                        Ok(re) => compiled.push(re),
                        Err(e) => {
                            return Err(PolicyError::InvalidPattern {
                                pattern,
                                message: e.to_string(),
                            })
                        }
                    }
                }
                AllowedOrigins::Patterns(compiled)
            }
        };

        CorsFilter::new(CorsPolicy {
            allowed_origins,
            allowed_methods: self.allowed_methods,
            allowed_headers: self.allowed_headers,
            allow_credentials: self.allow_credentials,
            max_age_seconds: self.max_age_seconds,
        })
    }
}

impl Default for CorsFilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
