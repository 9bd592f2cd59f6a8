use corsfilter::policy::{parse_origins, ORIGINS_ENV_VAR};
use corsfilter::{AllowedOrigins, CorsFilter, CorsFilterBuilder, CorsPolicy, PolicyError};
use http::Method;

#[test]
fn test_parse_multiple_origins() {
    let policy = CorsPolicy::from_origins("http://localhost:5173,https://app.example.com").unwrap();

    match &policy.allowed_origins {
        AllowedOrigins::Exact(origins) => {
            assert_eq!(
                origins,
                &vec![
                    "http://localhost:5173".to_string(),
                    "https://app.example.com".to_string()
                ]
            );
        }
        other => panic!("expected exact origins, got {other:?}"),
    }

    assert!(policy.allow_credentials);
    assert_eq!(policy.max_age_seconds, 3600);
    assert_eq!(
        policy.allowed_methods,
        vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ]
    );
}

#[test]
fn test_surrounding_whitespace_is_trimmed() {
    let policy = CorsPolicy::from_origins(" http://localhost:5173 , https://app.example.com").unwrap();
    assert!(policy.allowed_origins.is_allowed("http://localhost:5173"));
    assert!(policy.allowed_origins.is_allowed("https://app.example.com"));
}

#[test]
fn test_empty_configuration_is_fatal() {
    assert_eq!(
        CorsPolicy::from_origins("").unwrap_err(),
        PolicyError::EmptyOrigins
    );
    assert_eq!(
        CorsPolicy::from_origins("   ").unwrap_err(),
        PolicyError::EmptyOrigins
    );
}

#[test]
fn test_empty_entry_is_fatal() {
    assert_eq!(
        CorsPolicy::from_origins("http://a.com,,http://b.com").unwrap_err(),
        PolicyError::EmptyEntry { position: 1 }
    );
    assert!(matches!(
        CorsPolicy::from_origins("http://a.com,").unwrap_err(),
        PolicyError::EmptyEntry { position: 1 }
    ));
}

#[test]
fn test_malformed_origins_are_fatal() {
    for raw in [
        "ftp://example.com",
        "https://example.com/api",
        "http://bad origin.com",
        "notaurl",
    ] {
        assert!(
            matches!(
                CorsPolicy::from_origins(raw).unwrap_err(),
                PolicyError::InvalidOrigin { .. }
            ),
            "expected {raw:?} to be rejected"
        );
    }
}

#[test]
fn test_wildcard_with_default_credentials_is_fatal() {
    // Credentialed responses require an explicit origin echo; the default
    // policy has credentials on, so a wildcard cannot start the process.
    assert_eq!(
        CorsPolicy::from_origins("*").unwrap_err(),
        PolicyError::WildcardWithCredentials
    );
}

#[test]
fn test_embedded_wildcard_entry_is_rejected() {
    assert!(matches!(
        CorsPolicy::from_origins("http://a.com,*").unwrap_err(),
        PolicyError::InvalidOrigin { .. }
    ));
}

#[test]
fn test_parse_origins_wildcard_alone() {
    assert!(matches!(parse_origins("*").unwrap(), AllowedOrigins::Any));
}

#[test]
fn test_builder_credentials_require_origins() {
    let err = CorsFilterBuilder::new()
        .any_origin()
        .build()
        .unwrap_err();
    assert_eq!(err, PolicyError::WildcardWithCredentials);

    let err = CorsFilterBuilder::new().build().unwrap_err();
    assert_eq!(err, PolicyError::CredentialsWithoutOrigins);
}

#[test]
fn test_builder_rejects_invalid_pattern() {
    let err = CorsFilterBuilder::new()
        .allowed_origin_patterns(&["["])
        .build()
        .unwrap_err();
    assert!(matches!(err, PolicyError::InvalidPattern { .. }));
}

#[test]
fn test_error_display_names_the_problem() {
    let err = CorsPolicy::from_origins("https://example.com/api").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("https://example.com/api"), "message: {msg}");
    assert!(msg.contains("path"), "message: {msg}");

    assert!(PolicyError::WildcardWithCredentials
        .to_string()
        .contains("wildcard"));
}

#[test]
fn test_from_env_roundtrip() {
    // Single test touching the env var to avoid races between tests.
    std::env::remove_var(ORIGINS_ENV_VAR);
    assert!(matches!(
        CorsFilter::from_env().unwrap_err(),
        PolicyError::MissingEnv { .. }
    ));

    std::env::set_var(ORIGINS_ENV_VAR, "http://localhost:5173");
    let filter = CorsFilter::from_env().unwrap();
    assert!(filter
        .policy()
        .allowed_origins
        .is_allowed("http://localhost:5173"));
    std::env::remove_var(ORIGINS_ENV_VAR);
}

#[test]
fn test_methods_header_value_preserves_order() {
    let policy = CorsPolicy::from_origins("http://localhost:5173").unwrap();
    assert_eq!(
        policy.methods_header_value(),
        "GET, POST, PUT, DELETE, OPTIONS, PATCH"
    );
}
