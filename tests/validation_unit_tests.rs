//! Unit tests for configuration lint

use portalcfg::config::ConfigDocument;
use portalcfg::config::loader::parse_document;
use portalcfg::config::validation::{validate_base_url, validate_document};

#[test]
fn test_validate_base_url() {
    // Valid bases
    assert!(validate_base_url("https://hooks.example.com").is_ok());
    assert!(validate_base_url("http://localhost:5678/webhook").is_ok());

    // Invalid bases
    assert!(validate_base_url("").is_err());
    assert!(validate_base_url("hooks.example.com").is_err());
    assert!(validate_base_url("ws://hooks.example.com").is_err());
    assert!(validate_base_url("https://hooks.example.com/webhook/").is_err());

    let message = format!("{:#}", validate_base_url("hooks.example.com").unwrap_err());
    assert!(message.contains("is not a valid URL"));
}

#[test]
fn test_lint_reports_but_never_rejects() {
    let document = parse_document(
        r##"{
            "features": {"chat": "true", "bills": true},
            "theme": {"colors": {"brand": "#123456"}},
            "api": {"webhookBaseUrl": "not a url"}
        }"##,
    )
    .unwrap();

    let warnings = validate_document(&document);
    let paths: Vec<&str> = warnings.iter().map(|w| w.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["theme.colors.brand", "features.chat", "api.webhookBaseUrl"]
    );
}

#[test]
fn test_empty_document_is_clean() {
    assert!(validate_document(&ConfigDocument::default()).is_empty());
}
