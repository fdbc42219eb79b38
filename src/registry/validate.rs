//! Field-level validation for upstream payloads.
//!
//! # Responsibilities
//! - Reject unknown fields, naming the offender
//! - Check the server grammar (domain, IPv4, IPv6, unix socket path)
//! - Check value ranges (port, weight) and shapes (scheme, down, route)
//!
//! # Design Decisions
//! - One entry point shared by create, update, and the seed bulk load
//! - First failing rule wins; nothing is mutated before validation passes
//! - IP literals parse via `std::net`; the domain and socket grammars are
//!   plain character scans, no regex

use std::net::{Ipv4Addr, Ipv6Addr};

use serde_json::Value;
use thiserror::Error;

use super::record::{Scheme, UpstreamPayload};

/// Exactly the fields an upstream payload may carry.
pub const ALLOWED_FIELDS: [&str; 6] = ["server", "scheme", "port", "weight", "down", "route"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("payload must be a JSON object")]
    NotAnObject,
    #[error("invalid field provided: {0}")]
    UnknownField(String),
    #[error("server field is required")]
    MissingServer,
    #[error("invalid value for server: {0}")]
    InvalidServer(String),
    #[error("invalid value for scheme: {0}")]
    InvalidScheme(String),
    #[error("invalid value for port: {0}")]
    InvalidPort(String),
    #[error("invalid value for weight: {0}")]
    InvalidWeight(String),
    #[error("invalid value for down: {0}")]
    InvalidDown(String),
    #[error("invalid value for route: {0}")]
    InvalidRoute(String),
}

/// Parse and validate a raw payload into its typed form.
pub fn parse_payload(value: &Value) -> Result<UpstreamPayload, ValidationError> {
    let map = value.as_object().ok_or(ValidationError::NotAnObject)?;

    for key in map.keys() {
        if !ALLOWED_FIELDS.contains(&key.as_str()) {
            return Err(ValidationError::UnknownField(key.clone()));
        }
    }

    let mut payload = UpstreamPayload::default();

    if let Some(v) = map.get("server") {
        let server = v
            .as_str()
            .filter(|s| is_valid_server(s))
            .ok_or_else(|| ValidationError::InvalidServer(v.to_string()))?;
        payload.server = Some(server.to_string());
    }

    if let Some(v) = map.get("scheme") {
        let scheme = v
            .as_str()
            .and_then(parse_scheme)
            .ok_or_else(|| ValidationError::InvalidScheme(v.to_string()))?;
        payload.scheme = Some(scheme);
    }

    if let Some(v) = map.get("port") {
        let port = v
            .as_u64()
            .filter(|p| (1..=65535).contains(p))
            .ok_or_else(|| ValidationError::InvalidPort(v.to_string()))?;
        payload.port = Some(port as u16);
    }

    if let Some(v) = map.get("weight") {
        let weight = v
            .as_u64()
            .filter(|w| (1..=u64::from(u32::MAX)).contains(w))
            .ok_or_else(|| ValidationError::InvalidWeight(v.to_string()))?;
        payload.weight = Some(weight as u32);
    }

    if let Some(v) = map.get("down") {
        let down = v
            .as_bool()
            .ok_or_else(|| ValidationError::InvalidDown(v.to_string()))?;
        payload.down = Some(down);
    }

    if let Some(v) = map.get("route") {
        let route = v
            .as_str()
            .filter(|r| r.is_empty() || r.starts_with('/'))
            .ok_or_else(|| ValidationError::InvalidRoute(v.to_string()))?;
        payload.route = Some(route.to_string());
    }

    Ok(payload)
}

/// Like [`parse_payload`], but requires `server` (create and seed path).
pub fn parse_create_payload(value: &Value) -> Result<UpstreamPayload, ValidationError> {
    let payload = parse_payload(value)?;
    if payload.server.is_none() {
        return Err(ValidationError::MissingServer);
    }
    Ok(payload)
}

fn parse_scheme(value: &str) -> Option<Scheme> {
    match value {
        "http" => Some(Scheme::Http),
        "https" => Some(Scheme::Https),
        _ => None,
    }
}

fn is_valid_server(server: &str) -> bool {
    is_domain(server)
        || server.parse::<Ipv4Addr>().is_ok()
        || server.parse::<Ipv6Addr>().is_ok()
        || is_unix_socket(server)
}

// Dot-separated labels of [A-Za-z0-9_-], ending in an alphabetic top-level
// label of at least two characters. A bare hostname without a dot does not
// qualify.
fn is_domain(server: &str) -> bool {
    let mut labels = server.split('.');
    let Some(tld) = labels.next_back() else {
        return false;
    };
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    let mut seen = 0;
    for label in labels {
        if label.is_empty()
            || !label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return false;
        }
        seen += 1;
    }
    seen >= 1
}

// `unix:/` followed by a non-empty path of [A-Za-z0-9_/.-].
fn is_unix_socket(server: &str) -> bool {
    let Some(path) = server.strip_prefix("unix:/") else {
        return false;
    };
    !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_field_is_named() {
        let err = parse_payload(&json!({"servre": "10.0.0.1"})).unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("servre".to_string()));
        assert!(err.to_string().contains("servre"));
    }

    #[test]
    fn non_object_payloads_rejected() {
        assert_eq!(
            parse_payload(&json!([{"server": "10.0.0.1"}])).unwrap_err(),
            ValidationError::NotAnObject
        );
        assert_eq!(
            parse_payload(&json!("10.0.0.1")).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn server_grammars() {
        for ok in [
            "example.com",
            "api.backend-pool.internal.example",
            "my_host.example.org",
            "10.0.0.1",
            "2001:db8::1",
            "unix:/var/run/app.sock",
        ] {
            assert!(
                parse_payload(&json!({ "server": ok })).is_ok(),
                "expected {ok} to validate"
            );
        }

        for bad in [
            "localhost",
            "example.c",
            "exa mple.com",
            "example.com/path",
            "unix:relative.sock",
            "unix:/",
            "300.300.300.300",
            "",
        ] {
            assert!(
                parse_payload(&json!({ "server": bad })).is_err(),
                "expected {bad} to be rejected"
            );
        }
    }

    #[test]
    fn port_bounds_enforced() {
        assert!(parse_payload(&json!({"port": 1})).is_ok());
        assert!(parse_payload(&json!({"port": 65535})).is_ok());
        assert!(parse_payload(&json!({"port": 0})).is_err());
        assert!(parse_payload(&json!({"port": 65536})).is_err());
        assert!(parse_payload(&json!({"port": 80.5})).is_err());
        assert!(parse_payload(&json!({"port": "80"})).is_err());
    }

    #[test]
    fn weight_must_be_positive_integer() {
        assert!(parse_payload(&json!({"weight": 1})).is_ok());
        assert!(parse_payload(&json!({"weight": 0})).is_err());
        assert!(parse_payload(&json!({"weight": -2})).is_err());
        assert!(parse_payload(&json!({"weight": 1.5})).is_err());
    }

    #[test]
    fn scheme_down_route_rules() {
        assert_eq!(
            parse_payload(&json!({"scheme": "https"})).unwrap().scheme,
            Some(Scheme::Https)
        );
        assert!(parse_payload(&json!({"scheme": "ftp"})).is_err());
        assert!(parse_payload(&json!({"down": "yes"})).is_err());
        assert!(parse_payload(&json!({"route": ""})).is_ok());
        assert!(parse_payload(&json!({"route": "/api"})).is_ok());
        assert!(parse_payload(&json!({"route": "api"})).is_err());
    }

    #[test]
    fn create_requires_server() {
        assert_eq!(
            parse_create_payload(&json!({"weight": 3})).unwrap_err(),
            ValidationError::MissingServer
        );
        assert!(parse_create_payload(&json!({"server": "10.0.0.1"})).is_ok());
    }
}
