//! Upstream record and admin payload types.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_WEIGHT: u32 = 1;

/// Scheme used to reach a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// A single backend server definition.
///
/// `endpoint` is derived from the other address fields and rebuilt whenever
/// one of them changes; it is never accepted from the outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamRecord {
    pub id: u64,
    pub scheme: Scheme,
    pub server: String,
    pub port: u16,
    pub route: String,
    pub weight: u32,
    pub down: bool,
    pub endpoint: String,
}

impl UpstreamRecord {
    /// Build a record from a validated payload, applying field defaults.
    pub fn from_payload(id: u64, payload: &UpstreamPayload) -> Self {
        let mut record = Self {
            id,
            scheme: payload.scheme.unwrap_or_default(),
            server: payload.server.clone().unwrap_or_default(),
            port: payload.port.unwrap_or(DEFAULT_PORT),
            route: payload.route.clone().unwrap_or_default(),
            weight: payload.weight.unwrap_or(DEFAULT_WEIGHT),
            down: payload.down.unwrap_or(false),
            endpoint: String::new(),
        };
        record.rebuild_endpoint();
        record
    }

    /// Shallow-merge provided fields over this record; absent fields keep
    /// their current values.
    pub fn merge(&mut self, payload: &UpstreamPayload) {
        if let Some(scheme) = payload.scheme {
            self.scheme = scheme;
        }
        if let Some(server) = &payload.server {
            self.server = server.clone();
        }
        if let Some(port) = payload.port {
            self.port = port;
        }
        if let Some(route) = &payload.route {
            self.route = route.clone();
        }
        if let Some(weight) = payload.weight {
            self.weight = weight;
        }
        if let Some(down) = payload.down {
            self.down = down;
        }
        self.rebuild_endpoint();
    }

    fn rebuild_endpoint(&mut self) {
        self.endpoint = format!(
            "{}://{}:{}{}",
            self.scheme, self.server, self.port, self.route
        );
    }
}

/// Partial upstream fields accepted by create, update, and the seed load.
///
/// Only [`crate::registry::validate`] produces these, so holding one implies
/// every present field passed its rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamPayload {
    pub server: Option<String>,
    pub scheme: Option<Scheme>,
    pub port: Option<u16>,
    pub weight: Option<u32>,
    pub down: Option<bool>,
    pub route: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied_on_create() {
        let payload = UpstreamPayload {
            server: Some("10.0.0.1".to_string()),
            ..Default::default()
        };
        let record = UpstreamRecord::from_payload(0, &payload);

        assert_eq!(record.scheme, Scheme::Http);
        assert_eq!(record.port, 80);
        assert_eq!(record.weight, 1);
        assert_eq!(record.route, "");
        assert!(!record.down);
        assert_eq!(record.endpoint, "http://10.0.0.1:80");
    }

    #[test]
    fn endpoint_composes_all_fields() {
        let payload = UpstreamPayload {
            server: Some("backend.internal.example".to_string()),
            scheme: Some(Scheme::Https),
            port: Some(8443),
            route: Some("/api".to_string()),
            ..Default::default()
        };
        let record = UpstreamRecord::from_payload(7, &payload);
        assert_eq!(record.endpoint, "https://backend.internal.example:8443/api");
    }

    #[test]
    fn merge_keeps_unspecified_fields_and_recomputes_endpoint() {
        let mut record = UpstreamRecord::from_payload(
            1,
            &UpstreamPayload {
                server: Some("10.0.0.1".to_string()),
                weight: Some(5),
                ..Default::default()
            },
        );

        record.merge(&UpstreamPayload {
            port: Some(9000),
            ..Default::default()
        });

        assert_eq!(record.server, "10.0.0.1");
        assert_eq!(record.weight, 5);
        assert_eq!(record.port, 9000);
        assert_eq!(record.endpoint, "http://10.0.0.1:9000");
    }

    #[test]
    fn record_serializes_with_lowercase_scheme() {
        let record = UpstreamRecord::from_payload(
            0,
            &UpstreamPayload {
                server: Some("10.0.0.1".to_string()),
                scheme: Some(Scheme::Https),
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["scheme"], "https");
        assert_eq!(value["endpoint"], "https://10.0.0.1:80");
    }
}
