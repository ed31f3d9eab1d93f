//! Gateway configuration.

use serde::{Deserialize, Serialize};

/// Default address authority.
pub const DEFAULT_AUTHORITY: &str = "com.example.stockroom";

/// Default collection path.
pub const DEFAULT_COLLECTION: &str = "inventories";

/// Configuration for the Gateway.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Authority part of every address.
    pub authority: String,
    /// Collection path segment of every address.
    pub collection: String,
    /// Buffered change notifications per async subscriber before it lags.
    pub notification_capacity: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            notification_capacity: 64,
        }
    }
}

impl GatewayConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GatewayConfig::from_json(r#"{ "authority": "shop.local" }"#).unwrap();
        assert_eq!(config.authority, "shop.local");
        assert_eq!(config.collection, DEFAULT_COLLECTION);
        assert_eq!(config.notification_capacity, 64);
    }

    #[test]
    fn test_builder() {
        let config = GatewayConfig::default().with_collection("parts");
        assert_eq!(config.collection, "parts");
        assert_eq!(config.authority, DEFAULT_AUTHORITY);
    }
}
