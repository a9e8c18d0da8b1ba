//! Proxy configuration.
//!
//! Loaded from a TOML file by the binary and overridable from the command
//! line. The logging switches gate the observer only; forwarding always
//! happens for both directions.

use std::fmt;

use serde::Deserialize;

/// Runtime configuration for one proxy instance.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProxyConfig {
    /// TCP endpoint the proxy listens on
    pub listen_address: String,

    /// Upstream `host:port` dialled for each accepted connection
    pub remote_address: String,

    /// Render JSON for client-to-server packets
    pub log_client_packets: bool,

    /// Render JSON for server-to-client packets
    pub log_server_packets: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:8123".to_string(),
            remote_address: "127.0.0.1:8124".to_string(),
            log_client_packets: true,
            log_server_packets: true,
        }
    }
}

impl ProxyConfig {
    /// Check both endpoint fields are `host:port` with a valid port.
    ///
    /// The remote host may be a DNS name; resolution happens at dial time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAddress`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::check_endpoint("listen_address", &self.listen_address)?;
        Self::check_endpoint("remote_address", &self.remote_address)?;
        Ok(())
    }

    fn check_endpoint(field: &'static str, value: &str) -> Result<(), ConfigError> {
        let valid = value
            .rsplit_once(':')
            .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidAddress { field, value: value.to_string() })
        }
    }
}

/// Configuration validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An endpoint field is not `host:port`
    InvalidAddress {
        /// Which config field
        field: &'static str,
        /// The rejected value
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAddress { field, value } => {
                write!(f, "invalid {}: {:?} is not host:port", field, value)
            },
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ProxyConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.log_client_packets);
        assert!(config.log_server_packets);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            remote_address = "game.example.net:9000"
            log_server_packets = false
            "#,
        )
        .unwrap();

        assert_eq!(config.remote_address, "game.example.net:9000");
        assert!(!config.log_server_packets);
        assert_eq!(config.listen_address, ProxyConfig::default().listen_address);
        assert!(config.log_client_packets);
    }

    #[test]
    fn bad_addresses_are_rejected() {
        let mut config = ProxyConfig::default();
        config.listen_address = "no-port".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidAddress {
                field: "listen_address",
                value: "no-port".to_string(),
            })
        );

        config = ProxyConfig::default();
        config.remote_address = "host:99999".to_string();
        assert!(config.validate().is_err());

        config = ProxyConfig::default();
        config.remote_address = ":8123".to_string();
        assert!(config.validate().is_err());
    }
}
