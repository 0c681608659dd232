//! Process configuration read from the environment.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/sample_network.json";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Errors reading the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// JSON snapshot the store is loaded from
    pub data_path: PathBuf,

    /// Address to listen on
    pub addr: SocketAddr,

    /// Fixed optimizer seed, for reproducible answers
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Read `FLIGHT_DATA`, `HOST`, `PORT` and `SEARCH_SEED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Unset and empty are the same.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let data_path = get("FLIGHT_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let host_value = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host_value
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| invalid("HOST", &host_value, e))?;

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|e| invalid("PORT", &value, e))?,
            None => DEFAULT_PORT,
        };

        let seed = get("SEARCH_SEED")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| invalid("SEARCH_SEED", &value, e))
            })
            .transpose()?;

        Ok(Self {
            data_path,
            addr: SocketAddr::new(host, port),
            seed,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(from_vars(&[]).unwrap(), ServerConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = from_vars(&[
            ("FLIGHT_DATA", "/srv/network.json"),
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("SEARCH_SEED", "42"),
        ])
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/srv/network.json"));
        assert_eq!(config.addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn empty_values_fall_back() {
        let config = from_vars(&[("PORT", ""), ("SEARCH_SEED", "  ")]).unwrap();
        assert_eq!(config.addr.port(), DEFAULT_PORT);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = from_vars(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

        let err = from_vars(&[("SEARCH_SEED", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SEARCH_SEED", .. }));

        let err = from_vars(&[("HOST", "localhost:80")]).unwrap_err();
        assert!(err.to_string().starts_with("invalid HOST"));
    }
}
