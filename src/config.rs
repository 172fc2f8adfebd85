//! Server configuration read from the environment

use std::net::SocketAddr;

use crate::error::{PlannerError, Result};

/// Address the server binds when `PLANNER_ADDR` is unset
pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";

pub const ENV_USER: &str = "BASIC_AUTH_USER";
pub const ENV_PASS: &str = "BASIC_AUTH_PASS";
pub const ENV_ADDR: &str = "PLANNER_ADDR";

/// Username/password pair checked by the Basic gate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }

    /// Both halves empty; the gate then only admits an empty `:` pair
    pub fn is_unset(&self) -> bool {
        self.user.is_empty() && self.pass.is_empty()
    }
}

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub credentials: Credentials,
}

impl ServerConfig {
    /// Read `BASIC_AUTH_USER`, `BASIC_AUTH_PASS` and `PLANNER_ADDR`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(ENV_ADDR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = parse_addr(&raw_addr)?;
        let credentials = Credentials::new(
            lookup(ENV_USER).unwrap_or_default(),
            lookup(ENV_PASS).unwrap_or_default(),
        );
        if credentials.is_unset() {
            log::warn!("{ENV_USER} and {ENV_PASS} are unset; the planner is effectively unprotected");
        }
        Ok(Self { addr, credentials })
    }

    /// Same configuration bound to another address
    pub fn with_addr(self, addr: SocketAddr) -> Self {
        Self { addr, ..self }
    }
}

/// Parse a socket address, accepting a bare port as `0.0.0.0:<port>`
pub fn parse_addr(raw: &str) -> Result<SocketAddr> {
    let raw = raw.trim();
    if let Ok(port) = raw.parse::<u16>() {
        return Ok(SocketAddr::from(([0, 0, 0, 0], port)));
    }
    raw.parse()
        .map_err(|_| PlannerError::Config(format!("invalid listen address {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert!(config.credentials.is_unset());
    }

    #[test]
    fn test_reads_credentials_and_addr() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_USER, "adiva"),
            (ENV_PASS, "s3cret"),
            (ENV_ADDR, "127.0.0.1:3000"),
        ]))
        .unwrap();
        assert_eq!(config.credentials, Credentials::new("adiva", "s3cret"));
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn test_bare_port() {
        assert_eq!(parse_addr("9090").unwrap().port(), 9090);
    }

    #[test]
    fn test_bad_addr() {
        let err = ServerConfig::from_lookup(lookup(&[(ENV_ADDR, "nowhere")])).unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
    }
}
