//! Web server configuration

use std::net::SocketAddr;

use anyhow::Context;

pub const ENV_ADDR: &str = "CALCULADORA_WEB_ADDR";
pub const ENV_HOST: &str = "CALCULADORA_WEB_HOST";
pub const ENV_PORT: &str = "CALCULADORA_WEB_PORT";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Web server configuration
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Address the HTTP listener binds to
    pub addr: SocketAddr,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
        }
    }
}

impl WebConfig {
    /// Load configuration from the process environment.
    ///
    /// `CALCULADORA_WEB_ADDR` wins when set; otherwise the address is built
    /// from `CALCULADORA_WEB_HOST` and `CALCULADORA_WEB_PORT`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key).and_then(|v| {
                let v = v.trim();
                if v.is_empty() { None } else { Some(v.to_string()) }
            })
        };

        if let Some(addr) = non_empty(ENV_ADDR) {
            let addr = addr
                .parse::<SocketAddr>()
                .with_context(|| format!("{ENV_ADDR} is not a valid socket address: {addr}"))?;
            return Ok(Self { addr });
        }

        let host = non_empty(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_empty(ENV_PORT) {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("{ENV_PORT} is not a valid port: {p}"))?,
            None => DEFAULT_PORT,
        };

        let addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .with_context(|| format!("{ENV_HOST} is not a valid IP address: {host}"))?;
        Ok(Self { addr })
    }
}
