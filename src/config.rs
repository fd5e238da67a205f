//! Gateway settings, read once at startup.

use std::env;

pub const DEFAULT_UPSTREAM_URL: &str = "https://openapi.nocodebackend.com";

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Base URL of the hosted data service, no trailing slash.
    pub upstream_url: String,
    /// Bearer credential for the data service. Absent means every proxied
    /// request answers with the config error instead of failing the boot.
    pub api_key: Option<String>,
    /// Instance name scoping every data-service call.
    pub instance: String,
    pub bind_addr: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        GatewayConfig {
            upstream_url: env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_owned()),
            api_key: env::var("UPSTREAM_API_KEY").ok().filter(|k| !k.is_empty()),
            instance: env::var("UPSTREAM_INSTANCE").expect("UPSTREAM_INSTANCE must be set."),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:4130".to_owned()),
        }
    }

    pub fn upstream_target(&self, endpoint: &str) -> String {
        format!("{}{}", self.upstream_url.trim_end_matches('/'), endpoint)
    }
}
