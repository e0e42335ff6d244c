//! Process configuration from flags and environment.
//!
//! Both binaries load a `.env` file (if present) before parsing, so every
//! flag can also come from the environment.

use clap::Parser;

/// Backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "insighthub")]
#[command(about = "Real-time analytics backend: REST ingest, reports, and live WebSocket fan-out")]
#[command(version)]
pub struct Config {
    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Store connection string (`memory://` or `sled://<path>`)
    #[arg(long, env = "INSIGHTHUB_STORE_URL", default_value = "memory://")]
    pub store_url: String,

    /// Browser origin allowed to call the API
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            store_url: "memory://".into(),
            cors_origin: "http://localhost:3000".into(),
        }
    }
}

impl Config {
    /// Load `.env`, then parse flags with environment fallbacks.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Dashboard client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "insighthub-dashboard")]
#[command(about = "Terminal dashboard for an InsightHub server")]
#[command(version)]
pub struct DashboardConfig {
    /// Base URL of the server
    #[arg(long, env = "INSIGHTHUB_SERVER", default_value = "http://localhost:5000")]
    pub server: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server: "http://localhost:5000".into(),
        }
    }
}

impl DashboardConfig {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    /// REST base URL without a trailing slash.
    pub fn api_base(&self) -> String {
        self.server.trim_end_matches('/').to_string()
    }

    /// WebSocket endpoint derived from the server URL.
    pub fn ws_url(&self) -> String {
        let base = self.api_base();
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base
        };
        format!("{base}/ws")
    }
}
