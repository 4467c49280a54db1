//! CLI configuration: optional JSON file plus command-line arguments.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context as _};
use pipeline::HttpMethod;
use serde::Deserialize;
use transport::TransportConfig;

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV: &str = "NODEKIT_CONFIG";
/// Standard OTLP endpoint variable; overrides `otlp_endpoint` from the file.
pub const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Which [`pipeline::Node`] entry point drives the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// `make`, awaited on a Tokio runtime.
    #[default]
    Async,
    /// `process`, on a dedicated thread outside the runtime.
    Blocking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Settings loaded from the file named by [`CONFIG_ENV`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub transport: TransportConfig,
    pub mode: DispatchMode,
    pub log_format: LogFormat,
    /// Headers added to every request.
    pub headers: BTreeMap<String, String>,
    pub otlp_endpoint: Option<String>,
}

impl CliConfig {
    /// Loads the file named by [`CONFIG_ENV`], or defaults when unset, then
    /// applies environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Ok(endpoint) = std::env::var(OTLP_ENDPOINT_ENV) {
            if !endpoint.is_empty() {
                config.otlp_endpoint = Some(endpoint);
            }
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

// ---------------------------------------------------------------------------

/// Parsed command line: `nodekit <url> [--method <METHOD>] [--blocking]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub url: String,
    pub method: HttpMethod,
    pub blocking: bool,
}

impl Args {
    pub fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut url = None;
        let mut method = HttpMethod::Get;
        let mut blocking = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--blocking" => blocking = true,
                "--method" => {
                    let Some(token) = args.next() else {
                        bail!("--method requires a value");
                    };
                    method = HttpMethod::parse(&token)
                        .with_context(|| format!("unsupported method '{token}'"))?;
                }
                flag if flag.starts_with("--") => bail!("unknown flag '{flag}'"),
                _ if url.is_none() => url = Some(arg),
                _ => bail!("unexpected argument '{arg}'"),
            }
        }

        let Some(url) = url else {
            bail!("usage: nodekit <url> [--method <METHOD>] [--blocking]");
        };
        Ok(Self {
            url,
            method,
            blocking,
        })
    }
}
