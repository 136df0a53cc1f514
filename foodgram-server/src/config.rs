use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Load the configuration from a YAML file.
    pub fn load(yml_path: &str) -> anyhow::Result<Self> {
        let yml = std::fs::read_to_string(yml_path)?;
        Self::parse(&yml)
    }

    pub fn parse(yml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yml)?;
        Ok(config)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub tls: Option<TLSConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TLSConfig {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the daily rolling access log. Logs go to stdout when unset.
    pub directory: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    /// Page size used when a request does not pass `limit`.
    pub page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { page_size: 6 }
    }
}
