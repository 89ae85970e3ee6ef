use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sources: SourcesConfig,
    pub cir: CirConfig,
    pub echa: EchaConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Lookup tables read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub ingredient_index_path: String,
    pub cross_reference_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CirConfig {
    /// Base for both the report-status page and resolved PDF links.
    pub base_url: String,
    /// Appended to `base_url`, followed directly by the ingredient identifier.
    pub report_status_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EchaConfig {
    pub dossier_base_url: String,
    pub dossier_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// No timeout unless set; the client's defaults apply.
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("TOXREF").separator("__"));

        config.build()?.try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            ingredient_index_path: "cirjs.json".to_string(),
            cross_reference_path: "invecchia.json".to_string(),
        }
    }
}

impl Default for CirConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cir-reports.cir-safety.org/".to_string(),
            report_status_path: "cir-ingredient-status-report/?id=".to_string(),
        }
    }
}

impl Default for EchaConfig {
    fn default() -> Self {
        Self {
            dossier_base_url: "https://echa.europa.eu/it/registration-dossier/-/registered-dossier/"
                .to_string(),
            dossier_suffix: "/7/1".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: concat!("toxref/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            sources: SourcesConfig::default(),
            cir: CirConfig::default(),
            echa: EchaConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
