//! Server configuration read from the environment

use checklist_core::{ConfigError, SmartsheetConfig};

pub const DEFAULT_PORT: u16 = 3001;

/// Local Vite dev server origins allowed by default
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:1420",
    "http://localhost:5173",
    "http://localhost:1421",
];

/// Which row store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Smartsheet,
    /// Process-local sheets, lost on exit
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smartsheet" => Ok(Self::Smartsheet),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::invalid(
                "CHECKLIST_STORE",
                format!("unknown backend '{}', expected 'smartsheet' or 'memory'", other),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub backend: StoreBackend,
    pub cors_origins: Vec<String>,
    /// Present when `backend` is `Smartsheet`
    pub smartsheet: Option<SmartsheetConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend: StoreBackend::default(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            smartsheet: None,
        }
    }
}

impl ServerConfig {
    /// Read `CHECKLIST_SERVER_PORT`, `CHECKLIST_STORE`, `CORS_ALLOW_ORIGIN`
    /// and, for the Smartsheet backend, the `SMARTSHEET_*` variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("CHECKLIST_SERVER_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("CHECKLIST_SERVER_PORT", "must be a port number"))?;
        }

        if let Some(backend) = lookup("CHECKLIST_STORE") {
            config.backend = backend.parse()?;
        }

        if let Some(origins) = lookup("CORS_ALLOW_ORIGIN") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }

        if config.backend == StoreBackend::Smartsheet {
            config.smartsheet = Some(SmartsheetConfig::from_lookup(&lookup)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::invalid("CHECKLIST_SERVER_PORT", "must be greater than 0"));
        }

        if self.cors_origins.is_empty() {
            return Err(ConfigError::invalid("CORS_ALLOW_ORIGIN", "at least one origin is required"));
        }
        for origin in &self.cors_origins {
            if origin.parse::<axum::http::HeaderValue>().is_err() {
                return Err(ConfigError::invalid(
                    "CORS_ALLOW_ORIGIN",
                    format!("'{}' is not a valid origin", origin),
                ));
            }
        }

        match (&self.backend, &self.smartsheet) {
            (StoreBackend::Smartsheet, None) => {
                Err(ConfigError::Missing("SMARTSHEET_ACCESS_TOKEN".to_string()))
            }
            (StoreBackend::Smartsheet, Some(smartsheet)) => smartsheet.validate(),
            (StoreBackend::Memory, _) => Ok(()),
        }
    }
}
