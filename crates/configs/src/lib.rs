//! # configs
//!
//! Layered settings for the circlehub binary: built-in defaults, an
//! optional `config/default.toml`, then `CIRCLEHUB_*` environment
//! overrides (e.g. `CIRCLEHUB_SERVER__PORT=9000`). A `.env` file is
//! honored for local development.

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Page size used when a listing request doesn't specify one.
    pub default_page_size: usize,
}

impl Settings {
    pub fn load() -> Result<Self, SettingsError> {
        // Missing .env is fine; only load errors on a present file matter.
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "failed to read .env file");
            }
        }

        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("engine.default_page_size", 10)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("CIRCLEHUB").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_any_sources() {
        let settings = Settings::load().expect("defaults should always deserialize");
        assert_eq!(settings.engine.default_page_size, 10);
        assert!(!settings.server.host.is_empty());
    }
}
