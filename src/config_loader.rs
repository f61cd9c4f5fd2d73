use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub listen_addr: String,
    pub database_path: String,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// The single origin allowed to call the API (the local dev frontend).
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
    #[serde(default = "default_allow_credentials")]
    pub allow_credentials: bool,
}

fn default_allowed_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_allow_credentials() -> bool {
    true
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            allowed_origin: default_allowed_origin(),
            allow_credentials: default_allow_credentials(),
        }
    }
}

pub fn load_config() -> Result<ApiConfig, figment::Error> {
    let figment = Figment::from(Serialized::defaults(ApiConfig {
        listen_addr: "127.0.0.1:8000".into(),
        database_path: "mcpclick_traces.db".into(),
        cors: CorsConfig::default(),
    }))
    .merge(Toml::file("mcpclick.toml"))
    .merge(Env::prefixed("MCPCLICK_"));

    let config: ApiConfig = figment.extract()?;

    if config.database_path.trim().is_empty() {
        return Err(figment::Error::from(
            "database_path must be set".to_string(),
        ));
    }

    Ok(config)
}
