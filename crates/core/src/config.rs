use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Diagonal regularization added before matrix inversion.
    pub ridge: f64,
    /// Maximum asset count accepted by the web layer. Inversion is O(n³);
    /// this bounds request cost upstream of the engine.
    pub max_assets: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ridge: crate::matrix::DEFAULT_RIDGE,
            max_assets: 64,
        }
    }
}
