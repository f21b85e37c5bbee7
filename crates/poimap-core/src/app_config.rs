#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub api_key: String,
    pub base_url: String,
    pub api_version: u32,
    pub page_size: u32,
    pub connect_timeout_secs: u64,
    pub camera_zoom: f32,
    pub location_min_interval_ms: u64,
    pub location_min_distance_m: f32,
}

impl AppConfig {
    /// Response bodies are only logged outside production.
    #[must_use]
    pub fn log_response_bodies(&self) -> bool {
        self.env == Environment::Development
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("page_size", &self.page_size)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("camera_zoom", &self.camera_zoom)
            .field("location_min_interval_ms", &self.location_min_interval_ms)
            .field("location_min_distance_m", &self.location_min_distance_m)
            .finish()
    }
}
