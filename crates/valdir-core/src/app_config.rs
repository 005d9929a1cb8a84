use std::net::SocketAddr;
use std::path::PathBuf;

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
    /// Base URL of the managed backend, e.g. `https://xyz.supabase.co`.
    pub backend_url: String,
    pub backend_api_key: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub locator_path: PathBuf,
    /// JSON file backing client-side durable storage for the CLI.
    pub storage_path: PathBuf,
    /// Public storefront URL used to build product share links.
    pub site_url: String,
    pub viacep_base_url: String,
    pub nominatim_base_url: String,
    /// Sent as `User-Agent` to the geocoder, which requires clients to identify themselves.
    pub geocoder_user_agent: String,
    /// `None` leaves request timeouts to the transport defaults.
    pub http_timeout_secs: Option<u64>,
    /// Bearer tokens accepted by the server's admin routes.
    pub api_keys: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("backend_url", &self.backend_url)
            .field("backend_api_key", &"[redacted]")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("locator_path", &self.locator_path)
            .field("storage_path", &self.storage_path)
            .field("site_url", &self.site_url)
            .field("viacep_base_url", &self.viacep_base_url)
            .field("nominatim_base_url", &self.nominatim_base_url)
            .field("geocoder_user_agent", &self.geocoder_user_agent)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .finish()
    }
}
