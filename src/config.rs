use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://node-api-for-candidates.onrender.com";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub render_debounce: Duration,
    pub display_zone_label: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            render_debounce: Duration::from_millis(250),
            display_zone_label: "PT".to_string(),
            username: None,
            password: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("APPOINTMENTS_API_URL").unwrap_or(defaults.base_url),
            request_timeout: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            render_debounce: env::var("RENDER_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.render_debounce),
            display_zone_label: env::var("DISPLAY_ZONE_LABEL")
                .unwrap_or(defaults.display_zone_label),
            username: env::var("APP_USERNAME").ok().filter(|v| !v.is_empty()),
            password: env::var("APP_PASSWORD").ok().filter(|v| !v.is_empty()),
        }
    }
}
