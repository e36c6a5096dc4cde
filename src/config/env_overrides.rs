use super::Config;

/// Primary credential variable.
pub const API_KEY_ENV: &str = "AISELF_API_KEY";
/// Accepted for compatibility with deployments that already export the
/// service vendor's own variable name.
pub const API_KEY_FALLBACK_ENV: &str = "ZHIPU_API_KEY";
const MODEL_ENV: &str = "AISELF_MODEL";
const BASE_URL_ENV: &str = "AISELF_BASE_URL";
const TIMEOUT_ENV: &str = "AISELF_TIMEOUT_SECS";

#[cfg(test)]
pub(super) const OVERRIDE_VARS: [&str; 5] = [
    API_KEY_ENV,
    API_KEY_FALLBACK_ENV,
    MODEL_ENV,
    BASE_URL_ENV,
    TIMEOUT_ENV,
];

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV).or_else(|_| std::env::var(API_KEY_FALLBACK_ENV))
            && !key.trim().is_empty()
        {
            self.provider.api_key = Some(key.trim().to_string());
        }

        if let Ok(model) = std::env::var(MODEL_ENV)
            && !model.is_empty()
        {
            self.provider.model = model;
        }

        if let Ok(base_url) = std::env::var(BASE_URL_ENV)
            && !base_url.is_empty()
        {
            self.provider.base_url = base_url;
        }

        if let Ok(timeout_str) = std::env::var(TIMEOUT_ENV)
            && let Ok(timeout) = timeout_str.parse::<u64>()
        {
            self.provider.timeout_secs = timeout;
        }
    }
}
