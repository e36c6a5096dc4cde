mod env_overrides;
mod loader;
#[cfg(test)]
pub(crate) mod test_env;
mod types;

pub use env_overrides::{API_KEY_ENV, API_KEY_FALLBACK_ENV};
pub use types::{Config, DialogConfig, HandoffConfig, ProviderConfig};
