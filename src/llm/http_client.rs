use reqwest::Client;
use std::time::Duration;

/// Shared HTTP client settings for the generative-text service.
///
/// No total timeout is set here: the transport enforces its own deadline
/// around the whole exchange so that it can report it distinctly.
pub fn build_service_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}
