use crate::error::{CldsyncError, Result};
use reqwest::Client;
use std::time::Duration;

/// Configuration for HTTP client with proper timeouts and user-friendly error handling
pub struct NetworkConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(300),
            user_agent: format!("cldsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Create a properly configured HTTP client with timeouts
pub fn create_http_client(config: &NetworkConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| CldsyncError::network(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a transport failure into a readable network error
pub fn classify_network_error(error: &reqwest::Error, url: &str) -> CldsyncError {
    let host = host_of(url);

    if error.is_timeout() {
        return CldsyncError::network(format!(
            "Request to '{}' timed out. The service might be unreachable or the upload too large for the configured timeout.",
            host
        ));
    }

    if error.is_connect() {
        if is_dns_resolution_error(error) {
            return CldsyncError::network(format!(
                "Unable to resolve host '{}'. Please check the endpoint configuration and your network.",
                host
            ));
        }

        if error
            .to_string()
            .to_lowercase()
            .contains("connection refused")
        {
            return CldsyncError::network(format!(
                "Connection to '{}' was refused. The service may be temporarily unavailable.",
                host
            ));
        }

        return CldsyncError::network(format!(
            "Failed to connect to '{}'. Please check your network connection.",
            host
        ));
    }

    if error.to_string().to_lowercase().contains("certificate") {
        return CldsyncError::network(format!(
            "TLS error when contacting '{}'. This may be due to certificate issues or network security policies.",
            host
        ));
    }

    CldsyncError::network(format!("Network error when contacting '{}': {}", host, error))
}

fn is_dns_resolution_error(error: &reqwest::Error) -> bool {
    let error_msg = error.to_string().to_lowercase();
    let dns_indicators = [
        "dns",
        "name resolution",
        "name or service not known",
        "nodename nor servname provided",
        "no such host",
        "could not resolve host",
    ];

    dns_indicators
        .iter()
        .any(|&indicator| error_msg.contains(indicator))
}

fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown-host".to_string())
}
