use reqwest::Client;
use std::time::Duration;
use toxref_utils::{HttpConfig, ToxrefError, ToxrefResult};

/// Builds the shared outbound client. Without a configured timeout the
/// client's own defaults apply.
pub fn build_client(config: &HttpConfig) -> ToxrefResult<Client> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());
    if let Some(secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| ToxrefError::configuration(format!("Failed to create HTTP client: {}", e)))
}
