use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::USER_AGENT;
use crate::error::{Error, Result};

/// Builds the HTTP client used for the single request of a run.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(Error::HttpClient)
}

/// GETs `url` and returns the body as text. Non-2xx statuses are errors.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    info!("fetching {}", url);
    let wrap = |source| Error::Fetch {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(wrap)?;
    debug!(status = %response.status(), "response received");

    let body = response.text().await.map_err(wrap)?;
    debug!(bytes = body.len(), "body read");
    Ok(body)
}
