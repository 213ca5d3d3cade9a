//! Heroku Platform API client for the source-blob deploy protocol.

use anyhow::Context;
use serde::Deserialize;
use serde_json::json;

/// Production Platform API endpoint.
pub const HEROKU_API_BASE: &str = "https://api.heroku.com";

/// Platform API version pin, required on every API call.
const ACCEPT_HEROKU_V3: &str = "application/vnd.heroku+json; version=3";

/// A freshly allocated source slot: upload to `put_url`, reference the
/// upload via `get_url` when triggering the build.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceBlob {
    pub get_url: String,
    pub put_url: String,
}

#[derive(Debug, Deserialize)]
struct SourcesResponse {
    source_blob: SourceBlob,
}

/// Bearer-authenticated client for the three-call deploy sequence.
pub struct HerokuClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HerokuClient {
    /// Client against the production API.
    pub fn new(token: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_base_url(token, HEROKU_API_BASE)
    }

    /// Client against a custom API base URL (for testing).
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("skylift/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Allocate a new source slot for the app.
    pub async fn create_source(&self, app: &str) -> anyhow::Result<SourceBlob> {
        let url = format!("{}/apps/{}/sources", self.base_url, app);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, ACCEPT_HEROKU_V3)
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("Failed to request a source slot from {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to create source slot: HTTP {} from {}",
                response.status(),
                url
            );
        }

        let body: SourcesResponse = response
            .json()
            .await
            .context("Failed to parse source slot response")?;
        Ok(body.source_blob)
    }

    /// Upload the raw artifact bytes to a pre-signed `put_url`.
    ///
    /// The blob store accepts opaque bytes; the empty `Content-Type` keeps
    /// it from rejecting the pre-signed request, and no auth headers are
    /// sent since the URL itself carries the signature.
    pub async fn upload_artifact(&self, put_url: &str, artifact: Vec<u8>) -> anyhow::Result<()> {
        let response = self
            .http
            .put(put_url)
            .header(reqwest::header::CONTENT_TYPE, "")
            .body(artifact)
            .send()
            .await
            .context("Failed to upload artifact")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to upload artifact: HTTP {}", response.status());
        }
        Ok(())
    }

    /// Trigger a build from an uploaded source blob.
    pub async fn trigger_build(
        &self,
        app: &str,
        get_url: &str,
        version: Option<&str>,
    ) -> anyhow::Result<()> {
        let mut source_blob = json!({ "url": get_url });
        if let Some(version) = version {
            source_blob["version"] = json!(version);
        }

        let url = format!("{}/apps/{}/builds", self.base_url, app);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, ACCEPT_HEROKU_V3)
            .bearer_auth(&self.token)
            .json(&json!({ "source_blob": source_blob }))
            .send()
            .await
            .with_context(|| format!("Failed to trigger build at {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to trigger build: HTTP {} from {}",
                response.status(),
                url
            );
        }
        Ok(())
    }
}
