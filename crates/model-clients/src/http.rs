use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::Handle;

/// Base URL of one inference server plus the client used to reach it.
#[derive(Clone, Debug)]
pub struct Endpoint {
    base: String,
    client: reqwest::Client,
    runtime: Handle,
}

impl Endpoint {
    /// Must be called inside a Tokio runtime; requests are driven on it.
    pub fn new(base: &str, timeout: Option<Duration>) -> Result<Self> {
        let runtime = Handle::try_current().context("model clients need a running Tokio runtime")?;
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            client: builder.build().context("building HTTP client")?,
            runtime,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// POST a JSON body and decode a JSON reply. Blocks the calling thread.
    pub(crate) fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, "model request");
        self.runtime.block_on(async {
            let resp = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .with_context(|| format!("POST {url}"))?;
            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                tracing::warn!(%url, %status, "model server error");
                return Err(anyhow!("POST {url} returned {status}: {}", text.trim()));
            }
            resp.json::<R>().await.with_context(|| format!("decoding reply from {url}"))
        })
    }
}
