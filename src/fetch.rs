use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Request, Response};

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads a raw report document from a local file path or an HTTP(S) URL.
#[tracing::instrument(fields(source = %source))]
pub async fn load_document(source: &str) -> Result<Vec<u8>> {
    if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await
    } else {
        std::fs::read(source).with_context(|| format!("reading '{source}'"))
    }
}
