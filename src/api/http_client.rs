use crate::api::error::FetchError;
use crate::config::ApiConfig;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

pub struct HttpClient {
    inner: reqwest::Client,
    base: Url,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .gzip(true);

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let base = Url::parse(config.base_url.trim_end_matches('/'))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::CannotBeABase(config.base_url.clone()));
        }

        Ok(Self {
            inner: builder.build()?,
            base,
        })
    }

    /// Base URL plus path segments, each segment percent-encoded.
    /// `endpoint(&["stocks", "BRK/B"])` → `{base}/stocks/BRK%2FB`
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| FetchError::CannotBeABase(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Single GET, no retry. Non-2xx and undecodable bodies are errors.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let resp = self.inner.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
