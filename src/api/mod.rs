pub mod error;
pub mod http_client;

use crate::config::ApiConfig;
use crate::models::{NewsItem, PricePoint, Symbol};
use async_trait::async_trait;
use tracing::debug;

pub use self::error::FetchError;
use self::http_client::HttpClient;

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable dashboard backend.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_companies(&self) -> Result<Vec<Symbol>, FetchError>;
    async fn fetch_price_series(&self, symbol: &Symbol) -> Result<Vec<PricePoint>, FetchError>;
    async fn fetch_news(&self, symbol: &Symbol) -> Result<Vec<NewsItem>, FetchError>;
}

// ── HTTP backend ──────────────────────────────────────────────────────────────

/// `GET /companies`, `GET /stocks/{symbol}`, `GET /news/{symbol}`.
pub struct HttpDashboardApi {
    client: HttpClient,
}

impl HttpDashboardApi {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: HttpClient::new(config)?,
        })
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn fetch_companies(&self) -> Result<Vec<Symbol>, FetchError> {
        let url = self.client.endpoint(&["companies"])?;
        let symbols: Vec<Symbol> = self.client.get_json(url).await?;
        debug!("companies: {} symbols", symbols.len());
        Ok(symbols)
    }

    async fn fetch_price_series(&self, symbol: &Symbol) -> Result<Vec<PricePoint>, FetchError> {
        let url = self.client.endpoint(&["stocks", symbol.as_str()])?;
        let points: Vec<PricePoint> = self.client.get_json(url).await?;
        debug!("{}: {} price points", symbol, points.len());
        Ok(points)
    }

    async fn fetch_news(&self, symbol: &Symbol) -> Result<Vec<NewsItem>, FetchError> {
        let url = self.client.endpoint(&["news", symbol.as_str()])?;
        let items: Vec<NewsItem> = self.client.get_json(url).await?;
        debug!("{}: {} headlines", symbol, items.len());
        Ok(items)
    }
}
