//! Dashboard controller: owns the registry, the selection and both loaders.
//!
//! ## Event flow
//!
//!   1. `load_companies()` spawns the one-off registry fetch.
//!   2. `select(symbol)` issues a fresh token on the price and news loaders
//!      and spawns one fetch task for each. Reselecting the same symbol does
//!      the same; selection is an event.
//!   3. Fetch tasks never touch state. They post a [`LoadEvent`] on the
//!      controller's channel and `apply()` commits it, or drops it if the
//!      token has been superseded.
//!
//! All mutation happens in `apply()`, so no field ever has two writers.

pub mod loader;
pub mod state;

use crate::api::{DashboardApi, FetchError};
use crate::config::DashboardConfig;
use crate::models::{NewsItem, PricePoint, Symbol};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use self::loader::{Loader, RequestToken};
pub use self::state::{NewsState, PriceState, SymbolRegistry};

/// Completion of one fetch, posted back to the controller.
#[derive(Debug)]
pub enum LoadEvent {
    Companies(Result<Vec<Symbol>, FetchError>),
    Prices {
        token: RequestToken,
        symbol: Symbol,
        result: Result<Vec<PricePoint>, FetchError>,
    },
    News {
        token: RequestToken,
        symbol: Symbol,
        result: Result<Vec<NewsItem>, FetchError>,
    },
}

pub struct Dashboard {
    api: Arc<dyn DashboardApi>,
    config: DashboardConfig,
    registry: SymbolRegistry,
    registry_pending: bool,
    selection: Option<Symbol>,
    prices: Loader<PriceState>,
    news: Loader<NewsState>,
    events_tx: mpsc::UnboundedSender<LoadEvent>,
    events_rx: mpsc::UnboundedReceiver<LoadEvent>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn DashboardApi>, config: DashboardConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            config,
            registry: SymbolRegistry::default(),
            registry_pending: false,
            selection: None,
            prices: Loader::default(),
            news: Loader::default(),
            events_tx,
            events_rx,
        }
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    pub fn load_companies(&mut self) {
        if self.registry.is_loaded() || self.registry_pending {
            debug!("Company list already requested");
            return;
        }
        self.registry_pending = true;

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_companies().await;
            tx.send(LoadEvent::Companies(result)).ok();
        });
    }

    pub fn select(&mut self, symbol: impl Into<Symbol>) {
        let symbol = symbol.into();
        if self.registry.is_loaded() && !self.registry.contains(&symbol) {
            warn!("{} is not in the company list", symbol);
        }
        info!("Selected {}", symbol);
        self.selection = Some(symbol.clone());

        let abort = self.config.abort_stale_requests;

        let token = self.prices.issue(abort);
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let sym = symbol.clone();
        let handle = tokio::spawn(async move {
            let result = api.fetch_price_series(&sym).await;
            tx.send(LoadEvent::Prices { token, symbol: sym, result }).ok();
        });
        self.prices.track(handle.abort_handle());

        let token = self.news.issue(abort);
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        let handle = tokio::spawn(async move {
            let result = api.fetch_news(&symbol).await;
            tx.send(LoadEvent::News { token, symbol, result }).ok();
        });
        self.news.track(handle.abort_handle());
    }

    /// Reselect the current symbol, if any.
    pub fn refresh(&mut self) -> bool {
        match self.selection.clone() {
            Some(symbol) => {
                self.select(symbol);
                true
            }
            None => false,
        }
    }

    // ── Event handling ────────────────────────────────────────────────────────

    /// Waits for the next completed fetch.
    pub async fn next_event(&mut self) -> Option<LoadEvent> {
        self.events_rx.recv().await
    }

    /// Commit a completed fetch. Returns true if visible state changed.
    pub fn apply(&mut self, event: LoadEvent) -> bool {
        match event {
            LoadEvent::Companies(result) => {
                self.registry_pending = false;
                let symbols = match result {
                    Ok(symbols) => {
                        info!("{} companies available", symbols.len());
                        symbols
                    }
                    Err(e) => {
                        error!("Error fetching companies: {:#}", e);
                        Vec::new()
                    }
                };
                self.registry.populate(symbols);
                true
            }

            LoadEvent::Prices { token, symbol, result } => {
                if !self.prices.is_current(token) {
                    debug!("{}: discarding stale price response", symbol);
                    return false;
                }

                let points = result.and_then(|points| {
                    if points.is_empty() {
                        Err(FetchError::Empty(format!("no price history for {symbol}")))
                    } else {
                        Ok(points)
                    }
                });

                let state = match points {
                    Ok(points) => {
                        let state = PriceState::from_points(symbol, &points);
                        info!(
                            "{}: {} points, last {} ({}), {}",
                            state.symbol,
                            state.series.len(),
                            state.overview.last_price,
                            state.overview.change,
                            state.sentiment
                        );
                        Some(state)
                    }
                    Err(e) => {
                        warn!("{}: price fetch failed: {:#}", symbol, e);
                        None
                    }
                };
                self.prices.settle(token, state)
            }

            LoadEvent::News { token, symbol, result } => {
                if !self.news.is_current(token) {
                    debug!("{}: discarding stale news response", symbol);
                    return false;
                }

                let state = match result {
                    Ok(items) => {
                        debug!("{}: {} headlines", symbol, items.len());
                        NewsState::fetched(symbol, items)
                    }
                    Err(e) => {
                        warn!("{}: news fetch failed, using placeholder headlines: {:#}", symbol, e);
                        NewsState::placeholder(symbol, &self.config.placeholder_url)
                    }
                };
                self.news.settle(token, Some(state))
            }
        }
    }

    /// Drive events until nothing for the current selection is outstanding.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            match self.next_event().await {
                Some(event) => {
                    self.apply(event);
                }
                None => break,
            }
        }
    }

    // ── Read side for the render sinks ────────────────────────────────────────

    pub fn is_busy(&self) -> bool {
        self.registry_pending || self.prices.is_loading() || self.news.is_loading()
    }

    pub fn companies(&self) -> &[Symbol] {
        self.registry.symbols()
    }

    pub fn companies_loading(&self) -> bool {
        self.registry_pending
    }

    pub fn selection(&self) -> Option<&Symbol> {
        self.selection.as_ref()
    }

    pub fn prices(&self) -> Option<&PriceState> {
        self.prices.current()
    }

    pub fn prices_loading(&self) -> bool {
        self.prices.is_loading()
    }

    pub fn news(&self) -> Option<&NewsState> {
        self.news.current()
    }

    pub fn news_loading(&self) -> bool {
        self.news.is_loading()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedApi;
    use super::*;
    use crate::metrics::TOP_MOVERS;
    use crate::models::Sentiment;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn dashboard(api: &Arc<ScriptedApi>, abort_stale_requests: bool) -> Dashboard {
        let config = DashboardConfig {
            abort_stale_requests,
            ..DashboardConfig::default()
        };
        Dashboard::new(Arc::clone(api) as Arc<dyn DashboardApi>, config)
    }

    #[tokio::test]
    async fn test_companies_loaded_once() {
        let api = Arc::new(ScriptedApi::default().with_companies(&["AAPL", "MSFT"]));
        let mut dash = dashboard(&api, true);

        dash.load_companies();
        assert!(dash.companies_loading());
        dash.settle().await;

        assert!(!dash.companies_loading());
        assert_eq!(dash.companies(), &[Symbol::from("AAPL"), Symbol::from("MSFT")]);

        dash.load_companies();
        assert!(!dash.is_busy());
    }

    #[tokio::test]
    async fn test_companies_failure_leaves_list_empty() {
        let api = Arc::new(ScriptedApi::default());
        let mut dash = dashboard(&api, true);

        dash.load_companies();
        dash.settle().await;

        assert!(dash.companies().is_empty());
        assert!(!dash.companies_loading());
    }

    #[tokio::test]
    async fn test_select_loads_prices_and_news() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_prices("AAPL", &[190.0, 192.5, 191.25])
                .with_news("AAPL", &["Earnings beat", "New product line"]),
        );
        let mut dash = dashboard(&api, true);

        dash.select("AAPL");
        assert!(dash.prices_loading());
        assert!(dash.news_loading());
        dash.settle().await;

        assert!(!dash.prices_loading());
        assert!(!dash.news_loading());

        let prices = dash.prices().unwrap();
        assert_eq!(prices.symbol, Symbol::from("AAPL"));
        assert_eq!(prices.series.values, vec![190.0, 192.5, 191.25]);
        assert_eq!(prices.overview.last_price, "191.25");
        assert_eq!(prices.overview.change, "-1.25");
        assert_eq!(prices.sentiment, Sentiment::Bearish);
        assert_eq!(prices.movers, &TOP_MOVERS[..]);

        let news = dash.news().unwrap();
        assert!(!news.is_placeholder);
        assert_eq!(news.items.len(), 2);
        assert_eq!(news.items[0].title, "Earnings beat");
    }

    #[tokio::test]
    async fn test_failed_fetches_degrade() {
        let api = Arc::new(ScriptedApi::default());
        let mut dash = dashboard(&api, true);

        dash.select("XYZ");
        dash.settle().await;

        assert!(dash.prices().is_none());
        assert!(!dash.prices_loading());
        assert!(!dash.news_loading());

        let news = dash.news().unwrap();
        assert!(news.is_placeholder);
        assert_eq!(news.items.len(), 3);
        assert!(news.items.iter().all(|n| n.title.contains("XYZ") && n.url == "#"));
    }

    #[tokio::test]
    async fn test_empty_series_counts_as_failure() {
        let api = Arc::new(ScriptedApi::default().with_prices("AAPL", &[101.0, 102.0]).with_prices("EMPTY", &[]));
        let mut dash = dashboard(&api, true);

        dash.select("AAPL");
        dash.settle().await;
        assert!(dash.prices().is_some());

        dash.select("EMPTY");
        dash.settle().await;
        assert!(dash.prices().is_none());
    }

    #[tokio::test]
    async fn test_empty_news_is_passed_through() {
        let api = Arc::new(ScriptedApi::default().with_news("AAPL", &[]));
        let mut dash = dashboard(&api, true);

        dash.select("AAPL");
        dash.settle().await;

        let news = dash.news().unwrap();
        assert!(!news.is_placeholder);
        assert!(news.items.is_empty());
    }

    #[tokio::test]
    async fn test_late_response_for_old_selection_is_discarded() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_prices("AAA", &[1.0, 2.0])
                .with_prices("BBB", &[20.0, 10.0])
                .with_news("AAA", &["aaa headline"])
                .with_news("BBB", &["bbb headline"]),
        );
        let release_aaa = api.hold("prices", "AAA");
        let mut dash = dashboard(&api, false);

        dash.select("AAA");
        dash.select("BBB");
        dash.settle().await;

        assert_eq!(dash.prices().unwrap().symbol, Symbol::from("BBB"));
        assert_eq!(dash.prices().unwrap().sentiment, Sentiment::Bearish);

        release_aaa.send(()).unwrap();
        let late = tokio::time::timeout(Duration::from_secs(5), dash.next_event())
            .await
            .expect("held response never arrived")
            .unwrap();
        assert!(matches!(&late, LoadEvent::Prices { symbol, .. } if symbol.as_str() == "AAA"));
        assert!(!dash.apply(late));

        let prices = dash.prices().unwrap();
        assert_eq!(prices.symbol, Symbol::from("BBB"));
        assert_eq!(prices.overview.last_price, "10.00");
        assert_eq!(dash.news().unwrap().symbol, Symbol::from("BBB"));
        assert!(!dash.prices_loading());
    }

    #[tokio::test]
    async fn test_late_news_for_old_selection_is_discarded() {
        let api = Arc::new(
            ScriptedApi::default()
                .with_prices("AAA", &[1.0, 2.0])
                .with_prices("BBB", &[20.0, 10.0])
                .with_news("AAA", &["aaa headline"])
                .with_news("BBB", &["bbb headline"]),
        );
        let release_aaa = api.hold("news", "AAA");
        let mut dash = dashboard(&api, false);

        dash.select("AAA");
        dash.select("BBB");
        dash.settle().await;

        assert_eq!(dash.news().unwrap().symbol, Symbol::from("BBB"));
        assert!(!dash.news_loading());

        release_aaa.send(()).unwrap();
        let late = tokio::time::timeout(Duration::from_secs(5), dash.next_event())
            .await
            .expect("held response never arrived")
            .unwrap();
        assert!(matches!(&late, LoadEvent::News { symbol, .. } if symbol.as_str() == "AAA"));
        assert!(!dash.apply(late));

        let news = dash.news().unwrap();
        assert_eq!(news.symbol, Symbol::from("BBB"));
        assert_eq!(news.items[0].title, "bbb headline");
        assert!(!dash.news_loading());
        assert_eq!(dash.prices().unwrap().symbol, Symbol::from("BBB"));
    }

    #[tokio::test]
    async fn test_superseded_request_is_aborted() {
        let api = Arc::new(ScriptedApi::default().with_prices("AAA", &[1.0]).with_prices("BBB", &[2.0]));
        let release_aaa = api.hold("prices", "AAA");
        let mut dash = dashboard(&api, true);

        dash.select("AAA");
        tokio::task::yield_now().await;
        dash.select("BBB");
        dash.settle().await;
        assert_eq!(dash.prices().unwrap().symbol, Symbol::from("BBB"));

        release_aaa.send(()).ok();
        let nothing = tokio::time::timeout(Duration::from_millis(50), dash.next_event()).await;
        assert!(nothing.is_err());
        assert_eq!(dash.prices().unwrap().symbol, Symbol::from("BBB"));
    }

    #[tokio::test]
    async fn test_reselect_triggers_both_loaders() {
        let api = Arc::new(ScriptedApi::default().with_prices("AAPL", &[5.0, 6.0]).with_news("AAPL", &["x"]));
        let mut dash = dashboard(&api, true);

        dash.select("AAPL");
        dash.settle().await;

        dash.select("AAPL");
        assert!(dash.prices_loading());
        assert!(dash.news_loading());
        dash.settle().await;

        assert_eq!(api.price_calls.load(Ordering::SeqCst), 2);
        assert_eq!(api.news_calls.load(Ordering::SeqCst), 2);

        assert!(dash.refresh());
        dash.settle().await;
        assert_eq!(api.price_calls.load(Ordering::SeqCst), 3);
        assert_eq!(api.news_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_refresh_without_selection_is_noop() {
        let api = Arc::new(ScriptedApi::default());
        let mut dash = dashboard(&api, true);
        assert!(!dash.refresh());
        assert!(!dash.is_busy());
    }

    #[tokio::test]
    async fn test_previous_state_stays_visible_while_loading() {
        let api = Arc::new(ScriptedApi::default().with_prices("AAA", &[3.0, 4.0]).with_prices("BBB", &[1.0]));
        let mut dash = dashboard(&api, true);

        dash.select("AAA");
        dash.settle().await;

        let _hold = api.hold("prices", "BBB");
        dash.select("BBB");
        assert!(dash.prices_loading());
        assert_eq!(dash.prices().unwrap().symbol, Symbol::from("AAA"));
        assert_eq!(dash.selection(), Some(&Symbol::from("BBB")));
    }

    #[tokio::test]
    async fn test_movers_independent_of_symbol() {
        let api = Arc::new(ScriptedApi::default().with_prices("AAA", &[1.0, 9.0]).with_prices("BBB", &[9.0, 1.0]));
        let mut dash = dashboard(&api, true);

        dash.select("AAA");
        dash.settle().await;
        let first = dash.prices().unwrap().movers;

        dash.select("BBB");
        dash.settle().await;
        assert_eq!(dash.prices().unwrap().movers, first);
        assert_eq!(first, &TOP_MOVERS[..]);
    }
}
