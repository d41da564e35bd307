use crate::metrics::{derive_metrics, TOP_MOVERS};
use crate::models::{ChartSeries, MoverEntry, NewsItem, Overview, PricePoint, Sentiment, Symbol};
use chrono::{DateTime, Utc};

// ── Registry ──────────────────────────────────────────────────────────────────

/// Selectable symbols. Filled once; later attempts are ignored.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    symbols: Vec<Symbol>,
    loaded: bool,
}

impl SymbolRegistry {
    /// Returns false if the registry was already populated.
    pub fn populate(&mut self, symbols: Vec<Symbol>) -> bool {
        if self.loaded {
            return false;
        }
        self.symbols = symbols;
        self.loaded = true;
        true
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

// ── Price slot ────────────────────────────────────────────────────────────────

/// Committed price history for one symbol, with its derived cards.
#[derive(Debug, Clone)]
pub struct PriceState {
    pub symbol: Symbol,
    pub series: ChartSeries,
    pub overview: Overview,
    pub sentiment: Sentiment,
    pub movers: &'static [MoverEntry],
    pub fetched_at: DateTime<Utc>,
}

impl PriceState {
    pub fn from_points(symbol: Symbol, points: &[PricePoint]) -> Self {
        let (overview, sentiment) = derive_metrics(points);
        Self {
            symbol,
            series: ChartSeries::from_points(points),
            overview,
            sentiment,
            movers: &TOP_MOVERS,
            fetched_at: Utc::now(),
        }
    }
}

// ── News slot ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewsState {
    pub symbol: Symbol,
    pub items: Vec<NewsItem>,
    /// True when `items` came from [`placeholder_news`].
    pub is_placeholder: bool,
    pub fetched_at: DateTime<Utc>,
}

impl NewsState {
    pub fn fetched(symbol: Symbol, items: Vec<NewsItem>) -> Self {
        Self {
            symbol,
            items,
            is_placeholder: false,
            fetched_at: Utc::now(),
        }
    }

    pub fn placeholder(symbol: Symbol, url: &str) -> Self {
        Self {
            items: placeholder_news(&symbol, url),
            symbol,
            is_placeholder: true,
            fetched_at: Utc::now(),
        }
    }
}

/// Offline headlines shown when the news endpoint fails.
pub fn placeholder_news(symbol: &Symbol, url: &str) -> Vec<NewsItem> {
    [
        format!("{symbol} hits new high today!"),
        format!("Market sentiment for {symbol} is positive"),
        format!("Analysts review {symbol} performance"),
    ]
    .into_iter()
    .map(|title| NewsItem {
        title,
        url: url.to_string(),
    })
    .collect()
}
