use serde::{Deserialize, Serialize};
use std::fmt;

// ── Symbol ────────────────────────────────────────────────────────────────────

/// Ticker identifier as served by `/companies`. Kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ── Price history ─────────────────────────────────────────────────────────────

/// One row of `/stocks/{symbol}`. Series arrive oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: String,
    pub close: f64,
}

/// Parallel label/value arrays fed to the chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn from_points(points: &[PricePoint]) -> Self {
        Self {
            labels: points.iter().map(|p| p.date.clone()).collect(),
            values: points.iter().map(|p| p.close).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

// ── News ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
}

// ── Derived cards ─────────────────────────────────────────────────────────────

/// Last price and change, both pre-formatted with two fraction digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub last_price: String,
    pub change: String,
}

impl Overview {
    /// Mirrors the card colouring: zero, including "-0.00", counts as an up move.
    pub fn is_up(&self) -> bool {
        self.change.parse::<f64>().map_or(true, |c| c >= 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sentiment {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Bullish => "bullish",
            Sentiment::Bearish => "bearish",
            Sentiment::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// Entry of the "Top Movers" card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoverEntry {
    pub symbol: &'static str,
    pub change: f64,
}
