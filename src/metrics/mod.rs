//! Card values derived from a price series.
//!
//! Everything here is pure: the controller calls [`derive_metrics`] after a
//! successful price fetch and stores the result next to the series.

use crate::models::{MoverEntry, Overview, PricePoint, Sentiment};

/// Placeholder "Top Movers" card. Not computed from market data.
pub const TOP_MOVERS: [MoverEntry; 3] = [
    MoverEntry { symbol: "AAPL", change: 2.34 },
    MoverEntry { symbol: "MSFT", change: -1.22 },
    MoverEntry { symbol: "GOOGL", change: 0.78 },
];

/// Last close, defaulting to 0 for an empty series.
pub fn last_close(points: &[PricePoint]) -> f64 {
    points.last().map(|p| p.close).unwrap_or(0.0)
}

/// Second-to-last close, defaulting to the last close when there is no prior point.
pub fn prev_close(points: &[PricePoint]) -> f64 {
    match points.len() {
        n if n >= 2 => points[n - 2].close,
        _ => last_close(points),
    }
}

pub fn classify(last: f64, prev: f64) -> Sentiment {
    if last > prev {
        Sentiment::Bullish
    } else if last < prev {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    }
}

/// Two fraction digits, sign kept.
pub fn fmt_price(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn derive_metrics(points: &[PricePoint]) -> (Overview, Sentiment) {
    let last = last_close(points);
    let prev = prev_close(points);

    let overview = Overview {
        last_price: fmt_price(last),
        change: fmt_price(last - prev),
    };

    (overview, classify(last, prev))
}
