//! Terminal render sinks. Read-only over the controller's state.

use crate::dashboard::{Dashboard, NewsState, PriceState};
use crate::models::{Sentiment, Symbol};
use crate::utils::{fit, fmt_signed};

const RULE: &str = "─────────────────────────────────────────────────────────────";
const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One full frame: sidebar, heading, chart, cards and news.
pub fn render_dashboard(dash: &Dashboard) -> String {
    let selected = dash.selection();
    let mut out = Vec::new();

    out.extend(render_sidebar(dash.companies(), selected, dash.companies_loading()));
    out.push(String::new());
    out.push(render_heading(selected));
    out.push(RULE.to_string());
    out.extend(render_chart(
        dash.prices(),
        dash.prices_loading(),
        selected.is_some(),
        dash.config().chart_width,
    ));
    out.push(RULE.to_string());
    out.extend(render_cards(dash.prices()));
    out.push(RULE.to_string());
    out.extend(render_news(dash.news(), dash.news_loading()));

    out.join("\n")
}

pub fn render_sidebar(companies: &[Symbol], selected: Option<&Symbol>, loading: bool) -> Vec<String> {
    let mut lines = vec!["COMPANIES".to_string()];
    if loading && companies.is_empty() {
        lines.push("  Loading...".to_string());
    }
    for sym in companies {
        let marker = if Some(sym) == selected { '▶' } else { ' ' };
        lines.push(format!(" {} {}", marker, sym));
    }
    lines
}

pub fn render_heading(selected: Option<&Symbol>) -> String {
    match selected {
        Some(sym) => format!("{} STOCK PRICE", sym),
        None => "SELECT A COMPANY".to_string(),
    }
}

pub fn render_chart(
    prices: Option<&PriceState>,
    loading: bool,
    has_selection: bool,
    width: usize,
) -> Vec<String> {
    if loading {
        return vec!["Loading|".to_string()];
    }
    if !has_selection {
        return Vec::new();
    }
    let Some(state) = prices.filter(|s| !s.series.is_empty()) else {
        return Vec::new();
    };

    let series = &state.series;
    let min = series.values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let first = series.labels.first().map(String::as_str).unwrap_or_default();
    let last = series.labels.last().map(String::as_str).unwrap_or_default();

    vec![
        format!("Close Price (USD) · {} points", series.len()),
        format!("max {:>10.2} ", max),
        format!("           {}", sparkline(&series.values, width)),
        format!("min {:>10.2} ", min),
        format!("           {} → {}", first, last),
        format!("           (as of {} UTC)", state.fetched_at.format("%H:%M:%S")),
    ]
}

/// Downsample `values` to at most `width` columns and scale them onto block
/// characters. A flat series renders mid-height.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let columns = values.len().min(width);
    let sampled: Vec<f64> = (0..columns)
        .map(|i| values[i * values.len() / columns])
        .collect();

    let min = sampled.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = (SPARKS.len() - 1) as f64;

    sampled
        .iter()
        .map(|v| {
            if span > 0.0 {
                SPARKS[((v - min) / span * top).round() as usize]
            } else {
                SPARKS[SPARKS.len() / 2]
            }
        })
        .collect()
}

pub fn render_cards(prices: Option<&PriceState>) -> Vec<String> {
    let mut overview = vec!["Overview".to_string()];
    match prices {
        Some(state) => {
            let arrow = if state.overview.is_up() { '▲' } else { '▼' };
            overview.push(format!("Last Price: ${}", state.overview.last_price));
            overview.push(format!("Change: {} {}", arrow, state.overview.change));
        }
        None => overview.push("Loading...".to_string()),
    }

    let sentiment = vec![
        "Sentiment".to_string(),
        sentiment_label(prices.map(|s| s.sentiment).unwrap_or_default()).to_string(),
    ];

    let mut movers = vec!["Top Movers".to_string()];
    for m in prices.map(|s| s.movers).unwrap_or_default() {
        movers.push(format!("{}: {}", m.symbol, fmt_signed(m.change)));
    }

    let rows = overview.len().max(sentiment.len()).max(movers.len());
    let cell = |col: &[String], i: usize| fit(col.get(i).map(String::as_str).unwrap_or_default(), 22);

    (0..rows)
        .map(|i| {
            format!("{} │ {} │ {}", cell(&overview[..], i), cell(&sentiment[..], i), cell(&movers[..], i))
                .trim_end()
                .to_string()
        })
        .collect()
}

pub fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Bullish => "📈 Bullish",
        Sentiment::Bearish => "📉 Bearish",
        Sentiment::Neutral => "➖ Neutral",
    }
}

pub fn render_news(news: Option<&NewsState>, loading: bool) -> Vec<String> {
    if loading {
        return vec!["Loading news...".to_string()];
    }
    let Some(state) = news else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    for item in &state.items {
        lines.push(format!("• {}", item.title));
        lines.push(format!("  Read more... {}", item.url));
    }
    if state.items.is_empty() {
        lines.push(format!("No headlines for {}", state.symbol));
    }
    if state.is_placeholder {
        lines.push("  (offline headlines)".to_string());
    }
    lines.push(format!("  (as of {} UTC)", state.fetched_at.format("%H:%M:%S")));
    lines
}
