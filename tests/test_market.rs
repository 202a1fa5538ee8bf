//! Integration test: market statistics from the sales history

use luxe_house::data::load_dataset;
use luxe_house::market::{compound_growth_pct, MarketStats, CHART_START_YEAR};
use luxe_house::utils::round_to;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/houses.csv");

fn stats() -> MarketStats {
    MarketStats::from_dataframe(&load_dataset(FIXTURE).unwrap()).unwrap()
}

#[test]
fn test_chart_window_and_order() {
    let stats = stats();

    assert_eq!(stats.chart.len(), 19);
    assert!(stats.chart.iter().all(|p| p.year >= CHART_START_YEAR));
    assert!(stats.chart.windows(2).all(|w| w[0].year < w[1].year));
    assert_eq!(stats.chart.first().map(|p| p.year), Some(2005));
    assert_eq!(stats.chart.last().map(|p| p.year), Some(2023));
}

#[test]
fn test_growth_from_series_ends() {
    let stats = stats();

    let first = stats.chart[0];
    let last = stats.chart[stats.chart.len() - 1];
    assert_eq!(first.price, 416_060.0);
    assert_eq!(last.price, 822_260.0);

    let cagr = (last.price / first.price).powf(1.0 / (last.year - first.year) as f64) - 1.0;
    assert_eq!(stats.growth_pct, round_to(cagr * 100.0, 1));
    assert_eq!(stats.growth_pct, 3.9);
    assert_eq!(compound_growth_pct(&stats.chart), stats.growth_pct);
}

#[test]
fn test_average_price_and_rent() {
    let stats = stats();
    assert_eq!(stats.average_price, 492_590.0);
    assert_eq!(stats.average_rent, 2709);
    assert_eq!(stats.average_rent, (stats.average_price * 0.0055).round_ties_even() as i64);
}

#[test]
fn test_chart_json_carries_series() {
    let stats = stats();
    let chart = stats.chart_json();

    let xs = chart["data"][0]["x"].as_array().unwrap();
    assert_eq!(xs.len(), stats.chart.len());
    assert_eq!(xs[0], 2005);
    assert_eq!(chart["layout"]["title"]["text"], "Price Fluctuations (Past 20 Years)");
    assert_eq!(chart["data"][0]["line"]["color"], "#fbbf24");
}
