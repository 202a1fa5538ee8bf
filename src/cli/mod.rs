//! LUXE CLI Module
//!
//! Command-line interface for training, serving and one-off valuations.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data;
use crate::market::MarketStats;
use crate::server::{format_growth, ServerConfig};
use crate::training::{TrainerConfig, ValuationModel};
use crate::utils::{group_thousands, round_half_even};
use crate::valuation::{appraise, ValuationForm};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(251, 191, 36) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn money(value: i64) -> String {
    format!("${}", group_thousands(value))
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "luxe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "LUXE House AI: house valuation and market trends")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit the valuation model and write the artifact
    Train {
        /// Sales history CSV
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Output model artifact
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of trees
        #[arg(long, default_value = "100")]
        trees: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Start the valuation web server
    Serve {
        /// Sales history CSV used for market statistics
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Model artifact written by `luxe train`
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Server port
        #[arg(short, long)]
        port: Option<u16>,

        /// Server host
        #[arg(long)]
        host: Option<String>,
    },

    /// Value a single house from the terminal
    Predict {
        /// Model artifact
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Square footage
        #[arg(long)]
        area: String,

        /// Bedrooms, "6+" accepted
        #[arg(long, default_value = "3")]
        bedrooms: String,

        /// Bathrooms, "5+" accepted
        #[arg(long, default_value = "2")]
        bathrooms: String,

        #[arg(long, default_value = "2")]
        floors: String,

        #[arg(long, default_value = "2005")]
        year_built: String,

        /// Downtown, Suburban, Urban or Rural
        #[arg(long, default_value = "Suburban")]
        location: String,

        /// Poor, Fair, Good or Excellent
        #[arg(long, default_value = "Good")]
        condition: String,

        /// Yes or No
        #[arg(long, default_value = "Yes")]
        garage: String,
    },

    /// Print market statistics and the yearly price series
    Stats {
        /// Sales history CSV
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

fn or_default(path: Option<PathBuf>, default: String) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(default))
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(data_path: Option<PathBuf>, output: Option<PathBuf>, trees: usize, seed: u64) -> anyhow::Result<()> {
    let defaults = ServerConfig::default();
    let data_path = or_default(data_path, defaults.data_path);
    let output = or_default(output, defaults.model_path);

    section("Train");

    step_run("Loading data");
    let start = Instant::now();
    let df = data::load_dataset(&data_path)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));

    let config = TrainerConfig::new().with_n_estimators(trees).with_random_state(seed);

    step_run(&format!("Training random forest ({} trees)", trees.to_string().cyan()));
    let start = Instant::now();
    let model = ValuationModel::fit(&df, &config)?;
    step_done(&format!("{:?}", start.elapsed()));

    step_run(&format!("Saving → {}", output.display()));
    model.save(&output)?;
    step_done("");

    let metrics = model.metrics();
    println!();
    println!("  {:<16} {}", muted("R²"), format!("{:.4}", metrics.r2).white().bold());
    println!("  {:<16} {}", muted("MAE"), money(round_half_even(metrics.mae)).white());
    println!("  {:<16} {}", muted("RMSE"), money(round_half_even(metrics.rmse)).white());
    println!("  {:<16} {}", muted("Features"), metrics.n_features.to_string().white());

    section("Feature importance");
    for (name, importance) in model.feature_importances().iter().take(8) {
        let bar = "█".repeat((importance * 40.0).round() as usize);
        println!("  {:<22} {:>6.3} {}", muted(name), importance, accent(&bar));
    }
    println!();

    Ok(())
}

pub async fn cmd_serve(
    data_path: Option<PathBuf>,
    model_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    use crate::server::run_server;

    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: host.unwrap_or(defaults.host),
        port: port.unwrap_or(defaults.port),
        data_path: data_path.map(|p| p.display().to_string()).unwrap_or(defaults.data_path),
        model_path: model_path.map(|p| p.display().to_string()).unwrap_or(defaults.model_path),
    };

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "LUXE House AI".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Web UI ", &format!("http://{}:{}", config.host, config.port)));
    line_box(&kv("Model  ", &config.model_path));
    line_box(&kv("Data   ", &config.data_path));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config).await
}

pub fn cmd_predict(model_path: Option<PathBuf>, form: ValuationForm) -> anyhow::Result<()> {
    let model_path = or_default(model_path, ServerConfig::default().model_path);

    section("Predict");

    step_run("Loading model");
    let model = ValuationModel::load(&model_path)?;
    step_done(&format!("{} trees", model.forest().n_trees()));

    let valuation = appraise(&model, &form)?;

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", accent(&money(valuation.prediction)).bold()));
    line_box_empty();
    line_box_sep();
    line_box(&kv("Range  ", &format!("{} – {} (±12%)", money(valuation.lower), money(valuation.upper))));
    line_box(&kv("Rent   ", &format!("≈ {}/mo", money(valuation.rent))));
    line_box_bottom();
    println!();

    Ok(())
}

pub fn cmd_stats(data_path: Option<PathBuf>) -> anyhow::Result<()> {
    let data_path = or_default(data_path, ServerConfig::default().data_path);

    section("Market");
    let stats = load_stats(&data_path)?;

    println!("  {:<24} {}", muted("Average price"), money(round_half_even(stats.average_price)).white().bold());
    println!("  {:<24} {}", muted("Avg yearly growth"), format!("{}%", format_growth(stats.growth_pct)).white());
    println!("  {:<24} {}", muted("Market avg rent"), format!("{}/mo", money(stats.average_rent)).white());

    section("Average price by year");
    if stats.chart.is_empty() {
        println!("  {}", dim("no sales in the chart window"));
    }
    for point in &stats.chart {
        println!("  {:<8} {}", muted(&point.year.to_string()), money(round_half_even(point.price)));
    }
    println!();

    Ok(())
}

fn load_stats(path: &Path) -> anyhow::Result<MarketStats> {
    step_run("Loading data");
    let df = data::load_dataset(path)?;
    step_done(&format!("{} rows", df.height()));
    Ok(MarketStats::from_dataframe(&df)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_predict_defaults() {
        let cli = Cli::try_parse_from(["luxe", "predict", "--area", "3200"]).unwrap();
        match cli.command {
            Commands::Predict { area, bedrooms, bathrooms, location, garage, .. } => {
                assert_eq!(area, "3200");
                assert_eq!(bedrooms, "3");
                assert_eq!(bathrooms, "2");
                assert_eq!(location, "Suburban");
                assert_eq!(garage, "Yes");
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn test_train_flags() {
        let cli = Cli::try_parse_from(["luxe", "train", "--trees", "10", "--seed", "7", "-o", "m.bin"]).unwrap();
        match cli.command {
            Commands::Train { trees, seed, output, data } => {
                assert_eq!((trees, seed), (10, 7));
                assert_eq!(output, Some(PathBuf::from("m.bin")));
                assert!(data.is_none());
            }
            _ => panic!("expected train"),
        }
    }

    #[test]
    fn test_strip_ansi() {
        let s = format!("{}", "x".red());
        assert_eq!(strip_ansi(&s), "x");
    }
}
