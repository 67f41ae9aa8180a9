//! Runtime configuration (spec §6 CLI + ambient configuration layer):
//! environment-overridable defaults, further overridable by CLI flags.

use clap::Parser;
use rust_decimal::Decimal;

/// CLI flags (spec §6: "No arguments → also echo log lines to stdout ...
/// Any argument → file log only"). Passing `--file-log-only` is the
/// idiomatic spelling of "any argument" for this crate; passing the other
/// overrides alone does not by itself suppress the stdout echo.
#[derive(Debug, Parser)]
#[command(name = "btcusd-mm", about = "Level-3 order book synchronizer and market maker for BTC-USD")]
pub struct Cli {
    /// Suppress the stdout echo and status line; log to file only.
    #[arg(long)]
    pub file_log_only: bool,

    /// Exchange product id.
    #[arg(long, env = "BTCUSD_MM_PRODUCT_ID")]
    pub product_id: Option<String>,

    /// Directory rotating log files are written to.
    #[arg(long, env = "BTCUSD_MM_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Number of frames to buffer before loading the snapshot (spec §4.3
    /// Phase A, §9 open question).
    #[arg(long, env = "BTCUSD_MM_WARMUP_MESSAGES")]
    pub warmup_messages: Option<usize>,

    /// REST API base URL.
    #[arg(long, env = "BTCUSD_MM_REST_BASE_URL")]
    pub rest_base_url: Option<String>,

    /// Websocket feed URL.
    #[arg(long, env = "BTCUSD_MM_WS_URL")]
    pub ws_url: Option<String>,
}

/// Resolved runtime configuration, defaults matching
/// `original_source/main.py`'s literals unless overridden by [`Cli`]/env
/// (spec §9).
#[derive(Debug, Clone)]
pub struct Config {
    /// Exchange product id, e.g. `"BTC-USD"`.
    pub product_id: String,
    /// REST API base URL.
    pub rest_base_url: String,
    /// Websocket feed URL.
    pub ws_url: String,
    /// Directory rotating log files are written to.
    pub log_dir: String,
    /// Number of frames buffered during warmup before the snapshot loads.
    pub warmup_messages: usize,
    /// Size posted for a normal (non-rebalancing) quote.
    pub normal_size: Decimal,
    /// Size posted while rebalancing inventory.
    pub rebalance_size: Decimal,
    /// Whether to echo log lines to stdout and print the status line.
    pub echo_stdout: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            product_id: "BTC-USD".to_string(),
            rest_base_url: "https://api.exchange.coinbase.com".to_string(),
            ws_url: "wss://ws-feed.exchange.coinbase.com".to_string(),
            log_dir: "./logs".to_string(),
            warmup_messages: 51,
            normal_size: Decimal::new(1, 2),
            rebalance_size: Decimal::new(10, 2),
            echo_stdout: true,
        }
    }
}

impl Config {
    /// Applies CLI/env overrides from `cli` on top of the defaults.
    pub fn from_cli(cli: Cli) -> Self {
        let mut config = Config::default();
        if let Some(product_id) = cli.product_id {
            config.product_id = product_id;
        }
        if let Some(log_dir) = cli.log_dir {
            config.log_dir = log_dir;
        }
        if let Some(warmup_messages) = cli.warmup_messages {
            config.warmup_messages = warmup_messages;
        }
        if let Some(rest_base_url) = cli.rest_base_url {
            config.rest_base_url = rest_base_url;
        }
        if let Some(ws_url) = cli.ws_url {
            config.ws_url = ws_url;
        }
        config.echo_stdout = !cli.file_log_only;
        config
    }
}
