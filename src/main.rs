use std::sync::Arc;

use clap::Parser;
use tracing::info;

use btcusd_mm::config::{Cli, Config};
use btcusd_mm::exchange::{NullSigner, ReqwestExchange, RestEndpoints, TungsteniteFeed};
use btcusd_mm::supervisor::Supervisor;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(cli);

    let _logging_guard = btcusd_mm::logging::init(&config.log_dir, config.echo_stdout);
    info!(product_id = %config.product_id, "starting");

    let rest = ReqwestExchange::new(
        RestEndpoints {
            base_url: config.rest_base_url.clone(),
            product_id: config.product_id.clone(),
        },
        Arc::new(NullSigner),
    );

    let ws_url = config.ws_url.clone();
    let supervisor = Supervisor::new(
        move || TungsteniteFeed::new(ws_url.clone()),
        rest,
        config.product_id.clone(),
        config.warmup_messages,
        config.echo_stdout,
        config.normal_size,
        config.rebalance_size,
    );

    supervisor.run().await;
}
