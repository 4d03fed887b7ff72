//! Get command implementation.
//!
//! This module serves a bar range through the cache, fetching only the
//! missing parts from the origin, and writes the bars to a file or stdout.

use crate::display::{
    Format, open_store, parse_bar_set, parse_range, parse_time, report_lines, write_bars,
};
use anyhow::{Context, Result, bail};
use barcache_lib::prelude::*;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Arguments of the `get` command.
#[derive(Args, Debug)]
pub(crate) struct GetArgs {
    /// Instrument as EXCHANGE:SYMBOL (e.g., GLOBEX:ES)
    pub(crate) instrument: String,

    /// Bar timeframe (m1, m5, m15, m30, h1, d1, w1, mn1)
    pub(crate) timeframe: String,

    /// Range start (epoch seconds, RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub(crate) from: String,

    /// Range end, exclusive (epoch seconds, RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub(crate) to: String,

    /// Origin base URL; bars are requested from <origin>/bars
    #[arg(long)]
    pub(crate) origin: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub(crate) format: Format,

    /// Output file path. Defaults to stdout.
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub(crate) pretty: bool,

    /// Fail instead of returning partial results when a gap cannot be fetched
    #[arg(long)]
    pub(crate) strict: bool,

    /// Open of the instrument's current session
    #[arg(long, requires = "session_close")]
    pub(crate) session_open: Option<String>,

    /// Close of the instrument's current session
    #[arg(long, requires = "session_open")]
    pub(crate) session_close: Option<String>,

    /// Maximum gaps fetched concurrently
    #[arg(long, default_value = "4")]
    pub(crate) concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "60")]
    pub(crate) timeout: u64,

    /// Retries per request on server errors and transient failures
    #[arg(long, default_value = "5")]
    pub(crate) retries: u32,

    /// Overall time budget per gap in seconds. Defaults to enough for every retry.
    #[arg(long)]
    pub(crate) gap_timeout: Option<u64>,
}

impl GetArgs {
    /// Builds the origin and cache settings. The per-gap budget must outlast
    /// the origin's retries, otherwise they never run.
    fn fetch_configs(&self) -> (ClientConfig, CacheConfig) {
        let client = ClientConfig::default()
            .with_concurrency(self.concurrency)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_max_retries(self.retries);
        let gap_timeout = self
            .gap_timeout
            .map_or_else(|| client.retry_budget(), Duration::from_secs);
        let cache = CacheConfig::default()
            .with_concurrency(self.concurrency)
            .with_fetch_timeout(gap_timeout);
        (client, cache)
    }
}

/// Serve bars for a range, filling gaps from the origin.
pub(crate) async fn get(args: GetArgs, store: Option<PathBuf>, quiet: bool) -> Result<()> {
    let bar_set = parse_bar_set(&args.instrument, &args.timeframe)?;
    let requested = parse_range(&args.from, &args.to)?;
    let (client_config, cache_config) = args.fetch_configs();

    let store = open_store(store)?;
    let origin = HttpOrigin::new(&args.origin, client_config)
        .with_context(|| format!("Invalid origin: {}", args.origin))?;
    let oracle = session_oracle(
        &bar_set,
        args.session_open.as_deref(),
        args.session_close.as_deref(),
    )?;

    let cache =
        BarCache::new(Arc::new(store), Arc::new(origin), oracle).with_config(cache_config);

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {msg}",
        )?);
        pb.set_message(format!("{bar_set} {requested}"));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let response = cache
        .get_bars(&bar_set, requested)
        .await
        .with_context(|| format!("Failed to get bars for {bar_set}"))?;

    progress.finish_and_clear();

    if !quiet {
        let report = &response.report;
        eprintln!(
            "{bar_set}: {} bars, {} gap(s) fetched, {} stored, {} failed",
            response.bars.len(),
            report.fetch_count(),
            report.stored_count(),
            report.failures().count()
        );
        for line in report_lines(report) {
            eprintln!("{line}");
        }
    }

    let bars = if args.strict {
        response.into_strict()?
    } else {
        response.into_bars()
    };

    write_bars(&bars, args.output.as_deref(), args.format, args.pretty)?;

    if let Some(output) = args.output.as_ref().filter(|_| !quiet) {
        eprintln!("Output written to: {}", output.display());
    }

    Ok(())
}

/// Builds the session oracle from the optional `--session-open`/`--session-close` pair.
fn session_oracle(
    bar_set: &BarSet,
    open: Option<&str>,
    close: Option<&str>,
) -> Result<Arc<dyn SessionOracle>> {
    match (open, close) {
        (Some(open), Some(close)) => {
            let window = SessionWindow::new(parse_time(open)?, parse_time(close)?)
                .context("Invalid session window")?;
            Ok(Arc::new(StaticSessionOracle::with_windows([(
                bar_set.instrument.clone(),
                window,
            )])))
        }
        (None, None) => Ok(Arc::new(ClosedSessionOracle)),
        _ => bail!("--session-open and --session-close must be given together"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_oracle_from_flags() {
        let bar_set = parse_bar_set("GLOBEX:ES", "m5").unwrap();
        let range = TimeRange::new(1_000, 2_000).unwrap();

        // 2100-01-01, a session that is still current.
        let oracle = session_oracle(&bar_set, Some("0"), Some("4102444800")).unwrap();
        assert!(
            oracle
                .overlaps_open_session(&bar_set.instrument, range)
                .await
                .unwrap()
        );

        let closed = session_oracle(&bar_set, None, None).unwrap();
        assert!(
            !closed
                .overlaps_open_session(&bar_set.instrument, range)
                .await
                .unwrap()
        );

        assert!(session_oracle(&bar_set, Some("0"), None).is_err());
    }

    fn get_args(gap_timeout: Option<u64>) -> GetArgs {
        GetArgs {
            instrument: "GLOBEX:ES".to_string(),
            timeframe: "m5".to_string(),
            from: "0".to_string(),
            to: "60".to_string(),
            origin: "http://localhost:8080".to_string(),
            format: Format::Csv,
            output: None,
            pretty: false,
            strict: false,
            session_open: None,
            session_close: None,
            concurrency: 4,
            timeout: 60,
            retries: 5,
            gap_timeout,
        }
    }

    #[test]
    fn test_gap_budget_outlasts_retries() {
        let (client, cache) = get_args(None).fetch_configs();
        assert_eq!(client.timeout, Duration::from_secs(60));
        assert_eq!(client.max_retries, 5);
        assert_eq!(cache.fetch_timeout, client.retry_budget());
        assert!(cache.fetch_timeout > client.timeout * 6);

        let (_, cache) = get_args(Some(30)).fetch_configs();
        assert_eq!(cache.fetch_timeout, Duration::from_secs(30));
    }
}
