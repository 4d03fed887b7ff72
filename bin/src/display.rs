//! Display utilities and argument parsing for the barcache CLI.

use anyhow::{Context, Result, bail};
use barcache_lib::prelude::*;
use barcache_lib::{FetchReport, GapOutcome};
use chrono::{DateTime, NaiveDate};
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Output format for bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Tsv,
    Json,
    Ndjson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Tsv => Self::Tsv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
        }
    }
}

/// Parses a time argument: epoch seconds, RFC 3339, or `YYYY-MM-DD` (UTC midnight).
pub(crate) fn parse_time(s: &str) -> Result<i64> {
    let s = s.trim();
    if let Ok(epoch) = s.parse::<i64>() {
        return Ok(epoch);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp());
    }
    bail!("Invalid time: {s}. Use epoch seconds, RFC 3339 or YYYY-MM-DD")
}

/// Parses a non-empty query range from `--from`/`--to`.
pub(crate) fn parse_range(from: &str, to: &str) -> Result<TimeRange> {
    let from_t = parse_time(from)?;
    let to_t = parse_time(to)?;
    TimeRange::query(from_t, to_t).with_context(|| format!("Invalid range: {from} -> {to}"))
}

/// Parses `EXCHANGE:SYMBOL` and a timeframe into a bar set.
pub(crate) fn parse_bar_set(instrument: &str, timeframe: &str) -> Result<BarSet> {
    let instrument: InstrumentKey = instrument
        .parse()
        .with_context(|| format!("Invalid instrument: {instrument}"))?;
    let timeframe: Timeframe = timeframe
        .parse()
        .with_context(|| format!("Invalid timeframe: {timeframe}"))?;
    Ok(BarSet::new(instrument, timeframe))
}

/// Opens the file store at `path`, or at the default location.
pub(crate) fn open_store(path: Option<PathBuf>) -> Result<FileBarStore> {
    let path = path.unwrap_or_else(FileBarStore::default_path);
    FileBarStore::new(path.clone())
        .with_context(|| format!("Failed to open store at {}", path.display()))
}

/// Writes bars to `output`, or to stdout when no path is given.
pub(crate) fn write_bars(
    bars: &[Bar],
    output: Option<&Path>,
    format: Format,
    pretty: bool,
) -> Result<()> {
    let format = OutputFormat::from(format);
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            format.write_bars(bars, &mut writer, pretty)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout);
            format.write_bars(bars, &mut writer, pretty)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Renders one line per gap of a fetch report.
pub(crate) fn report_lines(report: &FetchReport) -> Vec<String> {
    report
        .gaps()
        .iter()
        .map(|gap| {
            let session = if gap.in_session { " (session)" } else { "" };
            let outcome = match &gap.outcome {
                GapOutcome::Persisted { stored, live: true } => {
                    format!("stored {stored} bars, live bar held back")
                }
                GapOutcome::Persisted { stored, live: false } => format!("stored {stored} bars"),
                GapOutcome::Failed { reason } => format!("FAILED: {reason}"),
            };
            format!("  {}{session}: {outcome}", gap.gap)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_parse_time_forms() {
        assert_eq!(parse_time("1704153600").unwrap(), 1_704_153_600);
        assert_eq!(parse_time("-60").unwrap(), -60);
        assert_eq!(parse_time("2024-01-02").unwrap(), 1_704_153_600);
        assert_eq!(parse_time("2024-01-02T00:00:00Z").unwrap(), 1_704_153_600);
        assert_eq!(parse_time("2024-01-02T01:00:00+01:00").unwrap(), 1_704_153_600);
        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn test_parse_range_rejects_empty() {
        assert!(parse_range("2024-01-02", "2024-01-02").is_err());
        assert!(parse_range("2024-01-03", "2024-01-02").is_err());
        assert_eq!(
            parse_range("0", "60").unwrap(),
            TimeRange::new(0, 60).unwrap()
        );
    }

    #[test]
    fn test_parse_bar_set() {
        let bar_set = parse_bar_set("globex:es", "5").unwrap();
        assert_eq!(bar_set.to_string(), "GLOBEX:ES m5");
        assert!(parse_bar_set("ES", "m5").is_err());
        assert!(parse_bar_set("GLOBEX:ES", "m7").is_err());
    }

    #[test]
    fn test_write_bars_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bars.csv");
        let bar = Bar::new(0, Decimal::ONE, Decimal::TWO, Decimal::ONE, Decimal::TWO, 3);

        write_bars(&[bar], Some(path.as_path()), Format::Csv, false).unwrap();

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "t,time,o,h,l,c,v\n0,1970-01-01T00:00:00Z,1,2,1,2,3\n");
    }
}
