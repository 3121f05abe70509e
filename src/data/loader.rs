use crate::data::bar::Bar;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    #[serde(default)]
    symbol: Option<String>,
}

//parses an rfc3339 timestamp or a plain yyyy-mm-dd date (taken as midnight utc)
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .context(format!("expected RFC 3339 or YYYY-MM-DD, got '{}'", raw))?;
    match date.and_hms_opt(0, 0, 0) {
        Some(dt) => Ok(dt.and_utc()),
        None => bail!("invalid date '{}'", raw),
    }
}

//loads bars from a csv file
//
//when `symbol` is given, rows carrying a different symbol column are skipped;
//rows without a symbol column are always kept
pub fn load_csv<P: AsRef<Path>>(path: P, symbol: Option<&str>) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        if let (Some(wanted), Some(found)) = (symbol, record.symbol.as_deref()) {
            if !wanted.eq_ignore_ascii_case(found) {
                continue;
            }
        }

        let timestamp = parse_timestamp(&record.timestamp).context(format!(
            "Failed to parse timestamp '{}' at line {}",
            record.timestamp,
            index + 2
        ))?;

        bars.push(Bar::new_unchecked(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    //sort by timestamp to ensure chronological order
    bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    Ok(bars)
}

//keeps bars whose calendar date falls within [start, end], either bound optional
pub fn filter_by_date_range(
    bars: &[Bar],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Bar> {
    bars.iter()
        .filter(|bar| {
            let date = bar.timestamp.date_naive();
            start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
        })
        .cloned()
        .collect()
}
