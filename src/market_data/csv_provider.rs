//! Price tables read from Yahoo-style CSV exports.

use super::{MarketDataProvider, Ticker};
use crate::core::PriceTable;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use csv::Reader;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads `<dir>/<TICKER>.csv` files with a `Date` column followed by numeric
/// columns (`Open,High,Low,Close,Adj Close,Volume`).
#[derive(Debug, Clone)]
pub struct CsvMarketData {
    dir: PathBuf,
}

impl CsvMarketData {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, ticker: Ticker) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker.symbol()))
    }

    /// Parse CSV from any reader, keeping rows with `start <= date < end`.
    ///
    /// Rows where Yahoo reports `null` prices are skipped. `start == end`
    /// selects nothing and yields an empty table.
    pub fn parse<R: Read>(reader: R, start: NaiveDate, end: NaiveDate) -> Result<PriceTable> {
        if start > end {
            return Err(ForecastError::InvalidParameter(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        let mut rdr = Reader::from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| ForecastError::UpstreamFetch(format!("unreadable header: {}", e)))?
            .clone();

        let date_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("date"))
            .ok_or_else(|| ForecastError::UpstreamFetch("no 'Date' column in price data".into()))?;
        let value_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();

        let mut dates = Vec::new();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); value_columns.len()];
        let mut skipped = 0usize;

        for (row, record) in rdr.records().enumerate() {
            let line = row + 2;
            let record = record
                .map_err(|e| ForecastError::UpstreamFetch(format!("line {}: {}", line, e)))?;

            let raw_date = record.get(date_idx).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|e| {
                ForecastError::UpstreamFetch(format!("line {}: bad date '{}': {}", line, raw_date, e))
            })?;
            if date < start || date >= end {
                continue;
            }

            let fields: Vec<&str> = value_columns
                .iter()
                .map(|(i, _)| record.get(*i).unwrap_or("").trim())
                .collect();
            if fields.iter().any(|f| f.eq_ignore_ascii_case("null")) {
                skipped += 1;
                continue;
            }

            for ((field, (_, name)), column) in fields.iter().zip(&value_columns).zip(&mut columns) {
                let value: f64 = field.parse().map_err(|_| {
                    ForecastError::UpstreamFetch(format!(
                        "line {}: non-numeric {} value '{}'",
                        line, name, field
                    ))
                })?;
                column.push(value);
            }
            dates.push(date);
        }

        if skipped > 0 {
            warn!("skipped {} rows with null prices", skipped);
        }
        debug!("parsed {} rows between {} and {}", dates.len(), start, end);

        let named = value_columns
            .into_iter()
            .map(|(_, name)| name)
            .zip(columns)
            .collect();
        PriceTable::new(dates, named).map_err(|e| ForecastError::UpstreamFetch(e.to_string()))
    }
}

impl MarketDataProvider for CsvMarketData {
    fn fetch(&self, ticker: Ticker, start: NaiveDate, end: NaiveDate) -> Result<PriceTable> {
        let path = self.path_for(ticker);
        info!("loading {} prices from {}", ticker, path.display());
        let file = File::open(&path).map_err(|e| {
            ForecastError::UpstreamFetch(format!("cannot open {}: {}", path.display(), e))
        })?;
        Self::parse(BufReader::new(file), start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2023-01-03,130.28,130.90,124.17,125.07,124.54,112117500
2023-01-04,126.89,128.66,125.08,126.36,125.82,89113600
2023-01-05,127.13,127.77,124.76,125.02,124.49,80962700
2023-01-06,126.01,130.29,124.89,129.62,129.07,87754700
";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_all_columns() {
        let table =
            CsvMarketData::parse(SAMPLE.as_bytes(), date(2023, 1, 1), date(2023, 2, 1)).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.column_names(),
            vec!["Open", "High", "Low", "Close", "Adj Close", "Volume"]
        );
        assert_eq!(table.column("close").unwrap()[3], 129.62);
        assert_eq!(table.column("Adj Close").unwrap()[0], 124.54);
    }

    #[test]
    fn end_date_is_exclusive() {
        let table =
            CsvMarketData::parse(SAMPLE.as_bytes(), date(2023, 1, 4), date(2023, 1, 6)).unwrap();
        assert_eq!(table.dates(), &[date(2023, 1, 4), date(2023, 1, 5)]);
    }

    #[test]
    fn null_rows_are_skipped() {
        let data = "Date,Close\n2023-01-03,1.0\n2023-01-04,null\n2023-01-05,3.0\n";
        let table = CsvMarketData::parse(data.as_bytes(), date(2023, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(table.column("Close").unwrap(), &[1.0, 3.0]);
    }

    #[test]
    fn malformed_rows_are_upstream_errors() {
        let bad_number = "Date,Close\n2023-01-03,abc\n";
        assert!(matches!(
            CsvMarketData::parse(bad_number.as_bytes(), date(2023, 1, 1), date(2024, 1, 1)),
            Err(ForecastError::UpstreamFetch(msg)) if msg.contains("line 2")
        ));

        let bad_date = "Date,Close\n03/01/2023,1.0\n";
        assert!(matches!(
            CsvMarketData::parse(bad_date.as_bytes(), date(2023, 1, 1), date(2024, 1, 1)),
            Err(ForecastError::UpstreamFetch(_))
        ));

        let no_date = "Day,Close\n2023-01-03,1.0\n";
        assert!(matches!(
            CsvMarketData::parse(no_date.as_bytes(), date(2023, 1, 1), date(2024, 1, 1)),
            Err(ForecastError::UpstreamFetch(_))
        ));
    }

    #[test]
    fn unordered_dates_are_upstream_errors() {
        let data = "Date,Close\n2023-01-05,1.0\n2023-01-04,2.0\n";
        assert!(matches!(
            CsvMarketData::parse(data.as_bytes(), date(2023, 1, 1), date(2024, 1, 1)),
            Err(ForecastError::UpstreamFetch(_))
        ));
    }

    #[test]
    fn empty_range_gives_empty_table() {
        let day = date(2023, 1, 4);
        let table = CsvMarketData::parse(SAMPLE.as_bytes(), day, day).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_names().len(), 6);
        assert_eq!(table.select("Close"), Err(ForecastError::EmptyData));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            CsvMarketData::parse(SAMPLE.as_bytes(), date(2023, 2, 1), date(2023, 1, 1)),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn missing_file_is_upstream_error() {
        let provider = CsvMarketData::new("/nonexistent/prices");
        assert!(matches!(
            provider.fetch(Ticker::Aapl, date(2023, 1, 1), date(2023, 2, 1)),
            Err(ForecastError::UpstreamFetch(_))
        ));
    }
}
