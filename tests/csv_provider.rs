//! CSV market data read from files on disk.

use chrono::{Duration, NaiveDate};
use std::fs;
use std::io::Write;
use stock_forecast::prelude::*;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Writes `<dir>/<symbol>.csv` with `days` weekday rows starting at `start`.
fn write_prices(dir: &TempDir, symbol: &str, start: NaiveDate, days: i64) {
    let mut file = fs::File::create(dir.path().join(format!("{}.csv", symbol))).unwrap();
    writeln!(file, "Date,Open,High,Low,Close,Adj Close,Volume").unwrap();
    for i in 0..days {
        let day = start + Duration::days(i);
        if matches!(day.format("%a").to_string().as_str(), "Sat" | "Sun") {
            continue;
        }
        let close = 100.0 + (i % 17) as f64 * 0.7 + i as f64 * 0.1;
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{}",
            day,
            close - 0.5,
            close + 1.0,
            close - 1.0,
            close,
            close * 0.99,
            1_000_000 + i * 10
        )
        .unwrap();
    }
}

#[test]
fn fetch_reads_ticker_file_within_range() {
    let dir = TempDir::new().unwrap();
    write_prices(&dir, "MSFT", date(2023, 1, 2), 60);
    let provider = CsvMarketData::new(dir.path());

    let table = provider
        .fetch(Ticker::Msft, date(2023, 1, 9), date(2023, 1, 16))
        .unwrap();

    // Monday 9th through Friday 13th; the 16th is excluded.
    assert_eq!(table.len(), 5);
    assert_eq!(table.dates()[0], date(2023, 1, 9));
    assert_eq!(table.dates()[4], date(2023, 1, 13));
    assert_eq!(table.column_names().len(), 6);

    let close = table.select("close").unwrap();
    assert_eq!(close.len(), 5);
    assert_eq!(close.first_date(), Some(date(2023, 1, 9)));
}

#[test]
fn missing_ticker_file_is_an_upstream_failure() {
    let dir = TempDir::new().unwrap();
    write_prices(&dir, "AAPL", date(2023, 1, 2), 30);
    let provider = CsvMarketData::new(dir.path());

    let err = provider
        .fetch(Ticker::Nflx, date(2023, 1, 2), date(2023, 2, 1))
        .unwrap_err();
    assert!(matches!(err, ForecastError::UpstreamFetch(_)));
}

#[test]
fn range_without_rows_yields_empty_data_on_select() {
    let dir = TempDir::new().unwrap();
    write_prices(&dir, "PEP", date(2023, 1, 2), 30);
    let provider = CsvMarketData::new(dir.path());

    let table = provider
        .fetch(Ticker::Pep, date(2024, 1, 1), date(2024, 2, 1))
        .unwrap();
    assert!(table.is_empty());
    assert_eq!(table.select("Close"), Err(ForecastError::EmptyData));
}

#[test]
fn unknown_column_lists_what_is_available() {
    let dir = TempDir::new().unwrap();
    write_prices(&dir, "TSLA", date(2023, 1, 2), 30);
    let provider = CsvMarketData::new(dir.path());
    let table = provider
        .fetch(Ticker::Tsla, date(2023, 1, 2), date(2023, 2, 1))
        .unwrap();

    match table.select("Dividends") {
        Err(ForecastError::UnknownColumn { column, available }) => {
            assert_eq!(column, "Dividends");
            assert!(available.contains("Adj Close"));
        }
        other => panic!("expected UnknownColumn, got {:?}", other),
    }
}

#[test]
fn full_analysis_from_files() {
    let dir = TempDir::new().unwrap();
    write_prices(&dir, "NVDA", date(2022, 1, 3), 400);
    let provider = CsvMarketData::new(dir.path());
    let mut session = Session::new(
        AuthStatus::authenticated("analyst"),
        provider,
        TimeSeriesPipeline::default(),
    );

    let request = AnalysisRequest {
        ticker: Ticker::Nvda,
        start: date(2022, 1, 3),
        end: date(2023, 1, 3),
        params: PipelineParams::new("Adj Close", SarimaOrder::new(1, 1, 1), 5, 7)
            .with_seasonal_order(0, 0, 0)
            .with_decomposition_period(5),
    };
    let report = session.analyze(&request).unwrap();

    assert_eq!(report.series.name(), "Adj Close");
    assert_eq!(report.series.len(), 261);
    assert_eq!(report.forecast.len(), 8);
    assert_eq!(report.forecast.first_date(), Some(date(2023, 1, 4)));
}
