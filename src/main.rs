//! # stock-forecast
//!
//! Command-line host for the forecasting pipeline.

use chrono::NaiveDate;
use clap::Parser;
use dotenv::dotenv;
use log::{error, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use stock_forecast::prelude::*;

#[derive(Parser)]
#[command(name = "stock-forecast")]
#[command(about = "Stationarity test, seasonal decomposition and SARIMA forecast of daily stock prices", long_about = None)]
struct Cli {
    /// Ticker symbol (AAPL, MSFT, GOOGL, FB, TSLA, NVDA, ADBE, PYPL, INTC, CMCSA, NFLX, PEP)
    #[arg(short, long)]
    ticker: Ticker,

    /// First date of the range (YYYY-MM-DD, inclusive)
    #[arg(short, long)]
    start: NaiveDate,

    /// Last date of the range (YYYY-MM-DD, exclusive)
    #[arg(short, long)]
    end: NaiveDate,

    /// Price column to analyse
    #[arg(short, long, default_value = "Close")]
    column: String,

    /// Autoregressive order
    #[arg(short = 'p', long = "ar", default_value = "1")]
    p: usize,

    /// Differencing order
    #[arg(short = 'd', long = "diff", default_value = "1")]
    d: usize,

    /// Moving-average order
    #[arg(short = 'q', long = "ma", default_value = "1")]
    q: usize,

    /// Seasonal autoregressive order (defaults to --ar)
    #[arg(long)]
    seasonal_ar: Option<usize>,

    /// Seasonal differencing order (defaults to --diff)
    #[arg(long)]
    seasonal_diff: Option<usize>,

    /// Seasonal moving-average order (defaults to --ma)
    #[arg(long)]
    seasonal_ma: Option<usize>,

    /// Seasonal period of the SARIMA model
    #[arg(long, default_value = "12")]
    seasonal_period: usize,

    /// Period of the classical decomposition (defaults to FORECAST_DECOMPOSITION_PERIOD)
    #[arg(long)]
    decomposition_period: Option<usize>,

    /// Number of days to forecast
    #[arg(short = 'n', long, default_value = "10", allow_negative_numbers = true)]
    horizon: i64,

    /// Directory holding <TICKER>.csv price files
    #[arg(long, env = "FORECAST_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Write the full report as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Authenticated user name
    #[arg(long, env = "FORECAST_USER")]
    user: Option<String>,
}

impl Cli {
    fn params(&self) -> PipelineParams {
        let order = SarimaOrder::new(self.p, self.d, self.q);
        let mut params = PipelineParams::new(
            self.column.clone(),
            order,
            self.seasonal_period,
            self.horizon,
        );
        if self.seasonal_ar.is_some() || self.seasonal_diff.is_some() || self.seasonal_ma.is_some()
        {
            params = params.with_seasonal_order(
                self.seasonal_ar.unwrap_or(self.p),
                self.seasonal_diff.unwrap_or(self.d),
                self.seasonal_ma.unwrap_or(self.q),
            );
        }
        if let Some(period) = self.decomposition_period {
            params = params.with_decomposition_period(period);
        }
        params
    }

    fn auth(&self) -> AuthStatus {
        match &self.user {
            Some(user) if !user.trim().is_empty() => AuthStatus::authenticated(user.trim()),
            _ => AuthStatus::anonymous(),
        }
    }
}

fn analyze(cli: &Cli) -> Result<PipelineReport> {
    let config = PipelineConfig::from_env()?;
    let pipeline = TimeSeriesPipeline::new(config);
    let provider = CsvMarketData::new(&cli.data_dir);
    let mut session = Session::new(cli.auth(), provider, pipeline);

    let request = AnalysisRequest {
        ticker: cli.ticker,
        start: cli.start,
        end: cli.end,
        params: cli.params(),
    };
    session.analyze(&request).cloned()
}

fn print_report(ticker: Ticker, report: &PipelineReport) {
    let adf = &report.stationarity.adf;
    println!("{} {} ({} observations)", ticker, report.series.name(), report.series.len());
    println!();
    println!("Augmented Dickey-Fuller test");
    println!("  statistic      {:>10.4}", adf.statistic);
    println!("  p-value        {:>10.4}", adf.p_value);
    println!("  lags used      {:>10}", adf.used_lag);
    println!(
        "  critical (1%, 5%, 10%)  {:.4}, {:.4}, {:.4}",
        adf.critical_values.cv_1pct, adf.critical_values.cv_5pct, adf.critical_values.cv_10pct
    );
    println!(
        "  verdict        {} at {}",
        if report.stationarity.is_stationary {
            "stationary"
        } else {
            "non-stationary"
        },
        report.stationarity.significance
    );
    println!();

    let decomposition = &report.decomposition;
    println!(
        "Classical decomposition: {:?}, period {}, {} undefined trend points per edge",
        decomposition.model,
        decomposition.period,
        decomposition.edge_width()
    );
    println!();
    println!("{}", report.model);
    println!();

    println!("{:<12} {:>12} {:>12} {:>12}", "date", "forecast", "lower", "upper");
    let lower = report.forecast.lower().unwrap_or(&[]);
    let upper = report.forecast.upper().unwrap_or(&[]);
    for (i, point) in report.forecast.points().iter().enumerate() {
        let bound = |b: &[f64]| b.get(i).map(|v| format!("{:.4}", v)).unwrap_or_default();
        println!(
            "{:<12} {:>12.4} {:>12} {:>12}",
            point.date.to_string(),
            point.value,
            bound(lower),
            bound(upper)
        );
    }
}

fn write_json(path: &PathBuf, report: &PipelineReport) -> std::io::Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

fn main() {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    info!(
        "analysing {} {} from {} to {}",
        cli.ticker, cli.column, cli.start, cli.end
    );

    let report = match analyze(&cli) {
        Ok(report) => report,
        Err(e) => {
            error!("analysis failed: {}", e);
            eprintln!("error: {}", e);
            eprintln!("hint: {}", e.hint());
            process::exit(1);
        }
    };

    print_report(cli.ticker, &report);

    if let Some(path) = &cli.json {
        if let Err(e) = write_json(path, &report) {
            eprintln!("error: cannot write {}: {}", path.display(), e);
            process::exit(1);
        }
        info!("report written to {}", path.display());
    }
}
