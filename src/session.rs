//! Per-user session state: authentication status and memoized results.
//!
//! The raw price table is cached per (ticker, start, end) and the pipeline
//! report per full request. Any change to the request discards the cached
//! report; a change of ticker or dates also discards the table.

use crate::core::PriceTable;
use crate::error::{ForecastError, Result};
use crate::market_data::{MarketDataProvider, Ticker};
use crate::pipeline::{ForecastHorizon, PipelineParams, PipelineReport, TimeSeriesPipeline};
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Answer of the external authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub username: Option<String>,
}

impl AuthStatus {
    pub fn authenticated(username: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            username: Some(username.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// One dashboard request: what to fetch and how to analyse it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub ticker: Ticker,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub params: PipelineParams,
}

type TableKey = (Ticker, NaiveDate, NaiveDate);

/// Explicit per-user context replacing whole-page recomputation.
pub struct Session<P: MarketDataProvider> {
    auth: AuthStatus,
    provider: P,
    pipeline: TimeSeriesPipeline,
    table: Option<(TableKey, PriceTable)>,
    report: Option<(AnalysisRequest, PipelineReport)>,
}

impl<P: MarketDataProvider> Session<P> {
    pub fn new(auth: AuthStatus, provider: P, pipeline: TimeSeriesPipeline) -> Self {
        Self {
            auth,
            provider,
            pipeline,
            table: None,
            report: None,
        }
    }

    pub fn auth(&self) -> &AuthStatus {
        &self.auth
    }

    /// Replace the authentication status. A different user starts from an
    /// empty cache.
    pub fn set_auth(&mut self, auth: AuthStatus) {
        if auth.username != self.auth.username || !auth.authenticated {
            self.invalidate();
        }
        self.auth = auth;
    }

    /// Drop every cached result.
    pub fn invalidate(&mut self) {
        self.table = None;
        self.report = None;
    }

    /// The cached report, if any.
    pub fn cached_report(&self) -> Option<&PipelineReport> {
        self.report.as_ref().map(|(_, report)| report)
    }

    fn require_auth(&self) -> Result<()> {
        if self.auth.authenticated {
            Ok(())
        } else {
            Err(ForecastError::Unauthenticated)
        }
    }

    fn ensure_table(&mut self, ticker: Ticker, start: NaiveDate, end: NaiveDate) -> Result<()> {
        let key = (ticker, start, end);
        if matches!(&self.table, Some((cached, _)) if *cached == key) {
            debug!("price table cache hit for {} {}..{}", ticker, start, end);
            return Ok(());
        }

        self.table = None;
        self.report = None;
        info!("fetching {} prices {}..{}", ticker, start, end);
        let table = self.provider.fetch(ticker, start, end)?;
        info!("received {} rows", table.len());
        self.table = Some((key, table));
        Ok(())
    }

    /// Raw price table for the ticker and date range.
    pub fn price_table(
        &mut self,
        ticker: Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<&PriceTable> {
        self.require_auth()?;
        self.ensure_table(ticker, start, end)?;
        self.table
            .as_ref()
            .map(|(_, table)| table)
            .ok_or(ForecastError::EmptyData)
    }

    /// Run the pipeline for `request`, reusing the cached report when the
    /// request is unchanged.
    pub fn analyze(&mut self, request: &AnalysisRequest) -> Result<&PipelineReport> {
        self.require_auth()?;
        ForecastHorizon::new(request.params.horizon, self.pipeline.config().max_horizon)?;

        let hit = matches!(&self.report, Some((cached, _)) if cached == request);
        if hit {
            debug!("report cache hit for {}", request.ticker);
        } else {
            self.report = None;
            self.ensure_table(request.ticker, request.start, request.end)?;
            let table = self
                .table
                .as_ref()
                .map(|(_, table)| table)
                .ok_or(ForecastError::EmptyData)?;
            let series = table.select(&request.params.column)?;
            let report = self.pipeline.run(&series, &request.params, request.end)?;
            self.report = Some((request.clone(), report));
        }

        self.cached_report().ok_or(ForecastError::EmptyData)
    }
}
