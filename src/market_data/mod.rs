//! Market-data access: the supported tickers and the provider interface.

mod csv_provider;

pub use csv_provider::CsvMarketData;

use crate::core::PriceTable;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticker symbols offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ticker {
    Aapl,
    Msft,
    Googl,
    Fb,
    Tsla,
    Nvda,
    Adbe,
    Pypl,
    Intc,
    Cmcsa,
    Nflx,
    Pep,
}

impl Ticker {
    /// Every supported ticker, in menu order.
    pub const ALL: [Ticker; 12] = [
        Ticker::Aapl,
        Ticker::Msft,
        Ticker::Googl,
        Ticker::Fb,
        Ticker::Tsla,
        Ticker::Nvda,
        Ticker::Adbe,
        Ticker::Pypl,
        Ticker::Intc,
        Ticker::Cmcsa,
        Ticker::Nflx,
        Ticker::Pep,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Ticker::Aapl => "AAPL",
            Ticker::Msft => "MSFT",
            Ticker::Googl => "GOOGL",
            Ticker::Fb => "FB",
            Ticker::Tsla => "TSLA",
            Ticker::Nvda => "NVDA",
            Ticker::Adbe => "ADBE",
            Ticker::Pypl => "PYPL",
            Ticker::Intc => "INTC",
            Ticker::Cmcsa => "CMCSA",
            Ticker::Nflx => "NFLX",
            Ticker::Pep => "PEP",
        }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Ticker {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Ticker::ALL
            .iter()
            .copied()
            .find(|t| t.symbol().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ForecastError::UnknownTicker(wanted.to_string()))
    }
}

/// Source of daily price tables.
///
/// `start` is inclusive and `end` exclusive. Implementations report
/// transport and parsing failures as [`ForecastError::UpstreamFetch`].
pub trait MarketDataProvider {
    fn fetch(&self, ticker: Ticker, start: NaiveDate, end: NaiveDate) -> Result<PriceTable>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for &P {
    fn fetch(&self, ticker: Ticker, start: NaiveDate, end: NaiveDate) -> Result<PriceTable> {
        (**self).fetch(ticker, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("aapl".parse::<Ticker>().unwrap(), Ticker::Aapl);
        assert_eq!(" GOOGL ".parse::<Ticker>().unwrap(), Ticker::Googl);
        assert_eq!("Pep".parse::<Ticker>().unwrap(), Ticker::Pep);
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        assert_eq!(
            "XYZ".parse::<Ticker>(),
            Err(ForecastError::UnknownTicker("XYZ".into()))
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for ticker in Ticker::ALL {
            assert_eq!(ticker.to_string().parse::<Ticker>().unwrap(), ticker);
        }
    }

    #[test]
    fn serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Ticker::Cmcsa).unwrap(), "\"CMCSA\"");
    }
}
