use std::fmt;

use serde::{Deserialize, Serialize};

/// A currency-pair token such as `EURUSD`.
///
/// The core never interprets the token; it only guarantees it is non-empty
/// and carries no surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyPair(String);

impl CurrencyPair {
    /// Returns `None` for an empty or all-whitespace token.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One historical bar as written by the execution process.
///
/// `date` is kept verbatim: daily bars carry a date, intraday bars a date-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// The parsed contents of a query-result artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub pair: CurrencyPair,
    /// Bars in artifact order (date ascending).
    pub bars: Vec<Bar>,
}

impl PriceHistory {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<&str> {
        self.bars.first().map(|b| b.date.as_str())
    }

    pub fn last_date(&self) -> Option<&str> {
        self.bars.last().map(|b| b.date.as_str())
    }

    /// One-line summary for display, e.g. `EURUSD: 2 bars, 2023-01-01 .. 2023-01-02`.
    pub fn summary(&self) -> String {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => {
                format!("{}: {} bars, {first} .. {last}", self.pair, self.len())
            }
            _ => format!("{}: no bars", self.pair),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> Bar {
        Bar {
            date: date.to_string(),
            open: 1.05,
            high: 1.06,
            low: 1.04,
            close,
        }
    }

    #[test]
    fn currency_pair_rejects_blank() {
        assert!(CurrencyPair::new("").is_none());
        assert!(CurrencyPair::new("   ").is_none());
    }

    #[test]
    fn currency_pair_trims() {
        let pair = CurrencyPair::new("  EURUSD\n").unwrap();
        assert_eq!(pair.as_str(), "EURUSD");
        assert_eq!(pair.to_string(), "EURUSD");
    }

    #[test]
    fn currency_pair_serializes_as_plain_string() {
        let pair = CurrencyPair::new("GBPJPY").unwrap();
        assert_eq!(serde_json::to_string(&pair).unwrap(), "\"GBPJPY\"");
    }

    #[test]
    fn summary_spans_first_and_last_bar() {
        let history = PriceHistory {
            pair: CurrencyPair::new("EURUSD").unwrap(),
            bars: vec![bar("2023-01-01", 1.055), bar("2023-01-02", 1.057)],
        };
        assert_eq!(history.summary(), "EURUSD: 2 bars, 2023-01-01 .. 2023-01-02");
    }

    #[test]
    fn summary_of_empty_history() {
        let history = PriceHistory {
            pair: CurrencyPair::new("EURUSD").unwrap(),
            bars: vec![],
        };
        assert!(history.is_empty());
        assert_eq!(history.summary(), "EURUSD: no bars");
    }
}
