use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::price_history::CurrencyPair;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "buy",
            TradeAction::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(TradeAction::Buy),
            "sell" => Ok(TradeAction::Sell),
            other => Err(format!("unknown trade action '{other}' (expected buy or sell)")),
        }
    }
}

/// The record written to the trade-order artifact.
///
/// `amount` goes out as a JSON number so the execution process can read it
/// without decimal-string handling. That number is an f64, so amounts beyond
/// about 15 significant digits are rounded on the way out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeOrder {
    pub action: TradeAction,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub pair: CurrencyPair,
}

/// Local echo of a submitted order. Says nothing about execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeAck {
    pub action: TradeAction,
    pub amount: Decimal,
    pub pair: CurrencyPair,
    pub submitted_at: DateTime<Utc>,
}

impl TradeAck {
    pub fn for_order(order: &TradeOrder) -> Self {
        Self {
            action: order.action,
            amount: order.amount,
            pair: order.pair.clone(),
            submitted_at: Utc::now(),
        }
    }
}

impl fmt::Display for TradeAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.action, self.amount, self.pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(action: TradeAction, amount: Decimal) -> TradeOrder {
        TradeOrder {
            action,
            amount,
            pair: CurrencyPair::new("EURUSD").unwrap(),
        }
    }

    #[test]
    fn action_serialization() {
        assert_eq!(serde_json::to_string(&TradeAction::Buy).unwrap(), "\"buy\"");
        assert_eq!(serde_json::to_string(&TradeAction::Sell).unwrap(), "\"sell\"");
    }

    #[test]
    fn action_parses_case_insensitively() {
        assert_eq!("BUY".parse::<TradeAction>().unwrap(), TradeAction::Buy);
        assert_eq!(" sell ".parse::<TradeAction>().unwrap(), TradeAction::Sell);
        assert!("hold".parse::<TradeAction>().is_err());
    }

    #[test]
    fn order_amount_is_a_json_number() {
        let json = serde_json::to_value(order(TradeAction::Buy, dec!(1000))).unwrap();
        assert_eq!(json["action"], "buy");
        assert_eq!(json["amount"].as_f64(), Some(1000.0));
        assert_eq!(json["pair"], "EURUSD");
    }

    #[test]
    fn order_reads_back_from_json() {
        let parsed: TradeOrder =
            serde_json::from_str(r#"{"action":"sell","amount":250.5,"pair":"EURUSD"}"#).unwrap();
        assert_eq!(parsed, order(TradeAction::Sell, dec!(250.5)));
    }

    #[test]
    fn ack_display_echoes_fields() {
        let ack = TradeAck::for_order(&order(TradeAction::Buy, dec!(1000)));
        assert_eq!(ack.to_string(), "buy 1000 EURUSD");
    }
}
