use std::path::{Path, PathBuf};

use fxbridge_models::price_history::CurrencyPair;
use fxbridge_models::trade_order::{TradeAck, TradeAction, TradeOrder};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::artifacts;
use crate::codec;
use crate::error::BridgeError;

/// Writes trade orders for the execution process. Fire-and-forget.
#[derive(Debug, Clone)]
pub struct Submitter {
    path: PathBuf,
}

impl Submitter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the order over whatever order is already pending and echo it back.
    ///
    /// The returned ack is local: it does not mean the order was picked up.
    /// It echoes the order as written, so an amount rounded to f64 shows rounded.
    pub async fn submit_trade(
        &self,
        action: TradeAction,
        amount: Decimal,
        pair: CurrencyPair,
    ) -> Result<TradeAck, BridgeError> {
        let order = TradeOrder {
            action,
            amount,
            pair,
        };

        if artifacts::exists(&self.path).await? {
            warn!(path = %self.path.display(), "Overwriting unconsumed trade order");
        }

        let bytes = codec::encode_order(&order)?;
        let written = codec::decode_order(&bytes)?;
        if written.amount != order.amount {
            warn!(
                requested = %order.amount,
                written = %written.amount,
                "Trade amount rounded to fit the order format"
            );
        }
        artifacts::write(&self.path, &bytes).await?;

        let ack = TradeAck::for_order(&written);
        info!(
            action = %ack.action,
            amount = %ack.amount,
            pair = %ack.pair,
            "Trade order written"
        );
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pair(s: &str) -> CurrencyPair {
        CurrencyPair::new(s).unwrap()
    }

    #[tokio::test]
    async fn writes_full_order_and_echoes_it() {
        let dir = tempfile::tempdir().unwrap();
        let submitter = Submitter::new(dir.path().join("trade_order.json"));

        let ack = submitter
            .submit_trade(TradeAction::Buy, dec!(1000), pair("EURUSD"))
            .await
            .unwrap();
        assert_eq!(ack.to_string(), "buy 1000 EURUSD");

        let bytes = std::fs::read(submitter.path()).unwrap();
        let order = codec::decode_order(&bytes).unwrap();
        assert_eq!(
            order,
            TradeOrder {
                action: TradeAction::Buy,
                amount: dec!(1000),
                pair: pair("EURUSD"),
            }
        );
    }

    #[tokio::test]
    async fn second_order_replaces_unconsumed_first() {
        let dir = tempfile::tempdir().unwrap();
        let submitter = Submitter::new(dir.path().join("trade_order.json"));

        submitter
            .submit_trade(TradeAction::Buy, dec!(1000), pair("EURUSD"))
            .await
            .unwrap();
        submitter
            .submit_trade(TradeAction::Sell, dec!(5), pair("GBPUSD"))
            .await
            .unwrap();

        let bytes = std::fs::read(submitter.path()).unwrap();
        let order = codec::decode_order(&bytes).unwrap();
        assert_eq!(order.action, TradeAction::Sell);
        assert_eq!(order.amount, dec!(5));
        assert_eq!(order.pair, pair("GBPUSD"));
        assert!(!String::from_utf8_lossy(&bytes).contains("EURUSD"));
    }

    #[tokio::test]
    async fn amount_is_not_validated() {
        let dir = tempfile::tempdir().unwrap();
        let submitter = Submitter::new(dir.path().join("trade_order.json"));

        let ack = submitter
            .submit_trade(TradeAction::Sell, dec!(-2.5), pair("usdjpy"))
            .await
            .unwrap();
        assert_eq!(ack.to_string(), "sell -2.5 usdjpy");
    }

    #[tokio::test]
    async fn ack_matches_rounded_amount_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let submitter = Submitter::new(dir.path().join("trade_order.json"));
        let requested = dec!(12345678901234567.89);

        let ack = submitter
            .submit_trade(TradeAction::Buy, requested, pair("EURUSD"))
            .await
            .unwrap();

        let on_disk = codec::decode_order(&std::fs::read(submitter.path()).unwrap()).unwrap();
        assert_ne!(on_disk.amount, requested);
        assert_eq!(ack.amount, on_disk.amount);
        assert_eq!(ack.to_string(), format!("buy {} EURUSD", on_disk.amount));
    }

    #[tokio::test]
    async fn unwritable_location_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let submitter = Submitter::new(dir.path().join("no-such-dir").join("trade_order.json"));

        let err = submitter
            .submit_trade(TradeAction::Buy, dec!(1), pair("EURUSD"))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Io { .. }));
    }
}
