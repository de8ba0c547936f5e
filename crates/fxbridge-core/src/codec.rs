//! Encoding of artifact contents.
//!
//! The query result is CSV with a header row. Only `date,open,high,low,close`
//! are required; extra columns such as `volume` or a leading index are ignored.
//! Trade orders are JSON objects.

use fxbridge_models::price_history::{Bar, CurrencyPair, PriceHistory};
use fxbridge_models::trade_order::TradeOrder;

use crate::error::BridgeError;

pub const REQUIRED_COLUMNS: [&str; 5] = ["date", "open", "high", "low", "close"];

/// Parse a query-result artifact into a `PriceHistory` for `pair`.
pub fn parse_history(pair: CurrencyPair, bytes: &[u8]) -> Result<PriceHistory, BridgeError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| BridgeError::Parse(format!("unreadable header: {e}")))?
        .clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(BridgeError::Parse(format!("missing column '{missing}'")));
    }

    let bars = reader
        .deserialize::<Bar>()
        .enumerate()
        .map(|(i, row)| row.map_err(|e| BridgeError::Parse(format!("row {}: {e}", i + 1))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PriceHistory { pair, bars })
}

/// Render bars in the query-result format, header included.
pub fn encode_history(bars: &[Bar]) -> Result<Vec<u8>, BridgeError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if bars.is_empty() {
        writer.write_record(REQUIRED_COLUMNS)?;
    }
    for bar in bars {
        writer.serialize(bar)?;
    }
    writer
        .into_inner()
        .map_err(|e| BridgeError::Csv(csv::Error::from(e.into_error())))
}

pub fn encode_order(order: &TradeOrder) -> Result<Vec<u8>, BridgeError> {
    Ok(serde_json::to_vec(order)?)
}

pub fn decode_order(bytes: &[u8]) -> Result<TradeOrder, BridgeError> {
    Ok(serde_json::from_slice(bytes)?)
}
