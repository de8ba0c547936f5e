pub mod config;
pub mod price_history;
pub mod request;
pub mod trade_order;

pub use config::{ArtifactConfig, BridgeConfig, PollingConfig};
pub use price_history::{Bar, CurrencyPair, PriceHistory};
pub use request::{RequestId, RequestState};
pub use trade_order::{TradeAck, TradeAction, TradeOrder};
