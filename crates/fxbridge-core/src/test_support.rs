//! A stand-in for the external execution process.
//!
//! `FakeExecutor` watches the shared directory the same way the real process
//! is expected to: it picks up the query-request artifact, deletes it, and
//! answers with a query-result artifact. The result is written to a temporary
//! name and renamed into place so the coordinator never sees a partial file.

use std::path::Path;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDate};
use fxbridge_models::price_history::Bar;
use fxbridge_models::trade_order::TradeOrder;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::artifacts::{self, ArtifactPaths};
use crate::codec;

/// How the fake answers a query request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Well-formed CSV for these bars.
    Bars(Vec<Bar>),
    /// Verbatim artifact contents, for malformed-result scenarios.
    Raw(String),
    /// Consume the request and never answer.
    Silent,
}

pub struct FakeExecutor {
    paths: ArtifactPaths,
    reply: Reply,
    poll: Duration,
    delay: Duration,
}

impl FakeExecutor {
    pub fn new(paths: ArtifactPaths, reply: Reply) -> Self {
        Self {
            paths,
            reply,
            poll: Duration::from_millis(10),
            delay: Duration::ZERO,
        }
    }

    /// Wait this long between picking up a request and answering it.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run until cancelled. The handle yields every pair that was requested.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<Vec<String>> {
        tokio::spawn(async move {
            let mut served = Vec::new();
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.poll) => {}
                }

                // An empty read can be a request caught between truncate and write.
                let bytes = match artifacts::read(&self.paths.query_request).await {
                    Ok(bytes) if !bytes.is_empty() => bytes,
                    _ => continue,
                };
                let _ = artifacts::remove(&self.paths.query_request).await;
                served.push(String::from_utf8_lossy(&bytes).into_owned());

                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }

                let body = match &self.reply {
                    Reply::Bars(bars) => match codec::encode_history(bars) {
                        Ok(body) => body,
                        Err(_) => continue,
                    },
                    Reply::Raw(raw) => raw.clone().into_bytes(),
                    Reply::Silent => continue,
                };
                let _ = publish(&self.paths.query_result, &body).await;
            }
            served
        })
    }
}

async fn publish(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("partial");
    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, path).await
}

/// Pick up the pending trade order the way the execution side would:
/// read it and delete it.
pub async fn take_order(paths: &ArtifactPaths) -> Option<TradeOrder> {
    let bytes = artifacts::read(&paths.trade_order).await.ok()?;
    let _ = artifacts::remove(&paths.trade_order).await;
    codec::decode_order(&bytes).ok()
}

/// `n` daily bars starting 2023-01-01 with a gently rising close.
pub fn sample_bars(n: usize) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
    (0..n)
        .map(|i| {
            let base = 1.05 + i as f64 * 0.001;
            Bar {
                date: (start + ChronoDuration::days(i as i64)).to_string(),
                open: base,
                high: base + 0.01,
                low: base - 0.01,
                close: base + 0.005,
            }
        })
        .collect()
}
