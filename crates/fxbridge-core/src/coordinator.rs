use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use fxbridge_models::config::PollingConfig;
use fxbridge_models::price_history::{CurrencyPair, PriceHistory};
use fxbridge_models::request::{RequestId, RequestState};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::artifacts::{self, ArtifactPaths};
use crate::codec;
use crate::error::BridgeError;

/// Anything that can answer a price-history query. Mockable for testing.
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch history for `pair`, failing fast if another fetch is outstanding.
    async fn fetch(
        &self,
        pair: &str,
        cancel: &CancellationToken,
    ) -> Result<PriceHistory, BridgeError>;

    fn state(&self) -> RequestState;
}

/// Drives the query-request / query-result exchange with the execution process.
///
/// Only one exchange runs at a time per coordinator. Each exchange walks
/// `Idle -> RequestWritten -> Polling -> ResultAvailable -> Consumed` and the
/// coordinator drops back to `Idle` when it ends, whatever the outcome.
pub struct Coordinator {
    paths: ArtifactPaths,
    interval: Duration,
    timeout: Option<Duration>,
    in_flight: Mutex<()>,
    generation: AtomicU64,
    state_tx: watch::Sender<RequestState>,
}

impl Coordinator {
    pub fn new(paths: ArtifactPaths, polling: &PollingConfig) -> Self {
        let (state_tx, _) = watch::channel(RequestState::Idle);
        Self {
            paths,
            interval: polling.interval(),
            timeout: polling.timeout(),
            in_flight: Mutex::new(()),
            generation: AtomicU64::new(0),
            state_tx,
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn state(&self) -> RequestState {
        *self.state_tx.borrow()
    }

    /// Watch state transitions as they happen.
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state_tx.subscribe()
    }

    /// Number of exchanges started so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Request history for `pair` and wait for the execution process to answer.
    ///
    /// Waits for any outstanding fetch on this coordinator to finish first.
    pub async fn fetch_history(
        &self,
        pair: &str,
        cancel: &CancellationToken,
    ) -> Result<PriceHistory, BridgeError> {
        let pair = CurrencyPair::new(pair).ok_or_else(|| BridgeError::InvalidPair(pair.into()))?;
        let _flight = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BridgeError::Cancelled),
            guard = self.in_flight.lock() => guard,
        };
        self.run(pair, cancel).await
    }

    /// Like `fetch_history`, but returns `Busy` instead of waiting its turn.
    pub async fn try_fetch_history(
        &self,
        pair: &str,
        cancel: &CancellationToken,
    ) -> Result<PriceHistory, BridgeError> {
        let pair = CurrencyPair::new(pair).ok_or_else(|| BridgeError::InvalidPair(pair.into()))?;
        let _flight = self.in_flight.try_lock().map_err(|_| BridgeError::Busy)?;
        self.run(pair, cancel).await
    }

    async fn run(
        &self,
        pair: CurrencyPair,
        cancel: &CancellationToken,
    ) -> Result<PriceHistory, BridgeError> {
        // A cancelled caller must not leave a request behind for the execution process.
        if cancel.is_cancelled() {
            return Err(BridgeError::Cancelled);
        }
        let request = RequestId::new(self.generation.fetch_add(1, Ordering::Relaxed) + 1);
        let span = info_span!("fetch", request = %request, pair = %pair);
        let _reset = ResetToIdle(&self.state_tx);
        self.exchange(pair, cancel).instrument(span).await
    }

    async fn exchange(
        &self,
        pair: CurrencyPair,
        cancel: &CancellationToken,
    ) -> Result<PriceHistory, BridgeError> {
        let start = Instant::now();

        // Nothing is in flight, so a result on disk belongs to an abandoned request.
        if artifacts::remove(&self.paths.query_result).await? {
            warn!(
                path = %self.paths.query_result.display(),
                "Discarded stale query result from an earlier request"
            );
        }

        artifacts::write(&self.paths.query_request, pair.as_str().as_bytes()).await?;
        self.state_tx.send_replace(RequestState::RequestWritten);
        info!(path = %self.paths.query_request.display(), "Query request written");

        self.state_tx.send_replace(RequestState::Polling);
        if let Err(e) = self.wait_for_result(cancel).await {
            warn!(error = %e, elapsed_ms = start.elapsed().as_millis(), "Stopped waiting for query result");
            return Err(e);
        }
        self.state_tx.send_replace(RequestState::ResultAvailable);

        let bytes = artifacts::read(&self.paths.query_result).await?;
        artifacts::remove(&self.paths.query_result).await?;
        self.state_tx.send_replace(RequestState::Consumed);

        match codec::parse_history(pair, &bytes) {
            Ok(history) => {
                info!(
                    bars = history.len(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "Query result consumed"
                );
                Ok(history)
            }
            Err(e) => {
                warn!(error = %e, "Discarded malformed query result");
                Err(e)
            }
        }
    }

    async fn wait_for_result(&self, cancel: &CancellationToken) -> Result<(), BridgeError> {
        let poll = async {
            let mut checks: u64 = 0;
            loop {
                if cancel.is_cancelled() {
                    return Err(BridgeError::Cancelled);
                }
                checks += 1;
                if artifacts::exists(&self.paths.query_result).await? {
                    debug!(checks, "Query result appeared");
                    return Ok(());
                }
                tokio::select! {
                    _ = cancel.cancelled() => return Err(BridgeError::Cancelled),
                    _ = tokio::time::sleep(self.interval) => {}
                }
            }
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, poll)
                .await
                .map_err(|_| BridgeError::Timeout(limit.as_secs()))?,
            None => poll.await,
        }
    }
}

#[async_trait]
impl HistorySource for Coordinator {
    async fn fetch(
        &self,
        pair: &str,
        cancel: &CancellationToken,
    ) -> Result<PriceHistory, BridgeError> {
        self.try_fetch_history(pair, cancel).await
    }

    fn state(&self) -> RequestState {
        Coordinator::state(self)
    }
}

/// Puts the coordinator back to `Idle` even if the fetch future is dropped mid-poll.
struct ResetToIdle<'a>(&'a watch::Sender<RequestState>);

impl Drop for ResetToIdle<'_> {
    fn drop(&mut self) {
        self.0.send_replace(RequestState::Idle);
    }
}
