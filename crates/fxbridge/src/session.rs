//! Line-oriented console standing in for the fetch and trade forms.
//!
//! Fetches run on their own task and report back over a channel, so the
//! prompt keeps accepting trades and `status`/`cancel` while one is pending.

use std::str::FromStr;
use std::sync::Arc;

use fxbridge_core::{BridgeError, HistorySource, Submitter};
use fxbridge_models::price_history::{CurrencyPair, PriceHistory};
use fxbridge_models::trade_order::TradeAction;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const HELP: &str = "\
Commands:
  fetch <PAIR>                   request price history (e.g. fetch EURUSD)
  trade <buy|sell> <AMOUNT> <PAIR>  submit a trade order
  status                         show the state of the current fetch
  cancel                         stop waiting for the current fetch
  help                           show this message
  quit                           exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch(String),
    Trade {
        action: TradeAction,
        amount: Decimal,
        pair: CurrencyPair,
    },
    Status,
    Cancel,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((head, args)) = parts.split_first() else {
            return Err("empty command".to_string());
        };

        match (head.to_ascii_lowercase().as_str(), args) {
            ("fetch", [pair]) => Ok(Command::Fetch((*pair).to_string())),
            ("fetch", _) => Err("usage: fetch <PAIR>".to_string()),
            ("trade", [action, amount, pair]) => {
                let action = action.parse::<TradeAction>()?;
                let amount = Decimal::from_str(amount)
                    .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
                let pair = CurrencyPair::new(pair).ok_or("missing currency pair")?;
                Ok(Command::Trade {
                    action,
                    amount,
                    pair,
                })
            }
            ("trade", _) => Err("usage: trade <buy|sell> <AMOUNT> <PAIR>".to_string()),
            ("status", []) => Ok(Command::Status),
            ("cancel", []) => Ok(Command::Cancel),
            ("help" | "?", _) => Ok(Command::Help),
            ("quit" | "exit", []) => Ok(Command::Quit),
            (other, _) => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

struct PendingFetch {
    pair: String,
    cancel: CancellationToken,
}

struct FetchDone {
    pair: String,
    result: Result<PriceHistory, BridgeError>,
}

/// One interactive session over a history source and a trade submitter.
pub struct Session {
    history: Arc<dyn HistorySource>,
    submitter: Submitter,
    pending: Option<PendingFetch>,
    done_tx: mpsc::UnboundedSender<FetchDone>,
    done_rx: mpsc::UnboundedReceiver<FetchDone>,
}

impl Session {
    pub fn new(history: Arc<dyn HistorySource>, submitter: Submitter) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            history,
            submitter,
            pending: None,
            done_tx,
            done_rx,
        }
    }

    /// Read commands until `quit`, end of input, or `shutdown`.
    ///
    /// At end of input an outstanding fetch is still waited for and reported.
    pub async fn run<R, W>(
        mut self,
        input: R,
        mut out: W,
        shutdown: CancellationToken,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut input_open = true;

        while input_open || self.pending.is_some() {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                Some(done) = self.done_rx.recv() => {
                    self.pending = None;
                    let msg = match done.result {
                        Ok(history) => format!("Received {}", history.summary()),
                        Err(e) => format!("Fetch for {} failed: {e}", done.pair),
                    };
                    say(&mut out, &msg).await?;
                }
                line = lines.next_line(), if input_open => {
                    match line? {
                        Some(line) => {
                            if !self.handle(&line, &mut out, &shutdown).await? {
                                break;
                            }
                        }
                        None => input_open = false,
                    }
                }
            }
        }

        if let Some(pending) = self.pending.take() {
            debug!(pair = %pending.pair, "Cancelling outstanding fetch on exit");
            pending.cancel.cancel();
        }
        out.flush().await
    }

    /// Returns `false` when the session should end.
    async fn handle<W>(
        &mut self,
        line: &str,
        out: &mut W,
        shutdown: &CancellationToken,
    ) -> std::io::Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        if line.trim().is_empty() {
            return Ok(true);
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(msg) => {
                say(out, &msg).await?;
                return Ok(true);
            }
        };

        match command {
            Command::Fetch(pair) => {
                if let Some(pending) = &self.pending {
                    let msg = format!(
                        "A fetch for {} is still in progress; wait for it or 'cancel'",
                        pending.pair
                    );
                    say(out, &msg).await?;
                    return Ok(true);
                }
                self.spawn_fetch(pair.clone(), shutdown.child_token());
                say(out, &format!("Submitted query for {pair}")).await?;
            }
            Command::Trade {
                action,
                amount,
                pair,
            } => {
                let msg = match self.submitter.submit_trade(action, amount, pair).await {
                    Ok(ack) => ack.to_string(),
                    Err(e) => format!("Trade failed: {e}"),
                };
                say(out, &msg).await?;
            }
            Command::Status => {
                let msg = match &self.pending {
                    Some(pending) => format!("{}: {}", pending.pair, self.history.state()),
                    None => self.history.state().to_string(),
                };
                say(out, &msg).await?;
            }
            Command::Cancel => match &self.pending {
                Some(pending) => {
                    pending.cancel.cancel();
                    say(out, &format!("Cancelling fetch for {}", pending.pair)).await?;
                }
                None => say(out, "No fetch in progress").await?,
            },
            Command::Help => say(out, HELP).await?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn spawn_fetch(&mut self, pair: String, cancel: CancellationToken) {
        let history = Arc::clone(&self.history);
        let done_tx = self.done_tx.clone();
        let task_pair = pair.clone();
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let result = history.fetch(&task_pair, &task_cancel).await;
            let _ = done_tx.send(FetchDone {
                pair: task_pair,
                result,
            });
        });
        self.pending = Some(PendingFetch { pair, cancel });
    }
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, msg: &str) -> std::io::Result<()> {
    out.write_all(msg.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}
