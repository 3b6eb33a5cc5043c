//! Trade Coordinator
//!
//! Takes a quote to a submitted transaction and follows it through
//! `Idle -> Pending -> Confirming -> Success | Failed`.
//!
//! Buys are bounded above by 105% of the quoted cost and sells below by 95% of
//! the quoted return. A confirmed success notifies once per hash and schedules a
//! single chain-state refresh after the configured delay.

use std::sync::Arc;

use num_traits::Signed;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::amount::format_amount;
use crate::calculator::{max_eth_cost, min_eth_return};
use crate::notify::{Notifier, TradeNotification};
use crate::quote::QuoteEngine;
use crate::state::TradeExecution;
use vertex_core::{CurveLedger, Direction, LedgerError, ReceiptStatus, TradeConfig, TradeError, TxHash, Wei};

/// A trade ready for submission, with its slippage bound applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeOrder {
    Buy { token_amount: Wei, max_eth_cost: Wei },
    Sell { token_amount: Wei, min_eth_return: Wei },
}

impl TradeOrder {
    /// `None` when either the token quantity or the quoted price is zero or absent.
    pub fn new(token_amount: &Wei, quote_price: Option<&Wei>, direction: Direction) -> Option<Self> {
        if !token_amount.is_positive() {
            return None;
        }
        let quote_price = quote_price.filter(|p| p.is_positive())?;

        Some(match direction {
            Direction::Buy => Self::Buy {
                token_amount: token_amount.clone(),
                max_eth_cost: max_eth_cost(quote_price),
            },
            Direction::Sell => Self::Sell {
                token_amount: token_amount.clone(),
                min_eth_return: min_eth_return(quote_price),
            },
        })
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Buy { .. } => Direction::Buy,
            Self::Sell { .. } => Direction::Sell,
        }
    }

    pub fn token_amount(&self) -> &Wei {
        match self {
            Self::Buy { token_amount, .. } | Self::Sell { token_amount, .. } => token_amount,
        }
    }

    /// ETH attached to the call
    pub fn value(&self) -> Wei {
        match self {
            Self::Buy { max_eth_cost, .. } => max_eth_cost.clone(),
            Self::Sell { .. } => Wei::from(0),
        }
    }
}

pub struct TradeCoordinator<L: ?Sized, N> {
    engine: Arc<QuoteEngine<L>>,
    notifier: Arc<N>,
    config: TradeConfig,
    explorer_url: String,
    execution: watch::Sender<TradeExecution>,
    last_success: Mutex<Option<TxHash>>,
    refresh: Mutex<Option<JoinHandle<()>>>,
}

impl<L, N> TradeCoordinator<L, N>
where
    L: CurveLedger + ?Sized + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        engine: Arc<QuoteEngine<L>>,
        notifier: Arc<N>,
        config: TradeConfig,
        explorer_url: impl Into<String>,
    ) -> Self {
        let (execution, _) = watch::channel(TradeExecution::default());
        Self {
            engine,
            notifier,
            config,
            explorer_url: explorer_url.into(),
            execution,
            last_success: Mutex::new(None),
            refresh: Mutex::new(None),
        }
    }

    pub fn execution(&self) -> TradeExecution {
        self.execution.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TradeExecution> {
        self.execution.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.execution.borrow().phase.is_busy()
    }

    /// Submit a trade and follow it to a terminal phase.
    ///
    /// Returns `Ok(None)` without submitting when there is nothing to trade, and
    /// `Err(InProgress)` while an earlier trade is still pending or confirming.
    /// Submission, revert and receipt failures end in a `Failed` execution.
    pub async fn execute_trade(
        &self,
        token_amount: &Wei,
        quote_price: Option<&Wei>,
        direction: Direction,
    ) -> Result<Option<TradeExecution>, TradeError> {
        let Some(order) = self.claim(token_amount, quote_price, direction)? else {
            return Ok(None);
        };
        Ok(Some(self.drive(order).await))
    }

    /// Claim the trade slot and drive the trade on a background task.
    ///
    /// Returns the `Pending` execution immediately; follow progress with
    /// [`subscribe`](Self::subscribe).
    pub fn spawn_trade(
        self: &Arc<Self>,
        token_amount: &Wei,
        quote_price: Option<&Wei>,
        direction: Direction,
    ) -> Result<Option<TradeExecution>, TradeError> {
        let Some(order) = self.claim(token_amount, quote_price, direction)? else {
            return Ok(None);
        };
        let coordinator = self.clone();
        tokio::spawn(async move {
            coordinator.drive(order).await;
        });
        Ok(Some(TradeExecution::pending()))
    }

    fn claim(
        &self,
        token_amount: &Wei,
        quote_price: Option<&Wei>,
        direction: Direction,
    ) -> Result<Option<TradeOrder>, TradeError> {
        let Some(order) = TradeOrder::new(token_amount, quote_price, direction) else {
            tracing::debug!("Trade skipped: no token amount or quote price");
            return Ok(None);
        };

        let claimed = self.execution.send_if_modified(|exec| {
            if exec.phase.is_busy() {
                return false;
            }
            *exec = TradeExecution::pending();
            true
        });
        if !claimed {
            tracing::debug!("Trade refused: another trade is in progress");
            return Err(TradeError::InProgress);
        }
        Ok(Some(order))
    }

    async fn drive(&self, order: TradeOrder) -> TradeExecution {
        tracing::info!(
            "Submitting {} of {} tokens (value {})",
            order.direction(),
            format_amount(order.token_amount(), None),
            format_amount(&order.value(), None)
        );

        let hash = match self.submit(&order).await {
            Ok(hash) => hash,
            Err(e) => {
                let reason = TradeError::SubmissionFailed {
                    message: e.to_string(),
                };
                return self.fail(None, &reason);
            }
        };

        tracing::info!("Transaction submitted: {}", hash);
        self.execution
            .send_replace(TradeExecution::confirming(hash.clone()));

        match self.await_receipt(&hash).await {
            Ok(ReceiptStatus::Success) => {
                let exec = TradeExecution::succeeded(hash.clone());
                self.execution.send_replace(exec.clone());
                self.on_success(&hash).await;
                exec
            }
            Ok(ReceiptStatus::Reverted) => {
                let reason = TradeError::Reverted {
                    hash: hash.to_string(),
                };
                self.fail(Some(hash), &reason)
            }
            Err(reason) => self.fail(Some(hash), &reason),
        }
    }

    async fn submit(&self, order: &TradeOrder) -> Result<TxHash, LedgerError> {
        let ledger = self.engine.ledger();
        match order {
            TradeOrder::Buy {
                token_amount,
                max_eth_cost,
            } => ledger.buy(token_amount, max_eth_cost).await,
            TradeOrder::Sell {
                token_amount,
                min_eth_return,
            } => ledger.sell(token_amount, min_eth_return).await,
        }
    }

    /// Poll for the receipt until it is mined or the receipt timeout elapses.
    async fn await_receipt(&self, hash: &TxHash) -> Result<ReceiptStatus, TradeError> {
        let ledger = self.engine.ledger();
        let poll_interval = self.config.receipt_poll_interval();

        let poll = async {
            loop {
                match ledger.receipt_status(hash).await {
                    Ok(Some(status)) => return Ok(status),
                    Ok(None) => tokio::time::sleep(poll_interval).await,
                    Err(e) => {
                        return Err(TradeError::ReceiptFailed {
                            message: e.to_string(),
                        })
                    }
                }
            }
        };

        match tokio::time::timeout(self.config.receipt_timeout(), poll).await {
            Ok(result) => result,
            Err(_) => Err(TradeError::ReceiptTimeout {
                hash: hash.to_string(),
                secs: self.config.receipt_timeout_secs,
            }),
        }
    }

    fn fail(&self, hash: Option<TxHash>, reason: &TradeError) -> TradeExecution {
        tracing::warn!("Trade failed: {}", reason);
        let reason = reason.to_string();
        self.notifier.notify(&TradeNotification::failure(
            hash.as_ref(),
            &reason,
            &self.explorer_url,
        ));
        let exec = TradeExecution::failed(hash, reason);
        self.execution.send_replace(exec.clone());
        exec
    }

    /// Success side effects for `hash`: notify and schedule one refresh.
    ///
    /// Runs at most once per hash; returns false when `hash` was already handled.
    /// A newer success replaces a refresh that has not fired yet.
    pub async fn on_success(&self, hash: &TxHash) -> bool {
        {
            let mut last = self.last_success.lock().await;
            if last.as_ref() == Some(hash) {
                tracing::debug!("Success for {} already handled", hash);
                return false;
            }
            *last = Some(hash.clone());
        }

        self.notifier
            .notify(&TradeNotification::success(hash, &self.explorer_url));

        let engine = self.engine.clone();
        let delay = self.config.refresh_delay();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            engine.refetch_all().await;
        });

        if let Some(previous) = self.refresh.lock().await.replace(task) {
            previous.abort();
        }
        true
    }

    /// Return a terminal execution to `Idle`. Busy executions are left alone.
    pub fn reset(&self) {
        self.execution.send_if_modified(|exec| {
            if !exec.phase.is_terminal() {
                return false;
            }
            *exec = TradeExecution::default();
            true
        });
    }
}

impl<L: ?Sized, N> Drop for TradeCoordinator<L, N> {
    fn drop(&mut self) {
        if let Some(task) = self.refresh.get_mut().take() {
            task.abort();
        }
    }
}
