//! Quote Engine
//!
//! Holds the live curve snapshot, turns a debounced amount into a [`Quote`],
//! and tracks which ledger reads are in flight.
//!
//! Quote derivation is a pure function of its inputs; [`watch_quotes`] wires it
//! to watch channels so a new quote is published whenever the input text, the
//! direction or the total supply changes.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use num_traits::{Signed, Zero};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::amount::parse_amount;
use crate::calculator::estimate_token_amount;
use crate::state::{ChainState, CurveState, Quote};
use vertex_core::{Address, CurveLedger, Direction, LedgerError, Wei};

/// Token quantity for a parsed input.
///
/// Buy inputs are ETH and go through the curve estimate; sell inputs already
/// are token quantities. An unresolved supply gives 0. A resolved zero supply
/// is not treated as unresolved: buys still get the curve estimate and sells
/// pass through, so an empty curve can be quoted.
pub fn derive_token_amount(parsed: &Wei, direction: Direction, total_supply: Option<&Wei>) -> Wei {
    let Some(total_supply) = total_supply else {
        return Wei::zero();
    };
    match direction {
        Direction::Buy => estimate_token_amount(parsed, total_supply),
        Direction::Sell => parsed.clone(),
    }
}

/// Quote for `debounced_input` with its price still unresolved
pub fn draft_quote(debounced_input: &str, direction: Direction, curve: &CurveState) -> Quote {
    let input_amount = parse_amount(debounced_input);
    let token_amount = derive_token_amount(&input_amount, direction, curve.total_supply.as_ref());
    Quote {
        direction,
        input_amount,
        token_amount,
        price_amount: None,
    }
}

/// Ledger reads whose in-flight state feeds the loading flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    SpotPrice = 0,
    TotalSupply = 1,
    PoolBalance = 2,
    PriceQuote = 3,
    Balance = 4,
}

impl Read {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpotPrice => "spot price",
            Self::TotalSupply => "total supply",
            Self::PoolBalance => "pool balance",
            Self::PriceQuote => "price quote",
            Self::Balance => "balance",
        }
    }
}

#[derive(Default)]
struct LoadingFlags([AtomicUsize; 5]);

impl LoadingFlags {
    fn begin(&self, read: Read) -> InFlight<'_> {
        self.0[read as usize].fetch_add(1, Ordering::SeqCst);
        InFlight { flags: self, read }
    }

    fn any(&self) -> bool {
        self.0.iter().any(|n| n.load(Ordering::SeqCst) > 0)
    }

    fn is(&self, read: Read) -> bool {
        self.0[read as usize].load(Ordering::SeqCst) > 0
    }
}

struct InFlight<'a> {
    flags: &'a LoadingFlags,
    read: Read,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flags.0[self.read as usize].fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct QuoteEngine<L: ?Sized> {
    ledger: Arc<L>,
    account: Option<Address>,
    state: watch::Sender<ChainState>,
    loading: LoadingFlags,
}

impl<L> QuoteEngine<L>
where
    L: CurveLedger + ?Sized + 'static,
{
    /// `account` is the holder whose token balance is tracked, if any.
    pub fn new(ledger: Arc<L>, account: Option<Address>) -> Self {
        let (state, _) = watch::channel(ChainState::default());
        Self {
            ledger,
            account,
            state,
            loading: LoadingFlags::default(),
        }
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    /// Current chain snapshot (may be stale between refreshes)
    pub fn state(&self) -> ChainState {
        self.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ChainState> {
        self.state.subscribe()
    }

    /// True while any curve, balance or price read is in flight.
    ///
    /// Only a "may be stale" hint; a failed read looks the same as a finished one.
    pub fn is_loading(&self) -> bool {
        self.loading.any()
    }

    pub fn is_reading(&self, read: Read) -> bool {
        self.loading.is(read)
    }

    /// Re-read spot price, total supply, pool balance and the account balance concurrently.
    ///
    /// Failed reads leave their field unresolved. The price quote is not
    /// re-read here; it follows from the supply change through [`watch_quotes`].
    pub async fn refetch_all(&self) {
        let balance = async {
            match &self.account {
                Some(account) => self.track(Read::Balance, self.ledger.balance_of(account)).await,
                None => None,
            }
        };

        let (spot_price, total_supply, pool_balance, balance) = tokio::join!(
            self.track(Read::SpotPrice, self.ledger.spot_price()),
            self.track(Read::TotalSupply, self.ledger.total_supply()),
            self.track(Read::PoolBalance, self.ledger.pool_balance()),
            balance,
        );

        tracing::debug!(
            "Curve state refreshed: supply={:?} spot={:?} pool={:?}",
            total_supply,
            spot_price,
            pool_balance
        );

        self.state.send_replace(ChainState {
            curve: CurveState {
                spot_price,
                total_supply,
                pool_balance,
            },
            balance,
        });
    }

    /// Build a quote for `debounced_input` against `curve`.
    ///
    /// The contract price is only requested for a strictly positive token quantity.
    pub async fn compute_quote(
        &self,
        debounced_input: &str,
        direction: Direction,
        curve: &CurveState,
    ) -> Quote {
        let mut quote = draft_quote(debounced_input, direction, curve);
        if quote.token_amount.is_positive() {
            quote.price_amount = self.price_quote(&quote.token_amount, direction).await;
        }
        quote
    }

    /// Quote against the current snapshot
    pub async fn quote(&self, debounced_input: &str, direction: Direction) -> Quote {
        let curve = self.state.borrow().curve.clone();
        self.compute_quote(debounced_input, direction, &curve).await
    }

    /// `getBuyPrice` / `getSellPrice` for `token_amount`
    pub async fn price_quote(&self, token_amount: &Wei, direction: Direction) -> Option<Wei> {
        match direction {
            Direction::Buy => {
                self.track(Read::PriceQuote, self.ledger.buy_price(token_amount))
                    .await
            }
            Direction::Sell => {
                self.track(Read::PriceQuote, self.ledger.sell_price(token_amount))
                    .await
            }
        }
    }

    async fn track<F>(&self, read: Read, fut: F) -> Option<Wei>
    where
        F: Future<Output = Result<Wei, LedgerError>>,
    {
        let _in_flight = self.loading.begin(read);
        match fut.await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", read.as_str(), e);
                None
            }
        }
    }
}

/// Live quote stream; the recompute task stops when this is dropped.
pub struct QuoteFeed {
    quotes: watch::Receiver<Quote>,
    task: JoinHandle<()>,
}

impl QuoteFeed {
    /// Latest published quote
    pub fn latest(&self) -> Quote {
        self.quotes.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Quote> {
        self.quotes.clone()
    }
}

impl Drop for QuoteFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Recompute the quote whenever the input text, direction or total supply changes.
///
/// The new quantity is published at once with an unresolved price, then again
/// once the price read returns. A priced result is discarded if its inputs
/// changed while the read was in flight.
pub fn watch_quotes<L>(
    engine: Arc<QuoteEngine<L>>,
    mut input: watch::Receiver<String>,
    mut direction: watch::Receiver<Direction>,
) -> QuoteFeed
where
    L: CurveLedger + ?Sized + 'static,
{
    let mut state = engine.subscribe_state();
    let (tx, quotes) = watch::channel(Quote::empty(*direction.borrow()));

    let task = tokio::spawn(async move {
        loop {
            let text = input.borrow_and_update().clone();
            let dir = *direction.borrow_and_update();
            let curve = state.borrow_and_update().curve.clone();

            let mut quote = draft_quote(&text, dir, &curve);
            tx.send_replace(quote.clone());

            if quote.token_amount.is_positive() {
                quote.price_amount = engine.price_quote(&quote.token_amount, dir).await;

                let superseded = input.has_changed().unwrap_or(false)
                    || direction.has_changed().unwrap_or(false)
                    || state
                        .has_changed()
                        .map(|changed| {
                            changed && state.borrow().curve.total_supply != curve.total_supply
                        })
                        .unwrap_or(false);
                if superseded {
                    continue;
                }
                tx.send_replace(quote);
            }

            // wait for a change that affects the quote
            loop {
                tokio::select! {
                    changed = input.changed() => {
                        if changed.is_err() { return; }
                        break;
                    }
                    changed = direction.changed() => {
                        if changed.is_err() { return; }
                        break;
                    }
                    changed = state.changed() => {
                        if changed.is_err() { return; }
                        if state.borrow().curve.total_supply != curve.total_supply {
                            break;
                        }
                        state.borrow_and_update();
                    }
                }
            }
        }
    });

    QuoteFeed { quotes, task }
}
