//! Quote session
//!
//! One trading form: raw input text goes through the debouncer, the quote feed
//! recomputes from the debounced text, direction and supply, and `execute`
//! hands the latest quote to the trade coordinator.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::debounce::Debouncer;
use crate::notify::Notifier;
use crate::quote::{draft_quote, watch_quotes, QuoteEngine, QuoteFeed};
use crate::state::{Quote, TradeExecution};
use crate::trade::TradeCoordinator;
use vertex_core::{CurveLedger, Direction, TradeError};

pub struct QuoteSession<L: ?Sized, N> {
    engine: Arc<QuoteEngine<L>>,
    coordinator: Arc<TradeCoordinator<L, N>>,
    input: Debouncer<String>,
    direction: watch::Sender<Direction>,
    feed: QuoteFeed,
}

impl<L, N> QuoteSession<L, N>
where
    L: CurveLedger + ?Sized + 'static,
    N: Notifier + 'static,
{
    /// Must be created from within a tokio runtime.
    pub fn new(
        engine: Arc<QuoteEngine<L>>,
        coordinator: Arc<TradeCoordinator<L, N>>,
        debounce: Duration,
    ) -> Self {
        let input = Debouncer::new(String::new(), debounce);
        let (direction, direction_rx) = watch::channel(Direction::default());
        let feed = watch_quotes(engine.clone(), input.subscribe(), direction_rx);
        Self {
            engine,
            coordinator,
            input,
            direction,
            feed,
        }
    }

    /// Replace the amount text; the quote follows once input goes quiet.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input.push(text.into());
    }

    pub fn set_direction(&self, direction: Direction) {
        self.direction.send_if_modified(|current| {
            if *current == direction {
                return false;
            }
            *current = direction;
            true
        });
    }

    pub fn direction(&self) -> Direction {
        *self.direction.borrow()
    }

    /// Quote for the current debounced input, direction and supply.
    ///
    /// Until the feed has priced exactly these inputs the price is `None`, so
    /// a quote the user has since replaced is never handed to `execute`.
    pub fn quote(&self) -> Quote {
        let current = draft_quote(
            &self.input.current(),
            self.direction(),
            &self.engine.state().curve,
        );
        let latest = self.feed.latest();
        if latest.direction == current.direction
            && latest.input_amount == current.input_amount
            && latest.token_amount == current.token_amount
        {
            latest
        } else {
            current
        }
    }

    pub fn subscribe_quotes(&self) -> watch::Receiver<Quote> {
        self.feed.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.input.is_pending() || self.engine.is_loading()
    }

    /// Execute the latest quote. A no-op when it has no quantity or price.
    pub async fn execute(&self) -> Result<Option<TradeExecution>, TradeError> {
        let quote = self.quote();
        self.coordinator
            .execute_trade(&quote.token_amount, quote.price_amount.as_ref(), quote.direction)
            .await
    }

    /// Submit the latest quote and return once it is pending.
    pub fn submit(&self) -> Result<Option<TradeExecution>, TradeError> {
        let quote = self.quote();
        self.coordinator
            .spawn_trade(&quote.token_amount, quote.price_amount.as_ref(), quote.direction)
    }

    pub async fn refresh(&self) {
        self.engine.refetch_all().await;
    }

    pub fn engine(&self) -> &Arc<QuoteEngine<L>> {
        &self.engine
    }

    pub fn coordinator(&self) -> &Arc<TradeCoordinator<L, N>> {
        &self.coordinator
    }
}
