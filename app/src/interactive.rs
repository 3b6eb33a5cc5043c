//! Terminal trading session
//!
//! Each stdin line is the full contents of the amount field, as if typed, and
//! goes through the debounced quote session. A few words are commands instead.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use vertex::{
    format_amount, ChainState, LogNotifier, Quote, QuoteEngine, QuoteSession, TradeCoordinator,
    TradeExecution, TradePhase,
};
use vertex_core::constants::TOKEN_SYMBOL;
use vertex_core::{Address, AppConfig, CurveLedger, Direction, Wei};

const DISPLAY_PRECISION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Direction(Direction),
    Submit,
    Refresh,
    State,
    Help,
    Quit,
    Amount(String),
}

/// Interpret one line of input. Anything that is not a command is amount text.
pub fn parse_input(line: &str) -> Input {
    match line.trim() {
        "buy" => Input::Direction(Direction::Buy),
        "sell" => Input::Direction(Direction::Sell),
        "go" | "trade" => Input::Submit,
        "refresh" => Input::Refresh,
        "state" => Input::State,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        text => Input::Amount(text.to_string()),
    }
}

fn show(amount: &Wei) -> String {
    format_amount(amount, Some(DISPLAY_PRECISION))
}

pub fn render_quote(quote: &Quote) -> String {
    let price = quote
        .price_amount
        .as_ref()
        .map(show)
        .unwrap_or_else(|| "...".to_string());
    match quote.direction {
        Direction::Buy => format!(
            "buy  {} ETH -> {} {} (cost {} ETH)",
            show(&quote.input_amount),
            show(&quote.token_amount),
            TOKEN_SYMBOL,
            price
        ),
        Direction::Sell => format!(
            "sell {} {} -> {} ETH",
            show(&quote.token_amount),
            TOKEN_SYMBOL,
            price
        ),
    }
}

pub fn render_state(state: &ChainState) -> String {
    let field = |v: &Option<Wei>| v.as_ref().map(show).unwrap_or_else(|| "-".to_string());
    format!(
        "spot {} ETH | supply {} {} | pool {} ETH | balance {} {}",
        field(&state.curve.spot_price),
        field(&state.curve.total_supply),
        TOKEN_SYMBOL,
        field(&state.curve.pool_balance),
        field(&state.balance),
        TOKEN_SYMBOL
    )
}

pub fn render_execution(exec: &TradeExecution, explorer_base: &str) -> String {
    let link = exec
        .hash
        .as_ref()
        .map(|h| format!(" {}", h.explorer_url(explorer_base)))
        .unwrap_or_default();
    match (&exec.phase, &exec.error) {
        (TradePhase::Failed, Some(reason)) => format!("trade failed: {}{}", reason, link),
        (phase, _) => format!("trade {}{}", phase.as_str(), link),
    }
}

const HELP: &str = "\
type an amount (ETH to spend when buying, tokens when selling)
  buy | sell    switch direction
  go            submit the current quote
  refresh       re-read curve state
  state         show curve state
  quit          exit";

/// Run until stdin closes or `quit`; `account` is the holder whose balance is shown.
pub async fn run<L>(config: &AppConfig, ledger: Arc<L>, account: Option<Address>) -> anyhow::Result<()>
where
    L: CurveLedger + 'static,
{
    let engine = Arc::new(QuoteEngine::new(ledger, account));
    let coordinator = Arc::new(TradeCoordinator::new(
        engine.clone(),
        Arc::new(LogNotifier),
        config.trade.clone(),
        config.explorer_url.clone(),
    ));
    let mut session = QuoteSession::new(engine.clone(), coordinator.clone(), config.quote.debounce());

    session.refresh().await;
    println!("{}", render_state(&engine.state()));
    println!("{}", HELP);

    let mut quotes = session.subscribe_quotes();
    let quote_printer = tokio::spawn(async move {
        while quotes.changed().await.is_ok() {
            let quote = quotes.borrow_and_update().clone();
            println!("{}", render_quote(&quote));
        }
    });

    let mut executions = coordinator.subscribe();
    let explorer = config.explorer_url.clone();
    let trade_printer = tokio::spawn(async move {
        while executions.changed().await.is_ok() {
            let exec = executions.borrow_and_update().clone();
            println!("{}", render_execution(&exec, &explorer));
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Direction(direction) => {
                session.set_direction(direction);
                println!("direction: {}", direction);
            }
            Input::Submit => match session.submit() {
                Ok(Some(_)) => {}
                Ok(None) => println!("nothing to trade"),
                Err(e) => println!("{}", e),
            },
            Input::Refresh => {
                session.refresh().await;
                println!("{}", render_state(&engine.state()));
            }
            Input::State => println!("{}", render_state(&engine.state())),
            Input::Help => println!("{}", HELP),
            Input::Quit => break,
            Input::Amount(text) => session.set_input(text),
        }
    }

    quote_printer.abort();
    trade_printer.abort();
    Ok(())
}
