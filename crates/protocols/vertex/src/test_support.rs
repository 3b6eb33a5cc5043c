//! In-memory ledger for engine and coordinator tests

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::calculator::spot_price_at;
use vertex_core::{Address, CurveLedger, Direction, LedgerError, ReceiptStatus, TxHash, Wei};

pub fn eth(n: u64) -> Wei {
    Wei::from(n) * Wei::from(10u64).pow(18)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calls {
    pub spot_price: usize,
    pub total_supply: usize,
    pub pool_balance: usize,
    pub buy_price: usize,
    pub sell_price: usize,
    pub balance_of: usize,
    pub receipt_status: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub direction: Direction,
    pub token_amount: Wei,
    /// max cost for buys, min return for sells
    pub bound: Wei,
    /// ETH attached to the call
    pub value: Wei,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptMode {
    Confirmed(ReceiptStatus),
    Unconfirmed,
    Unreachable,
}

pub struct FakeLedger {
    supply: Mutex<Wei>,
    calls: Mutex<Calls>,
    submissions: Mutex<Vec<Submission>>,
    receipt: Mutex<ReceiptMode>,
    fail_reads: AtomicBool,
    fail_submit: AtomicBool,
    price_gate: Mutex<Option<Arc<Notify>>>,
    next_hash: AtomicU64,
}

impl FakeLedger {
    pub fn new(supply: Wei) -> Self {
        Self {
            supply: Mutex::new(supply),
            calls: Mutex::new(Calls::default()),
            submissions: Mutex::new(Vec::new()),
            receipt: Mutex::new(ReceiptMode::Confirmed(ReceiptStatus::Success)),
            fail_reads: AtomicBool::new(false),
            fail_submit: AtomicBool::new(false),
            price_gate: Mutex::new(None),
            next_hash: AtomicU64::new(1),
        }
    }

    pub fn holder() -> Address {
        Address::new("0x70997970c51812dc3a010c7d01b50e0d17dc79c8")
    }

    pub fn spot(&self) -> Wei {
        spot_price_at(&self.supply.lock().unwrap())
    }

    pub fn pool(&self) -> Wei {
        eth(5)
    }

    pub fn holder_balance(&self) -> Wei {
        eth(7)
    }

    pub fn buy_cost(&self, amount: &Wei) -> Wei {
        amount * Wei::from(3) / Wei::from(20)
    }

    pub fn sell_return(&self, amount: &Wei) -> Wei {
        amount / Wei::from(10)
    }

    pub fn set_supply(&self, supply: Wei) {
        *self.supply.lock().unwrap() = supply;
    }

    pub fn set_receipt(&self, mode: ReceiptMode) {
        *self.receipt.lock().unwrap() = mode;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_submit(&self, fail: bool) {
        self.fail_submit.store(fail, Ordering::SeqCst);
    }

    /// The next price read waits until the returned handle is notified.
    pub fn hold_price_reads(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.price_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    fn read<T>(&self, value: T) -> Result<T, LedgerError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Unreachable {
                url: "fake://ledger".to_string(),
            });
        }
        Ok(value)
    }

    async fn wait_gate(&self) {
        let gate = self.price_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn submit(&self, submission: Submission) -> Result<TxHash, LedgerError> {
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(LedgerError::ApiError {
                message: "user rejected the request".to_string(),
            });
        }
        self.submissions.lock().unwrap().push(submission);
        let n = self.next_hash.fetch_add(1, Ordering::SeqCst);
        Ok(TxHash::new(format!("0x{:064x}", n)))
    }
}

#[async_trait]
impl CurveLedger for FakeLedger {
    async fn spot_price(&self) -> Result<Wei, LedgerError> {
        self.calls.lock().unwrap().spot_price += 1;
        self.read(self.spot())
    }

    async fn total_supply(&self) -> Result<Wei, LedgerError> {
        self.calls.lock().unwrap().total_supply += 1;
        let supply = self.supply.lock().unwrap().clone();
        self.read(supply)
    }

    async fn pool_balance(&self) -> Result<Wei, LedgerError> {
        self.calls.lock().unwrap().pool_balance += 1;
        self.read(self.pool())
    }

    async fn buy_price(&self, amount: &Wei) -> Result<Wei, LedgerError> {
        self.calls.lock().unwrap().buy_price += 1;
        self.wait_gate().await;
        self.read(self.buy_cost(amount))
    }

    async fn sell_price(&self, amount: &Wei) -> Result<Wei, LedgerError> {
        self.calls.lock().unwrap().sell_price += 1;
        self.wait_gate().await;
        self.read(self.sell_return(amount))
    }

    async fn balance_of(&self, _account: &Address) -> Result<Wei, LedgerError> {
        self.calls.lock().unwrap().balance_of += 1;
        self.read(self.holder_balance())
    }

    async fn buy(&self, amount: &Wei, max_eth_cost: &Wei) -> Result<TxHash, LedgerError> {
        self.submit(Submission {
            direction: Direction::Buy,
            token_amount: amount.clone(),
            bound: max_eth_cost.clone(),
            value: max_eth_cost.clone(),
        })
    }

    async fn sell(&self, amount: &Wei, min_eth_return: &Wei) -> Result<TxHash, LedgerError> {
        self.submit(Submission {
            direction: Direction::Sell,
            token_amount: amount.clone(),
            bound: min_eth_return.clone(),
            value: Wei::from(0),
        })
    }

    async fn receipt_status(&self, _hash: &TxHash) -> Result<Option<ReceiptStatus>, LedgerError> {
        self.calls.lock().unwrap().receipt_status += 1;
        match *self.receipt.lock().unwrap() {
            ReceiptMode::Confirmed(status) => Ok(Some(status)),
            ReceiptMode::Unconfirmed => Ok(None),
            ReceiptMode::Unreachable => Err(LedgerError::Unreachable {
                url: "fake://ledger".to_string(),
            }),
        }
    }
}
