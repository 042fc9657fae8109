#![allow(dead_code)]

use vaultgraph::domain::{Address, Amount, ChainRecord, RecordContext, RecordPayload, TxHash};

pub fn addr(n: u8) -> Address {
    Address::parse(&format!("0x{:040x}", n)).unwrap()
}

pub fn tx_hash(n: u64) -> TxHash {
    TxHash::parse(&format!("0x{:064x}", n)).unwrap()
}

pub fn amt(s: &str) -> Amount {
    Amount::from_str_canonical(s).unwrap()
}

pub struct CtxBuilder {
    pub contract: Address,
    pub block_number: u64,
    pub timestamp: i64,
    pub tx_n: u64,
    pub tx_index: u64,
    pub log_index: u64,
    pub tx_from: Address,
}

impl CtxBuilder {
    pub fn new(contract: &Address, tx_from: &Address) -> Self {
        CtxBuilder {
            contract: contract.clone(),
            block_number: 11_000_000,
            timestamp: 1_640_995_200,
            tx_n: 1,
            tx_index: 0,
            log_index: 0,
            tx_from: tx_from.clone(),
        }
    }

    pub fn block(mut self, block: u64) -> Self {
        self.block_number = block;
        self
    }

    pub fn timestamp(mut self, seconds: i64) -> Self {
        self.timestamp = seconds;
        self
    }

    pub fn tx(mut self, n: u64) -> Self {
        self.tx_n = n;
        self
    }

    pub fn tx_index(mut self, tx_index: u64) -> Self {
        self.tx_index = tx_index;
        self
    }

    pub fn log_index(mut self, log_index: u64) -> Self {
        self.log_index = log_index;
        self
    }

    pub fn build(self) -> RecordContext {
        RecordContext {
            contract: self.contract,
            block_number: self.block_number,
            timestamp: self.timestamp,
            tx_hash: tx_hash(self.tx_n),
            tx_index: self.tx_index,
            log_index: self.log_index,
            tx_from: self.tx_from,
            tx_to: None,
            value: Amount::zero(),
            gas_price: Amount::zero(),
            gas_limit: Amount::zero(),
        }
    }
}

pub fn record(ctx: RecordContext, payload: RecordPayload) -> ChainRecord {
    ChainRecord { ctx, payload }
}

pub fn deposit_event(
    vault: &Address,
    user: &Address,
    amount: &str,
    shares: &str,
    tx_n: u64,
    timestamp: i64,
) -> ChainRecord {
    record(
        CtxBuilder::new(vault, user)
            .tx(tx_n)
            .block(11_000_000 + tx_n)
            .timestamp(timestamp)
            .log_index(1)
            .build(),
        RecordPayload::DepositEvent {
            recipient: user.clone(),
            amount: amt(amount),
            shares: amt(shares),
        },
    )
}

pub fn withdraw_event(
    vault: &Address,
    user: &Address,
    amount: &str,
    shares: &str,
    tx_n: u64,
    timestamp: i64,
) -> ChainRecord {
    record(
        CtxBuilder::new(vault, user)
            .tx(tx_n)
            .block(11_000_000 + tx_n)
            .timestamp(timestamp)
            .log_index(1)
            .build(),
        RecordPayload::WithdrawEvent {
            recipient: user.clone(),
            amount: amt(amount),
            shares: amt(shares),
        },
    )
}

pub fn transfer_event(
    vault: &Address,
    sender: &Address,
    receiver: &Address,
    value: &str,
    tx_n: u64,
    timestamp: i64,
) -> ChainRecord {
    record(
        CtxBuilder::new(vault, sender)
            .tx(tx_n)
            .block(11_000_000 + tx_n)
            .timestamp(timestamp)
            .log_index(1)
            .build(),
        RecordPayload::TransferEvent {
            sender: sender.clone(),
            receiver: receiver.clone(),
            value: amt(value),
        },
    )
}

pub fn add_strategy_v2(
    vault: &Address,
    strategy: &Address,
    tx_n: u64,
    timestamp: i64,
) -> ChainRecord {
    record(
        CtxBuilder::new(vault, &addr(0xfe))
            .tx(tx_n)
            .block(11_000_000 + tx_n)
            .timestamp(timestamp)
            .log_index(1)
            .build(),
        RecordPayload::StrategyAddedV2 {
            strategy: strategy.clone(),
            debt_ratio: amt("9500"),
            min_debt_per_harvest: amt("0"),
            max_debt_per_harvest: amt("1000000000"),
            performance_fee: amt("1000"),
        },
    )
}

pub fn strategy_reported_v2(
    vault: &Address,
    strategy: &Address,
    gain: &str,
    loss: &str,
    tx_n: u64,
    timestamp: i64,
) -> ChainRecord {
    record(
        CtxBuilder::new(vault, &addr(0xfe))
            .tx(tx_n)
            .block(11_000_000 + tx_n)
            .timestamp(timestamp)
            .log_index(2)
            .build(),
        RecordPayload::StrategyReportedV2 {
            strategy: strategy.clone(),
            gain: amt(gain),
            loss: amt(loss),
            total_gain: amt(gain),
            total_loss: amt(loss),
            total_debt: amt("0"),
            debt_added: amt("0"),
            debt_ratio: amt("9500"),
            debt_paid: amt("0"),
        },
    )
}
