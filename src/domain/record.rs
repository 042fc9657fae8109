//! Decoded chain records.
//!
//! The event-subscription/ABI-decoding collaborator delivers already-decoded
//! events and calls. Each record is an envelope (block/transaction
//! coordinates) plus a tagged payload. Historical contract versions emitted
//! different shapes for the same logical change (AddStrategy v1/v2, two
//! StrategyReported layouts); those stay distinct variants here and are
//! normalized into one canonical form before they reach the projection.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, TimeMs, TxHash};

/// Block/transaction coordinates shared by every decoded event or call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordContext {
    /// Emitting contract (events) or callee (calls).
    pub contract: Address,
    pub block_number: u64,
    /// Chain timestamp in seconds.
    pub timestamp: i64,
    pub tx_hash: TxHash,
    pub tx_index: u64,
    /// Log index of the event within its transaction; zero for calls.
    #[serde(default)]
    pub log_index: u64,
    /// Transaction sender.
    pub tx_from: Address,
    #[serde(default)]
    pub tx_to: Option<Address>,
    #[serde(default)]
    pub value: Amount,
    #[serde(default)]
    pub gas_price: Amount,
    #[serde(default)]
    pub gas_limit: Amount,
}

impl RecordContext {
    pub fn time_ms(&self) -> TimeMs {
        TimeMs::from_seconds(self.timestamp)
    }
}

/// One decoded event or call, ready for projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRecord {
    #[serde(flatten)]
    pub ctx: RecordContext,
    pub payload: RecordPayload,
}

/// Canonical strategy-addition parameters.
///
/// The v2 event replaced `debtLimit`/`rateLimit` with a debt ratio and
/// per-harvest bounds; as in the historical model, the ratio lands in the
/// `debt_limit` slot and `rate_limit` is zero for v2 strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyAddition {
    pub strategy: Address,
    pub debt_limit: Amount,
    pub rate_limit: Amount,
    pub min_debt_per_harvest: Amount,
    pub max_debt_per_harvest: Amount,
    pub performance_fee: Amount,
}

/// Canonical strategy-report parameters; `debt_paid` is zero for the
/// pre-0.3.2 event shape that lacked the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyReportParams {
    pub strategy: Address,
    pub gain: Amount,
    pub loss: Amount,
    pub total_gain: Amount,
    pub total_loss: Amount,
    pub total_debt: Amount,
    pub debt_added: Amount,
    pub debt_limit: Amount,
    pub debt_paid: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordPayload {
    // -- vault events ------------------------------------------------------
    DepositEvent {
        recipient: Address,
        amount: Amount,
        shares: Amount,
    },
    WithdrawEvent {
        recipient: Address,
        amount: Amount,
        shares: Amount,
    },
    TransferEvent {
        sender: Address,
        receiver: Address,
        value: Amount,
    },
    /// AddStrategy shape used by vaults 0.1.0 through 0.3.1.
    StrategyAddedV1 {
        strategy: Address,
        debt_limit: Amount,
        rate_limit: Amount,
        performance_fee: Amount,
    },
    /// AddStrategy shape used by vaults 0.3.2 and up.
    StrategyAddedV2 {
        strategy: Address,
        debt_ratio: Amount,
        min_debt_per_harvest: Amount,
        max_debt_per_harvest: Amount,
        performance_fee: Amount,
    },
    /// StrategyReported shape for vaults 0.3.0 and 0.3.1 (no `debtPaid`).
    StrategyReportedV1 {
        strategy: Address,
        gain: Amount,
        loss: Amount,
        total_gain: Amount,
        total_loss: Amount,
        total_debt: Amount,
        debt_added: Amount,
        debt_limit: Amount,
    },
    /// StrategyReported shape for vaults 0.3.2 and up.
    StrategyReportedV2 {
        strategy: Address,
        gain: Amount,
        loss: Amount,
        total_gain: Amount,
        total_loss: Amount,
        total_debt: Amount,
        debt_added: Amount,
        debt_ratio: Amount,
        debt_paid: Amount,
    },
    StrategyMigrated {
        old_version: Address,
        new_version: Address,
    },
    UpdatePerformanceFee {
        performance_fee: Amount,
    },
    UpdateManagementFee {
        management_fee: Amount,
    },
    UpdateRewards {
        rewards: Address,
    },
    UpdateGuardian {
        guardian: Address,
    },
    UpdateManagement {
        management: Address,
    },
    UpdateGovernance {
        governance: Address,
    },
    UpdateDepositLimit {
        deposit_limit: Amount,
    },
    UpdateHealthCheck {
        health_check: Address,
    },
    StrategyAddedToQueue {
        strategy: Address,
    },
    StrategyRemovedFromQueue {
        strategy: Address,
    },
    UpdateWithdrawalQueue {
        queue: Vec<Address>,
    },
    StrategyUpdateMinDebtPerHarvest {
        strategy: Address,
        min_debt_per_harvest: Amount,
    },
    StrategyUpdateMaxDebtPerHarvest {
        strategy: Address,
        max_debt_per_harvest: Amount,
    },
    StrategyUpdatePerformanceFee {
        strategy: Address,
        performance_fee: Amount,
    },

    // -- vault calls (legacy, version-gated) -------------------------------
    /// `deposit()`, `deposit(uint256)` or `deposit(uint256,address)`.
    /// `amount` is absent for the no-argument shape; `shares_minted` is the
    /// call's return value.
    DepositCall {
        caller: Address,
        #[serde(default)]
        amount: Option<Amount>,
        #[serde(default)]
        recipient: Option<Address>,
        shares_minted: Amount,
    },
    /// `withdraw()`, `withdraw(uint256)`, `withdraw(uint256,address)` or
    /// `withdraw(uint256,address,uint256)`. `shares` is absent for the
    /// no-argument shape; `amount_withdrawn` is the call's return value.
    WithdrawCall {
        caller: Address,
        #[serde(default)]
        shares: Option<Amount>,
        #[serde(default)]
        recipient: Option<Address>,
        amount_withdrawn: Amount,
    },

    // -- strategy events / calls (contract = strategy address) -------------
    Harvested {
        profit: Amount,
        loss: Amount,
        debt_payment: Amount,
        debt_outstanding: Amount,
    },
    Cloned {
        clone: Address,
    },
    /// Covers both the `setHealthCheck` call and the SetHealthCheck event.
    SetHealthCheck {
        health_check: Address,
    },
    SetDoHealthCheck {
        do_health_check: bool,
    },
    EmergencyExitEnabled,
    UpdatedKeeper {
        keeper: Address,
    },
    UpdatedStrategist {
        strategist: Address,
    },
    UpdatedStrategyRewards {
        rewards: Address,
    },

    // -- registry events (contract = registry address) ---------------------
    NewRelease {
        release_id: u64,
        template: Address,
        api_version: String,
    },
    NewVault {
        vault: Address,
        deployment_id: u64,
        api_version: String,
    },
    NewExperimentalVault {
        vault: Address,
        token: Address,
        deployer: Address,
        api_version: String,
    },
    VaultTagged {
        vault: Address,
        tag: String,
    },
}

impl RecordPayload {
    /// Normalize the two AddStrategy shapes into one canonical record.
    pub fn as_strategy_addition(&self) -> Option<StrategyAddition> {
        match self {
            RecordPayload::StrategyAddedV1 {
                strategy,
                debt_limit,
                rate_limit,
                performance_fee,
            } => Some(StrategyAddition {
                strategy: strategy.clone(),
                debt_limit: debt_limit.clone(),
                rate_limit: rate_limit.clone(),
                min_debt_per_harvest: Amount::zero(),
                max_debt_per_harvest: Amount::zero(),
                performance_fee: performance_fee.clone(),
            }),
            RecordPayload::StrategyAddedV2 {
                strategy,
                debt_ratio,
                min_debt_per_harvest,
                max_debt_per_harvest,
                performance_fee,
            } => Some(StrategyAddition {
                strategy: strategy.clone(),
                debt_limit: debt_ratio.clone(),
                rate_limit: Amount::zero(),
                min_debt_per_harvest: min_debt_per_harvest.clone(),
                max_debt_per_harvest: max_debt_per_harvest.clone(),
                performance_fee: performance_fee.clone(),
            }),
            _ => None,
        }
    }

    /// Normalize the two StrategyReported shapes into one canonical record.
    pub fn as_strategy_report(&self) -> Option<StrategyReportParams> {
        match self {
            RecordPayload::StrategyReportedV1 {
                strategy,
                gain,
                loss,
                total_gain,
                total_loss,
                total_debt,
                debt_added,
                debt_limit,
            } => Some(StrategyReportParams {
                strategy: strategy.clone(),
                gain: gain.clone(),
                loss: loss.clone(),
                total_gain: total_gain.clone(),
                total_loss: total_loss.clone(),
                total_debt: total_debt.clone(),
                debt_added: debt_added.clone(),
                debt_limit: debt_limit.clone(),
                debt_paid: Amount::zero(),
            }),
            RecordPayload::StrategyReportedV2 {
                strategy,
                gain,
                loss,
                total_gain,
                total_loss,
                total_debt,
                debt_added,
                debt_ratio,
                debt_paid,
            } => Some(StrategyReportParams {
                strategy: strategy.clone(),
                gain: gain.clone(),
                loss: loss.clone(),
                total_gain: total_gain.clone(),
                total_loss: total_loss.clone(),
                total_debt: total_debt.clone(),
                debt_added: debt_added.clone(),
                debt_limit: debt_ratio.clone(),
                debt_paid: debt_paid.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn a(s: &str) -> Amount {
        Amount::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_strategy_added_v1_normalizes() {
        let payload = RecordPayload::StrategyAddedV1 {
            strategy: addr(9),
            debt_limit: a("1000"),
            rate_limit: a("50"),
            performance_fee: a("1000"),
        };
        let normalized = payload.as_strategy_addition().unwrap();
        assert_eq!(normalized.debt_limit, a("1000"));
        assert_eq!(normalized.rate_limit, a("50"));
        assert_eq!(normalized.min_debt_per_harvest, Amount::zero());
        assert_eq!(normalized.max_debt_per_harvest, Amount::zero());
    }

    #[test]
    fn test_strategy_added_v2_normalizes() {
        let payload = RecordPayload::StrategyAddedV2 {
            strategy: addr(9),
            debt_ratio: a("9500"),
            min_debt_per_harvest: a("1"),
            max_debt_per_harvest: a("100"),
            performance_fee: a("1000"),
        };
        let normalized = payload.as_strategy_addition().unwrap();
        assert_eq!(normalized.debt_limit, a("9500"));
        assert_eq!(normalized.rate_limit, Amount::zero());
        assert_eq!(normalized.min_debt_per_harvest, a("1"));
    }

    #[test]
    fn test_report_v1_synthesizes_zero_debt_paid() {
        let payload = RecordPayload::StrategyReportedV1 {
            strategy: addr(9),
            gain: a("10"),
            loss: a("0"),
            total_gain: a("10"),
            total_loss: a("0"),
            total_debt: a("100"),
            debt_added: a("0"),
            debt_limit: a("9500"),
        };
        let report = payload.as_strategy_report().unwrap();
        assert_eq!(report.debt_paid, Amount::zero());
    }

    #[test]
    fn test_record_json_roundtrip() {
        let record = ChainRecord {
            ctx: RecordContext {
                contract: addr(1),
                block_number: 11557079,
                timestamp: 1640995200,
                tx_hash: TxHash::parse(&format!("0x{:064x}", 7)).unwrap(),
                tx_index: 3,
                log_index: 2,
                tx_from: addr(2),
                tx_to: Some(addr(1)),
                value: Amount::zero(),
                gas_price: Amount::zero(),
                gas_limit: Amount::zero(),
            },
            payload: RecordPayload::DepositEvent {
                recipient: addr(2),
                amount: a("79056085"),
                shares: a("79056085"),
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ChainRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_deposit_call_optional_fields_default() {
        let json = r#"{
            "contract": "0x0000000000000000000000000000000000000001",
            "block_number": 1,
            "timestamp": 1640995200,
            "tx_hash": "0x0000000000000000000000000000000000000000000000000000000000000007",
            "tx_index": 0,
            "tx_from": "0x0000000000000000000000000000000000000002",
            "payload": {
                "kind": "deposit_call",
                "caller": "0x0000000000000000000000000000000000000002",
                "shares_minted": "500"
            }
        }"#;
        let record: ChainRecord = serde_json::from_str(json).unwrap();
        match record.payload {
            RecordPayload::DepositCall { amount, recipient, .. } => {
                assert!(amount.is_none());
                assert!(recipient.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
        assert_eq!(record.ctx.log_index, 0);
    }
}
