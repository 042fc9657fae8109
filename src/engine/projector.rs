//! Record dispatch.
//!
//! One `apply` per decoded record, in stream order. Handlers never fail:
//! data-quality conditions are logged and the stream continues.

use std::sync::Arc;

use tracing::info;

use crate::chain::{amount_or_zero, ChainState};
use crate::domain::{Amount, ChainRecord, RecordPayload};
use crate::engine::{filters, registry, strategy, transaction, vault};
use crate::pricing::UsdPriceResolver;
use crate::store::EntityStore;

pub struct Projector {
    store: EntityStore,
    chain: Arc<dyn ChainState>,
    prices: UsdPriceResolver,
}

impl Projector {
    pub fn new(chain: Arc<dyn ChainState>, prices: UsdPriceResolver) -> Self {
        Projector {
            store: EntityStore::new(),
            chain,
            prices,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn into_store(self) -> EntityStore {
        self.store
    }

    /// Fold one record into the entity store.
    pub fn apply(&mut self, record: &ChainRecord) {
        let ctx = &record.ctx;
        let chain = self.chain.clone();
        let chain = chain.as_ref();

        match &record.payload {
            RecordPayload::DepositEvent {
                recipient,
                amount,
                shares,
            } => {
                let tx = transaction::get_or_create_transaction(&mut self.store, ctx, "DepositEvent");
                vault::deposit(
                    &mut self.store,
                    chain,
                    &self.prices,
                    &ctx.contract,
                    &tx,
                    recipient,
                    amount,
                    shares,
                );
            }
            RecordPayload::WithdrawEvent {
                recipient,
                amount,
                shares,
            } => {
                let tx =
                    transaction::get_or_create_transaction(&mut self.store, ctx, "WithdrawEvent");
                vault::withdraw(
                    &mut self.store,
                    chain,
                    &self.prices,
                    &ctx.contract,
                    recipient,
                    amount,
                    shares,
                    &tx,
                );
            }
            RecordPayload::DepositCall {
                caller,
                amount,
                recipient,
                shares_minted,
            } => {
                if filters::should_skip_deposit_call(
                    &self.store,
                    chain,
                    &ctx.contract,
                    caller,
                    &ctx.tx_hash,
                ) {
                    return;
                }
                let cause = match (amount, recipient) {
                    (None, _) => "vault.deposit()",
                    (Some(_), None) => "vault.deposit(uint)",
                    (Some(_), Some(_)) => "vault.deposit(uint,address)",
                };
                let tx = transaction::get_or_create_transaction(&mut self.store, ctx, cause);
                // A max-uint256 amount is the contract's "deposit all"
                // sentinel; the real amount is back-derived from the shares.
                let deposited = match amount {
                    Some(amount) if *amount != Amount::max_uint256() => amount.clone(),
                    _ => vault::calculate_amount_deposited(chain, &ctx.contract, shares_minted),
                };
                let receiver = recipient.clone().unwrap_or_else(|| caller.clone());
                vault::deposit(
                    &mut self.store,
                    chain,
                    &self.prices,
                    &ctx.contract,
                    &tx,
                    &receiver,
                    &deposited,
                    shares_minted,
                );
            }
            RecordPayload::WithdrawCall {
                caller,
                shares,
                recipient,
                amount_withdrawn,
            } => {
                if filters::should_skip_withdraw_call(
                    &self.store,
                    chain,
                    &ctx.contract,
                    caller,
                    &ctx.tx_hash,
                ) {
                    return;
                }
                let cause = match (shares, recipient) {
                    (None, _) => "vault.withdraw()",
                    (Some(_), None) => "vault.withdraw(uint256)",
                    (Some(_), Some(_)) => "vault.withdraw(uint256,address)",
                };
                let tx = transaction::get_or_create_transaction(&mut self.store, ctx, cause);
                let shares_burnt = match shares {
                    Some(shares) => shares.clone(),
                    None => {
                        let total_assets = amount_or_zero(chain.total_assets(&ctx.contract));
                        let total_supply = amount_or_zero(chain.total_supply(&ctx.contract));
                        if total_assets.is_zero() {
                            amount_withdrawn.clone()
                        } else {
                            amount_withdrawn.mul_div(&total_supply, &total_assets)
                        }
                    }
                };
                vault::withdraw(
                    &mut self.store,
                    chain,
                    &self.prices,
                    &ctx.contract,
                    caller,
                    amount_withdrawn,
                    &shares_burnt,
                    &tx,
                );
            }
            RecordPayload::TransferEvent {
                sender,
                receiver,
                value,
            } => {
                if sender.is_zero() || receiver.is_zero() {
                    // Mint/burn transfers are covered by deposit/withdraw.
                    return;
                }
                if !self.store.is_vault(&ctx.contract) {
                    info!(
                        tx = %ctx.tx_hash,
                        "transfer is not on behalf of a vault entity, not processing"
                    );
                    return;
                }
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "vault.transfer(address,uint256)",
                );
                vault::share_transfer(
                    &mut self.store,
                    chain,
                    &self.prices,
                    &ctx.contract,
                    sender,
                    receiver,
                    value,
                    &tx,
                );
            }
            RecordPayload::StrategyAddedV1 { .. } | RecordPayload::StrategyAddedV2 { .. } => {
                let cause = match &record.payload {
                    RecordPayload::StrategyAddedV1 { .. } => "AddStrategyV1Event",
                    _ => "AddStrategyV2Event",
                };
                let Some(addition) = record.payload.as_strategy_addition() else {
                    return;
                };
                let tx = transaction::get_or_create_transaction(&mut self.store, ctx, cause);
                strategy::create_and_get(
                    &mut self.store,
                    chain,
                    &ctx.contract,
                    &addition,
                    None,
                    &tx,
                );
            }
            RecordPayload::StrategyReportedV1 { .. }
            | RecordPayload::StrategyReportedV2 { .. } => {
                let Some(params) = record.payload.as_strategy_report() else {
                    return;
                };
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "StrategyReportedEvent",
                );
                let Some(report) = strategy::create_report(&mut self.store, &params, &tx) else {
                    return;
                };
                vault::strategy_reported(
                    &mut self.store,
                    chain,
                    &self.prices,
                    &ctx.contract,
                    &tx,
                    &report,
                );
            }
            RecordPayload::StrategyMigrated {
                old_version,
                new_version,
            } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "StrategyMigratedEvent",
                );
                strategy::migrated(
                    &mut self.store,
                    chain,
                    &ctx.contract,
                    old_version,
                    new_version,
                    &tx,
                );
            }
            RecordPayload::UpdatePerformanceFee { performance_fee } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdatePerformanceFee",
                );
                vault::performance_fee_updated(
                    &mut self.store,
                    chain,
                    &self.prices,
                    &ctx.contract,
                    &tx,
                    performance_fee,
                );
            }
            RecordPayload::UpdateManagementFee { management_fee } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdateManagementFee",
                );
                vault::management_fee_updated(
                    &mut self.store,
                    chain,
                    &self.prices,
                    &ctx.contract,
                    &tx,
                    management_fee,
                );
            }
            RecordPayload::UpdateRewards { rewards } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdateRewardsEvent",
                );
                vault::rewards_updated(
                    &mut self.store,
                    chain,
                    &self.prices,
                    &ctx.contract,
                    &tx,
                    rewards,
                );
            }
            RecordPayload::UpdateGuardian { guardian } => {
                let tx =
                    transaction::get_or_create_transaction(&mut self.store, ctx, "UpdateGuardian");
                vault::guardian_updated(&mut self.store, &ctx.contract, guardian, &tx);
            }
            RecordPayload::UpdateManagement { management } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdateManagement",
                );
                vault::management_updated(&mut self.store, &ctx.contract, management, &tx);
            }
            RecordPayload::UpdateGovernance { governance } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdateGovernance",
                );
                vault::governance_updated(&mut self.store, &ctx.contract, governance, &tx);
            }
            RecordPayload::UpdateDepositLimit { deposit_limit } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdateDepositLimit",
                );
                vault::deposit_limit_updated(
                    &mut self.store,
                    chain,
                    &ctx.contract,
                    deposit_limit,
                    &tx,
                );
            }
            RecordPayload::UpdateHealthCheck { health_check } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdateHealthCheck",
                );
                vault::health_check_updated(
                    &mut self.store,
                    chain,
                    &self.prices,
                    &ctx.contract,
                    health_check,
                    &tx,
                );
            }
            RecordPayload::StrategyAddedToQueue { strategy } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "StrategyAddedToQueue",
                );
                vault::strategy_added_to_queue(&mut self.store, &ctx.contract, strategy, &tx);
            }
            RecordPayload::StrategyRemovedFromQueue { strategy } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "StrategyRemovedFromQueue",
                );
                vault::strategy_removed_from_queue(&mut self.store, &ctx.contract, strategy, &tx);
            }
            RecordPayload::UpdateWithdrawalQueue { queue } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdateWithdrawalQueue",
                );
                vault::replace_withdrawal_queue(&mut self.store, &ctx.contract, queue, &tx);
            }
            RecordPayload::StrategyUpdateMinDebtPerHarvest {
                strategy: strategy_address,
                min_debt_per_harvest,
            } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdateMinDebtPerHarvest",
                );
                strategy::update_min_debt_per_harvest(
                    &mut self.store,
                    &ctx.contract,
                    strategy_address,
                    min_debt_per_harvest,
                    &tx,
                );
            }
            RecordPayload::StrategyUpdateMaxDebtPerHarvest {
                strategy: strategy_address,
                max_debt_per_harvest,
            } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdateMaxDebtPerHarvest",
                );
                strategy::update_max_debt_per_harvest(
                    &mut self.store,
                    &ctx.contract,
                    strategy_address,
                    max_debt_per_harvest,
                    &tx,
                );
            }
            RecordPayload::StrategyUpdatePerformanceFee {
                strategy: strategy_address,
                performance_fee,
            } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "StrategyUpdatePerformanceFeeEvent",
                );
                strategy::update_performance_fee(
                    &mut self.store,
                    &ctx.contract,
                    strategy_address,
                    performance_fee,
                    &tx,
                );
            }
            RecordPayload::Harvested {
                profit,
                loss,
                debt_payment,
                debt_outstanding,
            } => {
                let tx =
                    transaction::get_or_create_transaction(&mut self.store, ctx, "Harvested");
                strategy::harvest(
                    &mut self.store,
                    chain,
                    &ctx.tx_from,
                    &ctx.contract,
                    profit,
                    loss,
                    debt_payment,
                    debt_outstanding,
                    &tx,
                );
            }
            RecordPayload::Cloned { clone } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "StrategyCloned",
                );
                strategy::cloned(&mut self.store, chain, clone, &ctx.contract, &tx);
            }
            RecordPayload::SetHealthCheck { health_check } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "SetHealthCheck",
                );
                strategy::health_check_set(&mut self.store, &ctx.contract, health_check, &tx);
            }
            RecordPayload::SetDoHealthCheck { do_health_check } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "SetDoHealthCheck",
                );
                strategy::do_health_check_set(
                    &mut self.store,
                    &ctx.contract,
                    *do_health_check,
                    &tx,
                );
            }
            RecordPayload::EmergencyExitEnabled => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "EmergencyExitEnabled",
                );
                strategy::emergency_exit_enabled(&mut self.store, &ctx.contract, &tx);
            }
            RecordPayload::UpdatedKeeper { keeper } => {
                let tx =
                    transaction::get_or_create_transaction(&mut self.store, ctx, "UpdatedKeeper");
                strategy::updated_keeper(&mut self.store, &ctx.contract, keeper, &tx);
            }
            RecordPayload::UpdatedStrategist { strategist } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdatedStrategist",
                );
                strategy::updated_strategist(&mut self.store, &ctx.contract, strategist, &tx);
            }
            RecordPayload::UpdatedStrategyRewards { rewards } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "UpdatedRewards",
                );
                strategy::updated_rewards(&mut self.store, &ctx.contract, rewards, &tx);
            }
            RecordPayload::NewRelease {
                template,
                api_version,
                ..
            } => {
                let tx =
                    transaction::get_or_create_transaction(&mut self.store, ctx, "NewRelease");
                registry::new_release(
                    &mut self.store,
                    chain,
                    &ctx.contract,
                    template,
                    api_version,
                    &tx,
                );
            }
            RecordPayload::NewVault {
                vault: vault_address,
                api_version,
                ..
            } => {
                let tx = transaction::get_or_create_transaction(&mut self.store, ctx, "NewVault");
                registry::new_vault(
                    &mut self.store,
                    chain,
                    &ctx.contract,
                    vault_address,
                    api_version,
                    &tx,
                );
            }
            RecordPayload::NewExperimentalVault {
                vault: vault_address,
                api_version,
                ..
            } => {
                let tx = transaction::get_or_create_transaction(
                    &mut self.store,
                    ctx,
                    "NewExperimentalVault",
                );
                registry::new_experimental_vault(
                    &mut self.store,
                    chain,
                    &ctx.contract,
                    vault_address,
                    api_version,
                    &tx,
                );
            }
            RecordPayload::VaultTagged {
                vault: vault_address,
                tag,
            } => {
                transaction::get_or_create_transaction(&mut self.store, ctx, "VaultTagged");
                registry::vault_tagged(&mut self.store, vault_address, tag);
            }
        }
    }
}
