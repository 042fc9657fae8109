//! Strategy projection.

use tracing::{debug, error, info, warn};

use crate::chain::{address_or_zero, bool_or_false, string_or, ChainState};
use crate::domain::{Address, Amount, StrategyAddition};
use crate::engine::vault as vault_engine;
use crate::entities::{
    Harvest, Strategy, StrategyMigration, StrategyReport, StrategyReportResult, Transaction,
    Vault,
};
use crate::store::EntityStore;

/// Create the strategy if it is not already known; a repeated add event is
/// a no-op returning the existing record.
pub fn create_and_get(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    vault_address: &Address,
    addition: &StrategyAddition,
    cloned_from: Option<String>,
    tx: &Transaction,
) -> Strategy {
    let id = Strategy::build_id(&addition.strategy);
    if let Some(existing) = store.strategies.get(&id) {
        return existing.clone();
    }
    info!(
        strategy = %id, vault = %vault_address, tx = %tx.id,
        "creating strategy"
    );
    let strategy_address = &addition.strategy;
    let strategy = Strategy {
        id: id.clone(),
        address: strategy_address.clone(),
        vault: vault_address.to_string(),
        name: string_or(chain.strategy_name(strategy_address), "TBD"),
        api_version: string_or(chain.api_version(strategy_address), "0"),
        transaction: tx.id.clone(),
        timestamp: tx.timestamp,
        block_number: tx.block_number,
        debt_limit: addition.debt_limit.clone(),
        rate_limit: addition.rate_limit.clone(),
        min_debt_per_harvest: addition.min_debt_per_harvest.clone(),
        max_debt_per_harvest: addition.max_debt_per_harvest.clone(),
        performance_fee_bps: addition.performance_fee.clone(),
        keeper: address_or_zero(chain.strategy_keeper(strategy_address)),
        strategist: address_or_zero(chain.strategy_strategist(strategy_address)),
        rewards: address_or_zero(chain.rewards(strategy_address)),
        emergency_exit: bool_or_false(chain.strategy_emergency_exit(strategy_address)),
        health_check: chain.strategy_health_check(strategy_address).ok(),
        do_health_check: bool_or_false(chain.strategy_do_health_check(strategy_address)),
        in_queue: true,
        cloned_from,
        latest_report: None,
    };
    store.strategies.insert(id, strategy.clone());
    strategy
}

/// Record a normalized harvest report, advance the strategy's latest-report
/// pointer, and diff it against the prior report when one exists.
pub fn create_report(
    store: &mut EntityStore,
    params: &crate::domain::StrategyReportParams,
    tx: &Transaction,
) -> Option<StrategyReport> {
    let strategy_id = Strategy::build_id(&params.strategy);
    let Some(mut strategy) = store.strategies.get(&strategy_id).cloned() else {
        warn!(
            strategy = %strategy_id, tx = %tx.id,
            "failed to load strategy while handling report"
        );
        return None;
    };

    let prior_report_id = strategy.latest_report.clone();
    let report_id = StrategyReport::build_id(&strategy_id, &tx.id);
    let report = match store.strategy_reports.get(&report_id) {
        Some(existing) => {
            debug!(id = %report_id, "report already recorded");
            existing.clone()
        }
        None => {
            let report = StrategyReport {
                id: report_id.clone(),
                strategy: strategy_id.clone(),
                transaction: tx.id.clone(),
                timestamp: tx.timestamp,
                block_number: tx.block_number,
                gain: params.gain.clone(),
                loss: params.loss.clone(),
                total_gain: params.total_gain.clone(),
                total_loss: params.total_loss.clone(),
                total_debt: params.total_debt.clone(),
                debt_added: params.debt_added.clone(),
                debt_limit: params.debt_limit.clone(),
                debt_paid: params.debt_paid.clone(),
            };
            store.strategy_reports.insert(report_id.clone(), report.clone());
            report
        }
    };

    strategy.latest_report = Some(report.id.clone());
    store.strategies.insert(strategy_id.clone(), strategy);

    match prior_report_id {
        Some(prior_id) if prior_id != report.id => {
            if let Some(prior) = store.strategy_reports.get(&prior_id).cloned() {
                create_report_result(store, &prior, &report, tx);
            }
        }
        Some(_) => {}
        None => {
            info!(
                report = %report.id, strategy = %strategy_id,
                "first report for strategy, no report result"
            );
        }
    }

    Some(report)
}

fn create_report_result(
    store: &mut EntityStore,
    prior: &StrategyReport,
    latest: &StrategyReport,
    tx: &Transaction,
) {
    let id = StrategyReportResult::build_id(&prior.id, &latest.id);
    if store.strategy_report_results.contains_key(&id) {
        return;
    }
    let result = StrategyReportResult {
        id: id.clone(),
        strategy: latest.strategy.clone(),
        prior_report: prior.id.clone(),
        latest_report: latest.id.clone(),
        transaction: tx.id.clone(),
        timestamp: tx.timestamp,
        block_number: tx.block_number,
        duration_ms: latest.timestamp.as_ms() - prior.timestamp.as_ms(),
        total_gain_delta: &latest.total_gain - &prior.total_gain,
        total_loss_delta: &latest.total_loss - &prior.total_loss,
        total_debt_delta: &latest.total_debt - &prior.total_debt,
    };
    store.strategy_report_results.insert(id, result);
}

/// Record one harvest execution; re-processing the same
/// `(strategy, tx, index)` triple is a diagnostic no-op.
#[allow(clippy::too_many_arguments)]
pub fn harvest(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    harvester: &Address,
    strategy_address: &Address,
    profit: &Amount,
    loss: &Amount,
    debt_payment: &Amount,
    debt_outstanding: &Amount,
    tx: &Transaction,
) {
    let strategy_id = Strategy::build_id(strategy_address);
    let harvest_id = Harvest::build_id(&strategy_id, tx.tx_hash.as_str(), tx.tx_index);
    if store.harvests.contains_key(&harvest_id) {
        warn!(id = %harvest_id, tx = %tx.id, "harvest already recorded");
        return;
    }
    let vault = address_or_zero(chain.strategy_vault(strategy_address)).to_string();
    let harvest = Harvest {
        id: harvest_id.clone(),
        strategy: strategy_id,
        vault,
        harvester: harvester.clone(),
        transaction: tx.id.clone(),
        timestamp: tx.timestamp,
        block_number: tx.block_number,
        profit: profit.clone(),
        loss: loss.clone(),
        debt_payment: debt_payment.clone(),
        debt_outstanding: debt_outstanding.clone(),
    };
    store.harvests.insert(harvest_id, harvest);
}

/// A clone starts with no allocated debt: zeroed limits, `cloned_from` set.
pub fn cloned(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    clone_address: &Address,
    from_strategy_address: &Address,
    tx: &Transaction,
) {
    info!(
        clone = %clone_address, from = %from_strategy_address, tx = %tx.id,
        "strategy cloned"
    );
    let cloned_from = store
        .strategies
        .get(&Strategy::build_id(from_strategy_address))
        .map(|s| s.id.clone());
    let vault_address = match chain.strategy_vault(clone_address) {
        Ok(vault) => vault,
        Err(_) => {
            warn!(clone = %clone_address, "clone's vault() read reverted");
            Address::zero()
        }
    };
    let addition = StrategyAddition {
        strategy: clone_address.clone(),
        debt_limit: Amount::zero(),
        rate_limit: Amount::zero(),
        min_debt_per_harvest: Amount::zero(),
        max_debt_per_harvest: Amount::zero(),
        performance_fee: Amount::zero(),
    };
    create_and_get(store, chain, &vault_address, &addition, cloned_from, tx);
}

/// Migration: record the replacement, create the successor inheriting the
/// old limits, and drop the old strategy from the withdrawal queue.
pub fn migrated(
    store: &mut EntityStore,
    chain: &dyn ChainState,
    vault_address: &Address,
    old_address: &Address,
    new_address: &Address,
    tx: &Transaction,
) {
    info!(
        old = %old_address, new = %new_address, tx = %tx.id,
        "strategy migrated"
    );
    let old_id = Strategy::build_id(old_address);
    let Some(old_strategy) = store.strategies.get(&old_id).cloned() else {
        warn!(strategy = %old_id, tx = %tx.id, "migration from unknown strategy");
        return;
    };

    let new_id = Strategy::build_id(new_address);
    let migration_id = StrategyMigration::build_id(&old_id, &new_id);
    if !store.strategy_migrations.contains_key(&migration_id) {
        let migration = StrategyMigration {
            id: migration_id.clone(),
            old_strategy: old_id.clone(),
            new_strategy: new_id.clone(),
            transaction: tx.id.clone(),
            timestamp: tx.timestamp,
            block_number: tx.block_number,
        };
        store.strategy_migrations.insert(migration_id, migration);
    }

    if store.strategies.contains_key(&new_id) {
        warn!(strategy = %new_id, "migrating to a strategy that already exists");
    } else {
        let addition = StrategyAddition {
            strategy: new_address.clone(),
            debt_limit: old_strategy.debt_limit.clone(),
            rate_limit: old_strategy.rate_limit.clone(),
            min_debt_per_harvest: old_strategy.min_debt_per_harvest.clone(),
            max_debt_per_harvest: old_strategy.max_debt_per_harvest.clone(),
            performance_fee: old_strategy.performance_fee_bps.clone(),
        };
        create_and_get(store, chain, vault_address, &addition, None, tx);
    }

    vault_engine::strategy_removed_from_queue(store, vault_address, old_address, tx);
}

fn with_strategy<F>(store: &mut EntityStore, strategy_address: &Address, tx: &Transaction, label: &str, apply: F)
where
    F: FnOnce(&mut Strategy),
{
    let id = Strategy::build_id(strategy_address);
    match store.strategies.get(&id).cloned() {
        Some(mut strategy) => {
            apply(&mut strategy);
            store.strategies.insert(id, strategy);
        }
        None => {
            warn!(strategy = %id, tx = %tx.id, "{} for unknown strategy", label);
        }
    }
}

pub fn health_check_set(
    store: &mut EntityStore,
    strategy_address: &Address,
    health_check: &Address,
    tx: &Transaction,
) {
    info!(strategy = %strategy_address, health_check = %health_check, "strategy health check set");
    with_strategy(store, strategy_address, tx, "health check set", |strategy| {
        strategy.health_check = Some(health_check.clone());
    });
}

pub fn do_health_check_set(
    store: &mut EntityStore,
    strategy_address: &Address,
    do_health_check: bool,
    tx: &Transaction,
) {
    info!(strategy = %strategy_address, do_health_check, "strategy health check flag set");
    with_strategy(store, strategy_address, tx, "health check flag set", |strategy| {
        strategy.do_health_check = do_health_check;
    });
}

pub fn emergency_exit_enabled(store: &mut EntityStore, strategy_address: &Address, tx: &Transaction) {
    info!(strategy = %strategy_address, "strategy emergency exit enabled");
    with_strategy(store, strategy_address, tx, "emergency exit", |strategy| {
        strategy.emergency_exit = true;
    });
}

pub fn updated_keeper(store: &mut EntityStore, strategy_address: &Address, keeper: &Address, tx: &Transaction) {
    info!(strategy = %strategy_address, keeper = %keeper, "strategy keeper updated");
    with_strategy(store, strategy_address, tx, "keeper update", |strategy| {
        strategy.keeper = keeper.clone();
    });
}

pub fn updated_strategist(
    store: &mut EntityStore,
    strategy_address: &Address,
    strategist: &Address,
    tx: &Transaction,
) {
    info!(strategy = %strategy_address, strategist = %strategist, "strategist updated");
    with_strategy(store, strategy_address, tx, "strategist update", |strategy| {
        strategy.strategist = strategist.clone();
    });
}

pub fn updated_rewards(store: &mut EntityStore, strategy_address: &Address, rewards: &Address, tx: &Transaction) {
    info!(strategy = %strategy_address, rewards = %rewards, "strategy rewards updated");
    with_strategy(store, strategy_address, tx, "rewards update", |strategy| {
        strategy.rewards = rewards.clone();
    });
}

/// Debt/fee updates carry a vault address in the triggering event; a
/// strategy not linked to that vault is an invariant violation and aborts
/// this event without partial mutation.
fn with_vault_linked_strategy<F>(
    store: &mut EntityStore,
    vault_address: &Address,
    strategy_address: &Address,
    tx: &Transaction,
    label: &str,
    apply: F,
) where
    F: FnOnce(&mut Strategy),
{
    let vault_id = Vault::build_id(vault_address);
    if !store.vaults.contains_key(&vault_id) {
        error!(vault = %vault_id, tx = %tx.id, "{}: vault entity does not exist", label);
        return;
    }
    let strategy_id = Strategy::build_id(strategy_address);
    let Some(mut strategy) = store.strategies.get(&strategy_id).cloned() else {
        error!(strategy = %strategy_id, tx = %tx.id, "{}: strategy entity does not exist", label);
        return;
    };
    if strategy.vault != vault_id {
        error!(
            strategy = %strategy_id, vault = %vault_id, tx = %tx.id,
            "{}: strategy is not linked to this vault", label
        );
        return;
    }
    apply(&mut strategy);
    store.strategies.insert(strategy_id, strategy);
}

pub fn update_max_debt_per_harvest(
    store: &mut EntityStore,
    vault_address: &Address,
    strategy_address: &Address,
    max_debt_per_harvest: &Amount,
    tx: &Transaction,
) {
    with_vault_linked_strategy(
        store,
        vault_address,
        strategy_address,
        tx,
        "maxDebtPerHarvest update",
        |strategy| {
            strategy.max_debt_per_harvest = max_debt_per_harvest.clone();
        },
    );
}

pub fn update_min_debt_per_harvest(
    store: &mut EntityStore,
    vault_address: &Address,
    strategy_address: &Address,
    min_debt_per_harvest: &Amount,
    tx: &Transaction,
) {
    with_vault_linked_strategy(
        store,
        vault_address,
        strategy_address,
        tx,
        "minDebtPerHarvest update",
        |strategy| {
            strategy.min_debt_per_harvest = min_debt_per_harvest.clone();
        },
    );
}

pub fn update_performance_fee(
    store: &mut EntityStore,
    vault_address: &Address,
    strategy_address: &Address,
    performance_fee: &Amount,
    tx: &Transaction,
) {
    with_vault_linked_strategy(
        store,
        vault_address,
        strategy_address,
        tx,
        "performanceFee update",
        |strategy| {
            strategy.performance_fee_bps = performance_fee.clone();
        },
    );
}
