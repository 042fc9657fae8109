//! Upsert-by-key persistence and read queries.
//!
//! Every entity row is `INSERT OR REPLACE`d under its deterministic id, so
//! re-persisting a store after reprocessing the same stream converges on
//! identical rows.

use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::domain::Amount;
use crate::store::EntityStore;

pub struct Repository {
    pool: SqlitePool,
}

fn amount_opt(value: &Option<Amount>) -> Option<String> {
    value.as_ref().map(|a| a.to_canonical_string())
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Persist the full entity set in one transaction. Returns the number
    /// of rows written.
    pub async fn persist_store(&self, store: &EntityStore) -> Result<usize, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for account in store.accounts.values() {
            sqlx::query("INSERT OR REPLACE INTO accounts (id, address) VALUES (?, ?)")
                .bind(&account.id)
                .bind(account.address.as_str())
                .execute(&mut *tx)
                .await?;
        }

        for token in store.tokens.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO tokens (id, address, decimals, symbol, name) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&token.id)
            .bind(token.address.as_str())
            .bind(token.decimals as i64)
            .bind(&token.symbol)
            .bind(&token.name)
            .execute(&mut *tx)
            .await?;
        }

        for t in store.transactions.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO transactions \
                 (id, tx_hash, log_index, tx_index, from_address, to_address, value, \
                  gas_price, gas_limit, block_number, timestamp, cause) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&t.id)
            .bind(t.tx_hash.as_str())
            .bind(t.log_index as i64)
            .bind(t.tx_index as i64)
            .bind(t.from.as_str())
            .bind(t.to.as_ref().map(|a| a.as_str().to_string()))
            .bind(t.value.to_canonical_string())
            .bind(t.gas_price.to_canonical_string())
            .bind(t.gas_limit.to_canonical_string())
            .bind(t.block_number as i64)
            .bind(t.timestamp.as_ms())
            .bind(&t.cause)
            .execute(&mut *tx)
            .await?;
        }

        for vault in store.vaults.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO vaults \
                 (id, address, token, share_token, registry, classification, api_version, tx, \
                  tags, balance_tokens, balance_tokens_idle, shares_supply, deposit_limit, \
                  available_deposit_limit, management_fee_bps, performance_fee_bps, rewards, \
                  management, guardian, governance, health_check, activation, withdrawal_queue, \
                  latest_update) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&vault.id)
            .bind(vault.address.as_str())
            .bind(&vault.token)
            .bind(&vault.share_token)
            .bind(&vault.registry)
            .bind(vault.classification.as_str())
            .bind(&vault.api_version)
            .bind(&vault.transaction)
            .bind(serde_json::to_string(&vault.tags).unwrap_or_default())
            .bind(vault.balance_tokens.to_canonical_string())
            .bind(vault.balance_tokens_idle.to_canonical_string())
            .bind(vault.shares_supply.to_canonical_string())
            .bind(vault.deposit_limit.to_canonical_string())
            .bind(vault.available_deposit_limit.to_canonical_string())
            .bind(vault.management_fee_bps as i64)
            .bind(vault.performance_fee_bps as i64)
            .bind(vault.rewards.as_str())
            .bind(vault.management.as_str())
            .bind(vault.guardian.as_str())
            .bind(vault.governance.as_str())
            .bind(vault.health_check.as_ref().map(|a| a.as_str().to_string()))
            .bind(vault.activation.to_canonical_string())
            .bind(serde_json::to_string(&vault.withdrawal_queue).unwrap_or_default())
            .bind(&vault.latest_update)
            .execute(&mut *tx)
            .await?;
        }

        for update in store.vault_updates.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO vault_updates \
                 (id, vault, tx, timestamp, block_number, tokens_deposited, tokens_withdrawn, \
                  shares_minted, shares_burnt, balance_position, returns_generated, total_fees, \
                  price_per_share, current_balance_tokens, new_management_fee, \
                  new_performance_fee, new_rewards, new_health_check, health_check_cleared) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&update.id)
            .bind(&update.vault)
            .bind(&update.transaction)
            .bind(update.timestamp.as_ms())
            .bind(update.block_number as i64)
            .bind(update.tokens_deposited.to_canonical_string())
            .bind(update.tokens_withdrawn.to_canonical_string())
            .bind(update.shares_minted.to_canonical_string())
            .bind(update.shares_burnt.to_canonical_string())
            .bind(update.balance_position.to_canonical_string())
            .bind(update.returns_generated.to_canonical_string())
            .bind(update.total_fees.to_canonical_string())
            .bind(update.price_per_share.to_canonical_string())
            .bind(update.current_balance_tokens.to_canonical_string())
            .bind(amount_opt(&update.new_management_fee))
            .bind(amount_opt(&update.new_performance_fee))
            .bind(update.new_rewards.as_ref().map(|a| a.as_str().to_string()))
            .bind(update.new_health_check.as_ref().map(|a| a.as_str().to_string()))
            .bind(update.health_check_cleared as i64)
            .execute(&mut *tx)
            .await?;
        }

        for strategy in store.strategies.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO strategies \
                 (id, address, vault, name, api_version, tx, timestamp, block_number, \
                  debt_limit, rate_limit, min_debt_per_harvest, max_debt_per_harvest, \
                  performance_fee_bps, keeper, strategist, rewards, emergency_exit, \
                  health_check, do_health_check, in_queue, cloned_from, latest_report) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&strategy.id)
            .bind(strategy.address.as_str())
            .bind(&strategy.vault)
            .bind(&strategy.name)
            .bind(&strategy.api_version)
            .bind(&strategy.transaction)
            .bind(strategy.timestamp.as_ms())
            .bind(strategy.block_number as i64)
            .bind(strategy.debt_limit.to_canonical_string())
            .bind(strategy.rate_limit.to_canonical_string())
            .bind(strategy.min_debt_per_harvest.to_canonical_string())
            .bind(strategy.max_debt_per_harvest.to_canonical_string())
            .bind(strategy.performance_fee_bps.to_canonical_string())
            .bind(strategy.keeper.as_str())
            .bind(strategy.strategist.as_str())
            .bind(strategy.rewards.as_str())
            .bind(strategy.emergency_exit as i64)
            .bind(strategy.health_check.as_ref().map(|a| a.as_str().to_string()))
            .bind(strategy.do_health_check as i64)
            .bind(strategy.in_queue as i64)
            .bind(&strategy.cloned_from)
            .bind(&strategy.latest_report)
            .execute(&mut *tx)
            .await?;
        }

        for report in store.strategy_reports.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO strategy_reports \
                 (id, strategy, tx, timestamp, block_number, gain, loss, total_gain, \
                  total_loss, total_debt, debt_added, debt_limit, debt_paid) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&report.id)
            .bind(&report.strategy)
            .bind(&report.transaction)
            .bind(report.timestamp.as_ms())
            .bind(report.block_number as i64)
            .bind(report.gain.to_canonical_string())
            .bind(report.loss.to_canonical_string())
            .bind(report.total_gain.to_canonical_string())
            .bind(report.total_loss.to_canonical_string())
            .bind(report.total_debt.to_canonical_string())
            .bind(report.debt_added.to_canonical_string())
            .bind(report.debt_limit.to_canonical_string())
            .bind(report.debt_paid.to_canonical_string())
            .execute(&mut *tx)
            .await?;
        }

        for result in store.strategy_report_results.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO strategy_report_results \
                 (id, strategy, prior_report, latest_report, tx, timestamp, block_number, \
                  duration_ms, total_gain_delta, total_loss_delta, total_debt_delta) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&result.id)
            .bind(&result.strategy)
            .bind(&result.prior_report)
            .bind(&result.latest_report)
            .bind(&result.transaction)
            .bind(result.timestamp.as_ms())
            .bind(result.block_number as i64)
            .bind(result.duration_ms)
            .bind(result.total_gain_delta.to_canonical_string())
            .bind(result.total_loss_delta.to_canonical_string())
            .bind(result.total_debt_delta.to_canonical_string())
            .execute(&mut *tx)
            .await?;
        }

        for harvest in store.harvests.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO harvests \
                 (id, strategy, vault, harvester, tx, timestamp, block_number, profit, loss, \
                  debt_payment, debt_outstanding) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&harvest.id)
            .bind(&harvest.strategy)
            .bind(&harvest.vault)
            .bind(harvest.harvester.as_str())
            .bind(&harvest.transaction)
            .bind(harvest.timestamp.as_ms())
            .bind(harvest.block_number as i64)
            .bind(harvest.profit.to_canonical_string())
            .bind(harvest.loss.to_canonical_string())
            .bind(harvest.debt_payment.to_canonical_string())
            .bind(harvest.debt_outstanding.to_canonical_string())
            .execute(&mut *tx)
            .await?;
        }

        for migration in store.strategy_migrations.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO strategy_migrations \
                 (id, old_strategy, new_strategy, tx, timestamp, block_number) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&migration.id)
            .bind(&migration.old_strategy)
            .bind(&migration.new_strategy)
            .bind(&migration.transaction)
            .bind(migration.timestamp.as_ms())
            .bind(migration.block_number as i64)
            .execute(&mut *tx)
            .await?;
        }

        for deposit in store.deposits.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO deposits \
                 (id, account, vault, tx, timestamp, block_number, token_amount, \
                  shares_minted, token_amount_usd) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&deposit.id)
            .bind(&deposit.account)
            .bind(&deposit.vault)
            .bind(&deposit.transaction)
            .bind(deposit.timestamp.as_ms())
            .bind(deposit.block_number as i64)
            .bind(deposit.token_amount.to_canonical_string())
            .bind(deposit.shares_minted.to_canonical_string())
            .bind(deposit.token_amount_usd.to_canonical_string())
            .execute(&mut *tx)
            .await?;
        }

        for withdrawal in store.withdrawals.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO withdrawals \
                 (id, account, vault, tx, timestamp, block_number, token_amount, \
                  shares_burnt, token_amount_usd) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&withdrawal.id)
            .bind(&withdrawal.account)
            .bind(&withdrawal.vault)
            .bind(&withdrawal.transaction)
            .bind(withdrawal.timestamp.as_ms())
            .bind(withdrawal.block_number as i64)
            .bind(withdrawal.token_amount.to_canonical_string())
            .bind(withdrawal.shares_burnt.to_canonical_string())
            .bind(withdrawal.token_amount_usd.to_canonical_string())
            .execute(&mut *tx)
            .await?;
        }

        for transfer in store.transfers.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO transfers \
                 (id, from_account, to_account, vault, token, token_amount, token_amount_usd, \
                  share_token, share_amount, tx, timestamp, block_number, is_fee_to_strategy, \
                  is_fee_to_treasury) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&transfer.id)
            .bind(&transfer.from)
            .bind(&transfer.to)
            .bind(&transfer.vault)
            .bind(&transfer.token)
            .bind(transfer.token_amount.to_canonical_string())
            .bind(transfer.token_amount_usd.to_canonical_string())
            .bind(&transfer.share_token)
            .bind(transfer.share_amount.to_canonical_string())
            .bind(&transfer.transaction)
            .bind(transfer.timestamp.as_ms())
            .bind(transfer.block_number as i64)
            .bind(transfer.is_fee_to_strategy as i64)
            .bind(transfer.is_fee_to_treasury as i64)
            .execute(&mut *tx)
            .await?;
        }

        for position in store.positions.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO account_vault_positions \
                 (id, account, vault, token, share_token, tx, balance_shares, balance_tokens, \
                  balance_profit, latest_update, update_count) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&position.id)
            .bind(&position.account)
            .bind(&position.vault)
            .bind(&position.token)
            .bind(&position.share_token)
            .bind(&position.transaction)
            .bind(position.balance_shares.to_canonical_string())
            .bind(position.balance_tokens.to_canonical_string())
            .bind(position.balance_profit.to_canonical_string())
            .bind(&position.latest_update)
            .bind(position.update_count as i64)
            .execute(&mut *tx)
            .await?;
        }

        for update in store.position_updates.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO account_vault_position_updates \
                 (id, update_order, account, vault, position, tx, timestamp, block_number, \
                  deposits, withdrawals, shares_minted, shares_burnt, shares_sent, \
                  shares_received, tokens_sent, tokens_received, balance_shares, \
                  balance_position) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&update.id)
            .bind(update.order as i64)
            .bind(&update.account)
            .bind(&update.vault)
            .bind(&update.position)
            .bind(&update.transaction)
            .bind(update.timestamp.as_ms())
            .bind(update.block_number as i64)
            .bind(update.deposits.to_canonical_string())
            .bind(update.withdrawals.to_canonical_string())
            .bind(update.shares_minted.to_canonical_string())
            .bind(update.shares_burnt.to_canonical_string())
            .bind(update.shares_sent.to_canonical_string())
            .bind(update.shares_received.to_canonical_string())
            .bind(update.tokens_sent.to_canonical_string())
            .bind(update.tokens_received.to_canonical_string())
            .bind(update.balance_shares.to_canonical_string())
            .bind(update.balance_position.to_canonical_string())
            .execute(&mut *tx)
            .await?;
        }

        for fee in store.token_fees.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO token_fees \
                 (id, vault, token, unrecognized_strategy_fees, unrecognized_treasury_fees, \
                  total_strategy_fees, total_treasury_fees, total_fees) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&fee.id)
            .bind(&fee.vault)
            .bind(&fee.token)
            .bind(fee.unrecognized_strategy_fees.to_canonical_string())
            .bind(fee.unrecognized_treasury_fees.to_canonical_string())
            .bind(fee.total_strategy_fees.to_canonical_string())
            .bind(fee.total_treasury_fees.to_canonical_string())
            .bind(fee.total_fees.to_canonical_string())
            .execute(&mut *tx)
            .await?;
        }

        for day in store.vault_day_data.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO vault_day_data \
                 (id, vault, timestamp, day_index, price_per_share, deposited, withdrawn, \
                  day_returns_generated, total_returns_generated, day_returns_generated_usd, \
                  total_returns_generated_usd, token_price_usd) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&day.id)
            .bind(&day.vault)
            .bind(day.timestamp.as_ms())
            .bind(day.day_index)
            .bind(day.price_per_share.to_canonical_string())
            .bind(day.deposited.to_canonical_string())
            .bind(day.withdrawn.to_canonical_string())
            .bind(day.day_returns_generated.to_canonical_string())
            .bind(day.total_returns_generated.to_canonical_string())
            .bind(day.day_returns_generated_usd.to_canonical_string())
            .bind(day.total_returns_generated_usd.to_canonical_string())
            .bind(day.token_price_usd.to_canonical_string())
            .execute(&mut *tx)
            .await?;
        }

        for registry in store.registries.values() {
            sqlx::query(
                "INSERT OR REPLACE INTO registries \
                 (id, address, tx, timestamp, block_number, released_vaults, endorsed_vaults, \
                  experimental_vaults) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&registry.id)
            .bind(registry.address.as_str())
            .bind(&registry.transaction)
            .bind(registry.timestamp.as_ms())
            .bind(registry.block_number as i64)
            .bind(serde_json::to_string(&registry.released_vaults).unwrap_or_default())
            .bind(serde_json::to_string(&registry.endorsed_vaults).unwrap_or_default())
            .bind(serde_json::to_string(&registry.experimental_vaults).unwrap_or_default())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(store.entity_count())
    }
}

// -- read side ---------------------------------------------------------------

/// Vault summary returned by the query API.
#[derive(Debug, Clone, Serialize)]
pub struct VaultRow {
    pub id: String,
    pub token: String,
    pub share_token: String,
    pub classification: String,
    pub api_version: String,
    pub balance_tokens: String,
    pub balance_tokens_idle: String,
    pub shares_supply: String,
    pub deposit_limit: String,
    pub available_deposit_limit: String,
    pub management_fee_bps: i64,
    pub performance_fee_bps: i64,
    pub rewards: String,
    pub withdrawal_queue: Vec<String>,
    pub latest_update: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VaultUpdateRow {
    pub id: String,
    pub vault: String,
    pub timestamp: i64,
    pub block_number: i64,
    pub tokens_deposited: String,
    pub tokens_withdrawn: String,
    pub shares_minted: String,
    pub shares_burnt: String,
    pub returns_generated: String,
    pub total_fees: String,
    pub price_per_share: String,
    pub current_balance_tokens: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VaultDayDataRow {
    pub id: String,
    pub vault: String,
    pub timestamp: i64,
    /// UTC calendar date of the bucket, derived from `timestamp`.
    pub date: String,
    pub day_index: i64,
    pub price_per_share: String,
    pub deposited: String,
    pub withdrawn: String,
    pub day_returns_generated: String,
    pub total_returns_generated: String,
    pub token_price_usd: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionRow {
    pub id: String,
    pub account: String,
    pub vault: String,
    pub balance_shares: String,
    pub balance_tokens: String,
    pub latest_update: Option<String>,
}

fn vault_row(row: &sqlx::sqlite::SqliteRow) -> VaultRow {
    let queue_json: String = row.get("withdrawal_queue");
    VaultRow {
        id: row.get("id"),
        token: row.get("token"),
        share_token: row.get("share_token"),
        classification: row.get("classification"),
        api_version: row.get("api_version"),
        balance_tokens: row.get("balance_tokens"),
        balance_tokens_idle: row.get("balance_tokens_idle"),
        shares_supply: row.get("shares_supply"),
        deposit_limit: row.get("deposit_limit"),
        available_deposit_limit: row.get("available_deposit_limit"),
        management_fee_bps: row.get("management_fee_bps"),
        performance_fee_bps: row.get("performance_fee_bps"),
        rewards: row.get("rewards"),
        withdrawal_queue: serde_json::from_str(&queue_json).unwrap_or_default(),
        latest_update: row.get("latest_update"),
    }
}

impl Repository {
    pub async fn list_vaults(&self) -> Result<Vec<VaultRow>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM vaults ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(vault_row).collect())
    }

    pub async fn get_vault(&self, id: &str) -> Result<Option<VaultRow>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM vaults WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(vault_row))
    }

    pub async fn list_vault_updates(
        &self,
        vault: &str,
        limit: i64,
    ) -> Result<Vec<VaultUpdateRow>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM vault_updates WHERE vault = ? \
             ORDER BY block_number DESC, id DESC LIMIT ?",
        )
        .bind(vault)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|row| VaultUpdateRow {
                id: row.get("id"),
                vault: row.get("vault"),
                timestamp: row.get("timestamp"),
                block_number: row.get("block_number"),
                tokens_deposited: row.get("tokens_deposited"),
                tokens_withdrawn: row.get("tokens_withdrawn"),
                shares_minted: row.get("shares_minted"),
                shares_burnt: row.get("shares_burnt"),
                returns_generated: row.get("returns_generated"),
                total_fees: row.get("total_fees"),
                price_per_share: row.get("price_per_share"),
                current_balance_tokens: row.get("current_balance_tokens"),
            })
            .collect())
    }

    pub async fn list_vault_day_data(
        &self,
        vault: &str,
    ) -> Result<Vec<VaultDayDataRow>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM vault_day_data WHERE vault = ? ORDER BY day_index ASC",
        )
        .bind(vault)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|row| {
                let timestamp: i64 = row.get("timestamp");
                VaultDayDataRow {
                    id: row.get("id"),
                    vault: row.get("vault"),
                    timestamp,
                    date: chrono::DateTime::from_timestamp_millis(timestamp)
                        .map(|dt| dt.date_naive().to_string())
                        .unwrap_or_default(),
                    day_index: row.get("day_index"),
                    price_per_share: row.get("price_per_share"),
                    deposited: row.get("deposited"),
                    withdrawn: row.get("withdrawn"),
                    day_returns_generated: row.get("day_returns_generated"),
                    total_returns_generated: row.get("total_returns_generated"),
                    token_price_usd: row.get("token_price_usd"),
                }
            })
            .collect())
    }

    pub async fn list_positions_for_account(
        &self,
        account: &str,
    ) -> Result<Vec<PositionRow>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM account_vault_positions WHERE account = ? ORDER BY vault",
        )
        .bind(account)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|row| PositionRow {
                id: row.get("id"),
                account: row.get("account"),
                vault: row.get("vault"),
                balance_shares: row.get("balance_shares"),
                balance_tokens: row.get("balance_tokens"),
                latest_update: row.get("latest_update"),
            })
            .collect())
    }
}
