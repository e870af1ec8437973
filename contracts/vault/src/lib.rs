#![no_std]

//! Share vault over a concentrated liquidity position.
//!
//! Users deposit one asset and receive shares; the vault commits the deposit
//! to a single range on an exchange and redeems shares proportionally to the
//! position's liquidity and uncollected fees.

mod accounting;
mod admin;
mod events;
mod flow;
mod rebalance;
mod share_token;
mod storage;


pub use accounting::{
    assets_for_shares, shares_for_assets, shares_for_contribution, Accounting,
    DualAssetAccounting, SingleAssetAccounting, Strategy,
};

use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};
use storage::{get_admin, get_config, get_metadata, is_initialized, set_config, set_metadata};
use vault_types::{
    ConversionContext, ShareMetadata, VaultConfig, VaultError, SHARE_DECIMALS,
};

#[contract]
pub struct LiquidityVault;

fn strategy(env: &Env) -> Result<Strategy, VaultError> {
    Strategy::from_config(&get_config(env)?)
}

#[contractimpl]
impl LiquidityVault {
    /// Initialize the vault
    ///
    /// # Arguments
    /// * `admin` - Controls pausing, limits, ranges and rebalancing
    /// * `config` - Accounting kind, deposit asset, exchange, limits and range
    /// * `name` / `symbol` - Share token metadata
    pub fn initialize(
        env: Env,
        admin: Address,
        config: VaultConfig,
        name: String,
        symbol: String,
    ) -> Result<(), VaultError> {
        if is_initialized(&env) {
            return Err(VaultError::AlreadyInitialized);
        }
        admin::validate_config(&env, &config)?;

        storage::set_admin(&env, &admin);
        set_config(&env, &config);
        storage::set_paused(&env, false);
        storage::set_total_shares(&env, 0);
        set_metadata(&env, &ShareMetadata { name, symbol });
        storage::extend_instance_ttl(&env);
        Ok(())
    }

    // === Deposit / Withdraw ===

    /// Deposit `amount` of the deposit asset
    ///
    /// # Returns
    /// Shares minted to `caller`
    pub fn deposit(env: Env, caller: Address, amount: i128) -> Result<i128, VaultError> {
        caller.require_auth();
        let strategy = strategy(&env)?;
        flow::deposit(&env, strategy.accounting(), &caller, amount)
    }

    /// Burn `shares` of `caller`
    ///
    /// # Returns
    /// Amount of the deposit asset paid to `caller`
    pub fn withdraw(env: Env, caller: Address, shares: i128) -> Result<i128, VaultError> {
        caller.require_auth();
        let strategy = strategy(&env)?;
        flow::withdraw(&env, strategy.accounting(), &caller, shares)
    }

    /// Exit the position and re-enter it under the configured tick range (admin only)
    pub fn rebalance(env: Env) -> Result<(), VaultError> {
        admin::require_admin(&env)?;
        let strategy = strategy(&env)?;
        rebalance::rebalance(&env, strategy.accounting())
    }

    // === Admin ===

    pub fn pause(env: Env) -> Result<(), VaultError> {
        admin::pause(&env)
    }

    pub fn unpause(env: Env) -> Result<(), VaultError> {
        admin::unpause(&env)
    }

    /// Change the deposit asset while no shares exist
    pub fn set_depositable_token(env: Env, token: Address) -> Result<(), VaultError> {
        admin::set_depositable_token(&env, token)
    }

    pub fn set_minimum_deposit(env: Env, minimum: i128) -> Result<(), VaultError> {
        admin::set_minimum_deposit(&env, minimum)
    }

    pub fn set_maximum_deposit(env: Env, maximum: i128) -> Result<(), VaultError> {
        admin::set_maximum_deposit(&env, maximum)
    }

    pub fn set_tick_range(env: Env, tick_lower: i32, tick_upper: i32) -> Result<(), VaultError> {
        admin::set_tick_range(&env, tick_lower, tick_upper)
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), VaultError> {
        admin::transfer_admin(&env, new_admin)
    }

    // === View Functions ===

    pub fn admin(env: Env) -> Result<Address, VaultError> {
        get_admin(&env)
    }

    pub fn config(env: Env) -> Result<VaultConfig, VaultError> {
        get_config(&env)
    }

    /// Value currently locked: `[balance]` or `[amount0, amount1]`
    pub fn total_value_locked(env: Env) -> Result<Vec<u128>, VaultError> {
        strategy(&env)?.accounting().total_value_locked(&env)
    }

    pub fn min_deposit(env: Env) -> Result<i128, VaultError> {
        Ok(get_config(&env)?.minimum_deposit)
    }

    pub fn max_deposit(env: Env) -> Result<i128, VaultError> {
        Ok(get_config(&env)?.maximum_deposit)
    }

    pub fn depositable_token(env: Env) -> Result<Address, VaultError> {
        Ok(get_config(&env)?.depositable_asset)
    }

    pub fn paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    pub fn tick_range(env: Env) -> Result<(i32, i32), VaultError> {
        let config = get_config(&env)?;
        Ok((config.tick_lower, config.tick_upper))
    }

    /// Shares a deposit producing `ctx` would be issued right now
    pub fn convert_to_shares(env: Env, ctx: ConversionContext) -> Result<u128, VaultError> {
        strategy(&env)?.accounting().convert_to_shares(&env, &ctx)
    }

    /// Current claim of `shares` held by `holder`
    pub fn convert_to_assets(
        env: Env,
        holder: Address,
        shares: u128,
    ) -> Result<Vec<u128>, VaultError> {
        strategy(&env)?
            .accounting()
            .convert_to_assets(&env, &holder, shares)
    }

    // === Share Token ===

    pub fn balance(env: Env, id: Address) -> i128 {
        share_token::balance(&env, &id)
    }

    pub fn total_supply(env: Env) -> i128 {
        share_token::total_supply(&env)
    }

    pub fn decimals(_env: Env) -> u32 {
        SHARE_DECIMALS
    }

    pub fn name(env: Env) -> Result<String, VaultError> {
        Ok(get_metadata(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, VaultError> {
        Ok(get_metadata(&env)?.symbol)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), VaultError> {
        from.require_auth();
        share_token::transfer(&env, &from, &to, amount)
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), VaultError> {
        from.require_auth();
        share_token::approve(&env, &from, &spender, amount, expiration_ledger)
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        share_token::allowance(&env, &from, &spender)
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), VaultError> {
        spender.require_auth();
        share_token::spend_allowance(&env, &from, &spender, amount)?;
        share_token::transfer(&env, &from, &to, amount)
    }
}
