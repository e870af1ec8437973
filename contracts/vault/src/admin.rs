use crate::accounting::{exchange_call, total_shares};
use crate::events;
use crate::storage::{get_admin, get_config, is_paused, set_admin, set_config, set_paused};
use soroban_sdk::{log, Address, Env};
use vault_types::{is_valid_tick_range, ExchangePoolClient, VaultConfig, VaultError, VaultKind};

/// Require the stored admin's authorization and return it
pub fn require_admin(env: &Env) -> Result<Address, VaultError> {
    let admin = get_admin(env)?;
    admin.require_auth();
    Ok(admin)
}

/// Reject configurations the vault cannot operate under
pub fn validate_config(env: &Env, config: &VaultConfig) -> Result<(), VaultError> {
    validate_limits(config.minimum_deposit, config.maximum_deposit)?;
    if !is_valid_tick_range(config.tick_lower, config.tick_upper) {
        return Err(VaultError::InvalidTickRange);
    }

    if config.kind == VaultKind::DualAsset {
        let exchange = config.exchange.as_ref().ok_or(VaultError::InvalidConfig)?;
        check_pair_token(env, exchange, &config.depositable_asset)?;
    }
    Ok(())
}

fn validate_limits(minimum: i128, maximum: i128) -> Result<(), VaultError> {
    if minimum < 0 || minimum > maximum {
        return Err(VaultError::InvalidConfig);
    }
    Ok(())
}

/// The asset must be one of the exchange pair
fn check_pair_token(env: &Env, exchange: &Address, asset: &Address) -> Result<(), VaultError> {
    let (asset0, asset1) = exchange_call(ExchangePoolClient::new(env, exchange).try_get_tokens())?;
    if *asset != asset0 && *asset != asset1 {
        return Err(VaultError::OnlyPairTokens);
    }
    Ok(())
}

fn update_config(env: &Env, config: &VaultConfig) {
    set_config(env, config);
    events::config_updated(env, config);
}

pub fn pause(env: &Env) -> Result<(), VaultError> {
    let admin = require_admin(env)?;
    if is_paused(env) {
        return Err(VaultError::Paused);
    }
    set_paused(env, true);
    log!(env, "vault paused");
    events::paused(env, &admin);
    Ok(())
}

pub fn unpause(env: &Env) -> Result<(), VaultError> {
    let admin = require_admin(env)?;
    if !is_paused(env) {
        return Err(VaultError::NotPaused);
    }
    set_paused(env, false);
    log!(env, "vault unpaused");
    events::unpaused(env, &admin);
    Ok(())
}

/// Change the deposit asset; only allowed while no shares exist
pub fn set_depositable_token(env: &Env, token: Address) -> Result<(), VaultError> {
    require_admin(env)?;
    if total_shares(env)? != 0 {
        return Err(VaultError::ActiveDepositsExist);
    }

    let mut config = get_config(env)?;
    if config.kind == VaultKind::DualAsset {
        let exchange = config.exchange.as_ref().ok_or(VaultError::InvalidConfig)?;
        check_pair_token(env, exchange, &token)?;
    }

    config.depositable_asset = token;
    update_config(env, &config);
    Ok(())
}

pub fn set_minimum_deposit(env: &Env, minimum: i128) -> Result<(), VaultError> {
    require_admin(env)?;
    let mut config = get_config(env)?;
    validate_limits(minimum, config.maximum_deposit)?;

    config.minimum_deposit = minimum;
    update_config(env, &config);
    Ok(())
}

pub fn set_maximum_deposit(env: &Env, maximum: i128) -> Result<(), VaultError> {
    require_admin(env)?;
    let mut config = get_config(env)?;
    validate_limits(config.minimum_deposit, maximum)?;

    config.maximum_deposit = maximum;
    update_config(env, &config);
    Ok(())
}

/// Range for the next position mint; the open position keeps its range
/// until a rebalance
pub fn set_tick_range(env: &Env, tick_lower: i32, tick_upper: i32) -> Result<(), VaultError> {
    require_admin(env)?;
    if !is_valid_tick_range(tick_lower, tick_upper) {
        return Err(VaultError::InvalidTickRange);
    }

    let mut config = get_config(env)?;
    config.tick_lower = tick_lower;
    config.tick_upper = tick_upper;
    update_config(env, &config);
    Ok(())
}

/// Hand the admin role over; both parties authorize
pub fn transfer_admin(env: &Env, new_admin: Address) -> Result<(), VaultError> {
    let previous = require_admin(env)?;
    new_admin.require_auth();

    set_admin(env, &new_admin);
    events::admin_changed(env, &previous, &new_admin);
    Ok(())
}
