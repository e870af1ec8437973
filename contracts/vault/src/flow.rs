use crate::accounting::{to_i128, to_u128, Accounting};
use crate::events;
use crate::share_token;
use crate::storage::{get_config, is_paused};
use soroban_sdk::{token, Address, Env};
use vault_types::VaultError;

pub fn ensure_not_paused(env: &Env) -> Result<(), VaultError> {
    if is_paused(env) {
        return Err(VaultError::Paused);
    }
    Ok(())
}

/// Take `amount` of the deposit asset from `caller` and issue shares for it
pub fn deposit(
    env: &Env,
    accounting: &dyn Accounting,
    caller: &Address,
    amount: i128,
) -> Result<i128, VaultError> {
    ensure_not_paused(env)?;
    let config = get_config(env)?;
    if amount < config.minimum_deposit || amount > config.maximum_deposit {
        return Err(VaultError::InvalidDepositAmount);
    }
    let assets = to_u128(amount)?;

    token::Client::new(env, &config.depositable_asset).transfer(
        caller,
        &env.current_contract_address(),
        &amount,
    );

    let ctx = accounting.process_deposit(env, assets)?;
    let shares = accounting.convert_to_shares(env, &ctx)?;
    if shares == 0 {
        return Err(VaultError::ZeroShares);
    }
    let shares = to_i128(shares)?;
    share_token::mint(env, caller, shares)?;

    let refund = to_i128(ctx.refund)?;
    if refund > 0 {
        token::Client::new(env, &config.depositable_asset).transfer(
            &env.current_contract_address(),
            caller,
            &refund,
        );
    }
    events::deposit(env, caller, amount - refund, shares);

    Ok(shares)
}

/// Redeem `shares` of `caller` for the deposit asset
pub fn withdraw(
    env: &Env,
    accounting: &dyn Accounting,
    caller: &Address,
    shares: i128,
) -> Result<i128, VaultError> {
    ensure_not_paused(env)?;
    if shares < 0 {
        return Err(VaultError::NegativeAmount);
    }
    if shares == 0 {
        return Err(VaultError::ZeroShares);
    }
    if share_token::balance(env, caller) < shares {
        return Err(VaultError::InsufficientShares);
    }

    let claim = accounting.convert_to_assets(env, caller, to_u128(shares)?)?;
    let amount = to_i128(accounting.process_withdraw(env, &claim)?)?;

    share_token::burn(env, caller, shares)?;
    events::withdraw(env, caller, shares, amount);

    if amount > 0 {
        let config = get_config(env)?;
        token::Client::new(env, &config.depositable_asset).transfer(
            &env.current_contract_address(),
            caller,
            &amount,
        );
    }

    Ok(amount)
}
