//! Share ledger and its token-style surface.
//!
//! Balances are `i128` like every Soroban token. Only deposit mints and only
//! withdraw burns; transfers move balances without touching the supply.

use crate::events;
use crate::storage::{
    get_allowance, get_balance, get_total_shares, set_allowance, set_balance, set_total_shares,
    AllowanceValue,
};
use soroban_sdk::{Address, Env};
use vault_types::VaultError;

pub fn balance(env: &Env, holder: &Address) -> i128 {
    get_balance(env, holder)
}

pub fn total_supply(env: &Env) -> i128 {
    get_total_shares(env)
}

/// Issue new shares to `to`
pub fn mint(env: &Env, to: &Address, amount: i128) -> Result<(), VaultError> {
    check_nonnegative(amount)?;
    let total = get_total_shares(env)
        .checked_add(amount)
        .ok_or(VaultError::Overflow)?;
    let balance = get_balance(env, to)
        .checked_add(amount)
        .ok_or(VaultError::Overflow)?;

    set_balance(env, to, balance);
    set_total_shares(env, total);
    Ok(())
}

/// Destroy shares held by `from`
pub fn burn(env: &Env, from: &Address, amount: i128) -> Result<(), VaultError> {
    check_nonnegative(amount)?;
    let balance = get_balance(env, from);
    if balance < amount {
        return Err(VaultError::InsufficientShares);
    }

    set_balance(env, from, balance - amount);
    set_total_shares(env, get_total_shares(env) - amount);
    Ok(())
}

/// Move shares between holders
pub fn transfer(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), VaultError> {
    check_nonnegative(amount)?;
    let from_balance = get_balance(env, from);
    if from_balance < amount {
        return Err(VaultError::InsufficientShares);
    }

    set_balance(env, from, from_balance - amount);
    let to_balance = get_balance(env, to)
        .checked_add(amount)
        .ok_or(VaultError::Overflow)?;
    set_balance(env, to, to_balance);

    events::transfer(env, from, to, amount);
    Ok(())
}

pub fn allowance(env: &Env, owner: &Address, spender: &Address) -> i128 {
    get_allowance(env, owner, spender).amount
}

/// Set the allowance of `spender`; a nonzero amount needs a live expiration
pub fn approve(
    env: &Env,
    owner: &Address,
    spender: &Address,
    amount: i128,
    expiration_ledger: u32,
) -> Result<(), VaultError> {
    check_nonnegative(amount)?;
    if amount > 0 && expiration_ledger < env.ledger().sequence() {
        return Err(VaultError::InvalidExpirationLedger);
    }

    set_allowance(
        env,
        owner,
        spender,
        &AllowanceValue {
            amount,
            expiration_ledger,
        },
    );

    events::approve(env, owner, spender, amount, expiration_ledger);
    Ok(())
}

/// Consume `amount` of the allowance `owner` granted to `spender`
pub fn spend_allowance(
    env: &Env,
    owner: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), VaultError> {
    check_nonnegative(amount)?;
    let current = get_allowance(env, owner, spender);
    if current.amount < amount {
        return Err(VaultError::InsufficientAllowance);
    }

    set_allowance(
        env,
        owner,
        spender,
        &AllowanceValue {
            amount: current.amount - amount,
            expiration_ledger: current.expiration_ledger,
        },
    );
    Ok(())
}

fn check_nonnegative(amount: i128) -> Result<(), VaultError> {
    if amount < 0 {
        return Err(VaultError::NegativeAmount);
    }
    Ok(())
}
