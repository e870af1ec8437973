//! Share accounting: conversion between deposit-asset amounts, exchange
//! liquidity and share quantities.
//!
//! Two variants sit behind [`Accounting`]. The deposit/withdraw flow and the
//! rebalance are written once against the trait and never look at which
//! variant they drive.

mod dual;
mod single;

pub use dual::{shares_for_contribution, DualAssetAccounting};
pub use single::{assets_for_shares, shares_for_assets, SingleAssetAccounting};

use crate::storage::get_total_shares;
use soroban_sdk::{token, Address, Env, InvokeError, Vec};
use vault_types::{ConversionContext, VaultConfig, VaultError, VaultKind};

pub trait Accounting {
    /// Value currently locked, one element per accounted asset
    fn total_value_locked(&self, env: &Env) -> Result<Vec<u128>, VaultError>;

    /// Commit `amount` of the deposit asset, already in vault custody.
    /// Returns what was contributed, the value locked before it and the part
    /// of `amount` left uncommitted.
    fn process_deposit(&self, env: &Env, amount: u128) -> Result<ConversionContext, VaultError>;

    fn convert_to_shares(&self, env: &Env, ctx: &ConversionContext) -> Result<u128, VaultError>;

    /// Claim of `shares` held by `holder`. Single: `[assets]`.
    /// Dual: `[liquidity, fee0, fee1, idle0, idle1]`.
    fn convert_to_assets(
        &self,
        env: &Env,
        holder: &Address,
        shares: u128,
    ) -> Result<Vec<u128>, VaultError>;

    /// Realize a claim into the deposit asset held by the vault; returns the amount
    fn process_withdraw(&self, env: &Env, claim: &Vec<u128>) -> Result<u128, VaultError>;

    /// Claim covering the whole position, `None` when there is nothing to exit
    fn position_claim(&self, env: &Env) -> Result<Option<Vec<u128>>, VaultError>;

    /// Drop the emptied position
    fn reset_position(&self, env: &Env) -> Result<(), VaultError>;
}

/// Accounting variant selected by the vault configuration
pub enum Strategy {
    Single(SingleAssetAccounting),
    Dual(DualAssetAccounting),
}

impl Strategy {
    pub fn from_config(config: &VaultConfig) -> Result<Self, VaultError> {
        match config.kind {
            VaultKind::SingleAsset => Ok(Strategy::Single(SingleAssetAccounting::new(
                config.depositable_asset.clone(),
            ))),
            VaultKind::DualAsset => Ok(Strategy::Dual(DualAssetAccounting::new(config)?)),
        }
    }

    pub fn accounting(&self) -> &dyn Accounting {
        match self {
            Strategy::Single(single) => single as &dyn Accounting,
            Strategy::Dual(dual) => dual,
        }
    }
}

pub(crate) fn to_u128(value: i128) -> Result<u128, VaultError> {
    u128::try_from(value).map_err(|_| VaultError::NegativeAmount)
}

pub(crate) fn to_i128(value: u128) -> Result<i128, VaultError> {
    i128::try_from(value).map_err(|_| VaultError::Overflow)
}

pub(crate) fn total_shares(env: &Env) -> Result<u128, VaultError> {
    to_u128(get_total_shares(env))
}

/// Balance of `asset` held by the vault itself
pub(crate) fn custodied_balance(env: &Env, asset: &Address) -> Result<u128, VaultError> {
    to_u128(token::Client::new(env, asset).balance(&env.current_contract_address()))
}

/// Send `amount` of `asset` out of the vault; zero amounts are skipped
pub(crate) fn send(env: &Env, asset: &Address, to: &Address, amount: u128) -> Result<(), VaultError> {
    if amount == 0 {
        return Ok(());
    }
    token::Client::new(env, asset).transfer(&env.current_contract_address(), to, &to_i128(amount)?);
    Ok(())
}

/// Unwrap a `try_*` call into the exchange, keeping the error it reported
pub(crate) fn exchange_call<T, C>(
    result: Result<Result<T, C>, Result<VaultError, InvokeError>>,
) -> Result<T, VaultError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(err)) => Err(err),
        Ok(Err(_)) | Err(Err(_)) => Err(VaultError::ExchangeFailure),
    }
}
