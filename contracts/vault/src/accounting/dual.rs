use super::{custodied_balance, exchange_call, send, total_shares, Accounting};
use crate::share_token;
use crate::storage::{get_position_range, remove_position_range, set_position_range};
use soroban_sdk::{vec, Address, Env, Vec};
use vault_math::{checked_add, get_sqrt_ratio_at_tick, mul_div, mul_div_q96, to_asset0};
use vault_types::{ConversionContext, ExchangePoolClient, VaultConfig, VaultError, Q96};

/// Deposits become liquidity in a single concentrated range on the exchange.
///
/// Value is compared in asset-0-equivalent units at the current exchange
/// price. Uncollected fees count towards the value locked, so they dilute
/// later depositors rather than being handed to them. Pair balances held by
/// the vault itself (left over by a rebalance) are part of the value locked
/// and of every withdrawal claim.
pub struct DualAssetAccounting {
    asset: Address,
    exchange: Address,
    tick_lower: i32,
    tick_upper: i32,
}

impl DualAssetAccounting {
    pub fn new(config: &VaultConfig) -> Result<Self, VaultError> {
        let exchange = config.exchange.clone().ok_or(VaultError::InvalidConfig)?;
        Ok(Self {
            asset: config.depositable_asset.clone(),
            exchange,
            tick_lower: config.tick_lower,
            tick_upper: config.tick_upper,
        })
    }

    fn client<'a>(&self, env: &'a Env) -> ExchangePoolClient<'a> {
        ExchangePoolClient::new(env, &self.exchange)
    }

    /// Push `amount_in` to the exchange and swap it; zero is a no-op
    fn swap(
        &self,
        env: &Env,
        client: &ExchangePoolClient,
        from: &Address,
        to: &Address,
        amount_in: u128,
    ) -> Result<u128, VaultError> {
        if amount_in == 0 {
            return Ok(0);
        }
        send(env, from, &self.exchange, amount_in)?;
        exchange_call(client.try_swap_exact_input_single(from, to, &amount_in))
    }

    /// Range new funds go into: the open position's own range, or the
    /// configured one when the next deposit mints
    fn deposit_range(&self, env: &Env, token_id: u32) -> (i32, i32) {
        let configured = (self.tick_lower, self.tick_upper);
        if token_id == 0 {
            return configured;
        }
        get_position_range(env).unwrap_or(configured)
    }
}

/// Pair balances in vault custody, less `pending` of the deposit asset that
/// is about to be committed
fn idle_custody(
    env: &Env,
    asset0: &Address,
    asset1: &Address,
    deposit_asset: &Address,
    pending: u128,
) -> Result<(u128, u128), VaultError> {
    let mut idle0 = custodied_balance(env, asset0)?;
    let mut idle1 = custodied_balance(env, asset1)?;
    let idle = if deposit_asset == asset0 {
        &mut idle0
    } else {
        &mut idle1
    };
    *idle = idle.checked_sub(pending).ok_or(VaultError::Overflow)?;
    Ok((idle0, idle1))
}

/// Shares for an asset-0-equivalent contribution against the value locked
/// plus uncollected fees. The first depositor gets the contribution itself.
pub fn shares_for_contribution(
    env: &Env,
    contribution0: u128,
    total_shares: u128,
    tvl0: u128,
    fees0: u128,
) -> Result<u128, VaultError> {
    if total_shares == 0 {
        return Ok(contribution0);
    }
    Ok(mul_div(env, contribution0, total_shares, checked_add(tvl0, fees0)?)?)
}

impl Accounting for DualAssetAccounting {
    fn total_value_locked(&self, env: &Env) -> Result<Vec<u128>, VaultError> {
        let client = self.client(env);
        let (asset0, asset1) = exchange_call(client.try_get_tokens())?;
        let (amount0, amount1) = exchange_call(client.try_get_token_amounts(&false))?;
        let (idle0, idle1) = idle_custody(env, &asset0, &asset1, &self.asset, 0)?;
        Ok(vec![
            env,
            checked_add(amount0, idle0)?,
            checked_add(amount1, idle1)?,
        ])
    }

    fn process_deposit(&self, env: &Env, amount: u128) -> Result<ConversionContext, VaultError> {
        let client = self.client(env);
        let (asset0, asset1) = exchange_call(client.try_get_tokens())?;
        let is_asset0 = self.asset == asset0;
        if !is_asset0 && self.asset != asset1 {
            return Err(VaultError::OnlyPairTokens);
        }
        let (idle0, idle1) = idle_custody(env, &asset0, &asset1, &self.asset, amount)?;

        let token_id = exchange_call(client.try_get_token_id())?;
        let (tick_lower, tick_upper) = self.deposit_range(env, token_id);
        let sqrt_lower = get_sqrt_ratio_at_tick(env, tick_lower)?;
        let sqrt_upper = get_sqrt_ratio_at_tick(env, tick_upper)?;
        let (part0, part1) = exchange_call(client.try_split_funds_into_tokens(
            &sqrt_lower,
            &sqrt_upper,
            &amount,
            &is_asset0,
        ))?;
        if part0 == 0 || part1 == 0 {
            return Err(VaultError::OutsideOfPriceRange);
        }

        // Both parts are in deposit-asset units; the other side gets swapped
        let (desired0, desired1) = if is_asset0 {
            (part0, self.swap(env, &client, &asset0, &asset1, part1)?)
        } else {
            (self.swap(env, &client, &asset1, &asset0, part0)?, part1)
        };

        let (tvl0, tvl1) = exchange_call(client.try_get_token_amounts(&false))?;

        send(env, &asset0, &self.exchange, desired0)?;
        send(env, &asset1, &self.exchange, desired1)?;

        let vault = env.current_contract_address();
        let (used0, used1) = if token_id == 0 {
            let (_, used0, used1, _) = exchange_call(client.try_mint_new_position(
                &desired0,
                &desired1,
                &tick_lower,
                &tick_upper,
                &vault,
            ))?;
            set_position_range(env, tick_lower, tick_upper);
            (used0, used1)
        } else {
            let (_, used0, used1) =
                exchange_call(client.try_increase_liquidity(&desired0, &desired1, &vault))?;
            (used0, used1)
        };

        // The exchange refunded what the position did not take; the other
        // asset's share goes back into the deposit asset
        let left0 = desired0.saturating_sub(used0);
        let left1 = desired1.saturating_sub(used1);
        let refund = if is_asset0 {
            checked_add(left0, self.swap(env, &client, &asset1, &asset0, left1)?)?
        } else {
            checked_add(left1, self.swap(env, &client, &asset0, &asset1, left0)?)?
        };

        Ok(ConversionContext {
            amount_added_0: used0,
            amount_added_1: used1,
            tvl_0: checked_add(tvl0, idle0)?,
            tvl_1: checked_add(tvl1, idle1)?,
            refund,
        })
    }

    fn convert_to_shares(&self, env: &Env, ctx: &ConversionContext) -> Result<u128, VaultError> {
        if ctx.is_empty() {
            return Ok(0);
        }

        let client = self.client(env);
        let price = exchange_call(client.try_get_price())?;
        let contribution0 = checked_add(ctx.amount_added_0, to_asset0(env, ctx.amount_added_1, price)?)?;

        let total = total_shares(env)?;
        if total == 0 {
            return Ok(contribution0);
        }

        let tvl0 = checked_add(ctx.tvl_0, to_asset0(env, ctx.tvl_1, price)?)?;
        let (fee0, fee1) = exchange_call(client.try_get_fees_to_collect())?;
        let fees0 = checked_add(fee0, to_asset0(env, fee1, price)?)?;

        shares_for_contribution(env, contribution0, total, tvl0, fees0)
    }

    fn convert_to_assets(
        &self,
        env: &Env,
        holder: &Address,
        shares: u128,
    ) -> Result<Vec<u128>, VaultError> {
        if super::to_u128(share_token::balance(env, holder))? < shares {
            return Err(VaultError::InsufficientShares);
        }

        let total = total_shares(env)?;
        if total == 0 {
            return Ok(vec![env, 0, 0, 0, 0, 0]);
        }

        let client = self.client(env);
        let ratio = mul_div(env, shares, Q96, total)?;
        let liquidity = exchange_call(client.try_get_total_liquidity())?;
        let (fee0, fee1) = exchange_call(client.try_get_fees_to_collect())?;
        let (asset0, asset1) = exchange_call(client.try_get_tokens())?;
        let (idle0, idle1) = idle_custody(env, &asset0, &asset1, &self.asset, 0)?;

        Ok(vec![
            env,
            mul_div_q96(env, liquidity, ratio)?,
            mul_div_q96(env, fee0, ratio)?,
            mul_div_q96(env, fee1, ratio)?,
            mul_div_q96(env, idle0, ratio)?,
            mul_div_q96(env, idle1, ratio)?,
        ])
    }

    fn process_withdraw(&self, env: &Env, claim: &Vec<u128>) -> Result<u128, VaultError> {
        let client = self.client(env);
        let liquidity = claim.get(0).unwrap_or(0);
        let fee0 = claim.get(1).unwrap_or(0);
        let fee1 = claim.get(2).unwrap_or(0);

        // Idle custody is already in the vault
        let mut amount0 = claim.get(3).unwrap_or(0);
        let mut amount1 = claim.get(4).unwrap_or(0);
        if liquidity > 0 {
            let (removed0, removed1) =
                exchange_call(client.try_decrease_liquidity(&liquidity, &0, &0))?;
            amount0 = checked_add(amount0, removed0)?;
            amount1 = checked_add(amount1, removed1)?;
        }
        if fee0 > 0 || fee1 > 0 {
            let vault = env.current_contract_address();
            let (collected0, collected1) =
                exchange_call(client.try_collect(&vault, &fee0, &fee1))?;
            amount0 = checked_add(amount0, collected0)?;
            amount1 = checked_add(amount1, collected1)?;
        }

        let (asset0, asset1) = exchange_call(client.try_get_tokens())?;
        let mut total = 0u128;
        for (asset, amount) in [(asset0, amount0), (asset1, amount1)] {
            let received = if asset == self.asset {
                amount
            } else {
                self.swap(env, &client, &asset, &self.asset, amount)?
            };
            total = checked_add(total, received)?;
        }

        Ok(total)
    }

    fn position_claim(&self, env: &Env) -> Result<Option<Vec<u128>>, VaultError> {
        let client = self.client(env);
        let liquidity = exchange_call(client.try_get_total_liquidity())?;
        let (fee0, fee1) = exchange_call(client.try_get_fees_to_collect())?;
        let token_id = exchange_call(client.try_get_token_id())?;

        if liquidity == 0 && fee0 == 0 && fee1 == 0 && token_id == 0 {
            return Ok(None);
        }
        let (asset0, asset1) = exchange_call(client.try_get_tokens())?;
        let (idle0, idle1) = idle_custody(env, &asset0, &asset1, &self.asset, 0)?;
        Ok(Some(vec![env, liquidity, fee0, fee1, idle0, idle1]))
    }

    fn reset_position(&self, env: &Env) -> Result<(), VaultError> {
        let client = self.client(env);
        exchange_call(client.try_reset_position())?;

        if exchange_call(client.try_get_token_id())? != 0 {
            return Err(VaultError::PositionStillExists);
        }
        remove_position_range(env);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_contribution_sets_baseline() {
        let env = Env::default();
        assert_eq!(shares_for_contribution(&env, 5_000, 0, 0, 0), Ok(5_000));
        // Fees cannot adjust the first deposit
        assert_eq!(shares_for_contribution(&env, 5_000, 0, 0, 999), Ok(5_000));
    }

    #[test]
    fn test_contribution_against_locked_value() {
        let env = Env::default();
        // Doubling a 10_000 TVL doubles the supply
        assert_eq!(
            shares_for_contribution(&env, 10_000, 40_000, 10_000, 0),
            Ok(40_000)
        );
    }

    #[test]
    fn test_fees_dilute_new_entrants() {
        let env = Env::default();
        let before = shares_for_contribution(&env, 1_000, 10_000, 10_000, 0).unwrap();
        let after = shares_for_contribution(&env, 1_000, 10_000, 10_000, 500).unwrap();
        assert_eq!(before, 1_000);
        // 1000 * 10000 / 10500 = 952.38 -> 952
        assert_eq!(after, 952);
        assert!(after < before);
    }

    #[test]
    fn test_empty_value_with_supply_faults() {
        let env = Env::default();
        assert_eq!(
            shares_for_contribution(&env, 1_000, 10, 0, 0),
            Err(VaultError::DivisionByZero)
        );
    }

    #[test]
    fn test_empty_context() {
        assert!(ConversionContext::default().is_empty());
        assert!(!ConversionContext::single(1, 0).is_empty());
        assert!(!ConversionContext::single(0, 1).is_empty());
    }
}
