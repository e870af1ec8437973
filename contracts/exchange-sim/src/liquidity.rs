use crate::storage::{
    get_config, get_position, get_sqrt_price, next_token_id, remove_position, set_position,
    ExchangeConfig,
};
use soroban_sdk::{token, Address, Env, Symbol};
use vault_math::{
    checked_add, get_amounts_for_liquidity, get_liquidity_for_amounts, get_sqrt_ratio_at_tick,
    mul_div, price_from_sqrt, to_asset0, to_asset1,
};
use vault_types::{is_valid_tick_range, PositionState, VaultError};

/// Liquidity of the unit position used to price a funds split
const SPLIT_REFERENCE_LIQUIDITY: u128 = 1 << 64;

/// Open a new position from amounts already pushed to the exchange
pub fn mint_new_position(
    env: &Env,
    amount0_desired: u128,
    amount1_desired: u128,
    tick_lower: i32,
    tick_upper: i32,
    recipient: Address,
) -> Result<(u32, u128, u128, u128), VaultError> {
    let config = get_config(env)?;
    config.owner.require_auth();

    if get_position(env).is_some() {
        return Err(VaultError::LiquidityPositionAlreadyExists);
    }
    if !is_valid_tick_range(tick_lower, tick_upper) {
        return Err(VaultError::InvalidTickRange);
    }

    let mut position = PositionState {
        tick_lower,
        tick_upper,
        ..Default::default()
    };
    let (liquidity, amount0, amount1) = add_liquidity(
        env,
        &config,
        &mut position,
        amount0_desired,
        amount1_desired,
        &recipient,
    )?;
    position.token_id = next_token_id(env);
    set_position(env, &position);

    env.events().publish(
        (Symbol::new(env, "position_minted"), position.token_id),
        (liquidity, amount0, amount1),
    );

    Ok((position.token_id, amount0, amount1, liquidity))
}

/// Add liquidity to the open position
pub fn increase_liquidity(
    env: &Env,
    amount0_desired: u128,
    amount1_desired: u128,
    recipient: Address,
) -> Result<(u128, u128, u128), VaultError> {
    let config = get_config(env)?;
    config.owner.require_auth();

    let mut position = get_position(env).ok_or(VaultError::NoPositionExists)?;
    let result = add_liquidity(
        env,
        &config,
        &mut position,
        amount0_desired,
        amount1_desired,
        &recipient,
    )?;
    set_position(env, &position);

    env.events().publish(
        (Symbol::new(env, "liquidity_increased"), position.token_id),
        result,
    );

    Ok(result)
}

/// Remove liquidity and pay the underlying amounts to the owner
pub fn decrease_liquidity(
    env: &Env,
    liquidity: u128,
    amount0_min: u128,
    amount1_min: u128,
) -> Result<(u128, u128), VaultError> {
    let config = get_config(env)?;
    config.owner.require_auth();

    let mut position = get_position(env).ok_or(VaultError::NoPositionExists)?;
    if liquidity == 0 || liquidity > position.liquidity {
        return Err(VaultError::InsufficientLiquidity);
    }

    let (sqrt_lower, sqrt_upper) = range_bounds(env, &position)?;
    let (amount0, amount1) =
        get_amounts_for_liquidity(env, get_sqrt_price(env)?, sqrt_lower, sqrt_upper, liquidity)?;

    if amount0 < amount0_min || amount1 < amount1_min {
        return Err(VaultError::SlippageExceeded);
    }

    position.liquidity -= liquidity;
    set_position(env, &position);

    transfer_out(env, &config.token0, &config.owner, amount0)?;
    transfer_out(env, &config.token1, &config.owner, amount1)?;

    env.events().publish(
        (Symbol::new(env, "liquidity_decreased"), position.token_id),
        (liquidity, amount0, amount1),
    );

    Ok((amount0, amount1))
}

/// Pay out up to the requested amounts of accrued fees
pub fn collect(
    env: &Env,
    recipient: Address,
    amount0_max: u128,
    amount1_max: u128,
) -> Result<(u128, u128), VaultError> {
    let config = get_config(env)?;
    config.owner.require_auth();

    let mut position = get_position(env).ok_or(VaultError::NoPositionExists)?;

    let amount0 = amount0_max.min(position.tokens_owed_0);
    let amount1 = amount1_max.min(position.tokens_owed_1);

    position.tokens_owed_0 -= amount0;
    position.tokens_owed_1 -= amount1;
    set_position(env, &position);

    transfer_out(env, &config.token0, &recipient, amount0)?;
    transfer_out(env, &config.token1, &recipient, amount1)?;

    Ok((amount0, amount1))
}

/// Drop the position once its liquidity has been fully withdrawn
pub fn reset_position(env: &Env) -> Result<(), VaultError> {
    let config = get_config(env)?;
    config.owner.require_auth();

    let position = get_position(env).ok_or(VaultError::NoPositionExists)?;
    if position.liquidity != 0 {
        return Err(VaultError::PositionStillExists);
    }

    // Fees left behind go to the owner rather than disappearing with the position
    transfer_out(env, &config.token0, &config.owner, position.tokens_owed_0)?;
    transfer_out(env, &config.token1, &config.owner, position.tokens_owed_1)?;
    remove_position(env);

    env.events().publish(
        (Symbol::new(env, "position_reset"), position.token_id),
        (),
    );

    Ok(())
}

/// Credit fees to the open position, funded by `from`
pub fn accrue_fees(env: &Env, from: Address, fee0: u128, fee1: u128) -> Result<(), VaultError> {
    from.require_auth();
    let config = get_config(env)?;
    let mut position = get_position(env).ok_or(VaultError::NoPositionExists)?;

    transfer_in(env, &config.token0, &from, fee0)?;
    transfer_in(env, &config.token1, &from, fee1)?;

    position.tokens_owed_0 = checked_add(position.tokens_owed_0, fee0)?;
    position.tokens_owed_1 = checked_add(position.tokens_owed_1, fee1)?;
    set_position(env, &position);

    Ok(())
}

/// Amounts held by the open position at the current price
pub fn token_amounts(env: &Env, include_fees: bool) -> Result<(u128, u128), VaultError> {
    let position = match get_position(env) {
        Some(position) => position,
        None => return Ok((0, 0)),
    };

    let (sqrt_lower, sqrt_upper) = range_bounds(env, &position)?;
    let (amount0, amount1) = get_amounts_for_liquidity(
        env,
        get_sqrt_price(env)?,
        sqrt_lower,
        sqrt_upper,
        position.liquidity,
    )?;

    if include_fees {
        Ok((
            checked_add(amount0, position.tokens_owed_0)?,
            checked_add(amount1, position.tokens_owed_1)?,
        ))
    } else {
        Ok((amount0, amount1))
    }
}

/// Split `funds` of one asset into the portion each side of a
/// `[lower, upper]` position needs, both in units of the funding asset
pub fn split_funds(
    env: &Env,
    lower_price_sqrt_x96: u128,
    upper_price_sqrt_x96: u128,
    funds: u128,
    is_fund_asset0: bool,
) -> Result<(u128, u128), VaultError> {
    let sqrt_price = get_sqrt_price(env)?;
    let (unit0, unit1) = get_amounts_for_liquidity(
        env,
        sqrt_price,
        lower_price_sqrt_x96,
        upper_price_sqrt_x96,
        SPLIT_REFERENCE_LIQUIDITY,
    )?;
    let price = price_from_sqrt(env, sqrt_price)?;

    if is_fund_asset0 {
        let total = checked_add(unit0, to_asset0(env, unit1, price)?)?;
        if total == 0 {
            return Ok((0, 0));
        }
        let part0 = mul_div(env, funds, unit0, total)?;
        Ok((part0, funds - part0))
    } else {
        let total = checked_add(to_asset1(env, unit0, price)?, unit1)?;
        if total == 0 {
            return Ok((0, 0));
        }
        let part1 = mul_div(env, funds, unit1, total)?;
        Ok((funds - part1, part1))
    }
}

fn add_liquidity(
    env: &Env,
    config: &ExchangeConfig,
    position: &mut PositionState,
    amount0_desired: u128,
    amount1_desired: u128,
    recipient: &Address,
) -> Result<(u128, u128, u128), VaultError> {
    let sqrt_price = get_sqrt_price(env)?;
    let (sqrt_lower, sqrt_upper) = range_bounds(env, position)?;

    let liquidity = get_liquidity_for_amounts(
        env,
        sqrt_price,
        sqrt_lower,
        sqrt_upper,
        amount0_desired,
        amount1_desired,
    )?;
    if liquidity == 0 {
        return Err(VaultError::InsufficientLiquidity);
    }

    let (amount0, amount1) =
        get_amounts_for_liquidity(env, sqrt_price, sqrt_lower, sqrt_upper, liquidity)?;
    let amount0 = amount0.min(amount0_desired);
    let amount1 = amount1.min(amount1_desired);

    position.liquidity = checked_add(position.liquidity, liquidity)?;

    // Whatever was pushed but not used goes back
    transfer_out(env, &config.token0, recipient, amount0_desired - amount0)?;
    transfer_out(env, &config.token1, recipient, amount1_desired - amount1)?;

    Ok((liquidity, amount0, amount1))
}

fn range_bounds(env: &Env, position: &PositionState) -> Result<(u128, u128), VaultError> {
    Ok((
        get_sqrt_ratio_at_tick(env, position.tick_lower)?,
        get_sqrt_ratio_at_tick(env, position.tick_upper)?,
    ))
}

/// Pay `amount` of `token` from the exchange; zero amounts are skipped
pub(crate) fn transfer_out(
    env: &Env,
    token: &Address,
    to: &Address,
    amount: u128,
) -> Result<(), VaultError> {
    if amount == 0 {
        return Ok(());
    }
    let amount = i128::try_from(amount).map_err(|_| VaultError::Overflow)?;
    token::Client::new(env, token).transfer(&env.current_contract_address(), to, &amount);
    Ok(())
}

fn transfer_in(env: &Env, token: &Address, from: &Address, amount: u128) -> Result<(), VaultError> {
    if amount == 0 {
        return Ok(());
    }
    let amount = i128::try_from(amount).map_err(|_| VaultError::Overflow)?;
    token::Client::new(env, token).transfer(from, &env.current_contract_address(), &amount);
    Ok(())
}
