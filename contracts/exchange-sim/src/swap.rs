use crate::liquidity::transfer_out;
use crate::storage::{get_config, get_sqrt_price, ExchangeConfig};
use soroban_sdk::{Address, Env, Symbol};
use vault_math::{mul_div, price_from_sqrt, to_asset0, to_asset1};
use vault_types::{VaultError, BPS_DENOMINATOR};

/// Output of an exact-input swap at the current price, net of the fee.
///
/// The simulator trades against its own reserves at a fixed price, so a
/// swap never moves the price.
pub fn quote(
    env: &Env,
    config: &ExchangeConfig,
    from_asset: &Address,
    to_asset: &Address,
    amount_in: u128,
) -> Result<u128, VaultError> {
    let zero_for_one = if *from_asset == config.token0 && *to_asset == config.token1 {
        true
    } else if *from_asset == config.token1 && *to_asset == config.token0 {
        false
    } else {
        return Err(VaultError::OnlyPairTokens);
    };

    let fee = mul_div(env, amount_in, config.fee_bps as u128, BPS_DENOMINATOR)?;
    let amount_in_less_fee = amount_in - fee;
    let price = price_from_sqrt(env, get_sqrt_price(env)?)?;

    if zero_for_one {
        Ok(to_asset1(env, amount_in_less_fee, price)?)
    } else {
        Ok(to_asset0(env, amount_in_less_fee, price)?)
    }
}

/// Execute a swap whose input was already pushed to the exchange
pub fn execute_swap(
    env: &Env,
    from_asset: Address,
    to_asset: Address,
    amount_in: u128,
) -> Result<u128, VaultError> {
    let config = get_config(env)?;
    config.owner.require_auth();

    let amount_out = quote(env, &config, &from_asset, &to_asset, amount_in)?;
    transfer_out(env, &to_asset, &config.owner, amount_out)?;

    env.events().publish(
        (Symbol::new(env, "swap"), from_asset, to_asset),
        (amount_in, amount_out),
    );

    Ok(amount_out)
}
