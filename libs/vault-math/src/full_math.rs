use soroban_sdk::{Env, U256};
use vault_types::{VaultError, Q96};

/// Arithmetic failures of the fixed-point helpers
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MathError {
    DivisionByZero,
    Overflow,
    TickOutOfBounds,
}

impl From<MathError> for VaultError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::DivisionByZero => VaultError::DivisionByZero,
            MathError::Overflow => VaultError::Overflow,
            MathError::TickOutOfBounds => VaultError::InvalidTickRange,
        }
    }
}

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns floor((a * b) / denominator)
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }

    let a_256 = U256::from_u128(env, a);
    let b_256 = U256::from_u128(env, b);
    let denom_256 = U256::from_u128(env, denominator);

    let product = a_256.mul(&b_256);
    let result = product.div(&denom_256);

    u128_from_u256(&result)
}

/// floor(a * ratio_x96 / 2^96): scales `a` by a Q96 ratio
pub fn mul_div_q96(env: &Env, a: u128, ratio_x96: u128) -> Result<u128, MathError> {
    mul_div(env, a, ratio_x96, Q96)
}

/// Q96 price of asset1 per asset0 from a Q96 sqrt price: sqrt^2 / 2^96
pub fn price_from_sqrt(env: &Env, sqrt_price_x96: u128) -> Result<u128, MathError> {
    mul_div(env, sqrt_price_x96, sqrt_price_x96, Q96)
}

/// Value of an asset1 amount expressed in asset0 units: amount1 * 2^96 / price
pub fn to_asset0(env: &Env, amount1: u128, price_x96: u128) -> Result<u128, MathError> {
    if amount1 == 0 {
        return Ok(0);
    }
    mul_div(env, amount1, Q96, price_x96)
}

/// Value of an asset0 amount expressed in asset1 units: amount0 * price / 2^96
pub fn to_asset1(env: &Env, amount0: u128, price_x96: u128) -> Result<u128, MathError> {
    mul_div_q96(env, amount0, price_x96)
}

/// Checked addition reporting `MathError::Overflow`
pub fn checked_add(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

fn u128_from_u256(value: &U256) -> Result<u128, MathError> {
    value.to_u128().ok_or(MathError::Overflow)
}
