use crate::full_math::MathError;
use soroban_sdk::{Env, U256};
use vault_types::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};

// Q128 constant: 2^128 represented as U256
fn q128(env: &Env) -> U256 {
    U256::from_u128(env, 1u128 << 64).mul(&U256::from_u128(env, 1u128 << 64))
}

/// Calculate sqrt(1.0001^tick) * 2^96, clamped to the u128 sqrt ratio bounds
pub fn get_sqrt_ratio_at_tick(env: &Env, tick: i32) -> Result<u128, MathError> {
    if tick < MIN_TICK || tick > MAX_TICK {
        return Err(MathError::TickOutOfBounds);
    }

    let abs_tick = tick.unsigned_abs();

    let mut ratio = q128(env);

    // sqrt(1.0001^-(2^i)) in Q128
    const SQRT_1_0001_1: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;
    const SQRT_1_0001_2: u128 = 0xfff97272373d413259a46990580e213a;
    const SQRT_1_0001_4: u128 = 0xfff2e50f5f656932ef12357cf3c7fdcc;
    const SQRT_1_0001_8: u128 = 0xffe5caca7e10e4e61c3624eaa0941cd0;
    const SQRT_1_0001_16: u128 = 0xffcb9843d60f6159c9db58835c926644;
    const SQRT_1_0001_32: u128 = 0xff973b41fa98c081472e6896dfb254c0;
    const SQRT_1_0001_64: u128 = 0xff2ea16466c96a3843ec78b326b52861;
    const SQRT_1_0001_128: u128 = 0xfe5dee046a99a2a811c461f1969c3053;
    const SQRT_1_0001_256: u128 = 0xfcbe86c7900a88aedcffc83b479aa3a4;
    const SQRT_1_0001_512: u128 = 0xf987a7253ac413176f2b074cf7815e54;
    const SQRT_1_0001_1024: u128 = 0xf3392b0822b70005940c7a398e4b70f3;
    const SQRT_1_0001_2048: u128 = 0xe7159475a2c29b7443b29c7fa6e889d9;
    const SQRT_1_0001_4096: u128 = 0xd097f3bdfd2022b8845ad8f792aa5825;
    const SQRT_1_0001_8192: u128 = 0xa9f746462d870fdf8a65dc1f90e061e5;
    const SQRT_1_0001_16384: u128 = 0x70d869a156d2a1b890bb3df62baf32f7;
    const SQRT_1_0001_32768: u128 = 0x31be135f97d08fd981231505542fcfa6;
    const SQRT_1_0001_65536: u128 = 0x9aa508b5b7a84e1c677de54f3e99bc9;
    const SQRT_1_0001_131072: u128 = 0x5d6af8dedb81196699c329225ee604;
    const SQRT_1_0001_262144: u128 = 0x2216e584f5fa1ea926041bedfe98;

    if abs_tick & 0x1 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_1);
    }
    if abs_tick & 0x2 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_2);
    }
    if abs_tick & 0x4 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_4);
    }
    if abs_tick & 0x8 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_8);
    }
    if abs_tick & 0x10 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_16);
    }
    if abs_tick & 0x20 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_32);
    }
    if abs_tick & 0x40 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_64);
    }
    if abs_tick & 0x80 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_128);
    }
    if abs_tick & 0x100 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_256);
    }
    if abs_tick & 0x200 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_512);
    }
    if abs_tick & 0x400 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_1024);
    }
    if abs_tick & 0x800 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_2048);
    }
    if abs_tick & 0x1000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_4096);
    }
    if abs_tick & 0x2000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_8192);
    }
    if abs_tick & 0x4000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_16384);
    }
    if abs_tick & 0x8000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_32768);
    }
    if abs_tick & 0x10000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_65536);
    }
    if abs_tick & 0x20000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_131072);
    }
    if abs_tick & 0x40000 != 0 {
        ratio = mul_shift_128(env, &ratio, SQRT_1_0001_262144);
    }

    // Invert if tick is positive (we computed for negative tick)
    if tick > 0 {
        let max_u256 = u256_max(env);
        ratio = max_u256.div(&ratio);
    }

    // Convert from Q128 to Q96 by right shifting 32 bits
    let shift_32 = U256::from_u128(env, 1u128 << 32);
    let result = ratio.div(&shift_32);

    let result_u128 = result.to_u128().unwrap_or(u128::MAX);
    Ok(result_u128.max(MIN_SQRT_RATIO).min(MAX_SQRT_RATIO))
}

/// Helper: multiply by u128 and right shift by 128 bits
fn mul_shift_128(env: &Env, x: &U256, y: u128) -> U256 {
    let y_256 = U256::from_u128(env, y);
    let product = x.mul(&y_256);
    // Divide by 2^128 (shift right 128 bits)
    let divisor = q128(env);
    product.div(&divisor)
}

/// Helper: get U256 max value
fn u256_max(env: &Env) -> U256 {
    // U256 max = 2^256 - 1
    let high = U256::from_u128(env, u128::MAX);
    let q128_val = q128(env);
    high.mul(&q128_val).add(&U256::from_u128(env, u128::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;
    use vault_types::Q96;

    #[test]
    fn test_sqrt_ratio_at_tick_zero_is_q96() {
        let env = Env::default();
        assert_eq!(get_sqrt_ratio_at_tick(&env, 0), Ok(Q96));
    }

    #[test]
    fn test_sqrt_ratio_brackets_q96() {
        let env = Env::default();
        let lower = get_sqrt_ratio_at_tick(&env, -600).unwrap();
        let upper = get_sqrt_ratio_at_tick(&env, 600).unwrap();
        assert!(lower < Q96);
        assert!(upper > Q96);
    }

    #[test]
    fn test_sqrt_ratio_monotonic() {
        let env = Env::default();
        let mut prev = get_sqrt_ratio_at_tick(&env, -5000).unwrap();
        for tick in (-4900..=5000).step_by(100) {
            let sqrt = get_sqrt_ratio_at_tick(&env, tick).unwrap();
            assert!(sqrt > prev, "sqrt_price should be monotonically increasing");
            prev = sqrt;
        }
    }

    #[test]
    fn test_sqrt_ratio_symmetric() {
        let env = Env::default();
        // sqrt(1.0001^n) * sqrt(1.0001^-n) = 1
        let up = get_sqrt_ratio_at_tick(&env, 100).unwrap();
        let down = get_sqrt_ratio_at_tick(&env, -100).unwrap();
        let product = crate::mul_div(&env, up, down, Q96).unwrap();
        let diff = if product > Q96 { product - Q96 } else { Q96 - product };
        assert!(diff < Q96 / 100);
    }

    #[test]
    fn test_known_tick_value() {
        let env = Env::default();
        // 1.0001^6931 ~= 2, so the sqrt ratio is ~1.414 * Q96
        let sqrt = get_sqrt_ratio_at_tick(&env, 6931).unwrap();
        let expected = Q96 * 1414 / 1000;
        let diff = if sqrt > expected { sqrt - expected } else { expected - sqrt };
        assert!(diff < expected / 20);
    }

    #[test]
    fn test_tick_bounds() {
        let env = Env::default();
        assert!(get_sqrt_ratio_at_tick(&env, MIN_TICK).unwrap() >= MIN_SQRT_RATIO);
        assert!(get_sqrt_ratio_at_tick(&env, MAX_TICK).unwrap() <= MAX_SQRT_RATIO);
        assert_eq!(
            get_sqrt_ratio_at_tick(&env, MIN_TICK - 1),
            Err(MathError::TickOutOfBounds)
        );
        assert_eq!(
            get_sqrt_ratio_at_tick(&env, MAX_TICK + 1),
            Err(MathError::TickOutOfBounds)
        );
    }
}
